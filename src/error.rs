use std::fmt;

/// turn_state 的统一错误类型
#[derive(Debug)]
pub enum StateError {
    /// 路径非法（InvalidPath）
    Path(PathError),
    /// 记忆读写错误
    Memory(MemoryError),
    /// 配置错误
    Config(ConfigError),
    /// Shell 命令错误
    Shell(ShellError),
    /// IO 错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

/// 路径解析错误，统一归类为 InvalidPath
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// 空路径
    Empty,
    /// 路径中存在空段，如 `a..b`、`.a`、`a.`
    EmptySegment { path: String, position: usize },
}

/// 记忆读写错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// 已存储的值无法视为请求的类型（仅严格读取时返回）
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    /// 序列化/反序列化错误
    Serialization(String),
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),
    /// 配置解析失败
    ParseFailed(String),
    /// 配置值无效
    InvalidValue { field: String, message: String },
}

/// Shell 命令错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// 未知命令
    UnknownCommand(String),
    /// 缺少参数
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl StateError {
    /// 是否为 InvalidPath 类错误
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, StateError::Path(_))
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Path(e) => write!(f, "Invalid path: {}", e),
            StateError::Memory(e) => write!(f, "Memory Error: {}", e),
            StateError::Config(e) => write!(f, "Config Error: {}", e),
            StateError::Shell(e) => write!(f, "Shell Error: {}", e),
            StateError::Io(e) => write!(f, "IO Error: {}", e),
            StateError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "path is empty"),
            PathError::EmptySegment { path, position } => {
                write!(f, "empty segment at position {} in '{}'", position, path)
            }
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::TypeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "Value at '{}' is {}, cannot be read as {}",
                path, found, expected
            ),
            MemoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::UnknownCommand(cmd) => {
                write!(f, "Unknown command '{}', type 'help' for usage", cmd)
            }
            ShellError::MissingArgument { command, argument } => {
                write!(f, "'{}' requires <{}>", command, argument)
            }
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Path(e) => Some(e),
            StateError::Memory(e) => Some(e),
            StateError::Config(e) => Some(e),
            StateError::Shell(e) => Some(e),
            StateError::Io(e) => Some(e),
            StateError::Other(_) => None,
        }
    }
}

impl std::error::Error for PathError {}
impl std::error::Error for MemoryError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ShellError {}

// From 转换实现
impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::Io(err)
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Memory(MemoryError::Serialization(err.to_string()))
    }
}

impl From<serde_yaml::Error> for StateError {
    fn from(err: serde_yaml::Error) -> Self {
        StateError::Config(ConfigError::ParseFailed(err.to_string()))
    }
}

impl From<PathError> for StateError {
    fn from(err: PathError) -> Self {
        StateError::Path(err)
    }
}

impl From<MemoryError> for StateError {
    fn from(err: MemoryError) -> Self {
        StateError::Memory(err)
    }
}

impl From<ConfigError> for StateError {
    fn from(err: ConfigError) -> Self {
        StateError::Config(err)
    }
}

impl From<ShellError> for StateError {
    fn from(err: ShellError) -> Self {
        StateError::Shell(err)
    }
}

// 便捷的 Result 类型别名
pub type Result<T> = std::result::Result<T, StateError>;
