//! 行命令 shell
//!
//! 把一行文本解析为 [`ShellCommand`]，在 [`Shell`] 持有的 [`PathStore`] 上执行，
//! 返回要打印的文本。交互循环与参数解析在 `turn-state` 二进制里。

use crate::error::{Result, ShellError};
use crate::memory::{MemoryExt, PathStore};
use serde_json::Value;
use tracing::debug;

pub const HELP: &str = "\
commands:
  set <path> <value>   写入值（按 JSON 解析，失败则视为字符串）
  get <path>           读取值
  has <path>           是否存在
  del <path>           删除叶子
  dump [scope]         打印整棵树或某个作用域
  scopes               列出作用域
  clear <scope>        清空作用域
  help                 显示帮助
  exit | quit          退出";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Set { path: String, value: Value },
    Get { path: String },
    Has { path: String },
    Delete { path: String },
    Dump { scope: Option<String> },
    Scopes,
    Clear { scope: String },
    Help,
    Exit,
}

/// 执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ShellOutcome {
    Print(String),
    Exit,
}

impl ShellCommand {
    /// 解析一行输入；空行与 `#` 注释返回 `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "set" => {
                let (path, raw) = match rest.split_once(char::is_whitespace) {
                    Some((path, raw)) => (path, raw.trim()),
                    None => (rest, ""),
                };
                let path = required(path, "set", "path")?;
                let raw = required(raw, "set", "value")?;
                ShellCommand::Set {
                    path,
                    value: parse_value(&raw),
                }
            }
            "get" => ShellCommand::Get {
                path: required(rest, "get", "path")?,
            },
            "has" => ShellCommand::Has {
                path: required(rest, "has", "path")?,
            },
            "del" | "delete" => ShellCommand::Delete {
                path: required(rest, "del", "path")?,
            },
            "dump" => ShellCommand::Dump {
                scope: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "scopes" => ShellCommand::Scopes,
            "clear" => ShellCommand::Clear {
                scope: required(rest, "clear", "scope")?,
            },
            "help" | "?" => ShellCommand::Help,
            "exit" | "quit" => ShellCommand::Exit,
            other => return Err(ShellError::UnknownCommand(other.to_string()).into()),
        };
        Ok(Some(command))
    }
}

fn required(arg: &str, command: &'static str, argument: &'static str) -> Result<String> {
    if arg.is_empty() {
        return Err(ShellError::MissingArgument { command, argument }.into());
    }
    Ok(arg.to_string())
}

/// 按 JSON 解析，失败时整体作为字符串
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// 绑定一个存储的命令执行器
pub struct Shell {
    store: PathStore,
}

impl Shell {
    pub fn new(store: PathStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PathStore {
        &self.store
    }

    /// 解析并执行一行；空行返回空输出
    pub fn run_line(&mut self, line: &str) -> Result<ShellOutcome> {
        match ShellCommand::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(ShellOutcome::Print(String::new())),
        }
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<ShellOutcome> {
        debug!(?command, "⌨️ 执行命令");
        let output = match command {
            ShellCommand::Set { path, value } => {
                self.store.set_value(&path, value)?;
                "ok".to_string()
            }
            ShellCommand::Get { path } => match self.store.get_value::<Value>(&path)? {
                Some(value) => render(&value)?,
                None => "(absent)".to_string(),
            },
            ShellCommand::Has { path } => self.store.has_value(&path)?.to_string(),
            ShellCommand::Delete { path } => {
                self.store.delete_value(&path)?;
                "ok".to_string()
            }
            ShellCommand::Dump { scope: None } => render(&self.store.to_value())?,
            ShellCommand::Dump { scope: Some(scope) } => {
                let snapshot = self.store.to_value();
                match snapshot.get(&scope) {
                    Some(subtree) => render(subtree)?,
                    None => "(absent)".to_string(),
                }
            }
            ShellCommand::Scopes => self.store.scope_names().join("\n"),
            ShellCommand::Clear { scope } => {
                if self.store.clear_scope(&scope) {
                    "ok".to_string()
                } else {
                    "(absent)".to_string()
                }
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Exit => return Ok(ShellOutcome::Exit),
        };
        Ok(ShellOutcome::Print(output))
    }
}

fn render(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
