//! turn-state —— 路径寻址记忆的交互式 shell
//!
//! ```bash
//! turn-state                                   # 交互模式
//! turn-state -c 'set a.b 1' -c 'dump'           # 批处理模式
//! turn-state --config turn-state.yaml -n scratch
//! ```

use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use tracing::{info, warn};
use turn_state::config::{Config, expand_tilde};
use turn_state::error::{Result, StateError};
use turn_state::memory::{Memory, PathStore};
use turn_state::shell::{Shell, ShellOutcome};

#[derive(Parser, Debug)]
#[command(name = "turn-state", version, about = "路径寻址会话记忆 shell")]
struct Args {
    /// YAML 配置文件
    #[arg(short = 'f', long, env = "TURN_STATE_CONFIG")]
    config: Option<PathBuf>,

    /// 覆盖默认命名空间
    #[arg(short = 'n', long)]
    namespace: Option<String>,

    /// 依次执行的命令，给出时不进入交互模式
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    }
    .with_namespace_override(args.namespace.clone())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.shell.log_filter.clone()),
        )
        .init();

    let store = PathStore::with_config(&config.memory)?;
    let mut shell = Shell::new(store);

    if !args.commands.is_empty() {
        for line in &args.commands {
            match shell.run_line(line)? {
                ShellOutcome::Print(text) => print_output(&text),
                ShellOutcome::Exit => break,
            }
        }
        return Ok(());
    }

    run_interactive(&mut shell, &config)
}

fn run_interactive(shell: &mut Shell, config: &Config) -> Result<()> {
    let mut editor = DefaultEditor::new().map_err(|e| StateError::Other(e.to_string()))?;
    let history = config.shell.history_file.as_deref().map(expand_tilde);
    if let Some(path) = &history {
        if editor.load_history(path).is_err() {
            info!(path = %path.display(), "📜 无历史记录，从空白开始");
        }
    }

    info!(namespace = %shell.store().default_namespace(), "🚀 turn-state shell 启动，输入 help 查看命令");

    loop {
        match editor.readline(&config.shell.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        warn!("记录历史失败: {e}");
                    }
                }
                match shell.run_line(&line) {
                    Ok(ShellOutcome::Print(text)) => print_output(&text),
                    Ok(ShellOutcome::Exit) => break,
                    Err(e) => eprintln!("❌ {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(StateError::Other(e.to_string())),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), "创建历史目录失败: {e}");
            }
        }
        if let Err(e) = editor.save_history(path) {
            warn!(path = %path.display(), "保存历史记录失败: {e}");
        }
    }
    Ok(())
}

fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}
