//! 子命令

use std::io::Write;

use anyhow::Context;
use clap::Subcommand;
use crash::ReportConfig;
use runtime::{cmd_output_b, FatalError, Store};

#[derive(Subcommand)]
pub enum HookCommands {
    /// 运行一个 hook 命令，非零退出视为失败
    Run {
        /// 命令及参数
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// 删除工作目录
    Clean,
    /// 输出版本信息（与崩溃日志中的版本块相同）
    DebugInfo,
}

pub async fn run(cmd: HookCommands, store: &Store, config: &ReportConfig) -> anyhow::Result<()> {
    match cmd {
        HookCommands::Run { command } => run_hook(command, store).await,
        HookCommands::Clean => {
            if store.clean()? {
                println!("Cleaned {}.", store.directory().display());
            }
            Ok(())
        }
        HookCommands::DebugInfo => {
            let mut stdout = std::io::stdout();
            crash::write_version_info(config, &mut stdout)?;
            Ok(())
        }
    }
}

async fn run_hook(command: Vec<String>, store: &Store) -> anyhow::Result<()> {
    store.ensure_created().context("initializing store")?;

    let hook_line = command.join(" ");
    tracing::info!("Running hook: {}", hook_line);
    let program = command.first().cloned().unwrap_or_default();
    let out = match tokio::task::spawn_blocking(move || cmd_output_b(&command, None)).await? {
        Ok(out) => out,
        Err(runtime::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FatalError::new(format!("Executable `{}` not found", program)).into());
        }
        Err(e) => return Err(e.into()),
    };

    let mut stdout = std::io::stdout();
    stdout.write_all(&out.stdout)?;
    stdout.flush()?;

    if out.returncode == Some(0) {
        return Ok(());
    }

    let mut message = failure_message(&hook_line, out.returncode).into_bytes();
    if !out.stderr.is_empty() {
        message.push(b'\n');
        message.extend_from_slice(out.stderr.trim_ascii_end());
    }
    Err(FatalError::from_bytes(message).into())
}

fn failure_message(hook_line: &str, returncode: Option<i32>) -> String {
    match returncode {
        Some(code) => format!("hook `{}` failed (return code {})", hook_line, code),
        None => format!("hook `{}` failed (killed by signal)", hook_line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message() {
        assert_eq!(
            failure_message("cargo fmt --check", Some(2)),
            "hook `cargo fmt --check` failed (return code 2)"
        );
        assert_eq!(
            failure_message("flake8", None),
            "hook `flake8` failed (killed by signal)"
        );
    }
}
