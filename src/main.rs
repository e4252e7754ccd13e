//! pre-commit - git hook 管理工具

mod hook_cli;

use std::path::PathBuf;

use clap::Parser;
use crash::{interruptible, ErrorHandler, ReportConfig};
use runtime::Store;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pre-commit")]
#[command(about = "A framework for managing git hooks", version)]
struct Cli {
    /// 工作目录（hook 环境缓存、崩溃日志）
    #[arg(long, global = true, env = "PRE_COMMIT_HOME")]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: hook_cli::HookCommands,
}

fn main() {
    // 日志走 stderr，stdout 留给错误摘要和报告
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = Store::new(cli.store_dir);
    let handler = ErrorHandler::new(ReportConfig::from_store(&store));

    handler.run(|| {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(interruptible(hook_cli::run(
            cli.command,
            &store,
            handler.config(),
        )))
    });
}
