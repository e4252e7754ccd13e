//! runtime - pre-commit 运行时基础设施
//!
//! 错误类型、输出、子进程调用与 store 目录解析

mod error;
pub mod output;
pub mod process;
mod store;

pub use error::{Error, FatalError, Interrupted, Result};
pub use process::{cmd_output_b, CalledProcessError, CmdOutput};
pub use store::Store;

/// 工具版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
