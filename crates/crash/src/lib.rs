//! crash - 顶层错误边界
//!
//! 捕获逃逸的失败，分类，写诊断日志，按分类退出进程

mod failure;
mod handler;
mod panic;
mod report;

pub use failure::{Classification, Failure};
pub use handler::{interruptible, ErrorHandler};
pub use report::{
    log_failure, vcs_version, write_version_info, DiagnosticReport, ReportConfig, LOG_FILE_NAME,
};
