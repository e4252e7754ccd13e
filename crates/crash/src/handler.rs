//! 错误边界 - 包住整个程序，失败时报告并退出

use std::future::Future;
use std::io::{self, Write};

use runtime::Interrupted;

use crate::failure::{Classification, Failure};
use crate::panic;
use crate::report::{log_failure, ReportConfig};

/// 顶层错误边界，每个进程只应有一个，位于最外层
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    config: ReportConfig,
}

impl ErrorHandler {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 运行 body；body 返回 Err 或 panic 时写报告到 `stdout`/日志并返回分类
    ///
    /// 正常完成时不产生任何输出。
    pub fn guard<T, F>(&self, stdout: &mut dyn Write, body: F) -> Result<T, Classification>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let failure = match panic::catch(body) {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => Failure::from_error(&err),
            Err(failure) => failure,
        };

        let classification = failure.classification();
        tracing::debug!("Caught {:?} failure: {}", classification, failure.kind());
        log_failure(&failure, &self.config, stdout);
        Err(classification)
    }

    /// 运行 body；失败时报告后以分类对应的退出码终止进程
    pub fn run<T, F>(&self, body: F) -> T
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let mut stdout = io::stdout();
        match self.guard(&mut stdout, body) {
            Ok(value) => value,
            Err(classification) => {
                let _ = stdout.flush();
                std::process::exit(classification.exit_code())
            }
        }
    }
}

/// 与 Ctrl-C 竞速；先收到信号则返回 `Interrupted`
///
/// 信号注册失败时只等待 body。
pub async fn interruptible<T, F>(body: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    tokio::select! {
        result = body => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::debug!("Received Ctrl-C");
            Err(Interrupted.into())
        }
    }
}
