//! 错误类型

use thiserror::Error;

use crate::process::CalledProcessError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    CalledProcess(#[from] CalledProcessError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// 预期内的致命错误（配置缺失、hook 失败等），而不是程序缺陷
///
/// 消息以原始字节保存，可直接携带子进程输出
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", String::from_utf8_lossy(.0))]
pub struct FatalError(Vec<u8>);

impl FatalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into().into_bytes())
    }

    pub fn from_bytes(message: impl Into<Vec<u8>>) -> Self {
        Self(message.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// 用户中断 (^C)
#[derive(Error, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[error("")]
pub struct Interrupted;
