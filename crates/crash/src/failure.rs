//! 失败分类

use std::any::Any;
use std::error::Error as StdError;

use runtime::{CalledProcessError, FatalError, Interrupted};

/// 失败分类，决定提示信息和退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 预期内的领域错误
    Fatal,
    /// 用户中断
    Interrupted,
    /// 其他一切，包括 panic
    Unexpected,
}

impl Classification {
    /// 按优先级分类：Fatal > Interrupted > Unexpected
    pub fn classify(err: &anyhow::Error) -> Self {
        if contains::<FatalError>(err) {
            Self::Fatal
        } else if contains::<Interrupted>(err) {
            Self::Interrupted
        } else {
            Self::Unexpected
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Fatal => "An error has occurred",
            Self::Interrupted => "Interrupted (^C)",
            Self::Unexpected => "An unexpected error has occurred",
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Fatal => 1,
            Self::Interrupted => 130,
            Self::Unexpected => 3,
        }
    }
}

/// panic 现场
#[derive(Debug, Clone, Default)]
pub(crate) struct PanicSite {
    pub location: Option<String>,
    pub backtrace: String,
}

/// 被捕获的失败
#[derive(Debug, Clone)]
pub struct Failure {
    classification: Classification,
    kind: &'static str,
    text: Vec<u8>,
    trace: String,
}

impl Failure {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let classification = Classification::classify(err);
        let kind = match classification {
            Classification::Fatal => "FatalError",
            Classification::Interrupted => "Interrupted",
            Classification::Unexpected => err.chain().find_map(kind_name).unwrap_or("Error"),
        };

        Self {
            classification,
            kind,
            text: chain_bytes(err),
            trace: format!("{:?}", err),
        }
    }

    pub(crate) fn from_panic(payload: &(dyn Any + Send), site: Option<PanicSite>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        let site = site.unwrap_or_default();
        let location = site.location.unwrap_or_else(|| "<unknown>".to_string());
        let trace = format!(
            "panicked at {}:\n{}\n\nstack backtrace:\n{}",
            location, message, site.backtrace
        );

        Self {
            classification: Classification::Unexpected,
            kind: "Panic",
            text: message.into_bytes(),
            trace,
        }
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    /// 原始失败文本，不保证是 UTF-8
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// `<message>: <kind>: <text>`
    pub fn summary(&self) -> Vec<u8> {
        let mut summary = format!("{}: {}: ", self.classification.message(), self.kind).into_bytes();
        summary.extend_from_slice(&self.text);
        summary
    }
}

/// context 值和 source 链都算
fn contains<E>(err: &anyhow::Error) -> bool
where
    E: StdError + Send + Sync + 'static,
{
    err.downcast_ref::<E>().is_some() || err.chain().any(|e| e.is::<E>())
}

/// 错误链逐层以 ": " 连接，携带原始字节的错误保留字节
fn chain_bytes(err: &anyhow::Error) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, cause) in err.chain().enumerate() {
        if i > 0 {
            out.extend_from_slice(b": ");
        }
        if let Some(fatal) = cause.downcast_ref::<FatalError>() {
            out.extend_from_slice(fatal.as_bytes());
        } else if let Some(called) = cause.downcast_ref::<CalledProcessError>() {
            out.extend_from_slice(&called.to_bytes());
        } else {
            out.extend_from_slice(cause.to_string().as_bytes());
        }
    }
    out
}

fn kind_name(err: &(dyn StdError + 'static)) -> Option<&'static str> {
    if err.is::<CalledProcessError>() {
        Some("CalledProcessError")
    } else if err.is::<std::io::Error>() {
        Some("io::Error")
    } else if err.is::<std::str::Utf8Error>() {
        Some("Utf8Error")
    } else if err.is::<std::string::FromUtf8Error>() {
        Some("FromUtf8Error")
    } else if err.is::<std::num::ParseIntError>() {
        Some("ParseIntError")
    } else if err.is::<std::num::ParseFloatError>() {
        Some("ParseFloatError")
    } else {
        None
    }
}
