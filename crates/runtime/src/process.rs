//! 子进程调用

use std::ffi::OsStr;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::error::Result;

/// 子进程输出
#[derive(Debug, Clone)]
pub struct CmdOutput {
    /// 被信号终止时为 None
    pub returncode: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// 子进程返回码与期望不符
#[derive(Error, Debug, Clone)]
#[error("{}", String::from_utf8_lossy(&self.to_bytes()))]
pub struct CalledProcessError {
    pub cmd: Vec<String>,
    pub returncode: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CalledProcessError {
    /// 以原始字节渲染，保留子进程输出中的非 UTF-8 内容
    pub fn to_bytes(&self) -> Vec<u8> {
        let returncode = match self.returncode {
            Some(code) => code.to_string(),
            None => "(killed by signal)".to_string(),
        };
        let mut out = format!("command: {:?}\nreturn code: {}\n", self.cmd, returncode).into_bytes();
        for (name, stream) in [("stdout", &self.stdout), ("stderr", &self.stderr)] {
            out.extend_from_slice(name.as_bytes());
            out.push(b':');
            if stream.is_empty() {
                out.extend_from_slice(b" (none)\n");
                continue;
            }
            out.push(b'\n');
            for line in stream.trim_ascii_end().split(|b| *b == b'\n') {
                out.extend_from_slice(b"    ");
                out.extend_from_slice(line);
                out.push(b'\n');
            }
        }
        out.truncate(out.trim_ascii_end().len());
        out
    }
}

/// 运行命令并收集字节输出
///
/// `retcode` 为 Some 时，返回码不一致视为错误；为 None 时不检查。
/// 无法启动（如可执行文件不存在）返回 `Error::Io`。
pub fn cmd_output_b<S: AsRef<OsStr>>(cmd: &[S], retcode: Option<i32>) -> Result<CmdOutput> {
    let cmd_display: Vec<String> = cmd
        .iter()
        .map(|s| s.as_ref().to_string_lossy().into_owned())
        .collect();
    let (program, args) = match cmd.split_first() {
        Some(parts) => parts,
        None => {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command").into())
        }
    };

    tracing::debug!("Running {:?}", cmd_display);
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()?;

    let result = CmdOutput {
        returncode: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    };

    match retcode {
        Some(expected) if result.returncode != Some(expected) => Err(CalledProcessError {
            cmd: cmd_display,
            returncode: result.returncode,
            stdout: result.stdout,
            stderr: result.stderr,
        }
        .into()),
        _ => Ok(result),
    }
}
