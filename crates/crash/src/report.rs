//! 诊断报告：版本信息、错误信息、调用栈

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use runtime::output::{decode_backslash_replace, write_line, write_line_b};
use runtime::{cmd_output_b, Store};

use crate::failure::Failure;

/// 日志文件名，位于 store 目录下，每次覆盖
pub const LOG_FILE_NAME: &str = "pre-commit.log";

/// 编译期记录的工具链信息，多行
const RUNTIME_VERSION: &str = concat!(
    env!("CRASH_RUSTC_VERSION"),
    "\ntarget: ",
    env!("CRASH_TARGET"),
    "\nprofile: ",
    env!("CRASH_PROFILE"),
);

/// 报告配置，在构造错误边界时确定
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub log_dir: PathBuf,
    pub tool_version: String,
    pub vcs_program: String,
    pub runtime_version: String,
    pub executable: String,
    pub os_family: String,
    pub os_platform: String,
}

impl ReportConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let executable = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());

        Self {
            log_dir: log_dir.into(),
            tool_version: runtime::VERSION.to_string(),
            vcs_program: "git".to_string(),
            runtime_version: RUNTIME_VERSION.to_string(),
            executable,
            os_family: std::env::consts::FAMILY.to_string(),
            os_platform: std::env::consts::OS.to_string(),
        }
    }

    pub fn from_store(store: &Store) -> Self {
        Self::new(store.directory())
    }

    pub fn with_vcs_program(mut self, program: impl Into<String>) -> Self {
        self.vcs_program = program.into();
        self
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}

/// `<program> --version`，失败时为 "unknown"
pub fn vcs_version(program: &str) -> String {
    match cmd_output_b(&[program, "--version"], None) {
        Ok(out) if out.returncode == Some(0) => {
            decode_backslash_replace(&out.stdout).trim_end().to_string()
        }
        Ok(out) => {
            tracing::warn!("{} --version exited with {:?}", program, out.returncode);
            "unknown".to_string()
        }
        Err(e) => {
            tracing::warn!("{} --version failed: {}", program, e);
            "unknown".to_string()
        }
    }
}

/// 一次失败对应的完整报告，构造后不可变
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    version_lines: Vec<String>,
    summary: Vec<u8>,
    trace: String,
}

impl DiagnosticReport {
    pub fn new(config: &ReportConfig, vcs_version: &str, failure: &Failure) -> Self {
        Self {
            version_lines: version_lines(config, vcs_version),
            summary: failure.summary(),
            trace: failure.trace().trim_end().to_string(),
        }
    }

    pub fn summary(&self) -> &[u8] {
        &self.summary
    }

    /// 版本信息块
    pub fn write_version_info(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_version_block(&self.version_lines, sink)
    }

    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.write_version_info(sink)?;
        write_line(sink, "")?;

        write_line(sink, "### error information")?;
        write_line(sink, "")?;
        write_line(sink, "```")?;
        write_line_b(sink, &self.summary)?;
        write_line(sink, "```")?;
        write_line(sink, "")?;
        write_line(sink, "```")?;
        write_line(sink, &self.trace)?;
        write_line(sink, "```")
    }
}

/// 单独输出版本信息块（`pre-commit debug-info`）
pub fn write_version_info(config: &ReportConfig, sink: &mut dyn Write) -> io::Result<()> {
    let lines = version_lines(config, &vcs_version(&config.vcs_program));
    write_version_block(&lines, sink)
}

fn version_lines(config: &ReportConfig, vcs_version: &str) -> Vec<String> {
    let mut lines = vec![
        format!("pre-commit version: {}", config.tool_version),
        format!("{} --version: {}", config.vcs_program, vcs_version),
        "rustc version:".to_string(),
    ];
    lines.extend(config.runtime_version.lines().map(|l| format!("    {}", l)));
    lines.push(format!("current_exe: {}", config.executable));
    lines.push(format!("os family: {}", config.os_family));
    lines.push(format!("os: {}", config.os_platform));
    lines
}

fn write_version_block(lines: &[String], sink: &mut dyn Write) -> io::Result<()> {
    write_line(sink, "### version information")?;
    write_line(sink, "")?;
    write_line(sink, "```")?;
    for line in lines {
        write_line(sink, line)?;
    }
    write_line(sink, "```")
}

/// 能否在目录中创建文件
fn is_writable(dir: &Path) -> bool {
    dir.is_dir()
        && tempfile::Builder::new()
            .prefix(".pre-commit-probe")
            .tempfile_in(dir)
            .is_ok()
}

/// 报告失败，返回退出码
///
/// 摘要先于任何文件操作写到 stdout。日志目录不可写或日志文件打开失败时，
/// 整份报告改写到 stdout。写入中的任何错误都只记录，不会掩盖原始失败。
pub fn log_failure(failure: &Failure, config: &ReportConfig, stdout: &mut dyn Write) -> i32 {
    let summary = failure.summary();
    if let Err(e) = write_line_b(stdout, &summary) {
        tracing::warn!("Failed to write error summary: {}", e);
    }

    let report = DiagnosticReport::new(config, &vcs_version(&config.vcs_program), failure);

    // 首次运行时目录可能还不存在
    if let Err(e) = Store::new(Some(config.log_dir.clone())).ensure_created() {
        tracing::warn!("Failed to create {}: {}", config.log_dir.display(), e);
    }

    let log_path = config.log_path();
    let log = if is_writable(&config.log_dir) {
        File::create(&log_path)
            .map_err(|e| tracing::warn!("Failed to open {}: {}", log_path.display(), e))
            .ok()
    } else {
        tracing::debug!("{} is not writable", config.log_dir.display());
        None
    };

    let written = match log {
        Some(mut file) => {
            let _ = write_line(stdout, &format!("Check the log at {}", log_path.display()));
            report.write_to(&mut file)
        }
        None => {
            let _ = write_line(stdout, &format!("Failed to write to log at {}", log_path.display()));
            report.write_to(stdout)
        }
    };
    if let Err(e) = written {
        tracing::warn!("Failed to write diagnostic report: {}", e);
    }

    failure.classification().exit_code()
}
