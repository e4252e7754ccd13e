//! 错误边界端到端场景

use crash::{interruptible, Classification, ErrorHandler, ReportConfig, LOG_FILE_NAME};
use runtime::{FatalError, Interrupted};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 测试用边界，VCS 程序不存在以免依赖本机 git
fn handler_in(dir: &Path) -> ErrorHandler {
    ErrorHandler::new(ReportConfig::new(dir).with_vcs_program("pre-commit-missing-vcs"))
}

fn load_config(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        return Err(FatalError::new("config missing").into());
    }
    Ok(fs::read_to_string(path)?)
}

#[test]
fn test_fatal_config_missing() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());
    let config_path = tmp.path().join(".pre-commit-config.yaml");

    let mut stdout = Vec::new();
    let result = handler.guard(&mut stdout, || load_config(&config_path));

    let classification = result.unwrap_err();
    assert_eq!(classification.exit_code(), 1);

    let stdout = String::from_utf8(stdout).unwrap();
    let log_path = tmp.path().join(LOG_FILE_NAME);
    assert!(stdout.contains("An error has occurred: FatalError: config missing"));
    assert!(stdout.contains(&format!("Check the log at {}", log_path.display())));

    let log = fs::read_to_string(&log_path).unwrap();
    let blocks: Vec<&str> = log.split("\n\n").collect();
    assert!(blocks[0].starts_with("### version information"));
    assert!(log.contains("pre-commit-missing-vcs --version: unknown"));
    assert!(log.contains("### error information\n\n```\nAn error has occurred: FatalError: config missing\n```"));
    assert!(log.ends_with("```\n"));
}

#[test]
fn test_division_by_zero_is_unexpected() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());

    let mut stdout = Vec::new();
    let result = handler.guard(&mut stdout, || {
        let divisor: i32 = "0".parse()?;
        Ok(10 / divisor)
    });

    assert_eq!(result, Err(Classification::Unexpected));
    assert_eq!(result.unwrap_err().exit_code(), 3);

    let stdout = String::from_utf8(stdout).unwrap();
    assert!(stdout.starts_with("An unexpected error has occurred: Panic: attempt to divide by zero\n"));

    let log = fs::read_to_string(tmp.path().join(LOG_FILE_NAME)).unwrap();
    assert!(log.contains("panicked at"));
    assert!(log.contains("stack backtrace:"));
}

#[test]
fn test_unexpected_error_value() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());

    let mut stdout = Vec::new();
    let result: Result<i32, _> = handler.guard(&mut stdout, || Ok("seven".parse::<i32>()?));

    assert_eq!(result, Err(Classification::Unexpected));
    let stdout = String::from_utf8(stdout).unwrap();
    assert!(stdout.starts_with("An unexpected error has occurred: ParseIntError: invalid digit"));
}

#[test]
fn test_interrupt() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());

    let mut stdout = Vec::new();
    let result: Result<(), _> = handler.guard(&mut stdout, || Err(Interrupted.into()));

    assert_eq!(result, Err(Classification::Interrupted));
    assert_eq!(Classification::Interrupted.exit_code(), 130);
    assert!(stdout.starts_with(b"Interrupted (^C): Interrupted: \n"));
}

#[test]
fn test_success_falls_through() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());

    let mut stdout = Vec::new();
    let result = handler.guard(&mut stdout, || Ok(vec![1, 2, 3]));

    assert_eq!(result, Ok(vec![1, 2, 3]));
    assert!(stdout.is_empty());
    assert!(!tmp.path().join(LOG_FILE_NAME).exists());
}

#[test]
fn test_log_dir_vanished() {
    let tmp = tempdir().unwrap();
    let store = tmp.path().join("store");
    fs::create_dir(&store).unwrap();
    let handler = handler_in(&store);

    let mut stdout = Vec::new();
    let result: Result<(), _> = handler.guard(&mut stdout, || {
        // body 删掉了日志目录，并用普通文件占住路径
        fs::remove_dir_all(&store)?;
        fs::write(&store, "")?;
        Err(FatalError::new("store gone").into())
    });

    assert_eq!(result.unwrap_err().exit_code(), 1);
    assert!(store.is_file());
    let stdout = String::from_utf8(stdout).unwrap();
    assert!(stdout.starts_with("An error has occurred: FatalError: store gone\n"));
    assert!(stdout.contains("Failed to write to log at"));
    assert!(stdout.contains("### version information"));
    assert!(stdout.contains("### error information"));
}

#[test]
fn test_log_path_unopenable() {
    let tmp = tempdir().unwrap();
    fs::create_dir(tmp.path().join(LOG_FILE_NAME)).unwrap();
    let handler = handler_in(tmp.path());

    let mut stdout = Vec::new();
    let result: Result<(), _> = handler.guard(&mut stdout, || Err(Interrupted.into()));

    assert_eq!(result.unwrap_err().exit_code(), 130);
    let stdout = String::from_utf8(stdout).unwrap();
    assert!(stdout.starts_with("Interrupted (^C): Interrupted: \n"));
    assert!(stdout.contains("Failed to write to log at"));
}

#[test]
fn test_undecodable_error_text() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());

    let mut stdout = Vec::new();
    let result: Result<(), _> = handler.guard(&mut stdout, || {
        Err(FatalError::from_bytes(b"hook output: \xc3\x28 \xff".to_vec()).into())
    });

    assert_eq!(result, Err(Classification::Fatal));
    assert!(stdout.starts_with(b"An error has occurred: FatalError: hook output: \xc3\x28 \xff\n"));
}

#[tokio::test]
async fn test_async_body_inside_boundary() {
    let tmp = tempdir().unwrap();
    let handler = handler_in(tmp.path());

    let err = interruptible(async {
        tokio::task::yield_now().await;
        Err::<(), _>(anyhow::Error::new(FatalError::new("async failure")))
    })
    .await
    .unwrap_err();

    let mut stdout = Vec::new();
    let result = handler.guard(&mut stdout, || Err::<(), _>(err));
    assert_eq!(result, Err(Classification::Fatal));
    assert!(stdout.starts_with(b"An error has occurred: FatalError: async failure\n"));
}
