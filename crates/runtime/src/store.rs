//! Store - pre-commit 的持久化工作目录（hook 环境缓存、日志）

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const README: &str = "\
This directory is maintained by pre-commit.
It caches hook environments and keeps pre-commit.log from the last crash.
It is safe to delete; run `pre-commit clean` to do so.
";

/// 工作目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    directory: PathBuf,
}

impl Store {
    /// 解析目录：显式指定 > PRE_COMMIT_HOME > XDG_CACHE_HOME/pre-commit > ~/.cache/pre-commit
    pub fn new(directory: Option<PathBuf>) -> Self {
        let directory = directory.unwrap_or_else(Self::default_directory);
        Self { directory }
    }

    /// 从环境变量计算默认目录
    pub fn default_directory() -> PathBuf {
        default_directory_from(
            std::env::var_os("PRE_COMMIT_HOME"),
            std::env::var_os("XDG_CACHE_HOME"),
            dirs::home_dir(),
        )
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 确保目录存在；首次创建时写入 README
    pub fn ensure_created(&self) -> Result<()> {
        if self.directory.is_dir() {
            return Ok(());
        }
        tracing::debug!("Creating store at {}", self.directory.display());
        fs::create_dir_all(&self.directory)?;
        fs::write(self.directory.join("README"), README)?;
        Ok(())
    }

    /// 删除整个目录，返回是否真的删除了内容
    pub fn clean(&self) -> Result<bool> {
        if !self.directory.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&self.directory)?;
        Ok(true)
    }
}

fn default_directory_from(
    pre_commit_home: Option<OsString>,
    xdg_cache_home: Option<OsString>,
    home: Option<PathBuf>,
) -> PathBuf {
    // 空字符串等同未设置
    if let Some(dir) = pre_commit_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    let cache = match xdg_cache_home.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home.unwrap_or_else(|| PathBuf::from(".")).join(".cache"),
    };
    cache.join("pre-commit")
}
