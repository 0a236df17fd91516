//! 配置模块
//! Configuration module
//!
//! 定义任务列表的页面大小策略
//! Defines the page size policy for task listings

use crate::error::{Error, Result};
use serde::Deserialize;

/// 默认页面大小
/// Default page size
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// 最大页面大小
/// Maximum page size
pub const MAX_PAGE_SIZE: i64 = 1000;

/// 导出时每个源页的大小
/// Source page size used when exporting
pub const DEFAULT_EXPORT_PAGE_SIZE: i64 = 100;

/// 导出的任务数上限
/// Maximum number of tasks collected by an export
pub const DEFAULT_EXPORT_MAX_TASKS: i64 = 10000;

/// 导出时每批并发请求的源页数
/// Number of source pages requested concurrently per export batch
pub const EXPORT_BATCH_SIZE: usize = 10;

/// 列表配置
/// Listing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
  /// 未指定页面大小时使用的值
  /// Page size used when the caller does not request one
  pub default_page_size: i64,
  /// 页面大小上限
  /// Upper bound for requested page sizes
  pub max_page_size: i64,
}

impl Default for ListConfig {
  fn default() -> Self {
    Self {
      default_page_size: DEFAULT_PAGE_SIZE,
      max_page_size: MAX_PAGE_SIZE,
    }
  }
}

impl ListConfig {
  /// 创建新的列表配置
  /// Create a new listing configuration
  pub fn new() -> Self {
    Self::default()
  }

  /// 设置默认页面大小
  /// Set the default page size
  pub fn default_page_size(mut self, size: i64) -> Result<Self> {
    if size <= 0 {
      return Err(Error::config("Default page size must be positive"));
    }
    if size > self.max_page_size {
      return Err(Error::config(
        "Default page size cannot exceed the maximum page size",
      ));
    }
    self.default_page_size = size;
    Ok(self)
  }

  /// 设置最大页面大小
  /// Set the maximum page size
  pub fn max_page_size(mut self, size: i64) -> Result<Self> {
    if size <= 0 {
      return Err(Error::config("Maximum page size must be positive"));
    }
    self.max_page_size = size;
    self.default_page_size = self.default_page_size.min(size);
    Ok(self)
  }

  /// 校验配置（用于反序列化得到的值）
  /// Validate the configuration (for deserialized values)
  pub fn validate(&self) -> Result<()> {
    if self.max_page_size <= 0 {
      return Err(Error::config("Maximum page size must be positive"));
    }
    if self.default_page_size <= 0 || self.default_page_size > self.max_page_size {
      return Err(Error::config(format!(
        "Default page size must be within 1..={}",
        self.max_page_size
      )));
    }
    Ok(())
  }

  /// 解析调用者请求的页面大小
  /// Resolve the page size requested by a caller
  ///
  /// Non-positive sizes pass through untouched so the listing resolves them
  /// to an empty page.
  pub fn page_size(&self, requested: Option<i64>) -> i64 {
    match requested {
      None => self.default_page_size,
      Some(size) => size.min(self.max_page_size),
    }
  }
}
