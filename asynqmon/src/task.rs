//! 任务模块
//! Task module
//!
//! 定义监控列出的任务信息和分页结果
//! Defines the task information listed by the monitor and the page result

use crate::error::{Error, Result};
use crate::pagination::total_pages;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 任务状态
/// Task state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
  /// 任务正在被处理
  /// Task is being processed
  Active,
  /// 任务准备好被处理
  /// Task is ready to be processed
  Pending,
  /// 任务被安排在将来某个时间处理
  /// Task is scheduled to be processed at a later time
  Scheduled,
  /// 任务之前失败了，安排在将来某个时间重试
  /// Task has failed before, scheduled to retry at a later time
  Retry,
  /// 任务被归档并存储以供检查
  /// Task is archived and stored for inspection
  Archived,
  /// 任务处理成功并保留到保留 TTL 过期
  /// Task is successfully processed and retained until retention TTL expires
  Completed,
  /// 任务在组中等待聚合
  /// Task is waiting for aggregation in the group
  Aggregating,
}

impl TaskState {
  /// 将任务状态转换为字符串
  /// Convert task state to string
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Pending => "pending",
      Self::Scheduled => "scheduled",
      Self::Retry => "retry",
      Self::Archived => "archived",
      Self::Completed => "completed",
      Self::Aggregating => "aggregating",
    }
  }
}

impl fmt::Display for TaskState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TaskState {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "active" => Ok(Self::Active),
      "pending" => Ok(Self::Pending),
      "scheduled" => Ok(Self::Scheduled),
      "retry" => Ok(Self::Retry),
      "archived" => Ok(Self::Archived),
      "completed" => Ok(Self::Completed),
      "aggregating" => Ok(Self::Aggregating),
      _ => Err(Error::InvalidTaskState {
        state: s.to_string(),
      }),
    }
  }
}

/// 任务信息
/// Task information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
  /// 任务标识符
  /// Task identifier
  pub id: String,
  /// 任务所属的队列名称
  /// Queue name to which the task belongs
  pub queue: String,
  /// 任务类型
  /// Task type
  pub task_type: String,
  /// 任务负载数据
  /// Task payload data
  pub payload: Vec<u8>,
  /// 任务状态
  /// Task state
  pub state: TaskState,
  /// 任务最大重试次数
  /// Maximum retry attempts for the task
  pub max_retry: i32,
  /// 任务已重试次数
  /// Number of times the task has been retried
  pub retried: i32,
  /// 上次失败的错误信息
  /// Error message from the last failure
  pub last_err: Option<String>,
  /// 上次失败时间
  /// Time of the last failure
  pub last_failed_at: Option<DateTime<Utc>>,
  /// 下次处理时间
  /// Next processing time
  pub next_process_at: Option<DateTime<Utc>>,
}

impl TaskInfo {
  /// 创建任务信息
  /// Create task information
  pub fn new(
    id: impl Into<String>,
    queue: impl Into<String>,
    task_type: impl Into<String>,
    state: TaskState,
  ) -> Self {
    Self {
      id: id.into(),
      queue: queue.into(),
      task_type: task_type.into(),
      payload: Vec::new(),
      state,
      max_retry: 25,
      retried: 0,
      last_err: None,
      last_failed_at: None,
      next_process_at: None,
    }
  }

  /// 设置负载
  /// Set the payload
  pub fn with_payload(mut self, payload: &[u8]) -> Self {
    self.payload = payload.to_vec();
    self
  }

  /// 记录一次失败
  /// Record a failure
  pub fn with_failure<S: Into<String>>(mut self, err: S, failed_at: DateTime<Utc>) -> Self {
    self.last_err = Some(err.into());
    self.last_failed_at = Some(failed_at);
    self
  }
}

/// 一页任务，最新的在前
/// One page of tasks, most recent first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPage {
  /// 降序排列的任务
  /// Tasks in descending order
  pub tasks: Vec<TaskInfo>,
  /// 读取时的任务总数
  /// Total task count at the time of the read
  pub total: i64,
  /// 从 1 开始的降序页码
  /// 1-indexed descending page number
  pub page: i64,
  /// 页面大小
  /// Page size
  pub page_size: i64,
  /// 总页数
  /// Total number of pages
  pub total_pages: i64,
}

impl TaskPage {
  pub(crate) fn new(tasks: Vec<TaskInfo>, total: i64, page: i64, page_size: i64) -> Self {
    Self {
      tasks,
      total,
      page,
      page_size,
      total_pages: total_pages(total, page_size),
    }
  }

  /// 是否还有更旧的页
  /// Whether an older page follows this one
  pub fn has_next(&self) -> bool {
    self.page >= 1 && self.page < self.total_pages
  }
}
