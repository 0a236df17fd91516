//! # asynqmon
//!
//! asynq 监控的任务列表核心：在只能按升序分页的后端之上提供最新在前的分页列表
//! Task listing core of the asynq monitor: most-recent-first pages on top of
//! backends that can only page in ascending order
//!
//! 后端（Redis、PostgreSQL）按时间从旧到新、以固定页面大小分页返回任务；
//! 监控界面的归档、重试、已完成等表格需要最新的任务排在第一页。
//! Backends (Redis, PostgreSQL) return tasks oldest first in fixed-size pages;
//! the archived, retry and completed tables of the monitor want the newest
//! tasks on the first page.
//!
//! ## 快速开始
//! ## Quick Start
//!
//! ```rust
//! use asynqmon::memdb::MemoryTaskSource;
//! use asynqmon::source::list_tasks_desc;
//! use asynqmon::task::{TaskInfo, TaskState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let source = MemoryTaskSource::new();
//!   source
//!     .add_tasks((0..45).map(|i| {
//!       TaskInfo::new(format!("task-{i}"), "default", "email:deliver", TaskState::Archived)
//!     }))
//!     .await;
//!
//!   let page = list_tasks_desc(&source, "default", TaskState::Archived, 20, 1).await?;
//!   assert_eq!(page.tasks[0].id, "task-44");
//!   assert_eq!(page.total_pages, 3);
//!   Ok(())
//! }
//! ```

pub mod config;
pub mod desc;
pub mod error;
pub mod memdb;
pub mod pagination;
pub mod source;
pub mod task;

pub use desc::{list_desc, list_desc_async, AsyncPageFetcher, PageFetcher};
pub use error::{Error, Result};
pub use source::{
  export_tasks, list_all_tasks, list_tasks_desc, list_tasks_desc_with, TaskSource,
};
