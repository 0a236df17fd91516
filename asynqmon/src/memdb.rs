//! 内存任务源实现
//! Memory task source implementation
//!
//! 使用内存数据结构保存任务，不依赖任何外部服务，任务按加入顺序（升序）保存
//! Keeps tasks in in-memory data structures without any external service,
//! each queue/state list in insertion (ascending) order

use crate::error::{Error, Result};
use crate::pagination::Pagination;
use crate::source::TaskSource;
use crate::task::{TaskInfo, TaskState};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryData {
  queues: HashSet<String>,
  tasks: HashMap<(String, TaskState), Vec<TaskInfo>>,
}

/// 内存任务源
/// Memory task source
#[derive(Default)]
pub struct MemoryTaskSource {
  data: RwLock<MemoryData>,
}

impl MemoryTaskSource {
  /// 创建新的内存任务源
  /// Create a new memory task source
  pub fn new() -> Self {
    Self::default()
  }

  /// 注册队列
  /// Register a queue
  pub async fn add_queue(&self, queue: &str) {
    self.data.write().await.queues.insert(queue.to_string());
  }

  /// 追加任务，队列不存在时自动注册
  /// Append a task, registering its queue if needed
  pub async fn add_task(&self, task: TaskInfo) {
    let mut data = self.data.write().await;
    data.queues.insert(task.queue.clone());
    data
      .tasks
      .entry((task.queue.clone(), task.state))
      .or_default()
      .push(task);
  }

  /// 批量追加任务
  /// Append tasks in order
  pub async fn add_tasks<I>(&self, tasks: I)
  where
    I: IntoIterator<Item = TaskInfo>,
  {
    let mut data = self.data.write().await;
    for task in tasks {
      data.queues.insert(task.queue.clone());
      data
        .tasks
        .entry((task.queue.clone(), task.state))
        .or_default()
        .push(task);
    }
  }

  /// 删除指定队列某状态的所有任务，返回删除数量
  /// Remove every task of a queue in one state, returning how many were removed
  pub async fn clear(&self, queue: &str, state: TaskState) -> i64 {
    let mut data = self.data.write().await;
    data
      .tasks
      .remove(&(queue.to_string(), state))
      .map_or(0, |tasks| tasks.len() as i64)
  }
}

#[async_trait]
impl TaskSource for MemoryTaskSource {
  async fn count_tasks(&self, queue: &str, state: TaskState) -> Result<i64> {
    let data = self.data.read().await;
    if !data.queues.contains(queue) {
      return Err(Error::queue_not_found(queue));
    }
    Ok(
      data
        .tasks
        .get(&(queue.to_string(), state))
        .map_or(0, |tasks| tasks.len() as i64),
    )
  }

  async fn list_tasks(
    &self,
    queue: &str,
    state: TaskState,
    pagination: Pagination,
  ) -> Result<Vec<TaskInfo>> {
    let data = self.data.read().await;
    if !data.queues.contains(queue) {
      return Err(Error::queue_not_found(queue));
    }
    if pagination.page < 0 || pagination.size < 1 {
      return Ok(Vec::new());
    }
    let Some(tasks) = data.tasks.get(&(queue.to_string(), state)) else {
      return Ok(Vec::new());
    };
    let Some(start) = pagination.size.checked_mul(pagination.page) else {
      return Ok(Vec::new());
    };
    if start >= tasks.len() as i64 {
      return Ok(Vec::new());
    }
    let stop = start
      .saturating_add(pagination.size)
      .min(tasks.len() as i64);
    Ok(tasks[start as usize..stop as usize].to_vec())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn archived(queue: &str, n: usize) -> Vec<TaskInfo> {
    (0..n)
      .map(|i| TaskInfo::new(format!("task-{i}"), queue, "email:deliver", TaskState::Archived))
      .collect()
  }

  #[tokio::test]
  async fn test_list_tasks_ascending_pages() {
    let source = MemoryTaskSource::new();
    source.add_tasks(archived("default", 45)).await;

    let page = source
      .list_tasks("default", TaskState::Archived, Pagination::new(20, 2))
      .await
      .unwrap();
    let ids: Vec<_> = page.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["task-40", "task-41", "task-42", "task-43", "task-44"]);

    let past_end = source
      .list_tasks("default", TaskState::Archived, Pagination::new(20, 3))
      .await
      .unwrap();
    assert!(past_end.is_empty());
  }

  #[tokio::test]
  async fn test_degenerate_pagination() {
    let source = MemoryTaskSource::new();
    source.add_tasks(archived("default", 5)).await;
    for pagination in [Pagination::new(0, 0), Pagination::new(20, -1)] {
      let tasks = source
        .list_tasks("default", TaskState::Archived, pagination)
        .await
        .unwrap();
      assert!(tasks.is_empty());
    }
  }

  #[tokio::test]
  async fn test_overflowing_pagination() {
    let source = MemoryTaskSource::new();
    source.add_tasks(archived("default", 5)).await;
    let tasks = source
      .list_tasks("default", TaskState::Archived, Pagination::new(i64::MAX, 2))
      .await
      .unwrap();
    assert!(tasks.is_empty());

    let tasks = source
      .list_tasks("default", TaskState::Archived, Pagination::new(i64::MAX, 0))
      .await
      .unwrap();
    assert_eq!(tasks.len(), 5);
  }

  #[tokio::test]
  async fn test_unknown_queue() {
    let source = MemoryTaskSource::new();
    assert_eq!(
      source.count_tasks("missing", TaskState::Retry).await,
      Err(Error::queue_not_found("missing"))
    );
    source.add_queue("empty").await;
    assert_eq!(source.count_tasks("empty", TaskState::Retry).await, Ok(0));
  }

  #[tokio::test]
  async fn test_clear() {
    let source = MemoryTaskSource::new();
    source.add_tasks(archived("default", 3)).await;
    assert_eq!(source.clear("default", TaskState::Archived).await, 3);
    assert_eq!(
      source.count_tasks("default", TaskState::Archived).await,
      Ok(0)
    );
  }
}
