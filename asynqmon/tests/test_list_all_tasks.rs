use asynqmon::error::{Error, Result};
use asynqmon::memdb::MemoryTaskSource;
use asynqmon::pagination::Pagination;
use asynqmon::source::{export_tasks, list_all_tasks, TaskSource};
use asynqmon::task::{TaskInfo, TaskState};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

async fn source_with(total: usize) -> MemoryTaskSource {
  let source = MemoryTaskSource::new();
  source
    .add_tasks(
      (0..total).map(|i| TaskInfo::new(format!("task-{i}"), "default", "email:deliver", TaskState::Archived)),
    )
    .await;
  source
}

fn ids(tasks: &[TaskInfo]) -> Vec<String> {
  tasks.iter().map(|t| t.id.clone()).collect()
}

fn expected(range: std::ops::Range<usize>) -> Vec<String> {
  range.map(|i| format!("task-{i}")).collect()
}

/// 让较早的页更慢返回，并记录并发请求数
/// Makes lower pages answer later and records how many requests overlap
struct SlowSource {
  inner: MemoryTaskSource,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
  pages: Mutex<Vec<i64>>,
  failing_page: Option<i64>,
}

impl SlowSource {
  fn new(inner: MemoryTaskSource) -> Self {
    Self {
      inner,
      in_flight: AtomicUsize::new(0),
      max_in_flight: AtomicUsize::new(0),
      pages: Mutex::new(Vec::new()),
      failing_page: None,
    }
  }
}

#[async_trait]
impl TaskSource for SlowSource {
  async fn count_tasks(&self, queue: &str, state: TaskState) -> Result<i64> {
    self.inner.count_tasks(queue, state).await
  }

  async fn list_tasks(
    &self,
    queue: &str,
    state: TaskState,
    pagination: Pagination,
  ) -> Result<Vec<TaskInfo>> {
    self.pages.lock().unwrap().push(pagination.page);
    let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let delay = 30_u64.saturating_sub((pagination.page as u64 % 10) * 3);
    tokio::time::sleep(Duration::from_millis(delay)).await;
    self.in_flight.fetch_sub(1, Ordering::SeqCst);
    if Some(pagination.page) == self.failing_page {
      return Err(Error::broker("connection reset"));
    }
    self.inner.list_tasks(queue, state, pagination).await
  }
}

#[tokio::test]
async fn test_collects_every_task_in_order() {
  let source = source_with(45).await;
  let (tasks, total) = list_all_tasks(&source, "default", TaskState::Archived, 20, 10000)
    .await
    .unwrap();
  assert_eq!(total, 45);
  assert_eq!(ids(&tasks), expected(0..45));
}

#[tokio::test]
async fn test_batches_keep_page_order() {
  let source = SlowSource::new(source_with(2500).await);
  let (tasks, total) = list_all_tasks(&source, "default", TaskState::Archived, 100, 10000)
    .await
    .unwrap();
  assert_eq!(total, 2500);
  assert_eq!(ids(&tasks), expected(0..2500));

  let mut pages = source.pages.lock().unwrap().clone();
  pages.sort();
  assert_eq!(pages, (0..25).collect::<Vec<i64>>());
  let max = source.max_in_flight.load(Ordering::SeqCst);
  assert!(max <= 10, "at most one batch in flight, saw {max}");
}

#[tokio::test]
async fn test_cap_truncates_and_reports_total() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::new("asynqmon=debug"))
    .with_test_writer()
    .try_init();

  let source = SlowSource::new(source_with(150).await);
  let (tasks, total) = list_all_tasks(&source, "default", TaskState::Archived, 50, 120)
    .await
    .unwrap();
  assert_eq!(total, 150);
  assert_eq!(ids(&tasks), expected(0..120));

  let mut pages = source.pages.lock().unwrap().clone();
  pages.sort();
  assert_eq!(pages, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_error_in_later_batch_propagates() {
  let mut source = SlowSource::new(source_with(1500).await);
  source.failing_page = Some(12);
  let result = list_all_tasks(&source, "default", TaskState::Archived, 100, 10000).await;
  assert_eq!(result, Err(Error::broker("connection reset")));
}

#[tokio::test]
async fn test_degenerate_inputs_are_empty() {
  let source = source_with(10).await;
  let (tasks, total) = list_all_tasks(&source, "default", TaskState::Archived, 0, 10000)
    .await
    .unwrap();
  assert!(tasks.is_empty());
  assert_eq!(total, 10);

  let (tasks, _) = list_all_tasks(&source, "default", TaskState::Retry, 100, 10000)
    .await
    .unwrap();
  assert!(tasks.is_empty());

  let result = list_all_tasks(&source, "missing", TaskState::Archived, 100, 10000).await;
  assert_eq!(result, Err(Error::queue_not_found("missing")));
}

#[tokio::test]
async fn test_export_defaults() {
  let source = source_with(250).await;
  let (tasks, total) = export_tasks(&source, "default", TaskState::Archived)
    .await
    .unwrap();
  assert_eq!(total, 250);
  assert_eq!(ids(&tasks), expected(0..250));
}
