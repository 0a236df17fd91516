//! 任务源模块
//! Task source module
//!
//! `TaskSource` 是 Inspector 一侧的接口：统计某个队列某种状态的任务数，并按升序分页列出。
//! `list_tasks_desc` 在其上提供最新在前的分页列表。
//! `TaskSource` is the inspector-side seam: count the tasks of a queue in one
//! state and list them in ascending pages. `list_tasks_desc` builds the
//! most-recent-first listing on top of it.

use crate::config::{
  ListConfig, DEFAULT_EXPORT_MAX_TASKS, DEFAULT_EXPORT_PAGE_SIZE, EXPORT_BATCH_SIZE,
};
use crate::desc::{list_desc_async, AsyncPageFetcher};
use crate::error::{Error, Result};
use crate::pagination::{total_pages, Pagination};
use crate::task::{TaskInfo, TaskPage, TaskState};
use async_trait::async_trait;
use futures_util::future::try_join_all;

/// 任务源特性
/// Task source trait
#[async_trait]
pub trait TaskSource: Send + Sync {
  /// 统计指定状态的任务数
  /// Count the tasks in the given state
  async fn count_tasks(&self, queue: &str, state: TaskState) -> Result<i64>;

  /// 按升序列出指定状态的任务，分页从零开始
  /// List tasks in the given state in ascending order, zero-based page
  async fn list_tasks(
    &self,
    queue: &str,
    state: TaskState,
    pagination: Pagination,
  ) -> Result<Vec<TaskInfo>>;
}

/// 把 1 开始的源页请求转换为 `TaskSource::list_tasks` 调用
/// Turns 1-indexed source page requests into `TaskSource::list_tasks` calls
struct StateFetcher<'a, S: ?Sized> {
  source: &'a S,
  queue: &'a str,
  state: TaskState,
  page_size: i64,
}

#[async_trait]
impl<'a, S> AsyncPageFetcher<TaskInfo> for StateFetcher<'a, S>
where
  S: TaskSource + ?Sized,
{
  type Error = Error;

  async fn fetch_page(&self, page: i64) -> Result<Vec<TaskInfo>> {
    self
      .source
      .list_tasks(
        self.queue,
        self.state,
        Pagination::from_source_page(self.page_size, page),
      )
      .await
  }
}

/// 列出最新在前的第 `page_num` 页任务
/// List page `page_num` of tasks, most recent first
///
/// 任务总数只读取一次；其后集合的变化不保证结果正确。
/// The total is read once; changes to the collection afterwards are not
/// accounted for.
pub async fn list_tasks_desc<S>(
  source: &S,
  queue: &str,
  state: TaskState,
  page_size: i64,
  page_num: i64,
) -> Result<TaskPage>
where
  S: TaskSource + ?Sized,
{
  let total = source.count_tasks(queue, state).await?;
  tracing::debug!(
    "Listing {} tasks of queue {} in descending order: total={}, page={}, size={}",
    state,
    queue,
    total,
    page_num,
    page_size
  );
  let fetcher = StateFetcher {
    source,
    queue,
    state,
    page_size,
  };
  let tasks = list_desc_async(total, page_size, page_num, &fetcher).await?;
  Ok(TaskPage::new(tasks, total, page_num, page_size))
}

/// 先按配置解析页面大小，再列出降序页
/// Resolve the page size through `config`, then list the descending page
pub async fn list_tasks_desc_with<S>(
  source: &S,
  config: &ListConfig,
  queue: &str,
  state: TaskState,
  page_size: Option<i64>,
  page_num: i64,
) -> Result<TaskPage>
where
  S: TaskSource + ?Sized,
{
  list_tasks_desc(source, queue, state, config.page_size(page_size), page_num).await
}

/// 按升序收集某个队列某种状态的全部任务，最多 `max_tasks` 个
/// Collect every task of a queue in one state, ascending, up to `max_tasks`
///
/// 源页按 `EXPORT_BATCH_SIZE` 个一批并发获取，并按页码顺序拼接。
/// 返回收集到的任务和读取时的任务总数，总数可能超过上限。
/// Source pages are fetched concurrently, `EXPORT_BATCH_SIZE` at a time, and
/// stitched in page order. Returns the collected tasks together with the total
/// at the time of the read, which may exceed the cap.
pub async fn list_all_tasks<S>(
  source: &S,
  queue: &str,
  state: TaskState,
  page_size: i64,
  max_tasks: i64,
) -> Result<(Vec<TaskInfo>, i64)>
where
  S: TaskSource + ?Sized,
{
  let total = source.count_tasks(queue, state).await?;
  if total > max_tasks {
    tracing::warn!(
      "Queue {} has {} {} tasks, export is limited to the first {}",
      queue,
      total,
      state,
      max_tasks
    );
  }
  let capped = total.min(max_tasks);
  let pages = total_pages(capped, page_size);
  tracing::debug!(
    "Exporting {} {} tasks of queue {} in {} pages of {}",
    capped,
    state,
    queue,
    pages,
    page_size
  );

  let mut tasks = Vec::new();
  let mut page = 1;
  while page <= pages {
    let last = pages.min(page.saturating_add(EXPORT_BATCH_SIZE as i64 - 1));
    let batch = try_join_all((page..=last).map(|k| {
      source.list_tasks(queue, state, Pagination::from_source_page(page_size, k))
    }))
    .await?;
    for items in batch {
      tasks.extend(items);
    }
    if last == pages {
      break;
    }
    page = last + 1;
  }
  tasks.truncate(capped.max(0) as usize);
  Ok((tasks, total))
}

/// 以默认的页面大小和上限导出任务
/// Export tasks with the default page size and cap
pub async fn export_tasks<S>(
  source: &S,
  queue: &str,
  state: TaskState,
) -> Result<(Vec<TaskInfo>, i64)>
where
  S: TaskSource + ?Sized,
{
  list_all_tasks(
    source,
    queue,
    state,
    DEFAULT_EXPORT_PAGE_SIZE,
    DEFAULT_EXPORT_MAX_TASKS,
  )
  .await
}
