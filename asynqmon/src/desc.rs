//! 降序分页模块
//! Descending pagination module
//!
//! 后端只能按时间升序（最旧的在前）、以固定页面大小、从 1 开始的页码列出任务，
//! 而监控界面需要最新的在前。本模块把降序页码翻译为最少的升序源页请求，
//! 拼接结果、截取所需窗口并反转。
//! Backends list tasks oldest first, one fixed-size 1-indexed page at a time,
//! while the monitor shows the most recent first. This module translates a
//! descending page number into the fewest ascending source page requests,
//! stitches the results, cuts out the requested window and reverses it.
//!
//! ```rust
//! use asynqmon::desc::list_desc;
//!
//! let all: Vec<i64> = (0..45).collect();
//! let page = list_desc(45, 20, 1, |page: i64| -> Result<Vec<i64>, ()> {
//!   let start = ((page - 1) * 20) as usize;
//!   let end = (start + 20).min(all.len());
//!   Ok(all.get(start..end).map(<[i64]>::to_vec).unwrap_or_default())
//! })
//! .unwrap();
//! assert_eq!(page.first(), Some(&44));
//! assert_eq!(page.last(), Some(&25));
//! ```

use crate::pagination::DescWindow;
use async_trait::async_trait;
use futures_util::future::try_join;

/// 升序源页获取器
/// Ascending source page fetcher
///
/// `fetch_page(k)` 返回位于 `[(k-1)*size, min(k*size, total))` 的项目，按升序排列。
/// `fetch_page(k)` returns the items at `[(k-1)*size, min(k*size, total))`,
/// ascending. A wholly out-of-range page is an empty vector, not an error.
pub trait PageFetcher<T> {
  /// 获取器的错误类型，原样返回给调用者
  /// Error type of the fetcher, returned to the caller unchanged
  type Error;

  /// 获取从 1 开始的源页
  /// Fetch a 1-indexed source page
  fn fetch_page(&mut self, page: i64) -> Result<Vec<T>, Self::Error>;
}

impl<T, E, F> PageFetcher<T> for F
where
  F: FnMut(i64) -> Result<Vec<T>, E>,
{
  type Error = E;

  fn fetch_page(&mut self, page: i64) -> Result<Vec<T>, E> {
    self(page)
  }
}

/// 异步升序源页获取器
/// Async ascending source page fetcher
#[async_trait]
pub trait AsyncPageFetcher<T: Send>: Send + Sync {
  /// 获取器的错误类型
  /// Error type of the fetcher
  type Error: Send;

  /// 获取从 1 开始的源页
  /// Fetch a 1-indexed source page
  async fn fetch_page(&self, page: i64) -> Result<Vec<T>, Self::Error>;
}

/// 列出降序第 `page_num` 页
/// List descending page `page_num`
///
/// 页面大小非正、集合为空或页码超出范围时返回空结果，且不调用获取器。
/// 获取器的任何错误都会立即中止并原样返回。
/// Returns an empty page without calling the fetcher when the page size is not
/// positive, the collection is empty or the page number is out of range. Any
/// fetcher error aborts the call and is returned unchanged.
pub fn list_desc<T, F>(
  total: i64,
  page_size: i64,
  page_num: i64,
  mut fetcher: F,
) -> Result<Vec<T>, F::Error>
where
  F: PageFetcher<T>,
{
  let Some(window) = DescWindow::compute(total, page_size, page_num) else {
    tracing::trace!(
      "No descending page {} for total={} page_size={}",
      page_num,
      total,
      page_size
    );
    return Ok(Vec::new());
  };
  tracing::debug!(
    "Descending page {} -> positions [{}, {}) from source pages {}..={}",
    page_num,
    window.start,
    window.end,
    window.first_page,
    window.last_page
  );

  let mut run = Vec::new();
  for page in window.source_pages() {
    run.extend(fetcher.fetch_page(page)?);
  }
  Ok(window.extract(run))
}

/// 异步列出降序第 `page_num` 页
/// List descending page `page_num` asynchronously
///
/// 窗口跨越两个源页时并发获取，结果按位置而不是完成顺序拼接。
/// When the window straddles two source pages both are fetched concurrently;
/// the results are stitched by position, not by completion order.
pub async fn list_desc_async<T, F>(
  total: i64,
  page_size: i64,
  page_num: i64,
  fetcher: &F,
) -> Result<Vec<T>, F::Error>
where
  T: Send,
  F: AsyncPageFetcher<T> + ?Sized,
{
  let Some(window) = DescWindow::compute(total, page_size, page_num) else {
    tracing::trace!(
      "No descending page {} for total={} page_size={}",
      page_num,
      total,
      page_size
    );
    return Ok(Vec::new());
  };
  tracing::debug!(
    "Descending page {} -> positions [{}, {}) from source pages {}..={}",
    page_num,
    window.start,
    window.end,
    window.first_page,
    window.last_page
  );

  let run = if window.spans_two_pages() {
    let (mut head, tail) = try_join(
      fetcher.fetch_page(window.first_page),
      fetcher.fetch_page(window.last_page),
    )
    .await?;
    head.extend(tail);
    head
  } else {
    fetcher.fetch_page(window.first_page).await?
  };
  Ok(window.extract(run))
}
