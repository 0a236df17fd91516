//! 分页模块
//! Pagination module
//!
//! 包含 Inspector 使用的从零开始的 `Pagination`，以及把降序页码映射到
//! 升序源页的 `DescWindow` 计算。
//! Holds the zero-based `Pagination` used by inspectors, and the `DescWindow`
//! arithmetic that maps a descending page number onto ascending source pages.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Pagination specifies the page size and page number for list operations.
/// 分页结构体，指定列表操作的页面大小和页面编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  /// Number of items in the page.
  /// 每页的项目数
  pub size: i64,
  /// Page number starting from zero.
  /// 从零开始的页面编号
  pub page: i64,
}

impl Pagination {
  /// 创建分页
  /// Create a pagination
  pub fn new(size: i64, page: i64) -> Self {
    Self { size, page }
  }

  /// 由从 1 开始的源页码创建分页
  /// Create a pagination from a 1-indexed source page number
  pub fn from_source_page(size: i64, source_page: i64) -> Self {
    Self {
      size,
      page: source_page - 1,
    }
  }

  /// Returns the start index for the current page.
  /// 返回当前页面的起始索引
  pub fn start(&self) -> i64 {
    self.size * self.page
  }

  /// Returns the stop index for the current page (inclusive).
  /// 返回当前页面的结束索引（包含）
  pub fn stop(&self) -> i64 {
    self.size * self.page + self.size - 1
  }
}

impl Default for Pagination {
  fn default() -> Self {
    Pagination { size: 20, page: 0 }
  }
}

/// 总页数；页面大小非正时为 0
/// Number of pages needed to hold `total` items; 0 when `page_size` is not positive
pub fn total_pages(total: i64, page_size: i64) -> i64 {
  if page_size <= 0 || total <= 0 {
    return 0;
  }
  (total - 1) / page_size + 1
}

/// 降序页在升序位置上的窗口
/// Window of ascending positions that backs one descending page
///
/// `[start, end)` 是升序位置的半开区间，`first_page..=last_page` 是覆盖它的
/// 最少的从 1 开始的源页。窗口宽度不超过页面大小，所以最多跨越两个源页。
/// `[start, end)` is a half-open interval over ascending positions and
/// `first_page..=last_page` the minimal run of 1-indexed source pages covering
/// it. The window is never wider than one page, so it spans at most two pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescWindow {
  /// 窗口起点（包含）
  /// Window start (inclusive)
  pub start: i64,
  /// 窗口终点（不包含）
  /// Window end (exclusive)
  pub end: i64,
  /// 页面大小
  /// Page size
  pub page_size: i64,
  /// 第一个源页（从 1 开始）
  /// First source page (1-indexed)
  pub first_page: i64,
  /// 最后一个源页（从 1 开始）
  /// Last source page (1-indexed)
  pub last_page: i64,
}

impl DescWindow {
  /// 计算降序第 `page_num` 页的窗口
  /// Compute the window for descending page `page_num`
  ///
  /// Returns `None` when no such page exists: non-positive page size, empty
  /// collection, or a page number outside `1..=total_pages`.
  pub fn compute(total: i64, page_size: i64, page_num: i64) -> Option<Self> {
    let pages = total_pages(total, page_size);
    if pages == 0 || page_num < 1 || page_num > pages {
      return None;
    }
    // page_num <= pages keeps the offset below total
    let end = (total - (page_num - 1) * page_size).clamp(0, total);
    let start = (end - page_size).max(0);
    let first_page = start / page_size + 1;
    let last_page = ((end - 1) / page_size + 1).max(first_page);
    Some(Self {
      start,
      end,
      page_size,
      first_page,
      last_page,
    })
  }

  /// 窗口中的项目数
  /// Number of items in the window
  pub fn len(&self) -> usize {
    (self.end - self.start) as usize
  }

  /// 窗口是否为空
  /// Whether the window is empty
  pub fn is_empty(&self) -> bool {
    self.end <= self.start
  }

  /// 是否跨越两个源页
  /// Whether the window straddles a source page boundary
  pub fn spans_two_pages(&self) -> bool {
    self.last_page > self.first_page
  }

  /// 需要获取的源页
  /// Source pages to fetch, ascending
  pub fn source_pages(&self) -> RangeInclusive<i64> {
    self.first_page..=self.last_page
  }

  /// 第一个源页起始处的绝对位置
  /// Absolute position at which `first_page` starts
  pub fn run_offset(&self) -> i64 {
    (self.first_page - 1) * self.page_size
  }

  /// 从拼接的升序结果中取出窗口并反转为降序
  /// Cut the window out of the stitched ascending run and reverse it
  ///
  /// A run shorter than expected (the collection shrank after `total` was
  /// read) yields whatever part of it still overlaps the window.
  pub fn extract<T>(&self, mut run: Vec<T>) -> Vec<T> {
    let offset = self.run_offset();
    let lo = (self.start - offset) as usize;
    let hi = (self.end - offset) as usize;
    if run.len() < hi {
      tracing::warn!(
        "Source returned {} items for pages {}..={}, expected at least {}",
        run.len(),
        self.first_page,
        self.last_page,
        hi
      );
    }
    run.truncate(hi);
    if lo >= run.len() {
      return Vec::new();
    }
    let mut page = run.split_off(lo);
    page.reverse();
    page
  }
}
