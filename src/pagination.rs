use serde::Serialize;

use crate::storage::Window;

/// 默认每页文章数
pub const DEFAULT_PER_PAGE: u64 = 9;

/// 分页位置
///
/// 页码从 1 开始；空结果集也有一页。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub total_pages: u64,
    pub per_page: u64,
    pub count: u64,
}

impl PageWindow {
    /// 根据结果总数和原始页码参数计算当前页
    ///
    /// 页码参数来自请求，不会失败：
    /// - 缺失、非数字 → 第一页
    /// - 小于 1 → 第一页
    /// - 超过总页数（包括溢出的超大数字）→ 最后一页
    pub fn resolve(count: u64, per_page: u64, requested: Option<&str>) -> Self {
        let per_page = per_page.max(1);
        let total_pages = count.div_ceil(per_page).max(1);

        let number = match parse_page_number(requested) {
            RequestedPage::First => 1,
            RequestedPage::Last => total_pages,
            RequestedPage::Number(n) if n < 1 => 1,
            RequestedPage::Number(n) => (n as u64).min(total_pages),
        };

        Self {
            number,
            total_pages,
            per_page,
            count,
        }
    }

    /// 当前页对应的查询窗口
    pub fn window(&self) -> Window {
        Window {
            offset: (self.number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[derive(Debug, PartialEq, Eq)]
enum RequestedPage {
    First,
    Last,
    Number(i64),
}

fn parse_page_number(raw: Option<&str>) -> RequestedPage {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return RequestedPage::First;
    };

    match raw.parse::<i64>() {
        Ok(n) => RequestedPage::Number(n),
        Err(_) => {
            let digits = raw.strip_prefix('+').unwrap_or(raw);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                RequestedPage::Last
            } else {
                RequestedPage::First
            }
        }
    }
}

/// 一页结果
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            current_page: window.number,
            total_pages: window.total_pages,
            count: window.count,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }

    /// 不分页的结果，整体视为唯一的一页
    pub fn single(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Self {
            items,
            current_page: 1,
            total_pages: 1,
            count,
            has_next: false,
            has_previous: false,
        }
    }
}
