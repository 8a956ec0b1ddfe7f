use serde::Serialize;

/// Paging summary shown under the token table.
///
/// Every on-chain token is shown on a single page, so `page` is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    /// `onchain_count` wins over the fundamental feed's `fundamental_total`
    /// whenever it is non-zero.
    pub fn compute(onchain_count: u64, fundamental_total: Option<u64>, page_limit: u64) -> Self {
        let page = 1;
        let limit = if onchain_count > 0 {
            onchain_count
        } else {
            page_limit.max(1)
        };
        let total = if onchain_count > 0 {
            onchain_count
        } else {
            fundamental_total.unwrap_or(0)
        };
        let total_pages = total.div_ceil(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}
