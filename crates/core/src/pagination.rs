//! Page/limit contract shared by every listing operation.
//!
//! Pages are 1-based. Limits above [`MAX_LIMIT`] are clamped rather than
//! rejected, and a page past the end yields an empty `data` list.

use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};

pub const MAX_LIMIT: u64 = 100;

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

/// Raw query parameters as a caller supplies them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> ScheduleResult<Self> {
        if page == 0 {
            return Err(ScheduleError::Validation("page must be at least 1".to_string()));
        }
        if limit == 0 {
            return Err(ScheduleError::Validation("limit must be at least 1".to_string()));
        }

        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl TryFrom<PaginationParams> for PageRequest {
    type Error = ScheduleError;

    fn try_from(params: PaginationParams) -> ScheduleResult<Self> {
        PageRequest::new(params.page, params.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationResult<T> {
    pub count: u64,
    pub total_page: u64,
    pub page: u64,
    pub limit: u64,
    pub next_page: Option<u64>,
    pub previous_page: Option<u64>,
    pub data: Vec<T>,
}

impl<T> PaginationResult<T> {
    pub fn new(request: PageRequest, count: u64, data: Vec<T>) -> Self {
        let total_page = count.div_ceil(request.limit);
        let page = request.page;

        Self {
            count,
            total_page,
            page,
            limit: request.limit,
            next_page: page.checked_add(1).filter(|next| *next <= total_page),
            previous_page: page.checked_sub(1).filter(|previous| *previous >= 1),
            data,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            count: self.count,
            total_page: self.total_page,
            page: self.page,
            limit: self.limit,
            next_page: self.next_page,
            previous_page: self.previous_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
