// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filtered, paginated item listing

use crate::error::EngineError;
use crate::id::UserId;
use crate::item::PipelineItem;
use crate::stage::Stage;
use crate::status::PipelineStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Status filter for a listing: one status, or `any`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    Any,
    Only(PipelineStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Only(PipelineStatus::Active)
    }
}

impl StatusFilter {
    pub fn matches(&self, status: PipelineStatus) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Only(s) => *s == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("any") {
            return Ok(StatusFilter::Any);
        }
        PipelineStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .map(StatusFilter::Only)
            .ok_or_else(|| EngineError::Validation {
                field: "status",
                reason: format!("unknown status '{s}'"),
            })
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::Any => f.write_str("any"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Listing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemQuery {
    pub status: StatusFilter,
    pub stage: Option<Stage>,
    pub owner_id: Option<UserId>,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::default(),
            stage: None,
            owner_id: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(self, status: PipelineStatus) -> Self {
        Self {
            status: StatusFilter::Only(status),
            ..self
        }
    }

    pub fn any_status(self) -> Self {
        Self {
            status: StatusFilter::Any,
            ..self
        }
    }

    pub fn stage(self, stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..self
        }
    }

    pub fn owner(self, owner_id: impl Into<UserId>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            ..self
        }
    }

    pub fn page(self, page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.page < 1 {
            return Err(EngineError::Validation {
                field: "page",
                reason: "page must be at least 1".to_string(),
            });
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(EngineError::Validation {
                field: "page_size",
                reason: format!("page size must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        Ok(())
    }

    /// Removed items never match
    pub fn matches(&self, item: &PipelineItem) -> bool {
        !item.is_deleted()
            && self.status.matches(item.status())
            && self.stage.is_none_or(|stage| item.stage() == stage)
            && self.owner_id.as_ref().is_none_or(|owner| item.owner_id() == owner)
    }

    /// Select one page of matching items, most recently moved first
    pub fn run<'a>(
        &self,
        items: impl IntoIterator<Item = &'a PipelineItem>,
    ) -> Result<Page<PipelineItem>, EngineError> {
        self.validate()?;

        let mut matching: Vec<&PipelineItem> =
            items.into_iter().filter(|item| self.matches(item)).collect();
        matching.sort_by(|a, b| {
            b.last_stage_change_at()
                .cmp(&a.last_stage_change_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        let total = matching.len();
        let offset = (self.page as usize - 1).saturating_mul(self.page_size as usize);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(self.page_size as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching items across all pages
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1) as usize)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
