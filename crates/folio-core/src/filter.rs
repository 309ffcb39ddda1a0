//! Post listing filters.
//!
//! Raw query parameters are turned into a [`PostFilter`] here, before any
//! storage is touched. Every field of a `PostFilter` is either absent or
//! already validated, so readers can trust it as-is.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::DomainError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Columns a post listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    PublishedAt,
    Title,
}

impl SortColumn {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "published_at" => Some(Self::PublishedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Validated, normalized listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<i64>,
    /// Inclusive lower bound, midnight UTC of the requested day.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound, 23:59:59.999 UTC of the requested day.
    pub to: Option<DateTime<Utc>>,
    /// Trimmed search needle.
    pub q: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            author_id: None,
            from: None,
            to: None,
            q: None,
            sort: SortColumn::default(),
            order: SortOrder::default(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PostFilter {
    /// Validate raw query parameters. Unknown keys are ignored; the first
    /// violation is reported as [`DomainError::InvalidParameter`].
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, DomainError> {
        let mut filter = Self::default();

        if let Some(raw) = params.get("author_id") {
            filter.author_id = Some(
                parse_positive(raw)
                    .ok_or_else(|| invalid("author_id must be an integer >= 1"))?,
            );
        }

        if let Some(raw) = params.get("from") {
            let day = parse_day(raw)
                .ok_or_else(|| invalid("from must be a date in YYYY-MM-DD format"))?;
            filter.from = day.and_hms_opt(0, 0, 0).map(|start| start.and_utc());
        }

        if let Some(raw) = params.get("to") {
            let day = parse_day(raw)
                .ok_or_else(|| invalid("to must be a date in YYYY-MM-DD format"))?;
            filter.to = day
                .and_hms_milli_opt(23, 59, 59, 999)
                .map(|end| end.and_utc());
        }

        if let Some(raw) = params.get("q") {
            let needle = raw.trim();
            if needle.is_empty() {
                return Err(invalid("q must not be empty"));
            }
            filter.q = Some(needle.to_string());
        }

        if let Some(raw) = params.get("sort") {
            filter.sort = SortColumn::parse(raw)
                .ok_or_else(|| invalid("sort must be one of: published_at, title"))?;
        }

        if let Some(raw) = params.get("order") {
            filter.order =
                SortOrder::parse(raw).ok_or_else(|| invalid("order must be one of: asc, desc"))?;
        }

        if let Some(raw) = params.get("page") {
            filter.page = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| invalid("page must be an integer >= 1"))?;
        }

        if let Some(raw) = params.get("per_page") {
            filter.per_page = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_PER_PAGE).contains(size))
                .ok_or_else(|| invalid("per_page must be an integer between 1 and 100"))?;
        }

        Ok(filter)
    }

    /// Number of rows to skip for the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

fn invalid(message: &str) -> DomainError {
    DomainError::InvalidParameter(message.to_string())
}

/// Parse a strictly positive integer, as used for ids in paths and queries.
pub fn parse_positive(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|value| *value >= 1)
}

/// Accept exactly `YYYY-MM-DD` naming a real calendar day.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
