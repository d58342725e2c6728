use pushkind_common::repository::errors::RepositoryError;
use serde::Serialize;
use thiserror::Error;

use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// Errors surfaced by the service layer. Routes map each variant to a status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthorized,
    #[error("permission denied")]
    Forbidden,
    #[error("not found")]
    NotFound,
    /// Client error with a message that is returned to the caller as is.
    #[error("{0}")]
    Form(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: usize,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: usize, page: usize, per_page: usize, results: Vec<T>) -> Self {
        Self {
            count,
            page,
            per_page,
            results,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.per_page) < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            per_page: self.per_page,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Parse a 1-based page number. Absent means the first page.
pub(crate) fn parse_page(raw: Option<&str>) -> ServiceResult<usize> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(1),
        Some(value) => match value.parse::<usize>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(ServiceError::Form("Неправильная страница.".to_string())),
        },
    }
}

/// Parse a positive size parameter such as `limit`, ignoring malformed input.
pub(crate) fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

/// Page size from `limit`, falling back to the default for malformed values
/// and clamped to [`MAX_PAGE_SIZE`].
pub(crate) fn parse_page_size(raw: Option<&str>) -> usize {
    parse_positive(raw)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE)
}

/// `1` and `true` enable a boolean filter. Everything else leaves it off.
pub(crate) fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true")
    )
}

/// A page past the end of a non-empty result is reported as missing.
pub(crate) fn ensure_page_exists(page: usize, per_page: usize, count: usize) -> ServiceResult<()> {
    if page > 1 && (page - 1).saturating_mul(per_page) >= count {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}
