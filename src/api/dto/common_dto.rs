//! Shared DTO types used across multiple endpoints.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::TicketingError;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Number of items before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        let params = self.clamped();
        u64::from(params.page - 1).saturating_mul(u64::from(params.per_page))
    }

    /// Page size after clamping.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.clamped().per_page)
    }

    /// Builds the metadata for a listing of `total` items.
    #[must_use]
    pub fn meta(&self, total: u64) -> PaginationMeta {
        let params = self.clamped();
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(params.per_page)
        };
        PaginationMeta {
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        }
    }
}

/// Parses a string-encoded decimal amount from a request body.
///
/// # Errors
///
/// Returns [`TicketingError::InvalidRequest`] naming `field` if the value
/// is not a decimal number.
pub fn parse_decimal(value: &str, field: &str) -> Result<Decimal, TicketingError> {
    Decimal::from_str(value.trim())
        .map_err(|_| TicketingError::InvalidRequest(format!("invalid {field}: {value}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        }
        .clamped();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn offset_and_limit_follow_page() {
        let params = PaginationParams {
            page: 2,
            per_page: 2,
        };
        assert_eq!(params.offset(), 2);
        assert_eq!(params.limit(), 2);
        let meta = params.meta(5);
        assert_eq!(meta.total, 5);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn out_of_range_params_are_clamped_before_offset() {
        let params = PaginationParams {
            page: 0,
            per_page: 0,
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 1);
        assert_eq!(params.meta(0).total_pages, 0);
    }

    #[test]
    fn parse_decimal_reports_field() {
        assert_eq!(parse_decimal(" 12.50 ", "price").ok(), Some(Decimal::new(1250, 2)));
        let Err(err) = parse_decimal("twelve", "price") else {
            panic!("parse must fail");
        };
        assert!(err.to_string().contains("price"));
    }
}
