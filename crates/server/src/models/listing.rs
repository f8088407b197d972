use serde::Deserialize;

use crate::error::{RequestError, ValidationError};
use crate::models::message::MessageId;
use crate::server::constants::MAX_LISTING_ELEMENTS;

pub const DEFAULT_LIMIT: i32 = 100;
pub const DEFAULT_PAGE: i32 = 1;

/// Raw `?limit=&page=&offset=` query of listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub limit: Option<i32>,
    pub page: Option<i32>,
    pub offset: Option<MessageId>,
}

/// `Offset` continues after the last seen message id instead of counting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    Page { limit: i32, page: i32 },
    Offset { offset: MessageId, limit: i32 },
}

fn check_limit(limit: i32) -> Result<(), ValidationError> {
    if limit < 1 {
        return Err(ValidationError::InvalidInput {
            value: limit.to_string(),
            reason: "limit should be >= 1".to_string(),
        });
    }
    if limit > MAX_LISTING_ELEMENTS {
        return Err(ValidationError::LimitExceeded {
            subject: "listing limit".to_string(),
            unit: "element".to_string(),
            attempted: limit as usize,
            limit: MAX_LISTING_ELEMENTS as usize,
        });
    }
    Ok(())
}

fn check_at_least(value: i64, min: i64, name: &str) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::InvalidInput {
            value: value.to_string(),
            reason: format!("{name} should be >= {min}"),
        });
    }
    Ok(())
}

impl ListingMode {
    pub fn from_query(query: ListingQuery) -> Result<Self, RequestError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        check_limit(limit)?;
        match (query.offset, query.page) {
            (Some(_), Some(_)) => Err(ValidationError::InvalidInput {
                value: "page".to_string(),
                reason: "page cannot be used with offset mode".to_string(),
            }
            .into()),
            (Some(offset), None) => {
                check_at_least(offset, 0, "offset")?;
                Ok(Self::Offset { offset, limit })
            }
            (None, page) => {
                let page = page.unwrap_or(DEFAULT_PAGE);
                check_at_least(page.into(), 1, "page")?;
                Ok(Self::Page { limit, page })
            }
        }
    }

    pub fn limit(&self) -> i32 {
        match self {
            Self::Page { limit, .. } | Self::Offset { limit, .. } => *limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_value(err: RequestError) -> String {
        match err {
            RequestError::Validation(ValidationError::InvalidInput { value, .. }) => value,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn empty_query_is_first_default_page() {
        let mode = ListingMode::from_query(ListingQuery::default()).unwrap();
        assert_eq!(
            mode,
            ListingMode::Page {
                limit: DEFAULT_LIMIT,
                page: DEFAULT_PAGE
            }
        );
    }

    #[test]
    fn offset_switches_to_offset_mode() {
        let mode = ListingMode::from_query(ListingQuery {
            limit: Some(25),
            offset: Some(42),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(mode, ListingMode::Offset { offset: 42, limit: 25 });
        assert_eq!(mode.limit(), 25);
    }

    #[test]
    fn page_and_offset_are_exclusive() {
        let err = ListingMode::from_query(ListingQuery {
            limit: None,
            page: Some(2),
            offset: Some(42),
        })
        .unwrap_err();
        assert_eq!(invalid_value(err), "page");
    }

    #[test]
    fn limit_bounds_are_enforced() {
        let err = ListingMode::from_query(ListingQuery {
            limit: Some(0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(invalid_value(err), "0");

        let err = ListingMode::from_query(ListingQuery {
            limit: Some(MAX_LISTING_ELEMENTS + 1),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            RequestError::Validation(ValidationError::LimitExceeded { .. })
        ));
    }

    #[test]
    fn page_and_offset_lower_bounds() {
        let err = ListingMode::from_query(ListingQuery {
            page: Some(0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(invalid_value(err), "0");

        let err = ListingMode::from_query(ListingQuery {
            offset: Some(-1),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(invalid_value(err), "-1");
    }
}
