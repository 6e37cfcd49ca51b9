// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for search requests.
//!
//! Runs at the HTTP boundary so malformed requests are rejected before an
//! engine is ever allocated.

use crate::error::{Result, ValidationError};

/// Validate search request parameters.
pub fn validate_search_request(
    search_space_size: i64,
    target_index: i64,
    max_search_space_size: usize,
) -> Result<()> {
    if search_space_size <= 0 {
        return Err(ValidationError::Field {
            field: "searchSpaceSize".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if search_space_size as u64 > max_search_space_size as u64 {
        return Err(ValidationError::ResourceLimit {
            resource: "searchSpaceSize".into(),
            limit: max_search_space_size as u64,
            requested: search_space_size as u64,
        }
        .into());
    }

    if target_index < 0 {
        return Err(ValidationError::Field {
            field: "targetIndex".into(),
            message: "must not be negative".into(),
        }
        .into());
    }

    if target_index >= search_space_size {
        return Err(ValidationError::Field {
            field: "targetIndex".into(),
            message: format!(
                "{} is out of bounds for searchSpaceSize {}",
                target_index, search_space_size
            ),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_validate_search_request() {
        // Valid request
        assert!(validate_search_request(16, 5, 1000).is_ok());
        assert!(validate_search_request(1, 0, 1000).is_ok());
        assert!(validate_search_request(1000, 999, 1000).is_ok());

        // Non-positive size
        assert!(validate_search_request(0, 0, 1000).is_err());
        assert!(validate_search_request(-4, 0, 1000).is_err());

        // Target out of range
        assert!(validate_search_request(10, 10, 1000).is_err());
        assert!(validate_search_request(10, -1, 1000).is_err());
    }

    #[test]
    fn test_validate_search_request_resource_limit() {
        let err = validate_search_request(1001, 0, 1000).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ResourceLimit {
                limit: 1000,
                requested: 1001,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_search_request_names_field() {
        let msg = validate_search_request(0, 0, 1000).unwrap_err().to_string();
        assert!(msg.contains("searchSpaceSize"));

        let msg = validate_search_request(8, 8, 1000).unwrap_err().to_string();
        assert!(msg.contains("targetIndex"));
    }
}
