//! Pagination utilities for service layer
//!
//! Lists are windowed with `limit`/`offset`, the shape the HTTP query
//! string carries (`?limit=10&offset=20`).

use sea_orm::QuerySelect;
use serde::Deserialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// max rows returned
    pub limit: u64,
    /// rows skipped
    pub offset: u64,
}

impl Pagination {
    pub const MAX_LIMIT: u64 = 100;

    /// Clamp `limit` into `1..=MAX_LIMIT`; returns `(limit, offset)`.
    pub fn normalize(self) -> (u64, u64) {
        (self.limit.clamp(1, Self::MAX_LIMIT), self.offset)
    }

    /// Apply the window to a query.
    pub fn apply<Q: QuerySelect>(self, query: Q) -> Q {
        let (limit, offset) = self.normalize();
        query.limit(limit).offset(offset)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { limit: 10, offset: 0 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_clamps_zero_limit() {
        let (limit, offset) = Pagination { limit: 0, offset: 0 }.normalize();
        assert_eq!(limit, 1);
        assert_eq!(offset, 0);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (limit, offset) = Pagination { limit: 1000, offset: 40 }.normalize();
        assert_eq!(limit, 100);
        assert_eq!(offset, 40);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.limit, 10);
        assert_eq!(d.offset, 0);
    }
}
