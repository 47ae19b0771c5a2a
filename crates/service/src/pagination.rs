//! Pagination utilities for the "liked you" listings
//!
//! The pagination token handed to clients is the decimal, 1-based page number.
//! Nothing is stored server-side: the next token is derived from the page that
//! was just served.

use tracing::warn;

/// Decoded pagination token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page index
    pub page: u64,
}

impl PageCursor {
    pub const FIRST: PageCursor = PageCursor { page: 1 };

    /// Decode a client token. Absent means page 1; a malformed or non-positive
    /// token is logged and also read as page 1, never rejected.
    pub fn parse(token: Option<&str>) -> Self {
        let Some(raw) = token else { return Self::FIRST };
        match raw.trim().parse::<i64>() {
            Ok(page) if page >= 1 => Self { page: page as u64 },
            Ok(page) => {
                warn!(page, "non-positive pagination token, using page 1");
                Self::FIRST
            }
            Err(e) => {
                warn!(token = raw, error = %e, "malformed pagination token, using page 1");
                Self::FIRST
            }
        }
    }

    /// Token for the following page. Only a full page yields one, so the true last
    /// page is detected one (empty) round-trip late when the total is a multiple
    /// of `per_page`.
    pub fn next_token(self, returned: usize, per_page: u64) -> Option<String> {
        if returned as u64 == per_page {
            Some(self.page.saturating_add(1).to_string())
        } else {
            None
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self { Self::FIRST }
}
