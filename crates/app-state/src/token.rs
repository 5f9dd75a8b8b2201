//! Request tokens for stale-response discard
//!
//! Overlapping async operations are not cancelled; instead each request
//! carries a token, and only the completion matching the newest issued
//! token is applied to the session state.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque marker tying an async completion to the request that issued it.
///
/// Tokens are totally ordered by issue order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RequestToken(u64);

/// Monotonic token issuer, one per async operation kind.
#[derive(Debug, Default)]
pub struct TokenSequence(AtomicU64);

impl TokenSequence {
    /// Create a new sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token
    pub fn next(&self) -> RequestToken {
        RequestToken(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_monotonic() {
        let seq = TokenSequence::new();
        let a = seq.next();
        let b = seq.next();
        let c = seq.next();

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_sequences_are_independent() {
        let search = TokenSequence::new();
        let route = TokenSequence::new();

        assert_eq!(search.next(), route.next());
    }
}
