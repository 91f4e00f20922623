/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Request id allocation.
//!
//! This module provides lock-free allocation of request correlation numbers.

use oxtrade_core::{ConnectionError, RequestId};
use std::sync::atomic::{AtomicI32, Ordering};

/// Allocates request ids for a session.
///
/// Ids start at 1 and strictly increase. Allocation uses a single atomic
/// update, so concurrent callers never observe duplicates or gaps. Once
/// `i32::MAX` has been handed out the registry refuses further ids instead of
/// wrapping.
#[derive(Debug)]
pub struct RequestRegistry {
    /// Next id to hand out.
    next: AtomicI32,
}

impl RequestRegistry {
    /// Creates a registry whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(1)
    }

    /// Creates a registry starting at the given id.
    ///
    /// # Arguments
    /// * `first` - The first id to allocate
    #[must_use]
    pub fn with_initial(first: i32) -> Self {
        Self {
            next: AtomicI32::new(first),
        }
    }

    /// Allocates the next request id.
    ///
    /// # Errors
    /// Returns `ConnectionError::RequestIdsExhausted` after `i32::MAX`.
    #[inline]
    pub fn next_id(&self) -> Result<RequestId, ConnectionError> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                // A non-positive value marks exhaustion.
                (next > 0).then(|| next.checked_add(1).unwrap_or(i32::MIN))
            })
            .map(RequestId::new)
            .map_err(|_| ConnectionError::RequestIdsExhausted)
    }

    /// Returns the id the next allocation will produce.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> RequestId {
        RequestId::new(self.next.load(Ordering::SeqCst))
    }

    /// Restarts allocation at 1.
    pub fn reset(&self) {
        self.next.store(1, Ordering::SeqCst);
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let registry = RequestRegistry::new();
        assert_eq!(registry.next_id().unwrap().value(), 1);
        assert_eq!(registry.next_id().unwrap().value(), 2);
        assert_eq!(registry.peek().value(), 3);
    }

    #[test]
    fn test_reset() {
        let registry = RequestRegistry::with_initial(40);
        assert_eq!(registry.next_id().unwrap().value(), 40);
        registry.reset();
        assert_eq!(registry.next_id().unwrap().value(), 1);
    }

    #[test]
    fn test_exhaustion_does_not_wrap() {
        let registry = RequestRegistry::with_initial(i32::MAX - 1);
        assert_eq!(registry.next_id().unwrap().value(), i32::MAX - 1);
        assert_eq!(registry.next_id().unwrap().value(), i32::MAX);
        assert_eq!(
            registry.next_id().unwrap_err(),
            ConnectionError::RequestIdsExhausted
        );
        assert_eq!(
            registry.next_id().unwrap_err(),
            ConnectionError::RequestIdsExhausted
        );
    }

    #[test]
    fn test_concurrent_ids_are_unique_and_contiguous() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1_000;

        let registry = RequestRegistry::new();
        let mut ids: Vec<i32> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        (0..PER_THREAD)
                            .map(|_| registry.next_id().unwrap().value())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        ids.sort_unstable();
        let expected: Vec<i32> = (1..=(THREADS * PER_THREAD) as i32).collect();
        assert_eq!(ids, expected);
    }
}
