//! Per-address single-flight claims.

use parking_lot::Mutex;
use shared_types::Address;
use std::collections::HashSet;
use std::sync::Arc;

/// Set of addresses with a transition in flight.
#[derive(Debug, Default, Clone)]
pub struct AddressClaims {
    held: Arc<Mutex<HashSet<Address>>>,
}

impl AddressClaims {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `address`, or `None` if it is already claimed.
    #[must_use]
    pub fn try_claim(&self, address: Address) -> Option<ClaimGuard> {
        if !self.held.lock().insert(address) {
            return None;
        }
        Some(ClaimGuard {
            held: Arc::clone(&self.held),
            address,
        })
    }

    #[must_use]
    pub fn is_claimed(&self, address: Address) -> bool {
        self.held.lock().contains(&address)
    }

    /// Number of addresses currently claimed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.lock().is_empty()
    }
}

/// Releases its address when dropped.
#[derive(Debug)]
pub struct ClaimGuard {
    held: Arc<Mutex<HashSet<Address>>>,
    address: Address,
}

impl ClaimGuard {
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        self.held.lock().remove(&self.address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_refused_until_release() {
        let claims = AddressClaims::new();
        let addr = Address([1; 20]);

        let guard = claims.try_claim(addr).unwrap();
        assert!(claims.try_claim(addr).is_none());
        assert!(claims.try_claim(Address([2; 20])).is_some());

        drop(guard);
        assert!(!claims.is_claimed(addr));
        assert!(claims.try_claim(addr).is_some());
    }
}
