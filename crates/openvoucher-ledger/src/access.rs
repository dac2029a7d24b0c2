//! Access-control collaborator.
//!
//! The ledger core is decoupled from any particular authorization scheme:
//! administrative operations ask an injected capability checker, nothing
//! more. [`AdminSet`] is the reference implementation.

use std::collections::HashSet;

use openvoucher_types::AccountId;

/// Capability check for administrative operations.
pub trait AccessControl {
    fn is_administrator(&self, identity: &AccountId) -> bool;
}

/// Membership-set implementation of [`AccessControl`].
#[derive(Debug, Clone, Default)]
pub struct AdminSet {
    admins: HashSet<AccountId>,
}

impl AdminSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing exactly one administrator.
    #[must_use]
    pub fn single(admin: AccountId) -> Self {
        let mut admins = HashSet::new();
        admins.insert(admin);
        Self { admins }
    }

    pub fn grant(&mut self, identity: AccountId) {
        self.admins.insert(identity);
    }

    pub fn revoke(&mut self, identity: &AccountId) {
        self.admins.remove(identity);
    }
}

impl AccessControl for AdminSet {
    fn is_administrator(&self, identity: &AccountId) -> bool {
        self.admins.contains(identity)
    }
}
