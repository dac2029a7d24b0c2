//! Token and agent registries.
//!
//! Both registries hold administrative state only — gating of who may
//! mutate them lives in the pool facade, which consults the injected
//! [`AccessControl`](crate::AccessControl) collaborator.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use openvoucher_types::{Agent, AccountId, Result, TokenId, VoucherError};

/// Membership set of supported value-unit types.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    supported: HashSet<TokenId>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token. Idempotent.
    pub fn add(&mut self, token: TokenId) {
        self.supported.insert(token);
    }

    /// Remove a token. Idempotent; outstanding vouchers of this token stay
    /// redeemable — removal only blocks new mints.
    pub fn remove(&mut self, token: &TokenId) {
        self.supported.remove(token);
    }

    #[must_use]
    pub fn is_supported(&self, token: &TokenId) -> bool {
        self.supported.contains(token)
    }

    /// Fail with `TokenNotSupported` unless the token is registered.
    pub fn require_supported(&self, token: &TokenId) -> Result<()> {
        if self.is_supported(token) {
            Ok(())
        } else {
            Err(VoucherError::TokenNotSupported(token.clone()))
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.supported.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }
}

/// Registered voucher-issuing agents.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<AccountId, Agent>,
}

impl AgentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) an agent with zeroed counters.
    ///
    /// Re-registration replaces the existing record entirely, which also
    /// reactivates a previously deactivated agent.
    ///
    /// # Errors
    /// Returns [`VoucherError::InvalidCommissionRate`] above the cap.
    pub fn register(
        &mut self,
        identity: AccountId,
        commission_rate_bps: u32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let agent = Agent::new(commission_rate_bps, now)?;
        self.agents.insert(identity, agent);
        Ok(())
    }

    /// Deactivate an agent. Already-minted vouchers are unaffected.
    ///
    /// # Errors
    /// Returns [`VoucherError::UnauthorizedMinter`] for an identity that
    /// was never registered.
    pub fn deactivate(&mut self, identity: &AccountId) -> Result<()> {
        let agent = self
            .agents
            .get_mut(identity)
            .ok_or(VoucherError::UnauthorizedMinter(*identity))?;
        agent.active = false;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, identity: &AccountId) -> Option<&Agent> {
        self.agents.get(identity)
    }

    pub fn get_mut(&mut self, identity: &AccountId) -> Option<&mut Agent> {
        self.agents.get_mut(identity)
    }

    /// Fail with `UnauthorizedMinter` unless the identity is a registered,
    /// active agent.
    pub fn require_active(&self, identity: &AccountId) -> Result<&Agent> {
        match self.agents.get(identity) {
            Some(agent) if agent.active => Ok(agent),
            _ => Err(VoucherError::UnauthorizedMinter(*identity)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
