//! The voucher pool facade: the full public operation catalogue over one
//! owned store.
//!
//! Every public call is a single atomic operation — it fully applies its
//! ledger mutations, value transfers, and counter updates, or it applies
//! none of them. Preconditions and fallible transfers run first; the
//! commit phase (record insertion, terminal flags, aggregate bookkeeping)
//! is infallible and runs last. A [`ReentrancyLock`] wraps every mutating
//! entry point so a value-transfer hook cannot re-invoke the pool while an
//! operation is in flight.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use openvoucher_settlement::{SettlementEngine, ValueTransfer};
use openvoucher_types::{
    AccountId, AgentStats, CodeFingerprint, ContractStats, MintBatch, PoolConfig, Result, TokenId,
    Voucher, VoucherError, VoucherStatus,
    constants::{MAX_EXPIRY_DAYS, MIN_EXPIRY_DAYS},
};
use rust_decimal::Decimal;
use tracing::info;

use crate::access::AccessControl;
use crate::clock::Clock;
use crate::guard::ReentrancyLock;
use crate::ledger::VoucherLedger;
use crate::registry::{AgentRegistry, TokenRegistry};

/// The complete voucher pool: registries, ledger, settlement engine, and
/// the injected collaborators.
///
/// The store is explicit and owned — its lifetime is the system's
/// lifetime, and there is no ambient global state.
pub struct VoucherPool {
    config: PoolConfig,
    tokens: TokenRegistry,
    agents: AgentRegistry,
    ledger: VoucherLedger,
    engine: SettlementEngine,
    bank: Box<dyn ValueTransfer>,
    access: Box<dyn AccessControl>,
    clock: Box<dyn Clock>,
    guard: ReentrancyLock,
}

impl VoucherPool {
    /// Build a pool over the given collaborators.
    ///
    /// # Errors
    /// Propagates [`VoucherError::FeeTooHigh`] for out-of-range configured
    /// rates (also checked by [`PoolConfig::new`]).
    pub fn new(
        config: PoolConfig,
        access: Box<dyn AccessControl>,
        clock: Box<dyn Clock>,
        bank: Box<dyn ValueTransfer>,
    ) -> Result<Self> {
        let engine = SettlementEngine::new(config.minting_fee_bps, config.redemption_fee_bps)?;
        Ok(Self {
            config,
            tokens: TokenRegistry::new(),
            agents: AgentRegistry::new(),
            ledger: VoucherLedger::new(),
            engine,
            bank,
            access,
            clock,
            guard: ReentrancyLock::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    // ──────────────────── administrative operations ────────────────────

    /// Add a supported token. Administrative; idempotent.
    pub fn add_supported_token(&mut self, caller: AccountId, token: TokenId) -> Result<()> {
        self.guard.enter()?;
        let result = self.require_admin(&caller).map(|()| {
            info!(%caller, %token, "token added");
            self.tokens.add(token);
        });
        self.guard.exit();
        result
    }

    /// Remove a supported token. Administrative; idempotent. Outstanding
    /// vouchers of the token stay redeemable and reclaimable.
    pub fn remove_supported_token(&mut self, caller: AccountId, token: &TokenId) -> Result<()> {
        self.guard.enter()?;
        let result = self.require_admin(&caller).map(|()| {
            info!(%caller, %token, "token removed");
            self.tokens.remove(token);
        });
        self.guard.exit();
        result
    }

    /// Register (or re-register) an agent. Administrative.
    pub fn register_agent(
        &mut self,
        caller: AccountId,
        identity: AccountId,
        commission_rate_bps: u32,
    ) -> Result<()> {
        self.guard.enter()?;
        let result = self.register_agent_inner(caller, identity, commission_rate_bps);
        self.guard.exit();
        result
    }

    fn register_agent_inner(
        &mut self,
        caller: AccountId,
        identity: AccountId,
        commission_rate_bps: u32,
    ) -> Result<()> {
        self.require_admin(&caller)?;
        let now = self.clock.now();
        self.agents.register(identity, commission_rate_bps, now)?;
        info!(%caller, agent = %identity, commission_rate_bps, "agent registered");
        Ok(())
    }

    /// Deactivate an agent. Administrative. Already-minted vouchers are
    /// unaffected.
    pub fn deactivate_agent(&mut self, caller: AccountId, identity: &AccountId) -> Result<()> {
        self.guard.enter()?;
        let result = self
            .require_admin(&caller)
            .and_then(|()| self.agents.deactivate(identity));
        self.guard.exit();
        if result.is_ok() {
            info!(%caller, agent = %identity, "agent deactivated");
        }
        result
    }

    /// Replace both fee rates. Administrative; both caps are checked
    /// before either rate mutates.
    pub fn update_fees(
        &mut self,
        caller: AccountId,
        minting_fee_bps: u32,
        redemption_fee_bps: u32,
    ) -> Result<()> {
        self.guard.enter()?;
        let result = self
            .require_admin(&caller)
            .and_then(|()| self.engine.update_fees(minting_fee_bps, redemption_fee_bps));
        self.guard.exit();
        if result.is_ok() {
            info!(%caller, minting_fee_bps, redemption_fee_bps, "fees updated");
        }
        result
    }

    fn require_admin(&self, caller: &AccountId) -> Result<()> {
        if self.access.is_administrator(caller) {
            Ok(())
        } else {
            Err(VoucherError::NotAdministrator(*caller))
        }
    }

    // ──────────────────── voucher lifecycle ────────────────────

    /// Mint a single voucher. Returns the minting fee charged.
    ///
    /// The caller (an active agent) is debited `value + fee`: the value
    /// enters pool custody, the fee goes to the treasury. `expiry_days = 0`
    /// applies the configured default window.
    pub fn mint_voucher(
        &mut self,
        caller: AccountId,
        fingerprint: CodeFingerprint,
        token: TokenId,
        value: Decimal,
        expiry_days: u32,
    ) -> Result<Decimal> {
        self.guard.enter()?;
        let result = self.mint_inner(caller, fingerprint, token, value, expiry_days);
        self.guard.exit();
        result
    }

    fn mint_inner(
        &mut self,
        caller: AccountId,
        fingerprint: CodeFingerprint,
        token: TokenId,
        value: Decimal,
        expiry_days: u32,
    ) -> Result<Decimal> {
        let now = self.clock.now();

        // Preconditions, no mutation yet.
        self.agents.require_active(&caller)?;
        self.tokens.require_supported(&token)?;
        if value <= Decimal::ZERO {
            return Err(VoucherError::InvalidValue { value });
        }
        let expires_at = self.resolve_expiry(expiry_days, now)?;
        self.ledger.check_available(&fingerprint)?;

        // Fallible transfers.
        let fee = self.engine.settle_mint(
            self.bank.as_mut(),
            &token,
            &caller,
            &self.config.pool_account,
            &self.config.treasury,
            value,
        )?;

        // Infallible commit.
        self.ledger.insert(Voucher {
            fingerprint,
            token: token.clone(),
            value,
            issuer: caller,
            redeemed: false,
            created_at: now,
            expires_at,
        })?;
        self.engine.record_mint(&caller, &token, value);
        if let Some(agent) = self.agents.get_mut(&caller) {
            agent.record_mint(value);
        }

        info!(%fingerprint, %token, %value, %fee, issuer = %caller, "voucher minted");
        Ok(fee)
    }

    /// Mint a batch of vouchers as one all-or-nothing unit. Returns the
    /// per-entry fees in input order.
    ///
    /// Entries are validated in input order (intra-batch duplicates are
    /// caught against both the ledger and earlier entries); per-token
    /// transfers are aggregated but fees floor per entry, so the batch
    /// costs exactly what the same mints would cost independently.
    pub fn mint_voucher_batch(
        &mut self,
        caller: AccountId,
        batch: &MintBatch,
    ) -> Result<Vec<Decimal>> {
        self.guard.enter()?;
        let result = self.mint_batch_inner(caller, batch);
        self.guard.exit();
        result
    }

    fn mint_batch_inner(&mut self, caller: AccountId, batch: &MintBatch) -> Result<Vec<Decimal>> {
        let now = self.clock.now();

        // Shape first, then per-entry preconditions — all before any
        // mutation or transfer.
        batch.check_shape()?;
        self.agents.require_active(&caller)?;

        let mut entries = Vec::with_capacity(batch.len());
        let mut expiries = Vec::with_capacity(batch.len());
        let mut seen: HashSet<CodeFingerprint> = HashSet::with_capacity(batch.len());
        for i in 0..batch.len() {
            let fingerprint = batch.fingerprints[i];
            let token = &batch.tokens[i];
            let value = batch.values[i];

            self.tokens.require_supported(token)?;
            if value <= Decimal::ZERO {
                return Err(VoucherError::InvalidValue { value });
            }
            expiries.push(self.resolve_expiry(batch.expiry_days[i], now)?);
            self.ledger.check_available(&fingerprint)?;
            if !seen.insert(fingerprint) {
                return Err(VoucherError::DuplicateVoucherCode(fingerprint));
            }
            entries.push((token.clone(), value));
        }

        // One aggregated plan: all transfers commit or none do.
        let fees = self.engine.settle_mint_batch(
            self.bank.as_mut(),
            &caller,
            &self.config.pool_account,
            &self.config.treasury,
            &entries,
        )?;

        for (i, (token, value)) in entries.iter().enumerate() {
            self.ledger.insert(Voucher {
                fingerprint: batch.fingerprints[i],
                token: token.clone(),
                value: *value,
                issuer: caller,
                redeemed: false,
                created_at: now,
                expires_at: expiries[i],
            })?;
            self.engine.record_mint(&caller, token, *value);
            if let Some(agent) = self.agents.get_mut(&caller) {
                agent.record_mint(*value);
            }
        }

        info!(entries = batch.len(), issuer = %caller, "voucher batch minted");
        Ok(fees)
    }

    /// Redeem a voucher by presenting its plaintext code. Returns the net
    /// amount paid to the recipient (`value − fee`).
    ///
    /// Possession of the plaintext is the capability — any caller may
    /// redeem to any recipient.
    pub fn redeem_voucher(&mut self, code: &str, recipient: AccountId) -> Result<Decimal> {
        self.guard.enter()?;
        let result = self.redeem_inner(code, recipient);
        self.guard.exit();
        result
    }

    fn redeem_inner(&mut self, code: &str, recipient: AccountId) -> Result<Decimal> {
        let now = self.clock.now();
        let fingerprint = CodeFingerprint::from_code(code);

        let voucher = self.ledger.require(&fingerprint)?;
        if voucher.redeemed {
            return Err(VoucherError::VoucherAlreadyRedeemed(fingerprint));
        }
        if voucher.is_expired(now) {
            return Err(VoucherError::VoucherExpired(fingerprint));
        }
        let (token, value) = (voucher.token.clone(), voucher.value);

        let fee = self.engine.settle_redeem(
            self.bank.as_mut(),
            &token,
            &self.config.pool_account,
            &recipient,
            &self.config.treasury,
            value,
        )?;

        self.ledger.mark_redeemed(&fingerprint)?;
        self.engine.record_redeem(&token, value);

        info!(%fingerprint, %token, %value, %fee, %recipient, "voucher redeemed");
        Ok(value - fee)
    }

    /// Reclaim an expired voucher's full value back to its issuer. The
    /// only transition with no fee.
    pub fn reclaim_expired_voucher(&mut self, caller: AccountId, code: &str) -> Result<Decimal> {
        self.guard.enter()?;
        let result = self.reclaim_inner(caller, code);
        self.guard.exit();
        result
    }

    fn reclaim_inner(&mut self, caller: AccountId, code: &str) -> Result<Decimal> {
        let now = self.clock.now();
        let fingerprint = CodeFingerprint::from_code(code);

        let voucher = self.ledger.require(&fingerprint)?;
        if voucher.redeemed {
            return Err(VoucherError::VoucherAlreadyRedeemed(fingerprint));
        }
        if voucher.issuer != caller {
            return Err(VoucherError::UnauthorizedMinter(caller));
        }
        // A voucher with no expiry can never be reclaimed.
        if !voucher.is_expired(now) {
            return Err(VoucherError::VoucherNotExpired(fingerprint));
        }
        let (token, value) = (voucher.token.clone(), voucher.value);

        self.engine.settle_reclaim(
            self.bank.as_mut(),
            &token,
            &self.config.pool_account,
            &caller,
            value,
        )?;

        self.ledger.mark_redeemed(&fingerprint)?;
        self.engine.record_reclaim(&token, value);

        info!(%fingerprint, %token, %value, issuer = %caller, "voucher reclaimed");
        Ok(value)
    }

    /// Pay out an agent's accrued commission. Callable by an administrator
    /// or by the agent itself. Returns the commission per token.
    pub fn settle_agent_balance(
        &mut self,
        caller: AccountId,
        identity: AccountId,
    ) -> Result<Vec<(TokenId, Decimal)>> {
        self.guard.enter()?;
        let result = self.settle_agent_inner(caller, identity);
        self.guard.exit();
        result
    }

    fn settle_agent_inner(
        &mut self,
        caller: AccountId,
        identity: AccountId,
    ) -> Result<Vec<(TokenId, Decimal)>> {
        let now = self.clock.now();
        if caller != identity {
            self.require_admin(&caller)?;
        }
        let rate_bps = self
            .agents
            .get(&identity)
            .ok_or(VoucherError::UnauthorizedMinter(identity))?
            .commission_rate_bps;

        let paid = self.engine.settle_commission(
            self.bank.as_mut(),
            &self.config.treasury,
            &identity,
            rate_bps,
        )?;

        if let Some(agent) = self.agents.get_mut(&identity) {
            agent.last_settlement = now;
        }
        info!(agent = %identity, tokens = paid.len(), "agent balance settled");
        Ok(paid)
    }

    fn resolve_expiry(&self, expiry_days: u32, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let effective_days = if expiry_days == 0 {
            self.config.default_expiry_days
        } else {
            if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&expiry_days) {
                return Err(VoucherError::InvalidExpiry { days: expiry_days });
            }
            expiry_days
        };
        // A zero default means such vouchers never expire.
        Ok((effective_days > 0).then(|| now + Duration::days(i64::from(effective_days))))
    }

    // ──────────────────── read-only queries ────────────────────

    #[must_use]
    pub fn is_token_supported(&self, token: &TokenId) -> bool {
        self.tokens.is_supported(token)
    }

    /// Status by plaintext code.
    #[must_use]
    pub fn voucher_status(&self, code: &str) -> VoucherStatus {
        self.voucher_status_by_fingerprint(&CodeFingerprint::from_code(code))
    }

    /// Status by fingerprint — issuers hold fingerprints, not plaintext
    /// codes.
    #[must_use]
    pub fn voucher_status_by_fingerprint(&self, fingerprint: &CodeFingerprint) -> VoucherStatus {
        self.ledger.status(fingerprint)
    }

    #[must_use]
    pub fn contract_stats(&self) -> ContractStats {
        ContractStats {
            total_minted: self.engine.total_minted(),
            total_redeemed: self.engine.total_redeemed(),
            minting_fee_bps: self.engine.fees().minting_fee_bps(),
            redemption_fee_bps: self.engine.fees().redemption_fee_bps(),
        }
    }

    /// Total value redeemed in `token` since genesis.
    #[must_use]
    pub fn token_stats(&self, token: &TokenId) -> Decimal {
        self.engine.token_redeemed_value(token)
    }

    /// Per-agent stats; unknown identities get the inactive zero-valued
    /// default.
    #[must_use]
    pub fn agent_stats(&self, identity: &AccountId) -> AgentStats {
        self.agents
            .get(identity)
            .map_or_else(AgentStats::default, AgentStats::from)
    }

    /// The identity's live bank balance in `token`.
    #[must_use]
    pub fn agent_token_balance(&self, identity: &AccountId, token: &TokenId) -> Decimal {
        self.bank.balance_of(token, identity)
    }

    /// The pool custody account's live balance in `token`.
    #[must_use]
    pub fn contract_token_balance(&self, token: &TokenId) -> Decimal {
        self.bank.balance_of(token, &self.config.pool_account)
    }

    /// Audit hook: check that pool custody equals the sum of outstanding
    /// voucher values for `token`.
    ///
    /// # Errors
    /// Returns [`VoucherError::CustodyInvariantViolation`] on drift.
    pub fn verify_custody(&self, token: &TokenId) -> Result<()> {
        self.engine
            .verify_custody(self.bank.as_ref(), &self.config.pool_account, token)
    }
}
