//! Batch minting semantics: all-or-nothing application, shape validation
//! before any mutation, in-order duplicate detection, and value
//! equivalence with independent mints.

use chrono::Utc;
use openvoucher_ledger::{AdminSet, ManualClock, VoucherPool};
use openvoucher_settlement::{MemoryBank, ValueTransfer};
use openvoucher_types::{
    AccountId, CodeFingerprint, MintBatch, PoolConfig, TokenId, VoucherError,
};
use rust_decimal::Decimal;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn usdt() -> TokenId {
    TokenId::new("USDT")
}

struct Harness {
    pool: VoucherPool,
    bank: MemoryBank,
    admin: AccountId,
    agent: AccountId,
    treasury: AccountId,
}

fn harness(minting_fee_bps: u32) -> Harness {
    let admin = AccountId::random();
    let agent = AccountId::random();
    let treasury = AccountId::random();
    let bank = MemoryBank::new();
    let config = PoolConfig::new(AccountId::random(), treasury, minting_fee_bps, 0, 30).unwrap();
    let mut pool = VoucherPool::new(
        config,
        Box::new(AdminSet::single(admin)),
        Box::new(ManualClock::new(Utc::now())),
        Box::new(bank.clone()),
    )
    .unwrap();
    pool.add_supported_token(admin, usdt()).unwrap();
    pool.register_agent(admin, agent, 0).unwrap();
    bank.deposit(&usdt(), &agent, dec(1_000_000));
    Harness {
        pool,
        bank,
        admin,
        agent,
        treasury,
    }
}

fn batch(codes: &[&str], value: Decimal) -> MintBatch {
    MintBatch::new(
        codes.iter().map(|c| CodeFingerprint::from_code(c)).collect(),
        codes.iter().map(|_| usdt()).collect(),
        codes.iter().map(|_| value).collect(),
        codes.iter().map(|_| 30).collect(),
    )
}

#[test]
fn batch_mints_every_entry() {
    let mut h = harness(200);
    let fees = h
        .pool
        .mint_voucher_batch(h.agent, &batch(&["B1", "B2", "B3"], dec(1000)))
        .unwrap();

    assert_eq!(fees, vec![dec(20), dec(20), dec(20)]);
    for code in ["B1", "B2", "B3"] {
        let status = h.pool.voucher_status(code);
        assert!(status.exists, "{code} should exist");
        assert_eq!(status.value, dec(1000));
        assert_eq!(status.issuer, Some(h.agent));
    }
    assert_eq!(h.pool.contract_stats().total_minted, 3);
    assert_eq!(h.pool.contract_token_balance(&usdt()), dec(3000));
    assert_eq!(h.bank.balance_of(&usdt(), &h.treasury), dec(60));
    h.pool.verify_custody(&usdt()).unwrap();

    let stats = h.pool.agent_stats(&h.agent);
    assert_eq!(stats.total_minted, 3);
    assert_eq!(stats.total_value_minted, dec(3000));
}

#[test]
fn mismatched_arrays_mutate_nothing() {
    let mut h = harness(200);
    let mut bad = batch(&["M1", "M2"], dec(100));
    bad.values.pop();

    let err = h.pool.mint_voucher_batch(h.agent, &bad).unwrap_err();
    assert!(matches!(err, VoucherError::InvalidBatchSize { .. }));
    assert_eq!(h.pool.contract_stats().total_minted, 0);
    assert_eq!(h.bank.balance_of(&usdt(), &h.agent), dec(1_000_000));
    assert!(!h.pool.voucher_status("M1").exists);
}

#[test]
fn empty_batch_rejected() {
    let mut h = harness(200);
    let err = h
        .pool
        .mint_voucher_batch(h.agent, &MintBatch::default())
        .unwrap_err();
    assert!(matches!(err, VoucherError::InvalidBatchSize { .. }));
}

#[test]
fn batch_requires_active_agent() {
    let mut h = harness(200);
    let err = h
        .pool
        .mint_voucher_batch(AccountId::random(), &batch(&["X"], dec(100)))
        .unwrap_err();
    assert!(matches!(err, VoucherError::UnauthorizedMinter(_)));
}

#[test]
fn duplicate_against_ledger_aborts_whole_batch() {
    let mut h = harness(200);
    h.pool
        .mint_voucher(h.agent, CodeFingerprint::from_code("B2"), usdt(), dec(500), 0)
        .unwrap();
    let balance_before = h.bank.balance_of(&usdt(), &h.agent);

    let err = h
        .pool
        .mint_voucher_batch(h.agent, &batch(&["B1", "B2", "B3"], dec(100)))
        .unwrap_err();
    assert!(
        matches!(err, VoucherError::DuplicateVoucherCode(fp) if fp == CodeFingerprint::from_code("B2"))
    );

    // B1 and B3 were left unminted; no value moved.
    assert!(!h.pool.voucher_status("B1").exists);
    assert!(!h.pool.voucher_status("B3").exists);
    assert_eq!(h.pool.contract_stats().total_minted, 1);
    assert_eq!(h.bank.balance_of(&usdt(), &h.agent), balance_before);
    h.pool.verify_custody(&usdt()).unwrap();
}

#[test]
fn intra_batch_duplicate_aborts_whole_batch() {
    let mut h = harness(200);
    let err = h
        .pool
        .mint_voucher_batch(h.agent, &batch(&["A", "B", "A"], dec(100)))
        .unwrap_err();
    assert!(matches!(err, VoucherError::DuplicateVoucherCode(_)));
    assert!(!h.pool.voucher_status("A").exists);
    assert!(!h.pool.voucher_status("B").exists);
    assert_eq!(h.bank.balance_of(&usdt(), &h.agent), dec(1_000_000));
}

#[test]
fn unsupported_token_mid_batch_aborts() {
    let mut h = harness(200);
    let mut mixed = batch(&["T1", "T2"], dec(100));
    mixed.tokens[1] = TokenId::new("DAI");

    let err = h.pool.mint_voucher_batch(h.agent, &mixed).unwrap_err();
    assert!(matches!(err, VoucherError::TokenNotSupported(t) if t == TokenId::new("DAI")));
    assert!(!h.pool.voucher_status("T1").exists);
}

#[test]
fn invalid_expiry_mid_batch_aborts() {
    let mut h = harness(200);
    let mut bad = batch(&["E1", "E2"], dec(100));
    bad.expiry_days[1] = 366;

    let err = h.pool.mint_voucher_batch(h.agent, &bad).unwrap_err();
    assert!(matches!(err, VoucherError::InvalidExpiry { days: 366 }));
    assert!(!h.pool.voucher_status("E1").exists);
}

#[test]
fn underfunded_batch_aborts_with_no_partial_mints() {
    let mut h = harness(0);
    let poor_agent = AccountId::random();
    h.pool.register_agent(h.admin, poor_agent, 0).unwrap();
    // Funds for two entries, not three.
    h.bank.deposit(&usdt(), &poor_agent, dec(200));

    let err = h
        .pool
        .mint_voucher_batch(poor_agent, &batch(&["P1", "P2", "P3"], dec(100)))
        .unwrap_err();
    assert!(matches!(err, VoucherError::TransferFailed { .. }));
    for code in ["P1", "P2", "P3"] {
        assert!(!h.pool.voucher_status(code).exists);
    }
    assert_eq!(h.bank.balance_of(&usdt(), &poor_agent), dec(200));
    h.pool.verify_custody(&usdt()).unwrap();
}

#[test]
fn batch_fees_floor_per_entry_not_on_the_total() {
    // 3 × 999 at 250 bps: each entry's fee floors to 24, so the batch
    // charges 72 — not floor(2997 × 0.025) = 74.
    let mut h = harness(250);
    let fees = h
        .pool
        .mint_voucher_batch(h.agent, &batch(&["F1", "F2", "F3"], dec(999)))
        .unwrap();
    assert_eq!(fees, vec![dec(24), dec(24), dec(24)]);
    assert_eq!(h.bank.balance_of(&usdt(), &h.treasury), dec(72));
}

#[test]
fn batch_is_value_equivalent_to_independent_mints() {
    let mut batched = harness(250);
    let mut single = harness(250);

    batched
        .pool
        .mint_voucher_batch(batched.agent, &batch(&["V1", "V2", "V3"], dec(999)))
        .unwrap();
    for code in ["V1", "V2", "V3"] {
        single
            .pool
            .mint_voucher(
                single.agent,
                CodeFingerprint::from_code(code),
                usdt(),
                dec(999),
                30,
            )
            .unwrap();
    }

    assert_eq!(
        batched.bank.balance_of(&usdt(), &batched.agent),
        single.bank.balance_of(&usdt(), &single.agent)
    );
    assert_eq!(
        batched.pool.contract_token_balance(&usdt()),
        single.pool.contract_token_balance(&usdt())
    );
    assert_eq!(
        batched.bank.balance_of(&usdt(), &batched.treasury),
        single.bank.balance_of(&usdt(), &single.treasury)
    );
    assert_eq!(
        batched.pool.contract_stats().total_minted,
        single.pool.contract_stats().total_minted
    );
}

#[test]
fn multi_token_batch_settles_each_token() {
    let mut h = harness(100);
    let dai = TokenId::new("DAI");
    h.pool.add_supported_token(h.admin, dai.clone()).unwrap();
    h.bank.deposit(&dai, &h.agent, dec(10_000));

    let mut mixed = batch(&["X1", "X2", "X3"], dec(1000));
    mixed.tokens[1] = dai.clone();

    h.pool.mint_voucher_batch(h.agent, &mixed).unwrap();
    assert_eq!(h.pool.contract_token_balance(&usdt()), dec(2000));
    assert_eq!(h.pool.contract_token_balance(&dai), dec(1000));
    h.pool.verify_custody(&usdt()).unwrap();
    h.pool.verify_custody(&dai).unwrap();
}
