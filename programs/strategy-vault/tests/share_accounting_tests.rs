/// Share-accounting law tests
///
/// These drive the ledger state types directly through the same sequences
/// the join/exit/invest-idle handlers perform, with a simulated yield source
/// standing in for the token plumbing. Full integration tests with
/// mollusk-svm would require aligning Solana SDK versions between Anchor
/// 0.32.1 and mollusk-svm 0.7.2, which have version conflicts; the
/// accounting laws are all exercisable at this level.

use anchor_lang::prelude::*;
use strategy_vault::constants::{BASIS_POINTS_100_PERCENT, TWO_POW_32};
use strategy_vault::math;
use strategy_vault::state::{ExitRequest, Investment, PriceOracle, Strategy};

/// Derivative-token position priced at a pushed p32 rate, mirroring
/// RateYieldAdapter without the token program
struct SimulatedYieldSource {
    price_p32: u64,
    position_tokens: u64,
}

impl SimulatedYieldSource {
    fn new() -> Self {
        Self {
            price_p32: TWO_POW_32, // 1.0 base per token
            position_tokens: 0,
        }
    }

    fn total_value(&self) -> u64 {
        math::token_amount_to_base_value(self.position_tokens, self.price_p32).unwrap()
    }

    fn invest(&mut self, base_amount: u64) {
        self.position_tokens +=
            math::base_value_to_token_amount(base_amount, self.price_p32).unwrap();
    }

    fn divest(&mut self, base_amount: u64) -> u64 {
        let tokens =
            math::base_value_to_token_amount_ceil(base_amount, self.price_p32).unwrap();
        assert!(tokens <= self.position_tokens, "reserve underflow");
        self.position_tokens -= tokens;
        base_amount
    }

    fn divest_all(&mut self) -> u64 {
        let value = self.total_value();
        self.position_tokens = 0;
        value
    }

    /// Interest accrual: the derivative price rises, the position does not
    fn accrue(&mut self, new_price_p32: u64) {
        self.price_p32 = new_price_p32;
    }
}

fn mock_strategy() -> Strategy {
    Strategy {
        base_mint: Pubkey::default(),
        yield_source: Pubkey::default(),
        total_shares: 0,
        fees_collected: 0,
        bump: 0,
        authority_bump: 0,
        _reserved: [0; 64],
    }
}

fn mock_investment() -> Investment {
    Investment {
        strategy: Pubkey::default(),
        owner: Pubkey::default(),
        shares_held: 0,
        principal_invested: 0,
        bump: 0,
        _reserved: [0; 16],
    }
}

/// The join handler's accounting sequence: price against value-before,
/// invest, then mint
fn join(
    strategy: &mut Strategy,
    investment: &mut Investment,
    source: &mut SimulatedYieldSource,
    amount: u64,
) -> u64 {
    assert!(amount > 0);
    let value_before = source.total_value();
    let shares = strategy.shares_for_deposit(amount, value_before).unwrap();
    source.invest(amount);
    strategy.total_shares += shares;
    investment.shares_held += shares;
    investment.principal_invested += amount;
    shares
}

/// The exit handler's accounting sequence; returns (net credited, fee)
fn exit(
    strategy: &mut Strategy,
    investment: &mut Investment,
    source: &mut SimulatedYieldSource,
    request: ExitRequest,
    protocol_fee_bps: u16,
) -> (u64, u64) {
    let shares_held_before = investment.shares_held;
    let shares = request.resolve(shares_held_before).unwrap();
    assert!(shares > 0 && shares <= shares_held_before);

    let value_now = source.total_value();
    let gross = strategy.value_for_shares(shares, value_now).unwrap();

    let amount_out = if shares == strategy.total_shares {
        source.divest_all()
    } else {
        source.divest(gross)
    };

    let fee = math::apply_bp(amount_out, protocol_fee_bps).unwrap();
    let net = amount_out - fee;

    let principal_removed = if shares == shares_held_before {
        investment.principal_invested
    } else {
        math::mul_div(investment.principal_invested, shares, shares_held_before).unwrap()
    };

    strategy.total_shares -= shares;
    strategy.fees_collected += fee;
    investment.shares_held -= shares;
    investment.principal_invested -= principal_removed;

    (net, fee)
}

const UNIT: u64 = 1_000_000_000; // 9 decimals

// =============================================================================
// Share-price monotonicity under airdrop
// =============================================================================

#[test]
fn test_airdrop_sweep_raises_price_never_shares() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 50 * UNIT);
    let shares_before = strategy.total_shares;
    let price_before = strategy.share_price_p32(source.total_value()).unwrap();

    // unsolicited transfer lands idle, then invest-idle sweeps it:
    // value changes, shares must not
    source.invest(1000 * UNIT);

    assert_eq!(strategy.total_shares, shares_before);
    let price_after = strategy.share_price_p32(source.total_value()).unwrap();
    assert!(price_after > price_before, "sweep must raise the share price");
}

#[test]
fn test_interest_accrual_raises_price_never_shares() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 100 * UNIT);
    let shares_before = strategy.total_shares;

    source.accrue(TWO_POW_32 + TWO_POW_32 / 10); // +10%

    assert_eq!(strategy.total_shares, shares_before);
    assert_eq!(source.total_value(), 110 * UNIT);
}

// =============================================================================
// Join fairness
// =============================================================================

#[test]
fn test_first_join_mints_one_to_one() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    let minted = join(&mut strategy, &mut investment, &mut source, 50 * UNIT);
    assert_eq!(minted, 50 * UNIT);
    assert_eq!(strategy.total_shares, 50 * UNIT);
}

#[test]
fn test_join_after_airdrop_scenario() {
    // Domain fixture: 50 joined (1:1), 1000 airdropped and swept,
    // then a second account joins with 50
    let mut strategy = mock_strategy();
    let mut investment_a = mock_investment();
    let mut investment_b = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment_a, &mut source, 50 * UNIT);
    source.invest(1000 * UNIT); // swept airdrop

    assert_eq!(strategy.total_shares, 50 * UNIT);
    assert_eq!(source.total_value(), 1050 * UNIT);

    let minted = join(&mut strategy, &mut investment_b, &mut source, 50 * UNIT);
    // 50 * 50 / 1050 in token units
    assert_eq!(minted, 2_380_952_380);
    assert!(
        minted < 50 * UNIT,
        "joiner after an airdrop must not capture the prior gain"
    );

    // B's exit value reflects the reduced share count, not a 1:1 assumption
    let value_b = strategy
        .value_for_shares(investment_b.shares_held, source.total_value())
        .unwrap();
    assert!(value_b <= 50 * UNIT);
    // share truncation costs up to one share, ~21 base units at this price
    assert!(value_b > 50 * UNIT - 100, "within rounding of the contribution");
}

#[test]
fn test_later_joiner_not_diluting_earlier_holder() {
    let mut strategy = mock_strategy();
    let mut investment_a = mock_investment();
    let mut investment_b = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment_a, &mut source, 100 * UNIT);
    source.accrue(2 * TWO_POW_32); // position doubles in value

    let a_value_before = strategy
        .value_for_shares(investment_a.shares_held, source.total_value())
        .unwrap();

    join(&mut strategy, &mut investment_b, &mut source, 100 * UNIT);

    let a_value_after = strategy
        .value_for_shares(investment_a.shares_held, source.total_value())
        .unwrap();
    assert_eq!(
        a_value_before, a_value_after,
        "a new join must not move existing holders' value"
    );
}

// =============================================================================
// Round-trip and full-exit zeroing
// =============================================================================

#[test]
fn test_round_trip_returns_principal_zero_fee() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    let amount = 123_456_789_012;
    join(&mut strategy, &mut investment, &mut source, amount);
    let (net, fee) = exit(
        &mut strategy,
        &mut investment,
        &mut source,
        ExitRequest::Ratio(BASIS_POINTS_100_PERCENT),
        0,
    );

    assert_eq!(net, amount);
    assert_eq!(fee, 0);
    assert_eq!(strategy.total_shares, 0);
    assert!(investment.is_closed());
}

#[test]
fn test_round_trip_with_fee() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 1000 * UNIT);
    let (net, fee) = exit(
        &mut strategy,
        &mut investment,
        &mut source,
        ExitRequest::Shares(1000 * UNIT),
        50, // 0.50%
    );

    assert_eq!(fee, 5 * UNIT);
    assert_eq!(net, 995 * UNIT);
    assert_eq!(strategy.fees_collected, fee);
}

#[test]
fn test_full_exit_zeroes_ledger_and_drains_position() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 77 * UNIT);
    source.invest(13 * UNIT); // swept airdrop
    source.accrue(TWO_POW_32 * 3 / 2); // and some interest

    exit(
        &mut strategy,
        &mut investment,
        &mut source,
        ExitRequest::Ratio(BASIS_POINTS_100_PERCENT),
        0,
    );

    assert_eq!(strategy.total_shares, 0, "total shares must land at exactly 0");
    assert_eq!(source.position_tokens, 0, "no residual derivative dust");
    assert_eq!(investment.shares_held, 0);
    assert_eq!(investment.principal_invested, 0);
}

// =============================================================================
// Rejections leave state unchanged
// =============================================================================

#[test]
fn test_insufficient_shares_rejected_before_any_mutation() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 10 * UNIT);

    // the handler's guard sequence: resolve, then bound against the holding
    let requested = ExitRequest::Shares(11 * UNIT)
        .resolve(investment.shares_held)
        .unwrap();
    let rejected = requested > investment.shares_held;
    assert!(rejected, "over-held exit must be rejected with InsufficientShares");

    // nothing was touched
    assert_eq!(strategy.total_shares, 10 * UNIT);
    assert_eq!(investment.shares_held, 10 * UNIT);
    assert_eq!(source.total_value(), 10 * UNIT);
}

#[test]
fn test_zero_and_out_of_range_requests_rejected() {
    assert!(ExitRequest::Ratio(0).resolve(100).is_err());
    assert!(ExitRequest::Ratio(10_001).resolve(100).is_err());
    assert_eq!(ExitRequest::Shares(0).resolve(100).unwrap(), 0);
    // a resolved 0 is then rejected by the handler's ZeroAmount guard
}

// =============================================================================
// Investment record lifecycle
// =============================================================================

#[test]
fn test_partial_exit_prorates_principal() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 100 * UNIT);
    exit(
        &mut strategy,
        &mut investment,
        &mut source,
        ExitRequest::Ratio(2_500), // 25%
        0,
    );

    assert_eq!(investment.shares_held, 75 * UNIT);
    assert_eq!(investment.principal_invested, 75 * UNIT);
    assert!(!investment.is_closed());
}

#[test]
fn test_closed_record_reopens_on_new_join() {
    let mut strategy = mock_strategy();
    let mut investment = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut investment, &mut source, 40 * UNIT);
    exit(
        &mut strategy,
        &mut investment,
        &mut source,
        ExitRequest::Ratio(BASIS_POINTS_100_PERCENT),
        0,
    );
    assert!(investment.is_closed());

    join(&mut strategy, &mut investment, &mut source, 15 * UNIT);
    assert_eq!(investment.shares_held, 15 * UNIT);
    assert_eq!(investment.principal_invested, 15 * UNIT);
}

#[test]
fn test_share_conservation_across_accounts() {
    let mut strategy = mock_strategy();
    let mut inv_a = mock_investment();
    let mut inv_b = mock_investment();
    let mut inv_c = mock_investment();
    let mut source = SimulatedYieldSource::new();

    join(&mut strategy, &mut inv_a, &mut source, 30 * UNIT);
    source.accrue(TWO_POW_32 * 5 / 4);
    join(&mut strategy, &mut inv_b, &mut source, 20 * UNIT);
    source.invest(7 * UNIT);
    join(&mut strategy, &mut inv_c, &mut source, 11 * UNIT);
    exit(
        &mut strategy,
        &mut inv_a,
        &mut source,
        ExitRequest::Ratio(5_000),
        25,
    );

    assert_eq!(
        inv_a.shares_held + inv_b.shares_held + inv_c.shares_held,
        strategy.total_shares,
        "sum of holdings must equal the strategy's total shares"
    );
}

// =============================================================================
// Exit request representations
// =============================================================================

#[test]
fn test_ratio_and_absolute_requests_agree() {
    let mut strategy_a = mock_strategy();
    let mut inv_a = mock_investment();
    let mut source_a = SimulatedYieldSource::new();
    let mut strategy_b = mock_strategy();
    let mut inv_b = mock_investment();
    let mut source_b = SimulatedYieldSource::new();

    join(&mut strategy_a, &mut inv_a, &mut source_a, 200 * UNIT);
    join(&mut strategy_b, &mut inv_b, &mut source_b, 200 * UNIT);

    let (net_a, _) = exit(
        &mut strategy_a,
        &mut inv_a,
        &mut source_a,
        ExitRequest::Ratio(5_000),
        0,
    );
    let (net_b, _) = exit(
        &mut strategy_b,
        &mut inv_b,
        &mut source_b,
        ExitRequest::Shares(100 * UNIT),
        0,
    );

    assert_eq!(net_a, net_b);
}

// =============================================================================
// Slippage bound
// =============================================================================

fn mock_oracle(rate_p32: u64) -> PriceOracle {
    PriceOracle {
        token_in: Pubkey::new_unique(),
        token_out: Pubkey::new_unique(),
        rate_p32,
        rate_timestamp: 0,
        bump: 0,
        _reserved: [0; 16],
    }
}

/// The exit handler's bound: expected out priced by the oracle, minimum out
/// is the expectation less the configured max slippage
fn min_out_for(oracle: &PriceOracle, token_to_burn: u64, max_slippage_bps: u16) -> u64 {
    let expected = oracle.convert(token_to_burn).unwrap();
    math::apply_bp(expected, BASIS_POINTS_100_PERCENT - max_slippage_bps).unwrap()
}

#[test]
fn test_payout_at_slippage_bound_accepted() {
    // oracle rate 1.0, 1% tolerance: 1000 tokens expect 1000, floor is 990
    let oracle = mock_oracle(TWO_POW_32);
    let min_out = min_out_for(&oracle, 1000 * UNIT, 100);
    assert_eq!(min_out, 990 * UNIT);

    // a payout exactly at the floor passes the handler's check
    let amount_out = 990 * UNIT;
    assert!(amount_out >= min_out);
}

#[test]
fn test_payout_below_slippage_bound_rejected() {
    let oracle = mock_oracle(TWO_POW_32);
    let min_out = min_out_for(&oracle, 1000 * UNIT, 100);

    // one unit under the floor trips SlippageExceeded
    let amount_out = 990 * UNIT - 1;
    assert!(amount_out < min_out);
}

#[test]
fn test_slippage_bound_tracks_oracle_rate() {
    // rate 1.25: 800 tokens expect 1000 out; 50 bps tolerance floors at 995
    let oracle = mock_oracle(TWO_POW_32 + TWO_POW_32 / 4);
    let min_out = min_out_for(&oracle, 800 * UNIT, 50);
    assert_eq!(min_out, 995 * UNIT);

    // zero tolerance demands the full oracle expectation
    assert_eq!(min_out_for(&oracle, 800 * UNIT, 0), 1000 * UNIT);
    // full tolerance disables the bound
    assert_eq!(
        min_out_for(&oracle, 800 * UNIT, BASIS_POINTS_100_PERCENT),
        0
    );
}
