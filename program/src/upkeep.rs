// Sweepstake Program - Upkeep eligibility
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::clock::UnixTimestamp;

use crate::{
    clock_gate,
    config::RaffleConfig,
    error::SweepstakeError,
    state::{RaffleState, Round},
};

/// Why a draw may or may not start
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpkeepReason {
    Ready,
    /// A draw is already in flight
    Calculating,
    IntervalNotElapsed,
    NoPlayers,
    EmptyPool,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub eligible: bool,
    pub reason: UpkeepReason,
}

/// Return data of the `CheckUpkeep` instruction
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub reason: UpkeepReason,
    /// Caller's check data, to be passed back unexamined to `PerformUpkeep`
    pub perform_data: Vec<u8>,
}

/// Decide whether the round may be drawn.
///
/// Eligible iff the interval has elapsed, the round is open, and it holds
/// both players and a non-zero pool. Has no side effects and may be called in
/// any state.
pub fn evaluate(round: &Round, now: UnixTimestamp, config: &RaffleConfig) -> UpkeepStatus {
    let reason = if round.state != RaffleState::Open {
        UpkeepReason::Calculating
    } else if !clock_gate::elapsed(now, round.last_timestamp, config.interval) {
        UpkeepReason::IntervalNotElapsed
    } else if round.ledger.is_empty() {
        UpkeepReason::NoPlayers
    } else if round.ledger.pool() == 0 {
        UpkeepReason::EmptyPool
    } else {
        UpkeepReason::Ready
    };

    UpkeepStatus {
        eligible: reason == UpkeepReason::Ready,
        reason,
    }
}

/// Error to report when a draw is attempted on an ineligible round
pub fn not_needed(round: &Round) -> SweepstakeError {
    SweepstakeError::UpkeepNotNeeded {
        pool: round.ledger.pool(),
        player_count: round.ledger.players().len() as u64,
        state: round.state,
    }
}
