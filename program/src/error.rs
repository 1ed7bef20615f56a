// Sweepstake Program - Errors
use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError,
    program_error::ProgramError,
};
use thiserror::Error;

use crate::state::RaffleState;

/// Errors that may be returned by the Sweepstake program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepstakeError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstruction,

    /// Entry amount is below the entrance fee
    #[error("Entry amount is below the entrance fee")]
    InsufficientStake,

    /// The round is waiting on randomness and accepts no entries
    #[error("Round is sealed while a draw is in flight")]
    RoundSealed,

    /// Upkeep conditions do not hold
    #[error("Upkeep not needed (pool: {pool}, players: {player_count}, state: {state:?})")]
    UpkeepNotNeeded {
        pool: u64,
        player_count: u64,
        state: RaffleState,
    },

    /// Fulfillment does not match the pending request
    #[error("Unknown randomness request id")]
    UnknownRequestId,

    /// The winner could not be paid
    #[error("Payout transfer to the winner failed")]
    PayoutTransferFailed,

    /// The oracle refused the randomness request
    #[error("Randomness request rejected by Switchboard: {0}")]
    RandomnessRequestRejected(ProgramError),

    #[error("Randomness fulfillment carried no random words")]
    MissingRandomWords,

    #[error("No players recorded for the pending draw")]
    NoPlayers,

    #[error("Raffle has reached its player capacity")]
    PlayerLimitReached,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Raffle not initialized")]
    NotInitialized,

    #[error("Raffle already initialized")]
    AlreadyInitialized,

    #[error("Invalid raffle configuration")]
    InvalidConfig,

    /// Raffle account is not the expected program derived address
    #[error("Invalid raffle account")]
    InvalidRaffleAccount,

    /// A Switchboard account does not match the raffle configuration, is not
    /// owned by Switchboard, or is not controlled by the raffle
    #[error("Invalid Switchboard account")]
    InvalidSwitchboardAccount,

    #[error("VRF account holds no randomness yet")]
    RandomnessNotReady,

    /// VRF request counter did not advance or no longer fits a request id
    #[error("Invalid VRF request counter")]
    InvalidVrfState,
}

impl SweepstakeError {
    /// Stable custom error code reported through `ProgramError::Custom`
    pub fn code(&self) -> u32 {
        match self {
            SweepstakeError::InvalidInstruction => 0,
            SweepstakeError::InsufficientStake => 1,
            SweepstakeError::RoundSealed => 2,
            SweepstakeError::UpkeepNotNeeded { .. } => 3,
            SweepstakeError::UnknownRequestId => 4,
            SweepstakeError::PayoutTransferFailed => 5,
            SweepstakeError::RandomnessRequestRejected(_) => 6,
            SweepstakeError::MissingRandomWords => 7,
            SweepstakeError::NoPlayers => 8,
            SweepstakeError::PlayerLimitReached => 9,
            SweepstakeError::ArithmeticOverflow => 10,
            SweepstakeError::NotInitialized => 11,
            SweepstakeError::AlreadyInitialized => 12,
            SweepstakeError::InvalidConfig => 13,
            SweepstakeError::InvalidRaffleAccount => 14,
            SweepstakeError::InvalidSwitchboardAccount => 15,
            SweepstakeError::RandomnessNotReady => 16,
            SweepstakeError::InvalidVrfState => 17,
        }
    }
}

impl From<SweepstakeError> for ProgramError {
    fn from(e: SweepstakeError) -> Self {
        match e {
            // Switchboard's own error is what the caller needs to see
            SweepstakeError::RandomnessRequestRejected(inner) => inner,
            other => ProgramError::Custom(other.code()),
        }
    }
}

impl<T> DecodeError<T> for SweepstakeError {
    fn type_of() -> &'static str {
        "Sweepstake Error"
    }
}

impl PrintProgramError for SweepstakeError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upkeep_not_needed_carries_diagnostics() {
        let err = SweepstakeError::UpkeepNotNeeded {
            pool: 0,
            player_count: 0,
            state: RaffleState::Open,
        };
        assert_eq!(
            err.to_string(),
            "Upkeep not needed (pool: 0, players: 0, state: Open)"
        );
        assert_eq!(ProgramError::from(err), ProgramError::Custom(3));
    }

    #[test]
    fn test_switchboard_error_passes_through() {
        let err = SweepstakeError::RandomnessRequestRejected(ProgramError::InsufficientFunds);
        assert_eq!(ProgramError::from(err), ProgramError::InsufficientFunds);
    }

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            SweepstakeError::InvalidInstruction,
            SweepstakeError::InsufficientStake,
            SweepstakeError::RoundSealed,
            SweepstakeError::UpkeepNotNeeded {
                pool: 1,
                player_count: 1,
                state: RaffleState::Calculating,
            },
            SweepstakeError::UnknownRequestId,
            SweepstakeError::PayoutTransferFailed,
            SweepstakeError::RandomnessRequestRejected(ProgramError::InvalidArgument),
            SweepstakeError::MissingRandomWords,
            SweepstakeError::NoPlayers,
            SweepstakeError::PlayerLimitReached,
            SweepstakeError::ArithmeticOverflow,
            SweepstakeError::NotInitialized,
            SweepstakeError::AlreadyInitialized,
            SweepstakeError::InvalidConfig,
            SweepstakeError::InvalidRaffleAccount,
            SweepstakeError::InvalidSwitchboardAccount,
            SweepstakeError::RandomnessNotReady,
            SweepstakeError::InvalidVrfState,
        ];
        let mut codes: Vec<u32> = all.iter().map(SweepstakeError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
