// Sweepstake Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    borsh::try_from_slice_unchecked,
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Sealed},
    pubkey::Pubkey,
};

use crate::{
    config::{RaffleConfig, NUM_WORDS, REQUEST_CONFIRMATIONS},
    error::SweepstakeError,
    ledger::Ledger,
};

/// Seed prefix of the raffle program derived address
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Status of the current round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries
    Open,
    /// Sealed, waiting on Switchboard to deliver randomness
    Calculating,
}

/// Correlation token for a randomness request: the VRF account's request counter
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cycle of entry collection through payout
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub state: RaffleState,
    pub ledger: Ledger,
    /// When the previous round closed (or the raffle was created)
    pub last_timestamp: UnixTimestamp,
    /// Set exactly while `state == Calculating`
    pub pending_request_id: Option<RequestId>,
}

impl Round {
    pub fn new(opened_at: UnixTimestamp) -> Self {
        Self {
            state: RaffleState::Open,
            ledger: Ledger::default(),
            last_timestamp: opened_at,
            pending_request_id: None,
        }
    }
}

/// Result of a completed round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinnerRecord {
    pub winner: Pubkey,
    /// Lamports paid out
    pub payout: u64,
    pub round_closed_at: UnixTimestamp,
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Bump of the raffle program derived address
    pub bump: u8,
    /// Creator of the raffle; part of the address seeds, holds no privileges
    pub authority: Pubkey,
    pub config: RaffleConfig,
    pub round: Round,
    /// Most recent completed round, if any
    pub recent_winner: Option<WinnerRecord>,
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Raffle {
    pub fn new(
        authority: Pubkey,
        bump: u8,
        config: RaffleConfig,
        opened_at: UnixTimestamp,
    ) -> Self {
        Self {
            is_initialized: true,
            bump,
            authority,
            config,
            round: Round::new(opened_at),
            recent_winner: None,
        }
    }

    /// Account size needed for a raffle holding up to `max_players` entries
    pub fn space(max_players: u32) -> usize {
        let config = 8 + 8 + 32 + 32 + 4 + 4 + 1 + 1;
        let ledger = 4 + 32 * max_players as usize + 8;
        let round = 1 + ledger + 8 + (1 + 8);
        let winner = 1 + (32 + 8 + 8);
        1 + 1 + 32 + config + round + winner
    }

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let raffle: Raffle = try_from_slice_unchecked(data)
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if !raffle.is_initialized {
            return Err(SweepstakeError::NotInitialized.into());
        }
        Ok(raffle)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        let mut cursor = dst;
        self.serialize(&mut cursor)
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn raffle_state(&self) -> RaffleState {
        self.round.state
    }

    pub fn player(&self, index: usize) -> Option<&Pubkey> {
        self.round.ledger.players().get(index)
    }

    pub fn number_of_players(&self) -> usize {
        self.round.ledger.players().len()
    }

    pub fn pool(&self) -> u64 {
        self.round.ledger.pool()
    }

    pub fn latest_timestamp(&self) -> UnixTimestamp {
        self.round.last_timestamp
    }

    pub fn pending_request_id(&self) -> Option<RequestId> {
        self.round.pending_request_id
    }

    pub fn recent_winner(&self) -> Option<&WinnerRecord> {
        self.recent_winner.as_ref()
    }

    pub fn num_words(&self) -> u32 {
        NUM_WORDS
    }

    pub fn request_confirmations(&self) -> u16 {
        REQUEST_CONFIRMATIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_raffle(max_players: u32) -> Raffle {
        let mut config =
            RaffleConfig::with_defaults(Pubkey::new_unique(), Pubkey::new_unique(), 255, 255);
        config.max_players = max_players;
        let mut raffle = Raffle::new(Pubkey::new_unique(), 254, config, 1_700_000_000);
        for _ in 0..max_players {
            raffle
                .round
                .ledger
                .record_entry(RaffleState::Open, Pubkey::new_unique(), 100, 100, max_players)
                .unwrap();
        }
        raffle.round.state = RaffleState::Calculating;
        raffle.round.pending_request_id = Some(RequestId(u64::MAX));
        raffle.recent_winner = Some(WinnerRecord {
            winner: Pubkey::new_unique(),
            payout: u64::MAX,
            round_closed_at: i64::MAX,
        });
        raffle
    }

    #[test]
    fn test_space_fits_a_full_raffle() {
        for max_players in [1, 3, 64] {
            let raffle = full_raffle(max_players);
            let serialized = raffle.try_to_vec().unwrap();
            assert_eq!(serialized.len(), Raffle::space(max_players));
        }
    }

    #[test]
    fn test_pack_unpack_in_oversized_account() {
        let raffle = full_raffle(2);
        let mut data = vec![0u8; Raffle::space(8)];
        raffle.pack(&mut data).unwrap();
        assert_eq!(Raffle::unpack(&data).unwrap(), raffle);
    }

    #[test]
    fn test_unpack_rejects_uninitialized() {
        let data = vec![0u8; Raffle::space(4)];
        assert_eq!(
            Raffle::unpack(&data),
            Err(SweepstakeError::NotInitialized.into())
        );
    }

    #[test]
    fn test_pack_rejects_undersized_account() {
        let raffle = full_raffle(4);
        let mut data = vec![0u8; Raffle::space(3)];
        assert!(raffle.pack(&mut data).is_err());
    }

    #[test]
    fn test_queries() {
        let raffle = full_raffle(3);
        assert_eq!(raffle.number_of_players(), 3);
        assert_eq!(raffle.pool(), 300);
        assert!(raffle.player(2).is_some());
        assert!(raffle.player(3).is_none());
        assert_eq!(raffle.num_words(), 1);
        assert_eq!(raffle.request_confirmations(), 3);
        assert_eq!(raffle.raffle_state(), RaffleState::Calculating);
        assert_eq!(raffle.latest_timestamp(), 1_700_000_000);
    }
}
