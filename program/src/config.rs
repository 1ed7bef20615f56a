// Sweepstake Program - Configuration
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::error::SweepstakeError;

/// Random words requested per draw
pub const NUM_WORDS: u32 = 1;
/// Confirmations the oracle waits before answering
pub const REQUEST_CONFIRMATIONS: u16 = 3;
/// Upper bound on `max_players` so the raffle account stays a sane size
pub const MAX_PLAYERS_LIMIT: u32 = 256;

/// 0.01 SOL
pub const DEFAULT_ENTRANCE_FEE: u64 = 10_000_000;
pub const DEFAULT_INTERVAL: u64 = 30;
pub const DEFAULT_CALLBACK_GAS_LIMIT: u32 = 500_000;
pub const DEFAULT_MAX_PLAYERS: u32 = 64;

/// Immutable sweepstake configuration, fixed when the raffle account is created
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RaffleConfig {
    /// Minimum stake per entry in lamports
    pub entrance_fee: u64,
    /// Seconds that must pass between the close of one round and the next draw
    pub interval: u64,
    /// Switchboard oracle queue serving the draw; selects the fee tier
    pub oracle_queue: Pubkey,
    /// Switchboard VRF account whose authority is the raffle account. Its
    /// escrow pays for randomness
    pub vrf_account: Pubkey,
    /// Compute ceiling the fulfillment is expected to fit in
    pub callback_gas_limit: u32,
    /// Player capacity of one round; sizes the raffle account
    pub max_players: u32,
    /// Bump of the Switchboard program state address
    pub switchboard_state_bump: u8,
    /// Bump of the permission account letting the VRF use the queue
    pub permission_bump: u8,
}

impl RaffleConfig {
    /// Development settings, mirroring the local network table the raffle was
    /// first deployed with
    pub fn with_defaults(
        oracle_queue: Pubkey,
        vrf_account: Pubkey,
        switchboard_state_bump: u8,
        permission_bump: u8,
    ) -> Self {
        Self {
            entrance_fee: DEFAULT_ENTRANCE_FEE,
            interval: DEFAULT_INTERVAL,
            oracle_queue,
            vrf_account,
            callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
            max_players: DEFAULT_MAX_PLAYERS,
            switchboard_state_bump,
            permission_bump,
        }
    }

    pub fn validate(&self) -> Result<(), SweepstakeError> {
        if self.entrance_fee == 0 {
            msg!("Entrance fee must be greater than zero");
            return Err(SweepstakeError::InvalidConfig);
        }
        if self.max_players == 0 || self.max_players > MAX_PLAYERS_LIMIT {
            msg!(
                "Max players must be between 1 and {}, got {}",
                MAX_PLAYERS_LIMIT,
                self.max_players
            );
            return Err(SweepstakeError::InvalidConfig);
        }
        if self.callback_gas_limit == 0 {
            msg!("Callback gas limit must be greater than zero");
            return Err(SweepstakeError::InvalidConfig);
        }
        if self.oracle_queue == Pubkey::default() || self.vrf_account == Pubkey::default() {
            msg!("Oracle queue and VRF account must be set");
            return Err(SweepstakeError::InvalidConfig);
        }
        Ok(())
    }
}
