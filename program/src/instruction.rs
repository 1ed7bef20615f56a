// Sweepstake Program - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
    sysvar::{clock, recent_blockhashes},
};
use switchboard_v2::SWITCHBOARD_PROGRAM_ID;

use crate::{config::RaffleConfig, error::SweepstakeError};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum SweepstakeInstruction {
    /// Create a raffle with an immutable configuration
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority creating (and paying for) the raffle
    /// 1. `[writable]` The raffle account, PDA of `["raffle", authority]`
    /// 2. `[]` The system program
    /// 3. `[]` The clock sysvar
    InitializeRaffle { config: RaffleConfig },

    /// Enter the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player, paying the stake
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    EnterRaffle {
        /// Stake in lamports, at least the entrance fee
        amount: u64,
    },

    /// Report whether a draw may start; sets `CheckUpkeepResponse` as return data
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    /// 1. `[]` The clock sysvar
    CheckUpkeep { check_data: Vec<u8> },

    /// Seal the round and request randomness from Switchboard (any keeper may
    /// call this; the keeper's token wallet pays the VRF fee)
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The keeper
    /// 1. `[writable]` The raffle account, authority of the VRF account
    /// 2. `[]` The Switchboard program
    /// 3. `[writable]` The VRF account
    /// 4. `[writable]` The oracle queue
    /// 5. `[writable]` The oracle queue authority
    /// 6. `[writable]` The oracle queue data buffer
    /// 7. `[writable]` The permission account
    /// 8. `[writable]` The VRF escrow token account
    /// 9. `[writable]` The keeper's token wallet
    /// 10. `[]` The recent blockhashes sysvar
    /// 11. `[writable]` The Switchboard program state
    /// 12. `[]` The token program
    /// 13. `[]` The clock sysvar
    PerformUpkeep { perform_data: Vec<u8> },

    /// Consume the randomness Switchboard wrote to the VRF account and pay the
    /// winner. The request id is the VRF request counter and the random word
    /// is read from the VRF result, so anyone may submit this.
    ///
    /// Accounts expected:
    /// 0. `[writable]` The raffle account
    /// 1. `[]` The VRF account
    /// 2. `[writable]` The prize recipient (drawn winner)
    /// 3. `[]` The clock sysvar
    FulfillRandomWords,
}

impl SweepstakeInstruction {
    /// Unpacks a byte buffer into a SweepstakeInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| SweepstakeError::InvalidInstruction.into())
    }
}

/// Create initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    authority: &Pubkey,
    raffle_account: &Pubkey,
    config: RaffleConfig,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &SweepstakeInstruction::InitializeRaffle { config },
        vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*raffle_account, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(clock::id(), false),
        ],
    )
}

/// Create enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    player: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &SweepstakeInstruction::EnterRaffle { amount },
        vec![
            AccountMeta::new(*player, true),
            AccountMeta::new(*raffle_account, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create check_upkeep instruction
pub fn check_upkeep(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
    check_data: Vec<u8>,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &SweepstakeInstruction::CheckUpkeep { check_data },
        vec![
            AccountMeta::new_readonly(*raffle_account, false),
            AccountMeta::new_readonly(clock::id(), false),
        ],
    )
}

/// Switchboard accounts a randomness request touches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VrfRequestAccounts {
    pub vrf: Pubkey,
    pub oracle_queue: Pubkey,
    pub queue_authority: Pubkey,
    pub data_buffer: Pubkey,
    pub permission: Pubkey,
    pub escrow: Pubkey,
    pub payer_wallet: Pubkey,
    pub program_state: Pubkey,
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    keeper: &Pubkey,
    raffle_account: &Pubkey,
    switchboard: &VrfRequestAccounts,
    perform_data: Vec<u8>,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &SweepstakeInstruction::PerformUpkeep { perform_data },
        vec![
            AccountMeta::new(*keeper, true),
            AccountMeta::new(*raffle_account, false),
            AccountMeta::new_readonly(SWITCHBOARD_PROGRAM_ID, false),
            AccountMeta::new(switchboard.vrf, false),
            AccountMeta::new(switchboard.oracle_queue, false),
            AccountMeta::new(switchboard.queue_authority, false),
            AccountMeta::new(switchboard.data_buffer, false),
            AccountMeta::new(switchboard.permission, false),
            AccountMeta::new(switchboard.escrow, false),
            AccountMeta::new(switchboard.payer_wallet, false),
            AccountMeta::new_readonly(recent_blockhashes::id(), false),
            AccountMeta::new(switchboard.program_state, false),
            AccountMeta::new_readonly(anchor_spl::token::ID, false),
            AccountMeta::new_readonly(clock::id(), false),
        ],
    )
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
    vrf: &Pubkey,
    winner: &Pubkey,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &SweepstakeInstruction::FulfillRandomWords,
        vec![
            AccountMeta::new(*raffle_account, false),
            AccountMeta::new_readonly(*vrf, false),
            AccountMeta::new(*winner, false),
            AccountMeta::new_readonly(clock::id(), false),
        ],
    )
}
