// Sweepstake Program
// An interval sweepstake on Solana: players stake a fixed fee, a keeper seals
// the round once the interval has passed, and Switchboard VRF randomness
// picks the winner who receives the whole pool.

// Round core
pub mod clock_gate;
pub mod ledger;
pub mod upkeep;
pub mod broker;
pub mod draw;
pub mod machine;

// Program plumbing
pub mod config;
pub mod error;
pub mod events;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod utils;

// Switchboard VRF client
pub mod vrf;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
