// Sweepstake Program - Audit events
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

use crate::state::RequestId;

/// Events published for off-chain indexers
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum SweepstakeEvent {
    EntryAccepted { participant: Pubkey, amount: u64 },
    DrawRequested { request_id: RequestId },
    WinnerPicked { winner: Pubkey, payout: u64 },
}

impl SweepstakeEvent {
    /// Log the event as text and as a Borsh payload in the program data log
    pub fn emit(&self) {
        match self {
            SweepstakeEvent::EntryAccepted { participant, amount } => {
                msg!("EntryAccepted: participant={}, amount={}", participant, amount)
            }
            SweepstakeEvent::DrawRequested { request_id } => {
                msg!("DrawRequested: request_id={}", request_id)
            }
            SweepstakeEvent::WinnerPicked { winner, payout } => {
                msg!("WinnerPicked: winner={}, payout={}", winner, payout)
            }
        }
        match self.try_to_vec() {
            Ok(data) => sol_log_data(&[&data]),
            Err(err) => msg!("Failed to encode event: {}", err),
        }
    }
}
