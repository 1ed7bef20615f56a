// Sweepstake Program - Ledger of stakes for the current round
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{error::SweepstakeError, state::RaffleState};

/// Entrants and pooled stake of the current round.
///
/// Entry order is preserved and a participant appears once per entry, so
/// repeat entrants carry proportionally more weight in the draw.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    pub(crate) players: Vec<Pubkey>,
    pub(crate) pool: u64,
}

/// Read-only view of the ledger together with the round state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSnapshot<'a> {
    pub players: &'a [Pubkey],
    pub pool: u64,
    pub state: RaffleState,
}

impl Ledger {
    /// Record one entry of `amount` lamports for `participant`.
    ///
    /// Nothing is modified unless every check passes.
    pub fn record_entry(
        &mut self,
        state: RaffleState,
        participant: Pubkey,
        amount: u64,
        entrance_fee: u64,
        capacity: u32,
    ) -> Result<(), SweepstakeError> {
        if state == RaffleState::Calculating {
            msg!("Entry from {} rejected: round is calculating", participant);
            return Err(SweepstakeError::RoundSealed);
        }
        if amount < entrance_fee {
            msg!(
                "Entry from {} rejected: {} lamports is below the {} lamport fee",
                participant,
                amount,
                entrance_fee
            );
            return Err(SweepstakeError::InsufficientStake);
        }
        if self.players.len() >= capacity as usize {
            msg!("Entry from {} rejected: {} players already entered", participant, capacity);
            return Err(SweepstakeError::PlayerLimitReached);
        }
        let pool = self
            .pool
            .checked_add(amount)
            .ok_or(SweepstakeError::ArithmeticOverflow)?;

        self.players.push(participant);
        self.pool = pool;
        Ok(())
    }

    /// Hand back every entrant and the whole pool, leaving the ledger empty
    pub fn drain(&mut self) -> (Vec<Pubkey>, u64) {
        let players = std::mem::take(&mut self.players);
        let pool = std::mem::take(&mut self.pool);
        (players, pool)
    }

    pub fn snapshot(&self, state: RaffleState) -> LedgerSnapshot<'_> {
        LedgerSnapshot {
            players: &self.players,
            pool: self.pool,
            state,
        }
    }

    pub fn players(&self) -> &[Pubkey] {
        &self.players
    }

    pub fn pool(&self) -> u64 {
        self.pool
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
