// Sweepstake Program - Round state machine
use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::{
    broker::{self, RandomnessCoordinator},
    draw::{self, PayoutTransfer},
    error::SweepstakeError,
    events::SweepstakeEvent,
    state::{Raffle, RequestId},
    upkeep::{self, UpkeepStatus},
};

/// Drives one raffle through its OPEN -> CALCULATING -> OPEN cycle.
///
/// Every operation either completes or returns an error with the raffle left
/// untouched; callers persist the raffle only on success.
pub struct Sweepstake<'a> {
    raffle: &'a mut Raffle,
}

impl<'a> Sweepstake<'a> {
    pub fn new(raffle: &'a mut Raffle) -> Self {
        Self { raffle }
    }

    /// Stake `amount` lamports for `participant` in the current round
    pub fn enter(
        &mut self,
        participant: Pubkey,
        amount: u64,
    ) -> Result<SweepstakeEvent, SweepstakeError> {
        let config = &self.raffle.config;
        self.raffle.round.ledger.record_entry(
            self.raffle.round.state,
            participant,
            amount,
            config.entrance_fee,
            config.max_players,
        )?;
        msg!(
            "{} entered with {} lamports ({} players, pool {})",
            participant,
            amount,
            self.raffle.round.ledger.players().len(),
            self.raffle.round.ledger.pool()
        );
        Ok(SweepstakeEvent::EntryAccepted {
            participant,
            amount,
        })
    }

    pub fn check_upkeep(&self, now: UnixTimestamp) -> UpkeepStatus {
        upkeep::evaluate(&self.raffle.round, now, &self.raffle.config)
    }

    /// Seal the round and request randomness for its draw.
    ///
    /// The round only becomes CALCULATING once the coordinator has accepted
    /// the request.
    pub fn perform_upkeep<C: RandomnessCoordinator>(
        &mut self,
        now: UnixTimestamp,
        coordinator: &mut C,
    ) -> Result<SweepstakeEvent, SweepstakeError> {
        let status = self.check_upkeep(now);
        if !status.eligible {
            let err = upkeep::not_needed(&self.raffle.round);
            msg!("Upkeep rejected ({:?}): {}", status.reason, err);
            return Err(err);
        }

        let request_id = broker::request_randomness(coordinator, &self.raffle.config)?;
        broker::correlate(&mut self.raffle.round, request_id);
        Ok(SweepstakeEvent::DrawRequested { request_id })
    }

    /// Draw the winner for `request_id`, pay the pool out and reopen
    pub fn fulfill_random_words<P: PayoutTransfer>(
        &mut self,
        request_id: RequestId,
        random_words: &[u64],
        now: UnixTimestamp,
        payout: &mut P,
    ) -> Result<SweepstakeEvent, SweepstakeError> {
        let record = draw::fulfill(&mut self.raffle.round, request_id, random_words, now, payout)?;
        self.raffle.recent_winner = Some(record);
        Ok(SweepstakeEvent::WinnerPicked {
            winner: record.winner,
            payout: record.payout,
        })
    }

    pub fn raffle(&self) -> &Raffle {
        self.raffle
    }
}
