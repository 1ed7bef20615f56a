// Sweepstake Program - Winner selection and payout
use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::SweepstakeError,
    state::{RaffleState, RequestId, Round, WinnerRecord},
};

/// Moves the pool to the winner. Must either deliver the full amount or fail
/// without moving anything.
pub trait PayoutTransfer {
    fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), ProgramError>;
}

/// Index of the winning entry for a random word
pub fn winner_index(random_word: u64, player_count: usize) -> Option<usize> {
    if player_count == 0 {
        return None;
    }
    Some((random_word % player_count as u64) as usize)
}

/// Close the round with the delivered randomness.
///
/// Either the payout lands and the round reopens empty, or the round is left
/// exactly as it was (still calculating, same pending request).
pub fn fulfill<P: PayoutTransfer>(
    round: &mut Round,
    request_id: RequestId,
    random_words: &[u64],
    now: UnixTimestamp,
    payout: &mut P,
) -> Result<WinnerRecord, SweepstakeError> {
    if round.pending_request_id != Some(request_id) {
        msg!(
            "Fulfillment for request {} does not match pending request {:?}",
            request_id,
            round.pending_request_id
        );
        return Err(SweepstakeError::UnknownRequestId);
    }
    let random_word = *random_words
        .first()
        .ok_or(SweepstakeError::MissingRandomWords)?;

    let players = round.ledger.players();
    let index =
        winner_index(random_word, players.len()).ok_or(SweepstakeError::NoPlayers)?;
    let winner = players[index];
    let amount = round.ledger.pool();
    msg!("Random winner index: {} of {}", index, players.len());

    payout.transfer(&winner, amount).map_err(|err| {
        msg!("Payout of {} lamports to {} failed: {}", amount, winner, err);
        SweepstakeError::PayoutTransferFailed
    })?;

    let (_, pool) = round.ledger.drain();
    round.pending_request_id = None;
    round.last_timestamp = now;
    round.state = RaffleState::Open;

    Ok(WinnerRecord {
        winner,
        payout: pool,
        round_closed_at: now,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records transfers, or refuses them all
    #[derive(Default)]
    pub(crate) struct MockPayout {
        pub transfers: Vec<(Pubkey, u64)>,
        pub fail: bool,
    }

    impl PayoutTransfer for MockPayout {
        fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), ProgramError> {
            if self.fail {
                return Err(ProgramError::InsufficientFunds);
            }
            self.transfers.push((*winner, amount));
            Ok(())
        }
    }

    fn pending_round(players: &[Pubkey], stake: u64, request_id: RequestId) -> Round {
        let mut round = Round::new(1_000);
        for player in players {
            round
                .ledger
                .record_entry(RaffleState::Open, *player, stake, stake, 64)
                .unwrap();
        }
        round.state = RaffleState::Calculating;
        round.pending_request_id = Some(request_id);
        round
    }

    #[test]
    fn test_winner_index() {
        assert_eq!(winner_index(7, 3), Some(1));
        assert_eq!(winner_index(0, 3), Some(0));
        assert_eq!(winner_index(u64::MAX, 1), Some(0));
        assert_eq!(winner_index(5, 0), None);
    }

    #[test]
    fn test_fulfill_pays_and_reopens() {
        let players = [Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];
        let mut round = pending_round(&players, 100, RequestId(1));
        let mut payout = MockPayout::default();

        let record = fulfill(&mut round, RequestId(1), &[7], 1_050, &mut payout).unwrap();

        assert_eq!(
            record,
            WinnerRecord {
                winner: players[1],
                payout: 300,
                round_closed_at: 1_050,
            }
        );
        assert_eq!(payout.transfers, vec![(players[1], 300)]);
        assert_eq!(round.state, RaffleState::Open);
        assert_eq!(round.pending_request_id, None);
        assert_eq!(round.last_timestamp, 1_050);
        assert!(round.ledger.is_empty());
        assert_eq!(round.ledger.pool(), 0);
    }

    #[test]
    fn test_repeat_entrant_weighting_follows_entry_list() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let players = [alice, alice, bob];
        for (word, expected) in [(0, alice), (1, alice), (2, bob), (4, alice)] {
            let mut round = pending_round(&players, 10, RequestId(3));
            let record =
                fulfill(&mut round, RequestId(3), &[word], 0, &mut MockPayout::default()).unwrap();
            assert_eq!(record.winner, expected);
        }
    }

    #[test]
    fn test_unknown_request_changes_nothing() {
        let players = [Pubkey::new_unique()];
        let mut round = pending_round(&players, 100, RequestId(1));
        let before = round.clone();
        let mut payout = MockPayout::default();

        assert_eq!(
            fulfill(&mut round, RequestId(2), &[7], 2_000, &mut payout),
            Err(SweepstakeError::UnknownRequestId)
        );
        assert_eq!(round, before);
        assert!(payout.transfers.is_empty());
    }

    #[test]
    fn test_open_round_has_no_pending_request() {
        let mut round = Round::new(0);
        assert_eq!(
            fulfill(&mut round, RequestId(1), &[7], 10, &mut MockPayout::default()),
            Err(SweepstakeError::UnknownRequestId)
        );
    }

    #[test]
    fn test_failed_payout_rolls_back() {
        let players = [Pubkey::new_unique(), Pubkey::new_unique()];
        let mut round = pending_round(&players, 100, RequestId(5));
        let before = round.clone();
        let mut payout = MockPayout {
            fail: true,
            ..Default::default()
        };

        assert_eq!(
            fulfill(&mut round, RequestId(5), &[1], 2_000, &mut payout),
            Err(SweepstakeError::PayoutTransferFailed)
        );
        assert_eq!(round, before);

        payout.fail = false;
        let record = fulfill(&mut round, RequestId(5), &[1], 2_001, &mut payout).unwrap();
        assert_eq!(record.winner, players[1]);
        assert_eq!(record.payout, 200);
    }

    #[test]
    fn test_missing_words_and_empty_round() {
        let mut round = pending_round(&[Pubkey::new_unique()], 100, RequestId(1));
        assert_eq!(
            fulfill(&mut round, RequestId(1), &[], 0, &mut MockPayout::default()),
            Err(SweepstakeError::MissingRandomWords)
        );

        let mut round = pending_round(&[], 100, RequestId(1));
        assert_eq!(
            fulfill(&mut round, RequestId(1), &[3], 0, &mut MockPayout::default()),
            Err(SweepstakeError::NoPlayers)
        );
    }
}
