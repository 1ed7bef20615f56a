// Sweepstake Program - Randomness requests
use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    config::{RaffleConfig, NUM_WORDS, REQUEST_CONFIRMATIONS},
    error::SweepstakeError,
    state::{RaffleState, RequestId, Round},
};

/// Parameters of one randomness request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomWordsRequest {
    /// Oracle queue selecting the fee tier
    pub oracle_queue: Pubkey,
    /// VRF account the answer is written to; its escrow pays for the request
    pub vrf_account: Pubkey,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

impl RandomWordsRequest {
    pub fn from_config(config: &RaffleConfig) -> Self {
        Self {
            oracle_queue: config.oracle_queue,
            vrf_account: config.vrf_account,
            request_confirmations: REQUEST_CONFIRMATIONS,
            callback_gas_limit: config.callback_gas_limit,
            num_words: NUM_WORDS,
        }
    }
}

/// The oracle side of a draw. Implementations must either accept the request
/// and hand back the id it will answer under, or fail without side effects.
pub trait RandomnessCoordinator {
    fn request_random_words(
        &mut self,
        request: &RandomWordsRequest,
    ) -> Result<RequestId, ProgramError>;
}

/// Ask the coordinator for one random word on behalf of the raffle
pub fn request_randomness<C: RandomnessCoordinator>(
    coordinator: &mut C,
    config: &RaffleConfig,
) -> Result<RequestId, SweepstakeError> {
    let request = RandomWordsRequest::from_config(config);
    let request_id = coordinator.request_random_words(&request).map_err(|err| {
        msg!(
            "Randomness request for VRF {} rejected: {}",
            request.vrf_account,
            err
        );
        SweepstakeError::RandomnessRequestRejected(err)
    })?;
    msg!(
        "Randomness requested: id={}, confirmations={}, words={}",
        request_id,
        request.request_confirmations,
        request.num_words
    );
    Ok(request_id)
}

/// Record the accepted request against the round, sealing it
pub fn correlate(round: &mut Round, request_id: RequestId) {
    round.pending_request_id = Some(request_id);
    round.state = RaffleState::Calculating;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory coordinator handing out sequential ids, like a VRF account
    /// with a funded escrow
    #[derive(Default)]
    pub(crate) struct MockCoordinator {
        pub next_id: u64,
        pub requests: Vec<RandomWordsRequest>,
        pub reject_with: Option<ProgramError>,
    }

    impl RandomnessCoordinator for MockCoordinator {
        fn request_random_words(
            &mut self,
            request: &RandomWordsRequest,
        ) -> Result<RequestId, ProgramError> {
            if let Some(err) = self.reject_with.clone() {
                return Err(err);
            }
            self.next_id += 1;
            self.requests.push(request.clone());
            Ok(RequestId(self.next_id))
        }
    }

    fn config() -> RaffleConfig {
        RaffleConfig::with_defaults(Pubkey::new_unique(), Pubkey::new_unique(), 255, 255)
    }

    #[test]
    fn test_request_carries_config() {
        let config = config();
        let mut coordinator = MockCoordinator::default();
        let id = request_randomness(&mut coordinator, &config).unwrap();

        assert_eq!(id, RequestId(1));
        assert_eq!(
            coordinator.requests,
            vec![RandomWordsRequest {
                oracle_queue: config.oracle_queue,
                vrf_account: config.vrf_account,
                request_confirmations: 3,
                callback_gas_limit: 500_000,
                num_words: 1,
            }]
        );
    }

    #[test]
    fn test_rejection_is_surfaced() {
        let mut coordinator = MockCoordinator {
            reject_with: Some(ProgramError::InsufficientFunds),
            ..Default::default()
        };
        assert_eq!(
            request_randomness(&mut coordinator, &config()),
            Err(SweepstakeError::RandomnessRequestRejected(
                ProgramError::InsufficientFunds
            ))
        );
    }

    #[test]
    fn test_correlate_seals_round() {
        let mut round = Round::new(0);
        correlate(&mut round, RequestId(42));
        assert_eq!(round.state, RaffleState::Calculating);
        assert_eq!(round.pending_request_id, Some(RequestId(42)));
    }
}
