// Switchboard VRF integration for the sweepstake program
use anchor_lang::accounts::account::Account;
use anchor_spl::token::TokenAccount;
use arrayref::array_ref;
use solana_program::{account_info::AccountInfo, msg, program_error::ProgramError, pubkey::Pubkey};
use switchboard_v2::{
    OracleQueueAccountData, VrfAccountData, VrfRequestRandomness, SWITCHBOARD_PROGRAM_ID,
};

use crate::{
    broker::{RandomWordsRequest, RandomnessCoordinator},
    error::SweepstakeError,
    state::RequestId,
};

/// Randomness found on a VRF account, keyed by the request it answers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VrfOutcome {
    pub request_id: RequestId,
    pub random_words: Vec<u64>,
}

struct VrfSnapshot {
    counter: u128,
    result: Option<[u8; 32]>,
}

// Fields are copied out because the account layout is packed
fn load_vrf(
    vrf_info: &AccountInfo,
    expected: &Pubkey,
    raffle: &Pubkey,
) -> Result<VrfSnapshot, ProgramError> {
    if vrf_info.key != expected {
        msg!("VRF account {} is not the configured {}", vrf_info.key, expected);
        return Err(SweepstakeError::InvalidSwitchboardAccount.into());
    }
    if vrf_info.owner != &SWITCHBOARD_PROGRAM_ID {
        msg!("VRF account not owned by Switchboard program");
        return Err(SweepstakeError::InvalidSwitchboardAccount.into());
    }

    let vrf = VrfAccountData::new(vrf_info)?;
    let authority = vrf.authority;
    if authority != *raffle {
        msg!("VRF authority {} is not the raffle account", authority);
        return Err(SweepstakeError::InvalidSwitchboardAccount.into());
    }
    let counter = vrf.counter;
    let result = vrf.get_result().ok().filter(|result| *result != [0u8; 32]);
    Ok(VrfSnapshot {
        counter: counter as u128,
        result,
    })
}

/// The VRF request counter doubles as the request id
pub fn request_id_from_counter(counter: u128) -> Result<RequestId, SweepstakeError> {
    u64::try_from(counter)
        .map(RequestId)
        .map_err(|_| SweepstakeError::InvalidVrfState)
}

/// First eight bytes of a VRF result, little endian
pub fn random_word(result: &[u8; 32]) -> u64 {
    u64::from_le_bytes(*array_ref![result, 0, 8])
}

/// Read the randomness Switchboard wrote for the raffle's latest request
pub fn read_vrf_outcome(
    vrf_info: &AccountInfo,
    expected_vrf: &Pubkey,
    raffle: &Pubkey,
) -> Result<VrfOutcome, ProgramError> {
    let snapshot = load_vrf(vrf_info, expected_vrf, raffle)?;
    let result = snapshot.result.ok_or_else(|| {
        msg!("VRF request {} has not been answered", snapshot.counter);
        SweepstakeError::RandomnessNotReady
    })?;
    Ok(VrfOutcome {
        request_id: request_id_from_counter(snapshot.counter)?,
        random_words: vec![random_word(&result)],
    })
}

/// Switchboard reached through CPI, with the raffle account signing as VRF
/// authority. The keeper's token wallet pays the request fee into the escrow.
pub struct SwitchboardVrf<'a, 'info> {
    pub switchboard_program: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub authority_seeds: &'a [&'a [u8]],
    pub vrf: &'a AccountInfo<'info>,
    pub oracle_queue: &'a AccountInfo<'info>,
    pub queue_authority: &'a AccountInfo<'info>,
    pub data_buffer: &'a AccountInfo<'info>,
    pub permission: &'a AccountInfo<'info>,
    pub escrow: &'a AccountInfo<'info>,
    pub payer_wallet: &'a AccountInfo<'info>,
    pub payer_authority: &'a AccountInfo<'info>,
    pub recent_blockhashes: &'a AccountInfo<'info>,
    pub program_state: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub state_bump: u8,
    pub permission_bump: u8,
}

impl<'a, 'info> SwitchboardVrf<'a, 'info> {
    fn check_queue(&self, request: &RandomWordsRequest) -> Result<(), ProgramError> {
        if self.switchboard_program.key != &SWITCHBOARD_PROGRAM_ID {
            msg!("Expected Switchboard program, got {}", self.switchboard_program.key);
            return Err(SweepstakeError::InvalidSwitchboardAccount.into());
        }
        if *self.oracle_queue.key != request.oracle_queue {
            msg!(
                "Oracle queue {} is not the configured {}",
                self.oracle_queue.key,
                request.oracle_queue
            );
            return Err(SweepstakeError::InvalidSwitchboardAccount.into());
        }

        let queue = OracleQueueAccountData::new(self.oracle_queue)?;
        let queue_authority = queue.authority;
        let data_buffer = queue.data_buffer;
        if queue_authority != *self.queue_authority.key || data_buffer != *self.data_buffer.key {
            msg!("Queue authority or data buffer does not match the oracle queue");
            return Err(SweepstakeError::InvalidSwitchboardAccount.into());
        }
        Ok(())
    }
}

impl<'a, 'info> RandomnessCoordinator for SwitchboardVrf<'a, 'info> {
    fn request_random_words(
        &mut self,
        request: &RandomWordsRequest,
    ) -> Result<RequestId, ProgramError> {
        self.check_queue(request)?;
        let before = load_vrf(self.vrf, &request.vrf_account, self.authority.key)?.counter;

        let vrf_request_randomness = VrfRequestRandomness {
            authority: self.authority.clone(),
            vrf: self.vrf.clone(),
            oracle_queue: self.oracle_queue.clone(),
            queue_authority: self.queue_authority.clone(),
            data_buffer: self.data_buffer.clone(),
            permission: self.permission.clone(),
            escrow: Account::<TokenAccount>::try_from(self.escrow)?,
            payer_wallet: Account::<TokenAccount>::try_from(self.payer_wallet)?,
            payer_authority: self.payer_authority.clone(),
            recent_blockhashes: self.recent_blockhashes.clone(),
            program_state: self.program_state.clone(),
            token_program: self.token_program.clone(),
        };
        vrf_request_randomness.invoke_signed(
            self.switchboard_program.clone(),
            self.state_bump,
            self.permission_bump,
            &[self.authority_seeds],
        )?;

        let after = load_vrf(self.vrf, &request.vrf_account, self.authority.key)?.counter;
        if after <= before {
            msg!("VRF counter did not advance past {}", before);
            return Err(SweepstakeError::InvalidVrfState.into());
        }
        msg!(
            "VRF request {} queued, callback budget {}",
            after,
            request.callback_gas_limit
        );
        Ok(request_id_from_counter(after)?)
    }
}
