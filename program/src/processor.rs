// Sweepstake Program - Instruction Processor
use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::{clock::Clock, Sysvar},
};

use crate::{
    config::RaffleConfig,
    draw::PayoutTransfer,
    error::SweepstakeError,
    instruction::SweepstakeInstruction,
    machine::Sweepstake,
    state::{Raffle, RAFFLE_SEED},
    upkeep::{self, CheckUpkeepResponse},
    utils::{find_raffle_address, lamports_to_sol},
    vrf::{self, SwitchboardVrf},
};

/// Program state handler.
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = SweepstakeInstruction::unpack(instruction_data)?;

        match instruction {
            SweepstakeInstruction::InitializeRaffle { config } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(program_id, accounts, config)
            }
            SweepstakeInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(program_id, accounts, amount)
            }
            SweepstakeInstruction::CheckUpkeep { check_data } => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts, check_data)
            }
            SweepstakeInstruction::PerformUpkeep { perform_data } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts, perform_data)
            }
            SweepstakeInstruction::FulfillRandomWords => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts)
            }
        }
    }

    fn process_initialize_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        config: RaffleConfig,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;
        let clock_info = next_account_info(account_info_iter)?;

        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if *system_program_info.key != system_program::id() {
            return Err(ProgramError::IncorrectProgramId);
        }

        let (expected_raffle, bump) = find_raffle_address(program_id, authority_info.key);
        if *raffle_info.key != expected_raffle {
            msg!("Invalid raffle account address");
            return Err(SweepstakeError::InvalidRaffleAccount.into());
        }
        if raffle_info.owner == program_id {
            msg!("Raffle account is already initialized");
            return Err(SweepstakeError::AlreadyInitialized.into());
        }

        config.validate()?;

        let space = Raffle::space(config.max_players);
        let rent = Rent::get()?;
        let rent_lamports = rent.minimum_balance(space);
        // A pre-funded address only needs topping up to the rent floor
        let required_lamports = rent_lamports.saturating_sub(raffle_info.lamports());
        if required_lamports > 0 {
            invoke(
                &system_instruction::transfer(authority_info.key, raffle_info.key, required_lamports),
                &[
                    authority_info.clone(),
                    raffle_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        }
        let raffle_seeds: &[&[u8]] = &[RAFFLE_SEED, authority_info.key.as_ref(), &[bump]];
        invoke_signed(
            &system_instruction::allocate(raffle_info.key, space as u64),
            &[raffle_info.clone(), system_program_info.clone()],
            &[raffle_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(raffle_info.key, program_id),
            &[raffle_info.clone(), system_program_info.clone()],
            &[raffle_seeds],
        )?;

        let clock = Clock::from_account_info(clock_info)?;
        let raffle = Raffle::new(*authority_info.key, bump, config, clock.unix_timestamp);
        raffle.pack(&mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle initialized: fee={} SOL, interval={}s, capacity={}, vrf={}",
            lamports_to_sol(raffle.config.entrance_fee),
            raffle.config.interval,
            raffle.config.max_players,
            raffle.config.vrf_account
        );
        Ok(())
    }

    fn process_enter_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;
        let event = Sweepstake::new(&mut raffle).enter(*player_info.key, amount)?;

        invoke(
            &system_instruction::transfer(player_info.key, raffle_info.key, amount),
            &[
                player_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    fn process_check_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        check_data: Vec<u8>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;
        let clock_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(program_id, raffle_info)?;
        let clock = Clock::from_account_info(clock_info)?;
        let status = upkeep::evaluate(&raffle.round, clock.unix_timestamp, &raffle.config);

        msg!(
            "Upkeep needed: {} ({:?}), players={}, pool={}",
            status.eligible,
            status.reason,
            raffle.number_of_players(),
            raffle.pool()
        );
        let response = CheckUpkeepResponse {
            upkeep_needed: status.eligible,
            reason: status.reason,
            perform_data: check_data,
        };
        let data = response
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        set_return_data(&data);
        Ok(())
    }

    fn process_perform_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        perform_data: Vec<u8>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let keeper_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let switchboard_program_info = next_account_info(account_info_iter)?;
        let vrf_info = next_account_info(account_info_iter)?;
        let oracle_queue_info = next_account_info(account_info_iter)?;
        let queue_authority_info = next_account_info(account_info_iter)?;
        let data_buffer_info = next_account_info(account_info_iter)?;
        let permission_info = next_account_info(account_info_iter)?;
        let escrow_info = next_account_info(account_info_iter)?;
        let payer_wallet_info = next_account_info(account_info_iter)?;
        let recent_blockhashes_info = next_account_info(account_info_iter)?;
        let program_state_info = next_account_info(account_info_iter)?;
        let token_program_info = next_account_info(account_info_iter)?;
        let clock_info = next_account_info(account_info_iter)?;

        // Anyone may act as keeper; eligibility is re-checked below
        if !keeper_info.is_signer {
            msg!("Keeper must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;
        if !perform_data.is_empty() {
            msg!("Ignoring {} bytes of perform data", perform_data.len());
        }

        let clock = Clock::from_account_info(clock_info)?;
        let authority = raffle.authority;
        let bump = [raffle.bump];
        let raffle_seeds: &[&[u8]] = &[RAFFLE_SEED, authority.as_ref(), &bump];
        let mut switchboard = SwitchboardVrf {
            switchboard_program: switchboard_program_info,
            authority: raffle_info,
            authority_seeds: raffle_seeds,
            vrf: vrf_info,
            oracle_queue: oracle_queue_info,
            queue_authority: queue_authority_info,
            data_buffer: data_buffer_info,
            permission: permission_info,
            escrow: escrow_info,
            payer_wallet: payer_wallet_info,
            payer_authority: keeper_info,
            recent_blockhashes: recent_blockhashes_info,
            program_state: program_state_info,
            token_program: token_program_info,
            state_bump: raffle.config.switchboard_state_bump,
            permission_bump: raffle.config.permission_bump,
        };

        let event =
            Sweepstake::new(&mut raffle).perform_upkeep(clock.unix_timestamp, &mut switchboard)?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;
        let vrf_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;
        let clock_info = next_account_info(account_info_iter)?;

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;
        // Only Switchboard can write an answer into a VRF account the raffle controls
        let outcome =
            vrf::read_vrf_outcome(vrf_info, &raffle.config.vrf_account, raffle_info.key)?;

        let clock = Clock::from_account_info(clock_info)?;
        let mut payout = LamportPayout {
            source: raffle_info,
            destination: winner_info,
            rent: Rent::get()?,
        };

        let event = Sweepstake::new(&mut raffle).fulfill_random_words(
            outcome.request_id,
            &outcome.random_words,
            clock.unix_timestamp,
            &mut payout,
        )?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    fn load_raffle(program_id: &Pubkey, raffle_info: &AccountInfo) -> Result<Raffle, ProgramError> {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }
        let raffle = Raffle::unpack(&raffle_info.data.borrow())?;
        Ok(raffle)
    }
}

/// Pays the pool straight out of the program-owned raffle account
struct LamportPayout<'a, 'info> {
    source: &'a AccountInfo<'info>,
    destination: &'a AccountInfo<'info>,
    rent: Rent,
}

impl<'a, 'info> PayoutTransfer for LamportPayout<'a, 'info> {
    fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        if self.destination.key != winner {
            msg!("Prize recipient {} is not the drawn winner {}", self.destination.key, winner);
            return Err(ProgramError::InvalidArgument);
        }
        if !self.destination.is_writable {
            msg!("Prize recipient must be writable");
            return Err(ProgramError::InvalidArgument);
        }
        let source_floor = self.rent.minimum_balance(self.source.data_len());
        let available = self.source.lamports().saturating_sub(source_floor);
        if available < amount {
            msg!("Raffle holds {} spendable lamports, owes {}", available, amount);
            return Err(ProgramError::InsufficientFunds);
        }
        let credited = self
            .destination
            .lamports()
            .checked_add(amount)
            .ok_or(SweepstakeError::ArithmeticOverflow)?;
        // The runtime rejects a credit that leaves the recipient below rent exemption
        let destination_floor = self.rent.minimum_balance(self.destination.data_len());
        if credited < destination_floor {
            msg!(
                "Payout of {} leaves {} below its rent exempt minimum of {}",
                amount,
                winner,
                destination_floor
            );
            return Err(ProgramError::InsufficientFunds);
        }

        **self.source.try_borrow_mut_lamports()? -= amount;
        **self.destination.try_borrow_mut_lamports()? = credited;
        msg!("Paid {} lamports to {}", amount, winner);
        Ok(())
    }
}
