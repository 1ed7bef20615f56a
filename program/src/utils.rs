// Sweepstake Program - Utility Functions
use solana_program::pubkey::Pubkey;

use crate::state::RAFFLE_SEED;

/// Find the program derived address of the raffle created by `authority`
pub fn find_raffle_address(program_id: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RAFFLE_SEED, authority.as_ref()], program_id)
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / 1_000_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raffle_address_is_per_authority() {
        let program_id = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        assert_eq!(
            find_raffle_address(&program_id, &alice),
            find_raffle_address(&program_id, &alice)
        );
        assert_ne!(
            find_raffle_address(&program_id, &alice).0,
            find_raffle_address(&program_id, &bob).0
        );
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(10_000_000), 0.01);
    }
}
