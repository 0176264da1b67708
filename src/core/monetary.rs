//! Monetary units for the ledger
//!
//! The core keeps every amount as an integer count of satoshis; floating
//! point only appears at the display boundary.

/// Number of satoshis in one coin (same as Bitcoin)
pub const SATOSHIS_PER_COIN: u64 = 100_000_000;

/// Block reward paid by a coinbase issuance (50 coins)
pub const BLOCK_REWARD: u64 = 50 * SATOSHIS_PER_COIN;

/// Display-only conversions between satoshis and coins
pub mod conversions {
    use super::*;

    /// Convert coins to satoshis
    pub fn coins_to_satoshis(coins: f64) -> u64 {
        (coins * SATOSHIS_PER_COIN as f64) as u64
    }

    /// Convert satoshis to coins
    pub fn satoshis_to_coins(satoshis: u64) -> f64 {
        satoshis as f64 / SATOSHIS_PER_COIN as f64
    }

    /// Format satoshis as a human-readable coin string
    pub fn format_satoshis(satoshis: u64) -> String {
        format!("{:.8} coins", satoshis_to_coins(satoshis))
    }
}
