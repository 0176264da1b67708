use clap::{Parser, Subcommand};
use std::str::FromStr;

/// Which account-state representation the demo runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Balance,
    Utxo,
}

impl FromStr for LedgerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balance" => Ok(LedgerKind::Balance),
            "utxo" => Ok(LedgerKind::Utxo),
            _ => Err(format!("Invalid ledger kind: {s}. Valid options: balance, utxo")),
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerKind::Balance => write!(f, "balance"),
            LedgerKind::Utxo => write!(f, "utxo"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "microledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "keygen", about = "Generate a new keypair and address")]
    Keygen,
    #[command(name = "hash", about = "Print the SHA-256 digest of a message")]
    Hash {
        #[arg(help = "The message to hash")]
        message: String,
    },
    #[command(name = "address", about = "Derive an address from a public key")]
    Address {
        #[arg(help = "Hex-encoded compressed public key (33 bytes)")]
        pubkey: String,
    },
    #[command(
        name = "demo",
        about = "Run a small three-party scenario: mine a genesis block and a transfer block"
    )]
    Demo {
        #[arg(
            long = "ledger",
            default_value = "balance",
            help = "Ledger representation (balance, utxo)"
        )]
        ledger: LedgerKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_kind_parses_case_insensitive() {
        assert_eq!(LedgerKind::from_str("Balance").unwrap(), LedgerKind::Balance);
        assert_eq!(LedgerKind::from_str("UTXO").unwrap(), LedgerKind::Utxo);
    }

    #[test]
    fn test_ledger_kind_rejects_unknown() {
        assert!(LedgerKind::from_str("merkle").is_err());
    }
}
