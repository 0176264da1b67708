// This is my main entry point for the ledger CLI application
// I'm importing all the core components I built for this ledger
use clap::Parser;
use data_encoding::HEXLOWER;
use log::{error, info, LevelFilter};
use microledger::cli::LedgerKind;
use microledger::core::monetary::conversions::format_satoshis;
use microledger::{
    address_from_pub_key, sha256_digest, BalanceTable, Block, Chain, Command, Keyring, Ledger,
    Opt, Transaction, UtxoSet, UtxoTransaction, BLOCK_REWARD, GLOBAL_CONFIG, SATOSHIS_PER_COIN,
};
use serde_json::json;
use std::process;

fn main() {
    // I initialize logging so I can see what's happening in my ledger
    // Setting it to Info level gives me enough detail without being too verbose
    env_logger::builder().filter_level(LevelFilter::Info).init();

    // I parse the command line arguments using clap - this gives me a nice CLI interface
    let opt = Opt::parse();

    // I run the actual command and handle any errors that might occur
    // If something goes wrong, I log the error and exit with code 1
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

// This is where I handle all the different CLI commands
fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // When I want a fresh identity: keypair plus derived address
        Command::Keygen => {
            let mut keyring = Keyring::new();
            let address = keyring.create_wallet()?;
            let wallet = keyring
                .get_wallet(&address)
                .ok_or("Wallet vanished right after creation")?;
            println!("Address:    {address}");
            println!("Public key: {}", HEXLOWER.encode(&wallet.get_public_key()));
            // I print the secret so the key can be re-imported later;
            // this keyring lives only in memory
            println!(
                "Secret:     {}",
                HEXLOWER.encode(&wallet.keypair().secret_bytes())
            );
        }
        // Quick way to get a SHA-256 digest from the command line
        Command::Hash { message } => {
            let digest = sha256_digest(message.as_bytes());
            println!("{}", HEXLOWER.encode(&digest));
        }
        // Derive the Base58Check address for an existing public key
        Command::Address { pubkey } => {
            let pub_key = HEXLOWER
                .decode(pubkey.to_lowercase().as_bytes())
                .map_err(|e| format!("Invalid hex public key: {e}"))?;
            let version = GLOBAL_CONFIG.get_address_version();
            println!("{}", address_from_pub_key(&pub_key, version));
        }
        // A self-contained three-party scenario over the chosen ledger
        Command::Demo { ledger } => match ledger {
            LedgerKind::Balance => {
                let mut table = BalanceTable::new();
                run_demo(&mut table, |table, address, amount| {
                    table.register(address, amount);
                    Ok(())
                })?;
            }
            LedgerKind::Utxo => {
                let mut set = UtxoSet::new();
                run_demo(&mut set, |set, address, amount| {
                    // I fund the UTXO ledger the honest way: a coinbase
                    // transaction indexed into the set. Zero-value funding
                    // is a no-op since outputs must carry value.
                    if amount == 0 {
                        return Ok(());
                    }
                    let coinbase = UtxoTransaction::new_coinbase(address, amount)?;
                    set.index_transaction(&coinbase)?;
                    Ok(())
                })?;
            }
        },
    }
    Ok(())
}

// The demo, generic over the ledger representation. The `fund` closure is
// the only per-variant step: each ledger has its own notion of how value
// enters the system.
fn run_demo<L, F>(ledger: &mut L, fund: F) -> Result<(), Box<dyn std::error::Error>>
where
    L: Ledger,
    F: Fn(&mut L, &str, u64) -> Result<(), Box<dyn std::error::Error>>,
{
    let difficulty = GLOBAL_CONFIG.get_difficulty();

    // Three participants with fresh keypairs
    let mut keyring = Keyring::new();
    let alice = keyring.create_wallet()?;
    let bob = keyring.create_wallet()?;
    let charlie = keyring.create_wallet()?;
    info!("Alice:   {alice}");
    info!("Bob:     {bob}");
    info!("Charlie: {charlie}");

    // Alice and Bob each start with one block reward; Charlie starts broke
    // but still needs to exist as an account to be able to receive
    fund(ledger, &alice, BLOCK_REWARD)?;
    fund(ledger, &bob, BLOCK_REWARD)?;
    fund(ledger, &charlie, 0)?;

    // An empty genesis block anchors the chain
    let mut chain = Chain::new();
    let genesis = Block::assemble_and_mine(&[], None, &[], ledger, difficulty)?;
    info!("Mined genesis block {}", genesis.get_hash_hex());
    chain.append(genesis)?;

    // Two signed transfers, mined into the second block
    let alice_wallet = keyring
        .get_wallet(&alice)
        .ok_or("Alice's wallet is missing from the keyring")?;
    let bob_wallet = keyring
        .get_wallet(&bob)
        .ok_or("Bob's wallet is missing from the keyring")?;
    let tx1 = Transaction::new(alice_wallet, &bob, 30 * SATOSHIS_PER_COIN)?;
    let tx2 = Transaction::new(bob_wallet, &charlie, 20 * SATOSHIS_PER_COIN)?;
    let sender_keys = vec![
        Some(alice_wallet.get_public_key()),
        Some(bob_wallet.get_public_key()),
    ];

    let block = Block::assemble_and_mine(
        &[tx1, tx2],
        chain.tip_hash(),
        &sender_keys,
        ledger,
        difficulty,
    )?;
    info!("Mined block {}", block.get_hash_hex());
    chain.append(block)?;

    // A full integrity pass over the chain: linkage plus proof-of-work
    chain.verify(difficulty)?;
    info!("Chain verified at height {}", chain.height());

    for (name, address) in [("Alice", &alice), ("Bob", &bob), ("Charlie", &charlie)] {
        println!(
            "{name:8} {address}  {}",
            format_satoshis(ledger.balance_of(address))
        );
    }

    // A machine-readable summary of what the demo produced
    let mut balances = serde_json::Map::new();
    for address in [&alice, &bob, &charlie] {
        balances.insert(address.to_string(), json!(ledger.balance_of(address)));
    }
    let summary = json!({
        "height": chain.height(),
        "difficulty": difficulty,
        "blocks": chain
            .iter()
            .map(|b| {
                json!({
                    "hash": b.get_hash_hex(),
                    "pre_block_hash": HEXLOWER.encode(b.get_pre_block_hash()),
                    "timestamp": b.get_timestamp(),
                    "nonce": b.get_nonce(),
                    "transactions": b.get_transactions().len(),
                })
            })
            .collect::<Vec<_>>(),
        "balances": balances,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
