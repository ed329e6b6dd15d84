use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use crate::blockchain::{HandlerConfig, Transaction, TxHandler, TxHash, UTXOPool, UtxoId, UtxoStore};
use crate::blockchain::TxOutput;
use crate::cryptography::Wallet;
use crate::error::Result;
use crate::scenario::{Scenario, ScenarioReport};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level (per-transaction rejections) unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON scenario epoch by epoch
    Run {
        /// Scenario file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Maximum unique candidates considered per epoch
        #[arg(long)]
        max_batch_size: Option<usize>,
    },

    /// Run a built-in epoch with a double spend and a chained spend
    Demo,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn handle_command(&self) -> Result<()> {
        match &self.command {
            Commands::Run { scenario, max_batch_size } => {
                info!("Loading scenario {}", scenario.display());
                let scenario = Scenario::load(scenario)?;
                let config = HandlerConfig {
                    max_batch_size: *max_batch_size,
                };
                let report = scenario.run(config)?;
                print_report(&report);
                Ok(())
            }
            Commands::Demo => run_demo(),
        }
    }
}

fn print_report(report: &ScenarioReport) {
    for (number, epoch) in report.epochs.iter().enumerate() {
        println!("epoch {}: {}/{} committed", number, epoch.committed.len(), epoch.submitted);
        for hash in &epoch.committed {
            println!("  {}", hash);
        }
    }
    print_pool(&report.remaining);
}

fn print_pool(pool: &UTXOPool) {
    let mut utxos = pool.all_utxos();
    utxos.sort_by(|a, b| a.0.cmp(&b.0));
    println!("remaining UTXOs: {}", utxos.len());
    for (id, output) in utxos {
        println!("  {} -> {} ({})", id, output.value, output.address);
    }
}

fn run_demo() -> Result<()> {
    let alice = Wallet::from_label("alice");
    let bob = Wallet::from_label("bob");
    let carol = Wallet::from_label("carol");

    let genesis = TxHash::of_label("genesis");
    let mut pool = UTXOPool::new();
    pool.insert(UtxoId::new(genesis, 0), TxOutput::new(10, alice.get_address()));
    pool.insert(UtxoId::new(genesis, 1), TxOutput::new(5, bob.get_address()));

    // alice pays bob and carol from the same coin
    let mut to_bob = Transaction::new();
    to_bob.add_input(genesis, 0);
    to_bob.add_output(10, bob.get_address());
    to_bob.sign_input(0, &alice)?;
    let to_bob_hash = to_bob.content_hash()?;

    let mut to_carol = Transaction::new();
    to_carol.add_input(genesis, 0);
    to_carol.add_output(10, carol.get_address());
    to_carol.sign_input(0, &alice)?;

    // bob spends the output he has not received yet
    let mut chained = Transaction::new();
    chained.add_input(to_bob_hash, 0);
    chained.add_output(10, carol.get_address());
    chained.sign_input(0, &bob)?;

    let mut independent = Transaction::new();
    independent.add_input(genesis, 1);
    independent.add_output(4, carol.get_address());
    independent.sign_input(0, &bob)?;

    let mut handler = TxHandler::new(&pool);
    let committed = handler.handle_epoch(vec![to_bob, to_carol, chained, independent]);

    println!("committed {} of 4", committed.len());
    for tx in &committed {
        println!("  {} ({} in, {} out)", tx.finalized_hash()?, tx.num_inputs(), tx.num_outputs());
    }
    print_pool(handler.utxo_pool());
    Ok(())
}
