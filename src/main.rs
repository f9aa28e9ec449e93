//! Command-line runner for transact jobs.
//!
//! # Architecture Overview
//!
//! ```text
//!   job.json ──▶ Job ──▶ TransactPayload ──┐
//!                                          ▼
//!   config.toml ──▶ TransactConfig ──▶ Transactor ──▶ StepEvent::Await
//!                      │                                  │
//!                      ├─▶ ProviderSigner (local key)     ▼
//!                      ├─▶ HttpSafeProposer (Safe mode)  AwaitStep::run ──▶ status lines on stdout
//!                      └─▶ SimulationClient (gas)
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use stepper_transact::blockchain::{BlockchainClient, Network, ProviderSigner, Wallet};
use stepper_transact::config::{load_config, TransactConfig};
use stepper_transact::gas::{self, SimulationClient};
use stepper_transact::job::Job;
use stepper_transact::observability;
use stepper_transact::safe::HttpSafeProposer;
use stepper_transact::transact::{
    Modal, StatusMessage, StepEvent, Transactor, WalletState,
};

#[derive(Parser)]
#[command(name = "stepper-transact")]
#[command(about = "Sign, propose and confirm transaction jobs", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a job through the configured wallet
    Run {
        #[arg(short, long)]
        job: PathBuf,
    },
    /// Print the buffered gas limit a Safe batch of this job would use
    Estimate {
        #[arg(short, long)]
        job: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TransactConfig::default(),
    };
    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        chain_id = config.blockchain.chain_id,
        network = %config.blockchain.network_name,
        safe_mode = config.safe.enabled,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Run { job } => run(config, Job::from_file(&job)?).await,
        Commands::Estimate { job } => estimate(config, Job::from_file(&job)?).await,
    }
}

async fn run(config: TransactConfig, job: Job) -> Result<(), Box<dyn std::error::Error>> {
    let network = Network::from_config(&config.blockchain);
    let estimator = Arc::new(SimulationClient::new(&config.gas_estimation)?);
    let mut transactor = Transactor::new(Arc::new(Modal::new()), estimator);

    let wallet = if config.safe.enabled {
        let proposer = Arc::new(HttpSafeProposer::new(&config.safe)?);
        transactor = transactor.with_safe_proposer(proposer.clone());
        WalletState::new(network)
            .with_safe(proposer.safe_address())
            .with_signer(proposer)
    } else {
        let client = BlockchainClient::new(config.blockchain.clone()).await?;
        let key = Wallet::from_env(config.blockchain.chain_id)?;
        let address = key.address();
        WalletState::new(network)
            .with_address(address)
            .with_signer(Arc::new(ProviderSigner::new(client, key)))
    };

    let (step_tx, mut step_rx) = mpsc::unbounded_channel::<StepEvent>();
    transactor.transact(&step_tx, &wallet, job.into_payload())?;
    drop(step_tx);

    let (status_tx, mut status_rx) = mpsc::unbounded_channel::<StatusMessage>();
    let printer = tokio::spawn(async move {
        while let Some(status) = status_rx.recv().await {
            print_status(&status);
        }
    });

    while let Some(StepEvent::Await(step)) = step_rx.recv().await {
        print_status(&step.message);
        let outcome = step.run(Arc::new(status_tx.clone())).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    drop(status_tx);
    printer.await?;
    Ok(())
}

async fn estimate(config: TransactConfig, job: Job) -> Result<(), Box<dyn std::error::Error>> {
    let from = if config.safe.enabled {
        HttpSafeProposer::new(&config.safe)?.safe_address()
    } else {
        Wallet::from_env(config.blockchain.chain_id)?.address()
    };

    let client = SimulationClient::new(&config.gas_estimation)?;
    let request = job.simulation_request(config.blockchain.chain_id, from);
    let safe_tx_gas = gas::estimate_batch_gas(&client, &request).await?;

    tracing::info!(endpoint = client.endpoint(), safe_tx_gas, "Batch gas estimated");
    println!("{}", safe_tx_gas);
    Ok(())
}

fn print_status(status: &StatusMessage) {
    match &status.link {
        Some(link) => println!("{} ({}: {})", status.message, link.label, link.url),
        None => println!("{}", status.message),
    }
}
