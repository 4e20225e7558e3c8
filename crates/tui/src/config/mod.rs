use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

/// Reference deployment of the ATM contract.
const DEFAULT_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Wallet provider endpoint: a local signer daemon speaking the
    /// request-based JSON-RPC surface (Frame listens on 1248).
    pub wallet_url: String,
    /// Address of the ATM contract.
    pub contract: String,
    /// Amount moved by a single deposit/withdraw action.
    pub unit_amount: u64,
    /// Receipt polling interval in milliseconds.
    pub receipt_poll_ms: u64,
    /// Receipt polling attempts before reporting a timeout.
    pub receipt_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wallet_url: "http://127.0.0.1:1248".to_string(),
            contract: DEFAULT_CONTRACT.to_string(),
            unit_amount: 1,
            receipt_poll_ms: 1_000,
            receipt_attempts: 120,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sportello_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override wallet endpoint (e.g. http://127.0.0.1:1248).
    #[arg(long)]
    wallet_url: Option<String>,
    /// Override the contract address.
    #[arg(long)]
    contract: Option<String>,
    /// Override the deposit/withdraw unit amount.
    #[arg(long)]
    unit_amount: Option<u64>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SPORTELLO_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(wallet_url) = args.wallet_url {
        settings.wallet_url = wallet_url;
    }
    if let Some(contract) = args.contract {
        settings.contract = contract;
    }
    if let Some(unit_amount) = args.unit_amount {
        settings.unit_amount = unit_amount;
    }

    Ok(settings)
}
