//! hl-sign
//!
//! Offline hashing and signing of Hyperliquid actions read as JSON.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hyperliquid_core::signing::{action_hash, build_typed_data, SigningContext};
use hyperliquid_core::{Action, Network, SignerConfig, Wallet};
use hyperliquid_exchange::NonceManager;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hl-sign", version, about = "Hash and sign Hyperliquid actions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the action hash and the EIP-712 signing digest.
    Hash(ActionArgs),
    /// Print the EIP-712 typed data that would be signed.
    TypedData(ActionArgs),
    /// Sign with the key in HL_PRIVATE_KEY and print the request body.
    Sign(ActionArgs),
}

#[derive(Args, Debug)]
struct ActionArgs {
    /// Action JSON file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    action: PathBuf,

    /// Nonce in milliseconds; defaults to the current time.
    #[arg(long)]
    nonce: Option<u64>,

    /// Sign for testnet regardless of HL_NETWORK.
    #[arg(long)]
    testnet: bool,

    /// Vault or sub-account acted on.
    #[arg(long)]
    vault: Option<Address>,

    /// Reject the action after this timestamp (ms).
    #[arg(long)]
    expires_after: Option<u64>,
}

/// Flags resolved against environment configuration.
struct Resolved {
    network: Network,
    nonce: u64,
    vault_address: Option<Address>,
    expires_after: Option<u64>,
}

impl Resolved {
    fn context(&self) -> SigningContext {
        SigningContext::new(self.network, self.nonce)
            .with_vault(self.vault_address)
            .with_expires_after(self.expires_after)
    }
}

impl ActionArgs {
    /// Flags win over `HL_*` variables.
    fn resolve(&self, config: &SignerConfig) -> Resolved {
        Resolved {
            network: if self.testnet {
                Network::Testnet
            } else {
                config.network
            },
            nonce: self
                .nonce
                .unwrap_or_else(|| NonceManager::default().next()),
            vault_address: self.vault.or(config.vault_address),
            expires_after: self.expires_after.or(config.expires_after),
        }
    }

    fn read_action(&self, network: Network) -> Result<Action> {
        let raw = if self.action.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read action from stdin")?;
            buf
        } else {
            std::fs::read_to_string(&self.action)
                .with_context(|| format!("Failed to read {}", self.action.display()))?
        };

        let mut action: Action =
            serde_json::from_str(&raw).context("Action JSON does not match any known action")?;
        action.stamp_chain(network);
        Ok(action)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hl_sign=info,hyperliquid_core=info,hyperliquid_exchange=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = SignerConfig::from_env().context("Invalid HL_* configuration")?;

    match cli.command {
        Command::Hash(args) => {
            let resolved = args.resolve(&config);
            let action = args.read_action(resolved.network)?;
            let ctx = resolved.context();
            let data = build_typed_data(&action, &ctx)?;
            let hash = action_hash(&action, ctx.nonce, ctx.vault_address, ctx.expires_after)?;
            let output = serde_json::json!({
                "actionHash": hash.to_string(),
                "signingHash": data.signing_hash().to_string(),
                "nonce": ctx.nonce,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::TypedData(args) => {
            let resolved = args.resolve(&config);
            let action = args.read_action(resolved.network)?;
            let data = build_typed_data(&action, &resolved.context())?;
            println!("{}", serde_json::to_string_pretty(&data.to_json())?);
        }
        Command::Sign(args) => {
            let resolved = args.resolve(&config);
            let action = args.read_action(resolved.network)?;
            let wallet = Wallet::from_env().context("Failed to load signing key")?;
            let signer = wallet.action_signer(resolved.network);
            info!(
                address = %signer.address(),
                action = action.type_name(),
                nonce = resolved.nonce,
                network = %resolved.network,
                "Signing action"
            );
            let payload = signer.sign_action(
                action,
                resolved.nonce,
                resolved.vault_address,
                resolved.expires_after,
            )?;
            println!("{}", serde_json::to_string_pretty(&payload.to_json()?)?);
        }
    }

    Ok(())
}
