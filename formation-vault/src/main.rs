//! Formation Vault CLI
//!
//! Runs one vault operation per invocation against the configured ledger and
//! prints the result as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Create a formation owned by alice
//! formation-vault --caller alice create --signature sig1 --content-file ./doc.md \
//!     --metadata "draft" --cluster c1 --tag f1 --tag f2
//!
//! # Update it under the fortified profile
//! formation-vault --caller alice update 1 --profile fortified --signature sig2 \
//!     --content-hash <64 chars> --metadata "final" --tag f1
//!
//! # Grant bob read access for 100 ticks
//! formation-vault --caller alice grant 1 --grantee bob --classification observer --duration 100
//!
//! # Inspect
//! formation-vault show 1
//! formation-vault history 1
//! formation-vault state
//! ```
//!
//! When `--clock` is omitted the host clock is taken as one past the last
//! committed mutation.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use formation_vault::{
    Classification, FormationFields, FormationPatch, FormationVault, GrantRequest,
    InvocationContext, MutationProfile, Principal, VaultConfig, VaultError,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "formation-vault")]
#[command(about = "Owned formation registry with delegated access grants")]
struct Cli {
    /// Path to config file
    #[arg(short, long, env = "FORMATION_VAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the sled ledger
    #[arg(long, env = "FORMATION_VAULT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Principal issuing the call
    #[arg(long, env = "FORMATION_VAULT_CALLER", default_value = "anonymous")]
    caller: String,

    /// Logical clock supplied by the host
    #[arg(long)]
    clock: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ContentArgs {
    #[arg(long)]
    signature: String,

    /// 64-character content hash
    #[arg(long, conflicts_with = "content_file")]
    content_hash: Option<String>,

    /// Hash this file with SHA-256 instead of passing --content-hash
    #[arg(long)]
    content_file: Option<PathBuf>,

    #[arg(long)]
    metadata: String,

    /// Resonance tag (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl ContentArgs {
    fn content_hash(&self) -> anyhow::Result<String> {
        match (&self.content_hash, &self.content_file) {
            (Some(hash), _) => Ok(hash.clone()),
            (None, Some(path)) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Ok(hex::encode(Sha256::digest(&bytes)))
            }
            (None, None) => bail!("one of --content-hash or --content-file is required"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a formation in the primary registry
    Create {
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long)]
        cluster: String,
        #[arg(long, default_value = "standard")]
        profile: MutationProfile,
    },
    /// Update a formation you own
    Update {
        id: u64,
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long, default_value = "standard")]
        profile: MutationProfile,
    },
    /// Grant another principal access to a formation you own
    Grant {
        id: u64,
        #[arg(long)]
        grantee: String,
        #[arg(long)]
        classification: String,
        #[arg(long)]
        duration: u64,
        #[arg(long)]
        can_modify: bool,
    },
    /// Create a formation in the shadow namespace
    ShadowCreate {
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long)]
        cluster: String,
    },
    /// Show a formation with its history and metrics
    Show {
        id: u64,
        /// Read from the shadow namespace
        #[arg(long)]
        shadow: bool,
    },
    /// Show the history and metric rows of a formation
    History {
        id: u64,
        #[arg(long)]
        shadow: bool,
    },
    /// Show a grant
    GrantInfo {
        id: u64,
        #[arg(long)]
        grantee: String,
    },
    /// Check whether a grantee holds live clearance
    Clearance {
        id: u64,
        #[arg(long)]
        grantee: String,
        #[arg(long, default_value = "observer")]
        required: String,
    },
    /// Show registry counters
    State,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => VaultConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VaultConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.path = dir.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("formation_vault={}", config.log_level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    std::fs::create_dir_all(&config.storage.path)?;
    let vault = config.open_vault()?;

    match run(&cli, &vault).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<VaultError>().and_then(|v| v.anomaly()) {
            Some(anomaly) => {
                eprintln!("anomaly {}: {}", anomaly.code(), anomaly);
                std::process::exit(2);
            }
            None => Err(e),
        },
    }
}

async fn run(cli: &Cli, vault: &FormationVault) -> anyhow::Result<()> {
    let clock = match cli.clock {
        Some(clock) => clock,
        None => vault.registry_state().await?.last_calibration + 1,
    };
    let ctx = InvocationContext::new(cli.caller.as_str(), clock);

    match &cli.command {
        Command::Create {
            content,
            cluster,
            profile,
        } => {
            let fields = FormationFields {
                signature: content.signature.clone(),
                content_hash: content.content_hash()?,
                metadata: content.metadata.clone(),
                cluster: cluster.clone(),
                resonance_tags: content.tags.clone(),
            };
            let id = vault.create_formation(ctx, *profile, fields).await?;
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::Update {
            id,
            content,
            profile,
        } => {
            let patch = FormationPatch {
                signature: content.signature.clone(),
                content_hash: content.content_hash()?,
                metadata: content.metadata.clone(),
                resonance_tags: content.tags.clone(),
            };
            vault.update_formation(ctx, *profile, *id, patch).await?;
            print_json(&serde_json::json!({ "ok": true }))
        }
        Command::Grant {
            id,
            grantee,
            classification,
            duration,
            can_modify,
        } => {
            let request = GrantRequest {
                formation_id: *id,
                grantee: Principal::from(grantee.as_str()),
                classification: classification.clone(),
                duration: *duration,
                can_modify: *can_modify,
            };
            let grant = vault.grant_access(ctx, request).await?;
            print_json(&grant)
        }
        Command::ShadowCreate { content, cluster } => {
            let fields = FormationFields {
                signature: content.signature.clone(),
                content_hash: content.content_hash()?,
                metadata: content.metadata.clone(),
                cluster: cluster.clone(),
                resonance_tags: content.tags.clone(),
            };
            let id = vault.create_shadow_formation(ctx, fields).await?;
            print_json(&serde_json::json!({ "id": id, "namespace": "shadow" }))
        }
        Command::Show { id, shadow } => {
            let (formation, history) = if *shadow {
                (
                    vault.get_shadow_formation(*id).await?,
                    vault.get_shadow_history(*id).await?,
                )
            } else {
                (vault.get_formation(*id).await?, vault.get_history(*id).await?)
            };
            let Some(formation) = formation else {
                return Err(VaultError::from(formation_vault::Anomaly::FormationNotFound).into());
            };
            let metadata = if *shadow {
                vault.get_shadow_metadata(*id).await?
            } else {
                vault.get_metadata(*id).await?
            };
            print_json(&serde_json::json!({
                "formation": formation,
                "history": history,
                "metadata": metadata,
            }))
        }
        Command::History { id, shadow } => {
            let (history, metadata) = if *shadow {
                (
                    vault.get_shadow_history(*id).await?,
                    vault.get_shadow_metadata(*id).await?,
                )
            } else {
                (vault.get_history(*id).await?, vault.get_metadata(*id).await?)
            };
            let Some(history) = history else {
                return Err(VaultError::from(formation_vault::Anomaly::FormationNotFound).into());
            };
            print_json(&serde_json::json!({
                "history": history,
                "metadata": metadata,
            }))
        }
        Command::GrantInfo { id, grantee } => {
            let grant = vault.get_grant(*id, &Principal::from(grantee.as_str())).await?;
            print_json(&grant)
        }
        Command::Clearance {
            id,
            grantee,
            required,
        } => {
            let required: Classification = required.parse().map_err(VaultError::from)?;
            let grant = vault
                .check_clearance(*id, &Principal::from(grantee.as_str()), required, clock)
                .await?;
            print_json(&grant)
        }
        Command::State => print_json(&vault.registry_state().await?),
    }
}
