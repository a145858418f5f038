//! bridgetree CLI - Command line interface for the bridge Merkle accumulator
//!
//! Each invocation opens the store, performs one operation against one
//! network's tree, and prints JSON on stdout. Logs go to stderr.

use bridgetree::vectors::{self, VectorSuite};
use bridgetree::{Config, Digest, Hasher, HasherKind, IndexOrder, LeafValue, MerkleProof, NetworkId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bridgetree")]
#[command(about = "Append-only Merkle accumulator with historical proofs")]
#[command(version)]
struct Cli {
    /// Path to the store file (overrides the config file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network identifier
    #[arg(short, long)]
    network: Option<u32>,

    /// Tree height
    #[arg(long)]
    height: Option<u8>,

    /// Hash function
    #[arg(long, value_enum)]
    hasher: Option<HasherKind>,

    /// Which end of the leaf index picks the side at the leaf level
    #[arg(long, value_enum)]
    index_order: Option<IndexOrder>,

    /// fsync after every insertion
    #[arg(long)]
    sync_writes: bool,

    /// Output format (json, or indented text for reading)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the network's tree if it does not exist yet
    Init,

    /// Append leaves in order
    Add {
        /// Leaf values (text, at most 31 bytes, unless --hex)
        #[arg(required = true)]
        values: Vec<String>,
        /// Parse values as hex (at most 32 bytes)
        #[arg(long)]
        hex: bool,
    },

    /// Show the current root and leaf count
    Root,

    /// Look up the leaf count at which a root was produced
    IndexOf {
        /// Root digest (hex)
        root: String,
    },

    /// Build the authentication path for a leaf
    Proof {
        /// Leaf index
        index: u64,
        /// Historical root (defaults to the current root)
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Verify an authentication path without touching the store
    Verify {
        /// Leaf value (text unless --hex)
        leaf: String,
        /// Leaf index
        index: u64,
        /// Claimed root (hex)
        root: String,
        /// Sibling digests, leaf level first (hex)
        #[arg(required = true)]
        siblings: Vec<String>,
        /// Parse the leaf value as hex
        #[arg(long)]
        hex: bool,
    },

    /// Check a JSON test-vector suite against the configured hasher and order
    Vectors {
        /// Suite file, or with --generate a JSON array of leaf-text arrays
        file: PathBuf,
        /// Print a suite built from the leaf sets in FILE instead of checking
        #[arg(long)]
        generate: bool,
    },
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bridgetree=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {:?}", e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Init => {
            let tree = config.load_tree()?;
            tree.flush()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "database": config.database.display().to_string(),
                    "network": tree.network(),
                    "height": tree.height(),
                    "hasher": tree.hasher().name(),
                    "root": tree.root().to_hex(),
                    "count": tree.count()
                }),
            );
        }

        Commands::Add { values, hex } => {
            let leaves = values
                .iter()
                .map(|v| parse_leaf(v, hex))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let mut tree = config.load_tree()?;
            let mut added = Vec::with_capacity(leaves.len());
            for leaf in &leaves {
                let index = tree.count();
                let root = tree.add_leaf(leaf)?;
                added.push(serde_json::json!({
                    "index": index,
                    "root": root.to_hex()
                }));
            }
            tree.flush()?;

            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "count": tree.count(),
                    "root": tree.root().to_hex(),
                    "added": added
                }),
            );
        }

        Commands::Root => {
            let tree = config.open_tree()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "network": tree.network(),
                    "root": tree.root().to_hex(),
                    "count": tree.count()
                }),
            );
        }

        Commands::IndexOf { root } => {
            let tree = config.open_tree()?;
            let root = parse_digest(&root)?;
            let count = tree.root_index_of(&root)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "root": root.to_hex(),
                    "count": count
                }),
            );
        }

        Commands::Proof { index, root } => {
            let tree = config.open_tree()?;
            let root = match root {
                Some(r) => parse_digest(&r)?,
                None => tree.root(),
            };
            let proof = tree.get_proof(index, &root)?;
            output(&cli.format, &serde_json::to_value(&proof)?);
        }

        Commands::Verify {
            leaf,
            index,
            root,
            siblings,
            hex,
        } => {
            let proof = MerkleProof {
                leaf_index: index,
                root: parse_digest(&root)?,
                siblings: siblings
                    .iter()
                    .map(|s| parse_digest(s))
                    .collect::<anyhow::Result<Vec<_>>>()?,
            };
            let value = parse_leaf(&leaf, hex)?;
            let valid = proof.verify_leaf(&config.hasher, &value, config.index_order);
            // null when the path length is not a valid tree height
            let computed_root = proof
                .compute_root(&config.hasher, &config.hasher.hash_leaf(&value), config.index_order)
                .map(|root| root.to_hex());
            output(
                &cli.format,
                &serde_json::json!({
                    "valid": valid,
                    "computed_root": computed_root
                }),
            );
            if !valid {
                std::process::exit(1);
            }
        }

        Commands::Vectors { file, generate } => {
            if generate {
                let content = std::fs::read_to_string(&file)?;
                let leaf_sets: Vec<Vec<String>> = serde_json::from_str(&content)?;
                let suite =
                    vectors::generate(config.height, &leaf_sets, &config.hasher, config.index_order)?;
                output(&cli.format, &serde_json::to_value(&suite)?);
            } else {
                let suite = VectorSuite::load(&file)?;
                let checked = vectors::run(&suite, &config.hasher, config.index_order)?;
                output(
                    &cli.format,
                    &serde_json::json!({
                        "status": "ok",
                        "height": suite.height,
                        "vectors": checked
                    }),
                );
            }
        }
    }

    Ok(())
}

/// Config file first, then command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(database) = &cli.database {
        config.database = database.clone();
    }
    if let Some(network) = cli.network {
        config.network = NetworkId(network);
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(hasher) = cli.hasher {
        config.hasher = hasher;
    }
    if let Some(order) = cli.index_order {
        config.index_order = order;
    }
    if cli.sync_writes {
        config.sync_writes = true;
    }
    Ok(config)
}

fn parse_leaf(value: &str, hex: bool) -> anyhow::Result<LeafValue> {
    let leaf = if hex {
        LeafValue::from_hex(value)?
    } else {
        LeafValue::from_text(value)?
    };
    Ok(leaf)
}

fn parse_digest(s: &str) -> anyhow::Result<Digest> {
    Digest::from_hex(s).map_err(|_| anyhow::anyhow!("Invalid digest: {}", s))
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string(value) {
            Ok(s) => println!("{}", s),
            Err(e) => tracing::error!("Failed to render output: {}", e),
        },
        OutputFormat::Text => {
            let mut out = String::new();
            render_text(value, 0, &mut out);
            print!("{}", out);
        }
    }
}

/// Indented `key: value` lines, list items prefixed with `-`
fn render_text(value: &serde_json::Value, indent: usize, out: &mut String) {
    use serde_json::Value;

    let pad = " ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match v {
                    Value::Object(_) | Value::Array(_) => {
                        out.push_str(&format!("{}{}:\n", pad, key));
                        render_text(v, indent + 2, out);
                    }
                    _ => out.push_str(&format!("{}{}: {}\n", pad, key, scalar(v))),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        out.push_str(&format!("{}-\n", pad));
                        render_text(item, indent + 2, out);
                    }
                    _ => out.push_str(&format!("{}- {}\n", pad, scalar(item))),
                }
            }
        }
        _ => out.push_str(&format!("{}{}\n", pad, scalar(value))),
    }
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
