//! `gizli` CLI tool for key management and search-token derivation.

#![warn(clippy::pedantic, clippy::nursery)]

use clap::{Parser, Subcommand};
use gizli::keyring::generate_key;
use gizli::token::{derive_search_token, is_search_token};

#[derive(Parser)]
#[command(name = "gizli")]
#[command(about = "gizli key management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fresh 256-bit encryption keys, hex encoded
    Keygen {
        /// Number of keys to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Derive the search token for a value
    Token {
        /// Hash secret the deployment derives tokens with
        #[arg(long)]
        secret: String,
        /// The plaintext value to tokenize
        value: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { count } => {
            anyhow::ensure!(count >= 1, "count must be at least 1");
            for _ in 0..count {
                println!("{}", generate_key());
            }
        }
        Commands::Token { secret, value } => {
            anyhow::ensure!(!secret.is_empty(), "secret must not be empty");
            anyhow::ensure!(
                !is_search_token(&value),
                "value is already a search token; nothing to derive"
            );
            println!("{}", derive_search_token(&value, &secret));
        }
    }
    Ok(())
}
