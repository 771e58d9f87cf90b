//! The `packwire` command: inspect, decode and encode catalog messages.
//!
//! ```text
//! packwire layouts
//! packwire decode FloatRange "00 00 c0 3f 00 00 50 40"
//! packwire encode AmbientAudio '{"track":null,"volume":0.5,"category":"Ambient"}'
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use packwire::codec::CodecConfig;
use packwire::PackwireError;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "packwire", version)]
#[command(about = "Inspect and convert Packwire binary messages")]
struct Cli {
    /// Accept records larger than their layout's maximum size
    #[arg(long, global = true)]
    lenient: bool,

    /// Upper bound on any array or map element count
    #[arg(long, global = true, default_value_t = CodecConfig::DEFAULT_MAX_COLLECTION_LEN)]
    max_collection_len: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every registered message and its layout
    Layouts,

    /// Decode hex bytes into JSON
    Decode {
        /// Message type name (case-insensitive)
        message: String,
        /// Hex-encoded bytes; whitespace is ignored
        hex: String,
    },

    /// Encode JSON into hex bytes
    Encode {
        /// Message type name (case-insensitive)
        message: String,
        /// The message as a JSON object
        json: String,
    },
}

impl Cli {
    fn config(&self) -> CodecConfig {
        CodecConfig {
            enforce_max_size: !self.lenient,
            max_collection_len: self.max_collection_len,
        }
        .validated()
    }
}

fn run(cli: &Cli) -> Result<(), PackwireError> {
    match &cli.command {
        Command::Layouts => print!("{}", packwire::layout_table()),
        Command::Decode { message, hex } => {
            let value = packwire::decode_hex(message, hex, cli.config())?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Encode { message, json } => {
            let bytes = packwire::encode_json(message, json, cli.config())?;
            println!("{}", hex::encode(bytes));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
