use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "moor",
    about = "Content anchoring pipeline for append-and-confirm ledgers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the anchoring pipeline against a local in-memory ledger
    Run(RunArgs),
    /// Hash a payload and print the content identifier
    Hash(HashArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Number of linked anchors fanned out after the root is included
    #[arg(long, default_value_t = 10_000)]
    pub fanout: usize,

    /// Hash width in bits (128, 256, 384, or 512)
    #[arg(long, default_value_t = 256)]
    pub width: u16,

    /// Schema descriptor hashed into the root anchor
    #[arg(long, default_value = "{ name, company }")]
    pub schema: String,

    /// Base string for per-item links
    #[arg(long, default_value = "https://moor-ledger.org/anchor")]
    pub link_base: String,

    /// Development identity label to sign with
    #[arg(long, default_value = "//Eve")]
    pub identity: String,

    /// Seconds to wait after completion so finalization can land
    /// (0 is fine against the in-memory ledger)
    #[arg(long, default_value_t = 0)]
    pub grace_secs: u64,

    /// Batch resource limit enforced by the in-memory ledger
    #[arg(long)]
    pub batch_limit: Option<usize>,
}

#[derive(Args)]
pub struct HashArgs {
    /// Payload to hash
    pub payload: String,

    /// Hash width in bits (128, 256, 384, or 512)
    #[arg(long, default_value_t = 256)]
    pub width: u16,
}
