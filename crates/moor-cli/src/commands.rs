use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;

use moor_crypto::{Account, ContentHasher};
use moor_ledger::{ErrorRegistry, InMemoryLedger, LedgerConnection};
use moor_pipeline::{Pipeline, PipelineConfig};
use moor_types::HashWidth;

use crate::cli::{Cli, Command, HashArgs, RunArgs};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args).await,
        Command::Hash(args) => cmd_hash(args),
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let width = HashWidth::from_bits(args.width)?;
    let account = Account::dev(&args.identity);

    let ledger = Arc::new(InMemoryLedger::new());
    ledger.register_account(account.address());
    if let Some(limit) = args.batch_limit {
        ledger.set_batch_limit(limit);
    }

    let config = PipelineConfig {
        fanout: args.fanout,
        width,
        schema: args.schema,
        link_base: args.link_base,
        grace: Duration::from_secs(args.grace_secs),
    };
    let grace = config.grace;

    let conn: Arc<dyn LedgerConnection> = Arc::clone(&ledger) as Arc<dyn LedgerConnection>;
    let pipeline = Pipeline::new(
        Arc::clone(&conn),
        account,
        Arc::new(ErrorRegistry::builtin()),
        config,
    );

    let result = pipeline.run().await;

    // Give in-flight finalization time to land before releasing the
    // connection, success or not.
    if !grace.is_zero() {
        tokio::time::sleep(grace).await;
    }
    conn.close().await?;

    let report = result?;
    println!("{} Anchoring run complete", "✓".green().bold());
    println!("  Root hash:   {}", report.root_hash.to_hex().cyan());
    println!("  Root block:  {}", report.root_block.to_string().yellow());
    println!("  Batch block: {}", report.batch_block.to_string().yellow());
    println!("  Anchored:    {} linked marks", report.anchored.to_string().bold());
    Ok(())
}

fn cmd_hash(args: HashArgs) -> anyhow::Result<()> {
    let width = HashWidth::from_bits(args.width)?;
    let hash = ContentHasher::hash(args.payload.as_bytes(), width);
    println!("{}", hash.to_hex());
    Ok(())
}
