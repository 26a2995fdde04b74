use anyhow::{Context, Result};
use clap::Parser;
use rusty_bank::client::{self, HttpAccount};
use std::io;

/// Interactive operator console for a running account service.
#[derive(Debug, Parser)]
#[command(name = "bank-client", version, about)]
struct Args {
    /// Host the account service listens on.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port the account service listens on.
    #[arg(long, default_value_t = 10_000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args { host, port } = Args::parse();
    println!("Host: {host} (connecting port: {port})");

    let account = HttpAccount::connect(format!("http://{host}:{port}"))
        .await
        .context("resolve account service")?;

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    client::run(&account, &mut input, &mut out).await
}
