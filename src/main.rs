use std::io::Write;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use dten::config::{BaseConfig, Command};
use dten::contract::SmartContract;
use dten::gateway::HttpGateway;
use dten::ledger::LedgerVariant;
use dten::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize telemetry
    telemetry::init();

    // Parse configuration from CLI arguments
    let config = BaseConfig::parse();
    info!(
        "Configuration: ledger={:?}, storage_path={}, scan_range={:?}",
        config.ledger,
        config.storage_path,
        config.scan_range()
    );

    let ledger = LedgerVariant::open(&config)?;
    let contract = SmartContract::with_scan_range(ledger, config.scan_range());

    match config.command {
        Some(Command::Invoke { function, args }) => {
            let response = contract.invoke(&function, &args);
            if !response.is_ok() {
                bail!("{}", response.message);
            }
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&response.payload)?;
            if !response.payload.is_empty() {
                writeln!(stdout)?;
            }
        }
        Some(Command::Serve { bind_addr }) => {
            let init = contract.init();
            if !init.is_ok() {
                bail!("{}", init.message);
            }
            let mut gateway = HttpGateway::new(bind_addr, contract);
            gateway.open().await?;
            tokio::signal::ctrl_c().await?;
            gateway.close().await?;
        }
        None => {
            bail!("no command given; try `dten invoke queryAllTenders` or `dten serve`");
        }
    }

    info!("dten shutdown complete");
    Ok(())
}
