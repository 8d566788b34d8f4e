use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use driver_ledger::config::Config;
use driver_ledger::csv::{read_commands, write_snapshot};
use driver_ledger::{CsvCatalog, JsonFileStore, Ledger, OrderSource, SampleCatalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .ok_or("usage: driver-ledger <commands.csv>")?;

    if !path.ends_with(".csv") {
        warn!(path, "command file seems to not be a csv file");
    }

    let catalog: Box<dyn OrderSource> = match &config.orders_path {
        Some(orders) => {
            info!(path = %orders.display(), "loading order feed");
            Box::new(CsvCatalog::from_path(orders)?)
        }
        None => Box::new(SampleCatalog),
    };

    let mut ledger = Ledger::open(JsonFileStore::new(&config.store_path))?;
    let commands = read_commands(PathBuf::from(&path))?;
    let (command_sender, command_receiver) =
        tokio::sync::mpsc::channel(config.command_buffer.get());

    tokio::spawn(async move {
        for result in commands {
            match result {
                Ok(command) => {
                    if command_sender.send(command).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let notices = ledger
        .run(&catalog, ReceiverStream::new(command_receiver))
        .await?;

    let mut stdout = io::stdout().lock();
    for notice in &notices {
        writeln!(stdout, "{notice}")?;
    }
    write_snapshot(&mut stdout, &ledger.state())?;

    Ok(())
}
