use std::env;
use std::io;
use std::process::ExitCode;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vend_sim::csv::{read_events, read_reserve, write_outcomes};
use vend_sim::machine::panel;
use vend_sim::{Amount, Machine, MachineConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "warn".parse().expect("static directive is valid"),
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: vend-sim <events.csv> [reserve.csv]");
        return ExitCode::FAILURE;
    };

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let mut config = MachineConfig::default();
    if let Some(reserve_path) = args.next() {
        match read_reserve(&reserve_path) {
            Ok(reserve) => config = config.with_reserve(reserve),
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let catalog = config.products.clone();
    let display = move |balance: Amount| {
        info!(text = %panel::display_text(balance, &catalog), "display");
    };
    let mut machine = match Machine::new(config, display) {
        Ok(machine) => machine,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        products = machine.catalog().len(),
        tubes = machine.stock().tubes().len(),
        "machine ready"
    );

    let events = match read_events(path) {
        Ok(events) => events,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (event_sender, event_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in events {
            match result {
                Ok(event) => {
                    if event_sender.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let outcomes = machine.run(ReceiverStream::new(event_receiver)).await;

    info!(reserve = %machine.ledger().reserve(), "final reserve");

    if let Err(e) = write_outcomes(io::stdout().lock(), &outcomes) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
