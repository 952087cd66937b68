use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::coin::{Coin, CoinCounts};
use crate::ledger::Refund;
use crate::model::{Event, Outcome};

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing value")]
    MissingValue { line: usize, action: String },

    #[error("line {line}: invalid coin value '{value}'")]
    InvalidCoin { line: usize, value: String },

    #[error("failed to write output: {0}")]
    Write(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct EventRow {
    action: String,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReserveRow {
    coin: u32,
    count: u32,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    event: &'static str,
    detail: String,
    balance: String,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Read customer events from a csv file with an `action,value` header
pub fn read_events(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Event, CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<EventRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let value = row.value.filter(|v| !v.is_empty());
            match row.action.as_str() {
                "insert" => {
                    let value = value.ok_or_else(|| CsvError::MissingValue {
                        line,
                        action: "insert".to_string(),
                    })?;
                    let coin = value
                        .parse::<u32>()
                        .map_err(|_| CsvError::InvalidCoin { line, value })?;
                    Ok(Event::Insert(coin))
                }
                "select" => {
                    let product = value.ok_or_else(|| CsvError::MissingValue {
                        line,
                        action: "select".to_string(),
                    })?;
                    Ok(Event::Select(product))
                }
                "refund" => Ok(Event::Refund),
                other => Err(CsvError::UnrecognizedAction {
                    line,
                    action: other.to_string(),
                }),
            }
        }))
}

/// Read a coin float from a csv file with a `coin,count` header
pub fn read_reserve(path: impl AsRef<Path>) -> Result<CoinCounts, CsvError> {
    let reader = open(path.as_ref())?;

    reader
        .into_deserialize::<ReserveRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            Ok((Coin::from_pence(row.coin), row.count))
        })
        .collect()
}

fn output_row(outcome: &Outcome) -> OutputRow {
    match outcome {
        Outcome::Credited { coin, balance } => OutputRow {
            event: "insert",
            detail: Coin::from_pence(*coin).to_string(),
            balance: balance.to_string(),
        },
        Outcome::Dispensed { product, balance } => OutputRow {
            event: "select",
            detail: product.clone(),
            balance: balance.to_string(),
        },
        Outcome::Refunded(refund) => {
            let (event, detail) = match refund {
                Refund::Empty => ("refund", "nothing due".to_string()),
                Refund::Complete(coins) => ("refund", coins.to_string()),
                Refund::Incomplete { coins, shortfall } => (
                    "refund_incomplete",
                    format!("{coins} (short {shortfall})"),
                ),
            };
            OutputRow {
                event,
                detail,
                balance: crate::Amount::ZERO.to_string(),
            }
        }
    }
}

/// Write event outcomes in csv format
pub fn write_outcomes<'a, W: io::Write>(
    writer: W,
    outcomes: impl IntoIterator<Item = &'a Outcome>,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        writer.serialize(output_row(outcome))?;
    }

    writer.flush().map_err(|e| CsvError::Write(e.into()))?;
    Ok(())
}
