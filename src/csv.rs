use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Rupiah;
use crate::ledger::LedgerState;
use crate::model::{Command, Decision, FloatAdvance, Order, OrderId};

/// Errors that can occur when reading or writing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized command '{command}'")]
    UnrecognizedCommand { line: usize, command: String },

    #[error("line {line}: {command} missing order")]
    MissingOrder { line: usize, command: String },

    #[error("line {line}: {command} missing amount")]
    MissingAmount { line: usize, command: String },

    #[error("line {line}: unrecognized decision '{decision}'")]
    UnrecognizedDecision { line: usize, decision: String },

    #[error("line {line}: order {order} has a float advance but no note")]
    MissingNote { line: usize, order: OrderId },

    #[error("line {line}: order {order} has a float advance note but no amount")]
    UnexpectedNote { line: usize, order: OrderId },

    #[error("line {line}: order {order} has a negative fare or float advance")]
    NegativeAmount { line: usize, order: OrderId },

    #[error("line {line}: order {order} has a fare or float advance above {}", Rupiah::MAX_ORDER_AMOUNT)]
    AmountOutOfRange { line: usize, order: OrderId },

    #[error("line {line}: duplicate order id {order}")]
    DuplicateOrder { line: usize, order: OrderId },

    #[error("line {line}: order {order} has a zero duration")]
    ZeroDuration { line: usize, order: OrderId },

    #[error("failed to write csv: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush csv: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct CommandRow {
    r#type: String,
    order: Option<OrderId>,
    amount: Option<i64>,
    decision: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    id: OrderId,
    customer_name: String,
    customer_phone: String,
    pickup: String,
    delivery: String,
    distance: String,
    fare: i64,
    float_advance: Option<i64>,
    float_advance_note: Option<String>,
    duration_minutes: u32,
}

#[derive(Debug, Serialize)]
struct SnapshotRow {
    earnings: Rupiah,
    balance: Rupiah,
    online: bool,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Read driver commands from a csv file with columns `type,order,amount,decision`
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<CommandRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_command(line, row)
        }))
}

fn parse_command(line: usize, row: CommandRow) -> Result<Command, CsvError> {
    match row.r#type.to_lowercase().as_str() {
        "online" => Ok(Command::SetOnline { online: true }),
        "offline" => Ok(Command::SetOnline { online: false }),
        "accept" => {
            let order = row
                .order
                .ok_or_else(|| CsvError::MissingOrder {
                    line,
                    command: "accept".to_string(),
                })?;
            let decision = match row.decision.as_deref().map(str::to_lowercase).as_deref() {
                Some("confirm") | Some("accept") => Decision::Accept,
                // a confirmation dismissed without answering counts as a rejection
                Some("reject") | Some("cancel") | Some("") | None => Decision::Reject,
                Some(other) => {
                    return Err(CsvError::UnrecognizedDecision {
                        line,
                        decision: other.to_string(),
                    });
                }
            };
            Ok(Command::Accept { order, decision })
        }
        "withdraw" => {
            let amount = row
                .amount
                .ok_or_else(|| CsvError::MissingAmount {
                    line,
                    command: "withdraw".to_string(),
                })?;
            Ok(Command::Withdraw {
                amount: Rupiah::new(amount),
            })
        }
        _ => Err(CsvError::UnrecognizedCommand {
            line,
            command: row.r#type,
        }),
    }
}

/// Read an order feed from a csv file
pub fn read_orders(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Order, CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<OrderRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_order(line, row)
        }))
}

fn parse_order(line: usize, row: OrderRow) -> Result<Order, CsvError> {
    let order = row.id;
    let amount = row.float_advance.unwrap_or(0);
    let note = row.float_advance_note.filter(|note| !note.is_empty());

    if row.fare < 0 || amount < 0 {
        return Err(CsvError::NegativeAmount { line, order });
    }
    let limit = Rupiah::MAX_ORDER_AMOUNT.value();
    if row.fare > limit || amount > limit {
        return Err(CsvError::AmountOutOfRange { line, order });
    }
    if row.duration_minutes == 0 {
        return Err(CsvError::ZeroDuration { line, order });
    }

    let float_advance = match note {
        Some(note) => Some(
            FloatAdvance::new(Rupiah::new(amount), note)
                .ok_or(CsvError::UnexpectedNote { line, order })?,
        ),
        None if amount > 0 => return Err(CsvError::MissingNote { line, order }),
        None => None,
    };

    Ok(Order {
        id: row.id,
        customer_name: row.customer_name,
        customer_phone: row.customer_phone,
        pickup_label: row.pickup,
        delivery_label: row.delivery,
        distance_label: row.distance,
        fare: Rupiah::new(row.fare),
        float_advance,
        estimated_duration_minutes: row.duration_minutes,
    })
}

/// Write a ledger snapshot in csv format
pub fn write_snapshot(writer: impl io::Write, state: &LedgerState) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.serialize(SnapshotRow {
        earnings: state.earnings,
        balance: state.balance,
        online: state.is_online,
    })?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ORDER_HEADER: &str = "id,customer_name,customer_phone,pickup,delivery,distance,fare,float_advance,float_advance_note,duration_minutes\n";

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn commands(content: &str) -> Vec<Result<Command, CsvError>> {
        let file = write_csv(content);
        read_commands(file.path()).unwrap().collect()
    }

    fn orders(content: &str) -> Vec<Result<Order, CsvError>> {
        let file = write_csv(&format!("{ORDER_HEADER}{content}"));
        read_orders(file.path()).unwrap().collect()
    }

    #[test]
    fn read_online_toggle() {
        let results = commands("type,order,amount,decision\noffline,,,\nonline,,,\n");
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Command::SetOnline { online: false }
        );
        assert_eq!(
            results[1].as_ref().unwrap(),
            &Command::SetOnline { online: true }
        );
    }

    #[test]
    fn read_accept_with_decisions() {
        let results = commands(
            "type,order,amount,decision\naccept,1,,confirm\naccept,3,,reject\naccept,2,,\n",
        );
        let results: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            results,
            vec![
                Command::Accept {
                    order: 1,
                    decision: Decision::Accept
                },
                Command::Accept {
                    order: 3,
                    decision: Decision::Reject
                },
                Command::Accept {
                    order: 2,
                    decision: Decision::Reject
                },
            ]
        );
    }

    #[test]
    fn read_withdraw_with_whitespace() {
        let results = commands("type, order, amount, decision\nwithdraw, , 60000, \n");
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Command::Withdraw {
                amount: Rupiah::new(60_000)
            }
        );
    }

    #[test]
    fn read_returns_error_for_unknown_command() {
        let results = commands("type,order,amount,decision\ndeposit,,100,\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedCommand { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_missing_fields() {
        let results = commands("type,order,amount,decision\nwithdraw,,,\naccept,,,confirm\n");
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::MissingAmount { line: 2, .. }
        ));
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            CsvError::MissingOrder { line: 3, .. }
        ));
    }

    #[test]
    fn read_returns_error_for_unknown_decision() {
        let results = commands("type,order,amount,decision\naccept,1,,maybe\n");
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::UnrecognizedDecision { line: 2, .. }
        ));
    }

    #[test]
    fn read_commands_fails_for_missing_file() {
        let result = read_commands("/nonexistent/commands.csv");
        assert!(matches!(result, Err(CsvError::Open { .. })));
    }

    #[test]
    fn read_regular_and_float_advance_orders() {
        let results = orders(
            "2,Sari Indah,08334567890,Restoran Padang,Kantor BCA,3.1 km,32000,,,18\n\
             3,Budi Hartono,08445678901,Apotek,Green Garden,4.2 km,38000,75000,Beli obat,22\n",
        );
        let regular = results[0].as_ref().unwrap();
        assert_eq!(regular.fare, Rupiah::new(32_000));
        assert!(regular.float_advance.is_none());

        let advance = results[1].as_ref().unwrap();
        assert_eq!(advance.float_advance_amount(), Rupiah::new(75_000));
        assert_eq!(advance.float_advance_note(), Some("Beli obat"));
        assert_eq!(advance.distance_label, "4.2 km");
    }

    #[test]
    fn read_orders_enforces_float_advance_invariant() {
        let results = orders(
            "1,A,0,P,D,1 km,1000,5000,,5\n\
             2,B,0,P,D,1 km,1000,0,stray note,5\n\
             3,C,0,P,D,1 km,-1,,,5\n\
             4,D,0,P,D,1 km,1000,,,0\n",
        );
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::MissingNote { line: 2, order: 1 }
        ));
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            CsvError::UnexpectedNote { line: 3, order: 2 }
        ));
        assert!(matches!(
            results[2].as_ref().unwrap_err(),
            CsvError::NegativeAmount { line: 4, order: 3 }
        ));
        assert!(matches!(
            results[3].as_ref().unwrap_err(),
            CsvError::ZeroDuration { line: 5, order: 4 }
        ));
    }

    #[test]
    fn read_orders_bounds_amounts() {
        let results = orders(
            "5,A,0,P,D,1 km,9000000000000000000,,,5\n\
             6,B,0,P,D,1 km,1000,1000000000001,Beli obat,5\n\
             7,C,0,P,D,1 km,1000000000000,1000000000000,Beli obat,5\n",
        );
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::AmountOutOfRange { line: 2, order: 5 }
        ));
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            CsvError::AmountOutOfRange { line: 3, order: 6 }
        ));
        let at_limit = results[2].as_ref().unwrap();
        assert_eq!(at_limit.fare, Rupiah::MAX_ORDER_AMOUNT);
        assert_eq!(at_limit.float_advance_amount(), Rupiah::MAX_ORDER_AMOUNT);
    }

    #[test]
    fn write_snapshot_as_plain_integers() {
        let state = LedgerState {
            earnings: Rupiah::new(182_000),
            balance: Rupiah::new(872_400),
            is_online: true,
        };
        let mut out = Vec::new();
        write_snapshot(&mut out, &state).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "earnings,balance,online\n182000,872400,true\n"
        );
    }
}
