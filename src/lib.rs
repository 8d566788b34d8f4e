pub mod catalog;
pub mod config;
pub mod csv;
pub mod ledger;
pub mod model;
pub mod rupiah;
pub mod store;

pub use catalog::{CsvCatalog, OrderSource, SampleCatalog};
pub use ledger::{Ledger, LedgerError, LedgerState, Notice, Outcome};
pub use model::{Command, Decision, FloatAdvance, Order, OrderId};
pub use rupiah::Rupiah;
pub use store::{JsonFileStore, LedgerStore, MemoryStore};
