pub mod ledger;

pub use ledger::{parse_time, BookSummary, EntryFilter, EntryView, Ledger};
