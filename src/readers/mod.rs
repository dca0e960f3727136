pub mod record_reader;

pub use record_reader::{load_records, sort_chronologically, RecordReader};
