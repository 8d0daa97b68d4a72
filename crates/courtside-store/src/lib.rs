pub mod writer;

pub use writer::{CsvTableWriter, WrittenTable};
