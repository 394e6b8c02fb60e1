pub mod csv_table_parser;
pub mod error;
pub mod raw_table;
