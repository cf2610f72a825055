//! Storage tests: log reader, tables and the merged store view.

#[path = "../common/mod.rs"]
mod common;

mod table_tests;
