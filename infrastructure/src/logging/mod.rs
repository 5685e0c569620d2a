//! Structured session logging adapters.

pub mod jsonl_logger;
