//! Output formatting for query outcomes

pub mod console;
