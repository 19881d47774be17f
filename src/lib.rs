// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod dictionary;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod progress;
pub mod schema;
pub mod source;
