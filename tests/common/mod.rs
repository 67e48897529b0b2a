#![allow(dead_code)]

pub use qdexport_test_utils::{init_tracing, with_timeout};
