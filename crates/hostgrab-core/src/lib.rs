pub mod config;
pub mod logging;

pub mod batch;
pub mod error;
pub mod fetcher;
pub mod input;
pub mod outcome;
pub mod storage;
