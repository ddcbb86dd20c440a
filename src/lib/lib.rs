pub mod adapters;
pub mod client;
pub mod core;
pub mod storage;
