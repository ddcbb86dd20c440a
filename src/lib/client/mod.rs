pub mod app;
pub mod client;

pub use app::*;
pub use client::*;
