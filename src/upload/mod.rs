pub mod auth;
pub mod cli;
pub mod client;
pub mod error;
pub mod report;
pub mod scan;
pub mod transport;

#[cfg(test)]
mod testing;
