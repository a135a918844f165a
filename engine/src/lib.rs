pub mod account;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod provider;
pub mod schedule;
pub mod serializer;
pub mod time;
