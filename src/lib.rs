//! Shared calendar and chat for two people.
//!
//! The HTTP surface lives in [`routes`]; the logic it serves (store adapters,
//! calendar buckets and views, the optimistic chat thread) is usable on its own.

pub mod calendar;
pub mod chat;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
