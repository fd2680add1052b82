//! A service answering natural-language questions about the Network of
//! Momentum indexer database.

pub mod error;
pub mod pipeline;
pub mod routes;
pub mod schema;
pub mod state;
