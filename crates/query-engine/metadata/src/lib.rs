//! Static description of the indexer database that generated SQL is grounded in.

pub mod metadata;

pub use metadata::SchemaContext;
