//! Handling of generated SQL text: normalization and safety validation.

pub mod sql;
