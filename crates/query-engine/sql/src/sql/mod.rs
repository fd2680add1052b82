//! SQL text as produced by the generator, and the checks it has to pass
//! before it may be executed.

pub mod lexical;
pub mod normalize;
pub mod string;
pub mod structure;
pub mod validate;

pub use normalize::normalize;
pub use string::{NormalizedStatement, Param, ValidatedSql};
pub use validate::{validate, Rejection, RejectionReason};
