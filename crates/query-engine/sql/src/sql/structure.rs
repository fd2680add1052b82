//! Parser-based checks: the statement must be exactly one plain query.
//!
//! The shape of the parsed statement is matched against an allow-list. Anything
//! not explicitly allowed (including statement kinds added by future parser
//! versions) is refused. Row locks and `SELECT ... INTO` are refused on every
//! query in the statement, subqueries included.

use std::ops::ControlFlow;

use sqlparser::ast::{Query, SetExpr, Statement, Visit, Visitor};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Why a statement failed the structural checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    Unparseable(String),
    NoStatement,
    MultipleStatements(usize),
    NotASelect(String),
}

/// Parse the text and check that it is a single read-only SELECT.
pub fn check_single_select(sql: &str) -> Result<(), StructureError> {
    let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql)
        .map_err(|err| StructureError::Unparseable(err.to_string()))?;

    match statements.as_slice() {
        [] => Err(StructureError::NoStatement),
        [statement] => check_statement(statement),
        many => Err(StructureError::MultipleStatements(many.len())),
    }
}

fn check_statement(statement: &Statement) -> Result<(), StructureError> {
    match statement {
        Statement::Query(query) => {
            check_query(query)?;
            match statement.visit(&mut ClauseCheck) {
                ControlFlow::Continue(()) => Ok(()),
                ControlFlow::Break(error) => Err(error),
            }
        }
        other => Err(StructureError::NotASelect(statement_kind(other))),
    }
}

fn check_query(query: &Query) -> Result<(), StructureError> {
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            check_query(&cte.query)?;
        }
    }
    check_set_expr(&query.body)
}

fn check_set_expr(body: &SetExpr) -> Result<(), StructureError> {
    match body {
        SetExpr::Select(_) => Ok(()),
        SetExpr::Query(query) => check_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            check_set_expr(left)?;
            check_set_expr(right)
        }
        SetExpr::Values(_) => Err(StructureError::NotASelect("VALUES".to_string())),
        SetExpr::Table(_) => Err(StructureError::NotASelect("TABLE".to_string())),
        _ => Err(StructureError::NotASelect(
            "a data-modifying query body".to_string(),
        )),
    }
}

/// Visits every query in a statement and stops at the first one carrying a
/// row lock or an `INTO` target.
struct ClauseCheck;

impl Visitor for ClauseCheck {
    type Break = StructureError;

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if !query.locks.is_empty() {
            return ControlFlow::Break(StructureError::NotASelect(
                "SELECT with a row-locking clause".to_string(),
            ));
        }
        if selects_into(&query.body) {
            return ControlFlow::Break(StructureError::NotASelect("SELECT INTO".to_string()));
        }
        ControlFlow::Continue(())
    }
}

fn selects_into(body: &SetExpr) -> bool {
    match body {
        SetExpr::Select(select) => select.into.is_some(),
        SetExpr::SetOperation { left, right, .. } => selects_into(left) || selects_into(right),
        _ => false,
    }
}

/// A short human-readable name for a statement: its leading keyword.
fn statement_kind(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .map_or_else(|| "an unknown statement".to_string(), str::to_uppercase)
}
