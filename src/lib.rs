//! cql2-filter - CQL2 text/JSON translator
//!
//! A bidirectional translator between the two concrete syntaxes of OGC CQL2
//! filter expressions: the SQL-like text form and the JSON tree form. Both
//! sides share one owned AST; no evaluation is performed.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cql2_filter::{parse_text, to_json, to_text};
//!
//! let filter = parse_text("prop1 = 5 AND S_INTERSECTS(geom, POINT(1 2))")?;
//!
//! // Canonical JSON form
//! let json = to_json(&filter);
//!
//! // Normalized text form
//! assert_eq!(
//!     to_text(&filter),
//!     r#"("prop1" = 5.0) AND S_INTERSECTS("geom", POINT(1.0 2.0))"#
//! );
//! ```
//!
//! The JSON mapping round-trips exactly (`parse_json(to_json(a)) == a`); the
//! text form is normalized on output (quoted properties, parenthesized
//! comparisons, `.0` integers) and stabilizes after one pass.

mod ast;
mod json;
mod parse;
mod text;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error as ThisError;

// ============ Primary Public API ============

pub use ast::{
    ArithOp, ArrayOp, ComparisonOp, Expr, Function, Geometry, IntervalBound, Position, Scalar,
    SpatialOp, TemporalOp,
};
pub use parse::ParseError;

/// Default bracket-nesting limit for both parsers.
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// Parse a CQL2-Text filter.
pub fn parse_text(input: &str) -> Result<Expr, Error> {
    parse::parse(input)
}

/// Parse a CQL2-Text filter with a custom nesting limit.
pub fn parse_text_with_limit(input: &str, limit: usize) -> Result<Expr, Error> {
    parse::parse_with_limit(input, limit)
}

/// Decode a CQL2-JSON filter.
pub fn parse_json(value: &serde_json::Value) -> Result<Expr, Error> {
    json::from_json(value)
}

/// Decode a CQL2-JSON filter with a custom nesting limit.
pub fn parse_json_with_limit(value: &serde_json::Value, limit: usize) -> Result<Expr, Error> {
    json::from_json_with_limit(value, limit)
}

/// Decode a CQL2-JSON filter from raw JSON text.
pub fn parse_json_str(input: &str) -> Result<Expr, Error> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| Error::Encoding(format!("malformed JSON: {e}")))?;
    json::from_json(&value)
}

/// Render a filter as CQL2-Text. Never fails on a well-formed AST.
pub fn to_text(expr: &Expr) -> String {
    expr.to_string()
}

/// Render a filter as CQL2-JSON. Never fails on a well-formed AST.
pub fn to_json(expr: &Expr) -> serde_json::Value {
    json::to_json(expr)
}

// ============ Errors ============

#[derive(ThisError, Debug)]
pub enum Error {
    /// Text input did not match the grammar; carries position.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// An AST invariant was violated.
    #[error("structural error: {0}")]
    Structural(String),

    /// JSON input used an `op` outside the recognized set.
    #[error("unknown operator `{op}` at {pointer}")]
    UnknownOperator { op: String, pointer: String },

    /// Malformed JSON text, an un-representable number, or an invalid
    /// date/timestamp spelling.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The nesting limit was reached.
    #[error("nesting depth limit of {0} exceeded")]
    DepthExceeded(usize),
}

// ============ Trait wiring ============

impl FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse(s)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json::to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        json::from_json(&value).map_err(D::Error::custom)
    }
}
