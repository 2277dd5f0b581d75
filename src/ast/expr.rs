//! The filter expression tree
//!
//! `Expr` is the boolean predicate layer, `Scalar` the value layer. The two
//! nest in both directions: a predicate takes scalar operands, and a
//! parenthesized predicate may itself appear in value position.

use super::geom::Geometry;
use super::temporal::IntervalBound;
use super::{ArithOp, ArrayOp, ComparisonOp, SpatialOp, TemporalOp};
use crate::Error;
use chrono::{DateTime, NaiveDate, Utc};

/// A boolean filter expression, the root of every CQL2 filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Conjunction of two or more sub-expressions
    And(Vec<Expr>),

    /// Disjunction of two or more sub-expressions
    Or(Vec<Expr>),

    /// Negation
    Not(Box<Expr>),

    /// Boolean literal: `TRUE` / `FALSE`
    Literal(bool),

    /// Binary comparison: `a = b`, `a <> b`, ...
    Comparison {
        op: ComparisonOp,
        left: Box<Scalar>,
        right: Box<Scalar>,
    },

    /// Pattern match: `name LIKE 'a%'`
    Like {
        value: Box<Scalar>,
        pattern: Box<Scalar>,
    },

    /// Range test: `x BETWEEN lo AND hi`
    Between {
        value: Box<Scalar>,
        low: Box<Scalar>,
        high: Box<Scalar>,
    },

    /// Membership test: `x IN (a, b, c)`
    In { value: Box<Scalar>, list: Vec<Scalar> },

    /// Null test: `x IS NULL`
    IsNull(Box<Scalar>),

    /// Spatial predicate: `S_INTERSECTS(geom, POINT(1 2))`
    Spatial {
        op: SpatialOp,
        left: Box<Scalar>,
        right: Box<Scalar>,
    },

    /// Temporal predicate: `T_DURING(when, INTERVAL(...))`
    Temporal {
        op: TemporalOp,
        left: Box<Scalar>,
        right: Box<Scalar>,
    },

    /// Array predicate: `A_CONTAINS(tags, ('a', 'b'))`
    Array {
        op: ArrayOp,
        left: Box<Scalar>,
        right: Box<Scalar>,
    },

    /// A bare function call used as a predicate
    Function(Function),
}

/// A scalar operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Numeric literal; all numerics are doubles
    Number(f64),

    /// Character literal
    String(String),

    /// Boolean literal in value position
    Bool(bool),

    /// Instant with sub-second precision, always UTC
    Timestamp(DateTime<Utc>),

    /// Calendar date
    Date(NaiveDate),

    /// Temporal interval; `..` bounds are open
    Interval(IntervalBound, IntervalBound),

    /// Geometry literal (WKT in text, GeoJSON in JSON)
    Geometry(Geometry),

    /// Bounding box with 4 (2D) or 6 (3D) numbers
    BBox(Vec<f64>),

    /// Property reference
    Property(String),

    /// Function call
    Function(Function),

    /// Binary arithmetic expression
    Arith {
        op: ArithOp,
        left: Box<Scalar>,
        right: Box<Scalar>,
    },

    /// Case-insensitive wrapper
    CaseI(Box<Scalar>),

    /// Accent-insensitive wrapper
    AccentI(Box<Scalar>),

    /// Array literal
    Array(Vec<Scalar>),

    /// A nested boolean expression used as a value
    Predicate(Box<Expr>),
}

/// A named function call with scalar arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub args: Vec<Scalar>,
}

impl Expr {
    /// Build a conjunction. Fails unless there are at least two operands.
    pub fn and(args: Vec<Expr>) -> Result<Expr, Error> {
        if args.len() < 2 {
            return Err(Error::Structural(format!(
                "`and` needs at least 2 operands, got {}",
                args.len()
            )));
        }
        Ok(Expr::And(args))
    }

    /// Build a disjunction. Fails unless there are at least two operands.
    pub fn or(args: Vec<Expr>) -> Result<Expr, Error> {
        if args.len() < 2 {
            return Err(Error::Structural(format!(
                "`or` needs at least 2 operands, got {}",
                args.len()
            )));
        }
        Ok(Expr::Or(args))
    }

    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    pub fn comparison(op: ComparisonOp, left: Scalar, right: Scalar) -> Expr {
        Expr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Scalar {
    pub fn property(name: impl Into<String>) -> Scalar {
        Scalar::Property(name.into())
    }

    pub fn arith(self, op: ArithOp, rhs: Scalar) -> Scalar {
        Scalar::Arith {
            op,
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }

    /// Build a bounding box. Fails unless there are exactly 4 or 6 numbers.
    pub fn bbox(values: Vec<f64>) -> Result<Scalar, Error> {
        if values.len() != 4 && values.len() != 6 {
            return Err(Error::Structural(format!(
                "bbox needs 4 or 6 numbers, got {}",
                values.len()
            )));
        }
        Ok(Scalar::BBox(values))
    }
}
