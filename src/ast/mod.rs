//! AST types for CQL2 filters
//!
//! Split into:
//! - `expr`: the boolean predicate layer and the scalar value layer
//! - `geom`: WKT/GeoJSON-compatible geometry literals
//! - `temporal`: date, timestamp and interval types

pub mod expr;
pub mod geom;
pub mod temporal;

pub use expr::{Expr, Function, Scalar};
pub use geom::{Geometry, Position};
pub use temporal::IntervalBound;

// Operator enums shared across the tree. `as_str` is the CQL2-JSON spelling;
// the text form is derived from it (uppercased for the S_/T_/A_ families).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::GtEq => ">=",
        }
    }

    pub fn from_op(op: &str) -> Option<Self> {
        match op {
            "=" => Some(ComparisonOp::Eq),
            "<>" => Some(ComparisonOp::NotEq),
            "<" => Some(ComparisonOp::Lt),
            ">" => Some(ComparisonOp::Gt),
            "<=" => Some(ComparisonOp::LtEq),
            ">=" => Some(ComparisonOp::GtEq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    IntDiv,
    Pow,
}

impl ArithOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::IntDiv => "div",
            ArithOp::Pow => "^",
        }
    }

    pub fn from_op(op: &str) -> Option<Self> {
        match op {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            "%" => Some(ArithOp::Mod),
            "div" => Some(ArithOp::IntDiv),
            "^" => Some(ArithOp::Pow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialOp {
    Contains,
    Crosses,
    Disjoint,
    Equals,
    Intersects,
    Overlaps,
    Touches,
    Within,
}

impl SpatialOp {
    pub const ALL: [SpatialOp; 8] = [
        SpatialOp::Contains,
        SpatialOp::Crosses,
        SpatialOp::Disjoint,
        SpatialOp::Equals,
        SpatialOp::Intersects,
        SpatialOp::Overlaps,
        SpatialOp::Touches,
        SpatialOp::Within,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpatialOp::Contains => "s_contains",
            SpatialOp::Crosses => "s_crosses",
            SpatialOp::Disjoint => "s_disjoint",
            SpatialOp::Equals => "s_equals",
            SpatialOp::Intersects => "s_intersects",
            SpatialOp::Overlaps => "s_overlaps",
            SpatialOp::Touches => "s_touches",
            SpatialOp::Within => "s_within",
        }
    }

    pub fn from_op(op: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == op)
    }

    /// Case-insensitive lookup for the text form.
    pub fn from_text(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(token))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalOp {
    After,
    Before,
    Contains,
    Disjoint,
    During,
    Equals,
    FinishedBy,
    Finishes,
    Intersects,
    Meets,
    MetBy,
    OverlappedBy,
    Overlaps,
    StartedBy,
    Starts,
}

impl TemporalOp {
    pub const ALL: [TemporalOp; 15] = [
        TemporalOp::After,
        TemporalOp::Before,
        TemporalOp::Contains,
        TemporalOp::Disjoint,
        TemporalOp::During,
        TemporalOp::Equals,
        TemporalOp::FinishedBy,
        TemporalOp::Finishes,
        TemporalOp::Intersects,
        TemporalOp::Meets,
        TemporalOp::MetBy,
        TemporalOp::OverlappedBy,
        TemporalOp::Overlaps,
        TemporalOp::StartedBy,
        TemporalOp::Starts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalOp::After => "t_after",
            TemporalOp::Before => "t_before",
            TemporalOp::Contains => "t_contains",
            TemporalOp::Disjoint => "t_disjoint",
            TemporalOp::During => "t_during",
            TemporalOp::Equals => "t_equals",
            TemporalOp::FinishedBy => "t_finishedBy",
            TemporalOp::Finishes => "t_finishes",
            TemporalOp::Intersects => "t_intersects",
            TemporalOp::Meets => "t_meets",
            TemporalOp::MetBy => "t_metBy",
            TemporalOp::OverlappedBy => "t_overlappedBy",
            TemporalOp::Overlaps => "t_overlaps",
            TemporalOp::StartedBy => "t_startedBy",
            TemporalOp::Starts => "t_starts",
        }
    }

    pub fn from_op(op: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == op)
    }

    pub fn from_text(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    ContainedBy,
    Contains,
    Equals,
    Overlaps,
}

impl ArrayOp {
    pub const ALL: [ArrayOp; 4] = [
        ArrayOp::ContainedBy,
        ArrayOp::Contains,
        ArrayOp::Equals,
        ArrayOp::Overlaps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayOp::ContainedBy => "a_containedBy",
            ArrayOp::Contains => "a_contains",
            ArrayOp::Equals => "a_equals",
            ArrayOp::Overlaps => "a_overlaps",
        }
    }

    pub fn from_op(op: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == op)
    }

    pub fn from_text(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(token))
    }
}
