//! Parser for CQL2-Text filter expressions
//!
//! Hand-written recursive descent over `&str`. Keywords and the S_/T_/A_
//! operator names are case-insensitive and take priority over identifiers.
//! `AND`/`OR` chains are flattened during lowering; the negated predicate
//! forms (`NOT LIKE`, `NOT BETWEEN`, `NOT IN`, `IS NOT NULL`) are pulled up
//! into `Not(...)` nodes.

use winnow::ascii::{Caseless, digit0, digit1, multispace0, multispace1};
use winnow::combinator::{alt, delimited, not, opt, preceded, repeat, separated, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_while};

use crate::Error;
use crate::ast::temporal::{parse_date, parse_timestamp};
use crate::ast::{
    ArithOp, ArrayOp, ComparisonOp, Expr, Function, Geometry, IntervalBound, Position, Scalar,
    SpatialOp, TemporalOp,
};

type PResult<T> = winnow::ModalResult<T>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (line {}, column {}, offset {})",
            self.message, self.line, self.column, self.offset
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete CQL2-Text filter with the default nesting limit.
pub fn parse(input: &str) -> Result<Expr, Error> {
    parse_with_limit(input, crate::DEFAULT_DEPTH_LIMIT)
}

/// Parse a complete CQL2-Text filter, guarding nesting at `limit` brackets.
pub fn parse_with_limit(input: &str, limit: usize) -> Result<Expr, Error> {
    let input = input.trim();
    scan_depth(input, limit)?;
    let mut stream = input;
    match boolean_expression.parse_next(&mut stream) {
        Ok(parsed) => {
            if stream.trim().is_empty() {
                Ok(parsed)
            } else {
                let offset = trailing_input_offset(input, stream);
                Err(build_parse_error("unexpected trailing input".to_string(), input, offset).into())
            }
        }
        Err(e) => {
            let offset = input.len().saturating_sub(stream.len());
            let message = match e {
                ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => {
                    let rendered = ctx.to_string();
                    if rendered.trim().is_empty() {
                        "expected a CQL2 predicate".to_string()
                    } else {
                        rendered
                    }
                }
                ErrMode::Incomplete(_) => "incomplete input".to_string(),
            };
            Err(build_parse_error(message, input, offset).into())
        }
    }
}

fn build_parse_error(message: String, input: &str, offset: usize) -> ParseError {
    let (line, column) = offset_to_line_column(input, offset);
    ParseError {
        message,
        offset,
        line,
        column,
    }
}

fn offset_to_line_column(input: &str, offset: usize) -> (usize, usize) {
    let bounded = offset.min(input.len());
    let mut line = 1usize;
    let mut column = 1usize;

    for ch in input[..bounded].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

fn trailing_input_offset(input: &str, trailing: &str) -> usize {
    let base = input.len().saturating_sub(trailing.len());
    let non_ws = trailing
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    base + non_ws
}

/// Grammar recursion only descends through brackets (parens, function calls,
/// WKT); NOT chains and operator ladders are iterative. Bounding bracket
/// nesting up front therefore bounds parser recursion.
fn scan_depth(input: &str, limit: usize) -> Result<(), Error> {
    let s = input.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < s.len() {
        match s[i] {
            b'\'' => {
                i += 1;
                while i < s.len() {
                    if s[i] == b'\\' && i + 1 < s.len() && s[i + 1] == b'\'' {
                        i += 2;
                    } else if s[i] == b'\'' {
                        if i + 1 < s.len() && s[i + 1] == b'\'' {
                            i += 2;
                        } else {
                            break;
                        }
                    } else {
                        i += 1;
                    }
                }
                i += 1;
            }
            b'"' => {
                i += 1;
                while i < s.len() && s[i] != b'"' {
                    i += 1;
                }
                i += 1;
            }
            b'(' | b'[' => {
                depth += 1;
                if depth > limit {
                    return Err(Error::DepthExceeded(limit));
                }
                i += 1;
            }
            b')' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(())
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

// ============ Boolean layer ============

fn boolean_expression(input: &mut &str) -> PResult<Expr> {
    let mut terms: Vec<Expr> = separated(1.., boolean_term, (ws, keyword("OR"))).parse_next(input)?;
    if terms.len() == 1 {
        Ok(terms.swap_remove(0))
    } else {
        Ok(Expr::Or(terms))
    }
}

fn boolean_term(input: &mut &str) -> PResult<Expr> {
    let mut factors: Vec<Expr> =
        separated(1.., boolean_factor, (ws, keyword("AND"))).parse_next(input)?;
    if factors.len() == 1 {
        Ok(factors.swap_remove(0))
    } else {
        Ok(Expr::And(factors))
    }
}

fn boolean_factor(input: &mut &str) -> PResult<Expr> {
    let nots: Vec<&str> = repeat(0.., preceded(ws, keyword("NOT"))).parse_next(input)?;
    let mut parsed = boolean_primary.parse_next(input)?;
    for _ in 0..nots.len() {
        parsed = Expr::Not(Box::new(parsed));
    }
    Ok(parsed)
}

fn boolean_primary(input: &mut &str) -> PResult<Expr> {
    preceded(
        ws,
        alt((
            spatial_predicate,
            temporal_predicate,
            array_predicate,
            scalar_predicate,
        )),
    )
    .parse_next(input)
}

// ============ Keyword-led predicates ============

fn op_token<'a>(input: &mut &'a str) -> PResult<&'a str> {
    (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)
}

fn spatial_predicate(input: &mut &str) -> PResult<Expr> {
    let token = op_token.parse_next(input)?;
    let Some(op) = SpatialOp::from_text(token) else {
        return Err(backtrack());
    };
    let (left, _, right) = delimited(
        (ws, '(', ws),
        (geom_expression, (ws, ','), geom_expression),
        (ws, ')'),
    )
    .parse_next(input)?;
    Ok(Expr::Spatial {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn temporal_predicate(input: &mut &str) -> PResult<Expr> {
    let token = op_token.parse_next(input)?;
    let Some(op) = TemporalOp::from_text(token) else {
        return Err(backtrack());
    };
    let (left, _, right) = delimited(
        (ws, '(', ws),
        (temporal_expression, (ws, ','), temporal_expression),
        (ws, ')'),
    )
    .parse_next(input)?;
    Ok(Expr::Temporal {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn array_predicate(input: &mut &str) -> PResult<Expr> {
    let token = op_token.parse_next(input)?;
    let Some(op) = ArrayOp::from_text(token) else {
        return Err(backtrack());
    };
    let (left, _, right) = delimited(
        (ws, '(', ws),
        (array_expression, (ws, ','), array_expression),
        (ws, ')'),
    )
    .parse_next(input)?;
    Ok(Expr::Array {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn geom_expression(input: &mut &str) -> PResult<Scalar> {
    preceded(
        ws,
        alt((
            geometry_literal.map(Scalar::Geometry),
            bbox_literal,
            property_or_function,
        )),
    )
    .parse_next(input)
}

fn temporal_expression(input: &mut &str) -> PResult<Scalar> {
    preceded(ws, alt((temporal_instant, property_or_function))).parse_next(input)
}

fn array_expression(input: &mut &str) -> PResult<Scalar> {
    preceded(ws, alt((array_literal, property_or_function))).parse_next(input)
}

// ============ Scalar-led predicates ============

fn scalar_predicate(input: &mut &str) -> PResult<Expr> {
    let left = scalar_expression.parse_next(input)?;
    ws.parse_next(input)?;

    if let Some(op) = opt(comparison_op).parse_next(input)? {
        let right = scalar_expression.parse_next(input)?;
        return Ok(Expr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    if opt(keyword("IS")).parse_next(input)?.is_some() {
        let negated = opt(preceded(ws, keyword("NOT"))).parse_next(input)?.is_some();
        preceded(ws, keyword("NULL")).parse_next(input)?;
        let pred = Expr::IsNull(Box::new(left));
        return Ok(if negated { pred.not() } else { pred });
    }

    let negated = opt(terminated(keyword("NOT"), ws)).parse_next(input)?.is_some();

    if opt(keyword("LIKE")).parse_next(input)?.is_some() {
        if !is_character_clause(&left) {
            return Err(backtrack());
        }
        let pattern = pattern_expression.parse_next(input)?;
        let pred = Expr::Like {
            value: Box::new(left),
            pattern: Box::new(pattern),
        };
        return Ok(if negated { pred.not() } else { pred });
    }

    if opt(keyword("BETWEEN")).parse_next(input)?.is_some() {
        if !is_numeric_operand(&left) {
            return Err(backtrack());
        }
        let low = numeric_expression.parse_next(input)?;
        preceded(ws, keyword("AND")).parse_next(input)?;
        let high = numeric_expression.parse_next(input)?;
        let pred = Expr::Between {
            value: Box::new(left),
            low: Box::new(low),
            high: Box::new(high),
        };
        return Ok(if negated { pred.not() } else { pred });
    }

    if opt(keyword("IN")).parse_next(input)?.is_some() {
        let list: Vec<Scalar> = delimited(
            (ws, '('),
            separated(1.., scalar_expression, (ws, ',')),
            (ws, ')'),
        )
        .parse_next(input)?;
        let pred = Expr::In {
            value: Box::new(left),
            list,
        };
        return Ok(if negated { pred.not() } else { pred });
    }

    if negated {
        return Err(backtrack());
    }

    // No predicate operator follows: the scalar itself must be boolean-valued.
    match left {
        Scalar::Bool(b) => Ok(Expr::Literal(b)),
        Scalar::Predicate(inner) => Ok(*inner),
        Scalar::Function(f) => Ok(Expr::Function(f)),
        _ => Err(backtrack()),
    }
}

fn comparison_op(input: &mut &str) -> PResult<ComparisonOp> {
    alt((
        "<>".value(ComparisonOp::NotEq),
        "<=".value(ComparisonOp::LtEq),
        ">=".value(ComparisonOp::GtEq),
        "=".value(ComparisonOp::Eq),
        "<".value(ComparisonOp::Lt),
        ">".value(ComparisonOp::Gt),
    ))
    .parse_next(input)
}

fn is_character_clause(scalar: &Scalar) -> bool {
    matches!(
        scalar,
        Scalar::String(_)
            | Scalar::Property(_)
            | Scalar::Function(_)
            | Scalar::CaseI(_)
            | Scalar::AccentI(_)
    )
}

fn is_numeric_operand(scalar: &Scalar) -> bool {
    matches!(
        scalar,
        Scalar::Number(_) | Scalar::Property(_) | Scalar::Function(_) | Scalar::Arith { .. }
    )
}

// ============ Scalar expressions ============

fn scalar_expression(input: &mut &str) -> PResult<Scalar> {
    preceded(
        ws,
        alt((
            temporal_instant,
            casei,
            accenti,
            geometry_literal.map(Scalar::Geometry),
            bbox_literal,
            char_literal.map(Scalar::String),
            boolean_scalar,
            arith_expression,
            paren_boolean,
            array_literal,
        )),
    )
    .parse_next(input)
}

fn boolean_scalar(input: &mut &str) -> PResult<Scalar> {
    alt((
        keyword("TRUE").value(Scalar::Bool(true)),
        keyword("FALSE").value(Scalar::Bool(false)),
    ))
    .parse_next(input)
}

fn paren_boolean(input: &mut &str) -> PResult<Scalar> {
    delimited(('(', ws), boolean_expression, (ws, ')'))
        .map(|inner| Scalar::Predicate(Box::new(inner)))
        .parse_next(input)
}

fn casei(input: &mut &str) -> PResult<Scalar> {
    preceded(
        keyword("CASEI"),
        delimited((ws, '(', ws), character_clause, (ws, ')')),
    )
    .map(|inner| Scalar::CaseI(Box::new(inner)))
    .parse_next(input)
}

fn accenti(input: &mut &str) -> PResult<Scalar> {
    preceded(
        keyword("ACCENTI"),
        delimited((ws, '(', ws), character_clause, (ws, ')')),
    )
    .map(|inner| Scalar::AccentI(Box::new(inner)))
    .parse_next(input)
}

fn character_clause(input: &mut &str) -> PResult<Scalar> {
    preceded(
        ws,
        alt((
            casei,
            accenti,
            char_literal.map(Scalar::String),
            property_or_function,
        )),
    )
    .parse_next(input)
}

fn pattern_expression(input: &mut &str) -> PResult<Scalar> {
    preceded(ws, alt((casei, accenti, char_literal.map(Scalar::String)))).parse_next(input)
}

fn array_literal(input: &mut &str) -> PResult<Scalar> {
    delimited(('(', ws), separated(1.., array_element, (ws, ',')), (ws, ')'))
        .map(Scalar::Array)
        .parse_next(input)
}

fn array_element(input: &mut &str) -> PResult<Scalar> {
    preceded(ws, alt((scalar_expression, array_literal))).parse_next(input)
}

// ============ Arithmetic ============

fn arith_expression(input: &mut &str) -> PResult<Scalar> {
    let first = arith_term.parse_next(input)?;
    let rest: Vec<(ArithOp, Scalar)> =
        repeat(0.., (ws, add_op, arith_term).map(|(_, op, e)| (op, e))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| l.arith(op, r)))
}

fn add_op(input: &mut &str) -> PResult<ArithOp> {
    alt(('+'.value(ArithOp::Add), '-'.value(ArithOp::Sub))).parse_next(input)
}

fn arith_term(input: &mut &str) -> PResult<Scalar> {
    let first = arith_power.parse_next(input)?;
    let rest: Vec<(ArithOp, Scalar)> =
        repeat(0.., (ws, mul_op, arith_power).map(|(_, op, e)| (op, e))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| l.arith(op, r)))
}

fn mul_op(input: &mut &str) -> PResult<ArithOp> {
    alt((
        '*'.value(ArithOp::Mul),
        '/'.value(ArithOp::Div),
        '%'.value(ArithOp::Mod),
        keyword("DIV").value(ArithOp::IntDiv),
    ))
    .parse_next(input)
}

// `^` is right-associative; collected iteratively and folded from the right.
fn arith_power(input: &mut &str) -> PResult<Scalar> {
    let first = arith_unary.parse_next(input)?;
    let mut rest: Vec<Scalar> =
        repeat(0.., preceded((ws, '^'), arith_unary)).parse_next(input)?;
    match rest.pop() {
        None => Ok(first),
        Some(last) => {
            let tail = rest
                .into_iter()
                .rev()
                .fold(last, |r, l| l.arith(ArithOp::Pow, r));
            Ok(first.arith(ArithOp::Pow, tail))
        }
    }
}

fn arith_unary(input: &mut &str) -> PResult<Scalar> {
    preceded(
        ws,
        alt((number.map(Scalar::Number), negated_operand, arith_atom)),
    )
    .parse_next(input)
}

// A unary minus over a non-literal operand becomes `-1 * operand`; a sign
// glued to a numeric literal stays in the literal (handled by `number`).
fn negated_operand(input: &mut &str) -> PResult<Scalar> {
    let minuses: Vec<char> = repeat(1.., terminated('-', ws)).parse_next(input)?;
    let mut operand = arith_atom.parse_next(input)?;
    for _ in 0..minuses.len() {
        operand = Scalar::Number(-1.0).arith(ArithOp::Mul, operand);
    }
    Ok(operand)
}

fn arith_atom(input: &mut &str) -> PResult<Scalar> {
    preceded(
        ws,
        alt((
            number.map(Scalar::Number),
            property_or_function,
            delimited(('(', ws), arith_expression, (ws, ')')),
        )),
    )
    .parse_next(input)
}

fn numeric_expression(input: &mut &str) -> PResult<Scalar> {
    preceded(ws, arith_expression).parse_next(input)
}

// ============ Temporal literals ============

fn temporal_instant(input: &mut &str) -> PResult<Scalar> {
    alt((date_instant, timestamp_instant, interval_instance)).parse_next(input)
}

fn date_instant(input: &mut &str) -> PResult<Scalar> {
    let text = preceded(
        keyword("DATE"),
        delimited((ws, '(', ws), char_literal, (ws, ')')),
    )
    .parse_next(input)?;
    let date = parse_date(&text).map_err(|_| backtrack())?;
    Ok(Scalar::Date(date))
}

fn timestamp_instant(input: &mut &str) -> PResult<Scalar> {
    let text = preceded(
        keyword("TIMESTAMP"),
        delimited((ws, '(', ws), char_literal, (ws, ')')),
    )
    .parse_next(input)?;
    let ts = parse_timestamp(&text).map_err(|_| backtrack())?;
    Ok(Scalar::Timestamp(ts))
}

fn interval_instance(input: &mut &str) -> PResult<Scalar> {
    preceded(
        keyword("INTERVAL"),
        delimited(
            (ws, '(', ws),
            (interval_bound, (ws, ',', ws), interval_bound),
            (ws, ')'),
        ),
    )
    .map(|(start, _, end)| Scalar::Interval(start, end))
    .parse_next(input)
}

fn interval_bound(input: &mut &str) -> PResult<IntervalBound> {
    alt((
        quoted_bound,
        function.map(IntervalBound::Function),
        property_name.map(IntervalBound::Property),
    ))
    .parse_next(input)
}

fn quoted_bound(input: &mut &str) -> PResult<IntervalBound> {
    let text = char_literal.parse_next(input)?;
    if text == ".." {
        return Ok(IntervalBound::Open);
    }
    if let Ok(ts) = parse_timestamp(&text) {
        return Ok(IntervalBound::Timestamp(ts));
    }
    if let Ok(date) = parse_date(&text) {
        return Ok(IntervalBound::Date(date));
    }
    Err(backtrack())
}

// ============ Geometry ============

fn geometry_literal(input: &mut &str) -> PResult<Geometry> {
    alt((
        point,
        linestring,
        polygon,
        multi_point,
        multi_linestring,
        multi_polygon,
        geometry_collection,
    ))
    .parse_next(input)
}

fn z_marker(input: &mut &str) -> PResult<()> {
    opt(preceded(ws, keyword("Z"))).void().parse_next(input)
}

fn point(input: &mut &str) -> PResult<Geometry> {
    preceded(
        (keyword("POINT"), z_marker),
        delimited((ws, '(', ws), coordinate, (ws, ')')),
    )
    .map(Geometry::Point)
    .parse_next(input)
}

fn linestring(input: &mut &str) -> PResult<Geometry> {
    preceded(
        (keyword("LINESTRING"), z_marker),
        delimited((ws, '(', ws), linestring_coordinates, (ws, ')')),
    )
    .map(Geometry::LineString)
    .parse_next(input)
}

fn polygon(input: &mut &str) -> PResult<Geometry> {
    preceded(
        (keyword("POLYGON"), z_marker),
        delimited((ws, '(', ws), polygon_coordinates, (ws, ')')),
    )
    .map(Geometry::Polygon)
    .parse_next(input)
}

// The non-standard bare form `MULTIPOINT(0 0, 1 1)` is accepted; output
// always parenthesizes.
fn multi_point(input: &mut &str) -> PResult<Geometry> {
    preceded(
        (keyword("MULTIPOINT"), z_marker),
        delimited(
            (ws, '(', ws),
            separated(1.., multi_point_member, (ws, ',', ws)),
            (ws, ')'),
        ),
    )
    .map(Geometry::MultiPoint)
    .parse_next(input)
}

fn multi_point_member(input: &mut &str) -> PResult<Position> {
    alt((delimited(('(', ws), coordinate, (ws, ')')), coordinate)).parse_next(input)
}

fn multi_linestring(input: &mut &str) -> PResult<Geometry> {
    preceded(
        (keyword("MULTILINESTRING"), z_marker),
        delimited(
            (ws, '(', ws),
            separated(
                1..,
                delimited(('(', ws), linestring_coordinates, (ws, ')')),
                (ws, ',', ws),
            ),
            (ws, ')'),
        ),
    )
    .map(Geometry::MultiLineString)
    .parse_next(input)
}

fn multi_polygon(input: &mut &str) -> PResult<Geometry> {
    preceded(
        (keyword("MULTIPOLYGON"), z_marker),
        delimited(
            (ws, '(', ws),
            separated(
                1..,
                delimited(('(', ws), polygon_coordinates, (ws, ')')),
                (ws, ',', ws),
            ),
            (ws, ')'),
        ),
    )
    .map(Geometry::MultiPolygon)
    .parse_next(input)
}

// Collections admit only non-collection geometries; BBOX is excluded by the
// grammar as well, so both violations surface as syntax errors.
fn geometry_collection(input: &mut &str) -> PResult<Geometry> {
    preceded(
        keyword("GEOMETRYCOLLECTION"),
        delimited(
            (ws, '(', ws),
            separated(1.., collection_member, (ws, ',', ws)),
            (ws, ')'),
        ),
    )
    .map(Geometry::GeometryCollection)
    .parse_next(input)
}

fn collection_member(input: &mut &str) -> PResult<Geometry> {
    alt((
        point,
        linestring,
        polygon,
        multi_point,
        multi_linestring,
        multi_polygon,
    ))
    .parse_next(input)
}

fn linestring_coordinates(input: &mut &str) -> PResult<Vec<Position>> {
    separated(2.., coordinate, (ws, ',', ws)).parse_next(input)
}

fn polygon_coordinates(input: &mut &str) -> PResult<Vec<Vec<Position>>> {
    separated(1.., linear_ring, (ws, ',', ws)).parse_next(input)
}

fn linear_ring(input: &mut &str) -> PResult<Vec<Position>> {
    delimited(
        ('(', ws),
        separated(4.., coordinate, (ws, ',', ws)),
        (ws, ')'),
    )
    .parse_next(input)
}

fn coordinate(input: &mut &str) -> PResult<Position> {
    (
        number,
        preceded(multispace1, number),
        opt(preceded(multispace1, number)),
    )
        .map(|(x, y, z)| Position { x, y, z })
        .parse_next(input)
}

fn bbox_literal(input: &mut &str) -> PResult<Scalar> {
    let numbers: Vec<f64> = preceded(
        keyword("BBOX"),
        delimited(
            (ws, '(', ws),
            separated(4..=6, number, (ws, ',', ws)),
            (ws, ')'),
        ),
    )
    .parse_next(input)?;
    if numbers.len() == 5 {
        return Err(backtrack());
    }
    Ok(Scalar::BBox(numbers))
}

// ============ Properties, functions, literals ============

fn property_or_function(input: &mut &str) -> PResult<Scalar> {
    alt((
        function.map(Scalar::Function),
        property_name.map(Scalar::Property),
    ))
    .parse_next(input)
}

fn function(input: &mut &str) -> PResult<Function> {
    let name = ident_str.parse_next(input)?;
    let args: Option<Vec<Scalar>> =
        delimited((ws, '(', ws), opt(argument_list), (ws, ')')).parse_next(input)?;
    Ok(Function {
        name,
        args: args.unwrap_or_default(),
    })
}

fn argument_list(input: &mut &str) -> PResult<Vec<Scalar>> {
    separated(1.., array_element, (ws, ',')).parse_next(input)
}

fn property_name(input: &mut &str) -> PResult<String> {
    alt((quoted_ident, ident_str)).parse_next(input)
}

fn quoted_ident(input: &mut &str) -> PResult<String> {
    delimited('"', take_while(0.., |c: char| c != '"'), '"')
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

fn ident_str(input: &mut &str) -> PResult<String> {
    let word = (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)?;
    if is_reserved(word) {
        return Err(backtrack());
    }
    Ok(word.to_string())
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

// Keywords outrank identifiers; bare property names that collide must be
// double-quoted. This covers the boolean/predicate keywords, the literal
// constructors, the WKT type names, and the S_/T_/A_ operator families.
fn is_reserved(word: &str) -> bool {
    const RESERVED: [&str; 24] = [
        "AND",
        "OR",
        "NOT",
        "LIKE",
        "BETWEEN",
        "IN",
        "IS",
        "NULL",
        "TRUE",
        "FALSE",
        "DIV",
        "CASEI",
        "ACCENTI",
        "DATE",
        "TIMESTAMP",
        "INTERVAL",
        "BBOX",
        "POINT",
        "LINESTRING",
        "POLYGON",
        "MULTIPOINT",
        "MULTILINESTRING",
        "MULTIPOLYGON",
        "GEOMETRYCOLLECTION",
    ];
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(word))
        || SpatialOp::from_text(word).is_some()
        || TemporalOp::from_text(word).is_some()
        || ArrayOp::from_text(word).is_some()
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&mut &'a str) -> PResult<&'a str> {
    move |input: &mut &'a str| {
        terminated(literal(Caseless(kw)), not(one_of(is_ident_continue))).parse_next(input)
    }
}

fn number(input: &mut &str) -> PResult<f64> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn char_literal(input: &mut &str) -> PResult<String> {
    delimited('\'', literal_contents, '\'').parse_next(input)
}

// `''` is the in-literal escape for a single quote; `\'` is additionally
// accepted. Any other backslash passes through unchanged.
fn literal_contents(input: &mut &str) -> PResult<String> {
    let mut result = String::new();
    loop {
        if input.starts_with("''") || input.starts_with("\\'") {
            result.push('\'');
            *input = &input[2..];
        } else if input.starts_with('\'') {
            break;
        } else {
            let mut chars = input.chars();
            match chars.next() {
                Some(c) => {
                    result.push(c);
                    *input = &input[c.len_utf8()..];
                }
                None => return Err(backtrack()),
            }
        }
    }
    Ok(result)
}

fn ws(input: &mut &str) -> PResult<()> {
    multispace0.void().parse_next(input)
}

// ============ Sanity Tests ============
// Broader coverage lives in tests/integration.rs and tests/fixtures.rs.
