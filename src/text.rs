//! CQL2-Text serialization for the filter AST
//!
//! Output is opinionated: property names are always double-quoted,
//! comparisons and arithmetic are always parenthesized, integral numbers get
//! a trailing `.0`, and timestamps carry exactly six fractional digits.
//! Redundant parentheses are acceptable; re-parsing the output yields the
//! same tree.

use crate::ast::temporal::format_timestamp_text;
use crate::ast::{
    ArithOp, ArrayOp, ComparisonOp, Expr, Function, Geometry, IntervalBound, Position, Scalar,
    SpatialOp, TemporalOp,
};
use std::fmt::{self, Display};

impl Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for SpatialOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

impl Display for TemporalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

impl Display for ArrayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(args) => write_junction(f, args, "AND"),
            Expr::Or(args) => write_junction(f, args, "OR"),
            Expr::Not(inner) => match inner.as_ref() {
                // Invert the parser's pull-up: negated predicates render in
                // their inline negative form.
                Expr::Like { value, pattern } => write!(f, "{value} NOT LIKE {pattern}"),
                Expr::Between { value, low, high } => {
                    write!(f, "{value} NOT BETWEEN {low} AND {high}")
                }
                Expr::In { value, list } => {
                    write!(f, "{value} NOT IN (")?;
                    write_list(f, list)?;
                    write!(f, ")")
                }
                Expr::IsNull(operand) => write!(f, "{operand} IS NOT NULL"),
                Expr::And(_) | Expr::Or(_) => write!(f, "NOT ({inner})"),
                _ => write!(f, "NOT {inner}"),
            },
            Expr::Literal(value) => write!(f, "{}", if *value { "TRUE" } else { "FALSE" }),
            Expr::Comparison { op, left, right } => write!(f, "({left} {op} {right})"),
            Expr::Like { value, pattern } => write!(f, "{value} LIKE {pattern}"),
            Expr::Between { value, low, high } => write!(f, "{value} BETWEEN {low} AND {high}"),
            Expr::In { value, list } => {
                write!(f, "{value} IN (")?;
                write_list(f, list)?;
                write!(f, ")")
            }
            Expr::IsNull(operand) => write!(f, "{operand} IS NULL"),
            Expr::Spatial { op, left, right } => write!(f, "{op}({left}, {right})"),
            Expr::Temporal { op, left, right } => write!(f, "{op}({left}, {right})"),
            Expr::Array { op, left, right } => write!(f, "{op}({left}, {right})"),
            Expr::Function(function) => write!(f, "{function}"),
        }
    }
}

// AND/OR children that are themselves junctions are parenthesized so the
// re-parse reproduces the original grouping.
fn write_junction(f: &mut fmt::Formatter<'_>, args: &[Expr], joiner: &str) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, " {joiner} ")?;
        }
        let needs_parens = match joiner {
            "AND" => matches!(arg, Expr::And(_) | Expr::Or(_)),
            _ => matches!(arg, Expr::Or(_)),
        };
        if needs_parens {
            write!(f, "({arg})")?;
        } else {
            write!(f, "{arg}")?;
        }
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Scalar]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => fmt_number(f, *n),
            Scalar::String(s) => write!(f, "'{}'", escape_char_literal(s)),
            Scalar::Bool(value) => write!(f, "{}", if *value { "TRUE" } else { "FALSE" }),
            Scalar::Timestamp(ts) => write!(f, "TIMESTAMP('{}')", format_timestamp_text(ts)),
            Scalar::Date(date) => write!(f, "DATE('{date}')"),
            Scalar::Interval(start, end) => write!(f, "INTERVAL({start}, {end})"),
            Scalar::Geometry(geometry) => write!(f, "{geometry}"),
            Scalar::BBox(numbers) => {
                write!(f, "BBOX(")?;
                for (i, n) in numbers.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_number(f, *n)?;
                }
                write!(f, ")")
            }
            Scalar::Property(name) => write!(f, "\"{name}\""),
            Scalar::Function(function) => write!(f, "{function}"),
            Scalar::Arith { op, left, right } => write!(f, "({left} {op} {right})"),
            Scalar::CaseI(inner) => write!(f, "CASEI({inner})"),
            Scalar::AccentI(inner) => write!(f, "ACCENTI({inner})"),
            Scalar::Array(items) => {
                write!(f, "(")?;
                write_list(f, items)?;
                write!(f, ")")
            }
            // A nested boolean in value position must be parenthesized to
            // survive the re-parse; doubled parens around a comparison are
            // harmless.
            Scalar::Predicate(inner) => write!(f, "({inner})"),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_list(f, &self.args)?;
        write!(f, ")")
    }
}

impl Display for IntervalBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalBound::Timestamp(ts) => write!(f, "'{}'", format_timestamp_text(ts)),
            IntervalBound::Date(date) => write!(f, "'{date}'"),
            IntervalBound::Open => write!(f, "'..'"),
            IntervalBound::Property(name) => write!(f, "\"{name}\""),
            IntervalBound::Function(function) => write!(f, "{function}"),
        }
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let z = if self.has_z() { " Z" } else { "" };
        match self {
            Geometry::Point(p) => write!(f, "POINT{z}({p})"),
            Geometry::LineString(coords) => {
                write!(f, "LINESTRING{z}(")?;
                write_coords(f, coords)?;
                write!(f, ")")
            }
            Geometry::Polygon(rings) => {
                write!(f, "POLYGON{z}(")?;
                write_rings(f, rings)?;
                write!(f, ")")
            }
            Geometry::MultiPoint(coords) => {
                write!(f, "MULTIPOINT{z}(")?;
                for (i, p) in coords.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "({p})")?;
                }
                write!(f, ")")
            }
            Geometry::MultiLineString(parts) => {
                write!(f, "MULTILINESTRING{z}(")?;
                write_rings(f, parts)?;
                write!(f, ")")
            }
            Geometry::MultiPolygon(polygons) => {
                write!(f, "MULTIPOLYGON{z}(")?;
                for (i, rings) in polygons.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "(")?;
                    write_rings(f, rings)?;
                    write!(f, ")")?;
                }
                write!(f, ")")
            }
            Geometry::GeometryCollection(members) => {
                write!(f, "GEOMETRYCOLLECTION(")?;
                for (i, g) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{g}")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_coords(f: &mut fmt::Formatter<'_>, coords: &[Position]) -> fmt::Result {
    for (i, p) in coords.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{p}")?;
    }
    Ok(())
}

fn write_rings(f: &mut fmt::Formatter<'_>, rings: &[Vec<Position>]) -> fmt::Result {
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "(")?;
        write_coords(f, ring)?;
        write!(f, ")")?;
    }
    Ok(())
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_number(f, self.x)?;
        write!(f, " ")?;
        fmt_number(f, self.y)?;
        if let Some(z) = self.z {
            write!(f, " ")?;
            fmt_number(f, z)?;
        }
        Ok(())
    }
}

// Exact integers keep a trailing `.0` so the numeric type survives the round
// trip; everything else uses the shortest representation that re-parses to
// the same double.
fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 {
        write!(f, "{n:.1}")
    } else {
        write!(f, "{n}")
    }
}

fn escape_char_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\'' {
            out.push_str("\\'");
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;

    fn round_trip(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn display_comparison() {
        assert_eq!(round_trip("prop1 = 5"), r#"("prop1" = 5.0)"#);
    }

    #[test]
    fn display_negated_forms() {
        assert_eq!(
            round_trip("foo NOT BETWEEN 1 AND 10"),
            r#""foo" NOT BETWEEN 1.0 AND 10.0"#
        );
        assert_eq!(round_trip("x IS NOT NULL"), r#""x" IS NOT NULL"#);
        assert_eq!(
            round_trip("name NOT LIKE 'a%'"),
            r#""name" NOT LIKE 'a%'"#
        );
        assert_eq!(
            round_trip("x NOT IN (1, 2)"),
            r#""x" NOT IN (1.0, 2.0)"#
        );
    }

    #[test]
    fn display_junctions() {
        assert_eq!(
            round_trip("a = 1 AND (b = 2 OR c = 3)"),
            r#"("a" = 1.0) AND (("b" = 2.0) OR ("c" = 3.0))"#
        );
    }

    #[test]
    fn display_not_over_junction() {
        assert_eq!(
            round_trip("NOT (a = 1 AND b = 2)"),
            r#"NOT (("a" = 1.0) AND ("b" = 2.0))"#
        );
    }

    #[test]
    fn display_spatial_wkt() {
        assert_eq!(
            round_trip("S_INTERSECTS(geom, POINT(1 2))"),
            r#"S_INTERSECTS("geom", POINT(1.0 2.0))"#
        );
        assert_eq!(
            round_trip("S_INTERSECTS(geom, POINT Z (1 2 3))"),
            r#"S_INTERSECTS("geom", POINT Z(1.0 2.0 3.0))"#
        );
        assert_eq!(
            round_trip("S_DISJOINT(geom, MULTIPOINT(0 0, 1 1))"),
            r#"S_DISJOINT("geom", MULTIPOINT((0.0 0.0), (1.0 1.0)))"#
        );
    }

    #[test]
    fn display_timestamp_six_digits() {
        assert_eq!(
            round_trip("t > TIMESTAMP('2020-01-01T00:00:00Z')"),
            r#"("t" > TIMESTAMP('2020-01-01T00:00:00.000000Z'))"#
        );
    }

    #[test]
    fn display_escapes_quotes_with_backslash() {
        assert_eq!(round_trip(r"x = 'a''b'"), "(\"x\" = 'a\\'b')");
    }

    #[test]
    fn display_unary_minus() {
        assert_eq!(
            round_trip("-x + 1 > 0"),
            r#"(((-1.0 * "x") + 1.0) > 0.0)"#
        );
    }

    #[test]
    fn display_is_stable() {
        for input in [
            "a = 1 AND b = 2 AND c = 3",
            "NOT a = 1",
            "x BETWEEN 1 AND 2 OR y IN ('a', 'b')",
            "T_DURING(when, INTERVAL('2020-01-01', '..'))",
            "A_CONTAINS(tags, ('a', 'b'))",
            "CASEI(name) = CASEI('Foo')",
        ] {
            let first = parse(input).unwrap();
            let rendered = first.to_string();
            let second = parse(&rendered).unwrap();
            assert_eq!(first, second, "reparse changed the tree for {input}");
            assert_eq!(rendered, second.to_string(), "output not stable for {input}");
        }
    }
}
