//! Black-box integration tests for the CQL2 translator
//!
//! These exercise the full text → AST → json/text pipeline end to end.

use cql2_filter::{
    ArithOp, ComparisonOp, Error, Expr, Scalar, parse_json, parse_text, parse_text_with_limit,
    to_json, to_text,
};
use serde_json::json;

fn parse(input: &str) -> Expr {
    parse_text(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

// ============ End-to-end scenarios ============

#[test]
fn comparison_round_trip() {
    let ast = parse("prop1 = 5");
    assert_eq!(
        to_json(&ast),
        json!({"op": "=", "args": [{"property": "prop1"}, 5.0]})
    );
    assert_eq!(to_text(&ast), r#"("prop1" = 5.0)"#);
}

#[test]
fn not_between_round_trip() {
    let ast = parse("foo NOT BETWEEN 1 AND 10");
    assert_eq!(
        to_json(&ast),
        json!({"op": "not", "args": [
            {"op": "between", "args": [{"property": "foo"}, 1.0, 10.0]}
        ]})
    );
    assert_eq!(to_text(&ast), r#""foo" NOT BETWEEN 1.0 AND 10.0"#);
}

#[test]
fn spatial_point_round_trip() {
    let ast = parse("S_INTERSECTS(geom, POINT(1 2))");
    assert_eq!(
        to_json(&ast),
        json!({"op": "s_intersects", "args": [
            {"property": "geom"},
            {"type": "Point", "coordinates": [1.0, 2.0]}
        ]})
    );
    assert_eq!(to_text(&ast), r#"S_INTERSECTS("geom", POINT(1.0 2.0))"#);
}

#[test]
fn timestamp_comparison_round_trip() {
    let ast = parse("TIMESTAMP('2020-01-01T00:00:00Z') > TIMESTAMP('2019-01-01T00:00:00Z')");
    let rendered = to_text(&ast);
    assert_eq!(
        rendered,
        "(TIMESTAMP('2020-01-01T00:00:00.000000Z') > TIMESTAMP('2019-01-01T00:00:00.000000Z'))"
    );
    assert_eq!(parse(&rendered), ast);
    assert_eq!(to_text(&parse(&rendered)), rendered);
}

#[test]
fn unary_minus_becomes_multiply() {
    let ast = parse("-x + 1 > 0");
    let Expr::Comparison { left, .. } = &ast else {
        panic!("expected comparison");
    };
    let expected = Scalar::Number(-1.0)
        .arith(ArithOp::Mul, Scalar::property("x"))
        .arith(ArithOp::Add, Scalar::Number(1.0));
    assert_eq!(**left, expected);
    assert_eq!(to_text(&ast), r#"(((-1.0 * "x") + 1.0) > 0.0)"#);
    assert_eq!(
        to_json(&ast),
        json!({"op": ">", "args": [
            {"op": "+", "args": [
                {"op": "*", "args": [-1.0, {"property": "x"}]},
                1.0
            ]},
            0.0
        ]})
    );
}

#[test]
fn like_casei_round_trip() {
    let ast = parse("name LIKE CASEI('abc%')");
    assert_eq!(
        to_json(&ast),
        json!({"op": "like", "args": [
            {"property": "name"},
            {"op": "casei", "args": ["abc%"]}
        ]})
    );
    assert_eq!(to_text(&ast), r#""name" LIKE CASEI('abc%')"#);
}

// ============ Round-trip contracts ============

#[test]
fn json_round_trip_is_identity() {
    for input in [
        "a = 1 AND b = 2 AND c = 3",
        "NOT (a = 1 OR b = 2)",
        "x NOT IN ('a', 'b')",
        "value BETWEEN 0 AND 2 ^ 10",
        "S_WITHIN(geom, POLYGON((0 0, 1 0, 1 1, 0 0)))",
        "T_FINISHEDBY(span, INTERVAL('2020-01-01', '2021-01-01'))",
        "A_OVERLAPS(tags, ('a', 'b', 'c'))",
        "ACCENTI(label) = ACCENTI('déjà')",
        "S_CROSSES(footprint(1), BBOX(-10, -10, 10, 10))",
        "duration IN (DATE('2020-01-01'), TIMESTAMP('2020-01-01T12:00:00.5Z'))",
    ] {
        let ast = parse(input);
        let value = to_json(&ast);
        let decoded = parse_json(&value).unwrap_or_else(|e| panic!("{input}: {e}"));
        assert_eq!(decoded, ast, "json round trip changed the tree for {input}");
        assert_eq!(to_json(&decoded), value, "json emission unstable for {input}");
    }
}

#[test]
fn text_round_trip_stabilizes_after_one_pass() {
    for input in [
        "prop1=5 AnD prop2<>'x'",
        "NOT NOT a = 1",
        "  S_INTERSECTS( geom , MULTIPOINT( 0 0 , 1 1 ) )  ",
        "x NOT LIKE 'a''b%'",
        "(a = 1)",
    ] {
        let first = parse(input);
        let once = to_text(&first);
        let second = parse(&once);
        assert_eq!(first, second, "reparse changed the tree for {input}");
        assert_eq!(to_text(&second), once, "text not stable for {input}");
    }
}

#[test]
fn emitted_junctions_have_at_least_two_args() {
    let ast = parse("a = 1 AND b = 2 AND c = 3 OR d = 4");
    fn check(value: &serde_json::Value) {
        if let Some(op) = value.get("op").and_then(|v| v.as_str())
            && (op == "and" || op == "or")
        {
            let args = value["args"].as_array().unwrap();
            assert!(args.len() >= 2, "{op} emitted with {} args", args.len());
        }
        match value {
            serde_json::Value::Array(items) => items.iter().for_each(check),
            serde_json::Value::Object(map) => map.values().for_each(check),
            _ => {}
        }
    }
    check(&to_json(&ast));
}

#[test]
fn emitted_timestamps_have_six_fraction_digits() {
    let ast = parse("t = TIMESTAMP('2020-06-15T10:20:30.04Z')");
    let rendered = to_text(&ast);
    let quoted = rendered
        .split('\'')
        .nth(1)
        .expect("timestamp literal present");
    assert_eq!(quoted, "2020-06-15T10:20:30.040000Z");
    let (date_part, time_part) = quoted.split_once('T').unwrap();
    assert_eq!(date_part.len(), 10);
    assert!(time_part.ends_with('Z'));
    assert_eq!(time_part.split_once('.').unwrap().1.len(), 7); // 6 digits + Z
}

#[test]
fn number_emission_keeps_decimal_point() {
    let cases = [
        (Scalar::Number(5.0), "5.0"),
        (Scalar::Number(-5.0), "-5.0"),
        (Scalar::Number(0.5), "0.5"),
        (Scalar::Number(1e-7), "0.0000001"),
        (Scalar::Number(1e20), "100000000000000000000.0"),
    ];
    for (scalar, expected) in cases {
        let ast = Expr::comparison(ComparisonOp::Eq, Scalar::property("x"), scalar);
        let rendered = to_text(&ast);
        assert_eq!(rendered, format!("(\"x\" = {expected})"));
    }
}

// ============ Boundary cases ============

#[test]
fn linestring_with_one_coordinate_is_syntax_error() {
    let err = parse_text("S_INTERSECTS(geom, LINESTRING(0 0))").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "got {err:?}");
}

#[test]
fn polygon_ring_with_three_coordinates_is_syntax_error() {
    let err = parse_text("S_WITHIN(geom, POLYGON((0 0, 1 0, 0 0)))").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "got {err:?}");
}

#[test]
fn nesting_beyond_limit_is_depth_exceeded() {
    let deep = format!("{}x = 1{}", "(".repeat(257), ")".repeat(257));
    assert!(matches!(
        parse_text(&deep),
        Err(Error::DepthExceeded(256))
    ));

    let shallow = format!("{}x = 1{}", "(".repeat(16), ")".repeat(16));
    assert!(parse_text(&shallow).is_ok());
    assert!(matches!(
        parse_text_with_limit(&shallow, 8),
        Err(Error::DepthExceeded(8))
    ));
}

#[test]
fn empty_filter_is_syntax_error() {
    assert!(matches!(parse_text(""), Err(Error::Syntax(_))));
}

#[test]
fn geometry_collection_with_bbox_is_syntax_error() {
    let err =
        parse_text("S_EQUALS(geom, GEOMETRYCOLLECTION(BBOX(0, 0, 1, 1)))").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "got {err:?}");
}

#[test]
fn nested_geometry_collection_is_syntax_error() {
    let err = parse_text(
        "S_EQUALS(geom, GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(POINT(0 0))))",
    )
    .unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "got {err:?}");
}

// ============ JSON error taxonomy ============

#[test]
fn unknown_json_operator() {
    let err = parse_json(&json!({"op": "xor", "args": [true, false]})).unwrap_err();
    assert!(matches!(err, Error::UnknownOperator { .. }), "got {err:?}");
}

#[test]
fn malformed_json_text_is_encoding_error() {
    let err = cql2_filter::parse_json_str("{not json").unwrap_err();
    assert!(matches!(err, Error::Encoding(_)), "got {err:?}");
}

#[test]
fn invalid_json_timestamp_is_encoding_error() {
    let err = parse_json(&json!({"op": "=", "args": [
        {"property": "t"},
        {"timestamp": "2020-13-40T99:00:00Z"}
    ]}))
    .unwrap_err();
    assert!(matches!(err, Error::Encoding(_)), "got {err:?}");
}

// ============ serde integration ============

#[test]
fn expr_implements_serde_and_fromstr() {
    let ast: Expr = "prop1 = 5".parse().unwrap();
    let serialized = serde_json::to_string(&ast).unwrap();
    let deserialized: Expr = serde_json::from_str(&serialized).unwrap();
    assert_eq!(ast, deserialized);
}
