//! CQL2-JSON codec for the filter AST
//!
//! JSON is the canonical representation: the mapping is a direct structural
//! walk in both directions. Decode errors carry a JSON Pointer to the
//! offending value.

use serde_json::{Value, json};

use crate::Error;
use crate::ast::temporal::{format_timestamp_json, parse_date, parse_timestamp};
use crate::ast::{
    ArithOp, ArrayOp, ComparisonOp, Expr, Function, Geometry, IntervalBound, Position, Scalar,
    SpatialOp, TemporalOp,
};

// ============ AST → JSON ============

pub fn to_json(expr: &Expr) -> Value {
    expr_value(expr)
}

fn expr_value(expr: &Expr) -> Value {
    match expr {
        Expr::And(args) => op_node("and", args.iter().map(expr_value).collect()),
        Expr::Or(args) => op_node("or", args.iter().map(expr_value).collect()),
        Expr::Not(inner) => op_node("not", vec![expr_value(inner)]),
        Expr::Literal(value) => Value::Bool(*value),
        Expr::Comparison { op, left, right } => {
            op_node(op.as_str(), vec![scalar_value(left), scalar_value(right)])
        }
        Expr::Like { value, pattern } => {
            op_node("like", vec![scalar_value(value), scalar_value(pattern)])
        }
        Expr::Between { value, low, high } => op_node(
            "between",
            vec![scalar_value(value), scalar_value(low), scalar_value(high)],
        ),
        Expr::In { value, list } => op_node(
            "in",
            vec![
                scalar_value(value),
                Value::Array(list.iter().map(scalar_value).collect()),
            ],
        ),
        Expr::IsNull(operand) => op_node("isNull", vec![scalar_value(operand)]),
        Expr::Spatial { op, left, right } => {
            op_node(op.as_str(), vec![scalar_value(left), scalar_value(right)])
        }
        Expr::Temporal { op, left, right } => {
            op_node(op.as_str(), vec![scalar_value(left), scalar_value(right)])
        }
        Expr::Array { op, left, right } => {
            op_node(op.as_str(), vec![scalar_value(left), scalar_value(right)])
        }
        Expr::Function(function) => function_value(function),
    }
}

fn scalar_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Number(n) => number_value(*n),
        Scalar::String(s) => Value::String(s.clone()),
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Timestamp(ts) => json!({ "timestamp": format_timestamp_json(ts) }),
        Scalar::Date(date) => json!({ "date": date.to_string() }),
        Scalar::Interval(start, end) => {
            json!({ "interval": [bound_value(start), bound_value(end)] })
        }
        Scalar::Geometry(geometry) => geometry_value(geometry),
        Scalar::BBox(numbers) => json!({ "bbox": numbers }),
        Scalar::Property(name) => json!({ "property": name }),
        Scalar::Function(function) => function_value(function),
        Scalar::Arith { op, left, right } => {
            op_node(op.as_str(), vec![scalar_value(left), scalar_value(right)])
        }
        Scalar::CaseI(inner) => op_node("casei", vec![scalar_value(inner)]),
        Scalar::AccentI(inner) => op_node("accenti", vec![scalar_value(inner)]),
        Scalar::Array(items) => Value::Array(items.iter().map(scalar_value).collect()),
        Scalar::Predicate(inner) => expr_value(inner),
    }
}

fn op_node(op: &str, args: Vec<Value>) -> Value {
    json!({ "op": op, "args": args })
}

// JSON has no spelling for non-finite doubles; they map to null.
fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn function_value(function: &Function) -> Value {
    json!({
        "function": {
            "name": function.name,
            "args": function.args.iter().map(scalar_value).collect::<Vec<_>>(),
        }
    })
}

fn bound_value(bound: &IntervalBound) -> Value {
    match bound {
        IntervalBound::Timestamp(ts) => Value::String(format_timestamp_json(ts)),
        IntervalBound::Date(date) => Value::String(date.to_string()),
        IntervalBound::Open => Value::String("..".to_string()),
        IntervalBound::Property(name) => json!({ "property": name }),
        IntervalBound::Function(function) => function_value(function),
    }
}

fn geometry_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position_value(p) }),
        Geometry::LineString(coords) => {
            json!({ "type": "LineString", "coordinates": positions_value(coords) })
        }
        Geometry::Polygon(rings) => {
            json!({ "type": "Polygon", "coordinates": rings_value(rings) })
        }
        Geometry::MultiPoint(coords) => {
            json!({ "type": "MultiPoint", "coordinates": positions_value(coords) })
        }
        Geometry::MultiLineString(parts) => {
            json!({ "type": "MultiLineString", "coordinates": rings_value(parts) })
        }
        Geometry::MultiPolygon(polygons) => {
            let coords: Vec<Value> = polygons.iter().map(|rings| rings_value(rings)).collect();
            json!({ "type": "MultiPolygon", "coordinates": coords })
        }
        Geometry::GeometryCollection(members) => {
            let geometries: Vec<Value> = members.iter().map(geometry_value).collect();
            json!({ "type": "GeometryCollection", "geometries": geometries })
        }
    }
}

fn position_value(p: &Position) -> Value {
    let mut coords = vec![number_value(p.x), number_value(p.y)];
    if let Some(z) = p.z {
        coords.push(number_value(z));
    }
    Value::Array(coords)
}

fn positions_value(coords: &[Position]) -> Value {
    Value::Array(coords.iter().map(position_value).collect())
}

fn rings_value(rings: &[Vec<Position>]) -> Value {
    Value::Array(rings.iter().map(|ring| positions_value(ring)).collect())
}

// ============ JSON → AST ============

pub fn from_json(value: &Value) -> Result<Expr, Error> {
    from_json_with_limit(value, crate::DEFAULT_DEPTH_LIMIT)
}

pub fn from_json_with_limit(value: &Value, limit: usize) -> Result<Expr, Error> {
    Decoder { limit }.expr(value, "", 0)
}

struct Decoder {
    limit: usize,
}

impl Decoder {
    fn expr(&self, value: &Value, ptr: &str, depth: usize) -> Result<Expr, Error> {
        if depth > self.limit {
            return Err(Error::DepthExceeded(self.limit));
        }
        let map = match value {
            Value::Bool(b) => return Ok(Expr::Literal(*b)),
            Value::Object(map) => map,
            _ => return Err(structural(ptr, "expected a boolean expression")),
        };

        if map.contains_key("function") {
            return Ok(Expr::Function(self.function(value, ptr, depth)?));
        }

        let Some(op) = map.get("op").and_then(Value::as_str) else {
            return Err(structural(ptr, "expected an object with a string `op`"));
        };
        let args = map.get("args");

        if let Some(cmp) = ComparisonOp::from_op(op) {
            let mut operands = self.scalar_args(op, args, ptr, depth, 2)?;
            let right = operands.pop().map(Box::new);
            let left = operands.pop().map(Box::new);
            return match (left, right) {
                (Some(left), Some(right)) => Ok(Expr::Comparison { op: cmp, left, right }),
                _ => Err(structural(ptr, "comparison needs 2 args")),
            };
        }
        if let Some(spatial) = SpatialOp::from_op(op) {
            let (left, right) = self.scalar_pair(op, args, ptr, depth)?;
            return Ok(Expr::Spatial {
                op: spatial,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        if let Some(temporal) = TemporalOp::from_op(op) {
            let (left, right) = self.scalar_pair(op, args, ptr, depth)?;
            return Ok(Expr::Temporal {
                op: temporal,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        if let Some(array) = ArrayOp::from_op(op) {
            let (left, right) = self.scalar_pair(op, args, ptr, depth)?;
            return Ok(Expr::Array {
                op: array,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        match op {
            "and" | "or" => {
                let items = self.expr_args(args, ptr, depth)?;
                let junction = if op == "and" {
                    Expr::and(items)
                } else {
                    Expr::or(items)
                };
                junction.map_err(|e| relocate(e, ptr))
            }
            "not" => {
                let mut items = self.expr_args(args, ptr, depth)?;
                if items.len() != 1 {
                    return Err(structural(ptr, "`not` expects exactly 1 arg"));
                }
                Ok(Expr::Not(Box::new(items.swap_remove(0))))
            }
            "like" => {
                let (value, pattern) = self.scalar_pair(op, args, ptr, depth)?;
                Ok(Expr::Like {
                    value: Box::new(value),
                    pattern: Box::new(pattern),
                })
            }
            "between" => {
                let mut operands = self.scalar_args(op, args, ptr, depth, 3)?;
                let high = operands.pop().map(Box::new);
                let low = operands.pop().map(Box::new);
                let value = operands.pop().map(Box::new);
                match (value, low, high) {
                    (Some(value), Some(low), Some(high)) => {
                        Ok(Expr::Between { value, low, high })
                    }
                    _ => Err(structural(ptr, "`between` expects exactly 3 args")),
                }
            }
            "in" => {
                let Some(Value::Array(items)) = args else {
                    return Err(structural(ptr, "`in` expects an args array"));
                };
                if items.len() != 2 {
                    return Err(structural(ptr, "`in` expects exactly 2 args"));
                }
                let value = self.scalar(&items[0], &format!("{ptr}/args/0"), depth + 1)?;
                let Value::Array(list_items) = &items[1] else {
                    return Err(structural(
                        &format!("{ptr}/args/1"),
                        "`in` expects its second arg to be an array",
                    ));
                };
                let list = list_items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.scalar(item, &format!("{ptr}/args/1/{i}"), depth + 1)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::In {
                    value: Box::new(value),
                    list,
                })
            }
            "isNull" => {
                // Some encoders emit the operand bare instead of wrapped in a
                // one-element array; both shapes are accepted.
                let operand = match args {
                    Some(Value::Array(items)) if items.len() == 1 => {
                        self.scalar(&items[0], &format!("{ptr}/args/0"), depth + 1)?
                    }
                    Some(Value::Array(_)) => {
                        return Err(structural(ptr, "`isNull` expects exactly 1 arg"));
                    }
                    Some(other) => self.scalar(other, &format!("{ptr}/args"), depth + 1)?,
                    None => return Err(structural(ptr, "`isNull` expects an args value")),
                };
                Ok(Expr::IsNull(Box::new(operand)))
            }
            "casei" | "accenti" => Err(structural(
                ptr,
                format!("`{op}` is not a boolean predicate"),
            )),
            _ if ArithOp::from_op(op).is_some() => Err(structural(
                ptr,
                format!("`{op}` is not a boolean predicate"),
            )),
            _ => Err(Error::UnknownOperator {
                op: op.to_string(),
                pointer: display_ptr(ptr).to_string(),
            }),
        }
    }

    fn scalar(&self, value: &Value, ptr: &str, depth: usize) -> Result<Scalar, Error> {
        if depth > self.limit {
            return Err(Error::DepthExceeded(self.limit));
        }
        let map = match value {
            Value::Number(n) => {
                return n
                    .as_f64()
                    .map(Scalar::Number)
                    .ok_or_else(|| Error::Encoding(format!("number {n} is not an f64")));
            }
            Value::String(s) => return Ok(Scalar::String(s.clone())),
            Value::Bool(b) => return Ok(Scalar::Bool(*b)),
            Value::Array(items) => {
                let elements = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.scalar(item, &format!("{ptr}/{i}"), depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Scalar::Array(elements));
            }
            Value::Null => return Err(structural(ptr, "null is not a CQL2 scalar")),
            Value::Object(map) => map,
        };

        if let Some(property) = map.get("property") {
            let Some(name) = property.as_str() else {
                return Err(structural(
                    &format!("{ptr}/property"),
                    "expected a string property name",
                ));
            };
            return Ok(Scalar::Property(name.to_string()));
        }
        if map.contains_key("function") {
            return Ok(Scalar::Function(self.function(value, ptr, depth)?));
        }
        if let Some(ts) = map.get("timestamp") {
            let Some(text) = ts.as_str() else {
                return Err(structural(&format!("{ptr}/timestamp"), "expected a string"));
            };
            return Ok(Scalar::Timestamp(parse_timestamp(text)?));
        }
        if let Some(date) = map.get("date") {
            let Some(text) = date.as_str() else {
                return Err(structural(&format!("{ptr}/date"), "expected a string"));
            };
            return Ok(Scalar::Date(parse_date(text)?));
        }
        if let Some(interval) = map.get("interval") {
            let iptr = format!("{ptr}/interval");
            let Value::Array(bounds) = interval else {
                return Err(structural(&iptr, "expected an array of 2 bounds"));
            };
            if bounds.len() != 2 {
                return Err(structural(&iptr, "expected an array of 2 bounds"));
            }
            let start = self.bound(&bounds[0], &format!("{iptr}/0"), depth + 1)?;
            let end = self.bound(&bounds[1], &format!("{iptr}/1"), depth + 1)?;
            return Ok(Scalar::Interval(start, end));
        }
        if let Some(bbox) = map.get("bbox") {
            let bptr = format!("{ptr}/bbox");
            let numbers = self.number_array(bbox, &bptr)?;
            return Scalar::bbox(numbers).map_err(|e| relocate(e, &bptr));
        }
        if map.contains_key("type") {
            return Ok(Scalar::Geometry(self.geometry(value, ptr, depth)?));
        }
        if let Some(op) = map.get("op").and_then(Value::as_str) {
            let args = map.get("args");
            if let Some(arith) = ArithOp::from_op(op) {
                let (left, right) = self.scalar_pair(op, args, ptr, depth)?;
                return Ok(Scalar::Arith {
                    op: arith,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            if op == "casei" || op == "accenti" {
                let mut operands = self.scalar_args(op, args, ptr, depth, 1)?;
                let Some(inner) = operands.pop() else {
                    return Err(structural(ptr, format!("`{op}` expects exactly 1 arg")));
                };
                let inner = Box::new(inner);
                return Ok(if op == "casei" {
                    Scalar::CaseI(inner)
                } else {
                    Scalar::AccentI(inner)
                });
            }
            if is_boolean_op(op) {
                // A nested predicate used as a value: hand the whole node to
                // the boolean decoder.
                return Ok(Scalar::Predicate(Box::new(self.expr(value, ptr, depth)?)));
            }
            return Err(Error::UnknownOperator {
                op: op.to_string(),
                pointer: display_ptr(ptr).to_string(),
            });
        }
        Err(structural(ptr, "unrecognized scalar shape"))
    }

    fn function(&self, value: &Value, ptr: &str, depth: usize) -> Result<Function, Error> {
        let fptr = format!("{ptr}/function");
        let Some(obj) = value.get("function").and_then(Value::as_object) else {
            return Err(structural(&fptr, "expected a function object"));
        };
        let Some(name) = obj.get("name").and_then(Value::as_str) else {
            return Err(structural(&fptr, "function needs a string `name`"));
        };
        let args = match obj.get("args") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.scalar(item, &format!("{fptr}/args/{i}"), depth + 1))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(structural(&format!("{fptr}/args"), "expected an array"));
            }
        };
        Ok(Function {
            name: name.to_string(),
            args,
        })
    }

    fn bound(&self, value: &Value, ptr: &str, depth: usize) -> Result<IntervalBound, Error> {
        match value {
            Value::String(s) if s == ".." => Ok(IntervalBound::Open),
            Value::String(s) => {
                if let Ok(ts) = parse_timestamp(s) {
                    Ok(IntervalBound::Timestamp(ts))
                } else if let Ok(date) = parse_date(s) {
                    Ok(IntervalBound::Date(date))
                } else {
                    Err(Error::Encoding(format!(
                        "invalid interval bound {s:?} (at {})",
                        display_ptr(ptr)
                    )))
                }
            }
            Value::Object(map) if map.contains_key("property") => {
                let Some(name) = map.get("property").and_then(Value::as_str) else {
                    return Err(structural(ptr, "expected a string property name"));
                };
                Ok(IntervalBound::Property(name.to_string()))
            }
            Value::Object(map) if map.contains_key("function") => {
                Ok(IntervalBound::Function(self.function(value, ptr, depth)?))
            }
            _ => Err(structural(ptr, "expected an interval bound")),
        }
    }

    fn geometry(&self, value: &Value, ptr: &str, depth: usize) -> Result<Geometry, Error> {
        if depth > self.limit {
            return Err(Error::DepthExceeded(self.limit));
        }
        let Some(typ) = value.get("type").and_then(Value::as_str) else {
            return Err(structural(ptr, "geometry needs a string `type`"));
        };
        let cptr = format!("{ptr}/coordinates");
        match typ {
            "Point" => {
                let coords = require(value.get("coordinates"), &cptr)?;
                Ok(Geometry::Point(self.position(coords, &cptr)?))
            }
            "LineString" => {
                let coords = require(value.get("coordinates"), &cptr)?;
                Geometry::line_string(self.positions(coords, &cptr)?)
                    .map_err(|e| relocate(e, &cptr))
            }
            "Polygon" => {
                let coords = require(value.get("coordinates"), &cptr)?;
                Geometry::polygon(self.rings(coords, &cptr)?).map_err(|e| relocate(e, &cptr))
            }
            "MultiPoint" => {
                let coords = require(value.get("coordinates"), &cptr)?;
                Ok(Geometry::MultiPoint(self.positions(coords, &cptr)?))
            }
            "MultiLineString" => {
                let coords = require(value.get("coordinates"), &cptr)?;
                Geometry::multi_line_string(self.rings(coords, &cptr)?)
                    .map_err(|e| relocate(e, &cptr))
            }
            "MultiPolygon" => {
                let coords = require(value.get("coordinates"), &cptr)?;
                let Value::Array(items) = coords else {
                    return Err(structural(&cptr, "expected an array of polygons"));
                };
                let polygons = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.rings(item, &format!("{cptr}/{i}")))
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::multi_polygon(polygons).map_err(|e| relocate(e, &cptr))
            }
            "GeometryCollection" => {
                let gptr = format!("{ptr}/geometries");
                let Some(Value::Array(items)) = value.get("geometries") else {
                    return Err(structural(&gptr, "expected an array of geometries"));
                };
                let members = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.geometry(item, &format!("{gptr}/{i}"), depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::collection(members).map_err(|e| relocate(e, &gptr))
            }
            other => Err(structural(ptr, format!("unknown geometry type `{other}`"))),
        }
    }

    fn position(&self, value: &Value, ptr: &str) -> Result<Position, Error> {
        let numbers = self.number_array(value, ptr)?;
        match numbers.as_slice() {
            [x, y] => Ok(Position::xy(*x, *y)),
            [x, y, z] => Ok(Position::xyz(*x, *y, *z)),
            _ => Err(structural(ptr, "expected 2 or 3 coordinates")),
        }
    }

    fn positions(&self, value: &Value, ptr: &str) -> Result<Vec<Position>, Error> {
        let Value::Array(items) = value else {
            return Err(structural(ptr, "expected an array of positions"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.position(item, &format!("{ptr}/{i}")))
            .collect()
    }

    fn rings(&self, value: &Value, ptr: &str) -> Result<Vec<Vec<Position>>, Error> {
        let Value::Array(items) = value else {
            return Err(structural(ptr, "expected an array of rings"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.positions(item, &format!("{ptr}/{i}")))
            .collect()
    }

    fn number_array(&self, value: &Value, ptr: &str) -> Result<Vec<f64>, Error> {
        let Value::Array(items) = value else {
            return Err(structural(ptr, "expected an array of numbers"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_f64()
                    .ok_or_else(|| structural(&format!("{ptr}/{i}"), "expected a number"))
            })
            .collect()
    }

    fn expr_args(
        &self,
        args: Option<&Value>,
        ptr: &str,
        depth: usize,
    ) -> Result<Vec<Expr>, Error> {
        let Some(Value::Array(items)) = args else {
            return Err(structural(ptr, "expected an args array"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.expr(item, &format!("{ptr}/args/{i}"), depth + 1))
            .collect()
    }

    fn scalar_args(
        &self,
        op: &str,
        args: Option<&Value>,
        ptr: &str,
        depth: usize,
        expected: usize,
    ) -> Result<Vec<Scalar>, Error> {
        let Some(Value::Array(items)) = args else {
            return Err(structural(ptr, format!("`{op}` expects an args array")));
        };
        if items.len() != expected {
            return Err(structural(
                ptr,
                format!("`{op}` expects exactly {expected} args, got {}", items.len()),
            ));
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.scalar(item, &format!("{ptr}/args/{i}"), depth + 1))
            .collect()
    }

    fn scalar_pair(
        &self,
        op: &str,
        args: Option<&Value>,
        ptr: &str,
        depth: usize,
    ) -> Result<(Scalar, Scalar), Error> {
        let mut operands = self.scalar_args(op, args, ptr, depth, 2)?;
        let right = operands.pop();
        let left = operands.pop();
        match (left, right) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(structural(ptr, format!("`{op}` expects exactly 2 args"))),
        }
    }
}

fn is_boolean_op(op: &str) -> bool {
    matches!(op, "and" | "or" | "not" | "like" | "between" | "in" | "isNull")
        || ComparisonOp::from_op(op).is_some()
        || SpatialOp::from_op(op).is_some()
        || TemporalOp::from_op(op).is_some()
        || ArrayOp::from_op(op).is_some()
}

fn require<'a>(value: Option<&'a Value>, ptr: &str) -> Result<&'a Value, Error> {
    value.ok_or_else(|| structural(ptr, "missing required field"))
}

fn structural(ptr: &str, message: impl Into<String>) -> Error {
    Error::Structural(format!("{} (at {})", message.into(), display_ptr(ptr)))
}

fn relocate(err: Error, ptr: &str) -> Error {
    match err {
        Error::Structural(message) => {
            Error::Structural(format!("{message} (at {})", display_ptr(ptr)))
        }
        other => other,
    }
}

fn display_ptr(ptr: &str) -> &str {
    if ptr.is_empty() { "/" } else { ptr }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use serde_json::json;

    #[test]
    fn comparison_mapping() {
        let parsed = parse("prop1 = 5").unwrap();
        assert_eq!(
            to_json(&parsed),
            json!({"op": "=", "args": [{"property": "prop1"}, 5.0]})
        );
        assert_eq!(from_json(&to_json(&parsed)).unwrap(), parsed);
    }

    #[test]
    fn not_between_mapping() {
        let parsed = parse("foo NOT BETWEEN 1 AND 10").unwrap();
        assert_eq!(
            to_json(&parsed),
            json!({"op": "not", "args": [
                {"op": "between", "args": [{"property": "foo"}, 1.0, 10.0]}
            ]})
        );
    }

    #[test]
    fn in_list_keeps_nested_array() {
        let parsed = parse("x IN (1, 2)").unwrap();
        assert_eq!(
            to_json(&parsed),
            json!({"op": "in", "args": [{"property": "x"}, [1.0, 2.0]]})
        );
        assert_eq!(from_json(&to_json(&parsed)).unwrap(), parsed);
    }

    #[test]
    fn is_null_accepts_bare_operand() {
        let canonical = json!({"op": "isNull", "args": [{"property": "x"}]});
        let bare = json!({"op": "isNull", "args": {"property": "x"}});
        assert_eq!(from_json(&canonical).unwrap(), from_json(&bare).unwrap());
    }

    #[test]
    fn unknown_operator_carries_pointer() {
        let value = json!({"op": "and", "args": [
            {"op": "frobnicate", "args": [true, true]},
            true
        ]});
        match from_json(&value).unwrap_err() {
            Error::UnknownOperator { op, pointer } => {
                assert_eq!(op, "frobnicate");
                assert_eq!(pointer, "/args/0");
            }
            other => panic!("expected UnknownOperator, got {other:?}"),
        }
    }

    #[test]
    fn arity_violations_are_structural() {
        let value = json!({"op": "and", "args": [true]});
        assert!(matches!(from_json(&value), Err(Error::Structural(_))));

        let value = json!({"op": "between", "args": [{"property": "x"}, 1.0]});
        assert!(matches!(from_json(&value), Err(Error::Structural(_))));
    }

    #[test]
    fn linestring_needs_two_positions() {
        let value = json!({"op": "s_intersects", "args": [
            {"property": "geom"},
            {"type": "LineString", "coordinates": [[0.0, 0.0]]}
        ]});
        match from_json(&value).unwrap_err() {
            Error::Structural(message) => {
                assert!(message.contains("/args/1/coordinates"), "{message}");
            }
            other => panic!("expected Structural, got {other:?}"),
        }
    }

    #[test]
    fn nested_collection_rejected() {
        let value = json!({"op": "s_within", "args": [
            {"property": "geom"},
            {"type": "GeometryCollection", "geometries": [
                {"type": "GeometryCollection", "geometries": [
                    {"type": "Point", "coordinates": [0.0, 0.0]}
                ]}
            ]}
        ]});
        assert!(matches!(from_json(&value), Err(Error::Structural(_))));
    }

    #[test]
    fn json_depth_limit() {
        let mut value = json!({"op": "=", "args": [{"property": "x"}, 1.0]});
        for _ in 0..300 {
            value = json!({"op": "not", "args": [value]});
        }
        assert!(matches!(from_json(&value), Err(Error::DepthExceeded(_))));
    }

    #[test]
    fn geometry_round_trip() {
        let parsed = parse(
            "S_WITHIN(geom, GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1)))",
        )
        .unwrap();
        assert_eq!(from_json(&to_json(&parsed)).unwrap(), parsed);
    }
}
