//! Contract validation
//!
//! Walks a contract and a JSON value in lock-step and collects every
//! violation; validation never stops at the first problem. On success the
//! value comes back coerced to the contract (identifiers canonicalized to
//! strings), with any extra fields left in place.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::contract::{Contract, Field, Shape, StringRule};

/// One violated field path and the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON path, e.g. `$.data.isbn` or `$.data[2].id`
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Non-empty, ordered list of violations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Returns `None` for an empty list
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self(violations))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.path.as_str()).collect()
    }

    pub fn at(&self, path: &str) -> Option<&Violation> {
        self.0.iter().find(|v| v.path == path)
    }

    /// Multi-line report: a header, then one `path: reason` per line
    pub fn report(&self, context: Option<&str>) -> String {
        let mut output = match context {
            Some(label) => format!("{}: {} contract violation(s)", label, self.0.len()),
            None => format!("{} contract violation(s)", self.0.len()),
        };
        for violation in &self.0 {
            output.push_str(&format!("\n  - {}", violation));
        }
        output
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self(vec![violation])
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report(None))
    }
}

/// Violations together with the label of the call that produced the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFailure {
    pub context: Option<String>,
    pub violations: Violations,
}

impl ContractFailure {
    pub fn new(context: Option<&str>, violations: Violations) -> Self {
        Self {
            context: context.map(str::to_string),
            violations,
        }
    }
}

impl fmt::Display for ContractFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.violations.report(self.context.as_deref()))
    }
}

/// Either the coerced value or every violation found
pub type ValidationResult = Result<Value, Violations>;

/// Validate `value` against `contract`
///
/// # Example
///
/// ```rust
/// use book_library_suite::contract::{registry, names};
/// use book_library_suite::validator::validate;
/// use serde_json::json;
///
/// let book = registry().expect(names::BOOK).unwrap();
/// let coerced = validate(book, &json!({
///     "id": 7,
///     "title": "Dune",
///     "author": "Frank Herbert",
///     "isbn": "978-0441172719",
///     "publishedYear": 1965,
///     "available": true
/// })).unwrap();
/// assert_eq!(coerced["id"], json!("7"));
///
/// let violations = validate(book, &json!({ "id": 7 })).unwrap_err();
/// assert_eq!(violations.len(), 4);
/// ```
pub fn validate(contract: &Contract, value: &Value) -> ValidationResult {
    let mut violations = Vec::new();
    let coerced = walk(contract.shape(), value, "$", &mut violations);
    match Violations::new(violations) {
        None => Ok(coerced),
        Some(violations) => Err(violations),
    }
}

/// Validate and then read the coerced value as `T`
///
/// A value that passes the contract but still cannot be read as `T` yields a
/// single root violation naming the target type.
pub fn validate_as<T: DeserializeOwned>(contract: &Contract, value: &Value) -> Result<T, Violations> {
    let coerced = validate(contract, value)?;
    serde_json::from_value(coerced).map_err(|e| {
        Violations(vec![Violation::new(
            "$",
            format!(
                "cannot be read as {}: {}",
                short_type_name::<T>(),
                e
            ),
        )])
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Name of a JSON value's type as used in violation messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text form of a numeric identifier; integral floats such as `12.0` read as `12`
pub fn canonical_number(n: &Number) -> String {
    if let Some(f) = n.as_f64()
        && n.is_f64()
        && f.fract() == 0.0
        && f.abs() < 9_007_199_254_740_992.0
    {
        return format!("{}", f as i64);
    }
    n.to_string()
}

fn type_mismatch(shape: &Shape, value: &Value) -> String {
    format!("expected {}, got {}", shape.type_name(), json_type_name(value))
}

fn walk(shape: &Shape, value: &Value, path: &str, out: &mut Vec<Violation>) -> Value {
    match shape {
        Shape::Any => value.clone(),
        Shape::Boolean => {
            if !value.is_boolean() {
                out.push(Violation::new(path, type_mismatch(shape, value)));
            }
            value.clone()
        }
        Shape::Number => {
            if !value.is_number() {
                out.push(Violation::new(path, type_mismatch(shape, value)));
            }
            value.clone()
        }
        Shape::Integer { min, max } => {
            match value.as_i64() {
                Some(n) => {
                    if let Some(min) = min
                        && n < *min
                    {
                        out.push(Violation::new(path, format!("must be >= {}", min)));
                    }
                    if let Some(max) = max
                        && n > *max
                    {
                        out.push(Violation::new(path, format!("must be <= {}", max)));
                    }
                }
                None if value.is_u64() => {
                    out.push(Violation::new(path, format!("must be <= {}", max.unwrap_or(i64::MAX))))
                }
                None => out.push(Violation::new(path, type_mismatch(shape, value))),
            }
            value.clone()
        }
        Shape::String(rule) => {
            match value.as_str() {
                Some(text) => check_string(rule, text, path, out),
                None => out.push(Violation::new(path, type_mismatch(shape, value))),
            }
            value.clone()
        }
        Shape::OneOf(allowed) => {
            match value.as_str() {
                Some(text) if allowed.iter().any(|a| a == text) => {}
                Some(_) => out.push(Violation::new(
                    path,
                    format!("must be one of [{}]", allowed.join(", ")),
                )),
                None => out.push(Violation::new(path, type_mismatch(shape, value))),
            }
            value.clone()
        }
        Shape::Identifier => match value {
            Value::Number(n) => Value::String(canonical_number(n)),
            Value::String(s) if !s.is_empty() => value.clone(),
            Value::String(_) => {
                out.push(Violation::new(path, "must not be empty"));
                value.clone()
            }
            other => {
                out.push(Violation::new(path, type_mismatch(shape, other)));
                value.clone()
            }
        },
        Shape::Array(item) => match value.as_array() {
            Some(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, v)| walk(item, v, &format!("{}[{}]", path, idx), out))
                    .collect(),
            ),
            None => {
                out.push(Violation::new(path, type_mismatch(shape, value)));
                value.clone()
            }
        },
        Shape::Object(fields) => match value.as_object() {
            Some(object) => Value::Object(walk_object(fields, object, path, out)),
            None => {
                out.push(Violation::new(path, type_mismatch(shape, value)));
                value.clone()
            }
        },
    }
}

fn walk_object(
    fields: &[Field],
    object: &Map<String, Value>,
    path: &str,
    out: &mut Vec<Violation>,
) -> Map<String, Value> {
    // Start from the full object so extra fields survive coercion
    let mut coerced = object.clone();

    for field in fields {
        let field_path = format!("{}.{}", path, field.name);
        match object.get(&field.name) {
            None => {
                if field.required {
                    out.push(Violation::new(field_path, "required field missing"));
                }
            }
            Some(Value::Null) if field.nullable => {}
            Some(Value::Null) if matches!(field.shape, Shape::Any) => {}
            Some(Value::Null) => {
                out.push(Violation::new(
                    field_path,
                    format!("expected {}, got null", field.shape.type_name()),
                ));
            }
            Some(v) => {
                let value = walk(&field.shape, v, &field_path, out);
                coerced.insert(field.name.clone(), value);
            }
        }
    }

    coerced
}

fn check_string(rule: &StringRule, text: &str, path: &str, out: &mut Vec<Violation>) {
    let len = text.chars().count();
    if let Some(min) = rule.min_len
        && len < min
    {
        if min == 1 {
            out.push(Violation::new(path, "must not be empty"));
        } else {
            out.push(Violation::new(
                path,
                format!("must be at least {} characters", min),
            ));
        }
    }
    if let Some(max) = rule.max_len
        && len > max
    {
        out.push(Violation::new(
            path,
            format!("must be at most {} characters", max),
        ));
    }
    if let Some(ref pattern) = rule.pattern
        && !pattern.is_match(text)
    {
        out.push(Violation::new(
            path,
            format!("does not match pattern {}", pattern.label()),
        ));
    }
}
