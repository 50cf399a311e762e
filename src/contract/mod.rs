//! Response contracts
//!
//! A contract is an immutable, named description of the JSON shape a response
//! is guaranteed to have: which fields must be present, their types, and any
//! value constraints (patterns, lengths, ranges, enumerations).
//!
//! Contracts describe a lower bound. Fields a server adds beyond the contract
//! are tolerated by the validator.
//!
//! Composition never mutates: `partial`, `envelope_of` and `list_of` each
//! return a new contract.
//!
//! # Example
//!
//! ```rust
//! use book_library_suite::contract::{Contract, Field, Shape};
//!
//! let author = Contract::object(
//!     "author",
//!     vec![
//!         Field::required("name", Shape::non_empty_string()),
//!         Field::optional("born", Shape::integer()).nullable(),
//!     ],
//! );
//!
//! let envelope = author.envelope_of();
//! assert_eq!(envelope.name(), "author.envelope");
//! assert!(envelope.field("data").is_some());
//! ```

use std::fmt;

use regex::Regex;

pub mod registry;

pub use registry::{ContractRegistry, names, registry};

/// Error type for contract registry operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("Contract '{0}' is already defined")]
    DuplicateName(String),
    #[error("Unknown contract: {0}")]
    Unknown(String),
}

/// A compiled regex with the human-readable label used in violation messages
#[derive(Clone)]
pub struct Pattern {
    label: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(label: impl Into<String>, regex: Regex) -> Self {
        Self {
            label: label.into(),
            regex,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("label", &self.label)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// Constraints on a string value
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub pattern: Option<Pattern>,
}

/// Expected shape of a JSON value
#[derive(Debug, Clone)]
pub enum Shape {
    /// Anything, including null
    Any,
    Boolean,
    /// Whole number, optionally bounded (inclusive)
    Integer { min: Option<i64>, max: Option<i64> },
    /// Any JSON number
    Number,
    String(StringRule),
    /// Number or non-empty string, canonicalized to a string
    Identifier,
    /// String restricted to a fixed set of values
    OneOf(Vec<String>),
    Object(Vec<Field>),
    Array(Box<Shape>),
}

impl Shape {
    pub fn string() -> Self {
        Shape::String(StringRule::default())
    }

    pub fn non_empty_string() -> Self {
        Shape::String(StringRule {
            min_len: Some(1),
            ..StringRule::default()
        })
    }

    /// String with length bounds in characters
    pub fn string_len(min_len: Option<usize>, max_len: Option<usize>) -> Self {
        Shape::String(StringRule {
            min_len,
            max_len,
            pattern: None,
        })
    }

    /// String that must fully match `pattern`
    pub fn matching(pattern: Pattern) -> Self {
        Shape::String(StringRule {
            pattern: Some(pattern),
            ..StringRule::default()
        })
    }

    pub fn integer() -> Self {
        Shape::Integer { min: None, max: None }
    }

    pub fn integer_range(min: Option<i64>, max: Option<i64>) -> Self {
        Shape::Integer { min, max }
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Shape::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn array_of(item: Shape) -> Self {
        Shape::Array(Box::new(item))
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Shape::Object(fields)
    }

    /// Type name used in `expected <type>, got <actual>` messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Any => "any",
            Shape::Boolean => "boolean",
            Shape::Integer { .. } => "integer",
            Shape::Number => "number",
            Shape::String(_) | Shape::OneOf(_) => "string",
            Shape::Identifier => "string or number",
            Shape::Object(_) => "object",
            Shape::Array(_) => "array",
        }
    }
}

/// One named field of an object shape
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    pub required: bool,
    pub nullable: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: true,
            nullable: false,
        }
    }

    pub fn optional(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: false,
            nullable: false,
        }
    }

    /// Accept an explicit `null` for this field
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A named, immutable shape description
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    shape: Shape,
}

impl Contract {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, Shape::Object(fields))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Look up a top-level field of an object contract
    pub fn field(&self, name: &str) -> Option<&Field> {
        match &self.shape {
            Shape::Object(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Every top-level field becomes optional; types and constraints stay
    ///
    /// Used for update payloads and partial echoes, where any subset of the
    /// resource's fields may appear.
    pub fn partial(&self) -> Self {
        let shape = match &self.shape {
            Shape::Object(fields) => Shape::Object(
                fields
                    .iter()
                    .cloned()
                    .map(|mut f| {
                        f.required = false;
                        f
                    })
                    .collect(),
            ),
            other => other.clone(),
        };
        Self::new(format!("{}.partial", self.name), shape)
    }

    /// Wrap this contract as the `data` of a `{success, message, data}` envelope
    pub fn envelope_of(&self) -> Self {
        Self::object(
            format!("{}.envelope", self.name),
            vec![
                Field::required("success", Shape::Boolean),
                Field::optional("message", Shape::string()),
                Field::required("data", self.shape.clone()),
            ],
        )
    }

    /// Array whose every element satisfies this contract
    pub fn list_of(&self) -> Self {
        Self::new(format!("{}.list", self.name), Shape::array_of(self.shape.clone()))
    }
}
