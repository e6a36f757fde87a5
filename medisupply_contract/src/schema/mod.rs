//! Declarative shapes and field rules
//!
//! A [`Shape`] describes what a JSON value must look like. Object shapes are
//! lists of [`FieldSpec`]s, each pairing a field name with the shape of its
//! value. Shapes are plain data: they are built once, composed with
//! [`ObjectShape::omit`] and [`ObjectShape::extend`], and checked by the
//! validator in [`validation`].
//!
//! Entity shapes for the application records live in [`entities`].

pub mod entities;
pub mod validation;

pub use entities::EntityKind;
pub use validation::{is_valid_email, validate_shape};

use serde::Serialize;

/// Rule applied to string values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringRule {
    /// Minimum length in characters
    pub min_len: usize,
    /// Value must look like an email address
    pub email: bool,
}

/// Sign constraint on numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Sign {
    #[default]
    Any,
    NonNegative,
    Positive,
}

/// Rule applied to numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRule {
    pub integer: bool,
    pub sign: Sign,
}

/// Largest integer a JSON number carries exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Shape of a JSON value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    Enum {
        values: &'static [&'static str],
    },
    Literal {
        value: serde_json::Value,
    },
    Array {
        items: Box<Shape>,
        #[serde(rename = "minItems")]
        min_items: usize,
    },
    Nullable {
        inner: Box<Shape>,
    },
    Object(ObjectShape),
}

impl Shape {
    /// Any string
    pub fn string() -> Self {
        Shape::String(StringRule::default())
    }

    /// String with at least one character
    pub fn non_empty_string() -> Self {
        Self::string_min(1)
    }

    pub fn string_min(min_len: usize) -> Self {
        Shape::String(StringRule {
            min_len,
            email: false,
        })
    }

    pub fn email() -> Self {
        Shape::String(StringRule {
            min_len: 0,
            email: true,
        })
    }

    /// Any finite number
    pub fn number() -> Self {
        Shape::Number(NumberRule::default())
    }

    pub fn non_negative() -> Self {
        Shape::Number(NumberRule {
            integer: false,
            sign: Sign::NonNegative,
        })
    }

    pub fn non_negative_integer() -> Self {
        Shape::Number(NumberRule {
            integer: true,
            sign: Sign::NonNegative,
        })
    }

    pub fn positive_integer() -> Self {
        Shape::Number(NumberRule {
            integer: true,
            sign: Sign::Positive,
        })
    }

    pub fn boolean() -> Self {
        Shape::Boolean
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Shape::Enum { values }
    }

    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Shape::Literal {
            value: value.into(),
        }
    }

    pub fn array(items: Shape) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: 0,
        }
    }

    pub fn non_empty_array(items: Shape) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: 1,
        }
    }

    /// Accept `null` in addition to this shape
    pub fn nullable(self) -> Self {
        Shape::Nullable {
            inner: Box::new(self),
        }
    }

    /// Short human-readable name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::String(_) => "a string",
            Shape::Number(_) => "a number",
            Shape::Boolean => "a boolean",
            Shape::Enum { .. } => "a string",
            Shape::Literal { .. } => "a literal",
            Shape::Array { .. } => "an array",
            Shape::Nullable { inner } => inner.type_name(),
            Shape::Object(_) => "an object",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            Shape::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<ObjectShape> for Shape {
    fn from(shape: ObjectShape) -> Self {
        Shape::Object(shape)
    }
}

/// One declared field of an object shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
    pub optional: bool,
}

impl FieldSpec {
    pub fn required(name: &'static str, shape: impl Into<Shape>) -> Self {
        Self {
            name,
            shape: shape.into(),
            optional: false,
        }
    }

    pub fn optional(name: &'static str, shape: impl Into<Shape>) -> Self {
        Self {
            name,
            shape: shape.into(),
            optional: true,
        }
    }
}

/// Named object shape with an ordered field list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectShape {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl ObjectShape {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a field, replacing any existing field with the same name
    pub fn field(mut self, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    /// Copy of this shape without the named fields
    pub fn omit(&self, name: &'static str, fields: &[&str]) -> Self {
        Self {
            name,
            fields: self
                .fields
                .iter()
                .filter(|f| !fields.contains(&f.name))
                .cloned()
                .collect(),
        }
    }

    /// Copy of this shape with extra fields added or replaced
    pub fn extend(&self, name: &'static str, extra: Vec<FieldSpec>) -> Self {
        let mut shape = Self {
            name,
            fields: self.fields.clone(),
        };
        for spec in extra {
            shape = shape.field(spec);
        }
        shape
    }

    /// Copy of this shape with every field made optional
    pub fn partial(&self, name: &'static str) -> Self {
        Self {
            name,
            fields: self
                .fields
                .iter()
                .cloned()
                .map(|mut f| {
                    f.optional = true;
                    f
                })
                .collect(),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn required_field_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| !f.optional)
            .map(|f| f.name)
            .collect()
    }
}
