//! Declarative validation rules for incoming JSON payloads.
//!
//! A [`Schema`] is a list of named [`FieldRule`]s. Validating a candidate is a
//! pure function of the schema and the candidate: every declared rule is
//! checked, undeclared keys are rejected, and all violations are collected
//! rather than stopping at the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field; empty for the candidate itself
    pub path: String,
    pub message: String,
    /// Machine-readable violation kind, e.g. `number.min`
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldViolation {
    fn new(path: &str, message: String, kind: &'static str) -> Self {
        Self {
            path: path.to_string(),
            message,
            kind,
        }
    }
}

/// Violations collected from one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// The failure reported when a candidate is not a JSON object at all.
    pub fn not_object() -> Self {
        Self {
            violations: vec![FieldViolation::new(
                "",
                "\"value\" must be of type object".to_string(),
                "object.base",
            )],
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join(". "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Value shape a field must have.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Non-empty string
    String,
    /// Non-empty string that looks like an email address
    Email,
    /// Any JSON number, optionally bounded below
    Number { min: Option<f64> },
    /// Integer JSON number (no decimal point), optionally bounded below
    Integer { min: Option<i64> },
    Boolean,
    /// String drawn from a fixed set of values
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    fn check(&self, value: &Value, violations: &mut Vec<FieldViolation>) {
        let name = self.name;
        match &self.kind {
            FieldKind::String | FieldKind::Email => {
                let Some(text) = value.as_str() else {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" must be a string"),
                        "string.base",
                    ));
                    return;
                };
                if text.is_empty() {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" is not allowed to be empty"),
                        "string.empty",
                    ));
                } else if self.kind == FieldKind::Email && !EMAIL_RE.is_match(text) {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" must be a valid email"),
                        "string.email",
                    ));
                }
            }
            FieldKind::Number { min } => {
                let Some(number) = value.as_f64() else {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" must be a number"),
                        "number.base",
                    ));
                    return;
                };
                if let Some(min) = min {
                    if number < *min {
                        violations.push(FieldViolation::new(
                            name,
                            format!("\"{name}\" must be greater than or equal to {min}"),
                            "number.min",
                        ));
                    }
                }
            }
            FieldKind::Integer { min } => {
                if !value.is_number() {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" must be a number"),
                        "number.base",
                    ));
                    return;
                }
                let Some(number) = value.as_i64() else {
                    // Integral literals past i64 arrive as u64 or f64.
                    let unsafe_integer = value.is_u64()
                        || value
                            .as_f64()
                            .is_some_and(|float| float.fract() == 0.0 && float.abs() >= i64::MAX as f64);
                    violations.push(if unsafe_integer {
                        FieldViolation::new(
                            name,
                            format!("\"{name}\" must be a safe number"),
                            "number.unsafe",
                        )
                    } else {
                        FieldViolation::new(
                            name,
                            format!("\"{name}\" must be an integer"),
                            "number.integer",
                        )
                    });
                    return;
                };
                if let Some(min) = min {
                    if number < *min {
                        violations.push(FieldViolation::new(
                            name,
                            format!("\"{name}\" must be greater than or equal to {min}"),
                            "number.min",
                        ));
                    }
                }
            }
            FieldKind::Boolean => {
                if !value.is_boolean() {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" must be a boolean"),
                        "boolean.base",
                    ));
                }
            }
            FieldKind::OneOf(allowed) => {
                let matches = value
                    .as_str()
                    .is_some_and(|text| allowed.contains(&text));
                if !matches {
                    violations.push(FieldViolation::new(
                        name,
                        format!("\"{name}\" must be one of [{}]", allowed.join(", ")),
                        "any.only",
                    ));
                }
            }
        }
    }
}

/// An object schema: the full set of keys a candidate may carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Validate `candidate` against every rule of the schema.
    pub fn validate(&self, candidate: &Value) -> Result<(), ValidationErrors> {
        let Some(object) = candidate.as_object() else {
            return Err(ValidationErrors::not_object());
        };

        let violations = self.collect_violations(object);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { violations })
        }
    }

    fn collect_violations(&self, object: &Map<String, Value>) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        for rule in &self.fields {
            match object.get(rule.name) {
                None | Some(Value::Null) => {
                    if rule.required {
                        violations.push(FieldViolation::new(
                            rule.name,
                            format!("\"{}\" is required", rule.name),
                            "any.required",
                        ));
                    }
                }
                Some(value) => rule.check(value, &mut violations),
            }
        }

        for key in object.keys() {
            if !self.fields.iter().any(|rule| rule.name == key) {
                violations.push(FieldViolation::new(
                    key,
                    format!("\"{key}\" is not allowed"),
                    "object.unknown",
                ));
            }
        }

        violations
    }
}
