//! Schema check for incoming service submissions.
//!
//! The validator never stops at the first problem: every violated field
//! constraint ends up in the returned [`ValidationError`].

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

use crate::models::{Category, ServiceStatus, ServiceSubmission};

pub const PHONE_PATTERN: &str = "^[0-9]+$";

const FIELDS: [&str; 9] = [
    "first_name",
    "last_name",
    "address",
    "phone_number1",
    "phone_number2",
    "category",
    "images",
    "description",
    "status",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    Empty,
    NotString,
    Pattern { pattern: &'static str },
    Category,
    Status,
    NotArray,
    ItemNotString { index: usize },
    Uri { index: usize },
    UnknownField,
    NotObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    fn new(field: &str, kind: ViolationKind) -> Self {
        Violation { field: field.to_string(), kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        match &self.kind {
            ViolationKind::Required => write!(f, "\"{field}\" is required"),
            ViolationKind::Empty => write!(f, "\"{field}\" is not allowed to be empty"),
            ViolationKind::NotString => write!(f, "\"{field}\" must be a string"),
            ViolationKind::Pattern { pattern } => {
                write!(f, "\"{field}\" must match the pattern {pattern}")
            }
            ViolationKind::Category => write!(f, "\"{field}\" must be one of the service categories"),
            ViolationKind::Status => write!(f, "\"{field}\" must be one of [pending, verified, rejected]"),
            ViolationKind::NotArray => write!(f, "\"{field}\" must be an array"),
            ViolationKind::ItemNotString { index } => write!(f, "\"{field}[{index}]\" must be a string"),
            ViolationKind::Uri { index } => write!(f, "\"{field}[{index}]\" must be a valid uri"),
            ViolationKind::UnknownField => write!(f, "\"{field}\" is not allowed"),
            ViolationKind::NotObject => write!(f, "submission must be an object"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

fn required_string(obj: &Map<String, Value>, field: &str, out: &mut Vec<Violation>) -> Option<String> {
    match obj.get(field) {
        None => {
            out.push(Violation::new(field, ViolationKind::Required));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            out.push(Violation::new(field, ViolationKind::Empty));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            out.push(Violation::new(field, ViolationKind::NotString));
            None
        }
    }
}

// Ok(None) covers absent, null and, where allowed, empty.
fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    out: &mut Vec<Violation>,
) -> Result<Option<String>, ()> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => {
            out.push(Violation::new(field, ViolationKind::NotString));
            Err(())
        }
    }
}

fn check_phone(field: &str, value: &str, out: &mut Vec<Violation>) -> bool {
    if phone_regex().is_match(value) {
        true
    } else {
        out.push(Violation::new(field, ViolationKind::Pattern { pattern: PHONE_PATTERN }));
        false
    }
}

fn images(obj: &Map<String, Value>, out: &mut Vec<Violation>) -> Option<Vec<String>> {
    let items = match obj.get("images") {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            out.push(Violation::new("images", ViolationKind::NotArray));
            return None;
        }
    };

    let before = out.len();
    let mut uris = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) if Url::parse(s).is_ok() => uris.push(s.clone()),
            Value::String(_) => out.push(Violation::new("images", ViolationKind::Uri { index })),
            _ => out.push(Violation::new("images", ViolationKind::ItemNotString { index })),
        }
    }

    if out.len() == before { Some(uris) } else { None }
}

fn status_of(value: Option<&Value>, out: &mut Vec<Violation>) -> Option<ServiceStatus> {
    match value {
        None => Some(ServiceStatus::default()),
        Some(Value::String(s)) => match s.parse() {
            Ok(status) => Some(status),
            Err(()) => {
                out.push(Violation::new("status", ViolationKind::Status));
                None
            }
        },
        Some(_) => {
            out.push(Violation::new("status", ViolationKind::Status));
            None
        }
    }
}

/// Checks an untyped record against the service schema.
///
/// Returns the normalized submission (with `status` defaulted to `pending`)
/// or every violation found.
pub fn validate_submission(input: &Value) -> Result<ServiceSubmission, ValidationError> {
    let obj = match input.as_object() {
        Some(obj) => obj,
        None => {
            return Err(ValidationError {
                violations: vec![Violation::new("", ViolationKind::NotObject)],
            })
        }
    };

    let mut out = Vec::new();

    let first_name = required_string(obj, "first_name", &mut out);
    let last_name = optional_string(obj, "last_name", &mut out);
    let address = required_string(obj, "address", &mut out);

    let phone_number1 = required_string(obj, "phone_number1", &mut out)
        .filter(|p| check_phone("phone_number1", p, &mut out));

    let phone_number2 = optional_string(obj, "phone_number2", &mut out).and_then(|p| match p {
        Some(ref s) if !s.is_empty() && !check_phone("phone_number2", s, &mut out) => Err(()),
        other => Ok(other),
    });

    let category = required_string(obj, "category", &mut out).and_then(|c| match c.parse::<Category>() {
        Ok(category) => Some(category),
        Err(()) => {
            out.push(Violation::new("category", ViolationKind::Category));
            None
        }
    });

    let images = images(obj, &mut out);
    let description = optional_string(obj, "description", &mut out);
    let status = status_of(obj.get("status"), &mut out);

    for key in obj.keys() {
        if !FIELDS.contains(&key.as_str()) {
            out.push(Violation::new(key, ViolationKind::UnknownField));
        }
    }

    match (
        first_name,
        last_name,
        address,
        phone_number1,
        phone_number2,
        category,
        images,
        description,
        status,
    ) {
        (
            Some(first_name),
            Ok(last_name),
            Some(address),
            Some(phone_number1),
            Ok(phone_number2),
            Some(category),
            Some(images),
            Ok(description),
            Some(status),
        ) if out.is_empty() => Ok(ServiceSubmission {
            first_name,
            last_name,
            address,
            phone_number1,
            phone_number2,
            category,
            images,
            description,
            status,
        }),
        _ => Err(ValidationError { violations: out }),
    }
}

/// Checks a standalone status value with the same rule the schema uses,
/// except that absence is an error here.
pub fn validate_status(value: Option<&Value>) -> Result<ServiceStatus, ValidationError> {
    let mut out = Vec::new();
    let status = match value {
        None => {
            out.push(Violation::new("status", ViolationKind::Required));
            None
        }
        some => status_of(some, &mut out),
    };

    match status {
        Some(status) if out.is_empty() => Ok(status),
        _ => Err(ValidationError { violations: out }),
    }
}
