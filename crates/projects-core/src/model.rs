use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ProjectId
// ---------------------------------------------------------------------------

const MAX_ID_LENGTH: usize = 128;

/// A validated project identifier: non-empty, at most 128 characters, no
/// whitespace or control characters.
///
/// Generated ids are 24 lowercase hex characters, but lookups accept any
/// string that passes validation so records written by earlier deployments
/// stay reachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new `ProjectId` after validation.
    pub fn new(s: impl Into<String>) -> Result<Self, ProjectIdError> {
        let s = s.into();

        if s.is_empty() {
            return Err(ProjectIdError::Empty);
        }

        if s.len() > MAX_ID_LENGTH {
            return Err(ProjectIdError::TooLong(s.len()));
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ProjectIdError::InvalidCharacters);
        }

        Ok(Self(s))
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ProjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when validating a project id.
#[derive(Debug, Clone, Error)]
pub enum ProjectIdError {
    #[error("project id must not be empty")]
    Empty,

    #[error("project id length {0} exceeds maximum of {MAX_ID_LENGTH}")]
    TooLong(usize),

    #[error("project id must not contain whitespace or control characters")]
    InvalidCharacters,
}

// ---------------------------------------------------------------------------
// FieldPath
// ---------------------------------------------------------------------------

const MAX_FIELD_LENGTH: usize = 255;

/// A validated update target: a single top-level attribute name, ASCII
/// alphanumeric or underscore, 1-255 characters.
///
/// The name is applied through an expression attribute name placeholder, so
/// DynamoDB reserved words are fine. Nested document paths are rejected, as
/// are the system-assigned `id` and `createdAt` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Create a new `FieldPath` after validation.
    pub fn new(s: impl Into<String>) -> Result<Self, FieldPathError> {
        let s = s.into();

        if s.is_empty() {
            return Err(FieldPathError::Empty);
        }

        if s.len() > MAX_FIELD_LENGTH {
            return Err(FieldPathError::TooLong(s.len()));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FieldPathError::InvalidCharacters);
        }

        if s == "id" || s == "createdAt" {
            return Err(FieldPathError::Immutable(s));
        }

        Ok(Self(s))
    }
}

impl TryFrom<String> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldPath> for String {
    fn from(field: FieldPath) -> Self {
        field.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when validating an update field name.
#[derive(Debug, Clone, Error)]
pub enum FieldPathError {
    #[error("update key must not be empty")]
    Empty,

    #[error("update key length {0} exceeds maximum of {MAX_FIELD_LENGTH}")]
    TooLong(usize),

    #[error("update key must contain only ASCII letters, digits, and underscores")]
    InvalidCharacters,

    #[error("attribute `{0}` is immutable")]
    Immutable(String),
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A project record stored in DynamoDB.
///
/// The stored item is a flat attribute map: the system-assigned `id` and
/// `createdAt` attributes plus whatever fields the caller supplied at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (validated as a ProjectId at API boundaries).
    pub id: String,

    /// Unix epoch milliseconds of creation, immutable thereafter.
    #[serde(rename = "createdAt")]
    pub created_at: i64,

    /// Caller-defined attributes, flattened into the top-level item.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Project {
    /// Assemble a record from caller-supplied fields.
    ///
    /// Any `id` or `createdAt` key in `fields` is discarded: the
    /// system-assigned values always win.
    pub fn new(id: impl Into<String>, created_at: i64, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        fields.remove("createdAt");

        Self {
            id: id.into(),
            created_at,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- ProjectId tests --

    #[test]
    fn valid_project_ids() {
        assert!(ProjectId::new("a1b2c3d4e5f6a7b8c9d0e1f2").is_ok());
        assert!(ProjectId::new("x").is_ok());
        assert!(ProjectId::new("legacy-id-with-dashes").is_ok());
        assert!(ProjectId::new("a".repeat(128)).is_ok());
    }

    #[test]
    fn rejects_empty_id() {
        assert!(matches!(ProjectId::new(""), Err(ProjectIdError::Empty)));
    }

    #[test]
    fn rejects_too_long_id() {
        let long = "a".repeat(129);
        assert!(matches!(ProjectId::new(long), Err(ProjectIdError::TooLong(129))));
    }

    #[test]
    fn rejects_whitespace_in_id() {
        assert!(matches!(
            ProjectId::new("abc def"),
            Err(ProjectIdError::InvalidCharacters)
        ));
        assert!(matches!(
            ProjectId::new("abc\n"),
            Err(ProjectIdError::InvalidCharacters)
        ));
    }

    #[test]
    fn id_display_and_as_ref() {
        let id = ProjectId::new("abc123").unwrap();
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_ref(), "abc123");
    }

    #[test]
    fn id_roundtrip_string_conversion() {
        let id = ProjectId::new("abc123").unwrap();
        let s: String = id.clone().into();
        let back: ProjectId = s.try_into().unwrap();
        assert_eq!(id, back);
    }

    // -- FieldPath tests --

    #[test]
    fn valid_field_paths() {
        assert!(FieldPath::new("name").is_ok());
        assert!(FieldPath::new("owner_email").is_ok());
        assert!(FieldPath::new("_private").is_ok());
        assert!(FieldPath::new("tag2").is_ok());
    }

    #[test]
    fn rejects_empty_field() {
        assert!(matches!(FieldPath::new(""), Err(FieldPathError::Empty)));
    }

    #[test]
    fn rejects_too_long_field() {
        let long = "a".repeat(256);
        assert!(matches!(
            FieldPath::new(long),
            Err(FieldPathError::TooLong(256))
        ));
    }

    #[test]
    fn rejects_nested_paths_and_punctuation() {
        assert!(matches!(
            FieldPath::new("owner.email"),
            Err(FieldPathError::InvalidCharacters)
        ));
        assert!(matches!(
            FieldPath::new("tags[0]"),
            Err(FieldPathError::InvalidCharacters)
        ));
        assert!(matches!(
            FieldPath::new("a b"),
            Err(FieldPathError::InvalidCharacters)
        ));
        assert!(matches!(
            FieldPath::new("a-b"),
            Err(FieldPathError::InvalidCharacters)
        ));
    }

    #[test]
    fn rejects_immutable_attributes() {
        assert!(matches!(FieldPath::new("id"), Err(FieldPathError::Immutable(_))));
        assert!(matches!(
            FieldPath::new("createdAt"),
            Err(FieldPathError::Immutable(_))
        ));
    }

    // -- Project tests --

    fn caller_fields() -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), json!("Alpha"));
        fields.insert("stars".into(), json!(3));
        fields
    }

    #[test]
    fn new_keeps_caller_fields() {
        let project = Project::new("abc", 1700000000000, caller_fields());
        assert_eq!(project.id, "abc");
        assert_eq!(project.created_at, 1700000000000);
        assert_eq!(project.fields.get("name"), Some(&json!("Alpha")));
        assert_eq!(project.fields.get("stars"), Some(&json!(3)));
    }

    #[test]
    fn system_fields_take_precedence() {
        let mut fields = caller_fields();
        fields.insert("id".into(), json!("spoofed"));
        fields.insert("createdAt".into(), json!(0));

        let project = Project::new("abc", 1700000000000, fields);
        assert_eq!(project.id, "abc");
        assert_eq!(project.created_at, 1700000000000);
        assert!(!project.fields.contains_key("id"));
        assert!(!project.fields.contains_key("createdAt"));
    }

    #[test]
    fn serializes_flat_with_created_at_name() {
        let project = Project::new("abc", 42, caller_fields());
        let value = serde_json::to_value(&project).unwrap();

        assert_eq!(value["id"], json!("abc"));
        assert_eq!(value["createdAt"], json!(42));
        assert_eq!(value["name"], json!("Alpha"));
        assert_eq!(value["stars"], json!(3));
    }

    #[test]
    fn deserializes_extra_fields_into_map() {
        let project: Project = serde_json::from_value(json!({
            "id": "abc",
            "createdAt": 42,
            "name": "Alpha",
            "tags": ["rust", "aws"],
        }))
        .unwrap();

        assert_eq!(project.id, "abc");
        assert_eq!(project.created_at, 42);
        assert_eq!(project.fields.get("tags"), Some(&json!(["rust", "aws"])));
    }
}
