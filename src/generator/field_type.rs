use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in field type tags understood by the default registry.
///
/// Tags are stored as plain strings on each field, so a stored tag that does
/// not parse into a `FieldKind` is still valid; it simply falls back to the
/// generic word generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Name,
    Email,
    Phone,
    Number,
    Boolean,
    Date,
    Country,
    Word,
    Uuid,
}

impl FieldKind {
    pub const ALL: [FieldKind; 9] = [
        FieldKind::Name,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Number,
        FieldKind::Boolean,
        FieldKind::Date,
        FieldKind::Country,
        FieldKind::Word,
        FieldKind::Uuid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Country => "country",
            FieldKind::Word => "word",
            FieldKind::Uuid => "uuid",
        }
    }

    /// Parse a stored tag. Matching is exact, the same as the stored value.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared column of a resource: the key used in generated records and
/// the type tag that picks its generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    pub fn kind(&self) -> Option<FieldKind> {
        FieldKind::from_tag(&self.field_type)
    }
}
