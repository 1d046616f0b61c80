//! Permission code grammar
//!
//! Permission records carry a colon-delimited code that flattens the
//! page / section / action hierarchy into a single string:
//!
//! - `page:{id}`
//! - `section:{page_id}:{id}`
//! - `action:{page_id}:{id}`
//!
//! Decoding is total: every input maps to some variant, malformed
//! three-part codes degrade to an `"unknown"` parent instead of failing.
//! The string form exists only at the serialization boundary; in-process
//! code works with the enum.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Parent id assigned to codes whose parent segment cannot be recovered
pub const UNKNOWN_PARENT: &str = "unknown";

/// Legacy codes carried a `view_` prefix on the id segment
const LEGACY_VIEW_PREFIX: &str = "view_";

/// Decoded permission code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionCode {
    /// A navigable page, identified by its page id
    Page { id: String },
    /// A section of a page
    Section { parent_id: String, id: String },
    /// An action available on a page
    Action { parent_id: String, id: String },
    /// Anything that matches no known prefix; kept verbatim
    Unknown { raw: String },
}

impl PermissionCode {
    /// Build a page code
    pub fn page(id: impl Into<String>) -> Self {
        Self::Page { id: id.into() }
    }

    /// Build a section code
    pub fn section(parent_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Section {
            parent_id: parent_id.into(),
            id: id.into(),
        }
    }

    /// Build an action code
    pub fn action(parent_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Action {
            parent_id: parent_id.into(),
            id: id.into(),
        }
    }

    /// Decode a raw code string. Never fails.
    pub fn parse(code: &str) -> Self {
        if let Some(rest) = code.strip_prefix("page:") {
            return Self::Page {
                id: strip_legacy_prefix(rest).to_string(),
            };
        }

        if let Some(rest) = code.strip_prefix("section:") {
            let parts: Vec<&str> = code.split(':').collect();
            if parts.len() == 3 {
                return Self::Section {
                    parent_id: parts[1].to_string(),
                    id: parts[2].to_string(),
                };
            }
            // Two-segment legacy form (or worse): parent linkage is lost
            return Self::Section {
                parent_id: UNKNOWN_PARENT.to_string(),
                id: strip_legacy_prefix(rest).to_string(),
            };
        }

        if code.starts_with("action:") {
            let parts: Vec<&str> = code.split(':').collect();
            if parts.len() == 3 {
                return Self::Action {
                    parent_id: parts[1].to_string(),
                    id: parts[2].to_string(),
                };
            }
            // Degraded action keeps the whole raw code as its id
            return Self::Action {
                parent_id: UNKNOWN_PARENT.to_string(),
                id: code.to_string(),
            };
        }

        Self::Unknown {
            raw: code.to_string(),
        }
    }

    /// The id segment of this code
    pub fn id(&self) -> &str {
        match self {
            Self::Page { id } | Self::Section { id, .. } | Self::Action { id, .. } => id,
            Self::Unknown { raw } => raw,
        }
    }

    /// The parent page id, for section and action codes
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Section { parent_id, .. } | Self::Action { parent_id, .. } => Some(parent_id),
            Self::Page { .. } | Self::Unknown { .. } => None,
        }
    }

    /// Whether this is a page code
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page { .. })
    }
}

fn strip_legacy_prefix(id: &str) -> &str {
    id.strip_prefix(LEGACY_VIEW_PREFIX).unwrap_or(id)
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page { id } => write!(f, "page:{id}"),
            Self::Section { parent_id, id } => write!(f, "section:{parent_id}:{id}"),
            Self::Action { parent_id, id } => write!(f, "action:{parent_id}:{id}"),
            Self::Unknown { raw } => f.write_str(raw),
        }
    }
}

impl FromStr for PermissionCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for PermissionCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PermissionCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
