//! Core data types for imported comments.
//!
//! These mirror the storage schema: a [`Comment`] is addressed by its
//! [`Locator`] (site + page URL) and authored by a [`User`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address of the page a comment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub site_id: String,
    pub url: String,
}

impl Locator {
    #[must_use]
    pub fn new(site_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            url: url.into(),
        }
    }
}

/// Comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub id: String,
}

/// A comment in normalized form, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub locator: Locator,
    pub user: User,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Empty for top-level comments.
    #[serde(default)]
    pub parent_id: String,
    /// Set for comments brought in by an importer rather than written natively.
    #[serde(default)]
    pub imported: bool,
}

impl Comment {
    #[must_use]
    pub fn is_reply(&self) -> bool {
        !self.parent_id.is_empty()
    }
}

/// Per-page summary of stored comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInfo {
    pub url: String,
    pub count: usize,
    pub first_time: DateTime<Utc>,
    pub last_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Comment {
        Comment {
            id: "c-1".to_string(),
            locator: Locator::new("blog", "https://example.com/post"),
            user: User {
                name: "alice".to_string(),
                id: "cusdis_abc".to_string(),
            },
            text: "hello".to_string(),
            timestamp: Utc.with_ymd_and_hms(2022, 5, 21, 10, 15, 30).unwrap(),
            parent_id: String::new(),
            imported: true,
        }
    }

    #[test]
    fn test_is_reply() {
        let mut comment = sample();
        assert!(!comment.is_reply());
        comment.parent_id = "c-0".to_string();
        assert!(comment.is_reply());
    }

    #[test]
    fn test_comment_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["locator"]["site_id"], "blog");
        assert_eq!(json["user"]["id"], "cusdis_abc");
        assert_eq!(json["imported"], true);
        assert_eq!(json["parent_id"], "");
    }
}
