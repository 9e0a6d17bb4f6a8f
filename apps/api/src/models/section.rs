use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One stored row of any résumé section.
///
/// Serializes as a flat object: `id`, every section field, then the
/// timestamps. The owner is never exposed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionRecord {
    pub id: i64,
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Option<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SectionRecord {
    /// Returns the field value, treating SQL `NULL` and unknown fields as absent.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// True when the field holds something other than whitespace.
    pub fn is_filled(&self, field: &str) -> bool {
        self.text(field).is_some_and(|v| !v.trim().is_empty())
    }
}
