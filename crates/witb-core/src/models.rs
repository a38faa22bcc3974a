//! Core data types: entity kinds, box and item records, and the inputs used
//! to create, edit, and search them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two alias namespaces. Box aliases and item aliases never collide
/// with each other; uniqueness is enforced per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Box,
    Item,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Box => f.write_str("box"),
            EntityKind::Item => f.write_str("item"),
        }
    }
}

/// A stored box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxRecord {
    pub id: i64,
    pub alias: String,
    pub qr_code: String,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    /// Opaque path to a picture; never opened by this crate.
    pub picture: Option<String>,
    /// Comma-separated user tags.
    pub tags: Option<String>,
    pub description: Option<String>,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

/// A stored item, always inside exactly one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub id: i64,
    pub box_id: i64,
    pub alias: String,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    /// Position inside the box.
    pub location: Option<String>,
    pub picture: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
}

/// Input for creating a box. The alias and QR code are assigned on insert.
#[derive(Debug, Clone, Default)]
pub struct NewBox {
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    pub picture: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
}

/// Input for creating an item inside `box_id`.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub box_id: i64,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    pub picture: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
}

/// Partial update of a box. `None` leaves a field untouched;
/// `picture: Some(None)` removes the picture.
#[derive(Debug, Clone, Default)]
pub struct BoxPatch {
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    pub picture: Option<Option<String>>,
    pub tags: Option<String>,
    pub description: Option<String>,
}

impl BoxPatch {
    pub fn is_empty(&self) -> bool {
        self.height.is_none()
            && self.length.is_none()
            && self.weight.is_none()
            && self.location.is_none()
            && self.picture.is_none()
            && self.tags.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, record: &mut BoxRecord) {
        if let Some(v) = self.height {
            record.height = Some(v);
        }
        if let Some(v) = self.length {
            record.length = Some(v);
        }
        if let Some(v) = self.weight {
            record.weight = Some(v);
        }
        if let Some(ref v) = self.location {
            record.location = Some(v.clone());
        }
        if let Some(ref v) = self.picture {
            record.picture = v.clone();
        }
        if let Some(ref v) = self.tags {
            record.tags = Some(v.clone());
        }
        if let Some(ref v) = self.description {
            record.description = Some(v.clone());
        }
    }
}

/// Partial update of an item. Same conventions as [`BoxPatch`].
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    pub picture: Option<Option<String>>,
    pub tags: Option<String>,
    pub description: Option<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.height.is_none()
            && self.length.is_none()
            && self.weight.is_none()
            && self.location.is_none()
            && self.picture.is_none()
            && self.tags.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, record: &mut ItemRecord) {
        if let Some(v) = self.height {
            record.height = Some(v);
        }
        if let Some(v) = self.length {
            record.length = Some(v);
        }
        if let Some(v) = self.weight {
            record.weight = Some(v);
        }
        if let Some(ref v) = self.location {
            record.location = Some(v.clone());
        }
        if let Some(ref v) = self.picture {
            record.picture = v.clone();
        }
        if let Some(ref v) = self.tags {
            record.tags = Some(v.clone());
        }
        if let Some(ref v) = self.description {
            record.description = Some(v.clone());
        }
    }
}

/// Box search criteria. Every provided criterion must match.
#[derive(Debug, Clone, Default)]
pub struct BoxFilter {
    pub location: Option<String>,
    pub weight: Option<f64>,
    pub alias: Option<String>,
    /// Case-insensitive substring of description or tags.
    pub text: Option<String>,
}

impl BoxFilter {
    pub fn matches(&self, record: &BoxRecord) -> bool {
        if let Some(ref loc) = self.location {
            if record.location.as_deref() != Some(loc.as_str()) {
                return false;
            }
        }
        if let Some(w) = self.weight {
            if record.weight != Some(w) {
                return false;
            }
        }
        if let Some(ref alias) = self.alias {
            if &record.alias != alias {
                return false;
            }
        }
        match self.text {
            Some(ref text) => text_matches(text, &record.description, &record.tags),
            None => true,
        }
    }
}

/// Item search criteria. Every provided criterion must match.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub box_id: Option<i64>,
    pub location: Option<String>,
    pub alias: Option<String>,
    pub text: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, record: &ItemRecord) -> bool {
        if let Some(box_id) = self.box_id {
            if record.box_id != box_id {
                return false;
            }
        }
        if let Some(ref loc) = self.location {
            if record.location.as_deref() != Some(loc.as_str()) {
                return false;
            }
        }
        if let Some(ref alias) = self.alias {
            if &record.alias != alias {
                return false;
            }
        }
        match self.text {
            Some(ref text) => text_matches(text, &record.description, &record.tags),
            None => true,
        }
    }
}

fn text_matches(needle: &str, description: &Option<String>, tags: &Option<String>) -> bool {
    let needle = needle.to_lowercase();
    [description, tags]
        .iter()
        .filter_map(|field| field.as_deref())
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Generate a 10-character box code from `[0-9A-F]`.
pub fn generate_qr_code() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_uppercase()
}
