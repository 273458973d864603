//! Shared data structures for the catalog
//!
//! These structs represent the data model that flows between
//! the persistence layer and the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique item identifier (milliseconds since the Unix epoch at creation time)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Generate a time-based id that is strictly greater than `after`.
    ///
    /// Two items created within the same millisecond still get distinct ids.
    /// Returns `None` once `after` is already `i64::MAX`.
    pub fn generate(after: Option<ItemId>) -> Option<Self> {
        let now = chrono::Utc::now().timestamp_millis();
        match after {
            Some(ItemId(last)) if now <= last => last.checked_add(1).map(ItemId),
            _ => Some(ItemId(now)),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of item categories
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Shirt,
    Pant,
    Shoes,
    #[serde(rename = "Sports gear")]
    SportsGear,
    Other,
}

impl ItemType {
    /// All types, in selector order
    pub const ALL: [ItemType; 5] = [
        ItemType::Shirt,
        ItemType::Pant,
        ItemType::Shoes,
        ItemType::SportsGear,
        ItemType::Other,
    ];

    /// Human readable label (also the persisted form)
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Shirt => "Shirt",
            ItemType::Pant => "Pant",
            ItemType::Shoes => "Shoes",
            ItemType::SportsGear => "Sports gear",
            ItemType::Other => "Other",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single catalog entry
///
/// Items are immutable once created: the catalog has no edit or delete.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique id assigned by the library
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Category
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Free-form description
    pub description: String,
    /// Cover image URL, always image 0
    pub cover_image: String,
    /// Extra image URLs in display order (may be empty)
    #[serde(default)]
    pub additional_images: Vec<String>,
}

impl Item {
    /// Ordered image list: the cover image followed by the additional images.
    ///
    /// Both the gallery thumbnail strip and the lightbox go through this.
    pub fn images(&self) -> Vec<&str> {
        std::iter::once(self.cover_image.as_str())
            .chain(self.additional_images.iter().map(String::as_str))
            .collect()
    }

    /// Number of images, always at least 1
    pub fn image_count(&self) -> usize {
        1 + self.additional_images.len()
    }
}
