//! Draft items and form validation
//!
//! A `Draft` is what the "Add Items" form edits. It only becomes an `Item`
//! after `validate` accepts it; validation never rewrites the values.

use std::collections::BTreeMap;

use super::data::{Item, ItemId, ItemType};

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Type,
    Description,
    CoverImage,
}

impl Field {
    /// Message shown when the field is left empty
    pub fn required_message(&self) -> &'static str {
        match self {
            Field::Name => "Item name is required",
            Field::Type => "Item type is required",
            Field::Description => "Item description is required",
            Field::CoverImage => "Cover image URL is required",
        }
    }
}

/// Unvalidated form data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub item_type: Option<ItemType>,
    pub description: String,
    pub cover_image: String,
    pub additional_images: Vec<String>,
}

/// A draft whose required fields are all present
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    name: String,
    item_type: ItemType,
    description: String,
    cover_image: String,
    additional_images: Vec<String>,
}

impl ValidatedDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cover_image(&self) -> &str {
        &self.cover_image
    }

    pub fn additional_images(&self) -> &[String] {
        &self.additional_images
    }

    /// Promote to a catalog item with the given id
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            item_type: self.item_type,
            description: self.description,
            cover_image: self.cover_image,
            additional_images: self.additional_images,
        }
    }
}

/// Per-field validation messages
///
/// Transient UI state: an entry is dropped as soon as its field is edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Forget the error for `field`
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Fields in error, in form order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    fn require(&mut self, field: Field, present: bool) {
        if !present {
            self.errors.insert(field, field.required_message());
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.values().copied().collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Check every required field of `draft`.
///
/// All missing fields are reported at once; on success the values are
/// carried over untouched.
pub fn validate(draft: &Draft) -> Result<ValidatedDraft, FieldErrors> {
    let mut errors = FieldErrors::default();
    errors.require(Field::Name, !draft.name.trim().is_empty());
    errors.require(Field::Type, draft.item_type.is_some());
    errors.require(Field::Description, !draft.description.trim().is_empty());
    errors.require(Field::CoverImage, !draft.cover_image.trim().is_empty());

    match draft.item_type {
        Some(item_type) if errors.is_empty() => Ok(ValidatedDraft {
            name: draft.name.clone(),
            item_type,
            description: draft.description.clone(),
            cover_image: draft.cover_image.clone(),
            additional_images: draft.additional_images.clone(),
        }),
        _ => Err(errors),
    }
}

/// Split multi-line text into image URLs, one per non-blank line
pub fn parse_image_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
