//! Lightbox carousel state
//!
//! Tracks which item is open in the lightbox and which of its images is
//! showing. Navigation wraps around in both directions.

use super::data::Item;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Carousel {
    selected: Option<Item>,
    current_index: usize,
}

impl Carousel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `item`, starting from its cover image
    pub fn select(&mut self, item: Item) {
        self.selected = Some(item);
        self.current_index = 0;
    }

    /// Advance to the next image, wrapping to the cover after the last one
    pub fn next(&mut self) {
        let count = self.image_count();
        if count > 0 {
            self.current_index = (self.current_index + 1) % count;
        }
    }

    /// Step back one image, wrapping to the last one from the cover
    pub fn previous(&mut self) {
        let count = self.image_count();
        if count > 0 {
            self.current_index = (self.current_index + count - 1) % count;
        }
    }

    /// Show the image at `index`.
    ///
    /// Callers must pass an index below `image_count()`. Out-of-range
    /// indices trip a debug assertion and are otherwise ignored.
    pub fn jump_to(&mut self, index: usize) {
        let count = self.image_count();
        debug_assert!(index < count, "image index {index} out of range ({count} images)");
        if index < count {
            self.current_index = index;
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.current_index = 0;
    }

    pub fn selected(&self) -> Option<&Item> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Images of the selected item (empty when closed)
    pub fn images(&self) -> Vec<&str> {
        self.selected.as_ref().map(Item::images).unwrap_or_default()
    }

    pub fn image_count(&self) -> usize {
        self.selected.as_ref().map_or(0, Item::image_count)
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images().get(self.current_index).copied()
    }

    /// Whether previous/next controls are worth showing
    pub fn has_navigation(&self) -> bool {
        self.image_count() > 1
    }

    /// One-based position, e.g. "2 / 3"
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.image_count())
    }
}
