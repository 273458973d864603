/// State management module
///
/// This module handles all catalog state, including:
/// - Key-value persistence (storage.rs)
/// - The append-only item library (library.rs)
/// - Shared data structures (data.rs)
/// - Drafts and form validation (form.rs)
/// - Lightbox carousel navigation (carousel.rs)

pub mod carousel;
pub mod data;
pub mod form;
pub mod library;
pub mod storage;
