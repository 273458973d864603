//! "Add Items" page
//!
//! Owns the draft being edited and its validation errors. A field's error
//! disappears as soon as that field is edited again.

use iced::widget::{button, column, container, pick_list, text, text_editor, text_input};
use iced::{Element, Length};

use super::{Notice, ERROR_COLOR, MUTED_COLOR};
use item_catalog::state::data::ItemType;
use item_catalog::state::form::{parse_image_lines, validate, Draft, Field, FieldErrors, ValidatedDraft};
use crate::Message;

pub struct ItemForm {
    draft: Draft,
    errors: FieldErrors,
    description: text_editor::Content,
    additional_images: text_editor::Content,
}

impl ItemForm {
    pub fn new() -> Self {
        ItemForm {
            draft: Draft::default(),
            errors: FieldErrors::default(),
            description: text_editor::Content::new(),
            additional_images: text_editor::Content::new(),
        }
    }

    #[cfg(test)]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    #[cfg(test)]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_name(&mut self, name: String) {
        self.draft.name = name;
        self.errors.clear(Field::Name);
    }

    pub fn set_type(&mut self, item_type: ItemType) {
        self.draft.item_type = Some(item_type);
        self.errors.clear(Field::Type);
    }

    pub fn set_cover_image(&mut self, url: String) {
        self.draft.cover_image = url;
        self.errors.clear(Field::CoverImage);
    }

    pub fn edit_description(&mut self, action: text_editor::Action) {
        let is_edit = action.is_edit();
        self.description.perform(action);
        if is_edit {
            let text = self.description.text();
            self.set_description(&text);
        }
    }

    fn set_description(&mut self, text: &str) {
        // The editor always reports a trailing newline
        self.draft.description = text.strip_suffix('\n').unwrap_or(text).to_string();
        self.errors.clear(Field::Description);
    }

    pub fn edit_additional_images(&mut self, action: text_editor::Action) {
        let is_edit = action.is_edit();
        self.additional_images.perform(action);
        if is_edit {
            self.draft.additional_images = parse_image_lines(&self.additional_images.text());
        }
    }

    /// Validate the draft.
    ///
    /// On failure every error is recorded for display and `None` is returned.
    pub fn submit(&mut self) -> Option<ValidatedDraft> {
        match validate(&self.draft) {
            Ok(validated) => {
                self.errors = FieldErrors::default();
                Some(validated)
            }
            Err(errors) => {
                tracing::debug!(%errors, "draft rejected");
                self.errors = errors;
                None
            }
        }
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = ItemForm::new();
    }

    pub fn view<'a>(&'a self, notice: Option<&'a Notice>) -> Element<'a, Message> {
        let name = text_input("Enter item name", &self.draft.name)
            .on_input(Message::NameChanged)
            .padding(10);

        let item_type = pick_list(ItemType::ALL, self.draft.item_type, Message::TypeSelected)
            .placeholder("Select item type")
            .padding(10)
            .width(Length::Fill);

        let description = text_editor(&self.description)
            .placeholder("Enter item description")
            .on_action(Message::DescriptionEdited)
            .padding(10)
            .height(Length::Fixed(110.0));

        let cover_image = text_input("https://example.com/image.jpg", &self.draft.cover_image)
            .on_input(Message::CoverImageChanged)
            .padding(10);

        let additional_images = text_editor(&self.additional_images)
            .placeholder("Enter additional image URLs (one per line)")
            .on_action(Message::AdditionalImagesEdited)
            .padding(10)
            .height(Length::Fixed(90.0));

        let form = column![
            text("Add New Item").size(28),
            labeled("Item Name", name, self.errors.get(Field::Name)),
            labeled("Item Type", item_type, self.errors.get(Field::Type)),
            labeled("Item Description", description, self.errors.get(Field::Description)),
            labeled("Item Cover Image URL", cover_image, self.errors.get(Field::CoverImage)),
            column![
                text("Additional Images (Optional)").size(14),
                additional_images,
                text("Enter one URL per line").size(13).color(MUTED_COLOR),
            ]
            .spacing(6),
            button(text("Add Item"))
                .on_press(Message::Submit)
                .padding(12)
                .width(Length::Fill),
        ]
        .spacing(20);

        let body = column![]
            .push_maybe(notice.map(Notice::view))
            .push(form)
            .spacing(20)
            .max_width(640);

        container(body).center_x(Length::Fill).into()
    }
}

/// A label, an input and its error message, stacked
fn labeled<'a>(
    label: &'a str,
    input: impl Into<Element<'a, Message>>,
    error: Option<&'static str>,
) -> Element<'a, Message> {
    column![text(label).size(14), input.into()]
        .push_maybe(error.map(|message| text(message).size(13).color(ERROR_COLOR)))
        .spacing(6)
        .into()
}
