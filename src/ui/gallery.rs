//! "View Items" page: a wrapping grid of item cards

use iced::widget::{button, column, container, text};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;

use super::image::ImageCache;
use super::{Page, MUTED_COLOR};
use item_catalog::state::data::Item;
use crate::Message;

const CARD_WIDTH: f32 = 240.0;
const PREVIEW_CHARS: usize = 90;

pub fn view<'a>(items: &'a [Item], images: &'a ImageCache) -> Element<'a, Message> {
    if items.is_empty() {
        return empty_state();
    }

    let cards: Vec<Element<Message>> = items.iter().map(|item| card(item, images)).collect();

    column![
        text("View Items").size(30),
        text("Click on any item to view details").color(MUTED_COLOR),
        Wrap::with_elements(cards).spacing(24.0).line_spacing(24.0),
    ]
    .spacing(16)
    .into()
}

fn card<'a>(item: &'a Item, images: &'a ImageCache) -> Element<'a, Message> {
    let content = column![
        super::image::view(
            &item.cover_image,
            images,
            Length::Fixed(CARD_WIDTH),
            Length::Fixed(CARD_WIDTH),
            ContentFit::Cover,
        ),
        column![
            text(item.name.as_str()).size(18),
            container(text(item.item_type.label()).size(12))
                .padding([2, 8])
                .style(container::rounded_box),
            text(preview(&item.description, PREVIEW_CHARS))
                .size(13)
                .color(MUTED_COLOR),
        ]
        .spacing(6)
        .padding(12),
    ]
    .width(Length::Fixed(CARD_WIDTH));

    button(content)
        .padding(0)
        .style(button::secondary)
        .on_press(Message::OpenItem(item.id))
        .into()
}

fn empty_state<'a>() -> Element<'a, Message> {
    container(
        column![
            text("No Items Found").size(26),
            text("You haven't added any items yet. Start by adding your first item!")
                .color(MUTED_COLOR),
            button(text("Add Your First Item"))
                .padding([8, 16])
                .on_press(Message::Navigate(Page::AddItems)),
        ]
        .spacing(16)
        .align_x(iced::Alignment::Center),
    )
    .padding(48)
    .center_x(Length::Fill)
    .into()
}

/// Shorten `text` to at most `max_chars` characters, adding an ellipsis
pub fn preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("  Blue denim  ", 20), "Blue denim");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("Crème brûlée shoes", 5), "Crème…");
        assert_eq!(preview("abcdef", 3), "abc…");
    }

    #[test]
    fn test_preview_exact_length() {
        assert_eq!(preview("abc", 3), "abc");
    }
}
