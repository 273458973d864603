//! Lightbox for a single item
//!
//! Shows the current carousel image with previous/next controls, the item
//! details and a thumbnail strip. Controls only appear for multi-image items.

use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Theme};
use iced_aw::Wrap;

use super::image::ImageCache;
use super::MUTED_COLOR;
use item_catalog::state::carousel::Carousel;
use crate::Message;

const THUMBNAIL_SIZE: f32 = 72.0;

pub fn view<'a>(carousel: &'a Carousel, images: &'a ImageCache) -> Element<'a, Message> {
    let Some(item) = carousel.selected() else {
        return column![].into();
    };

    let header = row![
        text(item.name.as_str()).size(26),
        horizontal_space(),
        button(text("Close")).on_press(Message::CloseViewer).style(button::secondary),
    ]
    .align_y(Alignment::Center);

    let mut details = column![
        header,
        stage(carousel, images),
        column![
            text("Type").size(18),
            container(text(item.item_type.label())).padding([4, 12]).style(container::rounded_box),
        ]
        .spacing(8),
        column![
            text("Description").size(18),
            text(item.description.as_str()),
        ]
        .spacing(8),
    ]
    .spacing(20);

    if !item.additional_images.is_empty() {
        details = details.push(thumbnails(carousel, images));
    }

    container(scrollable(details.padding(24)))
        .max_width(900)
        .max_height(720)
        .style(container::rounded_box)
        .into()
}

/// The current image, with navigation around it when there is more than one
fn stage<'a>(carousel: &'a Carousel, images: &'a ImageCache) -> Element<'a, Message> {
    let current = carousel.current_image().unwrap_or_default();
    let image = super::image::view(
        current,
        images,
        Length::Fill,
        Length::Fixed(420.0),
        ContentFit::Contain,
    );

    if !carousel.has_navigation() {
        return image;
    }

    column![
        row![
            button(text("‹").size(24)).on_press(Message::PreviousImage).style(button::secondary),
            image,
            button(text("›").size(24)).on_press(Message::NextImage).style(button::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text(carousel.position_label()).color(MUTED_COLOR),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .into()
}

/// "All Images" strip; the current image is highlighted, clicks jump to it
fn thumbnails<'a>(carousel: &'a Carousel, images: &'a ImageCache) -> Element<'a, Message> {
    let thumbs: Vec<Element<Message>> = carousel
        .images()
        .into_iter()
        .enumerate()
        .map(|(index, url)| {
            let style: fn(&Theme, button::Status) -> button::Style =
                if index == carousel.current_index() {
                    button::primary
                } else {
                    button::secondary
                };

            button(super::image::view(
                url,
                images,
                Length::Fixed(THUMBNAIL_SIZE),
                Length::Fixed(THUMBNAIL_SIZE),
                ContentFit::Cover,
            ))
            .padding(3)
            .style(style)
            .on_press(Message::JumpToImage(index))
            .into()
        })
        .collect();

    column![
        text("All Images").size(18),
        Wrap::with_elements(thumbs).spacing(8.0).line_spacing(8.0),
    ]
    .spacing(12)
    .into()
}
