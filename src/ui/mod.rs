/// UI module
///
/// Presentation only. Views read the library and carousel through shared
/// references and report user actions as `Message`s.

pub mod form;
pub mod gallery;
pub mod image;
pub mod viewer;

use iced::widget::{button, center, container, horizontal_space, mouse_area, opaque, row, stack, text};
use iced::{Alignment, Color, Element, Length, Theme};

use crate::Message;

/// Red used for inline validation messages
pub const ERROR_COLOR: Color = Color {
    r: 0.86,
    g: 0.15,
    b: 0.15,
    a: 1.0,
};
/// Muted grey for hints and secondary text
pub const MUTED_COLOR: Color = Color {
    r: 0.42,
    g: 0.45,
    b: 0.5,
    a: 1.0,
};

const SUCCESS_COLOR: Color = Color {
    r: 0.09,
    g: 0.5,
    b: 0.24,
    a: 1.0,
};
const WARNING_COLOR: Color = Color {
    r: 0.7,
    g: 0.4,
    b: 0.0,
    a: 1.0,
};

/// Top-level pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AddItems,
    ViewItems,
}

/// Banner shown on the form page
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success,
    Warning(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success => "Item successfully added!",
            Notice::Warning(message) => message,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let color = match self {
            Notice::Success => SUCCESS_COLOR,
            Notice::Warning(_) => WARNING_COLOR,
        };

        container(text(self.message()).color(color))
            .padding(12)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
    }
}

/// Navigation bar with the app title and page buttons
pub fn navigation<'a>(current: Page) -> Element<'a, Message> {
    let nav_button = |label: &'a str, page: Page| {
        let style: fn(&Theme, button::Status) -> button::Style = if page == current {
            button::primary
        } else {
            button::secondary
        };

        button(text(label))
            .padding([8, 16])
            .on_press(Message::Navigate(page))
            .style(style)
    };

    container(
        row![
            text("Item Management System").size(22),
            horizontal_space(),
            nav_button("Add Items", Page::AddItems),
            nav_button("View Items", Page::ViewItems),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([12, 24])
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}

/// Overlay `content` on top of `base`, dimming the background.
///
/// Clicking the dimmed area emits `on_blur`.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.7,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}
