//! Query input with inline clear action

use iced::widget::{button, container, row, text, text_input};
use iced::{Alignment, Background, Border, Color, Element, Length, Padding};

use super::theme::Colors;

pub const PLACEHOLDER: &str = "Keywords: title / author / subject / tags…";

/// Search bar component
pub fn view<'a, Message: Clone + 'a>(
    value: &str,
    colors: Colors,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Message,
    on_clear: Message,
) -> Element<'a, Message> {
    let input = text_input(PLACEHOLDER, value)
        .on_input(on_input)
        .on_submit(on_submit)
        .padding(Padding::new(10.0))
        .size(16)
        .style(move |_theme, _status| text_input::Style {
            background: Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            icon: colors.text_muted,
            placeholder: colors.text_muted,
            value: colors.text,
            selection: colors.accent,
        });

    let mut content = row![text("🔎").size(14).color(colors.text_muted), input]
        .spacing(6)
        .align_y(Alignment::Center);

    if !value.is_empty() {
        content = content.push(
            button(text("Clear").size(12))
                .on_press(on_clear)
                .style(button::text),
        );
    }

    container(content)
        .padding(Padding::from([0.0, 12.0]))
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(colors.surface)),
            border: Border {
                color: colors.border,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        })
        .into()
}
