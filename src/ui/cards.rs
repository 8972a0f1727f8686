//! Result cards for books and recommendations

use iced::widget::{button, column, container, row, text, Row, Space};
use iced::{Alignment, Background, Border, Element, Length, Padding};

use super::theme::Colors;
use crate::backend::{Recommendation, SearchItem};

const LIKE_LABEL: &str = "I'm interested";

/// Placeholder card shown while a flow is loading
pub fn skeleton<'a, Message: 'a>(colors: Colors) -> Element<'a, Message> {
    card(
        column![
            bar(220.0, 18.0, colors),
            bar(140.0, 14.0, colors),
            row![bar(56.0, 20.0, colors), bar(72.0, 20.0, colors), bar(40.0, 20.0, colors)].spacing(8),
        ]
        .spacing(10)
        .into(),
        colors,
    )
}

fn bar<'a, Message: 'a>(width: f32, height: f32, colors: Colors) -> Element<'a, Message> {
    container(Space::new(Length::Fixed(width), Length::Fixed(height)))
        .style(move |_theme| container::Style {
            background: Some(Background::Color(colors.border)),
            border: Border::default().rounded(4),
            ..Default::default()
        })
        .into()
}

pub fn book<'a, Message: Clone + 'a>(
    item: &'a SearchItem,
    colors: Colors,
    on_like: Message,
) -> Element<'a, Message> {
    let mut badges = Row::new().spacing(6);
    if let Some(year) = item.display_year() {
        badges = badges.push(badge(year, colors.text_muted, colors));
    }
    if let Some(availability) = item.display_availability() {
        let tint = if item.is_available() {
            colors.success
        } else {
            colors.text_muted
        };
        badges = badges.push(badge(availability.to_string(), tint, colors));
    }

    let header = row![
        container(text("BOOK").size(10).color(colors.text_muted))
            .width(44)
            .height(44)
            .center_x(44)
            .center_y(44)
            .style(move |_theme| container::Style {
                background: Some(Background::Color(colors.background)),
                border: Border::default().rounded(10),
                ..Default::default()
            }),
        column![
            text(item.title.as_str()).size(16).color(colors.text),
            text(item.display_author()).size(13).color(colors.text_muted),
            badges,
        ]
        .spacing(4)
        .width(Length::Fill),
    ]
    .spacing(12)
    .align_y(Alignment::Start);

    let mut body = column![header].spacing(10);
    if let Some(summary) = item.display_abstract() {
        body = body.push(text(clip(summary, 220)).size(13).color(colors.text_muted));
    }

    let tags = item.display_tags();
    if !tags.is_empty() {
        body = body.push(tag_row(tags, colors));
    }

    body = body.push(like_button(on_like, colors));
    card(body.into(), colors)
}

pub fn recommendation<'a, Message: Clone + 'a>(
    rec: &'a Recommendation,
    colors: Colors,
    on_like: Message,
) -> Element<'a, Message> {
    let header = row![
        column![
            text(rec.title.as_str()).size(16).color(colors.text),
            text(rec.display_author()).size(13).color(colors.text_muted),
        ]
        .spacing(4)
        .width(Length::Fill),
        badge(rec.display_score(), colors.primary, colors),
    ]
    .spacing(12)
    .align_y(Alignment::Start);

    let reasons: Element<'a, Message> = if rec.reason_tags().is_empty() {
        text("No explanation tags").size(13).color(colors.text_muted).into()
    } else {
        tag_row(rec.reason_tags().to_vec(), colors)
    };

    card(
        column![header, reasons, like_button(on_like, colors)]
            .spacing(10)
            .into(),
        colors,
    )
}

fn card<'a, Message: 'a>(content: Element<'a, Message>, colors: Colors) -> Element<'a, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(colors.surface)),
            border: Border {
                color: colors.border,
                width: 1.0,
                radius: 12.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn badge<'a, Message: 'a>(label: String, tint: iced::Color, colors: Colors) -> Element<'a, Message> {
    container(text(label).size(11).color(tint))
        .padding(Padding::from([2.0, 8.0]))
        .style(move |_theme| container::Style {
            background: Some(Background::Color(colors.surface)),
            border: Border {
                color: tint,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn tag_row<'a, Message: 'a>(tags: Vec<String>, colors: Colors) -> Element<'a, Message> {
    tags.into_iter()
        .fold(Row::new().spacing(6), |row, tag| {
            row.push(badge(tag, colors.text_muted, colors))
        })
        .wrap()
        .into()
}

fn like_button<'a, Message: Clone + 'a>(on_like: Message, colors: Colors) -> Element<'a, Message> {
    row![
        Space::with_width(Length::Fill),
        button(text(LIKE_LABEL).size(13))
            .on_press(on_like)
            .padding(Padding::from([6.0, 12.0]))
            .style(move |_theme, status| {
                let background = match status {
                    button::Status::Hovered | button::Status::Pressed => colors.accent,
                    _ => colors.primary,
                };
                button::Style {
                    background: Some(Background::Color(background)),
                    text_color: iced::Color::WHITE,
                    border: Border::default().rounded(8),
                    ..button::Style::default()
                }
            }),
    ]
    .into()
}

/// Cut long abstracts on a char boundary
fn clip(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}…", value[..end].trim_end()),
        None => value.to_string(),
    }
}
