//! Theme configuration

use iced::theme::Palette;
use iced::{Color, Theme};

use crate::theme::{AppliedTheme, Rgb};

pub fn color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.0, rgb.1, rgb.2)
}

/// Dark theme colors
pub struct DarkTheme;

impl DarkTheme {
    pub const BACKGROUND: Color = Color::from_rgb(0.09, 0.09, 0.11);
    pub const SURFACE: Color = Color::from_rgb(0.13, 0.13, 0.16);
    pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.28);
    pub const TEXT: Color = Color::from_rgb(0.95, 0.95, 0.95);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.6, 0.6, 0.65);
}

/// Light theme colors
pub struct LightTheme;

impl LightTheme {
    pub const BACKGROUND: Color = Color::from_rgb(0.94, 0.95, 0.96);
    pub const SURFACE: Color = Color::WHITE;
    pub const BORDER: Color = Color::from_rgb(0.86, 0.87, 0.89);
    pub const TEXT: Color = Color::from_rgb(0.12, 0.13, 0.15);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.42, 0.44, 0.48);
}

const SUCCESS: Color = Color::from_rgb(0.13, 0.77, 0.37);
const DANGER: Color = Color::from_rgb(0.94, 0.27, 0.27);

/// Colors the view needs beyond the toolkit palette
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub background: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub danger: Color,
}

impl Colors {
    pub fn of(applied: &AppliedTheme) -> Self {
        let primary = color(applied.settings.color.primary());
        let accent = color(applied.settings.color.accent());
        if applied.resolved.is_dark() {
            Self {
                background: DarkTheme::BACKGROUND,
                surface: DarkTheme::SURFACE,
                border: DarkTheme::BORDER,
                text: DarkTheme::TEXT,
                text_muted: DarkTheme::TEXT_MUTED,
                primary,
                accent,
                success: SUCCESS,
                danger: DANGER,
            }
        } else {
            Self {
                background: LightTheme::BACKGROUND,
                surface: LightTheme::SURFACE,
                border: LightTheme::BORDER,
                text: LightTheme::TEXT,
                text_muted: LightTheme::TEXT_MUTED,
                primary,
                accent,
                success: SUCCESS,
                danger: DANGER,
            }
        }
    }
}

/// Toolkit theme for the current settings
pub fn iced_theme(applied: &AppliedTheme) -> Theme {
    let colors = Colors::of(applied);
    let name = format!(
        "{}-{}",
        applied.resolved.label().to_lowercase(),
        applied.settings.color
    );
    Theme::custom(
        name,
        Palette {
            background: colors.background,
            text: colors.text,
            primary: colors.primary,
            success: colors.success,
            danger: colors.danger,
        },
    )
}
