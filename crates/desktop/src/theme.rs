use iced::border::Border;
use iced::color;
use iced::theme::Palette;
use iced::widget::container;
use iced::{Color, Theme};

use crate::settings::Appearance;

pub fn resolve_theme(appearance: Appearance) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    if is_dark {
        Theme::custom("FaceDeck Dark", dark_palette())
    } else {
        Theme::custom("FaceDeck Light", light_palette())
    }
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x11, 0x13, 0x18),
        text: color!(0xe2, 0xe4, 0xea),
        primary: color!(0x66, 0x7e, 0xea),
        success: color!(0x10, 0xb9, 0x81),
        warning: color!(0xf5, 0x9e, 0x0b),
        danger: color!(0xef, 0x44, 0x44),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf4, 0xf5, 0xfb),
        text: color!(0x1a, 0x1c, 0x23),
        primary: color!(0x5a, 0x6f, 0xd6),
        success: color!(0x0f, 0x9d, 0x70),
        warning: color!(0xd9, 0x77, 0x06),
        danger: color!(0xdc, 0x26, 0x26),
    }
}

/// Outline color for a recognized face. Fixed across themes so the overlay
/// reads the same in dark and light mode.
pub fn known_face_color() -> Color {
    color!(0x10, 0xb9, 0x81)
}

/// Outline color for an unrecognized face.
pub fn unknown_face_color() -> Color {
    color!(0xf5, 0x9e, 0x0b)
}

/// Secondary text color derived from the active palette.
pub fn muted_color(theme: &Theme) -> Color {
    let palette = theme.extended_palette();
    Color {
        a: 0.7,
        ..palette.background.base.text
    }
}

/// De-emphasized text, for captions and metadata.
pub fn tertiary_color(theme: &Theme) -> Color {
    let palette = theme.extended_palette();
    Color {
        a: 0.45,
        ..palette.background.base.text
    }
}

/// Card background one step off the window background.
pub fn surface_color(theme: &Theme) -> Color {
    theme.extended_palette().background.weak.color
}

/// Chrome for the side-panel cards.
pub fn card_style(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(surface_color(theme))),
        border: Border {
            radius: 12.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

/// Chrome for the modal sheet floating over the dimmed dashboard.
pub fn sheet_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(iced::Background::Color(palette.background.base.color)),
        border: Border {
            radius: 16.0.into(),
            width: 1.0,
            color: Color {
                a: 0.08,
                ..palette.background.base.text
            },
        },
        ..container::Style::default()
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
