use iced::border::Border;
use iced::widget::{column, container, row, text, Space};
use iced::{Color, Element, Length, Theme};

use facedeck_core::shared::detection::{DetectionResult, SimilarityLevel};

use crate::app::Message;
use crate::theme::{card_style, known_face_color, muted_color, tertiary_color, unknown_face_color};

pub fn view<'a>(
    results: &'a [DetectionResult],
    polling: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let tertiary = tertiary_color(theme);

    let header = row![
        text("Detected Faces").size(15).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().width(Length::Fill),
        text(results.len().to_string()).size(13).color(muted),
    ]
    .align_y(iced::Alignment::Center);

    let body: Element<'a, Message> = if !polling {
        text("Start detection to see who is in view")
            .size(12)
            .color(tertiary)
            .into()
    } else if results.is_empty() {
        text("No faces in view").size(12).color(tertiary).into()
    } else {
        let mut list = column![].spacing(10);
        for result in results {
            list = list.push(face_row(result, tertiary, theme));
        }
        list.into()
    };

    container(column![header, Space::new().height(12), body])
        .padding(16)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn face_row<'a>(
    result: &'a DetectionResult,
    tertiary: Color,
    theme: &Theme,
) -> Element<'a, Message> {
    let accent = if result.is_known() {
        known_face_color()
    } else {
        unknown_face_color()
    };
    let level_color = match result.similarity_level() {
        SimilarityLevel::High => theme.palette().success,
        SimilarityLevel::Medium => theme.palette().warning,
        SimilarityLevel::Low => theme.palette().danger,
    };

    let initial = result
        .name
        .chars()
        .next()
        .filter(|_| result.is_known())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());

    let avatar = container(
        text(initial)
            .size(13)
            .color(accent)
            .align_x(iced::Alignment::Center),
    )
    .width(30)
    .height(30)
    .center_x(Length::Shrink)
    .center_y(Length::Shrink)
    .style(move |_theme: &Theme| container::Style {
        background: Some(iced::Background::Color(Color { a: 0.15, ..accent })),
        border: Border {
            radius: 100.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    });

    let identity = column![
        text(result.name.clone()).size(13),
        row![
            similarity_bar(result.similarity, level_color, theme),
            text(format!("{:.1}%", result.similarity * 100.0))
                .size(11)
                .color(level_color),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
    ]
    .spacing(4);

    row![
        avatar,
        identity.width(Length::Fill),
        text(format!("det {:.0}%", result.score * 100.0))
            .size(11)
            .color(tertiary),
    ]
    .spacing(10)
    .align_y(iced::Alignment::Center)
    .into()
}

/// Thin two-layer bar; the fill fraction is the cosine similarity.
fn similarity_bar(fraction: f32, color: Color, theme: &Theme) -> Element<'static, Message> {
    let track_width = 90.0_f32;
    let fill_width = track_width * fraction.clamp(0.0, 1.0);
    let track_color = Color {
        a: 0.25,
        ..theme.extended_palette().background.strong.color
    };

    let fill = container(Space::new().width(fill_width).height(5)).style(move |_theme: &Theme| {
        container::Style {
            background: Some(iced::Background::Color(color)),
            border: Border {
                radius: 3.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        }
    });

    container(fill)
        .width(track_width)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(track_color)),
            border: Border {
                radius: 3.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
}
