use iced::border::Border;
use iced::widget::{button, canvas, column, container, image, row, stack, text, Space};
use iced::{Color, ContentFit, Element, Length, Theme};

use facedeck_core::detection::domain::detection_loop::DetectionLoop;
use facedeck_core::overlay::annotation::annotate;

use crate::app::Message;
use crate::camera::CameraFeed;
use crate::theme::{muted_color, tertiary_color};
use crate::widgets::overlay::DetectionOverlay;

pub fn view<'a>(
    feed: &'a CameraFeed,
    detector: &DetectionLoop,
    rate: f32,
    backend_online: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let tertiary = tertiary_color(theme);
    let danger = theme.palette().danger;

    let viewport: Element<'a, Message> = match feed.handle() {
        Some(handle) => {
            let video = image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain);
            let boxes = canvas(DetectionOverlay {
                annotations: annotate(detector.results()),
                frame_size: feed.frame_size().unwrap_or((0, 0)),
            })
            .width(Length::Fill)
            .height(Length::Fill);
            stack![video, boxes]
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        }
        None => waiting_view(feed),
    };

    let screen = container(viewport)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(8)
        .style(|_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(Color::BLACK)),
            border: Border {
                radius: 12.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    let status: Element<'a, Message> = if detector.is_polling() {
        row![
            text(face_count(detector.results().len())).size(13),
            text(format!("{rate:.1} analyses/s")).size(12).color(muted),
        ]
        .spacing(14)
        .align_y(iced::Alignment::Center)
        .into()
    } else {
        text("Detection off").size(13).color(muted).into()
    };

    let toggle = if detector.is_polling() {
        button(text("Stop Detection").size(14))
            .on_press(Message::DetectionToggled)
            .padding([10, 24])
            .style(button::danger)
    } else {
        button(text("Start Detection").size(14))
            .on_press(Message::DetectionToggled)
            .padding([10, 24])
    };

    let mut controls = row![status, Space::new().width(Length::Fill)]
        .spacing(14)
        .align_y(iced::Alignment::Center);
    if !backend_online {
        controls = controls.push(text("Backend offline").size(12).color(danger));
    }
    controls = controls
        .push(text(feed.describe()).size(12).color(tertiary))
        .push(Space::new().width(6))
        .push(toggle);

    column![screen, Space::new().height(12), controls].into()
}

fn waiting_view<'a>(feed: &CameraFeed) -> Element<'a, Message> {
    let detail = match feed.error() {
        Some(error) => error.to_owned(),
        None => format!("Waiting for frames from {}", feed.describe()),
    };

    container(
        column![
            text("No video yet").size(16).color(Color {
                a: 0.85,
                ..Color::WHITE
            }),
            Space::new().height(6),
            text(detail).size(13).color(Color {
                a: 0.55,
                ..Color::WHITE
            }),
        ]
        .align_x(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn face_count(count: usize) -> String {
    match count {
        0 => "Scanning for faces".to_string(),
        1 => "1 face in view".to_string(),
        n => format!("{n} faces in view"),
    }
}
