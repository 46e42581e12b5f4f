use iced::border::Border;
use iced::widget::{button, column, container, image, row, stack, text, text_input, Space};
use iced::{Color, ContentFit, Element, Length, Theme};

use facedeck_core::registration::draft::{
    CapturedPhoto, DraftStep, PhotoOrigin, RegistrationDraft, SubmitOutcome,
};

use crate::app::Message;
use crate::camera::CameraFeed;
use crate::theme::{muted_color, sheet_style, tertiary_color};

/// Wizard state: the step machine from the core crate plus the widget
/// handles for its photos, kept index-aligned with `draft.photos()`.
pub struct WizardState {
    pub draft: RegistrationDraft,
    thumbs: Vec<image::Handle>,
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            draft: RegistrationDraft::new(),
            thumbs: Vec::new(),
        }
    }

    pub fn add_photo(&mut self, photo: CapturedPhoto) {
        self.thumbs.push(image::Handle::from_bytes(photo.jpeg.clone()));
        self.draft.add_photo(photo);
    }

    pub fn remove_photo(&mut self, index: usize) {
        if index < self.thumbs.len() {
            self.thumbs.remove(index);
        }
        self.draft.remove_photo(index);
    }

    pub fn thumbs(&self) -> &[image::Handle] {
        &self.thumbs
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn view<'a>(
    wizard: &'a WizardState,
    feed: &'a CameraFeed,
    theme: &Theme,
) -> Element<'a, Message> {
    let body: Element<'a, Message> = match wizard.draft.step() {
        DraftStep::Name => name_step(wizard.draft.name(), theme),
        DraftStep::Capture => capture_step(wizard, feed, theme),
        DraftStep::Review => review_step(wizard, theme),
        DraftStep::Submitting => submitting_step(wizard, theme),
        DraftStep::Done => done_step(wizard, theme),
    };

    let header = row![
        text("Register Face").size(17).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().width(Length::Fill),
        button(text("\u{00D7}").size(16))
            .on_press(Message::WizardClosed)
            .padding([0, 8])
            .style(button::text),
    ]
    .align_y(iced::Alignment::Center);

    container(column![
        header,
        Space::new().height(8),
        step_trail(wizard.draft.step(), theme),
        Space::new().height(16),
        body,
    ])
    .padding(24)
    .width(460)
    .style(sheet_style)
    .into()
}

fn step_trail(step: DraftStep, theme: &Theme) -> Element<'static, Message> {
    let muted = muted_color(theme);
    let tertiary = tertiary_color(theme);
    let primary = theme.extended_palette().primary.base.color;

    let stage = match step {
        DraftStep::Name => 0,
        DraftStep::Capture => 1,
        DraftStep::Review | DraftStep::Submitting | DraftStep::Done => 2,
    };

    let mut trail = row![].spacing(8).align_y(iced::Alignment::Center);
    for (index, label) in ["Name", "Photos", "Review"].into_iter().enumerate() {
        let color = if index == stage {
            primary
        } else if index < stage {
            muted
        } else {
            tertiary
        };
        trail = trail.push(
            text(format!("{}. {label}", index + 1))
                .size(12)
                .color(color),
        );
        if index < 2 {
            trail = trail.push(text("\u{203A}").size(12).color(tertiary));
        }
    }
    trail.into()
}

fn name_step<'a>(name: &'a str, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let ready = !name.trim().is_empty();

    column![
        text("Who is this?").size(14),
        Space::new().height(8),
        text_input("Full name", name)
            .on_input(Message::WizardNameChanged)
            .on_submit(Message::WizardNameConfirmed)
            .size(14)
            .padding([10, 12]),
        Space::new().height(6),
        text("The name labels this person in the live feed.")
            .size(12)
            .color(tertiary),
        Space::new().height(20),
        button(text("Next").size(14))
            .on_press_maybe(ready.then_some(Message::WizardNameConfirmed))
            .padding([12, 24])
            .width(Length::Fill),
    ]
    .into()
}

fn capture_step<'a>(
    wizard: &'a WizardState,
    feed: &'a CameraFeed,
    theme: &Theme,
) -> Element<'a, Message> {
    let muted = muted_color(theme);

    let preview: Element<'a, Message> = match feed.handle() {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(180)
            .content_fit(ContentFit::Contain)
            .into(),
        None => container(text("No camera frame").size(13).color(Color {
            a: 0.55,
            ..Color::WHITE
        }))
        .width(Length::Fill)
        .height(180)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into(),
    };
    let preview = container(preview)
        .width(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(Color::BLACK)),
            border: Border {
                radius: 10.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    let count = wizard.draft.photos().len();

    let mut col = column![
        preview,
        Space::new().height(10),
        row![
            button(text("Capture Photo").size(14))
                .on_press_maybe(feed.handle().is_some().then_some(Message::WizardShotTaken))
                .padding([10, 20]),
            button(text("Add from Files\u{2026}").size(14))
                .on_press(Message::WizardPickFiles)
                .padding([10, 20])
                .style(button::secondary),
        ]
        .spacing(10),
        Space::new().height(14),
        text(photo_count(count)).size(13),
    ];

    if count > 0 {
        col = col
            .push(Space::new().height(8))
            .push(thumb_grid(wizard, true));
    }
    if wizard.draft.wants_more_photos() {
        col = col.push(Space::new().height(8)).push(
            text("Two or more angles improve matching.")
                .size(12)
                .color(muted),
        );
    }

    col.push(Space::new().height(20))
        .push(
            row![
                button(text("Back").size(14))
                    .on_press(Message::WizardBackToName)
                    .padding([12, 20])
                    .style(button::secondary),
                Space::new().width(Length::Fill),
                button(text("Review").size(14))
                    .on_press_maybe((count > 0).then_some(Message::WizardReview))
                    .padding([12, 24]),
            ]
            .align_y(iced::Alignment::Center),
        )
        .into()
}

fn review_step<'a>(wizard: &'a WizardState, theme: &Theme) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let count = wizard.draft.photos().len();

    column![
        text(format!("Register {}?", wizard.draft.name())).size(15),
        Space::new().height(4),
        text(format!(
            "{} will be uploaded and indexed for recognition.",
            photo_count(count)
        ))
        .size(12)
        .color(muted),
        Space::new().height(12),
        thumb_grid(wizard, false),
        Space::new().height(20),
        row![
            button(text("Back").size(14))
                .on_press(Message::WizardBackToCapture)
                .padding([12, 20])
                .style(button::secondary),
            Space::new().width(Length::Fill),
            button(text("Register").size(14))
                .on_press(Message::WizardSubmitted)
                .padding([12, 24]),
        ]
        .align_y(iced::Alignment::Center),
    ]
    .into()
}

fn submitting_step<'a>(wizard: &'a WizardState, theme: &Theme) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let count = wizard.draft.photos().len();

    container(
        column![
            text("Registering\u{2026}").size(15),
            Space::new().height(8),
            text(format!(
                "Uploading {} for {}",
                photo_count(count),
                wizard.draft.name()
            ))
            .size(13)
            .color(muted),
        ]
        .align_x(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .center_x(Length::Fill)
    .padding([36, 20])
    .into()
}

fn done_step<'a>(wizard: &'a WizardState, theme: &Theme) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let palette = theme.extended_palette();

    match wizard.draft.outcome() {
        Some(SubmitOutcome::Accepted { message }) => {
            let success = palette.success.base.color;
            let badge = container(
                text("\u{2713}")
                    .size(20)
                    .color(success)
                    .align_x(iced::Alignment::Center),
            )
            .width(48)
            .height(48)
            .center_x(Length::Shrink)
            .center_y(Length::Shrink)
            .style(move |_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(Color { a: 0.15, ..success })),
                border: Border {
                    radius: 100.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            });

            column![
                badge,
                Space::new().height(12),
                text("All set").size(16),
                Space::new().height(4),
                text(message.clone()).size(13).color(muted),
                Space::new().height(20),
                button(text("Close").size(14))
                    .on_press(Message::WizardClosed)
                    .padding([12, 24])
                    .width(Length::Fill),
            ]
            .align_x(iced::Alignment::Center)
            .into()
        }
        Some(SubmitOutcome::Rejected { message }) => column![
            text("Registration failed").size(16),
            Space::new().height(4),
            text(message.clone()).size(13).color(muted),
            Space::new().height(20),
            row![
                button(text("Back").size(14))
                    .on_press(Message::WizardBackToCapture)
                    .padding([12, 20])
                    .style(button::secondary),
                button(text("Close").size(14))
                    .on_press(Message::WizardClosed)
                    .padding([12, 20]),
            ]
            .spacing(10),
        ]
        .align_x(iced::Alignment::Center)
        .into(),
        None => text("").into(),
    }
}

fn thumb_grid<'a>(wizard: &'a WizardState, removable: bool) -> Element<'a, Message> {
    let mut cells: Vec<Element<'a, Message>> = Vec::new();
    let photos = wizard.thumbs().iter().zip(wizard.draft.photos());
    for (index, (handle, photo)) in photos.enumerate() {
        let thumb = image(handle.clone())
            .width(84)
            .height(84)
            .content_fit(ContentFit::Cover);
        let cell: Element<'a, Message> = if removable {
            stack![
                thumb,
                container(
                    button(text("\u{00D7}").size(12))
                        .on_press(Message::WizardPhotoRemoved(index))
                        .padding([0, 6])
                        .style(button::danger),
                )
                .width(Length::Fill)
                .align_x(iced::Alignment::End),
            ]
            .width(84)
            .into()
        } else if photo.origin == PhotoOrigin::File {
            stack![thumb, origin_badge()].width(84).into()
        } else {
            thumb.into()
        };
        cells.push(cell);
    }

    let mut grid = column![].spacing(8);
    let mut cells = cells.into_iter().peekable();
    while cells.peek().is_some() {
        let mut line = row![].spacing(8);
        for cell in cells.by_ref().take(4) {
            line = line.push(cell);
        }
        grid = grid.push(line);
    }
    grid.into()
}

/// Marks photos that came from the file picker rather than the live feed.
fn origin_badge() -> Element<'static, Message> {
    container(
        container(text("file").size(9).color(Color::WHITE))
            .padding([1, 5])
            .style(|_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(Color {
                    a: 0.55,
                    ..Color::BLACK
                })),
                border: Border {
                    radius: 4.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }),
    )
    .width(Length::Fill)
    .height(84)
    .align_x(iced::Alignment::End)
    .align_y(iced::Alignment::End)
    .padding(4)
    .into()
}

fn photo_count(count: usize) -> String {
    if count == 1 {
        "1 photo".to_string()
    } else {
        format!("{count} photos")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(byte: u8) -> CapturedPhoto {
        CapturedPhoto {
            jpeg: vec![byte; 4],
            origin: PhotoOrigin::Camera,
        }
    }

    #[test]
    fn test_thumbs_stay_aligned_with_draft_photos() {
        let mut wizard = WizardState::new();
        wizard.add_photo(photo(1));
        wizard.add_photo(photo(2));
        wizard.add_photo(photo(3));
        assert_eq!(wizard.thumbs().len(), wizard.draft.photos().len());

        wizard.remove_photo(1);
        assert_eq!(wizard.thumbs().len(), 2);
        assert_eq!(wizard.draft.photos().len(), 2);
        assert_eq!(wizard.draft.photos()[1].jpeg, vec![3; 4]);
    }

    #[test]
    fn test_out_of_range_removal_changes_nothing() {
        let mut wizard = WizardState::new();
        wizard.add_photo(photo(1));
        wizard.remove_photo(7);
        assert_eq!(wizard.thumbs().len(), 1);
        assert_eq!(wizard.draft.photos().len(), 1);
    }
}
