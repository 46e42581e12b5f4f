use iced::border::Border;
use iced::widget::{button, column, container, row, scrollable, text, text_input, Space};
use iced::{Color, Element, Length, Theme};

use facedeck_core::api::types::RegisteredUser;

use crate::app::Message;
use crate::roster::{RenameEdit, RosterState};
use crate::theme::{card_style, muted_color, tertiary_color};

pub fn view<'a>(roster: &'a RosterState, theme: &Theme) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let tertiary = tertiary_color(theme);

    let header = row![
        text("Registered Users").size(15).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().width(8),
        text(roster.users.len().to_string()).size(13).color(muted),
        Space::new().width(Length::Fill),
        button(text("Refresh").size(12))
            .on_press(Message::RosterRefresh)
            .padding([4, 8])
            .style(button::text),
    ]
    .align_y(iced::Alignment::Center);

    let body: Element<'a, Message> = if roster.loading && roster.users.is_empty() {
        text("Loading\u{2026}").size(12).color(tertiary).into()
    } else if roster.users.is_empty() {
        text("No one registered yet. Use Register Face to add someone.")
            .size(12)
            .color(tertiary)
            .into()
    } else {
        let mut list = column![].spacing(8);
        for user in &roster.users {
            list = list.push(user_row(user, roster, theme));
        }
        scrollable(list).height(Length::Fill).into()
    };

    container(column![header, Space::new().height(12), body])
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(card_style)
        .into()
}

fn user_row<'a>(
    user: &'a RegisteredUser,
    roster: &'a RosterState,
    theme: &Theme,
) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let palette = theme.extended_palette();
    let renaming = roster
        .rename()
        .is_some_and(|edit| edit.target == user.name);

    let primary = palette.primary.base.color;
    let avatar = container(
        text(user.initials())
            .size(12)
            .color(primary)
            .align_x(iced::Alignment::Center),
    )
    .width(32)
    .height(32)
    .center_x(Length::Shrink)
    .center_y(Length::Shrink)
    .style(move |_theme: &Theme| container::Style {
        background: Some(iced::Background::Color(Color { a: 0.12, ..primary })),
        border: Border {
            radius: 100.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    });

    let identity: Element<'a, Message> = match roster.rename() {
        Some(edit) if edit.target == user.name => rename_editor(edit),
        _ => {
            let meta = match user.updated_date() {
                Some(date) => format!("{} \u{00B7} {}", photo_count(user.image_count), date),
                None => photo_count(user.image_count),
            };
            column![
                text(user.name.clone()).size(14),
                text(meta).size(11).color(tertiary),
            ]
            .spacing(2)
            .into()
        }
    };

    let mut content = row![
        avatar,
        Space::new().width(10),
        container(identity).width(Length::Fill),
    ]
    .align_y(iced::Alignment::Center);

    if !renaming {
        content = content
            .push(
                button(text("Rename").size(11))
                    .on_press(Message::RenameStarted(user.name.clone()))
                    .padding([4, 6])
                    .style(button::text),
            )
            .push(
                button(text("Delete").size(11).color(theme.palette().danger))
                    .on_press(Message::DeleteRequested(user.name.clone()))
                    .padding([4, 6])
                    .style(button::text),
            );
    }

    container(content)
        .padding([8, 10])
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn rename_editor<'a>(edit: &'a RenameEdit) -> Element<'a, Message> {
    row![
        text_input("New name", &edit.buffer)
            .on_input(Message::RenameInput)
            .on_submit(Message::RenameSubmitted)
            .size(13)
            .padding([6, 8])
            .width(Length::Fill),
        button(text("Save").size(12))
            .on_press(Message::RenameSubmitted)
            .padding([6, 10]),
        button(text("Cancel").size(12))
            .on_press(Message::RenameCancelled)
            .padding([6, 8])
            .style(button::text),
    ]
    .spacing(6)
    .align_y(iced::Alignment::Center)
    .into()
}

fn photo_count(count: u32) -> String {
    if count == 1 {
        "1 photo".to_string()
    } else {
        format!("{count} photos")
    }
}
