use std::time::Instant;

use iced::widget::{button, column, container, row, text};
use iced::{Border, Color, Element, Length, Theme};

use facedeck_core::shared::constants::TOAST_TTL;

use crate::app::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    born: Instant,
}

/// Transient notifications, newest at the bottom. Expired toasts are
/// collected by `sweep`; the close button removes one early.
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastStack {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            born: Instant::now(),
        });
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn sweep(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.born) < TOAST_TTL);
    }
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new()
    }
}

pub fn view<'a>(stack: &'a ToastStack, theme: &Theme) -> Element<'a, Message> {
    let mut cards = column![].spacing(8).width(320);
    for toast in stack.iter() {
        cards = cards.push(card(toast, theme));
    }

    container(cards)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::Alignment::End)
        .padding(16)
        .into()
}

fn card<'a>(toast: &'a Toast, theme: &Theme) -> Element<'a, Message> {
    let palette = theme.extended_palette();
    let (accent, glyph) = match toast.kind {
        ToastKind::Success => (palette.success.base.color, "✓"),
        ToastKind::Error => (palette.danger.base.color, "!"),
        ToastKind::Info => (palette.primary.base.color, "i"),
    };

    container(
        row![
            text(glyph).size(14).color(Color::WHITE),
            text(toast.message.clone())
                .size(13)
                .color(Color::WHITE)
                .width(Length::Fill),
            button(text("×").size(14).color(Color::WHITE))
                .style(button::text)
                .padding([0, 6])
                .on_press(Message::ToastDismissed(toast.id)),
        ]
        .spacing(10)
        .align_y(iced::Alignment::Center),
    )
    .padding([10, 14])
    .style(move |_theme: &Theme| container::Style {
        background: Some(iced::Background::Color(accent)),
        border: Border {
            radius: 8.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_dismiss_removes_only_the_matching_toast() {
        let mut stack = ToastStack::new();
        stack.success("saved");
        stack.error("failed");
        stack.info("note");

        let ids: Vec<u64> = stack.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        stack.dismiss(1);
        let kinds: Vec<ToastKind> = stack.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ToastKind::Success, ToastKind::Info]);
    }

    #[test]
    fn test_sweep_expires_old_toasts() {
        let mut stack = ToastStack::new();
        stack.success("short lived");

        stack.sweep(Instant::now());
        assert!(!stack.is_empty());

        stack.sweep(Instant::now() + TOAST_TTL + Duration::from_millis(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_ids_keep_growing_after_dismissal() {
        let mut stack = ToastStack::new();
        stack.info("a");
        stack.dismiss(0);
        stack.info("b");
        assert_eq!(stack.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
    }
}
