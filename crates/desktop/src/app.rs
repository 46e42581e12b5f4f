use std::time::{Duration, Instant};

use iced::widget::{button, center, column, container, mouse_area, opaque, row, stack, text, Space};
use iced::{Color, Element, Length, Subscription, Task, Theme};
use log::{debug, info, warn};

use facedeck_core::api::client::{ApiClient, ApiConfig};
use facedeck_core::api::types::{RegisterReceipt, UserList};
use facedeck_core::capture::domain::capture_source::Snapshot;
use facedeck_core::detection::domain::detection_loop::{DetectionLoop, RequestTag};
use facedeck_core::registration::draft::{CapturedPhoto, PhotoOrigin, SubmitOutcome, SubmitRequest};
use facedeck_core::shared::constants::{ANALYZE_INTERVAL, HEALTH_INTERVAL};
use facedeck_core::shared::detection::DetectionResult;

use crate::camera::CameraFeed;
use crate::panels::wizard::WizardState;
use crate::panels::{camera_panel, faces_panel, roster_panel, wizard};
use crate::roster::RosterState;
use crate::settings::{Appearance, Settings};
use crate::stats::RateMeter;
use crate::theme;
use crate::widgets::toast::{self, ToastStack};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    // timers
    FeedTick,
    DetectTick,
    HealthTick,
    ToastTick,
    PollSystemTheme,
    // detection
    DetectionToggled,
    AnalysisDone {
        tag: RequestTag,
        outcome: Result<Vec<DetectionResult>, String>,
    },
    HealthProbed(bool),
    // roster
    RosterRefresh,
    RosterLoaded(Result<UserList, String>),
    RenameStarted(String),
    RenameInput(String),
    RenameCancelled,
    RenameSubmitted,
    RenameFinished {
        new_name: String,
        outcome: Result<(), String>,
    },
    DeleteRequested(String),
    DeleteConfirmed(bool),
    DeleteFinished {
        name: String,
        outcome: Result<(), String>,
    },
    // registration wizard
    WizardOpened,
    WizardClosed,
    WizardNameChanged(String),
    WizardNameConfirmed,
    WizardBackToName,
    WizardShotTaken,
    WizardPickFiles,
    WizardFilesPicked {
        photos: Vec<CapturedPhoto>,
        skipped: usize,
    },
    WizardPhotoRemoved(usize),
    WizardReview,
    WizardBackToCapture,
    WizardSubmitted,
    WizardFinished(Result<RegisterReceipt, String>),
    // chrome
    AppearanceCycled,
    OpenApiDocs,
    ToastDismissed(u64),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    api: ApiClient,
    feed: CameraFeed,
    detector: DetectionLoop,
    backend_online: bool,
    rate: RateMeter,
    roster: RosterState,
    wizard: Option<WizardState>,
    toasts: ToastStack,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let (api, api_warning) = build_client(&settings.backend_url);
        let feed = CameraFeed::from_settings(&settings.camera);

        let mut toasts = ToastStack::new();
        if let Some(warning) = api_warning {
            toasts.error(warning);
        }

        let app = Self {
            settings,
            api,
            feed,
            detector: DetectionLoop::new(),
            backend_online: false,
            rate: RateMeter::default(),
            roster: RosterState::new(),
            wizard: None,
            toasts,
        };

        // Probe the backend and load the roster right away rather than
        // waiting for the first timer tick.
        let startup = Task::batch(vec![
            Task::done(Message::HealthTick),
            Task::done(Message::RosterRefresh),
        ]);
        (app, startup)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FeedTick => {
                self.feed.refresh();
            }
            Message::DetectTick => {
                if let Some(snapshot) = self.feed.current_snapshot() {
                    if let Some(tag) = self.detector.tick(true) {
                        let api = self.api.clone();
                        return Task::perform(
                            async move {
                                api.analyze(snapshot.jpeg)
                                    .await
                                    .map_err(|e| e.user_message())
                            },
                            move |outcome| Message::AnalysisDone { tag, outcome },
                        );
                    }
                }
            }
            Message::AnalysisDone { tag, outcome } => {
                if self.detector.complete(tag, outcome) {
                    self.rate.record(Instant::now());
                }
            }
            Message::HealthTick => {
                let api = self.api.clone();
                return Task::perform(async move { api.health().await }, Message::HealthProbed);
            }
            Message::HealthProbed(online) => {
                if online != self.backend_online {
                    info!(
                        "backend {}",
                        if online { "reachable" } else { "unreachable" }
                    );
                }
                self.backend_online = online;
            }
            Message::DetectionToggled => {
                if self.detector.is_polling() {
                    self.detector.stop();
                } else if self.detector.start(self.backend_online).is_err() {
                    self.toasts
                        .error("Backend offline: start the recognition service first");
                }
            }
            Message::RosterRefresh => {
                self.roster.loading = true;
                let api = self.api.clone();
                return Task::perform(
                    async move { api.list_users().await.map_err(|e| e.user_message()) },
                    Message::RosterLoaded,
                );
            }
            Message::RosterLoaded(Ok(list)) => {
                self.roster.set_users(list.users);
            }
            Message::RosterLoaded(Err(e)) => {
                // Keep the cached roster on screen; a toast per failed
                // background poll would be noise.
                warn!("roster refresh failed: {e}");
                self.roster.load_failed();
            }
            Message::RenameStarted(name) => {
                self.roster.begin_rename(name);
            }
            Message::RenameInput(value) => {
                self.roster.rename_input(value);
            }
            Message::RenameCancelled => {
                self.roster.cancel_rename();
            }
            Message::RenameSubmitted => {
                if let Some((old, new)) = self.roster.take_rename_request() {
                    let api = self.api.clone();
                    let new_name = new.clone();
                    return Task::perform(
                        async move {
                            api.rename_user(&old, &new)
                                .await
                                .map_err(|e| e.user_message())
                        },
                        move |outcome| Message::RenameFinished {
                            new_name: new_name.clone(),
                            outcome,
                        },
                    );
                }
            }
            Message::RenameFinished { new_name, outcome } => match outcome {
                Ok(()) => {
                    self.toasts.success(format!("Renamed to {new_name}"));
                    return Task::done(Message::RosterRefresh);
                }
                Err(e) => self.toasts.error(e),
            },
            Message::DeleteRequested(name) => {
                if self.roster.begin_delete(name.clone()) {
                    return Task::perform(confirm_delete(name), Message::DeleteConfirmed);
                }
            }
            Message::DeleteConfirmed(confirmed) => {
                if let Some(name) = self.roster.confirm_delete(confirmed) {
                    let api = self.api.clone();
                    let target = name.clone();
                    return Task::perform(
                        async move {
                            api.delete_user(&target)
                                .await
                                .map_err(|e| e.user_message())
                        },
                        move |outcome| Message::DeleteFinished {
                            name: name.clone(),
                            outcome,
                        },
                    );
                }
            }
            Message::DeleteFinished { name, outcome } => match outcome {
                Ok(()) => {
                    self.toasts.success(format!("{name} removed"));
                    return Task::done(Message::RosterRefresh);
                }
                Err(e) => self.toasts.error(e),
            },
            Message::WizardOpened => {
                self.wizard = Some(WizardState::new());
            }
            Message::WizardClosed => {
                self.wizard = None;
            }
            Message::WizardNameChanged(value) => {
                if let Some(wizard) = &mut self.wizard {
                    wizard.draft.set_name(value);
                }
            }
            Message::WizardNameConfirmed => {
                if let Some(wizard) = &mut self.wizard {
                    if let Err(e) = wizard.draft.confirm_name() {
                        self.toasts.error(e.to_string());
                    }
                }
            }
            Message::WizardBackToName => {
                if let Some(wizard) = &mut self.wizard {
                    wizard.draft.back_to_name();
                }
            }
            Message::WizardShotTaken => {
                if let Some(wizard) = &mut self.wizard {
                    match self.feed.current_snapshot() {
                        Some(snapshot) => wizard
                            .add_photo(CapturedPhoto::from_snapshot(snapshot, PhotoOrigin::Camera)),
                        None => debug!("shutter pressed with no frame available"),
                    }
                }
            }
            Message::WizardPickFiles => {
                return Task::perform(pick_photos(), |(photos, skipped)| Message::WizardFilesPicked {
                    photos,
                    skipped,
                });
            }
            Message::WizardFilesPicked { photos, skipped } => {
                if let Some(wizard) = &mut self.wizard {
                    for photo in photos {
                        wizard.add_photo(photo);
                    }
                }
                if skipped > 0 {
                    self.toasts.error(if skipped == 1 {
                        "Skipped 1 unreadable file".to_string()
                    } else {
                        format!("Skipped {skipped} unreadable files")
                    });
                }
            }
            Message::WizardPhotoRemoved(index) => {
                if let Some(wizard) = &mut self.wizard {
                    wizard.remove_photo(index);
                }
            }
            Message::WizardReview => {
                if let Some(wizard) = &mut self.wizard {
                    if let Err(e) = wizard.draft.proceed_to_review() {
                        self.toasts.error(e.to_string());
                    }
                }
            }
            Message::WizardBackToCapture => {
                if let Some(wizard) = &mut self.wizard {
                    wizard.draft.back_to_capture();
                }
            }
            Message::WizardSubmitted => {
                if let Some(wizard) = &mut self.wizard {
                    match wizard.draft.begin_submit() {
                        Ok(request) => {
                            let api = self.api.clone();
                            return Task::perform(
                                async move {
                                    let SubmitRequest { name, images } = request;
                                    api.register_multiple(&name, images)
                                        .await
                                        .map_err(|e| e.user_message())
                                },
                                Message::WizardFinished,
                            );
                        }
                        Err(e) => self.toasts.error(e.to_string()),
                    }
                }
            }
            Message::WizardFinished(result) => {
                if let Some(wizard) = &mut self.wizard {
                    wizard.draft.finish_submit(result);
                    match wizard.draft.outcome() {
                        Some(SubmitOutcome::Accepted { message }) => {
                            self.toasts.success(message.clone());
                            return Task::done(Message::RosterRefresh);
                        }
                        Some(SubmitOutcome::Rejected { message }) => {
                            self.toasts.error(message.clone());
                        }
                        None => {}
                    }
                }
            }
            Message::AppearanceCycled => {
                self.settings.appearance = self.settings.appearance.next();
                self.settings.save();
            }
            Message::OpenApiDocs => {
                let _ = open::that(format!(
                    "{}/docs",
                    self.settings.backend_url.trim_end_matches('/')
                ));
            }
            Message::ToastDismissed(id) => {
                self.toasts.dismiss(id);
            }
            Message::ToastTick => {
                self.toasts.sweep(Instant::now());
            }
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let theme = self.theme();

        let main = row![
            container(camera_panel::view(
                &self.feed,
                &self.detector,
                self.rate.rate(Instant::now()),
                self.backend_online,
                &theme,
            ))
            .width(Length::FillPortion(5)),
            column![
                faces_panel::view(self.detector.results(), self.detector.is_polling(), &theme),
                roster_panel::view(&self.roster, &theme),
            ]
            .spacing(16)
            .width(Length::FillPortion(3)),
        ]
        .spacing(16)
        .height(Length::Fill);

        let footer = container(
            button(text("Backend API docs").size(11))
                .on_press(Message::OpenApiDocs)
                .style(button::text),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding([4, 0]);

        let base = column![
            self.header(&theme),
            container(main).padding([0, 16]).height(Length::Fill),
            footer,
        ]
        .height(Length::Fill);

        let mut layers = stack![base];
        if let Some(wizard) = &self.wizard {
            layers = layers.push(modal_layer(wizard::view(wizard, &self.feed, &theme)));
        }
        if !self.toasts.is_empty() {
            layers = layers.push(toast::view(&self.toasts, &theme));
        }
        layers.into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![
            iced::time::every(HEALTH_INTERVAL).map(|_| Message::HealthTick),
            iced::time::every(self.feed.refresh_interval()).map(|_| Message::FeedTick),
        ];
        if self.detector.is_polling() {
            subs.push(iced::time::every(ANALYZE_INTERVAL).map(|_| Message::DetectTick));
        }
        if !self.toasts.is_empty() {
            subs.push(iced::time::every(Duration::from_millis(500)).map(|_| Message::ToastTick));
        }
        if self.settings.appearance == Appearance::System {
            subs.push(iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme));
        }
        Subscription::batch(subs)
    }

    fn header(&self, theme: &Theme) -> Element<'_, Message> {
        let palette = theme.extended_palette();
        let (dot, status_label) = if self.backend_online {
            (palette.success.base.color, "Backend online")
        } else {
            (palette.danger.base.color, "Backend offline")
        };

        row![
            text("FaceDeck").size(20).font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::DEFAULT
            }),
            Space::new().width(14),
            text("\u{25CF}").size(10).color(dot),
            Space::new().width(6),
            text(status_label).size(12).color(theme::muted_color(theme)),
            Space::new().width(Length::Fill),
            button(text(self.settings.appearance.to_string()).size(12))
                .on_press(Message::AppearanceCycled)
                .padding([6, 12])
                .style(button::secondary),
            Space::new().width(10),
            button(text("Register Face").size(13))
                .on_press(Message::WizardOpened)
                .padding([8, 18]),
        ]
        .padding(16)
        .align_y(iced::Alignment::Center)
        .into()
    }
}

fn build_client(backend_url: &str) -> (ApiClient, Option<String>) {
    match ApiClient::new(&ApiConfig::with_base_url(backend_url)) {
        Ok(client) => (client, None),
        Err(e) => {
            let fallback =
                ApiClient::new(&ApiConfig::default()).expect("default backend address is valid");
            (fallback, Some(format!("Bad backend URL in settings: {e}")))
        }
    }
}

fn modal_layer(content: Element<'_, Message>) -> Element<'_, Message> {
    opaque(
        mouse_area(
            center(opaque(content)).style(|_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(Color {
                    a: 0.6,
                    ..Color::BLACK
                })),
                ..container::Style::default()
            }),
        )
        .on_press(Message::WizardClosed),
    )
}

async fn confirm_delete(name: String) -> bool {
    let result = rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Remove registered user")
        .set_description(format!(
            "Delete {name}? All stored face data for this user is removed."
        ))
        .set_buttons(rfd::MessageButtons::OkCancel)
        .show()
        .await;
    matches!(result, rfd::MessageDialogResult::Ok)
}

async fn pick_photos() -> (Vec<CapturedPhoto>, usize) {
    let Some(handles) = rfd::AsyncFileDialog::new()
        .set_title("Add face photos")
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "webp"])
        .pick_files()
        .await
    else {
        return (Vec::new(), 0);
    };

    let mut photos = Vec::new();
    let mut skipped = 0;
    for handle in handles {
        let bytes = handle.read().await;
        match Snapshot::from_encoded(bytes) {
            Ok(snapshot) => photos.push(CapturedPhoto::from_snapshot(snapshot, PhotoOrigin::File)),
            Err(e) => {
                warn!("skipping {}: {e}", handle.file_name());
                skipped += 1;
            }
        }
    }
    (photos, skipped)
}
