use std::path::PathBuf;
use std::sync::mpsc::TrySendError;

use engine::{
    Command, DragKind, EngineErrorKind, Event, PlaybackClock, PlaybackController,
    RangeSelector, TrimmerConfig, format_time, scrubber,
};
use iced::time::Instant;
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Element, Length, Subscription, Task};
use tracing::{debug, warn};

use crate::bridge::{BridgeEvent, EngineCommandSender, engine_subscription};
use crate::widgets::preview::{self, PreviewImage};
use crate::widgets::timeline::{self, TimelineInteraction};
use crate::widgets::trim_bar::{self, TrimBarInteraction};

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    SourcePathChanged(String),
    OpenPressed,
    Tick(Instant),
    TogglePlay,
    ToggleMute,
    Timeline(TimelineInteraction),
    TrimBar(TrimBarInteraction),
    Bridge(BridgeEvent),
}

/// Root UI state.
pub struct AppState {
    config: TrimmerConfig,
    engine_tx: Option<EngineCommandSender>,
    source_path: String,
    loaded_source: Option<PathBuf>,
    controller: PlaybackController<PlaybackClock>,
    selector: RangeSelector,
    thumbnails: Vec<PreviewImage>,
    preview: Option<PreviewImage>,
    last_tick: Option<Instant>,
    pending_preview: Option<f64>,
    preview_request_in_flight: bool,
    status: String,
}

impl AppState {
    /// Boots the app. The configured source is opened once the engine bridge
    /// is ready.
    pub fn boot(config: TrimmerConfig, config_error: Option<String>) -> (Self, Task<Message>) {
        let status = match config_error {
            Some(error) => format!("using default settings: {error}"),
            None => String::from("starting engine bridge"),
        };
        (Self::with_config(config, None, status), Task::none())
    }

    fn with_config(
        config: TrimmerConfig,
        engine_tx: Option<EngineCommandSender>,
        status: String,
    ) -> Self {
        Self {
            source_path: config.media_path.display().to_string(),
            config,
            engine_tx,
            loaded_source: None,
            controller: PlaybackController::new(PlaybackClock::default()),
            selector: RangeSelector::new(),
            thumbnails: Vec::new(),
            preview: None,
            last_tick: None,
            pending_preview: None,
            preview_request_in_flight: false,
            status,
        }
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SourcePathChanged(path) => {
                self.source_path = path;
            }
            Message::OpenPressed => {
                self.open_source();
            }
            Message::Tick(now) => {
                self.advance_clock(now);
            }
            Message::TogglePlay => {
                self.controller.toggle_play();
                self.queue_preview(self.controller.state().current_time);
            }
            Message::ToggleMute => {
                self.controller.toggle_mute();
            }
            Message::Timeline(TimelineInteraction::Clicked { x, width }) => {
                if let Some(position) = scrubber::click_to_seek(x, width, &mut self.controller) {
                    self.queue_preview(position);
                }
            }
            Message::TrimBar(interaction) => {
                self.apply_trim_bar(interaction);
            }
            Message::Bridge(BridgeEvent::Ready(sender)) => {
                self.engine_tx = Some(sender);
                self.status = String::from("engine ready");
                self.open_source();
            }
            Message::Bridge(BridgeEvent::Event(event)) => {
                self.apply_engine_event(event);
            }
            Message::Bridge(BridgeEvent::Disconnected) => {
                self.status = String::from("engine event channel closed");
                self.engine_tx = None;
                self.pending_preview = None;
                self.preview_request_in_flight = false;
            }
        }

        Task::none()
    }

    fn open_source(&mut self) {
        let path = self.source_path.trim().to_owned();
        if path.is_empty() {
            self.status = String::from("video path is empty");
        } else if self.send_command(Command::Load {
            path: PathBuf::from(&path),
        }) {
            self.status = format!("opening {path}");
        }
    }

    fn advance_clock(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        let events = self.controller.media_mut().advance(elapsed);
        if events.is_empty() {
            return;
        }
        for event in events {
            self.controller.handle_event(event);
        }
        self.queue_preview(self.controller.state().current_time);
    }

    fn apply_trim_bar(&mut self, interaction: TrimBarInteraction) {
        match interaction {
            TrimBarInteraction::Pressed { kind, x } => {
                if self.selector.pointer_down(kind, x, &mut self.controller) {
                    debug!(?kind, x, "trim drag started");
                }
            }
            TrimBarInteraction::Dragged { x, width } => {
                let Some(range) = self.selector.pointer_move(x, width, &mut self.controller)
                else {
                    return;
                };
                let dragging_end = self
                    .selector
                    .session()
                    .is_some_and(|session| session.kind == DragKind::EndHandle);
                let shown = if dragging_end {
                    range.end
                } else {
                    self.controller.state().current_time
                };
                self.queue_preview(shown);
            }
            TrimBarInteraction::Released => {
                if self.selector.pointer_up(&mut self.controller) {
                    let trim = self.controller.trim();
                    debug!(start = trim.start, end = trim.end, "trim drag finished");
                    self.queue_preview(self.controller.state().current_time);
                }
            }
        }
    }

    fn send_command(&mut self, command: Command) -> bool {
        if let Some(sender) = &self.engine_tx {
            match sender.try_send(command) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    self.status = String::from("engine command queue is full");
                    false
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.status = String::from("engine command channel closed");
                    self.engine_tx = None;
                    self.preview_request_in_flight = false;
                    false
                }
            }
        } else {
            self.status = String::from("engine is not ready");
            false
        }
    }

    fn queue_preview(&mut self, at_seconds: f64) {
        if self.loaded_source.is_none() {
            return;
        }
        self.pending_preview = Some(at_seconds);
        self.flush_preview_request();
    }

    /// Keeps at most one decode in flight; newer positions replace the
    /// pending one.
    fn flush_preview_request(&mut self) {
        if self.preview_request_in_flight {
            return;
        }

        let Some(at_seconds) = self.pending_preview.take() else {
            return;
        };

        if let Some(sender) = &self.engine_tx {
            match sender.try_send(Command::DecodePreview { at_seconds }) {
                Ok(()) => {
                    self.preview_request_in_flight = true;
                }
                Err(TrySendError::Full(_)) => {
                    self.pending_preview = Some(at_seconds);
                    self.status = String::from("engine command queue is full");
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.status = String::from("engine command channel closed");
                    self.engine_tx = None;
                    self.preview_request_in_flight = false;
                }
            }
        } else {
            self.pending_preview = Some(at_seconds);
            self.status = String::from("engine is not ready");
        }
    }

    fn apply_engine_event(&mut self, event: Event) {
        match event {
            Event::MediaLoaded {
                path,
                duration_seconds,
                width,
                height,
            } => {
                self.status = format!(
                    "{} ({width}x{height}, {})",
                    path.display(),
                    format_time(duration_seconds)
                );
                self.loaded_source = Some(path);
                self.thumbnails.clear();
                self.preview = None;
                self.selector = RangeSelector::new();
                self.pending_preview = None;

                let metadata = self.controller.media_mut().load(duration_seconds);
                self.controller.handle_event(metadata);

                let settings = self.config.thumbnails;
                self.send_command(Command::GenerateThumbnails { settings });
                self.queue_preview(self.controller.state().current_time);
            }
            Event::ThumbnailsReady(set) => {
                if self.loaded_source.as_deref() != Some(set.source.as_path()) {
                    debug!(source = ?set.source, "dropping thumbnails for a stale source");
                    return;
                }
                self.thumbnails = set
                    .frames
                    .iter()
                    .filter_map(PreviewImage::from_frame)
                    .collect();
            }
            Event::PreviewFrameReady { path, frame, .. } => {
                if self.loaded_source.as_ref() == Some(&path) {
                    self.preview = PreviewImage::from_frame(&frame);
                } else {
                    debug!(source = ?path, "dropping preview for a stale source");
                }
                self.preview_request_in_flight = false;
                self.flush_preview_request();
            }
            Event::Error(error) => match error.kind {
                EngineErrorKind::Thumbnails => {
                    warn!(message = %error.message, "continuing without thumbnails");
                    self.thumbnails.clear();
                    self.status = format!("thumbnails unavailable: {}", error.message);
                }
                EngineErrorKind::MediaLoad => {
                    self.status = format!("failed to open video: {}", error.message);
                    self.preview_request_in_flight = false;
                    self.flush_preview_request();
                }
                EngineErrorKind::Other => {
                    self.status = format!("error: {}", error.message);
                    self.preview_request_in_flight = false;
                    self.flush_preview_request();
                }
            },
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let state = self.controller.state();

        let source_row = row![
            text_input("video path", &self.source_path)
                .on_input(Message::SourcePathChanged)
                .on_submit(Message::OpenPressed),
            button("Open").on_press(Message::OpenPressed),
        ]
        .spacing(12);

        let video = container(preview::view(self.preview.as_ref()))
            .width(Length::Fill)
            .height(Length::Fill);

        let transport = timeline::view(
            state.current_time,
            state.duration,
            state.is_playing,
            state.is_muted,
            Message::Timeline,
            Message::TogglePlay,
            Message::ToggleMute,
        );

        let trim = trim_bar::view(
            &self.thumbnails,
            self.controller.trim(),
            state.duration,
            Message::TrimBar,
        );

        column![
            source_row,
            video,
            transport,
            trim,
            text(format!("Status: {}", self.status)),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Subscribes to engine events and the playback clock.
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            engine_subscription().map(Message::Bridge),
            iced::time::every(self.config.tick_interval()).map(Message::Tick),
        ])
    }

    #[cfg(test)]
    fn from_sender_for_test(engine_tx: EngineCommandSender) -> Self {
        Self::with_config(
            TrimmerConfig::default(),
            Some(engine_tx),
            String::from("idle"),
        )
    }
}
