use engine::range_selector::{hit_test, x_at_time};
use engine::{DragKind, TrimRange, format_time};
use iced::widget::canvas::{self, Path, Stroke};
use iced::widget::{Row, Space, container, image, stack};
use iced::{Color, ContentFit, Element, Length, Pixels, Point, Rectangle, Size, Theme, mouse};

use crate::widgets::preview::PreviewImage;

const TRIM_BAR_HEIGHT: f32 = 64.0;
const HANDLE_WIDTH: f32 = 8.0;
const OUTLINE_WIDTH: f32 = 2.0;
const LABEL_WIDTH: f32 = 40.0;

/// Pointer gesture over the trim bar, in bar-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimBarInteraction {
    Pressed { kind: DragKind, x: f32 },
    Dragged { x: f32, width: f32 },
    Released,
}

#[derive(Debug, Default)]
struct TrimBarState {
    dragging: Option<DragKind>,
}

#[derive(Debug)]
struct TrimBarOverlay<Message> {
    range: TrimRange,
    duration: f64,
    has_thumbnails: bool,
    on_interaction: fn(TrimBarInteraction) -> Message,
}

impl<Message> TrimBarOverlay<Message> {
    /// What a press at `x` would drag. The body of a full window is inert.
    fn grab_at(&self, x: f32, width: f32) -> Option<DragKind> {
        match hit_test(x, width, self.range, self.duration)? {
            DragKind::MoveWindow if self.range.is_full(self.duration) => None,
            kind => Some(kind),
        }
    }

    fn emit(&self, interaction: TrimBarInteraction) -> (canvas::event::Status, Option<Message>) {
        (
            canvas::event::Status::Captured,
            Some((self.on_interaction)(interaction)),
        )
    }
}

impl<Message> canvas::Program<Message> for TrimBarOverlay<Message> {
    type State = TrimBarState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let canvas::Event::Mouse(event) = event else {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let Some(kind) = self.grab_at(position.x, bounds.width) else {
                    return (canvas::event::Status::Ignored, None);
                };
                state.dragging = Some(kind);
                self.emit(TrimBarInteraction::Pressed {
                    kind,
                    x: position.x,
                })
            }
            // Tracked outside the bounds too, so the handle follows a fast pointer.
            mouse::Event::CursorMoved { position } if state.dragging.is_some() => {
                self.emit(TrimBarInteraction::Dragged {
                    x: position.x - bounds.x,
                    width: bounds.width,
                })
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) | mouse::Event::CursorLeft
                if state.dragging.is_some() =>
            {
                state.dragging = None;
                self.emit(TrimBarInteraction::Released)
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        if !self.has_thumbnails {
            frame.fill(
                &Path::rectangle(Point::ORIGIN, frame.size()),
                Color::from_rgb8(36, 38, 44),
            );
        }

        let Some(layout) = TrimBarLayout::new(self.range, self.duration, bounds.width) else {
            return vec![frame.into_geometry()];
        };

        let dim = Color::from_rgba8(0, 0, 0, 0.6);
        if layout.start_x > 0.0 {
            frame.fill_rectangle(Point::ORIGIN, Size::new(layout.start_x, bounds.height), dim);
        }
        if layout.end_x < bounds.width {
            frame.fill_rectangle(
                Point::new(layout.end_x, 0.0),
                Size::new(bounds.width - layout.end_x, bounds.height),
                dim,
            );
        }

        let accent = Color::from_rgb8(255, 200, 40);
        let selection = Path::rectangle(
            Point::new(layout.start_x, OUTLINE_WIDTH / 2.0),
            Size::new(
                layout.end_x - layout.start_x,
                bounds.height - OUTLINE_WIDTH,
            ),
        );
        frame.stroke(
            &selection,
            Stroke::default()
                .with_color(accent)
                .with_width(OUTLINE_WIDTH),
        );

        for handle_x in [layout.start_x, layout.end_x] {
            frame.fill_rectangle(
                Point::new(handle_left(handle_x, bounds.width), 0.0),
                Size::new(HANDLE_WIDTH, bounds.height),
                accent,
            );
        }

        frame.fill_text(canvas::Text {
            content: format_time(self.range.end),
            position: Point::new(label_left(layout.end_x), 4.0),
            color: Color::WHITE,
            size: Pixels(12.0),
            ..canvas::Text::default()
        });

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if let Some(kind) = state.dragging {
            return drag_cursor(kind);
        }

        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::None;
        };
        match self.grab_at(position.x, bounds.width) {
            Some(DragKind::MoveWindow) => mouse::Interaction::Grab,
            Some(_) => mouse::Interaction::ResizingHorizontally,
            None => mouse::Interaction::None,
        }
    }
}

fn drag_cursor(kind: DragKind) -> mouse::Interaction {
    match kind {
        DragKind::MoveWindow => mouse::Interaction::Grabbing,
        DragKind::StartHandle | DragKind::EndHandle => mouse::Interaction::ResizingHorizontally,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrimBarLayout {
    start_x: f32,
    end_x: f32,
}

impl TrimBarLayout {
    fn new(range: TrimRange, duration: f64, width: f32) -> Option<Self> {
        if width <= 0.0 || duration <= 0.0 || range.is_empty() {
            return None;
        }
        Some(Self {
            start_x: x_at_time(range.start, width, duration),
            end_x: x_at_time(range.end, width, duration),
        })
    }
}

/// Left edge of a handle centered on `x`, kept inside the bar.
fn handle_left(x: f32, width: f32) -> f32 {
    (x - HANDLE_WIDTH / 2.0).clamp(0.0, (width - HANDLE_WIDTH).max(0.0))
}

fn label_left(end_x: f32) -> f32 {
    (end_x - LABEL_WIDTH - HANDLE_WIDTH).max(0.0)
}

/// Renders the thumbnail strip with the trim overlay stacked on top.
pub fn view<'a, Message>(
    thumbnails: &'a [PreviewImage],
    range: TrimRange,
    duration: f64,
    on_interaction: fn(TrimBarInteraction) -> Message,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let strip: Element<'a, Message> = if thumbnails.is_empty() {
        Space::new(Length::Fill, Length::Fill).into()
    } else {
        Row::with_children(thumbnails.iter().map(|thumbnail| {
            image(thumbnail.handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::FillPortion(1))
                .height(Length::Fill)
                .into()
        }))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    };

    let overlay = canvas::Canvas::new(TrimBarOverlay {
        range,
        duration,
        has_thumbnails: !thumbnails.is_empty(),
        on_interaction,
    })
    .width(Length::Fill)
    .height(Length::Fill);

    container(stack![strip, overlay])
        .width(Length::Fill)
        .height(Length::Fixed(TRIM_BAR_HEIGHT))
        .into()
}
