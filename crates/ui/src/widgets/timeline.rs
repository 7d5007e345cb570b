use engine::scrubber::{progress_fraction, time_readout};
use iced::widget::canvas::{self, Path};
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Color, Element, Length, Point, Rectangle, Size, Theme, mouse};

const BAR_HEIGHT: f32 = 14.0;

/// Interaction emitted by the progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineInteraction {
    /// Left click at `x` pixels from the left edge of a bar `width` wide.
    Clicked { x: f32, width: f32 },
}

#[derive(Debug)]
struct ProgressBar<Message> {
    fraction: f32,
    enabled: bool,
    on_interaction: fn(TimelineInteraction) -> Message,
}

impl<Message> canvas::Program<Message> for ProgressBar<Message> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if !self.enabled {
            return (canvas::event::Status::Ignored, None);
        }

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let interaction = TimelineInteraction::Clicked {
                    x: position.x,
                    width: bounds.width,
                };
                (
                    canvas::event::Status::Captured,
                    Some((self.on_interaction)(interaction)),
                )
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
        let background = Path::rectangle(Point::ORIGIN, frame.size());
        frame.fill(&background, Color::from_rgb8(52, 54, 60));

        let filled = progress_width(self.fraction, bounds.width);
        if filled > 0.0 {
            frame.fill_rectangle(
                Point::ORIGIN,
                Size::new(filled, bounds.height),
                Color::from_rgb8(255, 94, 77),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.enabled && cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::None
        }
    }
}

fn progress_width(fraction: f32, width: f32) -> f32 {
    fraction.clamp(0.0, 1.0) * width.max(0.0)
}

/// Renders the progress bar with mute/play buttons and the time readout.
pub fn view<'a, Message>(
    current_time: f64,
    duration: f64,
    is_playing: bool,
    is_muted: bool,
    on_interaction: fn(TimelineInteraction) -> Message,
    on_toggle_play: Message,
    on_toggle_mute: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let fraction = progress_fraction(current_time, duration);
    let bar = canvas::Canvas::new(ProgressBar {
        fraction,
        enabled: duration > 0.0,
        on_interaction,
    })
    .width(Length::Fill)
    .height(Length::Fixed(BAR_HEIGHT));

    let controls = row![
        button(text(if is_muted { "Unmute" } else { "Mute" })).on_press(on_toggle_mute),
        button(text(if is_playing { "Pause" } else { "Play" })).on_press(on_toggle_play),
        text(time_readout(current_time, duration)),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    container(column![bar, controls].spacing(8))
        .width(Length::Fill)
        .into()
}
