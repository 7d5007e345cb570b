use engine::PreviewFrame;
use iced::widget::{container, image, text};
use iced::{ContentFit, Element, Length};

/// UI-ready image converted from an engine frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewImage {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl PreviewImage {
    /// Wraps an RGBA frame in an iced image handle, rejecting frames whose
    /// byte length does not match their size.
    pub fn from_frame(frame: &PreviewFrame) -> Option<Self> {
        let expected_bytes = frame.width.checked_mul(frame.height)?.checked_mul(4)? as usize;
        if frame.bytes.len() != expected_bytes {
            return None;
        }

        Some(Self {
            handle: image::Handle::from_rgba(frame.width, frame.height, frame.bytes.to_vec()),
            width: frame.width,
            height: frame.height,
        })
    }
}

/// Renders the video area.
pub fn view<'a, Message>(latest: Option<&PreviewImage>) -> Element<'a, Message>
where
    Message: 'a,
{
    match latest {
        Some(image_data) => image(image_data.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("No video loaded"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    }
}
