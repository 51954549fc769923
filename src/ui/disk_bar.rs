/// Disk usage bar
/// Horizontal fill showing how much of the image volume is used
use iced::widget::canvas::{self, Path};
use iced::{Color, Point, Rectangle, Size};

use crate::state::stats::Level;
use crate::Message;

/// Bar data
#[derive(Debug, Clone, Copy)]
pub struct DiskBar {
    /// Fill in percent (0-100)
    pub percent: f64,
    pub level: Level,
}

impl DiskBar {
    pub fn color(level: Level) -> Color {
        match level {
            Level::Ok => Color::from_rgb8(0x48, 0xBB, 0x78),
            Level::Warning => Color::from_rgb8(0xED, 0x89, 0x36),
            Level::Critical => Color::from_rgb8(0xE5, 0x3E, 0x3E),
        }
    }
}

impl canvas::Program<Message> for DiskBar {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let radius = bounds.height / 2.0;

        // Track
        let track = Path::rounded_rectangle(Point::ORIGIN, bounds.size(), radius.into());
        frame.fill(&track, Color::from_rgba(1.0, 1.0, 1.0, 0.1));

        let fraction = (self.percent / 100.0).clamp(0.0, 1.0) as f32;
        if fraction <= 0.0 {
            return vec![frame.into_geometry()];
        }

        // Fill never narrower than the rounded cap
        let width = (bounds.width * fraction).max(bounds.height);
        let fill = Path::rounded_rectangle(
            Point::ORIGIN,
            Size::new(width.min(bounds.width), bounds.height),
            radius.into(),
        );
        frame.fill(&fill, Self::color(self.level));

        vec![frame.into_geometry()]
    }
}
