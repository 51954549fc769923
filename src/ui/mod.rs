/// UI components module
///
/// Each panel renders straight from the state it is handed:
/// - Link list with lazy thumbnails (link_list.rs)
/// - Album/article selectors, export and delete (selectors.rs)
/// - Upload cards (upload.rs) and the stats card (stats.rs)
/// - Disk usage canvas (disk_bar.rs)
/// - Modal layers (overlay.rs)

pub mod disk_bar;
pub mod link_list;
pub mod overlay;
pub mod selectors;
pub mod stats;
pub mod upload;

use iced::widget::{column, container, text};
use iced::{Element, Length};

use crate::Message;

/// Titled panel.
pub fn card<'a>(title: &'a str, body: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(column![text(title).size(20), body.into()].spacing(12))
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
