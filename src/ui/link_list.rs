/// Files panel: grouped rows of thumbnail, direct link and copy button
///
/// Rows have fixed heights so the lazy loader can compute which of them
/// are inside the scroll viewport without measuring widgets.

use iced::widget::{button, column, container, image, mouse_area, row, scrollable, text, text_input, Column};
use iced::{alignment, padding, Alignment, Element, Length};
use once_cell::sync::Lazy;

use crate::media::placeholder;
use crate::media::thumbnail::THUMBNAIL_SIZE;
use crate::state::feedback::CopyFeedback;
use crate::state::lazy::{Band, LazyLoader, ThumbState};
use crate::state::library::{LinkList, ListEntry, EMPTY_STATE_TEXT, ACCESS_DENIED_TEXT};
use crate::Message;

pub const HEADER_HEIGHT: f32 = 44.0;
pub const ROW_HEIGHT: f32 = THUMBNAIL_SIZE as f32 + 20.0;

pub static LIST_ID: Lazy<scrollable::Id> = Lazy::new(scrollable::Id::unique);

/// Position of every file row inside the scrollable content, by entry index.
pub fn bands(entries: &[ListEntry]) -> Vec<(usize, Band)> {
    let mut top = 0.0;
    let mut bands = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            ListEntry::Header(_) => top += HEADER_HEIGHT,
            ListEntry::File(_) => {
                bands.push((index, Band { top, height: ROW_HEIGHT }));
                top += ROW_HEIGHT;
            }
        }
    }
    bands
}

pub fn view<'a>(list: &'a LinkList, lazy: &'a LazyLoader, copy: &'a CopyFeedback) -> Element<'a, Message> {
    let entries = match list {
        LinkList::Placeholder(hint) => return notice(hint),
        LinkList::Loading => return notice("Loading..."),
        LinkList::Denied => return notice(ACCESS_DENIED_TEXT),
        LinkList::Empty => return notice(EMPTY_STATE_TEXT),
        LinkList::Failed(message) => return notice(message),
        LinkList::Entries(entries) => entries,
    };

    let rows: Column<Message> = entries
        .iter()
        .enumerate()
        .fold(Column::new(), |rows, (index, entry)| {
            rows.push(match entry {
                ListEntry::Header(article) => header(article),
                ListEntry::File(file) => {
                    let link = &file.public_link;
                    let handle = match lazy.state(index) {
                        Some(ThumbState::Loaded(handle)) => handle.clone(),
                        _ => placeholder::handle(),
                    };
                    let label = if copy.is_copied(link) { "Copied!" } else { "Copy" };

                    let thumbnail = mouse_area(
                        image(handle)
                            .width(THUMBNAIL_SIZE as f32)
                            .height(THUMBNAIL_SIZE as f32),
                    )
                    .on_press(Message::OpenPreview(index));

                    let details = column![
                        text_input("", link).size(14),
                        row![
                            button(text(label).size(14))
                                .on_press(Message::CopyLink(link.clone()))
                                .padding([4, 12]),
                            text(file.caption()).size(13),
                        ]
                        .spacing(12)
                        .align_y(Alignment::Center),
                    ]
                    .spacing(8);

                    container(row![thumbnail, details].spacing(16).align_y(Alignment::Center))
                        .height(ROW_HEIGHT)
                        .padding([10, 0])
                        .into()
                }
            })
        });

    scrollable(rows.padding([0, 16]))
        .id(LIST_ID.clone())
        .on_scroll(Message::ListScrolled)
        .height(Length::Fill)
        .into()
}

fn header(article: &str) -> Element<'_, Message> {
    let title = if article.is_empty() { "No article" } else { article };
    container(text(format!("Article: {}", title)).size(18))
        .height(HEADER_HEIGHT)
        .align_y(alignment::Vertical::Bottom)
        .padding(padding::bottom(6))
        .into()
}

fn notice(message: &str) -> Element<'_, Message> {
    container(text(message).size(16))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
