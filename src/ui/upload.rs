/// Upload cards: ZIP archive and individual images
use iced::widget::{button, column, progress_bar, row, text};
use iced::{Alignment, Element};

use super::card;
use crate::state::upload::{ArchivePhase, ArchiveUpload, ImageBatch};
use crate::Message;

pub fn archive<'a>(upload: &'a ArchiveUpload) -> Element<'a, Message> {
    let buttons = row![
        button("Browse...").on_press_maybe((!upload.is_busy()).then_some(Message::ChooseArchive)),
        button("Upload")
            .style(button::success)
            .on_press_maybe(upload.can_submit().then_some(Message::UploadArchive)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut body = column![text(upload.summary()).size(14), buttons].spacing(10);

    if let ArchivePhase::Sending { .. } = upload.phase {
        let percent = upload.percent();
        body = body
            .push(progress_bar(0.0..=100.0, percent).height(8))
            .push(text(format!("{:.0}%", percent)).size(13));
    }

    card("Upload ZIP archive", body)
}

pub fn images<'a>(batch: &'a ImageBatch) -> Element<'a, Message> {
    let buttons = row![
        button("Browse...").on_press_maybe((!batch.is_running()).then_some(Message::ChooseImages)),
        button("Upload")
            .style(button::success)
            .on_press_maybe(batch.can_submit().then_some(Message::UploadImages)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut body = column![text(batch.caption()).size(14), buttons].spacing(10);

    if batch.is_running() {
        body = body
            .push(progress_bar(0.0..=100.0, batch.percent()).height(8))
            .push(
                text(format!(
                    "Uploading... {} of {} done",
                    batch.succeeded(),
                    batch.total()
                ))
                .size(13),
            );
    }

    card("Upload individual images", body)
}
