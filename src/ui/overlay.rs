/// Layers drawn above the main window: processing overlay, preview modal,
/// spreadsheet export dialog and the session-expired screen
use iced::widget::image::Handle;
use iced::widget::{
    button, center, column, container, image, mouse_area, opaque, pick_list, radio, row, stack, text,
};
use iced::{Alignment, Color, Element, Length};

use crate::state::data::FileRecord;
use crate::state::export::{Separator, XlsxOptions, XlsxTemplate};
use crate::media::preview::PREVIEW_SIZE;
use crate::Message;

/// Image overlay opened from a thumbnail.
#[derive(Debug, Clone)]
pub struct Preview {
    pub file: FileRecord,
    pub image: PreviewImage,
}

#[derive(Debug, Clone)]
pub enum PreviewImage {
    Loading,
    Ready(Handle),
    Failed,
}

/// Put `content` above `base`, dimming the rest. Clicking the backdrop
/// sends `on_blur` when given.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Option<Message>,
) -> Element<'a, Message> {
    let backdrop = mouse_area(center(opaque(content)).style(|_theme| container::Style {
        background: Some(Color { a: 0.8, ..Color::BLACK }.into()),
        ..container::Style::default()
    }));
    let backdrop = match on_blur {
        Some(message) => backdrop.on_press(message),
        None => backdrop,
    };

    let base: Element<'a, Message> = base.into();
    stack![base, opaque(backdrop)].into()
}

fn dialog<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(24)
        .max_width(520)
        .style(container::rounded_box)
        .into()
}

/// Full-screen status while the server unpacks an archive.
pub fn processing<'a>(title: &'a str, details: &'a str) -> Element<'a, Message> {
    dialog(
        column![text(title).size(24), text(details).size(15)]
            .spacing(12)
            .align_x(Alignment::Center),
    )
}

pub fn preview<'a>(preview: &'a Preview, copied: bool) -> Element<'a, Message> {
    let picture: Element<Message> = match &preview.image {
        PreviewImage::Ready(handle) => image(handle.clone())
            .width(PREVIEW_SIZE as f32)
            .height(PREVIEW_SIZE as f32)
            .into(),
        PreviewImage::Loading => center(text("Loading preview..."))
            .width(PREVIEW_SIZE as f32)
            .height(PREVIEW_SIZE as f32)
            .into(),
        PreviewImage::Failed => center(text("Preview unavailable"))
            .width(PREVIEW_SIZE as f32)
            .height(PREVIEW_SIZE as f32)
            .into(),
    };

    let link = preview.file.public_link.clone();
    let actions = row![
        button(if copied { "Copied!" } else { "Copy link" }).on_press(Message::CopyLink(link.clone())),
        button("Open original")
            .style(button::secondary)
            .on_press(Message::OpenOriginal(link)),
        iced::widget::horizontal_space(),
        button("Close").style(button::secondary).on_press(Message::ClosePreview),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    dialog(
        column![
            picture,
            text(preview.file.basename()).size(16),
            text(preview.file.preview_details()).size(13),
            actions
        ]
            .spacing(12)
            .align_x(Alignment::Center),
    )
}

pub fn xlsx_dialog<'a>(options: XlsxOptions) -> Element<'a, Message> {
    let templates = XlsxTemplate::ALL.iter().fold(column![].spacing(6), |col, template| {
        col.push(radio(
            template.to_string(),
            *template,
            Some(options.template),
            Message::XlsxTemplateChosen,
        ))
    });

    let mut body = column![text("Export to Excel").size(22), templates].spacing(14);

    if options.shows_separator() {
        body = body.push(
            row![
                text("Separator").size(14),
                pick_list(Separator::ALL, Some(options.separator), Message::XlsxSeparatorChosen),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
    }

    body = body.push(
        row![
            iced::widget::horizontal_space(),
            button("Cancel").style(button::secondary).on_press(Message::CloseXlsxDialog),
            button("Export").on_press(Message::ExportXlsx),
        ]
        .spacing(8),
    );

    dialog(body.width(Length::Fixed(360.0)))
}

/// Shown once the server rejected the session.
pub fn session_expired<'a>(login_url: &str) -> Element<'a, Message> {
    center(
        column![
            text("Your session has expired").size(28),
            text(format!("Sign in again at {} and restart the client.", login_url)).size(15),
            button("Open login page").on_press(Message::OpenLogin),
        ]
        .spacing(16)
        .align_x(Alignment::Center),
    )
    .into()
}
