/// Stats card: disk usage bar and library totals
use iced::widget::{button, canvas, column, row, text, tooltip};
use iced::{Alignment, Element, Length};

use super::card;
use super::disk_bar::DiskBar;
use crate::state::stats::StatsView;
use crate::Message;

pub fn view<'a>(stats: &'a StatsView, loading: bool) -> Element<'a, Message> {
    let bar = canvas(DiskBar {
        percent: stats.percent_used,
        level: stats.level,
    })
    .width(Length::Fill)
    .height(12);

    let caption = text(&stats.caption).size(13);
    let caption: Element<Message> = match &stats.detail {
        Some(detail) => tooltip(caption, text(detail.clone()).size(13), tooltip::Position::Bottom).into(),
        None => caption.into(),
    };

    let totals = row![
        column![text("Files").size(12), text(&stats.total_files).size(20)].spacing(2),
        column![text("Albums").size(12), text(&stats.total_albums).size(20)].spacing(2),
    ]
    .spacing(32);

    let refresh = button(text(if loading { "Refreshing..." } else { "Refresh" }).size(13))
        .style(button::secondary)
        .on_press_maybe((!loading).then_some(Message::RefreshStats));

    let body = column![
        bar,
        caption,
        row![totals, iced::widget::horizontal_space(), refresh].align_y(Alignment::Center),
    ]
    .spacing(10);

    card("Storage", body)
}
