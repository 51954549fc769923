/// Manage panel controls: album and article dropdowns, export and delete
use iced::widget::{button, column, pick_list, row, text};
use iced::{Alignment, Element, Length};

use crate::state::permissions::PermissionSet;
use crate::state::selection::{Dropdown, Selection};
use crate::Message;

pub const ALBUM_LOAD_ERROR: &str = "Failed to load albums";

/// Entry of the article dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleChoice {
    /// Whole album
    All,
    Article(String),
    LoadError,
}

impl std::fmt::Display for ArticleChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleChoice::All => write!(f, "All articles"),
            ArticleChoice::Article(article) => write!(f, "{}", article),
            ArticleChoice::LoadError => write!(f, "Failed to load articles"),
        }
    }
}

fn album_options(dropdown: &Dropdown) -> Vec<String> {
    match dropdown {
        Dropdown::Error => vec![ALBUM_LOAD_ERROR.to_string()],
        other => other.options().to_vec(),
    }
}

fn article_options(dropdown: &Dropdown) -> Vec<ArticleChoice> {
    match dropdown {
        Dropdown::Ready(articles) => std::iter::once(ArticleChoice::All)
            .chain(articles.iter().cloned().map(ArticleChoice::Article))
            .collect(),
        Dropdown::Error => vec![ArticleChoice::LoadError],
        Dropdown::Disabled | Dropdown::Loading => Vec::new(),
    }
}

pub fn view<'a>(selection: &'a Selection, permissions: PermissionSet) -> Element<'a, Message> {
    let album_placeholder = match selection.albums {
        Dropdown::Loading => "Loading albums...",
        _ => "Select an album",
    };
    let albums = pick_list(
        album_options(&selection.albums),
        selection.album().map(str::to_string),
        Message::AlbumSelected,
    )
    .placeholder(album_placeholder)
    .width(Length::Fill);

    let article_placeholder = match selection.articles {
        Dropdown::Disabled => "Select an album first",
        Dropdown::Loading => "Loading articles...",
        _ => "All articles",
    };
    let selected_article = selection.album().map(|_| match selection.article() {
        Some(article) => ArticleChoice::Article(article.to_string()),
        None => ArticleChoice::All,
    });
    let articles = pick_list(
        article_options(&selection.articles),
        selected_article.filter(|_| selection.articles.is_enabled()),
        Message::ArticleSelected,
    )
    .placeholder(article_placeholder)
    .width(Length::Fill);

    let selectors = row![
        column![text("Album").size(14), albums].spacing(4).width(Length::Fill),
        column![text("Article").size(14), articles].spacing(4).width(Length::Fill),
    ]
    .spacing(16);

    let has_album = selection.album().is_some();
    let deletable = selection.delete_buttons();
    let mut actions = row![].spacing(8).align_y(Alignment::Center);

    if permissions.can_export {
        actions = actions
            .push(button("Export CSV").on_press_maybe(has_album.then_some(Message::ExportCsv)))
            .push(button("Export XLSX").on_press_maybe(has_album.then_some(Message::OpenXlsxDialog)));
    }
    if permissions.can_manage_albums {
        actions = actions.push(
            button("Delete album")
                .style(button::danger)
                .on_press_maybe(deletable.album.then_some(Message::DeleteAlbum)),
        );
    }
    if permissions.can_manage_articles {
        actions = actions.push(
            button("Delete article")
                .style(button::danger)
                .on_press_maybe(deletable.article.then_some(Message::DeleteArticle)),
        );
    }

    column![selectors, actions].spacing(12).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_options() {
        let ready = Dropdown::Ready(vec!["SKU1".to_string()]);
        assert_eq!(
            article_options(&ready),
            [ArticleChoice::All, ArticleChoice::Article("SKU1".to_string())]
        );
        assert_eq!(article_options(&Dropdown::Error), [ArticleChoice::LoadError]);
        assert!(article_options(&Dropdown::Loading).is_empty());
    }

    #[test]
    fn test_album_error_option() {
        assert_eq!(album_options(&Dropdown::Error), [ALBUM_LOAD_ERROR]);
    }
}
