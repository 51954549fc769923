/// Album → article navigation
///
/// Two dependent dropdowns plus the file list they drive. Every fetch gets
/// a ticket; a reply is applied only if its ticket is still the latest one
/// issued for that dropdown (or for the file list), so a slow reply for a
/// previous selection can never overwrite the current one.

use super::library::{self, LinkList, ListMode};
use super::data::FileRecord;
use crate::error::AdminError;

/// Request token. Compared for equality against the latest issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct TicketCounter {
    latest: u64,
}

impl TicketCounter {
    fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Invalidate every outstanding ticket without issuing a request.
    fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// Options of one dropdown.
#[derive(Debug, Clone, PartialEq)]
pub enum Dropdown {
    /// Article dropdown before an album is chosen.
    Disabled,
    Loading,
    Ready(Vec<String>),
    /// Single "load error" option; the rest of the UI stays usable.
    Error,
}

impl Dropdown {
    pub fn options(&self) -> &[String] {
        match self {
            Dropdown::Ready(options) => options,
            _ => &[],
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Dropdown::Ready(_) | Dropdown::Error)
    }
}

/// A file-list fetch to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesRequest {
    pub ticket: Ticket,
    pub mode: ListMode,
}

/// Which delete buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteButtons {
    pub album: bool,
    pub article: bool,
}

#[derive(Debug)]
pub struct Selection {
    pub albums: Dropdown,
    pub articles: Dropdown,
    album: Option<String>,
    article: Option<String>,
    /// What the files panel shows.
    pub list: LinkList,
    /// Panel title; `None` means the default heading.
    pub title: Option<String>,
    /// Mode of the list currently shown or loading.
    shown: Option<ListMode>,
    album_tickets: TicketCounter,
    article_tickets: TicketCounter,
    file_tickets: TicketCounter,
    can_upload: bool,
}

impl Selection {
    pub fn new(can_upload: bool) -> Self {
        Self {
            albums: Dropdown::Loading,
            articles: Dropdown::Disabled,
            album: None,
            article: None,
            list: LinkList::placeholder(can_upload),
            title: None,
            shown: None,
            album_tickets: TicketCounter::default(),
            article_tickets: TicketCounter::default(),
            file_tickets: TicketCounter::default(),
            can_upload,
        }
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn article(&self) -> Option<&str> {
        self.article.as_deref()
    }

    /// Pure function of the selection.
    pub fn delete_buttons(&self) -> DeleteButtons {
        DeleteButtons {
            album: self.album.is_some(),
            article: self.album.is_some() && self.article.is_some(),
        }
    }

    /// Start (re)loading the album dropdown.
    pub fn load_albums(&mut self) -> Ticket {
        self.albums = Dropdown::Loading;
        self.album_tickets.issue()
    }

    /// Apply an album-list reply. Returns false when the reply was stale.
    ///
    /// A selected album that is no longer listed is dropped together with
    /// its article selection and the file list it drove.
    pub fn albums_loaded(&mut self, ticket: Ticket, result: Result<Vec<String>, AdminError>) -> bool {
        if !self.album_tickets.is_current(ticket) {
            return false;
        }

        match result {
            Ok(albums) => {
                if let Some(album) = &self.album {
                    if !albums.contains(album) {
                        self.album = None;
                        self.article = None;
                        self.articles = Dropdown::Disabled;
                        self.article_tickets.invalidate();
                        self.clear_list();
                    }
                }
                self.albums = Dropdown::Ready(albums);
            }
            Err(_) => {
                self.albums = Dropdown::Error;
            }
        }
        true
    }

    /// Album dropdown changed.
    ///
    /// Clears the article selection, disables the article dropdown and the
    /// file list. Returns the ticket for the article fetch, or `None` when
    /// the selection was cleared.
    pub fn select_album(&mut self, album: Option<String>) -> Option<Ticket> {
        self.album = album.filter(|a| !a.is_empty());
        self.article = None;
        self.clear_list();

        if self.album.is_some() {
            self.articles = Dropdown::Loading;
            Some(self.article_tickets.issue())
        } else {
            self.articles = Dropdown::Disabled;
            self.article_tickets.invalidate();
            None
        }
    }

    /// Apply an article-list reply.
    ///
    /// On success and on failure alike the album's files are fetched next;
    /// `None` means the reply was stale and nothing should happen.
    pub fn articles_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<String>, AdminError>,
    ) -> Option<FilesRequest> {
        if !self.article_tickets.is_current(ticket) {
            return None;
        }
        let album = self.album.clone()?;

        self.articles = match result {
            Ok(articles) => {
                if let Some(article) = &self.article {
                    if !articles.contains(article) {
                        self.article = None;
                    }
                }
                Dropdown::Ready(articles)
            }
            Err(_) => Dropdown::Error,
        };

        Some(self.request_files(ListMode::new(album, self.article.clone())))
    }

    /// Reload the article dropdown of the current album, keeping the file
    /// list as it is.
    pub fn reload_articles(&mut self) -> Option<Ticket> {
        self.album.as_ref()?;
        self.articles = Dropdown::Loading;
        Some(self.article_tickets.issue())
    }

    /// Article dropdown changed. `None` (or empty) means "all articles".
    pub fn select_article(&mut self, article: Option<String>) -> Option<FilesRequest> {
        self.article = article.filter(|a| !a.is_empty());
        let album = self.album.clone()?;
        Some(self.request_files(ListMode::new(album, self.article.clone())))
    }

    /// Show an album's files without touching the dropdowns
    /// (after an archive upload).
    pub fn show_album(&mut self, album: impl Into<String>) -> FilesRequest {
        self.request_files(ListMode::new(album, None))
    }

    fn request_files(&mut self, mode: ListMode) -> FilesRequest {
        self.list = LinkList::Loading;
        self.title = None;
        self.shown = Some(mode.clone());
        FilesRequest {
            ticket: self.file_tickets.issue(),
            mode,
        }
    }

    /// Apply a file-list reply. Returns false when stale.
    pub fn files_loaded(&mut self, ticket: Ticket, result: Result<Vec<FileRecord>, AdminError>) -> bool {
        if !self.file_tickets.is_current(ticket) {
            return false;
        }
        let Some(mode) = &self.shown else {
            return false;
        };

        self.list = match result {
            Ok(files) => library::render(files, mode),
            Err(err) => LinkList::Failed(format!("Failed to load files: {}", err)),
        };
        true
    }

    /// Apply a count reply for the list's title. Stale counts are ignored.
    pub fn count_loaded(&mut self, ticket: Ticket, count: u64) -> bool {
        if !self.file_tickets.is_current(ticket) {
            return false;
        }
        self.title = self.shown.as_ref().map(|mode| mode.title(count));
        true
    }

    /// Users without the view-files right get a fixed message instead of a list.
    pub fn deny_files(&mut self) {
        self.file_tickets.invalidate();
        self.list = LinkList::Denied;
    }

    /// Drop the file list back to its placeholder.
    pub fn clear_list(&mut self) {
        self.file_tickets.invalidate();
        self.shown = None;
        self.title = None;
        self.list = LinkList::placeholder(self.can_upload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::{ListEntry, EMPTY_STATE_TEXT};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn record(filename: &str, article: &str) -> FileRecord {
        FileRecord {
            filename: filename.to_string(),
            album_name: "A".to_string(),
            article_number: article.to_string(),
            public_link: format!("https://pics.example.com/{}", filename),
            created_at: None,
            thumbnail_url: None,
            preview_url: None,
            file_size: 0,
        }
    }

    fn selection_with_albums() -> Selection {
        let mut selection = Selection::new(true);
        let ticket = selection.load_albums();
        assert!(selection.albums_loaded(ticket, Ok(names(&["X", "Y"]))));
        selection
    }

    #[test]
    fn test_album_change_clears_and_disables_articles() {
        let mut selection = selection_with_albums();
        assert_eq!(selection.album(), None);

        let ticket = selection.select_album(Some("X".to_string())).unwrap();
        assert_eq!(selection.album(), Some("X"));
        assert_eq!(selection.articles, Dropdown::Loading);
        assert!(!selection.articles.is_enabled());
        assert_eq!(selection.list, LinkList::placeholder(true));

        let request = selection
            .articles_loaded(ticket, Ok(names(&["a1", "a2"])))
            .unwrap();
        assert_eq!(request.mode, ListMode::new("X", None));
        assert!(selection.articles.is_enabled());
        assert_eq!(selection.list, LinkList::Loading);

        let request = selection.select_article(Some("a1".to_string())).unwrap();
        assert_eq!(selection.article(), Some("a1"));
        assert_eq!(request.mode, ListMode::new("X", Some("a1".to_string())));

        // switching album drops the article
        selection.select_album(Some("Y".to_string()));
        assert_eq!(selection.article(), None);
        assert_eq!(selection.album(), Some("Y"));
    }

    #[test]
    fn test_stale_article_reply_is_discarded() {
        let mut selection = selection_with_albums();

        let x_ticket = selection.select_album(Some("X".to_string())).unwrap();
        let y_ticket = selection.select_album(Some("Y".to_string())).unwrap();

        // X's reply arrives after Y was selected
        assert!(selection.articles_loaded(x_ticket, Ok(names(&["x-only"]))).is_none());
        assert_eq!(selection.articles, Dropdown::Loading);

        let request = selection
            .articles_loaded(y_ticket, Ok(names(&["y1"])))
            .unwrap();
        assert_eq!(selection.articles.options(), names(&["y1"]).as_slice());
        assert_eq!(request.mode.album(), "Y");
    }

    #[test]
    fn test_stale_files_reply_is_discarded() {
        let mut selection = selection_with_albums();
        let ticket = selection.select_album(Some("X".to_string())).unwrap();
        let first = selection.articles_loaded(ticket, Ok(names(&["a1"]))).unwrap();
        let second = selection.select_article(Some("a1".to_string())).unwrap();

        assert!(!selection.files_loaded(first.ticket, Ok(vec![record("old_1.jpg", "a0")])));
        assert_eq!(selection.list, LinkList::Loading);

        assert!(selection.files_loaded(second.ticket, Ok(vec![record("new_1.jpg", "a1")])));
        assert_eq!(selection.list.file_count(), 1);
    }

    #[test]
    fn test_article_error_keeps_ui_usable() {
        let mut selection = selection_with_albums();
        let ticket = selection.select_album(Some("X".to_string())).unwrap();

        let request = selection.articles_loaded(
            ticket,
            Err(AdminError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(selection.articles, Dropdown::Error);
        assert!(selection.articles.is_enabled());
        // files are still fetched for the album
        assert!(request.is_some());
        assert_eq!(selection.albums, Dropdown::Ready(names(&["X", "Y"])));
    }

    #[test]
    fn test_album_list_error() {
        let mut selection = Selection::new(false);
        let ticket = selection.load_albums();
        selection.albums_loaded(ticket, Err(AdminError::Network("refused".to_string())));
        assert_eq!(selection.albums, Dropdown::Error);
        assert!(selection.albums.options().is_empty());
    }

    #[test]
    fn test_delete_buttons_follow_selection() {
        let mut selection = selection_with_albums();
        assert_eq!(
            selection.delete_buttons(),
            DeleteButtons { album: false, article: false }
        );

        let ticket = selection.select_album(Some("X".to_string())).unwrap();
        assert_eq!(
            selection.delete_buttons(),
            DeleteButtons { album: true, article: false }
        );

        selection.articles_loaded(ticket, Ok(names(&["a1"])));
        selection.select_article(Some("a1".to_string()));
        assert_eq!(
            selection.delete_buttons(),
            DeleteButtons { album: true, article: true }
        );

        // "all articles"
        selection.select_article(Some(String::new()));
        assert_eq!(
            selection.delete_buttons(),
            DeleteButtons { album: true, article: false }
        );
    }

    #[test]
    fn test_empty_album_shows_empty_state() {
        let mut selection = selection_with_albums();
        let ticket = selection.select_album(Some("A".to_string())).unwrap();
        let request = selection.articles_loaded(ticket, Ok(Vec::new())).unwrap();
        selection.files_loaded(request.ticket, Ok(Vec::new()));

        assert_eq!(selection.list, LinkList::Empty);
        assert_eq!(selection.list.file_count(), 0);
        assert_eq!(EMPTY_STATE_TEXT, "No files in the selected category.");
    }

    #[test]
    fn test_count_sets_title_for_current_list_only() {
        let mut selection = selection_with_albums();
        let stale = selection.show_album("X");
        let current = selection.show_album("Y");

        assert!(!selection.count_loaded(stale.ticket, 10));
        assert!(selection.title.is_none());
        assert!(selection.count_loaded(current.ticket, 4));
        assert_eq!(selection.title.as_deref(), Some("Images in \"Y\" - 4 files"));
    }

    #[test]
    fn test_deleted_album_disappears_from_selection() {
        let mut selection = selection_with_albums();
        selection.select_album(Some("X".to_string()));

        let ticket = selection.load_albums();
        selection.albums_loaded(ticket, Ok(names(&["Y"])));
        assert_eq!(selection.album(), None);
        assert_eq!(selection.articles, Dropdown::Disabled);
    }

    #[test]
    fn test_vanished_album_takes_its_files_along() {
        let mut selection = selection_with_albums();
        let ticket = selection.select_album(Some("X".to_string())).unwrap();
        let request = selection.articles_loaded(ticket, Ok(Vec::new())).unwrap();
        assert!(selection.files_loaded(request.ticket, Ok(vec![record("x_1.jpg", "")])));
        assert!(selection.count_loaded(request.ticket, 1));
        assert_eq!(selection.list.file_count(), 1);

        // a second fetch for X is still in flight when X disappears
        let in_flight = selection.select_article(None).unwrap();
        let ticket = selection.load_albums();
        selection.albums_loaded(ticket, Ok(names(&["Y"])));

        assert_eq!(selection.album(), None);
        assert_eq!(selection.list, LinkList::placeholder(true));
        assert!(selection.title.is_none());
        assert!(!selection.files_loaded(in_flight.ticket, Ok(vec![record("x_2.jpg", "")])));
        assert_eq!(selection.list.file_count(), 0);
    }

    #[test]
    fn test_files_failure_renders_error_text() {
        let mut selection = selection_with_albums();
        let request = selection.show_album("X");
        selection.files_loaded(request.ticket, Err(AdminError::Network("reset".to_string())));
        match &selection.list {
            LinkList::Failed(message) => assert!(message.contains("reset")),
            other => panic!("unexpected list: {:?}", other),
        }
        assert!(!selection.list.entries().iter().any(|e| matches!(e, ListEntry::File(_))));
    }
}
