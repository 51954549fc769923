use iced::event::{self, Event};
use iced::keyboard::{self, key};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{window, Alignment, Element, Length, Size, Subscription, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;
use std::time::Duration;

// Declare the application modules
mod api;
mod config;
mod error;
mod logging;
mod media;
mod state;
mod ui;

use api::upload::ArchiveEvent;
use api::ApiClient;
use config::Config;
use error::AdminError;
use state::data::{FileRecord, Stats};
use state::actions::{self, Deletion};
use state::export::{ExportRequest, Separator, XlsxOptions, XlsxTemplate};
use state::feedback::{self, CopyFeedback, COPIED_FOR};
use state::lazy::{LazyLoader, LoadRequest, ViewportWatcher};
use state::library::ListEntry;
use state::permissions::{Capability, HostPage, PermissionSet};
use state::selection::{Dropdown, FilesRequest, Selection, Ticket};
use state::session::SessionGuard;
use state::stats::StatsView;
use state::upload::{ArchiveUpload, ImageBatch, ImageOutcome, PickedFile, GENERIC_ALBUM};
use ui::overlay::{Preview, PreviewImage};
use ui::selectors::{ArticleChoice, ALBUM_LOAD_ERROR};

/// Height taken by the header and panel title above the files list
const LIST_CHROME: f32 = 150.0;

/// Delay between an archive reply and showing its album
const PROCESSING_DELAY: Duration = Duration::from_secs(1);
/// Delay before the processing overlay is hidden
const OVERLAY_HIDE_DELAY: Duration = Duration::from_millis(500);
/// Refresh button stays disabled this long after stats arrive
const STATS_COOLDOWN: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    /// Waiting for the host page (capabilities)
    Connecting,
    Ready,
    SessionExpired,
}

/// Left-hand panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Upload,
    Manage,
}

/// Main application state
struct GalleryAdmin {
    config: Config,
    api: ApiClient,
    screen: Screen,
    permissions: PermissionSet,
    panel: Panel,
    selection: Selection,
    lazy: LazyLoader,
    copy: CopyFeedback,
    /// Held for the whole run; see `feedback::TextSink`
    clipboard: Option<arboard::Clipboard>,
    archive: ArchiveUpload,
    images: ImageBatch,
    stats: StatsView,
    stats_loading: bool,
    /// Open spreadsheet export dialog
    xlsx: Option<XlsxOptions>,
    preview: Option<Preview>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    HostPageLoaded(Result<String, AdminError>),
    ShowPanel(Panel),

    // Navigation
    AlbumsLoaded(Ticket, Result<Vec<String>, AdminError>),
    AlbumSelected(String),
    ArticlesLoaded(Ticket, Result<Vec<String>, AdminError>),
    ArticleSelected(ArticleChoice),
    FilesLoaded(Ticket, Result<Vec<FileRecord>, AdminError>),
    CountLoaded(Ticket, Result<u64, AdminError>),

    // Files panel
    ListScrolled(scrollable::Viewport),
    WindowResized(Size),
    ThumbnailLoaded(u64, usize, Result<Handle, AdminError>),
    CopyLink(String),
    CopyVerified { link: String, ok: bool },
    CopyExpired(String, u64),
    OpenPreview(usize),
    PreviewLoaded(String, Result<Handle, AdminError>),
    ClosePreview,
    OpenOriginal(String),
    EscapePressed,

    // Export and delete
    ExportCsv,
    OpenXlsxDialog,
    XlsxTemplateChosen(XlsxTemplate),
    XlsxSeparatorChosen(Separator),
    ExportXlsx,
    CloseXlsxDialog,
    ExportDone(Result<PathBuf, AdminError>),
    DeleteAlbum,
    AlbumDeleted(String, Result<(), AdminError>),
    DeleteArticle,
    ArticleDeleted(String, Result<(), AdminError>),

    // Uploads
    ChooseArchive,
    UploadArchive,
    Archive(ArchiveEvent),
    ShowUploadedAlbum(String),
    HideOverlay,
    ChooseImages,
    FileDropped(PathBuf),
    UploadImages,
    ImageUploaded(Result<(), AdminError>),

    // Stats and session
    RefreshStats,
    StatsLoaded(Result<Stats, AdminError>),
    StatsCooledDown,
    SessionTick,
    SessionChecked(Result<(), AdminError>),
    OpenLogin,
}

impl GalleryAdmin {
    /// Create a new instance of the application
    fn new(config: Config, api: ApiClient) -> (Self, Task<Message>) {
        tracing::info!(server = %config.server.base_url, "gallery admin starting");

        let watcher = config.ui.lazy_images.then(|| ViewportWatcher::new(800.0 - LIST_CHROME));
        let fetch = {
            let api = api.clone();
            Task::perform(async move { api.host_page().await }, Message::HostPageLoaded)
        };

        let clipboard = arboard::Clipboard::new()
            .map_err(|e| tracing::warn!("system clipboard unavailable: {e}"))
            .ok();

        let app = GalleryAdmin {
            config,
            api,
            screen: Screen::Connecting,
            permissions: PermissionSet::default(),
            panel: Panel::Upload,
            selection: Selection::new(false),
            lazy: LazyLoader::new(watcher),
            copy: CopyFeedback::default(),
            clipboard,
            archive: ArchiveUpload::default(),
            images: ImageBatch::default(),
            stats: StatsView::loading(),
            stats_loading: false,
            xlsx: None,
            preview: None,
            status: "Connecting...".to_string(),
        };

        (app, fetch)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        if self.screen == Screen::SessionExpired && !matches!(message, Message::OpenLogin) {
            return Task::none();
        }

        match message {
            Message::HostPageLoaded(result) => {
                self.permissions = match result {
                    Ok(html) => PermissionSet::from_source(&HostPage::parse(&html)),
                    Err(e) if e.is_silent() => return self.expire_session(),
                    Err(e) => {
                        // fail closed
                        tracing::error!("could not load capabilities: {e}");
                        self.status = format!("Could not reach the server: {e}");
                        PermissionSet::default()
                    }
                };
                tracing::info!(permissions = ?self.permissions, "capabilities loaded");

                self.screen = Screen::Ready;
                if self.status.starts_with("Connecting") {
                    self.status = "Ready.".to_string();
                }
                self.selection = Selection::new(self.permissions.can_upload);
                if !self.permissions.can_view_files {
                    self.selection.deny_files();
                }
                self.panel = if self.permissions.is_viewer_only() {
                    Panel::Manage
                } else {
                    Panel::Upload
                };

                let mut tasks = vec![self.load_albums()];
                if self.permissions.can_view_stats {
                    tasks.push(self.refresh_stats());
                }
                Task::batch(tasks)
            }
            Message::ShowPanel(panel) => {
                self.panel = panel;
                Task::none()
            }

            Message::AlbumsLoaded(ticket, result) => {
                if let Err(e) = &result {
                    if e.is_silent() {
                        return self.expire_session();
                    }
                    tracing::error!("failed to load albums: {e}");
                }
                if !self.selection.albums_loaded(ticket, result) {
                    return Task::none();
                }

                // viewers land on the first album
                if self.permissions.is_viewer_only() && self.selection.album().is_none() {
                    if let Some(first) = self.selection.albums.options().first().cloned() {
                        return self.select_album(first);
                    }
                }
                Task::none()
            }
            Message::AlbumSelected(album) => {
                if album == ALBUM_LOAD_ERROR && self.selection.albums == Dropdown::Error {
                    return Task::none();
                }
                self.select_album(album)
            }
            Message::ArticlesLoaded(ticket, result) => {
                if let Err(e) = &result {
                    if e.is_silent() {
                        return self.expire_session();
                    }
                    tracing::error!("failed to load articles: {e}");
                }
                match self.selection.articles_loaded(ticket, result) {
                    Some(request) => self.fetch_files(request),
                    None => Task::none(),
                }
            }
            Message::ArticleSelected(choice) => {
                let article = match choice {
                    ArticleChoice::All => None,
                    ArticleChoice::Article(article) => Some(article),
                    ArticleChoice::LoadError => return Task::none(),
                };
                match self.selection.select_article(article) {
                    Some(request) => self.fetch_files(request),
                    None => Task::none(),
                }
            }
            Message::FilesLoaded(ticket, result) => {
                if matches!(&result, Err(e) if e.is_silent()) {
                    return self.expire_session();
                }
                if let Err(e) = &result {
                    tracing::error!("failed to load files: {e}");
                }
                if !self.selection.files_loaded(ticket, result) {
                    return Task::none();
                }
                self.layout_list()
            }
            Message::CountLoaded(ticket, result) => {
                let count = match result {
                    Ok(count) => count,
                    Err(e) if e.is_silent() => return self.expire_session(),
                    Err(e) => {
                        tracing::warn!("file count failed: {e}");
                        0
                    }
                };
                self.selection.count_loaded(ticket, count);
                Task::none()
            }

            Message::ListScrolled(viewport) => {
                let requests = self
                    .lazy
                    .set_viewport(viewport.absolute_offset().y, viewport.bounds().height);
                self.load_thumbnails(requests)
            }
            Message::WindowResized(size) => {
                let requests = self.lazy.set_height((size.height - LIST_CHROME).max(0.0));
                self.load_thumbnails(requests)
            }
            Message::ThumbnailLoaded(generation, index, result) => {
                let handle = match result {
                    Ok(handle) => Some(handle),
                    Err(e) if e.is_silent() => return self.expire_session(),
                    Err(_) => None,
                };
                self.lazy.finish(generation, index, handle);
                Task::none()
            }
            Message::CopyLink(link) => {
                if feedback::copy_to(self.clipboard.as_mut(), &link) {
                    return self.copied(link);
                }
                let expected = link.clone();
                iced::clipboard::write::<Message>(link).chain(iced::clipboard::read().map(move |contents| {
                    Message::CopyVerified {
                        ok: contents.as_deref() == Some(expected.as_str()),
                        link: expected.clone(),
                    }
                }))
            }
            Message::CopyVerified { link, ok } => {
                if ok {
                    self.copied(link)
                } else {
                    tracing::error!("copy to clipboard failed");
                    alert(
                        MessageLevel::Error,
                        "Copy failed",
                        &format!("Could not copy the link. Please copy it manually:\n{}", link),
                    );
                    Task::none()
                }
            }
            Message::CopyExpired(link, token) => {
                self.copy.expire(&link, token);
                Task::none()
            }
            Message::OpenPreview(index) => {
                let Some(ListEntry::File(file)) = self.selection.list.entries().get(index) else {
                    return Task::none();
                };
                let file = file.clone();
                let url = file.preview_url();
                let filename = file.filename.clone();
                self.preview = Some(Preview {
                    file,
                    image: PreviewImage::Loading,
                });

                let api = self.api.clone();
                Task::perform(media::preview::load_preview(api, url), move |result| {
                    Message::PreviewLoaded(filename.clone(), result)
                })
            }
            Message::PreviewLoaded(filename, result) => {
                let image = match result {
                    Ok(handle) => PreviewImage::Ready(handle),
                    Err(e) if e.is_silent() => return self.expire_session(),
                    Err(e) => {
                        tracing::warn!(%filename, "preview failed: {e}");
                        PreviewImage::Failed
                    }
                };
                // the overlay may have been closed or switched meanwhile
                if let Some(preview) = self.preview.as_mut().filter(|p| p.file.filename == filename) {
                    preview.image = image;
                }
                Task::none()
            }
            Message::ClosePreview => {
                self.preview = None;
                Task::none()
            }
            Message::OpenOriginal(link) => {
                if let Err(e) = open::that(&link) {
                    tracing::error!(%link, "failed to open browser: {e}");
                    alert(MessageLevel::Error, "Open failed", &format!("Could not open {}: {}", link, e));
                }
                Task::none()
            }
            Message::EscapePressed => {
                if self.preview.is_some() {
                    self.preview = None;
                } else {
                    self.xlsx = None;
                }
                Task::none()
            }

            Message::ExportCsv => match actions::export(&self.permissions, &self.selection, None) {
                Ok(request) => self.export(request),
                Err(e) => self.report("Export", &e),
            },
            Message::OpenXlsxDialog => match actions::export_target(&self.permissions, &self.selection) {
                Ok(_) => {
                    self.xlsx = Some(XlsxOptions::default());
                    Task::none()
                }
                Err(e) => self.report("Export", &e),
            },
            Message::XlsxTemplateChosen(template) => {
                if let Some(options) = &mut self.xlsx {
                    options.template = template;
                }
                Task::none()
            }
            Message::XlsxSeparatorChosen(separator) => {
                if let Some(options) = &mut self.xlsx {
                    options.separator = separator;
                }
                Task::none()
            }
            Message::ExportXlsx => {
                let Some(options) = self.xlsx.take() else {
                    return Task::none();
                };
                match actions::export(&self.permissions, &self.selection, Some(options)) {
                    Ok(request) => self.export(request),
                    Err(e) => self.report("Export", &e),
                }
            }
            Message::CloseXlsxDialog => {
                self.xlsx = None;
                Task::none()
            }
            Message::ExportDone(result) => match result {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "export saved");
                    self.status = format!("✅ Saved {}", path.display());
                    Task::none()
                }
                Err(e) => self.report("Export failed", &e),
            },
            Message::DeleteAlbum => match actions::delete_album(&self.permissions, &self.selection) {
                Ok(deletion) => self.delete(deletion),
                Err(e) => self.report("Delete album", &e),
            },
            Message::AlbumDeleted(album, result) => match result {
                Ok(()) => {
                    tracing::info!(%album, "album deleted");
                    self.status = format!("Album \"{}\" deleted.", album);
                    self.selection.clear_list();
                    self.lazy.reset();
                    self.load_albums()
                }
                Err(e) => self.report("Delete album failed", &e),
            },
            Message::DeleteArticle => match actions::delete_article(&self.permissions, &self.selection) {
                Ok(deletion) => self.delete(deletion),
                Err(e) => self.report("Delete article", &e),
            },
            Message::ArticleDeleted(article, result) => match result {
                Ok(()) => {
                    tracing::info!(%article, "article deleted");
                    self.status = format!("Article \"{}\" deleted.", article);
                    self.selection.clear_list();
                    self.lazy.reset();
                    // the reply re-renders the album once the deleted
                    // article has dropped out of the selection
                    match self.selection.reload_articles() {
                        Some(ticket) => self.fetch_articles(ticket),
                        None => Task::none(),
                    }
                }
                Err(e) => self.report("Delete article failed", &e),
            },

            Message::ChooseArchive => {
                if let Err(e) = self.permissions.require(Capability::Upload) {
                    return self.report("Upload", &e);
                }
                let file = FileDialog::new()
                    .set_title("Select ZIP archive")
                    .add_filter("ZIP archive", &["zip", "ZIP"])
                    .pick_file();
                if let Some(path) = file {
                    let chosen = PickedFile::from_path(&path).and_then(|file| self.archive.choose(file));
                    if let Err(e) = chosen {
                        return self.report("Upload", &e);
                    }
                }
                Task::none()
            }
            Message::UploadArchive => match actions::upload_archive(&self.permissions, &mut self.archive) {
                Ok(file) => Task::run(api::upload::upload_archive(self.api.clone(), file), Message::Archive),
                Err(e) => self.report("Upload", &e),
            },
            Message::Archive(ArchiveEvent::Progress { sent, total }) => {
                self.archive.progress(sent, total);
                if total > 0 && sent >= total {
                    self.archive.sent();
                }
                Task::none()
            }
            Message::Archive(ArchiveEvent::Finished(Ok(album))) => {
                self.status = format!("✅ Archive uploaded to \"{}\".", album);
                self.archive.succeeded(album.clone());
                self.selection.select_album(None);
                self.lazy.reset();
                let albums = self.load_albums();
                let show = Task::perform(tokio::time::sleep(PROCESSING_DELAY), move |_| {
                    Message::ShowUploadedAlbum(album.clone())
                });
                Task::batch([albums, show])
            }
            Message::Archive(ArchiveEvent::Finished(Err(e))) => {
                self.archive.failed();
                self.report("Upload failed", &e)
            }
            Message::ShowUploadedAlbum(album) => {
                let request = self.selection.show_album(album);
                let files = self.fetch_files(request);
                let hide = Task::perform(tokio::time::sleep(OVERLAY_HIDE_DELAY), |_| Message::HideOverlay);
                Task::batch([files, hide])
            }
            Message::HideOverlay => {
                self.archive.finished();
                Task::none()
            }
            Message::ChooseImages => {
                if let Err(e) = self.permissions.require(Capability::UploadIndividual) {
                    return self.report("Upload", &e);
                }
                let files = FileDialog::new()
                    .set_title("Select images")
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"])
                    .pick_files();
                if let Some(paths) = files {
                    let picked = paths
                        .iter()
                        .filter_map(|path| PickedFile::from_path(path).ok())
                        .collect();
                    self.images.choose(picked);
                }
                Task::none()
            }
            Message::FileDropped(path) => {
                if self.screen != Screen::Ready || self.panel != Panel::Upload {
                    return Task::none();
                }
                let is_archive = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

                if is_archive {
                    if !self.permissions.can_upload || self.archive.is_busy() {
                        return Task::none();
                    }
                    let chosen = PickedFile::from_path(&path).and_then(|file| self.archive.choose(file));
                    if let Err(e) = chosen {
                        return self.report("Upload", &e);
                    }
                } else if self.permissions.can_upload_individual && !self.images.is_running() {
                    let mut files = self.images.files.clone();
                    files.extend(api::upload::collect_dropped(&[path]));
                    self.images.choose(files);
                }
                Task::none()
            }
            Message::UploadImages => match actions::upload_images(&self.permissions, &mut self.images) {
                Ok(file) => {
                    tracing::info!(count = self.images.total(), "uploading images");
                    self.upload_image(file)
                }
                Err(e) => self.report("Upload", &e),
            },
            Message::ImageUploaded(result) => {
                let outcome = match result {
                    Ok(()) => ImageOutcome::Uploaded,
                    Err(e) if e.is_silent() => return self.expire_session(),
                    Err(AdminError::Server { message, .. }) => ImageOutcome::Failed(message),
                    Err(e) => ImageOutcome::Failed(e.to_string()),
                };
                if let Some(next) = self.images.record(outcome) {
                    return self.upload_image(next);
                }

                let summary = self.images.summary();
                let succeeded = self.images.succeeded();
                tracing::info!(succeeded, total = self.images.total(), "image batch finished");
                alert(MessageLevel::Info, "Upload", &summary);
                self.images.reset();

                if succeeded == 0 {
                    return Task::none();
                }
                let albums = self.load_albums();
                Task::batch([albums, self.select_album(GENERIC_ALBUM.to_string())])
            }

            Message::RefreshStats => self.refresh_stats(),
            Message::StatsLoaded(result) => {
                self.stats = match result {
                    Ok(stats) => StatsView::from_stats(&stats),
                    Err(e) if e.is_silent() => return self.expire_session(),
                    Err(e) => {
                        tracing::warn!("failed to load stats: {e}");
                        StatsView::error("Failed to load statistics")
                    }
                };
                Task::perform(tokio::time::sleep(STATS_COOLDOWN), |_| Message::StatsCooledDown)
            }
            Message::StatsCooledDown => {
                self.stats_loading = false;
                Task::none()
            }
            Message::SessionTick => {
                let api = self.api.clone();
                Task::perform(async move { api.session_check().await }, Message::SessionChecked)
            }
            Message::SessionChecked(result) => match result {
                Ok(()) => Task::none(),
                Err(e) if e.is_silent() => self.expire_session(),
                Err(e) => {
                    tracing::warn!("session check failed: {e}");
                    Task::none()
                }
            },
            Message::OpenLogin => {
                if let Err(e) = open::that(self.api.login_url().as_str()) {
                    tracing::error!("failed to open login page: {e}");
                }
                Task::none()
            }
        }
    }

    fn load_albums(&mut self) -> Task<Message> {
        let ticket = self.selection.load_albums();
        let api = self.api.clone();
        Task::perform(async move { api.albums().await }, move |result| {
            Message::AlbumsLoaded(ticket, result)
        })
    }

    fn select_album(&mut self, album: String) -> Task<Message> {
        self.lazy.reset();
        match self.selection.select_album(Some(album)) {
            Some(ticket) => self.fetch_articles(ticket),
            None => Task::none(),
        }
    }

    fn fetch_articles(&self, ticket: Ticket) -> Task<Message> {
        let Some(album) = self.selection.album().map(str::to_string) else {
            return Task::none();
        };
        let api = self.api.clone();
        Task::perform(async move { api.articles(&album).await }, move |result| {
            Message::ArticlesLoaded(ticket, result)
        })
    }

    /// Fetch a file list and its count for the panel title.
    fn fetch_files(&mut self, request: FilesRequest) -> Task<Message> {
        if let Err(e) = self.permissions.require(Capability::ViewFiles) {
            tracing::debug!("file list withheld: {e}");
            self.selection.deny_files();
            return Task::none();
        }
        self.lazy.reset();

        let FilesRequest { ticket, mode } = request;
        let files = {
            let api = self.api.clone();
            let mode = mode.clone();
            Task::perform(
                async move { api.thumbnails(mode.album(), mode.article()).await },
                move |result| Message::FilesLoaded(ticket, result),
            )
        };
        let count = {
            let api = self.api.clone();
            Task::perform(
                async move {
                    match mode.article() {
                        Some(article) => api.count_article(mode.album(), article).await,
                        None => api.count_album(mode.album()).await,
                    }
                },
                move |result| Message::CountLoaded(ticket, result),
            )
        };
        Task::batch([files, count])
    }

    /// Register a thumbnail slot per row and start the visible ones.
    fn layout_list(&mut self) -> Task<Message> {
        self.lazy.reset();
        let entries = self.selection.list.entries();
        for (index, band) in ui::link_list::bands(entries) {
            if let Some(ListEntry::File(file)) = entries.get(index) {
                self.lazy.insert(index, file.thumbnail_url(), band);
            }
        }

        let height = self.list_height();
        let mut requests = self.lazy.set_viewport(0.0, height);
        requests.extend(self.lazy.observe_all());
        Task::batch([
            scrollable::snap_to(ui::link_list::LIST_ID.clone(), scrollable::RelativeOffset::START),
            self.load_thumbnails(requests),
        ])
    }

    fn list_height(&self) -> f32 {
        self.lazy.viewport().map_or(800.0 - LIST_CHROME, |watcher| watcher.height)
    }

    fn load_thumbnails(&self, requests: Vec<LoadRequest>) -> Task<Message> {
        Task::batch(requests.into_iter().map(|request| {
            let LoadRequest { generation, index, url } = request;
            Task::perform(
                media::thumbnail::load_thumbnail(self.api.clone(), url),
                move |result| Message::ThumbnailLoaded(generation, index, result),
            )
        }))
    }

    fn upload_image(&self, file: PickedFile) -> Task<Message> {
        Task::perform(api::upload::upload_image(self.api.clone(), file), Message::ImageUploaded)
    }

    fn copied(&mut self, link: String) -> Task<Message> {
        let token = self.copy.copied(&link);
        Task::perform(tokio::time::sleep(COPIED_FOR), move |_| {
            Message::CopyExpired(link.clone(), token)
        })
    }

    /// Ask, then send a delete.
    fn delete(&self, deletion: Deletion) -> Task<Message> {
        if !confirm(deletion.title(), &deletion.question()) {
            return Task::none();
        }

        let api = self.api.clone();
        match deletion {
            Deletion::Album { album } => {
                let name = album.clone();
                Task::perform(async move { api.delete_album(&name).await }, move |result| {
                    Message::AlbumDeleted(album.clone(), result)
                })
            }
            Deletion::Article { album, article } => {
                let name = article.clone();
                Task::perform(async move { api.delete_article(&album, &name).await }, move |result| {
                    Message::ArticleDeleted(article.clone(), result)
                })
            }
        }
    }

    fn export(&mut self, request: ExportRequest) -> Task<Message> {
        self.status = format!("Exporting {}...", request.filename());
        Task::perform(
            export_to_file(self.api.clone(), request, self.config.ui.downloads_dir()),
            Message::ExportDone,
        )
    }

    fn refresh_stats(&mut self) -> Task<Message> {
        if self.stats_loading || self.permissions.require(Capability::ViewStats).is_err() {
            return Task::none();
        }
        self.stats_loading = true;
        let api = self.api.clone();
        Task::perform(async move { api.stats().await }, Message::StatsLoaded)
    }

    /// Session gone: stop everything and point at the login page.
    fn expire_session(&mut self) -> Task<Message> {
        self.api.expire();
        self.screen = Screen::SessionExpired;
        self.preview = None;
        self.xlsx = None;
        Task::none()
    }

    /// Tell the user about a failure. Session expiry is never reported.
    fn report(&mut self, title: &str, error: &AdminError) -> Task<Message> {
        if error.is_silent() {
            return self.expire_session();
        }
        tracing::error!("{title}: {error}");
        alert(MessageLevel::Error, title, &error.to_string());
        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.screen {
            Screen::Connecting => {
                return container(text(format!("Connecting to {}...", self.config.server.base_url)).size(18))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into();
            }
            Screen::SessionExpired => return ui::overlay::session_expired(self.api.login_url().as_str()),
            Screen::Ready => {}
        }

        let base = column![self.header(), row![self.side_panel(), self.files_panel()].spacing(20)]
            .spacing(16)
            .padding(20);

        if let Some((title, details)) = &self.archive.overlay {
            return ui::overlay::modal(base, ui::overlay::processing(title, details), None);
        }
        if let Some(preview) = &self.preview {
            let copied = self.copy.is_copied(&preview.file.public_link);
            return ui::overlay::modal(base, ui::overlay::preview(preview, copied), Some(Message::ClosePreview));
        }
        if let Some(options) = self.xlsx {
            return ui::overlay::modal(base, ui::overlay::xlsx_dialog(options), Some(Message::CloseXlsxDialog));
        }
        base.into()
    }

    fn header(&self) -> Element<Message> {
        let mut tabs = row![].spacing(8);
        if self.permissions.can_upload || self.permissions.can_upload_individual {
            tabs = tabs.push(tab("Upload", Panel::Upload, self.panel));
        }
        if self.permissions.can_manage_anything() {
            tabs = tabs.push(tab("Manage links", Panel::Manage, self.panel));
        }

        row![
            text("Gallery Admin").size(28),
            text(&self.status).size(14).width(Length::Fill),
            tabs,
        ]
        .spacing(20)
        .align_y(Alignment::Center)
        .into()
    }

    fn side_panel(&self) -> Element<Message> {
        let mut panel = column![].spacing(16).width(Length::Fixed(380.0));

        match self.panel {
            Panel::Upload => {
                if self.permissions.can_upload {
                    panel = panel.push(ui::upload::archive(&self.archive));
                }
                if self.permissions.can_upload_individual {
                    panel = panel.push(ui::upload::images(&self.images));
                }
            }
            Panel::Manage => {
                panel = panel.push(ui::card("Manage links", ui::selectors::view(&self.selection, self.permissions)));
            }
        }
        if self.permissions.can_view_stats {
            panel = panel.push(ui::stats::view(&self.stats, self.stats_loading));
        }
        panel.into()
    }

    fn files_panel(&self) -> Element<Message> {
        let title = self.selection.title.as_deref().unwrap_or("Direct links");
        column![
            text(title).size(20),
            ui::link_list::view(&self.selection.list, &self.lazy, &self.copy),
        ]
        .spacing(12)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.screen == Screen::SessionExpired || self.api.session().is_expired() {
            return Subscription::none();
        }

        let mut subscriptions = vec![event::listen_with(handle_event)];
        if self.screen == Screen::Ready {
            subscriptions.push(
                iced::time::every(self.config.polling.session_check_interval()).map(|_| Message::SessionTick),
            );
            if self.permissions.can_view_stats {
                subscriptions.push(
                    iced::time::every(self.config.polling.stats_refresh_interval()).map(|_| Message::RefreshStats),
                );
            }
        }
        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn tab(label: &str, panel: Panel, active: Panel) -> Element<'_, Message> {
    let style = if panel == active { button::primary } else { button::secondary };
    button(label).style(style).on_press(Message::ShowPanel(panel)).into()
}

fn handle_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(key::Named::Escape),
            ..
        }) => Some(Message::EscapePressed),
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
        _ => None,
    }
}

/// Blocking message box.
fn alert(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Blocking Yes/No question.
fn confirm(title: &str, description: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

/// Fetch an export and save it in `dir`
async fn export_to_file(api: ApiClient, request: ExportRequest, dir: PathBuf) -> Result<PathBuf, AdminError> {
    let bytes = api.export(&request).await?;
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(request.filename());
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

fn main() -> iced::Result {
    let (config, config_error) = match Config::load_default() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    if let Err(e) = logging::init(&config.logging) {
        logging::init_console_only(&config.logging.level);
        tracing::warn!("log file unavailable, logging to console only: {e}");
    }
    if let Some(e) = config_error {
        tracing::warn!(path = %Config::default_path().display(), "using default configuration: {e}");
    }

    let api = match ApiClient::new(&config.server, SessionGuard::new()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("cannot start: {e}");
            alert(MessageLevel::Error, "Gallery Admin", &e.to_string());
            std::process::exit(1);
        }
    };

    iced::application("Gallery Admin", GalleryAdmin::update, GalleryAdmin::view)
        .subscription(GalleryAdmin::subscription)
        .theme(GalleryAdmin::theme)
        .window_size(Size::new(1280.0, 800.0))
        .centered()
        .run_with(move || GalleryAdmin::new(config, api))
}
