/// The link list: what the files panel shows for the current selection.
///
/// `render` turns the server's file records into an ordered list of
/// entries (article headers and files). It is pure so the ordering rules
/// can be tested without a window.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::data::{basename, FileRecord};

/// Shown when a selection has no files.
pub const EMPTY_STATE_TEXT: &str = "No files in the selected category.";
/// Shown to users without the view-files capability.
pub const ACCESS_DENIED_TEXT: &str = "You are not allowed to view files. Contact an administrator.";

static SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([0-9]+)(\.[^.]*)?$").expect("valid suffix regex"));

/// Numeric suffix used to order files inside an article:
/// `photo_12.jpg -> 12`, `photo.jpg -> 0`. Values too large for u64 saturate.
pub fn suffix_key(filename: &str) -> u64 {
    SUFFIX_RE
        .captures(basename(filename))
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Stable sort by numeric suffix.
pub fn sort_by_suffix(files: &mut [FileRecord]) {
    files.sort_by_key(|file| suffix_key(&file.filename));
}

/// What the list was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMode {
    Album { album: String },
    Article { album: String, article: String },
}

impl ListMode {
    pub fn new(album: impl Into<String>, article: Option<String>) -> Self {
        let album = album.into();
        match article {
            Some(article) if !article.is_empty() => ListMode::Article { album, article },
            _ => ListMode::Album { album },
        }
    }

    pub fn album(&self) -> &str {
        match self {
            ListMode::Album { album } | ListMode::Article { album, .. } => album,
        }
    }

    pub fn article(&self) -> Option<&str> {
        match self {
            ListMode::Album { .. } => None,
            ListMode::Article { article, .. } => Some(article),
        }
    }

    /// Panel title once the server count is known.
    pub fn title(&self, count: u64) -> String {
        match self {
            ListMode::Album { album } => format!("Images in \"{}\" - {} files", album, count),
            ListMode::Article { album, article } => format!(
                "Images in \"{}\" (article: {}) - {} files",
                album, article, count
            ),
        }
    }
}

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// Article group header (album mode only)
    Header(String),
    File(FileRecord),
}

/// Contents of the files panel.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkList {
    /// Nothing requested yet; carries the hint text.
    Placeholder(String),
    Loading,
    Denied,
    Empty,
    /// The fetch failed; carries the message.
    Failed(String),
    Entries(Vec<ListEntry>),
}

impl LinkList {
    /// Hint shown before anything is selected.
    pub fn placeholder(can_upload: bool) -> Self {
        if can_upload {
            LinkList::Placeholder(
                "Upload a ZIP archive to get direct links to your images.".to_string(),
            )
        } else {
            LinkList::Placeholder("Select an album to view its images.".to_string())
        }
    }

    pub fn entries(&self) -> &[ListEntry] {
        match self {
            LinkList::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// Number of file rows (headers excluded).
    pub fn file_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|entry| matches!(entry, ListEntry::File(_)))
            .count()
    }
}

/// Build the list for `files` in the given mode.
pub fn render(files: Vec<FileRecord>, mode: &ListMode) -> LinkList {
    if files.is_empty() {
        return LinkList::Empty;
    }

    match mode {
        ListMode::Article { .. } => {
            let mut files = files;
            sort_by_suffix(&mut files);
            LinkList::Entries(files.into_iter().map(ListEntry::File).collect())
        }
        ListMode::Album { .. } => {
            let mut groups: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
            for file in files {
                groups.entry(file.article_number.clone()).or_default().push(file);
            }

            let mut entries = Vec::new();
            for (article, mut group) in groups {
                sort_by_suffix(&mut group);
                entries.push(ListEntry::Header(article));
                entries.extend(group.into_iter().map(ListEntry::File));
            }
            LinkList::Entries(entries)
        }
    }
}
