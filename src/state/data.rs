/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the API layer and the UI layer. They mirror the JSON the gallery
/// server returns.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Represents a single uploaded image as returned by `/api/thumbnails`
///
/// Immutable once received; a list refresh replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileRecord {
    /// Stored filename (e.g., "SKU123_2.jpg")
    pub filename: String,
    pub album_name: String,
    pub article_number: String,
    /// Direct public link handed out to users
    pub public_link: String,
    /// Server timestamp, as serialised by the backend (RFC 2822 or RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Small thumbnail, usually server-relative
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Medium preview, usually server-relative
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Original file size in bytes
    #[serde(default)]
    pub file_size: u64,
}

impl FileRecord {
    /// Filename without any directory part.
    pub fn basename(&self) -> &str {
        basename(&self.filename)
    }

    /// Thumbnail URL, falling back to the server's default small-thumbnail route.
    pub fn thumbnail_url(&self) -> String {
        self.thumbnail_url
            .clone()
            .unwrap_or_else(|| format!("/thumbnails/small/{}", self.filename))
    }

    /// Preview URL, falling back to the server's default medium-thumbnail route.
    pub fn preview_url(&self) -> String {
        self.preview_url
            .clone()
            .unwrap_or_else(|| format!("/thumbnails/medium/{}", self.filename))
    }

    /// Parsed creation timestamp, if the server sent one we understand.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    /// Caption shown under the thumbnail: `name • size`
    pub fn caption(&self) -> String {
        format!("{} • {}", self.basename(), format_file_size(self.file_size))
    }

    /// Line under the preview image: size and, when known, upload time.
    pub fn preview_details(&self) -> String {
        match self.created_at() {
            Some(created) => format!(
                "{} • uploaded {}",
                format_file_size(self.file_size),
                created.format("%Y-%m-%d %H:%M UTC")
            ),
            None => format_file_size(self.file_size),
        }
    }
}

/// Last path component, accepting both `/` and `\` separators.
pub fn basename(path: &str) -> &str {
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}

/// Format a byte count in base-1024 units, at most two decimals,
/// trailing zeros trimmed (1536 -> "1.5 KB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// `{count}` reply of the count endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct CountReply {
    #[serde(default)]
    pub count: u64,
}

/// Generic `{error}` body used by the server for failures
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply of `POST /upload`
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveReply {
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Usage of one mount point
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiskStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    #[serde(default)]
    pub percent_used: f64,
}

/// File/album totals
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileTotals {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_albums: u64,
}

/// Reply of `GET /api/stats`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub disk_stats: BTreeMap<String, DiskStats>,
    #[serde(default)]
    pub files: Option<FileTotals>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str) -> FileRecord {
        FileRecord {
            filename: filename.to_string(),
            album_name: "Summer".to_string(),
            article_number: "A1".to_string(),
            public_link: format!("https://pics.example.com/{}", filename),
            created_at: None,
            thumbnail_url: None,
            preview_url: None,
            file_size: 0,
        }
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/photo_1.jpg"), "photo_1.jpg");
        assert_eq!(basename("a\\b\\photo_1.jpg"), "photo_1.jpg");
        assert_eq!(basename("photo.jpg"), "photo.jpg");
    }

    #[test]
    fn test_url_fallbacks() {
        let file = record("x_1.jpg");
        assert_eq!(file.thumbnail_url(), "/thumbnails/small/x_1.jpg");
        assert_eq!(file.preview_url(), "/thumbnails/medium/x_1.jpg");
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{
            "filename": "SKU1_2.jpg",
            "album_name": "Summer",
            "article_number": "SKU1",
            "public_link": "https://pics.example.com/SKU1_2.jpg",
            "created_at": "Wed, 14 Oct 2026 10:00:00 GMT"
        }"#;
        let file: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(file.file_size, 0);
        assert_eq!(file.caption(), "SKU1_2.jpg • 0 Bytes");
        assert!(file.created_at().is_some());
    }

    #[test]
    fn test_preview_details() {
        let mut file = record("x_1.jpg");
        file.file_size = 1536;
        assert_eq!(file.preview_details(), "1.5 KB");

        file.created_at = Some("2026-10-14T12:30:00+02:00".to_string());
        assert_eq!(file.preview_details(), "1.5 KB • uploaded 2026-10-14 10:30 UTC");

        file.created_at = Some("yesterday".to_string());
        assert_eq!(file.preview_details(), "1.5 KB");
    }

    #[test]
    fn test_stats_deserialize() {
        let json = r#"{
            "disk_stats": {"/app/images": {"total": 100, "used": 40, "free": 60, "percent_used": 40.0, "device": "storage"}},
            "files": {"total_files": 12, "total_albums": 3},
            "status": "success"
        }"#;
        let stats: Stats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.disk_stats["/app/images"].free, 60);
        assert_eq!(stats.files.unwrap().total_albums, 3);
    }
}
