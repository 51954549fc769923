/// Gated user actions
///
/// Each action checks the user's capability before it looks at the
/// selection or the upload forms. A denied action yields an error and
/// leaves nothing to send.

use super::export::{ExportRequest, XlsxOptions};
use super::permissions::{Capability, PermissionSet};
use super::selection::Selection;
use super::upload::{ArchiveUpload, ImageBatch, PickedFile};
use crate::error::{AdminError, Result};

/// A delete waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Album { album: String },
    Article { album: String, article: String },
}

impl Deletion {
    pub fn title(&self) -> &'static str {
        match self {
            Deletion::Album { .. } => "Delete album",
            Deletion::Article { .. } => "Delete article",
        }
    }

    pub fn question(&self) -> String {
        match self {
            Deletion::Album { album } => {
                format!("Delete album \"{}\" and all of its files? This cannot be undone.", album)
            }
            Deletion::Article { album, article } => format!(
                "Delete article \"{}\" from album \"{}\"? This cannot be undone.",
                article, album
            ),
        }
    }
}

pub fn delete_album(permissions: &PermissionSet, selection: &Selection) -> Result<Deletion> {
    permissions.require(Capability::ManageAlbums)?;
    let album = selection
        .album()
        .ok_or_else(|| AdminError::Validation("Please select an album.".to_string()))?;
    Ok(Deletion::Album {
        album: album.to_string(),
    })
}

pub fn delete_article(permissions: &PermissionSet, selection: &Selection) -> Result<Deletion> {
    permissions.require(Capability::ManageArticles)?;
    match (selection.album(), selection.article()) {
        (Some(album), Some(article)) => Ok(Deletion::Article {
            album: album.to_string(),
            article: article.to_string(),
        }),
        _ => Err(AdminError::Validation(
            "Please select an album and an article.".to_string(),
        )),
    }
}

/// Album and article an export applies to.
pub fn export_target(permissions: &PermissionSet, selection: &Selection) -> Result<(String, Option<String>)> {
    permissions.require(Capability::Export)?;
    let album = selection
        .album()
        .ok_or_else(|| AdminError::Validation("Please select an album to export.".to_string()))?;
    Ok((album.to_string(), selection.article().map(str::to_string)))
}

/// CSV export without options, spreadsheet export with them.
pub fn export(
    permissions: &PermissionSet,
    selection: &Selection,
    xlsx: Option<XlsxOptions>,
) -> Result<ExportRequest> {
    let (album, article) = export_target(permissions, selection)?;
    Ok(match xlsx {
        Some(options) => ExportRequest::xlsx(&album, article.as_deref(), options),
        None => ExportRequest::csv(&album, article.as_deref()),
    })
}

/// Moves the archive form to sending and returns the file to send.
pub fn upload_archive(permissions: &PermissionSet, archive: &mut ArchiveUpload) -> Result<PickedFile> {
    permissions.require(Capability::Upload)?;
    archive.start()
}

/// Starts the image batch and returns its first file.
pub fn upload_images(permissions: &PermissionSet, images: &mut ImageBatch) -> Result<PickedFile> {
    permissions.require(Capability::UploadIndividual)?;
    images.start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::export::{ExportFormat, XlsxTemplate};
    use crate::state::upload::ArchivePhase;
    use std::path::PathBuf;

    fn picked(name: &str) -> PickedFile {
        PickedFile {
            path: PathBuf::from(format!("/tmp/{}", name)),
            name: name.to_string(),
            size: 1024,
        }
    }

    /// Album "X" and article "a1" selected.
    fn selection() -> Selection {
        let mut selection = Selection::new(true);
        let ticket = selection.load_albums();
        selection.albums_loaded(ticket, Ok(vec!["X".to_string()]));
        let ticket = selection.select_album(Some("X".to_string())).unwrap();
        selection.articles_loaded(ticket, Ok(vec!["a1".to_string()]));
        selection.select_article(Some("a1".to_string()));
        selection
    }

    fn everything() -> PermissionSet {
        PermissionSet {
            can_upload: true,
            can_manage_albums: true,
            can_manage_articles: true,
            can_export: true,
            can_view_files: true,
            can_view_stats: true,
            can_upload_individual: true,
        }
    }

    fn is_denied<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(AdminError::PermissionDenied(_)))
    }

    #[test]
    fn test_delete_needs_manage_rights() {
        let selection = selection();
        let viewer = PermissionSet {
            can_view_files: true,
            can_export: true,
            ..PermissionSet::default()
        };

        assert!(is_denied(delete_album(&viewer, &selection)));
        assert!(is_denied(delete_article(&viewer, &selection)));

        // album rights do not cover articles
        let albums_only = PermissionSet {
            can_manage_albums: true,
            ..PermissionSet::default()
        };
        assert_eq!(
            delete_album(&albums_only, &selection),
            Ok(Deletion::Album { album: "X".to_string() })
        );
        assert!(is_denied(delete_article(&albums_only, &selection)));
    }

    #[test]
    fn test_denial_wins_over_missing_selection() {
        let empty = Selection::new(false);
        assert!(is_denied(delete_album(&PermissionSet::default(), &empty)));
        assert!(is_denied(export(&PermissionSet::default(), &empty, None)));
        assert!(matches!(
            delete_album(&everything(), &empty),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_article_request() {
        let deletion = delete_article(&everything(), &selection()).unwrap();
        assert_eq!(
            deletion,
            Deletion::Article {
                album: "X".to_string(),
                article: "a1".to_string()
            }
        );
        assert_eq!(deletion.title(), "Delete article");
        assert!(deletion.question().contains("\"a1\" from album \"X\""));
    }

    #[test]
    fn test_export_needs_export_right() {
        let selection = selection();
        let manager = PermissionSet {
            can_manage_albums: true,
            can_manage_articles: true,
            ..PermissionSet::default()
        };
        assert!(is_denied(export(&manager, &selection, None)));
        assert!(is_denied(export(&manager, &selection, Some(XlsxOptions::default()))));

        let request = export(
            &everything(),
            &selection,
            Some(XlsxOptions {
                template: XlsxTemplate::InCell,
                ..XlsxOptions::default()
            }),
        )
        .unwrap();
        assert_eq!(request.format, ExportFormat::Xlsx);
        assert_eq!(request.filename(), "links_X_a1.xlsx");
    }

    #[test]
    fn test_archive_upload_denied_leaves_form_idle() {
        let mut archive = ArchiveUpload::default();
        archive.choose(picked("summer.zip")).unwrap();

        let no_upload = PermissionSet {
            can_upload_individual: true,
            ..PermissionSet::default()
        };
        assert!(is_denied(upload_archive(&no_upload, &mut archive)));
        assert_eq!(archive.phase, ArchivePhase::Idle);

        let file = upload_archive(&everything(), &mut archive).unwrap();
        assert_eq!(file.name, "summer.zip");
        assert!(archive.is_busy());
    }

    #[test]
    fn test_image_upload_denied_starts_nothing() {
        let mut images = ImageBatch::default();
        images.choose(vec![picked("a.jpg"), picked("b.png")]);

        let archives_only = PermissionSet {
            can_upload: true,
            ..PermissionSet::default()
        };
        assert!(is_denied(upload_images(&archives_only, &mut images)));
        assert!(!images.is_running());

        let first = upload_images(&everything(), &mut images).unwrap();
        assert_eq!(first.name, "a.jpg");
        assert!(images.is_running());
    }
}
