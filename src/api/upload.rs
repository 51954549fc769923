/// Streaming uploads
///
/// Archives go up as a chunked multipart body so the progress bar can
/// follow the bytes actually handed to the connection. Images are small
/// and go up in one piece.

use futures::channel::mpsc::{self, UnboundedSender};
use futures::{SinkExt, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};

use super::client::{check, ApiClient, Payload};
use crate::error::Result;
use crate::state::upload::{album_from_reply, PickedFile};

const CHUNK_SIZE: usize = 64 * 1024;

/// Progress of an archive upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveEvent {
    Progress { sent: u64, total: u64 },
    /// Album the archive was unpacked into.
    Finished(Result<String>),
}

enum Step {
    Sent(u64),
    Done(Result<String>),
}

/// Upload `file` to `/upload` as field `zipfile`, reporting progress.
pub fn upload_archive(api: ApiClient, file: PickedFile) -> impl Stream<Item = ArchiveEvent> {
    iced::stream::channel(100, move |mut output| async move {
        let opened = match tokio::fs::File::open(&file.path).await {
            Ok(opened) => opened,
            Err(e) => {
                let _ = output.send(ArchiveEvent::Finished(Err(e.into()))).await;
                return;
            }
        };
        let total = match opened.metadata().await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                let _ = output.send(ArchiveEvent::Finished(Err(e.into()))).await;
                return;
            }
        };
        tracing::info!(file = %file.name, total, "uploading archive");

        let (progress, sent_bytes) = mpsc::unbounded::<u64>();
        let body = chunks(opened, progress);

        let name = file.name.clone();
        let request = async move {
            let part = Part::stream_with_length(Body::wrap_stream(body), total)
                .file_name(name.clone())
                .mime_str("application/zip")?;
            let form = Form::new().part("zipfile", part);
            let response = api.request(Method::POST, "/upload", Payload::Multipart(form)).await?;
            let response = check(response).await?;
            let bytes = response.bytes().await?;
            album_from_reply(&bytes, &name)
        };

        let mut steps = Box::pin(futures::stream::select(
            sent_bytes.map(Step::Sent),
            futures::stream::once(request).map(Step::Done),
        ));

        while let Some(step) = steps.next().await {
            match step {
                Step::Sent(sent) => {
                    let _ = output.send(ArchiveEvent::Progress { sent, total }).await;
                }
                Step::Done(result) => {
                    match &result {
                        Ok(album) => tracing::info!(%album, "archive processed"),
                        Err(e) if e.is_silent() => {}
                        Err(e) => tracing::error!("archive upload failed: {e}"),
                    }
                    let _ = output.send(ArchiveEvent::Finished(result)).await;
                    break;
                }
            }
        }
    })
}

/// Read `reader` in chunks, reporting the running byte count as each
/// chunk is handed over. Stops after the first read error.
fn chunks<R>(reader: R, progress: UnboundedSender<u64>) -> impl Stream<Item = std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    futures::stream::unfold(Some((reader, 0u64)), move |state| {
        let progress = progress.clone();
        async move {
            let (mut reader, sent) = state?;
            let mut chunk = vec![0u8; CHUNK_SIZE];
            match reader.read(&mut chunk).await {
                Ok(0) => None,
                Ok(n) => {
                    chunk.truncate(n);
                    let sent = sent + n as u64;
                    let _ = progress.unbounded_send(sent);
                    Some((Ok(chunk), Some((reader, sent))))
                }
                Err(e) => Some((Err(e), None)),
            }
        }
    })
}

/// Upload one image to `/upload-image` as field `image`.
pub async fn upload_image(api: ApiClient, file: PickedFile) -> Result<()> {
    let data = tokio::fs::read(&file.path).await?;
    let part = Part::bytes(data)
        .file_name(file.name.clone())
        .mime_str(file.content_type().as_ref())?;
    let form = Form::new().part("image", part);

    match api.post_form("/upload-image", form).await {
        Ok(()) => {
            tracing::info!(file = %file.name, "image uploaded");
            Ok(())
        }
        Err(e) => {
            if !e.is_silent() {
                tracing::warn!(file = %file.name, "image upload failed: {e}");
            }
            Err(e)
        }
    }
}

/// Files among dropped paths. Directories are walked and contribute
/// their images only; plain files are kept for validation.
pub fn collect_dropped(paths: &[std::path::PathBuf]) -> Vec<PickedFile> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                match PickedFile::from_path(entry.path()) {
                    Ok(file) if file.is_image() => files.push(file),
                    _ => {}
                }
            }
        } else if let Ok(file) = PickedFile::from_path(path) {
            files.push(file);
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::error::AdminError;
    use crate::state::session::SessionGuard;
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;

    async fn serve(app: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let config = ServerConfig {
            base_url: format!("http://{}", addr),
            ..ServerConfig::default()
        };
        ApiClient::with_redirect(&config, SessionGuard::new(), Arc::new(|_: &url::Url| {})).unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/upload",
                post(|mut multipart: Multipart| async move {
                    while let Ok(Some(field)) = multipart.next_field().await {
                        if field.name() == Some("zipfile") {
                            let name = field.file_name().unwrap_or_default().to_string();
                            let _ = field.bytes().await;
                            return (StatusCode::OK, Json(json!({"message": "ok", "album_name": format!("album-{name}")})));
                        }
                    }
                    (StatusCode::BAD_REQUEST, Json(json!({"error": "No file part"})))
                }),
            )
            .route(
                "/upload-image",
                post(|mut multipart: Multipart| async move {
                    while let Ok(Some(field)) = multipart.next_field().await {
                        if field.name() == Some("image") {
                            let name = field.file_name().unwrap_or_default().to_string();
                            if name.starts_with("bad") {
                                return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "corrupt image"})));
                            }
                            return (StatusCode::OK, Json(json!({})));
                        }
                    }
                    (StatusCode::BAD_REQUEST, Json(json!({"error": "No file part"})))
                }),
            )
    }

    fn temp_file(dir: &tempfile::TempDir, name: &str, size: usize) -> PickedFile {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&vec![7u8; size]).unwrap();
        PickedFile::from_path(&path).unwrap()
    }

    #[tokio::test]
    async fn test_archive_upload_reports_progress() {
        let api = serve(app()).await;
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "summer.zip", 200 * 1024);

        let events: Vec<ArchiveEvent> = upload_archive(api, file).collect().await;

        let progress: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                ArchiveEvent::Progress { sent, .. } => Some(*sent),
                _ => None,
            })
            .collect();
        assert!(!progress.is_empty());
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            events.last(),
            Some(&ArchiveEvent::Finished(Ok("album-summer.zip".to_string())))
        );
    }

    #[tokio::test]
    async fn test_image_failure_carries_server_message() {
        let api = serve(app()).await;
        let dir = tempfile::tempdir().unwrap();
        let good = temp_file(&dir, "good.jpg", 10);
        let bad = temp_file(&dir, "bad.jpg", 10);

        assert!(upload_image(api.clone(), good).await.is_ok());
        let err = upload_image(api, bad).await.unwrap_err();
        assert_eq!(
            err,
            AdminError::Server {
                status: 500,
                message: "corrupt image".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_archive_is_read_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_file(&dir, "big.zip", 2 * CHUNK_SIZE + 100);
        let reader = tokio::fs::File::open(&file.path).await.unwrap();

        let (progress, sent) = mpsc::unbounded();
        let sizes: Vec<usize> = chunks(reader, progress)
            .map(|chunk| chunk.unwrap().len())
            .collect()
            .await;
        assert!(sizes.iter().all(|&size| size > 0 && size <= CHUNK_SIZE));
        assert_eq!(sizes.iter().sum::<usize>(), 2 * CHUNK_SIZE + 100);

        let counts: Vec<u64> = sent.collect().await;
        assert_eq!(counts.len(), sizes.len());
        assert_eq!(counts.last(), Some(&file.size));
    }

    #[test]
    fn test_collect_dropped_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(nested.join("b.png"), b"x").unwrap();
        std::fs::write(nested.join("notes.txt"), b"x").unwrap();

        let mut names: Vec<String> = collect_dropped(&[dir.path().to_path_buf()])
            .into_iter()
            .map(|f| f.name)
            .collect();
        names.sort();
        assert_eq!(names, ["a.jpg", "b.png"]);
    }
}
