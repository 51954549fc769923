/// Upload bookkeeping
///
/// Archive upload: one `.zip`, byte-level progress, a blocking overlay
/// while the server unpacks it.
/// Image upload: many files, checked up front, sent one request at a time;
/// a failed file never stops the rest.

use std::path::{Path, PathBuf};

use super::data::{basename, format_file_size, ArchiveReply};
use crate::error::{AdminError, Result};

/// Progress above which the processing overlay is shown.
pub const OVERLAY_THRESHOLD: f32 = 95.0;

/// Album that individual image uploads land in.
pub const GENERIC_ALBUM: &str = "Generic";

/// A local file chosen in a picker or dropped on the window.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl PickedFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| basename(&path.to_string_lossy()).to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }

    /// Content type guessed from the extension.
    pub fn content_type(&self) -> mime_guess::Mime {
        mime_guess::from_path(&self.name).first_or_octet_stream()
    }

    pub fn is_image(&self) -> bool {
        self.content_type().type_() == mime_guess::mime::IMAGE
    }
}

/// Only `.zip` archives are accepted (case-insensitive).
pub fn validate_archive(name: &str) -> Result<()> {
    if has_zip_extension(name) {
        Ok(())
    } else {
        Err(AdminError::Validation("Please choose a ZIP archive.".to_string()))
    }
}

/// Every file must be an image before anything is sent.
pub fn validate_images(files: &[PickedFile]) -> Result<()> {
    if files.is_empty() {
        return Err(AdminError::Validation("Please choose images to upload.".to_string()));
    }
    match files.iter().find(|f| !f.is_image()) {
        Some(file) => Err(AdminError::Validation(format!("{} is not an image.", file.name))),
        None => Ok(()),
    }
}

/// Album name from the `/upload` reply; falls back to the archive's stem.
pub fn album_from_reply(body: &[u8], file_name: &str) -> Result<String> {
    let reply: ArchiveReply = serde_json::from_slice(body)
        .map_err(|_| AdminError::MalformedResponse("the server sent an invalid reply".to_string()))?;

    if let Some(error) = reply.error {
        return Err(AdminError::Server { status: 200, message: error });
    }

    Ok(reply
        .album_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| archive_stem(file_name)))
}

/// `Photos.ZIP -> Photos`
fn archive_stem(file_name: &str) -> String {
    if has_zip_extension(file_name) {
        file_name[..file_name.len() - 4].to_string()
    } else {
        file_name.to_string()
    }
}

fn has_zip_extension(name: &str) -> bool {
    let split = name.len().wrapping_sub(4);
    name.len() >= 4
        && name.is_char_boundary(split)
        && name[split..].eq_ignore_ascii_case(".zip")
}

/// Where an archive upload stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchivePhase {
    Idle,
    Sending { sent: u64, total: u64 },
    /// Fully sent; waiting for the server to unpack and reply.
    Processing,
    /// Reply received; list refresh pending.
    Refreshing { album: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveUpload {
    pub file: Option<PickedFile>,
    pub phase: ArchivePhase,
    /// Full-screen overlay text (title, details) when visible.
    pub overlay: Option<(String, String)>,
}

impl Default for ArchiveUpload {
    fn default() -> Self {
        Self {
            file: None,
            phase: ArchivePhase::Idle,
            overlay: None,
        }
    }
}

impl ArchiveUpload {
    /// Pick or drop a file. Non-zip files are refused and the previous
    /// choice is kept.
    pub fn choose(&mut self, file: PickedFile) -> Result<()> {
        validate_archive(&file.name)?;
        self.file = Some(file);
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.phase != ArchivePhase::Idle
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_busy()
    }

    /// Checks and moves to Sending. Returns the file to send.
    pub fn start(&mut self) -> Result<PickedFile> {
        let file = self
            .file
            .clone()
            .ok_or_else(|| AdminError::Validation("Please choose a ZIP archive.".to_string()))?;
        validate_archive(&file.name)?;
        self.phase = ArchivePhase::Sending { sent: 0, total: file.size };
        Ok(file)
    }

    /// Bytes handed to the transport.
    pub fn progress(&mut self, sent: u64, total: u64) {
        if !matches!(self.phase, ArchivePhase::Sending { .. }) {
            return;
        }
        self.phase = ArchivePhase::Sending { sent, total };
        if self.percent() > OVERLAY_THRESHOLD {
            self.overlay = Some((
                "Upload complete.".to_string(),
                "Unpacking files and creating links. This may take a few minutes...".to_string(),
            ));
        }
    }

    /// Percent of bytes sent, 0 when the total is unknown.
    pub fn percent(&self) -> f32 {
        match self.phase {
            ArchivePhase::Sending { sent, total } if total > 0 => {
                (sent as f32 / total as f32 * 100.0).min(100.0)
            }
            ArchivePhase::Sending { .. } => 0.0,
            _ => 100.0,
        }
    }

    /// The request body has been fully sent.
    pub fn sent(&mut self) {
        self.phase = ArchivePhase::Processing;
        self.overlay = Some((
            "Processing...".to_string(),
            "Waiting for the server's reply...".to_string(),
        ));
    }

    /// Successful reply: clear the form and keep the overlay up until the
    /// list is refreshed.
    pub fn succeeded(&mut self, album: String) {
        self.file = None;
        self.phase = ArchivePhase::Refreshing { album };
        self.overlay = Some((
            "Finishing".to_string(),
            "All done! Refreshing the file list...".to_string(),
        ));
    }

    /// Failed: overlay down, the chosen file stays so the user can retry.
    pub fn failed(&mut self) {
        self.phase = ArchivePhase::Idle;
        self.overlay = None;
    }

    /// List refreshed after a successful upload.
    pub fn finished(&mut self) {
        self.phase = ArchivePhase::Idle;
        self.overlay = None;
    }

    /// Drop-area caption.
    pub fn summary(&self) -> String {
        match &self.file {
            Some(file) => format!(
                "Selected: {} ({}). Ready to upload.",
                file.name,
                format_file_size(file.size)
            ),
            None => "Drop a ZIP archive here or browse.".to_string(),
        }
    }
}

/// Outcome of one image request.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Uploaded,
    Failed(String),
}

/// Sequential multi-image upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageBatch {
    pub files: Vec<PickedFile>,
    /// Index of the file in flight.
    current: Option<usize>,
    succeeded: usize,
    failures: Vec<(String, String)>,
}

impl ImageBatch {
    /// Replace the chosen files.
    pub fn choose(&mut self, files: Vec<PickedFile>) {
        if !self.is_running() {
            self.files = files;
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.files.is_empty() && !self.is_running()
    }

    /// Validate every file, then hand out the first one. Nothing is sent
    /// if any file fails validation.
    pub fn start(&mut self) -> Result<PickedFile> {
        validate_images(&self.files)?;
        self.succeeded = 0;
        self.failures.clear();
        self.current = Some(0);
        Ok(self.files[0].clone())
    }

    /// Record the outcome of the file in flight and return the next one,
    /// or `None` when the batch is done.
    pub fn record(&mut self, outcome: ImageOutcome) -> Option<PickedFile> {
        let index = self.current?;
        match outcome {
            ImageOutcome::Uploaded => self.succeeded += 1,
            ImageOutcome::Failed(reason) => {
                let name = self.files[index].name.clone();
                self.failures.push((name, reason));
            }
        }

        let next = index + 1;
        if next < self.files.len() {
            self.current = Some(next);
            Some(self.files[next].clone())
        } else {
            self.current = None;
            None
        }
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Progress driven by the success counter.
    pub fn percent(&self) -> f32 {
        if self.files.is_empty() {
            return 0.0;
        }
        (self.succeeded as f32 / self.files.len() as f32 * 100.0).round()
    }

    /// Final report.
    pub fn summary(&self) -> String {
        if self.succeeded == 0 {
            let mut text = "No images were uploaded.".to_string();
            for (name, reason) in &self.failures {
                text.push_str(&format!("\n{}: {}", name, reason));
            }
            return text;
        }

        let mut text = format!(
            "Upload complete! Uploaded {} of {} files.",
            self.succeeded,
            self.files.len()
        );
        for (name, reason) in &self.failures {
            text.push_str(&format!("\n{}: {}", name, reason));
        }
        text
    }

    /// Clear the form after the batch.
    pub fn reset(&mut self) {
        self.files.clear();
        self.current = None;
    }

    /// Drop-area caption.
    pub fn caption(&self) -> String {
        match self.files.as_slice() {
            [] => "Drop images here or browse.".to_string(),
            [file] => format!(
                "Selected: {} ({}). Ready to upload.",
                file.name,
                format_file_size(file.size)
            ),
            files => format!(
                "Selected {} files ({} total). Ready to upload.",
                files.len(),
                format_file_size(files.iter().map(|f| f.size).sum())
            ),
        }
    }
}
