/// Transient "Copied!" labels on copy buttons
///
/// Each copy starts a two-second window for that link. A newer copy of
/// the same link restarts the window; the older timer then does nothing.
/// The label is only shown after the text has reached a clipboard.

use std::collections::HashMap;
use std::time::Duration;

pub const COPIED_FOR: Duration = Duration::from_secs(2);

/// Somewhere a link can be copied to.
pub trait TextSink {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// On X11 and Wayland the copied text is served only while this
/// instance lives, so the application holds a single one.
impl TextSink for arboard::Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        arboard::Clipboard::set_text(self, text.to_string()).map_err(|e| e.to_string())
    }
}

/// Copy through the held system clipboard. `false` means the caller
/// has to take the fallback path and verify it.
pub fn copy_to(sink: Option<&mut impl TextSink>, text: &str) -> bool {
    let Some(sink) = sink else {
        return false;
    };
    match sink.set_text(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("system clipboard refused the link, using fallback: {e}");
            false
        }
    }
}

#[derive(Debug, Default)]
pub struct CopyFeedback {
    active: HashMap<String, u64>,
    next: u64,
}

impl CopyFeedback {
    /// Show the label for `key`. The returned token is handed back to `expire`.
    pub fn copied(&mut self, key: &str) -> u64 {
        self.next += 1;
        self.active.insert(key.to_string(), self.next);
        self.next
    }

    /// Revert the label, unless a later copy restarted it.
    pub fn expire(&mut self, key: &str, token: u64) -> bool {
        if self.active.get(key) == Some(&token) {
            self.active.remove(key);
            true
        } else {
            false
        }
    }

    pub fn is_copied(&self, key: &str) -> bool {
        self.active.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Board {
        contents: Option<String>,
        broken: bool,
    }

    impl TextSink for Board {
        fn set_text(&mut self, text: &str) -> Result<(), String> {
            if self.broken {
                return Err("no display".to_string());
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_through_held_clipboard() {
        let mut board = Board::default();
        assert!(copy_to(Some(&mut board), "https://pics.example.com/a.jpg"));
        assert!(copy_to(Some(&mut board), "https://pics.example.com/b.jpg"));
        assert_eq!(board.contents.as_deref(), Some("https://pics.example.com/b.jpg"));
    }

    #[test]
    fn test_no_label_without_clipboard() {
        assert!(!copy_to(None::<&mut Board>, "https://pics.example.com/a.jpg"));

        let mut board = Board {
            broken: true,
            ..Board::default()
        };
        assert!(!copy_to(Some(&mut board), "https://pics.example.com/a.jpg"));
        assert!(board.contents.is_none());
    }

    #[test]
    fn test_label_reverts() {
        let mut feedback = CopyFeedback::default();
        let token = feedback.copied("a.jpg");
        assert!(feedback.is_copied("a.jpg"));
        assert!(!feedback.is_copied("b.jpg"));
        assert!(feedback.expire("a.jpg", token));
        assert!(!feedback.is_copied("a.jpg"));
    }

    #[test]
    fn test_recopy_restarts_window() {
        let mut feedback = CopyFeedback::default();
        let first = feedback.copied("a.jpg");
        let second = feedback.copied("a.jpg");
        assert!(!feedback.expire("a.jpg", first));
        assert!(feedback.is_copied("a.jpg"));
        assert!(feedback.expire("a.jpg", second));
    }
}
