/// Capability flags
///
/// The server renders the signed-in user's capabilities as `data-can-*`
/// attributes on the index page's `<body>` tag. They are read once at
/// start-up and never change for the lifetime of the session.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::error::{AdminError, Result};

static BODY_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<body\b((?:"[^"]*"|'[^']*'|[^'">])*)>"#).expect("valid body tag regex"));
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-z0-9_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

/// Anything that can answer "what is the value of attribute X".
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Attributes of the host page's `<body>` tag.
#[derive(Debug, Clone, Default)]
pub struct HostPage {
    attributes: HashMap<String, String>,
}

impl HostPage {
    /// Extract the `<body>` attributes from an HTML document.
    /// A document without a body tag yields no attributes.
    pub fn parse(html: &str) -> Self {
        let mut attributes = HashMap::new();

        if let Some(body) = BODY_TAG_RE.captures(html).and_then(|c| c.get(1)) {
            for caps in ATTRIBUTE_RE.captures_iter(body.as_str()) {
                let name = caps[1].to_lowercase();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                attributes.insert(name, value);
            }
        }

        Self { attributes }
    }
}

impl AttributeSource for HostPage {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Which capability an action needs. Used for both hiding controls and
/// re-checking before the action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Upload,
    ManageAlbums,
    ManageArticles,
    Export,
    ViewFiles,
    ViewStats,
    UploadIndividual,
}

impl Capability {
    /// Message shown when the check fails.
    fn denial(self) -> &'static str {
        match self {
            Capability::Upload => "You are not allowed to upload archives. Contact an administrator.",
            Capability::ManageAlbums => "You are not allowed to delete albums.",
            Capability::ManageArticles => "You are not allowed to delete articles.",
            Capability::Export => "You are not allowed to export data.",
            Capability::ViewFiles => "You are not allowed to view files.",
            Capability::ViewStats => "You are not allowed to view statistics.",
            Capability::UploadIndividual => {
                "You are not allowed to upload individual images. Contact an administrator."
            }
        }
    }
}

/// The signed-in user's capabilities. All `false` unless granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub can_upload: bool,
    pub can_manage_albums: bool,
    pub can_manage_articles: bool,
    pub can_export: bool,
    pub can_view_files: bool,
    pub can_view_stats: bool,
    pub can_upload_individual: bool,
}

impl PermissionSet {
    /// Read the flags from a source. Only the exact value `true` grants a
    /// capability; missing or anything else is a denial.
    pub fn from_source(source: &impl AttributeSource) -> Self {
        let flag = |name: &str| source.attribute(name) == Some("true");

        Self {
            can_upload: flag("data-can-upload"),
            can_manage_albums: flag("data-can-manage-albums"),
            can_manage_articles: flag("data-can-manage-articles"),
            can_export: flag("data-can-export"),
            can_view_files: flag("data-can-view-files"),
            can_view_stats: flag("data-can-view-stats"),
            can_upload_individual: flag("data-can-upload-individual"),
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Upload => self.can_upload,
            Capability::ManageAlbums => self.can_manage_albums,
            Capability::ManageArticles => self.can_manage_articles,
            Capability::Export => self.can_export,
            Capability::ViewFiles => self.can_view_files,
            Capability::ViewStats => self.can_view_stats,
            Capability::UploadIndividual => self.can_upload_individual,
        }
    }

    /// Gate an action. Call this in the handler even when the control is
    /// hidden, since messages can be produced from elsewhere.
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(AdminError::PermissionDenied(capability.denial().to_string()))
        }
    }

    /// The "Manage links" entry point needs at least one management right.
    pub fn can_manage_anything(&self) -> bool {
        self.can_manage_albums || self.can_manage_articles || self.can_export
    }

    /// Viewers who cannot upload start on the manage panel.
    pub fn is_viewer_only(&self) -> bool {
        !self.can_upload && self.can_view_files
    }
}
