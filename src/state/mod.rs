/// State management module
///
/// Everything the window shows is derived from these types; the update
/// loop in main.rs only moves replies into them.
/// - Records and reply bodies from the server (data.rs)
/// - Capability flags of the signed-in user (permissions.rs)
/// - Capability checks in front of each action (actions.rs)
/// - Album/article dropdowns and request tickets (selection.rs)
/// - Grouping and ordering of the link list (library.rs)
/// - Deferred thumbnail loading (lazy.rs)
/// - Archive and image upload progress (upload.rs)
/// - Export options (export.rs), stats card (stats.rs)
/// - Session expiry (session.rs), copy labels (feedback.rs)

pub mod actions;
pub mod data;
pub mod export;
pub mod feedback;
pub mod lazy;
pub mod library;
pub mod permissions;
pub mod selection;
pub mod session;
pub mod stats;
pub mod upload;
