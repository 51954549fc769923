/// HTTP access to the gallery server
///
/// `client` wraps every JSON endpoint and the session handling,
/// `upload` streams archives and images to the ingest routes.

pub mod client;
pub mod upload;

pub use client::ApiClient;
