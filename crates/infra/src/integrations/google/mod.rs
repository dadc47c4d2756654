//! Google Workspace adapters.

pub mod drive;
pub mod normalize;
pub mod oauth;
pub mod query;
pub mod types;

pub use drive::GoogleDriveSource;
pub use oauth::GoogleTokenRefresher;
