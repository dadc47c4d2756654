//! Port interface for the per-connection ignore-pattern source

use async_trait::async_trait;
use docpulse_domain::Result;

/// Supplies the raw folder-name patterns a connection wants excluded.
#[async_trait]
pub trait IgnorePatternSource: Send + Sync {
    /// Patterns for the connection, already parsed (one folder name each).
    async fn patterns(&self, connection_id: &str) -> Result<Vec<String>>;
}
