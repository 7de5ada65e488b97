use serde::Serialize;

/// Fields pulled from the second line of an uploaded combat log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Raw event timestamp, e.g. `20251213-22:28:09:301`
    pub timestamp: String,
    pub player: String,
    pub boss: String,
}

impl LogRecord {
    /// Filename stem before sanitization: `{timestamp}_{player}_{boss}`
    pub fn base_name(&self) -> String {
        format!(
            "{}_{}_{}",
            crate::parser::normalize_timestamp(&self.timestamp),
            self.player,
            self.boss
        )
    }
}

/// Reply to a successful upload when the client asks for JSON
#[derive(Debug, Serialize, Clone)]
pub struct UploadReceipt {
    pub filename: String,
    pub download_url: String,
}
