use serde::{Deserialize, Serialize};

/// Session validator data captured by the host for the current visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorFingerprint {
    pub remote_addr: Option<String>,
    pub http_via: Option<String>,
    pub http_x_forwarded_for: Option<String>,
    pub http_user_agent: Option<String>,
}

impl VisitorFingerprint {
    /// Returns whether no fingerprint field is known.
    pub fn is_empty(&self) -> bool {
        self.remote_addr.is_none()
            && self.http_via.is_none()
            && self.http_x_forwarded_for.is_none()
            && self.http_user_agent.is_none()
    }
}
