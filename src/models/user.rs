//! User model as returned by the backend.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A Travelog user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub username: String,
    /// Not every listing endpoint includes the email
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar URL, when the backend provides one explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Avatar URL, falling back to the conventional upload path.
    pub fn avatar_url(&self, api_url: &str) -> String {
        match &self.avatar {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => url.clone(),
            Some(path) => format!("{}/{}", api_url, path.trim_start_matches('/')),
            None => avatar_path(api_url, self.id),
        }
    }
}

/// Conventional avatar location for a user id.
pub fn avatar_path(api_url: &str, user_id: u64) -> String {
    format!("{}/uploads/user_{}.png", api_url, user_id)
}
