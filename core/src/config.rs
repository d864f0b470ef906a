//! Client configuration.

/// The public card builder endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://mtgcardbuilder.com/wp-admin/admin-ajax.php";

/// Where requests go and what fixed fields ride along with every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// WordPress `action` routing field, sent right after `method` when set.
    pub action: Option<String>,
}

impl ClientConfig {
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }

    pub fn action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            action: None,
        }
    }
}
