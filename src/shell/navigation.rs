//! Keeps the embedded view on the player site.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    /// Cancel the navigation and load this URL instead.
    Redirect(String),
}

/// Sends any navigation that leaves `allowed_host` back to the player page.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    player_url: String,
    allowed_host: String,
}

impl NavigationGuard {
    pub fn new(player_url: impl Into<String>, allowed_host: impl Into<String>) -> Self {
        Self {
            player_url: player_url.into(),
            allowed_host: allowed_host.into(),
        }
    }

    pub fn player_url(&self) -> &str {
        &self.player_url
    }

    /// Unparseable URLs and URLs without the allowed host are redirected.
    pub fn check(&self, url: &str) -> NavigationDecision {
        let on_player_host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(&self.allowed_host)))
            .unwrap_or(false);

        if on_player_host {
            NavigationDecision::Allow
        } else {
            NavigationDecision::Redirect(self.player_url.clone())
        }
    }
}
