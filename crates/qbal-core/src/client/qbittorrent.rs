//! qBittorrent Web API v2 client over libcurl.
//!
//! One `Easy` handle is reused for the whole session; the in-memory cookie
//! engine carries the `SID` session cookie from `auth/login` into every
//! later request. All calls run in the current thread; call from
//! `spawn_blocking` when used from async code.

use curl::easy::Easy;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::QueueClient;
use crate::config::QbalConfig;
use crate::error::{ConfigError, TransportError};
use crate::queue::{Item, ItemId, ItemState};

/// One entry of `GET /api/v2/torrents/info`. States outside the eligible
/// set still appear in the response and must decode, so `state` stays a
/// plain string here.
#[derive(Debug, Deserialize)]
struct TorrentInfo {
    hash: String,
    name: String,
    state: String,
    priority: i64,
    dlspeed: u64,
}

/// Authenticated session against one qBittorrent Web UI.
pub struct QbClient {
    easy: Easy,
    base: Url,
    username: String,
    password: String,
}

impl QbClient {
    pub fn new(cfg: &QbalConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&cfg.qb_host)?;
        let mut easy = Easy::new();
        // Empty cookie file enables the in-memory cookie engine.
        let _ = easy.cookie_file("");
        let _ = easy.connect_timeout(Duration::from_secs(15));
        let _ = easy.timeout(Duration::from_secs(30));
        Ok(Self {
            easy,
            base,
            username: cfg.qb_username.clone(),
            password: cfg.qb_password.clone(),
        })
    }

    /// Logs in and stores the session cookie on the handle.
    pub fn login(&mut self) -> Result<(), TransportError> {
        let user = self.username.clone();
        let pass = self.password.clone();
        let body = format!(
            "username={}&password={}",
            self.easy.url_encode(user.as_bytes()),
            self.easy.url_encode(pass.as_bytes()),
        );
        let response = self.post("login", "api/v2/auth/login", &body)?;
        // The Web API answers HTTP 200 with a literal `Ok.` or `Fails.` body.
        if response.trim() != "Ok." {
            return Err(TransportError::AuthRejected);
        }
        tracing::info!(host = %self.base, "logged in to qBittorrent Web UI");
        Ok(())
    }

    // Plain concatenation: `path` may carry a query string, which Url::join
    // would percent-encode. Any base path the user configured (e.g. behind a
    // reverse proxy) is preserved.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    fn perform(&mut self, action: &'static str) -> Result<String, TransportError> {
        let mut body = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        let status = self.easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(TransportError::Status { action, status });
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn get(&mut self, action: &'static str, path: &str) -> Result<String, TransportError> {
        let url = self.endpoint(path);
        self.easy.url(&url)?;
        self.easy.get(true)?;
        self.perform(action)
    }

    fn post(
        &mut self,
        action: &'static str,
        path: &str,
        body: &str,
    ) -> Result<String, TransportError> {
        let url = self.endpoint(path);
        self.easy.url(&url)?;
        self.easy.post(true)?;
        self.easy.post_fields_copy(body.as_bytes())?;
        self.perform(action)
    }

    fn prio_action(&mut self, action: &'static str, path: &str, id: &ItemId) -> Result<(), TransportError> {
        let body = format!("hashes={}", self.easy.url_encode(id.0.as_bytes()));
        self.post(action, path, &body)?;
        Ok(())
    }
}

impl QueueClient for QbClient {
    fn list_eligible_items(&mut self) -> Result<Vec<Item>, TransportError> {
        let body = self.get("torrents/info", "api/v2/torrents/info?filter=downloading")?;
        let raw: Vec<TorrentInfo> = serde_json::from_str(&body)?;
        let items = raw
            .into_iter()
            .filter_map(|t| {
                let state = ItemState::from_api(&t.state)?;
                Some(Item {
                    id: ItemId(t.hash),
                    name: t.name,
                    state,
                    priority: t.priority,
                    dlspeed: t.dlspeed,
                })
            })
            .collect();
        Ok(items)
    }

    fn move_to_end(&mut self, id: &ItemId) -> Result<(), TransportError> {
        self.prio_action("torrents/bottomPrio", "api/v2/torrents/bottomPrio", id)
    }

    fn increase_priority(&mut self, id: &ItemId) -> Result<(), TransportError> {
        self.prio_action("torrents/increasePrio", "api/v2/torrents/increasePrio", id)
    }

    fn decrease_priority(&mut self, id: &ItemId) -> Result<(), TransportError> {
        self.prio_action("torrents/decreasePrio", "api/v2/torrents/decreasePrio", id)
    }
}
