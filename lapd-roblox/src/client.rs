use std::{env, time::Duration};

use anyhow::Context as _;
use lapd_database::{
    CacheService,
    cache::{ROBLOX_USER_CACHE_TTL, roblox_headshot_key, roblox_user_key},
};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::model::{HeadshotResponse, RobloxUser, UsernameLookupResponse};

const USERS_API: &str = "https://users.roblox.com/v1/usernames/users";
const HEADSHOT_API: &str = "https://thumbnails.roblox.com/v1/users/avatar-headshot";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsernameLookupRequest<'a> {
    usernames: [&'a str; 1],
    exclude_banned_users: bool,
}

/// Resolves Roblox usernames to accounts. Lookups are cached, misses included.
#[derive(Clone, Debug)]
pub struct RobloxClient {
    http: Client,
    cache: CacheService,
}

impl RobloxClient {
    pub fn from_env_optional(cache: CacheService) -> anyhow::Result<Option<Self>> {
        let enabled = env::var("ROBLOX_API_ENABLED")
            .ok()
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(true);

        if !enabled {
            return Ok(None);
        }

        Ok(Some(Self::new(cache)?))
    }

    pub fn new(cache: CacheService) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("lapd-central/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build roblox http client")?;

        Ok(Self { http, cache })
    }

    /// Exact-match username lookup. `Ok(None)` means the account does not exist.
    pub async fn user_by_username(&self, username: &str) -> anyhow::Result<Option<RobloxUser>> {
        let username = username.trim();
        let cache_key = roblox_user_key(&self.cache, username);

        self.cache
            .get_or_load_json(&cache_key, ROBLOX_USER_CACHE_TTL, || async {
                debug!(username, "looking up roblox user");
                let response: UsernameLookupResponse = self
                    .http
                    .post(USERS_API)
                    .json(&UsernameLookupRequest {
                        usernames: [username],
                        exclude_banned_users: false,
                    })
                    .send()
                    .await
                    .context("roblox username lookup failed")?
                    .error_for_status()
                    .context("roblox username lookup returned an error status")?
                    .json()
                    .await
                    .context("failed to decode roblox username lookup")?;

                Ok(response.into_user(username))
            })
            .await
    }

    /// Avatar headshot URL, if Roblox has finished rendering one.
    pub async fn avatar_headshot(&self, roblox_id: u64) -> anyhow::Result<Option<String>> {
        let cache_key = roblox_headshot_key(&self.cache, roblox_id);

        self.cache
            .get_or_load_json(&cache_key, ROBLOX_USER_CACHE_TTL, || async {
                let response: HeadshotResponse = self
                    .http
                    .get(HEADSHOT_API)
                    .query(&[
                        ("userIds", roblox_id.to_string()),
                        ("size", "150x150".to_owned()),
                        ("format", "Png".to_owned()),
                        ("isCircular", "false".to_owned()),
                    ])
                    .send()
                    .await
                    .context("roblox headshot request failed")?
                    .error_for_status()
                    .context("roblox headshot request returned an error status")?
                    .json()
                    .await
                    .context("failed to decode roblox headshot response")?;

                Ok(response.image_url_for(roblox_id))
            })
            .await
    }
}
