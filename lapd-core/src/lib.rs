pub mod cooldown;
pub mod error;
pub mod guard;

use std::sync::Arc;
use std::time::Duration;

use lapd_database::Database;
use lapd_roblox::RobloxClient;

use crate::cooldown::CooldownTracker;

pub use error::AppError;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub roblox: Option<RobloxClient>,
    pub cooldowns: Arc<CooldownTracker>,
    pub developer_ids: Arc<[u64]>,
    /// How long a guild's data is kept after the bot leaves it.
    pub guild_data_grace: Duration,
}

impl Data {
    pub fn is_developer(&self, user_id: u64) -> bool {
        self.developer_ids.contains(&user_id)
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
