use tracing::{error, info, warn};

use crate::jobs::JobContext;
use lapd_database::impls::guild_data::{due_guild_deletions, purge_guild_data};
use lapd_database::impls::now_unix_secs;

/// Purge the data of guilds whose grace period after the bot left has passed.
pub async fn run(context: &JobContext) {
    let now = now_unix_secs();
    let guild_ids = match due_guild_deletions(&context.db, now).await {
        Ok(guild_ids) => guild_ids,
        Err(err) => {
            error!(?err, "failed to list guilds due for deletion");
            return;
        }
    };

    for guild_id in guild_ids {
        match purge_guild_data(&context.db, guild_id, now).await {
            Ok(Some(rows)) => info!(guild_id, rows, "guild data deleted"),
            Ok(None) => info!(guild_id, "guild deletion skipped; the bot rejoined"),
            Err(err) => warn!(?err, guild_id, "failed to delete guild data"),
        }
    }
}
