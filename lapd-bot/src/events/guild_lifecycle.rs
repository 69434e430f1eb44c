use poise::serenity_prelude as serenity;
use tracing::{error, info};

use lapd_core::Data;
use lapd_database::impls::guild_settings::{register_guild, schedule_guild_deletion};
use lapd_database::impls::now_unix_secs;
use lapd_database::impls::shift_types::seed_default_shift_type;

/// Register a guild the bot joined or sees on startup, cancelling any pending
/// data deletion and making sure it has a shift type to work with.
pub async fn handle_guild_create(data: &Data, guild: &serenity::Guild) {
    let guild_id = guild.id.get();

    match register_guild(&data.db, guild_id).await {
        Ok(true) => info!(guild_id, "guild rejoined; scheduled data deletion cancelled"),
        Ok(false) => {}
        Err(err) => error!(?err, guild_id, "failed to register guild"),
    }

    match seed_default_shift_type(&data.db, guild_id).await {
        Ok(true) => info!(guild_id, "seeded default shift type"),
        Ok(false) => {}
        Err(err) => error!(?err, guild_id, "failed to seed default shift type"),
    }
}

/// Schedule a guild's data for deletion once the bot has left it. Outages
/// (`unavailable`) keep the data untouched.
pub async fn handle_guild_delete(data: &Data, incomplete: &serenity::UnavailableGuild) {
    if incomplete.unavailable {
        return;
    }

    let guild_id = incomplete.id.get();
    let delete_at = deletion_due_at(now_unix_secs(), data.guild_data_grace.as_secs());

    match schedule_guild_deletion(&data.db, guild_id, delete_at).await {
        Ok(true) => info!(guild_id, delete_at, "guild left; data deletion scheduled"),
        Ok(false) => {}
        Err(err) => error!(?err, guild_id, "failed to schedule guild data deletion"),
    }
}

fn deletion_due_at(now: u64, grace_secs: u64) -> u64 {
    now.saturating_add(grace_secs)
}

#[cfg(test)]
mod tests {
    use super::deletion_due_at;

    #[test]
    fn deletion_waits_for_grace_period() {
        assert_eq!(deletion_due_at(1_000, 7 * 86_400), 605_800);
        assert_eq!(deletion_due_at(u64::MAX - 1, 10), u64::MAX);
    }
}
