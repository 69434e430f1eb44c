mod active;
mod admin;
mod embeds;
mod leaderboard;
mod manage;
mod roles;
mod stats;
mod void;

pub use active::META as ACTIVE_META;
pub use admin::META as ADMIN_META;
pub use leaderboard::META as LEADERBOARD_META;
pub use manage::META as MANAGE_META;
pub use stats::META as STATS_META;
pub use void::META as VOID_META;

use self::active::active;
use self::admin::admin;
use self::leaderboard::leaderboard;
use self::manage::manage;
use self::stats::stats;
use self::void::void;

use lapd_core::{AppError, Context, Error};
use lapd_database::impls::shift_types::list_shift_types;
use lapd_database::model::guild_settings::{ShiftType, resolve_shift_type};
use tracing::warn;

/// Shift tracking.
#[poise::command(
    slash_command,
    category = "Duty",
    subcommands("manage", "active", "leaderboard", "stats", "admin", "void"),
    subcommand_required
)]
pub async fn duty(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Resolve the shift type a duty command operates on.
pub(crate) async fn pick_shift_type(
    ctx: Context<'_>,
    guild_id: u64,
    wanted: Option<&str>,
) -> Result<ShiftType, Error> {
    let types = list_shift_types(&ctx.data().db, guild_id).await?;
    if types.is_empty() {
        return Err(AppError::validation(
            "This server has no shift types. Ask management to add one with `/config shift-type add`.",
        )
        .into());
    }

    resolve_shift_type(&types, wanted).cloned().ok_or_else(|| {
        let names = types
            .iter()
            .map(|shift_type| format!("`{}`", shift_type.name))
            .collect::<Vec<_>>()
            .join(", ");
        AppError::not_found(format!("Unknown shift type. Available types: {}", names)).into()
    })
}

/// Shift type filter for listings: a name narrows to that type, omitted means all.
pub(crate) async fn shift_type_filter(
    ctx: Context<'_>,
    guild_id: u64,
    wanted: Option<&str>,
) -> Result<Option<String>, Error> {
    match wanted.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => Ok(Some(pick_shift_type(ctx, guild_id, Some(name)).await?.name)),
        None => Ok(None),
    }
}

/// Autocomplete shift type names.
pub(crate) async fn autocomplete_shift_type(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };

    match list_shift_types(&ctx.data().db, guild_id.get()).await {
        Ok(types) => matching_names(types.into_iter().map(|shift_type| shift_type.name), partial),
        Err(err) => {
            warn!(?err, guild_id = guild_id.get(), "shift type autocomplete lookup failed");
            Vec::new()
        }
    }
}

/// Case-insensitive substring match, capped at Discord's 25 choices.
fn matching_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial = partial.to_ascii_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_ascii_lowercase().contains(&partial))
        .take(25)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::matching_names;

    #[test]
    fn autocomplete_matches_substrings_case_insensitively() {
        let names = ["Patrol", "SWAT", "Traffic Patrol"].map(str::to_owned);
        assert_eq!(matching_names(names.clone(), "pat"), vec!["Patrol", "Traffic Patrol"]);
        assert_eq!(matching_names(names, ""), vec!["Patrol", "SWAT", "Traffic Patrol"]);

        let many = (0..40).map(|n| format!("Type {n}"));
        assert_eq!(matching_names(many, "type").len(), 25);
    }
}
