use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::config::embeds::shift_type_line;
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::shift_types::{
    add_shift_type, list_shift_types, remove_shift_type, set_default_shift_type,
};
use lapd_database::model::guild_settings::MAX_SHIFT_TYPES_PER_GUILD;
use lapd_utils::embed::{info_embed, reply_ephemeral, success_embed};
use lapd_utils::formatting::bullet_list;
use lapd_utils::parse::parse_role_ids;

pub const ADD_META: CommandMeta = CommandMeta {
    name: "config shift-type add",
    desc: "Create a shift type, optionally limited to some roles.",
    category: "config",
    usage: "/config shift-type add <name> [roles]",
    guards: CommandGuards::management().cooldown_secs(3),
};
pub const REMOVE_META: CommandMeta = CommandMeta {
    name: "config shift-type remove",
    desc: "Delete a shift type.",
    category: "config",
    usage: "/config shift-type remove <name>",
    guards: CommandGuards::management().cooldown_secs(3),
};
pub const DEFAULT_META: CommandMeta = CommandMeta {
    name: "config shift-type default",
    desc: "Pick the shift type used when none is given.",
    category: "config",
    usage: "/config shift-type default <name>",
    guards: CommandGuards::management().cooldown_secs(3),
};
pub const LIST_META: CommandMeta = CommandMeta {
    name: "config shift-type list",
    desc: "List shift types and who may work them.",
    category: "config",
    usage: "/config shift-type list",
    guards: CommandGuards::staff().cooldown_secs(3),
};

const MAX_NAME_LEN: usize = 32;

fn check_name(raw: &str) -> Result<&str, String> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(format!("Shift type names are 1 to {} characters long.", MAX_NAME_LEN));
    }
    if !name
        .chars()
        .all(|ch| ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_'))
    {
        return Err(
            "Shift type names may only contain letters, numbers, spaces, dashes and underscores."
                .to_owned(),
        );
    }
    Ok(name)
}

#[poise::command(
    slash_command,
    rename = "shift-type",
    subcommands("add", "remove", "set_default", "list_types"),
    subcommand_required
)]
pub async fn shift_type(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(slash_command)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Shift type name"] name: String,
    #[description = "Roles allowed to work it (mentions); everyone when omitted"]
    roles: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let name = check_name(&name).map_err(AppError::validation)?;
    let role_ids = roles.as_deref().map(parse_role_ids).unwrap_or_default();
    let db = &ctx.data().db;

    if list_shift_types(db, guild_id).await?.len() >= MAX_SHIFT_TYPES_PER_GUILD {
        return Err(AppError::validation(format!(
            "A server can have at most {} shift types.",
            MAX_SHIFT_TYPES_PER_GUILD
        ))
        .into());
    }

    let Some(created) = add_shift_type(db, guild_id, name, &role_ids).await? else {
        return Err(AppError::conflict(format!(
            "A shift type named `{}` already exists.",
            name
        ))
        .into());
    };
    info!(
        guild_id,
        shift_type = %created.name,
        created_by = ctx.author().id.get(),
        "shift type added"
    );

    reply_ephemeral(ctx, success_embed("Shift Type Added", shift_type_line(&created))).await?;
    Ok(())
}

#[poise::command(slash_command)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Shift type name"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    name: String,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    if !remove_shift_type(&ctx.data().db, guild_id, &name).await? {
        return Err(AppError::not_found(format!(
            "No shift type named `{}` exists.",
            name.trim()
        ))
        .into());
    }
    info!(
        guild_id,
        shift_type = %name.trim(),
        removed_by = ctx.author().id.get(),
        "shift type removed"
    );

    reply_ephemeral(
        ctx,
        success_embed(
            "Shift Type Removed",
            format!("`{}` was removed. Past shifts of this type are kept.", name.trim()),
        ),
    )
    .await?;
    Ok(())
}

#[poise::command(slash_command, rename = "default")]
pub async fn set_default(
    ctx: Context<'_>,
    #[description = "Shift type name"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    name: String,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    if !set_default_shift_type(&ctx.data().db, guild_id, &name).await? {
        return Err(AppError::not_found(format!(
            "No shift type named `{}` exists.",
            name.trim()
        ))
        .into());
    }

    reply_ephemeral(
        ctx,
        success_embed(
            "Default Shift Type",
            format!("`{}` is now the default shift type.", name.trim()),
        ),
    )
    .await?;
    Ok(())
}

#[poise::command(slash_command, rename = "list")]
pub async fn list_types(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let lines = list_shift_types(&ctx.data().db, guild_id)
        .await?
        .iter()
        .map(shift_type_line)
        .collect::<Vec<_>>();

    reply_ephemeral(
        ctx,
        info_embed("Shift Types", bullet_list(&lines, "No shift types configured.")),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check_name;

    #[test]
    fn shift_type_names() {
        assert_eq!(check_name("  SWAT Team "), Ok("SWAT Team"));
        assert!(check_name("").is_err());
        assert!(check_name("bad/name").is_err());
        assert!(check_name(&"x".repeat(33)).is_err());
    }
}
