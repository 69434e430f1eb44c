use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::common::{require_guild, role_facts};
use crate::member_roles::embeds::backup_embed;
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::member_roles::create_backup;
use lapd_database::model::member_roles::backup_role_ids;
use lapd_utils::embed::reply_ephemeral;

pub const META: CommandMeta = CommandMeta {
    name: "member-roles backup",
    desc: "Save a member's current roles and nickname.",
    category: "member roles",
    usage: "/member-roles backup <member> [reason]",
    guards: CommandGuards::management().cooldown_secs(5),
};

pub const CONTEXT_META: CommandMeta = CommandMeta {
    name: "Backup Member Roles",
    desc: "Save a member's current roles and nickname.",
    category: "member roles",
    usage: "Apps > Backup Member Roles",
    guards: CommandGuards::management().cooldown_secs(5),
};

const MAX_REASON_LEN: usize = 200;

#[poise::command(slash_command)]
pub async fn backup(
    ctx: Context<'_>,
    #[description = "Member to back up"] member: serenity::User,
    #[description = "Why the backup is taken"] reason: Option<String>,
) -> Result<(), Error> {
    save_backup(ctx, &member, reason.as_deref()).await
}

#[poise::command(context_menu_command = "Backup Member Roles", category = "Member Roles")]
pub async fn backup_context(ctx: Context<'_>, member: serenity::User) -> Result<(), Error> {
    save_backup(ctx, &member, None).await
}

async fn save_backup(
    ctx: Context<'_>,
    user: &serenity::User,
    reason: Option<&str>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let reason = reason.map(str::trim).filter(|reason| !reason.is_empty());
    if reason.is_some_and(|reason| reason.chars().count() > MAX_REASON_LEN) {
        return Err(AppError::validation(format!(
            "Reasons are limited to {} characters.",
            MAX_REASON_LEN
        ))
        .into());
    }

    let member = guild_id
        .member(ctx.http(), user.id)
        .await
        .map_err(|_| {
            AppError::not_found(format!(
                "<@{}> is not a member of this server.",
                user.id.get()
            ))
        })?;
    let guild_roles = guild_id.roles(ctx.http()).await?;
    let facts = role_facts(guild_roles.values());
    let member_roles = member.roles.iter().map(|role_id| role_id.get()).collect::<Vec<_>>();
    let role_ids = backup_role_ids(guild_id.get(), &member_roles, &facts);

    let saved = create_backup(
        &ctx.data().db,
        guild_id.get(),
        user.id.get(),
        member.nick.as_deref(),
        &role_ids,
        ctx.author().id.get(),
        reason,
    )
    .await?;
    info!(
        guild_id = guild_id.get(),
        user_id = user.id.get(),
        backup_id = saved.id,
        roles = saved.role_ids.len(),
        "member roles backed up"
    );

    reply_ephemeral(
        ctx,
        backup_embed(&saved).title(format!("Role Backup #{} Saved", saved.id)),
    )
    .await?;
    Ok(())
}
