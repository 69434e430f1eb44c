use tracing::info;

use crate::CommandMeta;
use crate::common::{require_guild, role_facts};
use crate::member_roles::embeds::{backup_embed, restore_report};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::member_roles::get_backup;
use lapd_database::model::member_roles::plan_restore;
use lapd_utils::delivery::add_roles;
use lapd_utils::embed::reply_embed;
use lapd_utils::permissions::highest_role_position;

pub const META: CommandMeta = CommandMeta {
    name: "member-roles restore",
    desc: "Give a member back the roles saved in a backup.",
    category: "member roles",
    usage: "/member-roles restore <backup_id>",
    guards: CommandGuards::management().cooldown_secs(10),
};

#[poise::command(slash_command)]
pub async fn restore(
    ctx: Context<'_>,
    #[description = "Backup id"]
    #[min = 1]
    backup_id: u64,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let saved = get_backup(&ctx.data().db, guild_id.get(), backup_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "No role backup #{} exists in this server.",
                backup_id
            ))
        })?;

    ctx.defer().await?;
    let user_id = poise::serenity_prelude::UserId::new(saved.user_id);
    let member = guild_id
        .member(ctx.http(), user_id)
        .await
        .map_err(|_| {
            AppError::not_found(format!(
                "<@{}> is no longer a member of this server.",
                saved.user_id
            ))
        })?;
    let guild_roles = guild_id.roles(ctx.http()).await?;
    let bot_id = ctx.framework().bot_id;
    let bot_top = highest_role_position(ctx.http(), guild_id, bot_id).await?;

    let member_roles = member.roles.iter().map(|role_id| role_id.get()).collect::<Vec<_>>();
    let plan = plan_restore(
        &saved.role_ids,
        &member_roles,
        &role_facts(guild_roles.values()),
        bot_top,
    );

    let reason = format!("Restoring role backup #{}", saved.id);
    let failed = add_roles(ctx.http(), guild_id.get(), saved.user_id, &plan.to_add, &reason).await;
    info!(
        guild_id = guild_id.get(),
        user_id = saved.user_id,
        backup_id = saved.id,
        added = plan.to_add.len() - failed,
        skipped = plan.already_held.len() + plan.deleted.len() + plan.unassignable.len(),
        "member roles restored"
    );

    let embed = backup_embed(&saved)
        .title(format!("Role Backup #{} Restored", saved.id))
        .field("Result", restore_report(&plan, failed), false);
    reply_embed(ctx, embed).await?;
    Ok(())
}
