use std::time::Instant;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::guards_for;
use lapd_core::guard::{Invocation, MemberAccess, run_chain};
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_utils::permissions::resolve_user_permissions;

/// Framework-wide pre-command check running the guard chain.
///
/// Rejections surface as `CommandCheckFailed` carrying an [`AppError`].
pub async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
    let command = ctx.command();
    let guards = guards_for(&guard_key(command));
    let user_id = ctx.author().id.get();
    let invocation = Invocation {
        command: &command.qualified_name,
        user_id,
        in_guild: ctx.guild_id().is_some(),
        is_developer: ctx.data().is_developer(user_id),
    };

    let outcome = run_chain(
        &guards,
        invocation,
        || member_access(ctx),
        &ctx.data().cooldowns,
        Instant::now(),
    )
    .await?;

    match outcome {
        Ok(()) => Ok(true),
        Err(rejection) => {
            debug!(
                command = %command.qualified_name,
                user_id,
                ?rejection,
                "command rejected by guard chain"
            );
            Err(AppError::from(rejection).into())
        }
    }
}

/// Stamp the cooldown once a command has completed successfully.
pub async fn post_command(ctx: Context<'_>) {
    let command = ctx.command();
    if guards_for(&guard_key(command)).cooldown.is_some() {
        ctx.data().cooldowns.stamp(
            &command.qualified_name,
            ctx.author().id.get(),
            Instant::now(),
        );
    }
}

pub(crate) fn guard_key(command: &poise::Command<lapd_core::Data, Error>) -> String {
    command
        .context_menu_name
        .as_deref()
        .unwrap_or(&command.qualified_name)
        .to_owned()
}

async fn member_access(ctx: Context<'_>) -> anyhow::Result<MemberAccess> {
    let guild_id = ctx
        .guild_id()
        .context("member access requested outside a guild")?;
    let settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;
    let member = ctx
        .author_member()
        .await
        .context("failed to load invoking member")?;

    let permissions = match member.permissions {
        Some(permissions) => permissions,
        None => resolve_user_permissions(ctx.http(), guild_id, ctx.author().id).await?,
    };
    let role_ids: Vec<u64> = member.roles.iter().map(|role_id| role_id.get()).collect();

    Ok(MemberAccess {
        is_administrator: permissions.contains(serenity::Permissions::ADMINISTRATOR),
        has_manage_guild: permissions.contains(serenity::Permissions::MANAGE_GUILD),
        has_management_role: settings.is_management(&role_ids),
        has_staff_role: settings.is_staff(&role_ids),
    })
}
