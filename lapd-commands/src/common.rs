use poise::serenity_prelude as serenity;

use lapd_core::{AppError, Context, Error};
use lapd_database::model::member_roles::RoleFacts;

/// Guild of the invocation. The guard chain already rejects DMs for
/// guild-only commands, so this only fails for misconfigured guards.
pub fn require_guild(ctx: Context<'_>) -> Result<serenity::GuildId, Error> {
    ctx.guild_id()
        .ok_or_else(|| AppError::validation("This command can only be used in a server.").into())
}

pub async fn member_role_ids(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> Result<Vec<u64>, Error> {
    if user_id == ctx.author().id
        && let Some(member) = ctx.author_member().await
    {
        return Ok(member.roles.iter().map(|role_id| role_id.get()).collect());
    }

    let member = guild_id.member(ctx.http(), user_id).await.map_err(|_| {
        AppError::not_found(format!("<@{}> is not a member of this server.", user_id.get()))
    })?;
    Ok(member.roles.iter().map(|role_id| role_id.get()).collect())
}

pub fn role_facts<'a>(roles: impl IntoIterator<Item = &'a serenity::Role>) -> Vec<RoleFacts> {
    roles
        .into_iter()
        .map(|role| RoleFacts {
            id: role.id.get(),
            position: role.position,
            managed: role.managed,
        })
        .collect()
}

pub fn display_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// Strip mention pings from free text echoed back into embeds.
pub fn sanitize(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn sanitize_breaks_mentions() {
        assert_eq!(sanitize("@everyone hi"), "@\u{200B}everyone hi");
        assert_eq!(sanitize("plain"), "plain");
    }
}
