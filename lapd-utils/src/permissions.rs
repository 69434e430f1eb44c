use poise::serenity_prelude as serenity;

/// Resolve a member's effective guild permissions from their roles.
///
/// The guild owner holds every permission.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;

    Ok(permissions_from_roles(
        guild_id,
        &member.roles,
        guild.roles.values(),
    ))
}

/// OR together the permissions of `@everyone` and every role the member holds.
pub fn permissions_from_roles<'a>(
    guild_id: serenity::GuildId,
    member_roles: &[serenity::RoleId],
    guild_roles: impl IntoIterator<Item = &'a serenity::Role>,
) -> serenity::Permissions {
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    guild_roles
        .into_iter()
        .filter(|role| role.id == everyone_role_id || member_roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |resolved, role| {
            resolved | role.permissions
        })
}

/// Position of the highest role `user_id` holds (0 when only `@everyone`).
pub async fn highest_role_position(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<u16> {
    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    Ok(member
        .roles
        .iter()
        .filter_map(|role_id| roles.get(role_id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0))
}
