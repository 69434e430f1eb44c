use poise::serenity_prelude as serenity;
use tracing::warn;

/// Add each role to a member. Returns how many calls failed.
///
/// Failures (missing permissions, deleted roles) are logged and skipped so
/// one bad role never blocks the rest.
pub async fn add_roles(
    http: &serenity::Http,
    guild_id: u64,
    user_id: u64,
    role_ids: &[u64],
    reason: &str,
) -> usize {
    let mut failed = 0;
    for role_id in role_ids {
        if let Err(e) = http
            .add_member_role(
                serenity::GuildId::new(guild_id),
                serenity::UserId::new(user_id),
                serenity::RoleId::new(*role_id),
                Some(reason),
            )
            .await
        {
            warn!(?e, guild_id, user_id, role_id, "failed to add role");
            failed += 1;
        }
    }
    failed
}

/// Remove each role from a member. Returns how many calls failed.
pub async fn remove_roles(
    http: &serenity::Http,
    guild_id: u64,
    user_id: u64,
    role_ids: &[u64],
    reason: &str,
) -> usize {
    let mut failed = 0;
    for role_id in role_ids {
        if let Err(e) = http
            .remove_member_role(
                serenity::GuildId::new(guild_id),
                serenity::UserId::new(user_id),
                serenity::RoleId::new(*role_id),
                Some(reason),
            )
            .await
        {
            warn!(?e, guild_id, user_id, role_id, "failed to remove role");
            failed += 1;
        }
    }
    failed
}

/// Post an embed to a configured log channel. Unconfigured channels are a no-op.
pub async fn post_log_embed(
    http: &serenity::Http,
    channel_id: Option<u64>,
    content: Option<String>,
    embed: serenity::CreateEmbed,
) -> bool {
    let Some(channel_id) = channel_id else {
        return false;
    };

    let mut message = serenity::CreateMessage::new().embed(embed);
    if let Some(content) = content {
        message = message
            .content(content)
            .allowed_mentions(serenity::CreateAllowedMentions::new().all_roles(true));
    }

    match serenity::ChannelId::new(channel_id)
        .send_message(http, message)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            warn!(?e, channel_id, "failed to post log embed");
            false
        }
    }
}

/// DM a member. Closed DMs are common and only logged at debug level.
pub async fn dm_user(http: &serenity::Http, user_id: u64, embed: serenity::CreateEmbed) -> bool {
    match serenity::UserId::new(user_id)
        .direct_message(http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(?e, user_id, "failed to DM user");
            false
        }
    }
}
