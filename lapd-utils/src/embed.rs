use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x1F_3A_6E;
pub const SUCCESS_EMBED_COLOR: u32 = 0x2E_A0_43;
pub const WARNING_EMBED_COLOR: u32 = 0xE3_A0_08;
pub const ERROR_EMBED_COLOR: u32 = 0xD1_24_2F;

pub fn info_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

pub fn success_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    info_embed(title, description).color(SUCCESS_EMBED_COLOR)
}

pub fn warning_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    info_embed(title, description).color(WARNING_EMBED_COLOR)
}

/// The templated embed every user-visible failure renders as.
pub fn error_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    info_embed(title, description)
        .color(ERROR_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(
            "If this keeps happening, contact your server administrators.",
        ))
}

/// Send an ephemeral embed reply.
pub async fn reply_ephemeral<U, E>(
    ctx: poise::Context<'_, U, E>,
    embed: serenity::CreateEmbed,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Send a public embed reply.
pub async fn reply_embed<U, E>(
    ctx: poise::Context<'_, U, E>,
    embed: serenity::CreateEmbed,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
