use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::choices::SearchKind;
use crate::records::embeds::{arrest_search_line, citation_search_line};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::arrests::search_arrests;
use lapd_database::impls::citations::search_citations;
use lapd_utils::embed::{info_embed, reply_ephemeral};
use lapd_utils::formatting::chunk_lines;
use lapd_utils::pagination::{LINES_PER_PAGE, paginate_embed_pages};
use lapd_utils::parse::validate_roblox_username;

pub const META: CommandMeta = CommandMeta {
    name: "records search",
    desc: "Find arrests and citations filed against a Roblox user.",
    category: "records",
    usage: "/records search <username> [kind]",
    guards: CommandGuards::staff().cooldown_secs(5),
};

const SEARCH_LIMIT: u32 = 100;

#[poise::command(slash_command)]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Roblox username"] username: String,
    #[description = "Only this kind of record"] kind: Option<SearchKind>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let username = validate_roblox_username(&username).map_err(AppError::validation)?;
    let db = &ctx.data().db;

    let mut lines = Vec::new();
    if kind.is_none_or(|kind| kind == SearchKind::Arrests) {
        let arrests = search_arrests(db, guild_id.get(), username, SEARCH_LIMIT).await?;
        lines.extend(arrests.iter().map(arrest_search_line));
    }
    if kind.is_none_or(|kind| kind == SearchKind::Citations) {
        let citations = search_citations(db, guild_id.get(), username, SEARCH_LIMIT).await?;
        lines.extend(citations.iter().map(citation_search_line));
    }

    if lines.is_empty() {
        reply_ephemeral(
            ctx,
            info_embed("Record Search", format!("No records found for `{}`.", username)),
        )
        .await?;
        return Ok(());
    }

    let title = format!("Records for {} ({})", username, lines.len());
    paginate_embed_pages(ctx, &title, &chunk_lines(&lines, LINES_PER_PAGE), 1).await?;
    Ok(())
}
