use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::choices::RecordKindChoice;
use crate::records::record_not_found;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::records::delete_record;
use lapd_database::model::records::RecordKind;
use lapd_utils::confirmation::confirm_destructive;
use lapd_utils::embed::{reply_ephemeral, success_embed, warning_embed};
use lapd_utils::formatting::format_record_label;

pub const META: CommandMeta = CommandMeta {
    name: "records delete",
    desc: "Permanently delete a record.",
    category: "records",
    usage: "/records delete <kind> <number>",
    guards: CommandGuards::management().cooldown_secs(5),
};

#[poise::command(slash_command)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Kind of record"] kind: RecordKindChoice,
    #[description = "Record number"]
    #[min = 1]
    number: u64,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let kind = RecordKind::from(kind);
    let label = format_record_label(kind.code(), number);

    let prompt = warning_embed(
        "Delete Record",
        format!("Delete {} `{}` permanently?", kind.label().to_ascii_lowercase(), label),
    );
    if !confirm_destructive(ctx, prompt, "Deleting record...").await? {
        return Ok(());
    }

    if !delete_record(&ctx.data().db, guild_id.get(), kind, number).await? {
        return Err(record_not_found(kind, number));
    }
    info!(
        guild_id = guild_id.get(),
        record = %label,
        deleted_by = ctx.author().id.get(),
        "record deleted"
    );

    reply_ephemeral(
        ctx,
        success_embed("Record Deleted", format!("`{}` was deleted.", label)),
    )
    .await?;
    Ok(())
}
