use crate::CommandMeta;
use crate::notices::NoticeStatusChoice;
use crate::notices::handlers;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::model::notices::{NoticeKind, NoticeStatus};

const KIND: NoticeKind = NoticeKind::Ra;

pub const REQUEST_META: CommandMeta = CommandMeta {
    name: "ra request",
    desc: "Request a reduced activity notice.",
    category: "notices",
    usage: "/ra request <duration> <reason> [start_in] [quota]",
    guards: CommandGuards::staff().cooldown_secs(30),
};
pub const STATUS_META: CommandMeta = CommandMeta {
    name: "ra status",
    desc: "Show your current or most recent reduced activity notice.",
    category: "notices",
    usage: "/ra status",
    guards: CommandGuards::staff().cooldown_secs(3),
};
pub const CANCEL_META: CommandMeta = CommandMeta {
    name: "ra cancel",
    desc: "Withdraw your pending reduced activity notice request.",
    category: "notices",
    usage: "/ra cancel",
    guards: CommandGuards::staff().cooldown_secs(5),
};
pub const END_META: CommandMeta = CommandMeta {
    name: "ra end",
    desc: "End your reduced activity notice early.",
    category: "notices",
    usage: "/ra end",
    guards: CommandGuards::staff().cooldown_secs(5),
};
pub const APPROVE_META: CommandMeta = CommandMeta {
    name: "ra admin approve",
    desc: "Approve a pending reduced activity notice.",
    category: "notices",
    usage: "/ra admin approve <id> [note]",
    guards: CommandGuards::management(),
};
pub const DENY_META: CommandMeta = CommandMeta {
    name: "ra admin deny",
    desc: "Deny a pending reduced activity notice.",
    category: "notices",
    usage: "/ra admin deny <id> [note]",
    guards: CommandGuards::management(),
};
pub const EXTEND_META: CommandMeta = CommandMeta {
    name: "ra admin extend",
    desc: "Push back the end of an approved reduced activity notice.",
    category: "notices",
    usage: "/ra admin extend <id> <duration>",
    guards: CommandGuards::management(),
};
pub const LIST_META: CommandMeta = CommandMeta {
    name: "ra admin list",
    desc: "List reduced activity notices.",
    category: "notices",
    usage: "/ra admin list [status]",
    guards: CommandGuards::management().cooldown_secs(5),
};

/// Reduced activity notices.
#[poise::command(
    slash_command,
    category = "Notices",
    subcommands("request", "status", "cancel", "end", "admin"),
    subcommand_required
)]
pub async fn ra(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(slash_command)]
pub async fn request(
    ctx: Context<'_>,
    #[description = "How long, e.g. 5d or 2w (1 to 90 days)"] duration: String,
    #[description = "Why your activity will be reduced"] reason: String,
    #[description = "Delay before it starts, e.g. 2d (up to 14 days)"] start_in: Option<String>,
    #[description = "Quota reduction in percent"]
    #[min = 1]
    #[max = 99]
    quota: Option<u8>,
) -> Result<(), Error> {
    handlers::request(ctx, KIND, &duration, &reason, start_in.as_deref(), quota).await
}

#[poise::command(slash_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    handlers::status(ctx, KIND).await
}

#[poise::command(slash_command)]
pub async fn cancel(ctx: Context<'_>) -> Result<(), Error> {
    handlers::cancel(ctx, KIND).await
}

#[poise::command(slash_command)]
pub async fn end(ctx: Context<'_>) -> Result<(), Error> {
    handlers::end(ctx, KIND).await
}

#[poise::command(
    slash_command,
    subcommands("approve", "deny", "extend", "list"),
    subcommand_required
)]
pub async fn admin(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(slash_command)]
pub async fn approve(
    ctx: Context<'_>,
    #[description = "Notice id"] id: u64,
    #[description = "Note for the member"] note: Option<String>,
) -> Result<(), Error> {
    handlers::review(ctx, KIND, id, true, note.as_deref()).await
}

#[poise::command(slash_command)]
pub async fn deny(
    ctx: Context<'_>,
    #[description = "Notice id"] id: u64,
    #[description = "Reason for the denial"] note: Option<String>,
) -> Result<(), Error> {
    handlers::review(ctx, KIND, id, false, note.as_deref()).await
}

#[poise::command(slash_command)]
pub async fn extend(
    ctx: Context<'_>,
    #[description = "Notice id"] id: u64,
    #[description = "Extra time, e.g. 3d"] duration: String,
) -> Result<(), Error> {
    handlers::extend(ctx, KIND, id, &duration).await
}

#[poise::command(slash_command)]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Only notices with this status"] status: Option<NoticeStatusChoice>,
) -> Result<(), Error> {
    handlers::list(ctx, KIND, status.map(NoticeStatus::from)).await
}
