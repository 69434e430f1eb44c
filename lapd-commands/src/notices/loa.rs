use crate::CommandMeta;
use crate::notices::NoticeStatusChoice;
use crate::notices::handlers;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::model::notices::{NoticeKind, NoticeStatus};

const KIND: NoticeKind = NoticeKind::Loa;

pub const REQUEST_META: CommandMeta = CommandMeta {
    name: "loa request",
    desc: "Request a leave of absence.",
    category: "notices",
    usage: "/loa request <duration> <reason> [start_in]",
    guards: CommandGuards::staff().cooldown_secs(30),
};
pub const STATUS_META: CommandMeta = CommandMeta {
    name: "loa status",
    desc: "Show your current or most recent leave of absence.",
    category: "notices",
    usage: "/loa status",
    guards: CommandGuards::staff().cooldown_secs(3),
};
pub const CANCEL_META: CommandMeta = CommandMeta {
    name: "loa cancel",
    desc: "Withdraw your pending leave of absence request.",
    category: "notices",
    usage: "/loa cancel",
    guards: CommandGuards::staff().cooldown_secs(5),
};
pub const END_META: CommandMeta = CommandMeta {
    name: "loa end",
    desc: "End your leave of absence early.",
    category: "notices",
    usage: "/loa end",
    guards: CommandGuards::staff().cooldown_secs(5),
};
pub const APPROVE_META: CommandMeta = CommandMeta {
    name: "loa admin approve",
    desc: "Approve a pending leave of absence.",
    category: "notices",
    usage: "/loa admin approve <id> [note]",
    guards: CommandGuards::management(),
};
pub const DENY_META: CommandMeta = CommandMeta {
    name: "loa admin deny",
    desc: "Deny a pending leave of absence.",
    category: "notices",
    usage: "/loa admin deny <id> [note]",
    guards: CommandGuards::management(),
};
pub const EXTEND_META: CommandMeta = CommandMeta {
    name: "loa admin extend",
    desc: "Push back the end of an approved leave of absence.",
    category: "notices",
    usage: "/loa admin extend <id> <duration>",
    guards: CommandGuards::management(),
};
pub const LIST_META: CommandMeta = CommandMeta {
    name: "loa admin list",
    desc: "List leave of absence notices.",
    category: "notices",
    usage: "/loa admin list [status]",
    guards: CommandGuards::management().cooldown_secs(5),
};

/// Leave of absence notices.
#[poise::command(
    slash_command,
    category = "Notices",
    subcommands("request", "status", "cancel", "end", "admin"),
    subcommand_required
)]
pub async fn loa(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(slash_command)]
pub async fn request(
    ctx: Context<'_>,
    #[description = "How long, e.g. 5d or 2w (1 to 90 days)"] duration: String,
    #[description = "Why you will be away"] reason: String,
    #[description = "Delay before it starts, e.g. 2d (up to 14 days)"] start_in: Option<String>,
) -> Result<(), Error> {
    handlers::request(ctx, KIND, &duration, &reason, start_in.as_deref(), None).await
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
