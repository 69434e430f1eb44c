use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::common::{display_name, require_guild};
use crate::profile::embeds::{ProfileView, profile_embed};
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::notices::active_member_notices;
use lapd_database::impls::profiles::get_profile;
use lapd_database::impls::records::record_counts_for_officer;
use lapd_database::impls::shifts::list_member_shifts;
use lapd_database::impls::{now_unix_millis, now_unix_secs};
use lapd_database::model::shifts::ShiftTotals;
use lapd_utils::embed::reply_embed;

pub const META: CommandMeta = CommandMeta {
    name: "profile view",
    desc: "Show a member's bio, badge, shift totals and filed records.",
    category: "profile",
    usage: "/profile view [member]",
    guards: CommandGuards::everyone().cooldown_secs(3),
};

pub const CONTEXT_META: CommandMeta = CommandMeta {
    name: "View Profile",
    desc: "Show a member's guild profile.",
    category: "profile",
    usage: "Apps > View Profile",
    guards: CommandGuards::everyone().cooldown_secs(3),
};

#[poise::command(slash_command)]
pub async fn view(
    ctx: Context<'_>,
    #[description = "Member to show (defaults to you)"] member: Option<serenity::User>,
) -> Result<(), Error> {
    let user = member.as_ref().unwrap_or_else(|| ctx.author());
    show_profile(ctx, user).await
}

#[poise::command(context_menu_command = "View Profile", category = "Profile")]
pub async fn view_context(ctx: Context<'_>, member: serenity::User) -> Result<(), Error> {
    show_profile(ctx, &member).await
}

async fn show_profile(ctx: Context<'_>, user: &serenity::User) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let user_id = user.id.get();
    let db = &ctx.data().db;

    let profile = get_profile(db, guild_id, user_id).await?;
    let shifts = list_member_shifts(db, guild_id, user_id, None).await?;
    let totals = ShiftTotals::from_shifts(&shifts, now_unix_millis());
    let records = record_counts_for_officer(db, guild_id, user_id).await?;
    let notices = active_member_notices(db, guild_id, user_id, now_unix_secs()).await?;

    let name = display_name(user);
    let embed = profile_embed(&ProfileView {
        display_name: &name,
        avatar_url: user.face(),
        profile: profile.as_ref(),
        totals: &totals,
        records: &records,
        notices: &notices,
    });
    reply_embed(ctx, embed).await?;
    Ok(())
}
