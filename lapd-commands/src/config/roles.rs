use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::config::choices::{RoleAction, RoleListChoice};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::guild_settings::{
    add_settings_role, clear_settings_roles, remove_settings_role,
};
use lapd_database::model::guild_settings::RoleList;
use lapd_utils::embed::{reply_ephemeral, success_embed};

pub const META: CommandMeta = CommandMeta {
    name: "config roles",
    desc: "Add, remove or clear the roles of a role list.",
    category: "config",
    usage: "/config roles <list> <add|remove|clear> [role]",
    guards: CommandGuards::management().cooldown_secs(3),
};

#[poise::command(slash_command)]
pub async fn roles(
    ctx: Context<'_>,
    #[description = "Role list to edit"] list: RoleListChoice,
    #[description = "What to do"] action: RoleAction,
    #[description = "Role to add or remove"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let list = RoleList::from(list);
    let db = &ctx.data().db;

    let message = match (action, role) {
        (RoleAction::Clear, _) => {
            clear_settings_roles(db, guild_id, list).await?;
            format!("Cleared **{}**.", list.label())
        }
        (_, None) => {
            return Err(AppError::validation("Pick the role to add or remove.").into());
        }
        (RoleAction::Add, Some(role)) => {
            if role.id.get() == guild_id {
                return Err(
                    AppError::validation("@everyone cannot be added to a role list.").into(),
                );
            }
            if !add_settings_role(db, guild_id, list, role.id.get()).await? {
                return Err(AppError::conflict(format!(
                    "<@&{}> is already in **{}**.",
                    role.id.get(),
                    list.label()
                ))
                .into());
            }
            format!("Added <@&{}> to **{}**.", role.id.get(), list.label())
        }
        (RoleAction::Remove, Some(role)) => {
            if !remove_settings_role(db, guild_id, list, role.id.get()).await? {
                return Err(AppError::not_found(format!(
                    "<@&{}> is not in **{}**.",
                    role.id.get(),
                    list.label()
                ))
                .into());
            }
            format!("Removed <@&{}> from **{}**.", role.id.get(), list.label())
        }
    };
    info!(
        guild_id,
        list = list.label(),
        ?action,
        changed_by = ctx.author().id.get(),
        "role list updated"
    );

    reply_ephemeral(ctx, success_embed("Configuration Updated", message)).await?;
    Ok(())
}
