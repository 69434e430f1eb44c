use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::profiles::upsert_profile;
use lapd_database::model::profiles::{MAX_BADGE_LEN, MAX_BIO_LEN};
use lapd_utils::embed::{reply_ephemeral, success_embed};
use lapd_utils::parse::parse_badge_number;

pub const META: CommandMeta = CommandMeta {
    name: "profile edit",
    desc: "Edit your bio or badge number. Use `clear` to remove a field.",
    category: "profile",
    usage: "/profile edit [bio] [badge]",
    guards: CommandGuards::everyone().cooldown_secs(10),
};

const CLEAR_KEYWORD: &str = "clear";

/// Normalize an edit value: `clear` becomes an empty string, which removes the field.
fn edit_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).map(|value| {
        if value.eq_ignore_ascii_case(CLEAR_KEYWORD) {
            ""
        } else {
            value
        }
    })
}

fn check_bio(bio: Option<&str>) -> Result<Option<&str>, String> {
    match bio {
        Some(bio) if bio.chars().count() > MAX_BIO_LEN => {
            Err(format!("Bios are limited to {} characters.", MAX_BIO_LEN))
        }
        other => Ok(other),
    }
}

fn check_badge(badge: Option<&str>) -> Result<Option<String>, String> {
    match badge {
        None => Ok(None),
        Some("") => Ok(Some(String::new())),
        Some(raw) => parse_badge_number(raw)
            .map(Some)
            .ok_or_else(|| format!("Badge numbers are 1 to {} digits.", MAX_BADGE_LEN)),
    }
}

#[poise::command(slash_command)]
pub async fn edit(
    ctx: Context<'_>,
    #[description = "Short bio, or `clear`"] bio: Option<String>,
    #[description = "Badge number, or `clear`"] badge: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    if bio.is_none() && badge.is_none() {
        return Err(AppError::validation("Provide a bio, a badge number, or both.").into());
    }

    let bio = check_bio(edit_value(bio.as_deref())).map_err(AppError::validation)?;
    let badge = check_badge(edit_value(badge.as_deref())).map_err(AppError::validation)?;

    let user_id = ctx.author().id.get();
    upsert_profile(&ctx.data().db, guild_id.get(), user_id, bio, badge.as_deref()).await?;
    info!(guild_id = guild_id.get(), user_id, "profile updated");

    reply_ephemeral(
        ctx,
        success_embed("Profile Updated", "Your profile was saved. View it with `/profile view`."),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_badge, check_bio, edit_value};

    #[test]
    fn clear_keyword_empties_the_field() {
        assert_eq!(edit_value(Some(" CLEAR ")), Some(""));
        assert_eq!(edit_value(Some(" hello ")), Some("hello"));
        assert_eq!(edit_value(None), None);
    }

    #[test]
    fn badge_and_bio_validation() {
        assert_eq!(check_badge(Some("0451")), Ok(Some("0451".to_owned())));
        assert_eq!(check_badge(Some("")), Ok(Some(String::new())));
        assert!(check_badge(Some("12ab")).is_err());
        assert!(check_bio(Some(&"x".repeat(401))).is_err());
        assert_eq!(check_bio(Some("ok")), Ok(Some("ok")));
    }
}
