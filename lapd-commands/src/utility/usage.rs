use crate::{COMMANDS, CommandMeta};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_utils::embed::{info_embed, reply_ephemeral};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax and permission level for a command.",
    category: "utility",
    usage: "/usage <command>",
    guards: CommandGuards::everyone().anywhere(),
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name, e.g. `duty manage`"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let Some(command) = find_command(raw_name) else {
        return Err(AppError::not_found(format!("Unknown command: `{}`", raw_name.trim())).into());
    };

    let mut details = format!(
        "**Usage :** `{}`\n**Access :** {}",
        command.usage,
        command.guards.access.label()
    );
    if let Some(cooldown) = command.guards.cooldown {
        details.push_str(&format!("\n**Cooldown :** {}s", cooldown.as_secs()));
    }

    let title = if command.usage.starts_with('/') {
        format!("/{}", command.name)
    } else {
        command.name.to_owned()
    };
    reply_ephemeral(ctx, info_embed(&title, details)).await?;
    Ok(())
}

fn find_command(raw_name: &str) -> Option<&'static CommandMeta> {
    let lookup = raw_name
        .trim()
        .trim_start_matches(['!', '/'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    COMMANDS
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(&lookup))
}

#[cfg(test)]
mod tests {
    use super::find_command;

    #[test]
    fn lookup_normalizes_input() {
        assert_eq!(find_command("/duty   manage").map(|c| c.name), Some("duty manage"));
        assert_eq!(find_command("!PING").map(|c| c.name), Some("ping"));
        assert_eq!(
            find_command("backup member roles").map(|c| c.name),
            Some("Backup Member Roles")
        );
        assert!(find_command("nope").is_none());
    }
}
