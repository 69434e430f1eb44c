pub mod checks;
pub mod common;
pub mod config;
pub mod duty;
pub mod member_roles;
pub mod notices;
pub mod profile;
pub mod records;
pub mod utility;

use lapd_core::guard::CommandGuards;
use lapd_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
    pub guards: CommandGuards,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    utility::dev::META,
    duty::MANAGE_META,
    duty::ACTIVE_META,
    duty::LEADERBOARD_META,
    duty::STATS_META,
    duty::ADMIN_META,
    duty::VOID_META,
    records::LOG_ARREST_META,
    records::LOG_CITATION_META,
    records::LOG_INCIDENT_META,
    records::SEARCH_META,
    records::VIEW_ARREST_META,
    records::VIEW_CITATION_META,
    records::VIEW_INCIDENT_META,
    records::INCIDENT_STATUS_META,
    records::DELETE_META,
    notices::loa::REQUEST_META,
    notices::loa::STATUS_META,
    notices::loa::CANCEL_META,
    notices::loa::END_META,
    notices::loa::APPROVE_META,
    notices::loa::DENY_META,
    notices::loa::EXTEND_META,
    notices::loa::LIST_META,
    notices::ra::REQUEST_META,
    notices::ra::STATUS_META,
    notices::ra::CANCEL_META,
    notices::ra::END_META,
    notices::ra::APPROVE_META,
    notices::ra::DENY_META,
    notices::ra::EXTEND_META,
    notices::ra::LIST_META,
    member_roles::BACKUP_META,
    member_roles::BACKUP_CONTEXT_META,
    member_roles::LIST_META,
    member_roles::RESTORE_META,
    member_roles::DELETE_META,
    profile::VIEW_META,
    profile::VIEW_CONTEXT_META,
    profile::EDIT_META,
    config::VIEW_META,
    config::ROLES_META,
    config::CHANNEL_META,
    config::NOTICE_ROLE_META,
    config::SHIFT_TYPE_ADD_META,
    config::SHIFT_TYPE_REMOVE_META,
    config::SHIFT_TYPE_DEFAULT_META,
    config::SHIFT_TYPE_LIST_META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        utility::dev::dev(),
        duty::duty(),
        records::log(),
        records::records(),
        notices::loa(),
        notices::ra(),
        member_roles::member_roles(),
        member_roles::backup_context(),
        profile::profile(),
        profile::view_context(),
        config::config(),
    ]
}

/// Guards for a leaf command, looked up by its qualified or context menu name.
///
/// Unlisted names fall back to the everyone-in-a-guild default.
pub fn guards_for(name: &str) -> CommandGuards {
    COMMANDS
        .iter()
        .find(|command| command.name == name)
        .map(|command| command.guards)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use lapd_core::guard::{AccessLevel, CommandGuards};

    use super::{COMMANDS, commands, guards_for};

    fn leaf_names(
        command: &poise::Command<lapd_core::Data, lapd_core::Error>,
        prefix: &str,
        out: &mut Vec<String>,
    ) {
        let name = if prefix.is_empty() {
            command.name.clone()
        } else {
            format!("{} {}", prefix, command.name)
        };
        if command.subcommands.is_empty() {
            out.push(command.context_menu_name.clone().unwrap_or(name));
            return;
        }
        for sub in &command.subcommands {
            leaf_names(sub, &name, out);
        }
    }

    #[test]
    fn every_leaf_has_metadata() {
        let mut leaves = Vec::new();
        for command in commands() {
            leaf_names(&command, "", &mut leaves);
        }

        let documented: HashSet<&str> = COMMANDS.iter().map(|meta| meta.name).collect();
        for leaf in &leaves {
            assert!(documented.contains(leaf.as_str()), "no metadata for `{}`", leaf);
        }
        assert_eq!(leaves.len(), COMMANDS.len());
    }

    #[test]
    fn metadata_names_are_unique() {
        let mut seen = HashSet::new();
        for meta in COMMANDS {
            assert!(seen.insert(meta.name), "duplicate metadata for `{}`", meta.name);
        }
    }

    #[test]
    fn guard_lookup() {
        assert_eq!(guards_for("records delete").access, AccessLevel::Management);
        assert!(guards_for("dev stats").dev_only);
        assert_eq!(guards_for("not a command"), CommandGuards::default());
    }
}
