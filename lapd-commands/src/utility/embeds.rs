use crate::CommandMeta;

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!(
        "Page {} does not exist. Available pages: 1-{}.",
        requested_page, total_pages
    )
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        if command.usage.starts_with('/') {
            out.push_str(&format!("`/{}`: {}\n", command.name, command.desc));
        } else {
            out.push_str(&format!("`{}` (app): {}\n", command.name, command.desc));
        }
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

pub fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use lapd_core::guard::CommandGuards;

    use super::{display_category, grouped_help_description, unknown_category_message};
    use crate::CommandMeta;

    const A: CommandMeta = CommandMeta {
        name: "duty manage",
        desc: "Manage your shift.",
        category: "duty",
        usage: "/duty manage [type]",
        guards: CommandGuards::everyone(),
    };
    const B: CommandMeta = CommandMeta {
        name: "ping",
        desc: "Pong.",
        category: "utility",
        usage: "/ping",
        guards: CommandGuards::everyone(),
    };

    #[test]
    fn groups_by_category() {
        assert_eq!(
            grouped_help_description(&[&A, &B]),
            "**Duty**\n`/duty manage`: Manage your shift.\n\n**Utility**\n`/ping`: Pong."
        );
        assert_eq!(grouped_help_description(&[]), "No commands available.");
    }

    #[test]
    fn context_menus_render_without_slash() {
        const MENU: CommandMeta = CommandMeta {
            name: "View Profile",
            desc: "Open a member's profile.",
            category: "profile",
            usage: "Apps > View Profile",
            guards: CommandGuards::everyone(),
        };
        assert_eq!(
            grouped_help_description(&[&MENU]),
            "**Profile**\n`View Profile` (app): Open a member's profile."
        );
    }

    #[test]
    fn category_messages() {
        assert_eq!(display_category("records"), "Records");
        assert_eq!(
            unknown_category_message("nope", &["duty", "utility"]),
            "Unknown category: Nope\nValid categories: Duty, Utility"
        );
    }
}
