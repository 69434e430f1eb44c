use crate::utility::embeds::{
    grouped_help_description, page_out_of_range_message, unknown_category_message,
};
use crate::{COMMANDS, CommandMeta};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_utils::pagination::paginate_embed_pages;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "/help [page|category]",
    guards: CommandGuards::everyone().anywhere(),
};

const HELP_COMMANDS_PER_PAGE: usize = 15;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Page number or category"] query: Option<String>,
) -> Result<(), Error> {
    let query = query.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));
    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.to_ascii_lowercase()),
        _ => None,
    };

    let show_dev = ctx.data().is_developer(ctx.author().id.get());
    let visible: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|command| show_dev || !command.guards.dev_only)
        .collect();

    let mut categories: Vec<&str> = visible.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    if let Some(wanted_category) = category.as_deref()
        && !categories.contains(&wanted_category)
    {
        return Err(
            AppError::not_found(unknown_category_message(wanted_category, &categories)).into(),
        );
    }

    let commands = sorted_commands(&visible, category.as_deref());
    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        return Err(AppError::not_found(page_out_of_range_message(requested_page, total)).into());
    }

    let pages = (1..=total)
        .map(|page| {
            let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, page);
            grouped_help_description(&commands[start..end])
        })
        .collect::<Vec<_>>();
    paginate_embed_pages(ctx, "LAPD Central Commands", &pages, requested_page).await?;
    Ok(())
}

fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    let pages = total_items.div_ceil(per_page);
    pages.max(1)
}

fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

fn sorted_commands(
    commands: &[&'static CommandMeta],
    category: Option<&str>,
) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = commands
        .iter()
        .copied()
        .filter(|cmd| category.is_none_or(|wanted| cmd.category == wanted))
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::{page_window, total_pages};

    #[test]
    fn paging_math() {
        assert_eq!(total_pages(0, 15), 1);
        assert_eq!(total_pages(31, 15), 3);
        assert_eq!(page_window(31, 15, 3), (30, 31));
        assert_eq!(page_window(31, 15, 9), (31, 31));
    }
}
