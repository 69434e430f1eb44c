use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::embed::DEFAULT_EMBED_COLOR;

pub const PAGINATION_TIMEOUT_SECS: u64 = 60 * 3;

/// Lines shown per page in listings.
pub const LINES_PER_PAGE: usize = 10;

struct PageView<'a> {
    title: &'a str,
    pages: &'a [String],
    thumbnail_url: Option<&'a str>,
    prev_id: String,
    jump_id: String,
    next_id: String,
}

impl PageView<'_> {
    fn embed(&self, current_page: usize) -> serenity::CreateEmbed {
        let total_pages = self.pages.len().max(1);
        let mut embed = serenity::CreateEmbed::new()
            .title(self.title.to_owned())
            .color(DEFAULT_EMBED_COLOR)
            .description(self.pages[current_page].clone());

        if total_pages > 1 {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Page {}/{}",
                current_page + 1,
                total_pages
            )));
        }

        if let Some(url) = self.thumbnail_url {
            embed = embed.thumbnail(url);
        }

        embed
    }

    fn components(&self, current_page: usize) -> Vec<serenity::CreateActionRow> {
        let is_first_page = current_page == 0;
        let is_last_page = current_page + 1 >= self.pages.len();

        vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&self.prev_id)
                .label("Prev")
                .disabled(is_first_page)
                .style(serenity::ButtonStyle::Secondary),
            serenity::CreateButton::new(&self.jump_id)
                .label("Jump")
                .style(serenity::ButtonStyle::Secondary),
            serenity::CreateButton::new(&self.next_id)
                .label("Next")
                .disabled(is_last_page)
                .style(serenity::ButtonStyle::Secondary),
        ])]
    }

    fn update(&self, current_page: usize) -> serenity::CreateInteractionResponse {
        serenity::CreateInteractionResponse::UpdateMessage(
            serenity::CreateInteractionResponseMessage::new()
                .embed(self.embed(current_page))
                .components(self.components(current_page)),
        )
    }
}

pub async fn paginate_embed_pages<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    paginate_embed_pages_with_thumbnail(ctx, title, pages, start_page, None).await
}

/// Show `pages` one at a time with Prev / Jump / Next buttons for the invoker.
///
/// An empty `pages` sends nothing; a single page is sent without buttons.
pub async fn paginate_embed_pages_with_thumbnail<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
    thumbnail_url: Option<&str>,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if pages.is_empty() {
        return Ok(());
    }

    let total_pages = pages.len();
    let mut current_page = start_page.clamp(1, total_pages) - 1;
    let ctx_id = ctx.id();
    let view = PageView {
        title,
        pages,
        thumbnail_url,
        prev_id: format!("{}_prev", ctx_id),
        jump_id: format!("{}_jump", ctx_id),
        next_id: format!("{}_next", ctx_id),
    };

    if total_pages <= 1 {
        ctx.send(poise::CreateReply::default().embed(view.embed(current_page)))
            .await?;
        return Ok(());
    }

    let jump_modal_id = format!("{}_jump_modal", ctx_id);
    let jump_input_id = format!("{}_jump_input", ctx_id);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(view.embed(current_page))
                .components(view.components(current_page)),
        )
        .await?;

    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;

    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .filter({
            let prefix = ctx_id.to_string();
            let author_id = ctx.author().id;
            move |interaction| {
                interaction.data.custom_id.starts_with(&prefix)
                    && interaction.user.id == author_id
                    && interaction.message.id == message_id
            }
        })
        .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
        .await
    {
        if press.data.custom_id == view.next_id || press.data.custom_id == view.prev_id {
            current_page = if press.data.custom_id == view.next_id {
                (current_page + 1).min(total_pages - 1)
            } else {
                current_page.saturating_sub(1)
            };

            press
                .create_response(ctx.http(), view.update(current_page))
                .await?;
            continue;
        }

        if press.data.custom_id != view.jump_id {
            continue;
        }

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::Modal(
                    serenity::CreateModal::new(&jump_modal_id, "Jump to Page").components(vec![
                        serenity::CreateActionRow::InputText(
                            serenity::CreateInputText::new(
                                serenity::InputTextStyle::Short,
                                "Page Number",
                                &jump_input_id,
                            )
                            .placeholder(format!("1-{}", total_pages))
                            .required(true),
                        ),
                    ]),
                ),
            )
            .await?;

        let maybe_modal = serenity::collector::ModalInteractionCollector::new(ctx)
            .author_id(ctx.author().id)
            .channel_id(ctx.channel_id())
            .custom_ids(vec![jump_modal_id.clone()])
            .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
            .await;

        let Some(modal) = maybe_modal else {
            continue;
        };

        modal
            .create_response(ctx.http(), serenity::CreateInteractionResponse::Acknowledge)
            .await?;

        let submitted_page = modal
            .data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find_map(|component| match component {
                serenity::ActionRowComponent::InputText(input)
                    if input.custom_id == jump_input_id =>
                {
                    input.value.clone()
                }
                _ => None,
            });

        if let Some(target_page) = submitted_page.as_deref().and_then(parse_page_number)
            && target_page <= total_pages
        {
            current_page = target_page - 1;

            channel_id
                .edit_message(
                    ctx.http(),
                    message_id,
                    serenity::EditMessage::new()
                        .embed(view.embed(current_page))
                        .components(view.components(current_page)),
                )
                .await?;
        }
    }

    if let Err(e) = channel_id
        .edit_message(
            ctx.http(),
            message_id,
            serenity::EditMessage::new()
                .embed(view.embed(current_page))
                .components(vec![]),
        )
        .await
    {
        tracing::debug!(?e, "failed to strip pagination buttons");
    }

    Ok(())
}

fn parse_page_number(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|page| *page >= 1)
}

#[cfg(test)]
mod tests {
    use super::parse_page_number;

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(parse_page_number(" 3 "), Some(3));
        assert_eq!(parse_page_number("0"), None);
        assert_eq!(parse_page_number("x"), None);
    }
}
