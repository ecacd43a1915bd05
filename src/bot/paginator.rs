use crate::bot::data::{BotData, PageSessions};
use crate::bot::reply::embed;
use crate::bot::{Context, Error};
use crate::models::types::RenderedPage;
use crate::utils::pagination::{PageAction, PageView, custom_id, parse_custom_id};
use poise::{
    CreateReply,
    serenity_prelude::{
        self as serenity, ButtonStyle, CreateActionRow, CreateButton, CreateInteractionResponse,
        CreateInteractionResponseMessage,
    },
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

fn page_embed(colour: u32, view: &PageView<RenderedPage>) -> serenity::CreateEmbed {
    embed(colour, &view.page.title, &view.page.description)
}

/// `<< < [Page X/N] > >>`, with the buttons that would not move disabled.
pub fn nav_components(session: u64, view: &PageView<RenderedPage>) -> Vec<CreateActionRow> {
    let button = |action: PageAction, label: &str, disabled: bool| {
        CreateButton::new(custom_id(session, action.as_str()))
            .label(label)
            .style(ButtonStyle::Secondary)
            .disabled(disabled)
    };

    vec![CreateActionRow::Buttons(vec![
        button(PageAction::First, "<<", view.at_start),
        button(PageAction::Prev, "<", view.at_start),
        CreateButton::new(custom_id(session, "indicator"))
            .label(&view.indicator)
            .style(ButtonStyle::Secondary)
            .disabled(true),
        button(PageAction::Next, ">", view.at_end),
        button(PageAction::Last, ">>", view.at_end),
    ])]
}

/// Send the first page and register a navigation session for the rest.
pub async fn send_paginated(ctx: Context<'_>, pages: Vec<RenderedPage>) -> Result<(), Error> {
    let sessions = &ctx.data().sessions;
    let Some((session, view)) = sessions.open(pages, Instant::now()) else {
        log::warn!("/{} produced no pages", ctx.command().name);
        return Ok(());
    };

    let colour = ctx.data().settings.snapshot().embed_color;
    let reply = CreateReply::default()
        .embed(page_embed(colour, &view))
        .components(nav_components(session, &view));
    let handle = ctx.send(reply).await?;
    let message = handle.message().await?;
    sessions.attach_message(session, (message.channel_id.get(), message.id.get()));
    Ok(())
}

/// Page button presses. Ids that are not ours are ignored.
pub async fn handle_page_button(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<(), Error> {
    let Some((session, action)) = parse_custom_id(&component.data.custom_id) else {
        return Ok(());
    };

    let colour = data.settings.snapshot().embed_color;
    let response = match data.sessions.navigate(session, action, Instant::now()) {
        Ok(view) => CreateInteractionResponse::UpdateMessage(
            CreateInteractionResponseMessage::new()
                .embed(page_embed(colour, &view))
                .components(nav_components(session, &view)),
        ),
        Err(e) => {
            log::debug!("Rejected page button from {}: {}", component.user.name, e);
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed(
                        colour,
                        "Expired",
                        "These results have expired. Run the command again.",
                    ))
                    .ephemeral(true),
            )
        }
    };

    component.create_response(ctx, response).await?;
    Ok(())
}

/// Periodically drop expired sessions and strip their buttons.
pub fn spawn_session_sweeper(http: Arc<serenity::Http>, sessions: Arc<PageSessions>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            for (channel_id, message_id) in sessions.evict_expired(Instant::now()) {
                let edit = serenity::EditMessage::new().components(Vec::new());
                if let Err(e) = serenity::ChannelId::new(channel_id)
                    .edit_message(&http, serenity::MessageId::new(message_id), edit)
                    .await
                {
                    log::warn!(
                        "Could not clear buttons on expired message {}: {}",
                        message_id,
                        e
                    );
                }
            }
        }
    });
}
