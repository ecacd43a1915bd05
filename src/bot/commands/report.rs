use crate::bot::commands::pets::autocomplete_pet_name;
use crate::bot::reply::{send_embed, send_error, themed_embed};
use crate::bot::{Context, Error};
use poise::serenity_prelude::{self as serenity, Mentionable};

/// Report incorrect data
#[poise::command(slash_command)]
pub async fn report(
    ctx: Context<'_>,
    #[description = "Name of the pet with incorrect data"]
    #[autocomplete = "autocomplete_pet_name"]
    pet_name: String,
    #[description = "Description of the issue"] issue: String,
) -> Result<(), Error> {
    let Some(channel_id) = ctx.data().settings.snapshot().report_channel else {
        send_error(ctx, "Report channel not set up. Ask an admin to run /setup.").await?;
        return Ok(());
    };

    let channel = serenity::ChannelId::new(channel_id);
    if let Err(e) = channel.to_channel(ctx.http()).await {
        log::warn!("Report channel {} is unavailable: {}", channel_id, e);
        send_error(ctx, "Report channel not found. Ask an admin to reconfigure.").await?;
        return Ok(());
    }

    let embed = themed_embed(
        ctx,
        "Data Issue Report",
        format!(
            "**Pet:** {}\n**Reported by:** {}\n**Issue:** {}\n\nPlease provide a screenshot of the correct data.",
            pet_name,
            ctx.author().mention(),
            issue
        ),
    )
    .timestamp(serenity::Timestamp::now());
    channel
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await?;

    log::info!("{} reported an issue with '{}'", ctx.author().name, pet_name);
    send_embed(
        ctx,
        "Report Submitted",
        "Your report has been sent to the moderators.",
        true,
    )
    .await
}
