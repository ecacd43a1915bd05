use crate::bot::reply::{ensure_admin, send_embed, send_error};
use crate::bot::{Context, Error};
use crate::utils::config::{SettingsChange, format_embed_color};
use crate::utils::source::load_catalogue;
use poise::serenity_prelude::{self as serenity, Mentionable};

const CATEGORY_NAME: &str = "Pet Stats Bot";
const REPORT_CHANNEL_NAME: &str = "bot-reports";
const REPORT_CHANNEL_TOPIC: &str = "Channel for reporting incorrect pet data";

/// Set up the server (Admin only)
#[poise::command(slash_command, guild_only)]
pub async fn setup(ctx: Context<'_>) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }
    let Some(guild_id) = ctx.guild_id() else {
        send_error(ctx, "This command can only be used in a server.").await?;
        return Ok(());
    };

    let category = guild_id
        .create_channel(
            ctx.http(),
            serenity::CreateChannel::new(CATEGORY_NAME).kind(serenity::ChannelType::Category),
        )
        .await?;
    let report_channel = guild_id
        .create_channel(
            ctx.http(),
            serenity::CreateChannel::new(REPORT_CHANNEL_NAME)
                .kind(serenity::ChannelType::Text)
                .category(category.id)
                .topic(REPORT_CHANNEL_TOPIC),
        )
        .await?;

    let channel_id = report_channel.id.get();
    ctx.data()
        .settings
        .update(|settings| settings.report_channel = Some(channel_id))
        .await?;
    log::info!("Report channel for guild {} set to {}", guild_id, channel_id);

    send_embed(
        ctx,
        "Setup Complete",
        format!(
            "Bot channels created. Reports will be sent to {}.",
            report_channel.mention()
        ),
        false,
    )
    .await
}

/// Reload pet data (Admin only)
#[poise::command(slash_command)]
pub async fn refresh(ctx: Context<'_>) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }
    ctx.defer().await?;

    let catalogue = load_catalogue(&ctx.data().pet_source).await;
    let count = catalogue.len();
    log::info!(
        "{} reloaded pet data: {} pets at {}",
        ctx.author().name,
        count,
        catalogue.loaded_at.to_rfc3339()
    );
    ctx.data().catalogue.replace(catalogue);

    send_embed(
        ctx,
        "Data Refreshed",
        format!("Reloaded data for {} pets.", count),
        false,
    )
    .await
}

/// Customize bot settings (Admin only)
#[poise::command(slash_command)]
pub async fn customize(
    ctx: Context<'_>,
    #[description = "Hex color for embeds (e.g., #3498db)"] embed_color: Option<String>,
    #[description = "Role to give bot admin permissions"] admin_role: Option<serenity::Role>,
) -> Result<(), Error> {
    if !ensure_admin(ctx).await? {
        return Ok(());
    }

    let change = match SettingsChange::parse(
        embed_color.as_deref(),
        admin_role.as_ref().map(|role| role.id.get()),
    ) {
        Ok(change) => change,
        Err(e) => {
            log::info!("/customize rejected: {}", e);
            send_error(ctx, "Invalid color format. Use hex like #3498db.").await?;
            return Ok(());
        }
    };

    if change.is_empty() {
        send_embed(ctx, "No Changes", "No settings were updated.", true).await?;
        return Ok(());
    }

    let updated = ctx
        .data()
        .settings
        .update(|settings| change.apply(settings))
        .await?;

    let mut changes = Vec::new();
    if change.embed_color.is_some() {
        changes.push(format!(
            "Embed color set to {}",
            format_embed_color(updated.embed_color)
        ));
    }
    if let Some(role) = &admin_role {
        changes.push(format!("Added {} as admin role", role.mention()));
    }
    log::info!("{} updated settings: {:?}", ctx.author().name, change);

    send_embed(ctx, "Settings Updated", changes.join("\n"), false).await
}
