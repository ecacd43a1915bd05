mod bot;
mod models;
mod utils;

use std::sync::Arc;

use anyhow::anyhow;
use poise::CreateReply;
use poise::serenity_prelude as serenity;

use crate::bot::data::BotData;
use crate::bot::reply::embed;
use crate::utils::app_config::AppConfig;
use crate::utils::catalogue::CatalogueHandle;
use crate::utils::config::SettingsStore;
use crate::utils::pagination::SessionRegistry;
use crate::utils::source::{PetSource, load_catalogue};
use crate::utils::source_watcher::SourceWatcher;

#[tokio::main]
async fn main() -> Result<(), bot::Error> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow!("Configuration error: {}", e))?;

    if let Err(e) = utils::logger::BotLogger::init(config.log_file.as_deref(), config.log_level) {
        eprintln!("Logger initialisation failed: {}", e);
    }

    let settings = Arc::new(SettingsStore::open(&config.settings_path));
    log::info!("Settings loaded from {}", settings.path().display());

    let catalogue = Arc::new(CatalogueHandle::new(
        load_catalogue(&config.pet_source).await,
    ));
    let sessions = Arc::new(SessionRegistry::new(config.page_timeout));

    let _watcher = match (&config.pet_source, config.watch_source) {
        (PetSource::File(path), true) => match SourceWatcher::new(path, Arc::clone(&catalogue)) {
            Ok(watcher) => {
                log::info!("Watching {} for changes", path.display());
                Some(watcher)
            }
            Err(e) => {
                log::error!("Could not watch {}: {}", path.display(), e);
                None
            }
        },
        (PetSource::Url(_), true) => {
            log::warn!("PET_DATA_WATCH is ignored for URL sources; use /refresh");
            None
        }
        _ => None,
    };

    let intents = serenity::GatewayIntents::GUILDS;

    let data = BotData {
        catalogue,
        settings,
        sessions,
        pet_source: config.pet_source.clone(),
    };
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: crate::bot::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(crate::bot::handler::event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            log::error!("/{} failed: {:#}", ctx.command().name, error);
                            let colour = ctx.data().settings.snapshot().embed_color;
                            let reply = CreateReply::default()
                                .embed(embed(
                                    colour,
                                    "Error",
                                    "Something went wrong while running this command.",
                                ))
                                .ephemeral(true);
                            if let Err(why) = ctx.send(reply).await {
                                log::error!("Failed to send error message: {}", why);
                            }
                        }
                        other => {
                            if let Err(e) = poise::builtins::on_error(other).await {
                                log::error!("Error while handling error: {}", e);
                            }
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                log::info!(
                    "{} is online with {} pets loaded",
                    ready.user.name,
                    data.catalogue.snapshot().len()
                );
                crate::bot::paginator::spawn_session_sweeper(
                    Arc::clone(&ctx.http),
                    Arc::clone(&data.sessions),
                );
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::Client::builder(&config.token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow!("Failed to create Discord client: {}", e))?;

    client
        .start()
        .await
        .map_err(|e| anyhow!("Bot failed to start: {}", e))?;

    Ok(())
}
