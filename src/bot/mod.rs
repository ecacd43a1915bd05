pub mod commands;
pub mod data;
pub mod handler;
pub mod paginator;
pub mod render;
pub mod reply;

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, data::BotData, Error>;

pub fn commands() -> Vec<poise::Command<data::BotData, Error>> {
    vec![
        commands::pets::top(),
        commands::pets::fuzzy(),
        commands::pets::search(),
        commands::pets::view(),
        commands::report::report(),
        commands::admin::setup(),
        commands::admin::refresh(),
        commands::admin::customize(),
        commands::help::help(),
    ]
}
