use crate::bot::reply::send_embed;
use crate::bot::{Context, Error};
use poise::ChoiceParameter;

#[derive(Clone, Copy, Debug, ChoiceParameter)]
pub enum HelpMode {
    #[name = "summary"]
    Summary,
    #[name = "admin"]
    Admin,
}

const SUMMARY: &str = "\
/top <stat> - Top pets by Bubbles, Coins, Gems or Tickets.
/fuzzy <query> - Pets whose names look like the query.
/search <attribute> <value> - Filter by rarity, stat name, tag, or limited.
/view <pet> - Stats and variant images for one pet.
/report <pet> <issue> - Send a data correction to the moderators.
/help [summary|admin] - This overview or the admin commands.";

const ADMIN: &str = "\
Available to server administrators and configured admin roles.

/setup - Create the bot category and the report channel.
/refresh - Reload pet data from its source.
/customize [embed_color] [admin_role] - Change the embed color (hex, e.g. #3498db) or add an admin role. An invalid color rejects the whole request.";

/// Show a quick overview of the commands
#[poise::command(slash_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Which commands to show"] mode: Option<HelpMode>,
) -> Result<(), Error> {
    match mode.unwrap_or(HelpMode::Summary) {
        HelpMode::Summary => send_embed(ctx, "Pet Stats Bot", SUMMARY, true).await,
        HelpMode::Admin => send_embed(ctx, "Pet Stats Bot: Admin", ADMIN, true).await,
    }
}
