use crate::bot::{Context, Error};
use crate::utils::permissions::is_authorized;
use poise::{CreateReply, serenity_prelude as serenity};

const CREDIT_FOOTER: &str = "made by jajtxs_";
const CREDIT_CHANCE: f64 = 0.01;

/// Footer text for a roll in `[0, 1)`; shown on roughly one embed in a hundred.
fn credit_footer(roll: f64) -> Option<&'static str> {
    (roll < CREDIT_CHANCE).then_some(CREDIT_FOOTER)
}

pub fn embed(
    colour: u32,
    title: impl Into<String>,
    description: impl Into<String>,
) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::default()
        .title(title)
        .description(description)
        .colour(serenity::Colour::new(colour));
    match credit_footer(rand::random::<f64>()) {
        Some(text) => embed.footer(serenity::CreateEmbedFooter::new(text)),
        None => embed,
    }
}

pub fn themed_embed(
    ctx: Context<'_>,
    title: impl Into<String>,
    description: impl Into<String>,
) -> serenity::CreateEmbed {
    embed(ctx.data().settings.snapshot().embed_color, title, description)
}

pub async fn send_embed(
    ctx: Context<'_>,
    title: impl Into<String>,
    description: impl Into<String>,
    ephemeral: bool,
) -> Result<(), Error> {
    let embed = themed_embed(ctx, title, description);
    ctx.send(CreateReply::default().embed(embed).ephemeral(ephemeral))
        .await?;
    Ok(())
}

/// Private error card, only the caller sees it.
pub async fn send_error(ctx: Context<'_>, description: impl Into<String>) -> Result<(), Error> {
    send_embed(ctx, "Error", description, true).await
}

/// Admin gate; refuses privately and returns `false` when not allowed.
pub async fn ensure_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let authorized = match ctx.author_member().await {
        Some(member) => {
            let has_administrator = member
                .permissions
                .is_some_and(|permissions| permissions.administrator());
            let roles: Vec<u64> = member.roles.iter().map(|role| role.get()).collect();
            let settings = ctx.data().settings.snapshot();
            is_authorized(has_administrator, &roles, &settings.admin_roles)
        }
        None => false,
    };

    if !authorized {
        log::info!(
            "Refused /{} for {} ({})",
            ctx.command().name,
            ctx.author().name,
            ctx.author().id
        );
        send_error(ctx, "You need admin permissions to run this command.").await?;
    }
    Ok(authorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_footer_is_rare() {
        assert_eq!(credit_footer(0.0), Some("made by jajtxs_"));
        assert_eq!(credit_footer(0.009), Some("made by jajtxs_"));
        assert_eq!(credit_footer(0.01), None);
        assert_eq!(credit_footer(0.75), None);
    }
}
