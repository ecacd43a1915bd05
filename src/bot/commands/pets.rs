use crate::bot::paginator::send_paginated;
use crate::bot::render::{fuzzy_pages, pet_details, search_pages, top_pages};
use crate::bot::reply::{send_embed, themed_embed};
use crate::bot::{Context, Error};
use crate::models::types::SearchAttribute;
use crate::utils::query::{
    DEFAULT_CUTOFF, FUZZY_RESULT_LIMIT, fuzzy_search, pet_name_suggestions, resolve_pet,
    search_by_attribute, top_by_stat, variant_image_urls,
};
use poise::{ChoiceParameter, CreateReply, serenity_prelude as serenity};

#[derive(ChoiceParameter, Clone, Copy, Debug)]
pub enum TopStat {
    #[name = "Bubbles"]
    Bubbles,
    #[name = "Coins"]
    Coins,
    #[name = "Gems"]
    Gems,
    #[name = "Tickets"]
    Tickets,
}

impl TopStat {
    fn stat_name(self) -> &'static str {
        match self {
            TopStat::Bubbles => "Bubbles",
            TopStat::Coins => "Coins",
            TopStat::Gems => "Gems",
            TopStat::Tickets => "Tickets",
        }
    }
}

#[derive(ChoiceParameter, Clone, Copy, Debug)]
pub enum SearchField {
    #[name = "rarity"]
    Rarity,
    #[name = "stats"]
    Stats,
    #[name = "tag"]
    Tag,
    #[name = "limited"]
    Limited,
}

impl From<SearchField> for SearchAttribute {
    fn from(field: SearchField) -> Self {
        match field {
            SearchField::Rarity => SearchAttribute::Rarity,
            SearchField::Stats => SearchAttribute::Stats,
            SearchField::Tag => SearchAttribute::Tag,
            SearchField::Limited => SearchAttribute::Limited,
        }
    }
}

pub async fn autocomplete_pet_name(
    ctx: Context<'_>,
    partial: &str,
) -> impl Iterator<Item = serenity::AutocompleteChoice> {
    let catalogue = ctx.data().catalogue.snapshot();
    pet_name_suggestions(&catalogue, partial)
        .into_iter()
        .map(|name| serenity::AutocompleteChoice::new(name.clone(), name))
}

/// Show top pets by stat
#[poise::command(slash_command)]
pub async fn top(
    ctx: Context<'_>,
    #[description = "Which stat to sort by"] stat: TopStat,
) -> Result<(), Error> {
    let stat = stat.stat_name();
    log::info!("/top {} requested by {}", stat, ctx.author().name);

    let catalogue = ctx.data().catalogue.snapshot();
    let pets = top_by_stat(&catalogue, stat);
    if pets.is_empty() {
        send_embed(ctx, "Error", format!("No pets found with {} stat.", stat), false).await?;
        return Ok(());
    }

    send_paginated(ctx, top_pages(stat, &pets)).await
}

/// Fuzzy search for pets
#[poise::command(slash_command)]
pub async fn fuzzy(
    ctx: Context<'_>,
    #[description = "Search term"] query: String,
) -> Result<(), Error> {
    log::info!("/fuzzy '{}' requested by {}", query, ctx.author().name);

    let catalogue = ctx.data().catalogue.snapshot();
    let mut results = fuzzy_search(&query, catalogue.names(), DEFAULT_CUTOFF);
    results.truncate(FUZZY_RESULT_LIMIT);
    if results.is_empty() {
        send_embed(ctx, "No Results", "No pets matched your search.", false).await?;
        return Ok(());
    }

    send_paginated(ctx, fuzzy_pages(&query, &results)).await
}

/// Search pets by attribute
#[poise::command(slash_command)]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Attribute to search by"] attribute: SearchField,
    #[description = "Value to search for"] query: String,
) -> Result<(), Error> {
    let attribute = SearchAttribute::from(attribute);
    log::info!(
        "/search {}='{}' requested by {}",
        attribute.as_str(),
        query,
        ctx.author().name
    );

    let catalogue = ctx.data().catalogue.snapshot();
    let pets = search_by_attribute(&catalogue, attribute, &query);
    if pets.is_empty() {
        send_embed(ctx, "No Results", "No pets matched your search.", false).await?;
        return Ok(());
    }

    send_paginated(ctx, search_pages(attribute, &query, &pets)).await
}

/// View details and images for a pet
#[poise::command(slash_command)]
pub async fn view(
    ctx: Context<'_>,
    #[description = "Name of the pet to view"]
    #[autocomplete = "autocomplete_pet_name"]
    pet_name: String,
) -> Result<(), Error> {
    let catalogue = ctx.data().catalogue.snapshot();
    let Some(pet) = resolve_pet(&catalogue, &pet_name) else {
        send_embed(ctx, "Error", format!("Pet '{}' not found.", pet_name), false).await?;
        return Ok(());
    };
    if pet.name != pet_name {
        log::debug!("/view '{}' resolved to '{}'", pet_name, pet.name);
    }

    let details = pet_details(pet);
    let variants = variant_image_urls(pet);

    let mut card = themed_embed(ctx, details.title, details.description);
    if let Some((_, normal)) = variants.first() {
        card = card.thumbnail(normal);
    }
    ctx.send(CreateReply::default().embed(card)).await?;

    let colour = ctx.data().settings.snapshot().embed_color;
    for (variant, url) in variants {
        let embed = serenity::CreateEmbed::default()
            .title(format!("{} - {}", pet.name, variant.label()))
            .thumbnail(url)
            .colour(serenity::Colour::new(colour));
        ctx.send(CreateReply::default().embed(embed)).await?;
    }

    Ok(())
}
