//! Turns query results into transport-neutral page text.

use crate::models::types::{PetRecord, RenderedPage, SearchAttribute};
use crate::utils::pagination::{PAGE_SIZE, chunk_lines};

/// Discord caps embed titles at 256 characters.
const TITLE_QUERY_LIMIT: usize = 100;

fn clip_query(query: &str) -> String {
    if query.chars().count() <= TITLE_QUERY_LIMIT {
        return query.to_string();
    }
    let mut clipped: String = query.chars().take(TITLE_QUERY_LIMIT - 3).collect();
    clipped.push_str("...");
    clipped
}

fn into_pages(title: &str, lines: Vec<String>) -> Vec<RenderedPage> {
    chunk_lines(lines, PAGE_SIZE)
        .into_iter()
        .map(|page| RenderedPage {
            title: title.to_string(),
            description: page.join("\n"),
        })
        .collect()
}

pub fn top_pages(stat: &str, pets: &[&PetRecord]) -> Vec<RenderedPage> {
    let lines = pets
        .iter()
        .enumerate()
        .filter_map(|(rank, pet)| {
            let value = pet.stats.get(stat)?;
            Some(format!(
                "**{}.** {} - {} {} ({})",
                rank + 1,
                pet.name,
                value,
                stat,
                pet.rarity
            ))
        })
        .collect();
    into_pages(&format!("Top Pets by {}", stat), lines)
}

pub fn fuzzy_pages(query: &str, names: &[String]) -> Vec<RenderedPage> {
    let lines = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("**{}.** {}", i + 1, name))
        .collect();
    into_pages(
        &format!("Fuzzy Search Results for '{}'", clip_query(query)),
        lines,
    )
}

pub fn search_pages(
    attribute: SearchAttribute,
    query: &str,
    pets: &[&PetRecord],
) -> Vec<RenderedPage> {
    let lines = pets
        .iter()
        .map(|pet| {
            let mut line = format!("**{}** ({})", pet.name, pet.rarity);
            if !pet.tags.is_empty() {
                line.push_str(&format!(" - Tags: {}", pet.tags.join(", ")));
            }
            if pet.limited {
                line.push_str(" - Limited");
            }
            line
        })
        .collect();
    into_pages(
        &format!(
            "Pets with {} matching '{}'",
            attribute.as_str(),
            clip_query(query)
        ),
        lines,
    )
}

/// Title and body of the `/view` stats card.
pub fn pet_details(pet: &PetRecord) -> RenderedPage {
    let stats = pet
        .stats
        .iter()
        .map(|(stat, value)| format!("{}: {}", stat, value))
        .collect::<Vec<_>>()
        .join("\n");

    let mut description = format!("**Stats:**\n{}\n\n", stats);
    if !pet.tags.is_empty() {
        description.push_str(&format!("**Tags:** {}\n", pet.tags.join(", ")));
    }
    if pet.limited {
        description.push_str("**Limited**");
    }

    RenderedPage {
        title: format!("{} ({})", pet.name, pet.rarity),
        description,
    }
}
