use crate::models::types::{PetRecord, SearchAttribute, Variant};
use crate::utils::catalogue::Catalogue;
use crate::utils::similarity::similarity;

pub const DEFAULT_CUTOFF: f64 = 0.6;
pub const FUZZY_RESULT_LIMIT: usize = 50;
pub const AUTOCOMPLETE_LIMIT: usize = 25;

const IMAGE_URL_BASE: &str = "https://ps99.biggamesapi.io/image/";
const ASSET_PREFIX: &str = "rbxassetid://";

/// Pets having `stat`, highest first. Ties keep catalogue order.
pub fn top_by_stat<'a>(catalogue: &'a Catalogue, stat: &str) -> Vec<&'a PetRecord> {
    let mut pets: Vec<&PetRecord> = catalogue
        .records()
        .filter(|pet| pet.stats.contains_key(stat))
        .collect();
    pets.sort_by(|a, b| b.stats[stat].compare(a.stats[stat]));
    pets
}

/// Candidates scoring at least `cutoff` against `query`, best first.
pub fn fuzzy_search<'a, I>(query: &str, candidates: I, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, f64)> = candidates
        .into_iter()
        .map(|name| (name, similarity(query, name)))
        .filter(|(_, score)| *score >= cutoff)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(name, _)| name.to_string()).collect()
}

pub fn search_by_attribute<'a>(
    catalogue: &'a Catalogue,
    attribute: SearchAttribute,
    value: &str,
) -> Vec<&'a PetRecord> {
    let needle = value.to_lowercase();
    catalogue
        .records()
        .filter(|pet| match attribute {
            SearchAttribute::Rarity => pet.rarity.to_lowercase() == needle,
            SearchAttribute::Stats => pet.stats.contains_key(value),
            SearchAttribute::Tag => pet.tags.iter().any(|tag| tag.to_lowercase() == needle),
            SearchAttribute::Limited => pet.limited,
        })
        .collect()
}

/// Exact name, falling back to the closest fuzzy match.
pub fn resolve_pet<'a>(catalogue: &'a Catalogue, name: &str) -> Option<&'a PetRecord> {
    if let Some(pet) = catalogue.get(name) {
        return Some(pet);
    }
    let best = fuzzy_search(name, catalogue.names(), DEFAULT_CUTOFF)
        .into_iter()
        .next()?;
    catalogue.get(&best)
}

pub fn image_url(reference: &str) -> String {
    format!("{}{}", IMAGE_URL_BASE, reference.replace(ASSET_PREFIX, ""))
}

/// Image URL per variant, only for the slots the pet actually has.
pub fn variant_image_urls(pet: &PetRecord) -> Vec<(Variant, String)> {
    Variant::ALL
        .iter()
        .zip(pet.images.iter())
        .map(|(variant, reference)| (*variant, image_url(reference)))
        .collect()
}

/// Names for slash-command autocomplete: prefix hits, then fuzzy hits.
pub fn pet_name_suggestions(catalogue: &Catalogue, partial: &str) -> Vec<String> {
    let partial = partial.trim();
    if partial.is_empty() {
        return catalogue
            .names()
            .take(AUTOCOMPLETE_LIMIT)
            .map(str::to_string)
            .collect();
    }

    let lowered = partial.to_lowercase();
    let mut suggestions: Vec<String> = catalogue
        .names()
        .filter(|name| name.to_lowercase().starts_with(&lowered))
        .take(AUTOCOMPLETE_LIMIT)
        .map(str::to_string)
        .collect();

    for name in fuzzy_search(partial, catalogue.names(), DEFAULT_CUTOFF) {
        if suggestions.len() >= AUTOCOMPLETE_LIMIT {
            break;
        }
        if !suggestions.contains(&name) {
            suggestions.push(name);
        }
    }
    suggestions
}
