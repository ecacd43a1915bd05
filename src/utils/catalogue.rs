use crate::models::types::{PetRecord, StatValue};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("no brace-delimited pet table found")]
    NoTable,
}

#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("{method} expects at least {expected} argument(s), got {got}")]
    MissingArgs {
        method: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

/// All pets from one load of the source text, in source order.
#[derive(Debug, Clone)]
pub struct Catalogue {
    pub pets: IndexMap<String, PetRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl Catalogue {
    pub fn empty() -> Self {
        Self::from_pets(IndexMap::new())
    }

    pub fn from_pets(pets: IndexMap<String, PetRecord>) -> Self {
        Self {
            pets,
            loaded_at: Utc::now(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PetRecord> {
        self.pets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pets.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &PetRecord> {
        self.pets.values()
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }
}

/// Shared, swappable catalogue. Readers take a snapshot; reloads replace it whole.
pub struct CatalogueHandle {
    current: RwLock<Arc<Catalogue>>,
}

impl CatalogueHandle {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalogue)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalogue> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn replace(&self, catalogue: Catalogue) {
        let next = Arc::new(catalogue);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}

/// Methods recognised in a builder chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderMethod {
    Rarity,
    Stat,
    Image,
    Limited,
    Tag,
    HideInTerminal,
}

impl BuilderMethod {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Rarity" => Some(BuilderMethod::Rarity),
            "Stat" => Some(BuilderMethod::Stat),
            "Image" => Some(BuilderMethod::Image),
            "Limited" => Some(BuilderMethod::Limited),
            "Tag" => Some(BuilderMethod::Tag),
            "HideInTerminal" => Some(BuilderMethod::HideInTerminal),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            BuilderMethod::Rarity => "Rarity",
            BuilderMethod::Stat => "Stat",
            BuilderMethod::Image => "Image",
            BuilderMethod::Limited => "Limited",
            BuilderMethod::Tag => "Tag",
            BuilderMethod::HideInTerminal => "HideInTerminal",
        }
    }

    fn apply(self, record: &mut PetRecord, args: Vec<String>) -> Result<(), StepError> {
        match self {
            BuilderMethod::Rarity => {
                let [rarity] = take_args::<1>(self, args)?;
                record.rarity = rarity;
            }
            BuilderMethod::Stat => {
                let [stat, value] = take_args::<2>(self, args)?;
                let value = parse_stat_value(&value)?;
                record.stats.insert(stat, value);
            }
            BuilderMethod::Image => record.images = args,
            BuilderMethod::Limited => record.limited = true,
            BuilderMethod::Tag => record.tags.extend(args),
            BuilderMethod::HideInTerminal => record.hide_in_terminal = Some(true),
        }
        Ok(())
    }
}

fn take_args<const N: usize>(
    method: BuilderMethod,
    args: Vec<String>,
) -> Result<[String; N], StepError> {
    let got = args.len();
    let mut iter = args.into_iter();
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for slot in out.iter_mut() {
        *slot = iter.next().ok_or(StepError::MissingArgs {
            method: method.name(),
            expected: N,
            got,
        })?;
    }
    Ok(out)
}

/// Decimal if the text contains a `.`, integer otherwise.
pub fn parse_stat_value(text: &str) -> Result<StatValue, StepError> {
    let text = text.trim();
    if text.contains('.') {
        text.parse::<f64>()
            .map(StatValue::Float)
            .map_err(|_| StepError::InvalidNumber(text.to_string()))
    } else {
        text.parse::<i64>()
            .map(StatValue::Int)
            .map_err(|_| StepError::InvalidNumber(text.to_string()))
    }
}

static METHOD_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\((.*)$").expect("valid regex"));

/// Parse builder-chain text into a catalogue.
///
/// Only a missing table fails the whole load. A bad step (e.g. a
/// non-numeric `Stat` value) is logged and skipped; the rest of the pet
/// is kept.
pub fn parse_catalogue(text: &str) -> Result<Catalogue, CatalogueError> {
    let start = text.find('{').ok_or(CatalogueError::NoTable)?;
    let end = text.rfind('}').ok_or(CatalogueError::NoTable)?;
    if end <= start {
        return Err(CatalogueError::NoTable);
    }
    let table = &text[start..=end];

    let mut pets = IndexMap::new();
    for line in table.lines().map(str::trim).filter(|l| l.contains('=')) {
        if let Some(record) = parse_entry(line) {
            pets.insert(record.name.clone(), record);
        }
    }

    Ok(Catalogue::from_pets(pets))
}

fn parse_entry(line: &str) -> Option<PetRecord> {
    let (name_part, chain) = line.split_once('=')?;
    let name = name_part
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '"' | '\'' | '{'));
    if name.is_empty() {
        log::warn!("Skipping pet entry without a name: {}", line);
        return None;
    }

    let mut record = PetRecord::new(name);
    let segments = split_outside(chain, ':');
    for segment in segments.iter().skip(1) {
        let Some(caps) = METHOD_CALL.captures(segment) else {
            continue;
        };
        let method_name = &caps[1];
        let Some(method) = BuilderMethod::from_name(method_name) else {
            continue;
        };
        let args = parse_args(&caps[2]);
        if let Err(e) = method.apply(&mut record, args) {
            log::warn!("Pet `{}`: skipped {} step: {}", name, method.name(), e);
        }
    }

    Some(record)
}

/// Text between the opening `(` (already consumed) and the last `)`.
fn parse_args(rest: &str) -> Vec<String> {
    let inner = match rest.rfind(')') {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    split_outside(inner, ',')
        .into_iter()
        .map(|arg| strip_quotes(&arg).to_string())
        .filter(|arg| !arg.is_empty())
        .collect()
}

fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Split on `sep` when not inside quotes or parentheses. Segments are
/// trimmed and empty ones dropped.
fn split_outside(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for ch in text.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                c if c == sep && depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            },
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
-- generated pet directory
local Pets = {
    ["Fluffy"] = new():Rarity("Rare"):Stat("Coins", 100):Tag("Cute","Fast"):Limited(),
    ["Sparky"] = new():Rarity("Legendary"):Stat("Coins", 2500):Stat("Gems", 1.5):Image("rbxassetid://111", "rbxassetid://222"),
    ["Ghost"] = new():Stat("Tickets", 7):HideInTerminal():Sparkle("x"),
}
return Pets
"#;

    #[test]
    fn test_parse_single_entry() {
        let text = r#"{ ["Fluffy"] = new():Rarity("Rare"):Stat("Coins", 100):Tag("Cute","Fast"):Limited() }"#;
        let catalogue = parse_catalogue(text).unwrap();
        let fluffy = catalogue.get("Fluffy").unwrap();

        let mut expected = PetRecord::new("Fluffy");
        expected.rarity = "Rare".to_string();
        expected.stats.insert("Coins".to_string(), StatValue::Int(100));
        expected.tags = vec!["Cute".to_string(), "Fast".to_string()];
        expected.limited = true;

        assert_eq!(fluffy, &expected);
        assert!(fluffy.images.is_empty());
    }

    #[test]
    fn test_parse_sample_table() {
        let catalogue = parse_catalogue(SAMPLE).unwrap();
        assert_eq!(catalogue.len(), 3);
        assert_eq!(
            catalogue.names().collect::<Vec<_>>(),
            vec!["Fluffy", "Sparky", "Ghost"]
        );

        let sparky = catalogue.get("Sparky").unwrap();
        assert_eq!(sparky.stats["Gems"], StatValue::Float(1.5));
        assert_eq!(sparky.images, vec!["rbxassetid://111", "rbxassetid://222"]);

        let ghost = catalogue.get("Ghost").unwrap();
        assert_eq!(ghost.rarity, "Common");
        assert_eq!(ghost.hide_in_terminal, Some(true));
        assert!(!ghost.limited);
    }

    #[test]
    fn test_missing_table_fails_whole_load() {
        assert!(matches!(
            parse_catalogue("no table here"),
            Err(CatalogueError::NoTable)
        ));
        assert!(matches!(parse_catalogue("} backwards {"), Err(CatalogueError::NoTable)));
    }

    #[test]
    fn test_bad_stat_only_skips_that_step() {
        let text = r#"{
            ["Broken"] = new():Stat("Coins", lots):Stat("Gems", 5):Rarity("Epic")
            ["Fine"] = new():Stat("Coins", 10)
        }"#;
        let catalogue = parse_catalogue(text).unwrap();
        let broken = catalogue.get("Broken").unwrap();
        assert!(!broken.stats.contains_key("Coins"));
        assert_eq!(broken.stats["Gems"], StatValue::Int(5));
        assert_eq!(broken.rarity, "Epic");
        assert!(catalogue.get("Fine").is_some());
    }

    #[test]
    fn test_segments_without_parens_and_empty_args() {
        let text = r#"{ ["Odd"] = new():Rarity:Limited():Tag() }"#;
        let catalogue = parse_catalogue(text).unwrap();
        let odd = catalogue.get("Odd").unwrap();
        assert_eq!(odd.rarity, "Common");
        assert!(odd.limited);
        assert!(odd.tags.is_empty());
    }

    #[test]
    fn test_rarity_without_argument_is_skipped() {
        let text = r#"{ ["Quiet"] = new():Rarity():Stat("Coins", 3) }"#;
        let catalogue = parse_catalogue(text).unwrap();
        let quiet = catalogue.get("Quiet").unwrap();
        assert_eq!(quiet.rarity, "Common");
        assert_eq!(quiet.stats["Coins"], StatValue::Int(3));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let first = parse_catalogue(SAMPLE).unwrap();
        let second = parse_catalogue(SAMPLE).unwrap();
        assert_eq!(first.pets, second.pets);
    }

    #[test]
    fn test_duplicate_names_keep_last_definition() {
        let text = r#"{
            ["Twin"] = new():Rarity("Rare")
            ["Twin"] = new():Rarity("Epic")
        }"#;
        let catalogue = parse_catalogue(text).unwrap();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.get("Twin").unwrap().rarity, "Epic");
    }

    #[test]
    fn test_handle_replace_swaps_snapshot() {
        let handle = CatalogueHandle::new(Catalogue::empty());
        let before = handle.snapshot();
        handle.replace(parse_catalogue(SAMPLE).unwrap());
        assert!(before.is_empty());
        assert_eq!(handle.snapshot().len(), 3);
    }

    #[test]
    fn test_parse_stat_value() {
        assert_eq!(parse_stat_value("42"), Ok(StatValue::Int(42)));
        assert_eq!(parse_stat_value(" 0.25 "), Ok(StatValue::Float(0.25)));
        assert!(parse_stat_value("1.2.3").is_err());
    }
}
