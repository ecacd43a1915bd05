use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const DEFAULT_RARITY: &str = "Common";
pub const DEFAULT_EMBED_COLOR: u32 = 0x3498db;

/// A numeric stat as written in the source text: integers stay integers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Int(i64),
    Float(f64),
}

impl StatValue {
    pub fn as_f64(self) -> f64 {
        match self {
            StatValue::Int(v) => v as f64,
            StatValue::Float(v) => v,
        }
    }

    /// Total order for ranking. Two integers compare exactly; anything
    /// involving a float goes through `f64::total_cmp`.
    pub fn compare(self, other: StatValue) -> Ordering {
        match (self, other) {
            (StatValue::Int(a), StatValue::Int(b)) => a.cmp(&b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for StatValue {
    /// Thousands-separated, e.g. `1,250,000` or `1,234.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = match self {
            StatValue::Int(v) => v.to_string(),
            StatValue::Float(v) => v.to_string(),
        };
        let (sign, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", raw.as_str()),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, frac)) => (i, Some(frac)),
            None => (unsigned, None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match frac_part {
            Some(frac) => write!(f, "{}{}.{}", sign, grouped, frac),
            None => write!(f, "{}{}", sign, grouped),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PetRecord {
    pub name: String,
    pub rarity: String,
    pub stats: IndexMap<String, StatValue>,
    pub images: Vec<String>,
    pub limited: bool,
    pub tags: Vec<String>,
    pub hide_in_terminal: Option<bool>,
}

impl PetRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rarity: DEFAULT_RARITY.to_string(),
            stats: IndexMap::new(),
            images: Vec::new(),
            limited: false,
            tags: Vec::new(),
            hide_in_terminal: None,
        }
    }
}

/// The four rendered appearances, in image-slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Normal,
    Shiny,
    Mythic,
    ShinyMythic,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Normal,
        Variant::Shiny,
        Variant::Mythic,
        Variant::ShinyMythic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Normal => "Normal",
            Variant::Shiny => "Shiny",
            Variant::Mythic => "Mythic",
            Variant::ShinyMythic => "Shiny Mythic",
        }
    }
}

/// Persisted bot settings. Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub report_channel: Option<u64>,
    pub embed_color: u32,
    pub admin_roles: Vec<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_channel: None,
            embed_color: DEFAULT_EMBED_COLOR,
            admin_roles: Vec::new(),
        }
    }
}

/// Attribute filters understood by `/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAttribute {
    Rarity,
    Stats,
    Tag,
    Limited,
}

impl SearchAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchAttribute::Rarity => "rarity",
            SearchAttribute::Stats => "stats",
            SearchAttribute::Tag => "tag",
            SearchAttribute::Limited => "limited",
        }
    }
}

/// A pre-rendered page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_value_grouping() {
        assert_eq!(StatValue::Int(100).to_string(), "100");
        assert_eq!(StatValue::Int(1_250_000).to_string(), "1,250,000");
        assert_eq!(StatValue::Int(-4500).to_string(), "-4,500");
        assert_eq!(StatValue::Float(1234.5).to_string(), "1,234.5");
    }

    #[test]
    fn test_compare_large_integers_exactly() {
        let small = StatValue::Int(9_007_199_254_740_992);
        let big = StatValue::Int(9_007_199_254_740_993);
        assert_eq!(small.as_f64(), big.as_f64());
        assert_eq!(big.compare(small), Ordering::Greater);
        assert_eq!(small.compare(big), Ordering::Less);
        assert_eq!(StatValue::Int(2).compare(StatValue::Float(1.5)), Ordering::Greater);
        assert_eq!(StatValue::Float(2.0).compare(StatValue::Int(2)), Ordering::Equal);
    }

    #[test]
    fn test_settings_defaults_fill_missing_keys() {
        let settings: Settings = serde_json::from_str(r#"{"report_channel": 42}"#).unwrap();
        assert_eq!(settings.report_channel, Some(42));
        assert_eq!(settings.embed_color, DEFAULT_EMBED_COLOR);
        assert!(settings.admin_roles.is_empty());
    }
}
