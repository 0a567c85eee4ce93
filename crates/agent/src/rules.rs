//! Deterministic rule-based brief extraction.
//!
//! No network, no API key: lowercased keyword scanning plus token-window
//! passes over the request text. This is both the default parser and the
//! fallback target when the LLM path fails.

use rust_decimal::Decimal;

use outfitter_core::domain::brief::{default_items, Scenario, ShoppingBrief};
use outfitter_core::domain::product::{Category, Warmth};

const HIGH_WARMTH_WORDS: [&str; 6] = ["warm", "hot", "insulated", "thermal", "cold", "frigid"];
const MEDIUM_WARMTH_WORDS: [&str; 3] = ["moderate", "medium", "mild"];
const WATERPROOF_WORDS: [&str; 4] = ["waterproof", "water-proof", "water resistant", "rain"];
const KNOWN_BRANDS: [&str; 6] =
    ["arcteryx", "arc'teryx", "patagonia", "north face", "columbia", "burton"];
const KNOWN_COLORS: [&str; 7] = ["black", "blue", "red", "green", "white", "gray", "yellow"];
const SIZE_TOKENS: [&str; 6] = ["xs", "s", "m", "l", "xl", "xxl"];

pub fn parse(message: &str) -> ShoppingBrief {
    let normalized = message.to_ascii_lowercase();
    let tokens = tokenize(&normalized);

    let mut brief = ShoppingBrief::default();
    brief.items.clear();

    apply_scenario(&normalized, &mut brief);

    if let Some(budget) = extract_budget(&tokens) {
        brief.budget = budget;
    }
    if let Some(days) = extract_delivery_days(&tokens) {
        brief.delivery_days = days;
    }
    if let Some(size) = extract_size(&tokens, &normalized) {
        brief.size = size;
    }

    if let Some(warmth) = extract_warmth(&normalized) {
        brief.preferences.warmth = Some(warmth);
    }
    if contains_any(&normalized, &WATERPROOF_WORDS) {
        brief.preferences.waterproof = true;
    }
    if let Some(brand) = extract_brand(&normalized) {
        brief.preferences.brand = Some(brand);
    }
    if let Some(color) = extract_color(&normalized) {
        brief.preferences.color = Some(color);
    }

    // Item keywords only apply when no scenario already filled the list.
    if brief.items.is_empty() {
        brief.items = extract_items(&normalized);
    }
    if brief.items.is_empty() {
        brief.items = default_items();
    }

    brief
}

fn apply_scenario(normalized: &str, brief: &mut ShoppingBrief) {
    if contains_any(normalized, &["ski", "snow"]) {
        brief.scenario = Scenario::Skiing;
        brief.items = categories(&["jacket", "pants", "gloves", "goggles", "helmet"]);
        brief.preferences.warmth = Some(Warmth::High);
        brief.preferences.waterproof = true;
    } else if contains_any(normalized, &["party", "game", "superbowl"]) {
        brief.scenario = Scenario::Party;
        brief.items = categories(&["jacket", "pants"]);
        brief.budget = Decimal::from(150);
    } else if contains_any(normalized, &["hackathon", "event"]) {
        brief.scenario = Scenario::Hackathon;
        brief.items = categories(&["jacket", "pants"]);
        brief.budget = Decimal::from(200);
    }
}

fn extract_budget(tokens: &[String]) -> Option<Decimal> {
    for (index, token) in tokens.iter().enumerate() {
        if let Some(raw) = token.strip_prefix('$') {
            if let Some(amount) = parse_amount(raw) {
                return Some(amount);
            }
            // "$ 400": bare sigil followed by the number.
            if raw.is_empty() {
                if let Some(amount) = tokens.get(index + 1).and_then(|next| parse_amount(next)) {
                    return Some(amount);
                }
            }
        }
    }

    for window in tokens.windows(2) {
        if let [first, second] = window {
            if second.starts_with("dollar") || second == "budget" {
                if let Some(amount) = parse_amount(first) {
                    return Some(amount);
                }
            }
            if first == "budget" {
                let raw = second.strip_prefix('$').unwrap_or(second);
                if let Some(amount) = parse_amount(raw) {
                    return Some(amount);
                }
            }
        }
    }

    None
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.parse::<u32>().ok().map(Decimal::from)
}

fn extract_delivery_days(tokens: &[String]) -> Option<u32> {
    for window in tokens.windows(2) {
        if let [first, second] = window {
            // "5 days", "3-day delivery", "in 2 days"
            if second.starts_with("day") {
                if let Ok(days) = first.parse::<u32>() {
                    return Some(days);
                }
            }
            // "within 3"
            if first == "within" {
                if let Ok(days) = second.parse::<u32>() {
                    return Some(days);
                }
            }
        }
    }
    None
}

fn extract_size(tokens: &[String], normalized: &str) -> Option<String> {
    // Word forms win over bare letter tokens; longer phrases first so
    // "extra small" is not shadowed by "small".
    let word_forms = [
        ("extra small", "XS"),
        ("extra large", "XL"),
        ("small", "S"),
        ("medium", "M"),
        ("large", "L"),
    ];
    for (word, letter) in word_forms {
        if normalized.contains(word) {
            return Some(letter.to_string());
        }
    }

    tokens
        .iter()
        .find(|token| SIZE_TOKENS.contains(&token.as_str()))
        .map(|token| token.to_ascii_uppercase())
}

fn extract_warmth(normalized: &str) -> Option<Warmth> {
    if contains_any(normalized, &HIGH_WARMTH_WORDS) {
        Some(Warmth::High)
    } else if contains_any(normalized, &MEDIUM_WARMTH_WORDS) {
        Some(Warmth::Medium)
    } else {
        None
    }
}

fn extract_brand(normalized: &str) -> Option<String> {
    KNOWN_BRANDS
        .iter()
        .find(|brand| normalized.contains(*brand))
        .map(|brand| title_case(brand))
}

fn extract_color(normalized: &str) -> Option<String> {
    KNOWN_COLORS
        .iter()
        .find(|color| normalized.contains(*color))
        .map(|color| (*color).to_string())
}

fn extract_items(normalized: &str) -> Vec<Category> {
    let item_keywords: [(&str, &[&str]); 5] = [
        ("jacket", &["jacket", "coat", "parka"]),
        ("pants", &["pants", "trousers", "bottoms"]),
        ("gloves", &["gloves", "mittens"]),
        ("goggles", &["goggles", "glasses", "eyewear"]),
        ("helmet", &["helmet", "headgear"]),
    ];

    item_keywords
        .into_iter()
        .filter(|(_, keywords)| contains_any(normalized, keywords))
        .map(|(item, _)| Category::new(item))
        .collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn categories(names: &[&str]) -> Vec<Category> {
    names.iter().map(|name| Category::new(*name)).collect()
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokenize(normalized: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(normalized.len());
    for character in normalized.chars() {
        if character.is_ascii_alphanumeric() || character == '$' {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}
