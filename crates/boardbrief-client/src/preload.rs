//! Structured game data embedded in BoardGameGeek pages.
//!
//! Game pages are Angular apps; most of the useful facts live in a script
//! that assigns a JSON object to `GEEK.geekitemPreload`. Parsing it gives a
//! far denser description than the rendered body text.

use serde::Deserialize;
use serde_json::Value;

pub const PRELOAD_MARKER: &str = "GEEK.geekitemPreload";

const MAX_PUBLISHERS: usize = 5;
const MAX_FAMILIES: usize = 10;

#[derive(Debug, Deserialize)]
pub struct GamePreload {
    #[serde(default)]
    pub item: Option<GameItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameItem {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub yearpublished: Option<Value>,
    #[serde(default)]
    pub minplayers: Option<Value>,
    #[serde(default)]
    pub maxplayers: Option<Value>,
    #[serde(default)]
    pub minplaytime: Option<Value>,
    #[serde(default)]
    pub maxplaytime: Option<Value>,
    #[serde(default)]
    pub minage: Option<Value>,
    #[serde(default)]
    pub short_description: Option<Value>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub polls: Option<Polls>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub boardgamedesigner: Option<Vec<Link>>,
    #[serde(default)]
    pub boardgamepublisher: Option<Vec<Link>>,
    #[serde(default)]
    pub boardgamecategory: Option<Vec<Link>>,
    #[serde(default)]
    pub boardgamemechanic: Option<Vec<Link>>,
    #[serde(default)]
    pub boardgamefamily: Option<Vec<Link>>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Polls {
    #[serde(default)]
    pub userplayers: Option<UserPlayers>,
    #[serde(default)]
    pub playerage: Option<Value>,
    #[serde(default)]
    pub boardgameweight: Option<Weight>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPlayers {
    #[serde(default)]
    pub best: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Weight {
    #[serde(default)]
    pub averageweight: Option<Value>,
}

/// Find and parse the preload object inside a script body.
///
/// Only the first JSON value after the assignment is read, so whatever the
/// script does afterwards is ignored.
pub fn parse_preload(script: &str) -> Option<Result<GamePreload, serde_json::Error>> {
    let start = script.find(PRELOAD_MARKER)?;
    let rest = script[start + PRELOAD_MARKER.len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();

    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<GamePreload>();
    stream.next()
}

impl GamePreload {
    /// One human-readable line per known fact, in a stable order.
    pub fn facts(&self) -> Vec<String> {
        let Some(item) = &self.item else {
            return Vec::new();
        };
        let mut facts = Vec::new();

        if let Some(name) = item.name.as_ref().and_then(scalar) {
            facts.push(format!("Game: {name}"));
        }
        if let Some(year) = item.yearpublished.as_ref().and_then(scalar) {
            facts.push(format!("Year: {year}"));
        }
        if let (Some(min), Some(max)) = (
            item.minplayers.as_ref().and_then(scalar),
            item.maxplayers.as_ref().and_then(scalar),
        ) {
            facts.push(format!("Players: {min}-{max}"));
        }
        if let (Some(min), Some(max)) = (
            item.minplaytime.as_ref().and_then(scalar),
            item.maxplaytime.as_ref().and_then(scalar),
        ) {
            facts.push(format!("Playtime: {min}-{max} minutes"));
        }
        if let Some(age) = item.minage.as_ref().and_then(scalar) {
            facts.push(format!("Age: {age}+"));
        }
        if let Some(desc) = item.short_description.as_ref().and_then(scalar) {
            facts.push(format!("Description: {desc}"));
        }

        if let Some(links) = &item.links {
            push_names(&mut facts, "Designers", &links.boardgamedesigner, usize::MAX);
            push_names(&mut facts, "Publishers", &links.boardgamepublisher, MAX_PUBLISHERS);
            push_names(&mut facts, "Categories", &links.boardgamecategory, usize::MAX);
            push_names(&mut facts, "Mechanisms", &links.boardgamemechanic, usize::MAX);
            push_names(&mut facts, "Families/Themes", &links.boardgamefamily, MAX_FAMILIES);
        }

        if let Some(polls) = &item.polls {
            if let Some(best) = polls
                .userplayers
                .as_ref()
                .and_then(|u| u.best.as_ref())
                .and_then(player_counts)
            {
                facts.push(format!("Best with: {best}"));
            }
            if let Some(age) = polls.playerage.as_ref().and_then(scalar) {
                facts.push(format!("Community suggested age: {age}"));
            }
            if let Some(weight) = &polls.boardgameweight {
                let avg = weight
                    .averageweight
                    .as_ref()
                    .and_then(as_f64)
                    .unwrap_or(0.0);
                facts.push(format!("Complexity (1-5): {avg:.2}"));
            }
        }

        facts
    }
}

fn push_names(facts: &mut Vec<String>, label: &str, links: &Option<Vec<Link>>, limit: usize) {
    if let Some(links) = links {
        let names: Vec<&str> = links.iter().take(limit).map(|l| l.name.as_str()).collect();
        facts.push(format!("{label}: {}", names.join(", ")));
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render the "best player count" poll, e.g. `[{"min":3,"max":4}]` → `3-4`.
fn player_counts(best: &Value) -> Option<String> {
    let ranges = best.as_array()?;
    let rendered: Vec<String> = ranges
        .iter()
        .filter_map(|range| {
            let min = range.get("min").and_then(scalar)?;
            match range.get("max").and_then(scalar) {
                Some(max) if max != min => Some(format!("{min}-{max}")),
                _ => Some(min),
            }
        })
        .collect();
    (!rendered.is_empty()).then(|| rendered.join(", "))
}
