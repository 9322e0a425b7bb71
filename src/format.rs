use serde_json::Value;

use crate::router;

/// Formats a backend reply into the display/narration string
///
/// Pure function over the endpoint name and parsed JSON body. Missing or
/// malformed fields degrade to empty lists; nothing here can fail.
pub fn format_reply(endpoint: &str, data: &Value) -> String {
    match endpoint {
        router::BRIEF_ANALYZE => {
            let mut lines = vec!["Brief distilled. Key steps:".to_string()];
            lines.extend(string_items(data, "tasks"));
            lines.push("Risks:".to_string());
            lines.extend(string_items(data, "risks"));
            lines.join("\n")
        }
        router::IDEAS => headed_list("Directions:", string_items(data, "ideas")),
        router::RESOURCES => headed_list("Resources:", string_items(data, "results")),
        router::PALETTES => {
            let groups = array_items(data, "palettes")
                .iter()
                .map(|palette| {
                    let name = palette["name"].as_str().unwrap_or_default();
                    let colors = palette["colors"]
                        .as_array()
                        .map(|colors| {
                            colors
                                .iter()
                                .map(item_text)
                                .collect::<Vec<_>>()
                                .join(" | ")
                        })
                        .unwrap_or_default();
                    format!("{}: {}", name, colors)
                })
                .collect();
            headed_list("Palettes:", groups)
        }
        router::FONTS => {
            let pairs = array_items(data, "pairs")
                .iter()
                .map(|pair| {
                    format!(
                        "{} + {}",
                        pair["heading"].as_str().unwrap_or_default(),
                        pair["body"].as_str().unwrap_or_default()
                    )
                })
                .collect();
            headed_list("Font pairs:", pairs)
        }
        _ => serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
    }
}

fn headed_list(header: &str, items: Vec<String>) -> String {
    let mut lines = vec![header.to_string()];
    lines.extend(items);
    lines.join("\n")
}

fn array_items<'a>(data: &'a Value, key: &str) -> Vec<&'a Value> {
    data[key]
        .as_array()
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}

fn string_items(data: &Value, key: &str) -> Vec<String> {
    array_items(data, key).into_iter().map(item_text).collect()
}

fn item_text(item: &Value) -> String {
    match item.as_str() {
        Some(s) => s.to_string(),
        None => item.to_string(),
    }
}
