use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

/// Backend endpoint paths
pub const IDEAS: &str = "/api/ideas";
pub const PALETTES: &str = "/api/palettes";
pub const FONTS: &str = "/api/fonts";
pub const RESOURCES: &str = "/api/resources";
pub const BRIEF_ANALYZE: &str = "/api/brief/analyze";

/// A resolved backend request: endpoint plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub endpoint: String,
    pub body: Value,
}

impl Route {
    pub fn new(endpoint: &str, body: Value) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            body,
        }
    }
}

/// One rung of the routing ladder
struct RouteRule {
    pattern: Regex,
    build: fn(&str) -> Route,
}

/// Ordered routing rules; the first matching pattern wins
static RULES: Lazy<Vec<RouteRule>> = Lazy::new(|| {
    vec![
        RouteRule {
            pattern: Regex::new("(?i)palette|color").expect("valid regex"),
            build: |_| Route::new(PALETTES, json!({"vibe": "tech", "accent": "#7C3AED"})),
        },
        RouteRule {
            pattern: Regex::new("(?i)font|type").expect("valid regex"),
            build: |_| Route::new(FONTS, json!({"mood": "modern"})),
        },
        RouteRule {
            pattern: Regex::new("(?i)resource|icon|mockup|template|ui").expect("valid regex"),
            build: |transcript| {
                let topic = if transcript.is_empty() {
                    "dashboard"
                } else {
                    transcript
                };
                Route::new(RESOURCES, json!({"topic": topic, "kind": "ui"}))
            },
        },
        RouteRule {
            pattern: Regex::new("(?i)brief|task|scope|deliverable").expect("valid regex"),
            build: |transcript| {
                Route::new(
                    BRIEF_ANALYZE,
                    json!({
                        "client": "Client",
                        "project_type": "branding",
                        "goals": transcript,
                    }),
                )
            },
        },
    ]
});

fn default_route(transcript: &str) -> Route {
    let keywords = if transcript.is_empty() {
        "brand"
    } else {
        transcript
    };
    Route::new(
        IDEAS,
        json!({"category": "branding", "keywords": keywords, "style": "modern"}),
    )
}

/// Resolves an ask into a backend request
///
/// An explicit route (from a quick action) bypasses keyword matching
/// entirely. Otherwise the transcript walks the ladder in order; no match
/// falls through to the idea-generation default.
pub fn resolve(explicit: Option<Route>, transcript: &str) -> Route {
    if let Some(route) = explicit {
        return route;
    }
    for rule in RULES.iter() {
        if rule.pattern.is_match(transcript) {
            return (rule.build)(transcript);
        }
    }
    default_route(transcript)
}

/// A predefined shortcut that bypasses keyword routing
#[derive(Debug, Clone)]
pub struct QuickAction {
    pub label: &'static str,
    pub route: Route,
}

/// The fixed quick-action catalog shown in the UI
pub fn quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction {
            label: "Design Ideas",
            route: Route::new(
                IDEAS,
                json!({
                    "category": "branding",
                    "keywords": "AI creative studio",
                    "style": "futuristic",
                }),
            ),
        },
        QuickAction {
            label: "Palettes",
            route: Route::new(PALETTES, json!({"vibe": "tech", "accent": "#7C3AED"})),
        },
        QuickAction {
            label: "Fonts",
            route: Route::new(FONTS, json!({"mood": "tech"})),
        },
        QuickAction {
            label: "Resources",
            route: Route::new(RESOURCES, json!({"topic": "SaaS dashboard", "kind": "ui"})),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_words_route_to_palettes() {
        for transcript in ["show me a PALETTE", "warm colors please", "recolor it"] {
            let route = resolve(None, transcript);
            assert_eq!(route.endpoint, PALETTES, "transcript: {transcript}");
            assert_eq!(route.body, json!({"vibe": "tech", "accent": "#7C3AED"}));
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        // Matches both the palette and font patterns; palettes is first
        let route = resolve(None, "font palette");
        assert_eq!(route.endpoint, PALETTES);
    }

    #[test]
    fn font_words_route_to_fonts() {
        let route = resolve(None, "suggest a typeface");
        assert_eq!(route.endpoint, FONTS);
        assert_eq!(route.body, json!({"mood": "modern"}));
    }

    #[test]
    fn resource_words_carry_the_transcript_as_topic() {
        let route = resolve(None, "ui mockups for a store");
        assert_eq!(route.endpoint, RESOURCES);
        assert_eq!(
            route.body,
            json!({"topic": "ui mockups for a store", "kind": "ui"})
        );
    }

    #[test]
    fn brief_words_route_to_brief_analysis() {
        let route = resolve(None, "scope this deliverable");
        assert_eq!(route.endpoint, BRIEF_ANALYZE);
        assert_eq!(route.body["client"], "Client");
        assert_eq!(route.body["goals"], "scope this deliverable");
    }

    #[test]
    fn empty_transcript_defaults_to_ideas() {
        let route = resolve(None, "");
        assert_eq!(route.endpoint, IDEAS);
        assert_eq!(
            route.body,
            json!({"category": "branding", "keywords": "brand", "style": "modern"})
        );
    }

    #[test]
    fn unmatched_transcript_feeds_ideas_keywords() {
        let route = resolve(None, "something for a bakery");
        assert_eq!(route.endpoint, IDEAS);
        assert_eq!(route.body["keywords"], "something for a bakery");
    }

    #[test]
    fn explicit_route_bypasses_keyword_matching() {
        let explicit = Route::new(FONTS, json!({"mood": "tech"}));
        // The transcript alone would route to palettes
        let route = resolve(Some(explicit.clone()), "show me colors");
        assert_eq!(route, explicit);
    }

    #[test]
    fn quick_actions_match_the_catalog() {
        let actions = quick_actions();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0].label, "Design Ideas");
        assert_eq!(actions[0].route.endpoint, IDEAS);
        assert_eq!(actions[1].route.endpoint, PALETTES);
        assert_eq!(actions[2].route.body, json!({"mood": "tech"}));
        assert_eq!(actions[3].route.endpoint, RESOURCES);
    }
}
