//! Projection of task results into display fields.
//!
//! Pure functions only: everything here is derived from a validated [`TaskResult`].

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::models::{ClassificationResult, SearchResult, TaskResult};

/// Number of ranked matches shown for a search.
pub const MAX_MATCHES_SHOWN: usize = 3;

const BAR_WIDTH: usize = 20;

/// Format a [0, 1] value as a percentage with one decimal ("92.0%").
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// A probability shown as text plus a proportional bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityBar {
    pub percent: String,
    /// Filled share of the bar, clamped to [0, 1].
    pub fill: f64,
}

impl ProbabilityBar {
    pub fn new(value: f64) -> Self {
        Self {
            percent: format_percent(value),
            fill: value.clamp(0.0, 1.0),
        }
    }

    fn draw(&self) -> String {
        let filled = (self.fill * BAR_WIDTH as f64).round() as usize;
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationView {
    pub label: String,
    pub is_shop: bool,
    pub headline: &'static str,
    pub confidence: String,
    pub shop: ProbabilityBar,
    pub not_shop: ProbabilityBar,
    /// Empty unless a shop was detected.
    pub shop_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub rank: u32,
    pub similarity: String,
    /// Last path segment of the matched image identifier.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub exists: bool,
    pub headline: &'static str,
    pub best_similarity: String,
    /// Empty unless a match exists.
    pub shop_names: Vec<String>,
    pub matches: Vec<MatchRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultView {
    Classification(ClassificationView),
    Search(SearchView),
}

/// Project the current result, if any, into display fields.
pub fn render(result: Option<&TaskResult>) -> Option<ResultView> {
    result.map(|result| match result {
        TaskResult::Classification(c) => ResultView::Classification(render_classification(c)),
        TaskResult::Search(s) => ResultView::Search(render_search(s)),
    })
}

pub fn render_classification(result: &ClassificationResult) -> ClassificationView {
    let is_shop = result.is_shop();
    ClassificationView {
        label: result.label.clone(),
        is_shop,
        headline: if is_shop { "SHOP DETECTED" } else { "NOT A SHOP" },
        confidence: format_percent(result.probability),
        shop: ProbabilityBar::new(result.shop_prob),
        not_shop: ProbabilityBar::new(result.not_shop_prob),
        shop_names: if is_shop {
            result.shop_names.clone()
        } else {
            Vec::new()
        },
    }
}

pub fn render_search(result: &SearchResult) -> SearchView {
    SearchView {
        exists: result.exists,
        headline: if result.exists { "MATCH FOUND" } else { "NO MATCH" },
        best_similarity: format_percent(result.best_similarity),
        shop_names: if result.exists {
            result.shop_names.clone()
        } else {
            Vec::new()
        },
        matches: result
            .results
            .iter()
            .take(MAX_MATCHES_SHOWN)
            .map(|item| MatchRow {
                rank: item.rank,
                similarity: format_percent(item.similarity),
                name: item.image.rsplit('/').next().unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

fn write_tags(f: &mut Formatter<'_>, names: &[String]) -> FmtResult {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(f, "Detected shop names:")?;
    for name in names {
        writeln!(f, "  [{}]", name)?;
    }
    Ok(())
}

impl Display for ResultView {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ResultView::Classification(view) => {
                writeln!(f, "Classification Analysis")?;
                writeln!(f, "{} ({} confidence)", view.headline, view.confidence)?;
                write_tags(f, &view.shop_names)?;
                writeln!(f, "Shop Probability      {} {:>6}", view.shop.draw(), view.shop.percent)?;
                writeln!(
                    f,
                    "Not Shop Probability  {} {:>6}",
                    view.not_shop.draw(),
                    view.not_shop.percent
                )
            }
            ResultView::Search(view) => {
                writeln!(f, "Similarity Search Results")?;
                writeln!(f, "{} (best similarity: {})", view.headline, view.best_similarity)?;
                write_tags(f, &view.shop_names)?;
                if !view.matches.is_empty() {
                    writeln!(f, "Top Matches:")?;
                    for row in &view.matches {
                        writeln!(f, "  #{:<3} {:>6}  {}", row.rank, row.similarity, row.name)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchMatch;

    fn classification(label: &str, names: &[&str]) -> ClassificationResult {
        ClassificationResult {
            label: label.to_string(),
            probability: 0.92,
            shop_prob: 0.92,
            not_shop_prob: 0.08,
            shop_names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn nothing_to_render_without_result() {
        assert_eq!(render(None), None);
    }

    #[test]
    fn classification_fixture() {
        let body = r#"{"data":{"label":"shop","probability":0.92,"shop_prob":0.92,"not_shop_prob":0.08,"shop_names":["Acme"]}}"#;
        let result = TaskResult::Classification(ClassificationResult::from_body(body.as_bytes()).unwrap());

        let Some(ResultView::Classification(view)) = render(Some(&result)) else {
            panic!("expected classification view");
        };
        assert!(view.is_shop);
        assert_eq!(view.headline, "SHOP DETECTED");
        assert_eq!(view.confidence, "92.0%");
        assert_eq!(view.shop.percent, "92.0%");
        assert_eq!(view.not_shop.percent, "8.0%");
        assert_eq!(view.shop_names, vec!["Acme".to_string()]);
    }

    #[test]
    fn shop_names_hidden_when_not_a_shop() {
        let view = render_classification(&classification("not_shop", &["Acme"]));
        assert!(!view.is_shop);
        assert_eq!(view.headline, "NOT A SHOP");
        assert!(view.shop_names.is_empty());
    }

    #[test]
    fn search_fixture() {
        let body = r#"{"data":{"exists":true,"best_similarity":0.87,"results":[{"rank":1,"similarity":0.87,"image":"a/b/c.jpg"}],"shop_names":[]}}"#;
        let result = TaskResult::Search(SearchResult::from_body(body.as_bytes()).unwrap());

        let Some(ResultView::Search(view)) = render(Some(&result)) else {
            panic!("expected search view");
        };
        assert!(view.exists);
        assert_eq!(view.headline, "MATCH FOUND");
        assert_eq!(view.best_similarity, "87.0%");
        assert_eq!(
            view.matches,
            vec![MatchRow {
                rank: 1,
                similarity: "87.0%".to_string(),
                name: "c.jpg".to_string(),
            }]
        );
        assert!(view.shop_names.is_empty());
    }

    #[test]
    fn search_shows_top_three_only() {
        let result = SearchResult {
            exists: false,
            best_similarity: 0.4,
            results: (1..=5)
                .map(|rank| SearchMatch {
                    rank,
                    similarity: 0.4 - rank as f64 * 0.05,
                    image: format!("index/img_{}.png", rank),
                })
                .collect(),
            shop_names: vec!["Corner Store".to_string()],
        };
        let view = render_search(&result);
        assert_eq!(view.headline, "NO MATCH");
        assert_eq!(view.matches.len(), MAX_MATCHES_SHOWN);
        assert_eq!(view.matches[2].name, "img_3.png");
        assert!(view.shop_names.is_empty());
    }

    #[test]
    fn identifier_without_slash_is_kept_whole() {
        let result = SearchResult {
            exists: true,
            best_similarity: 0.9,
            results: vec![SearchMatch {
                rank: 1,
                similarity: 0.9,
                image: "plain.jpg".to_string(),
            }],
            shop_names: vec!["Acme".to_string()],
        };
        let view = render_search(&result);
        assert_eq!(view.matches[0].name, "plain.jpg");
        assert_eq!(view.shop_names, vec!["Acme".to_string()]);
    }

    #[test]
    fn text_rendering() {
        let view = ResultView::Classification(render_classification(&classification("shop", &["Acme"])));
        let text = view.to_string();
        assert!(text.contains("SHOP DETECTED (92.0% confidence)"));
        assert!(text.contains("[Acme]"));

        let bar = ProbabilityBar::new(0.5);
        assert_eq!(bar.draw().chars().filter(|c| *c == '█').count(), 10);
    }
}
