use crate::{TableRow, ToCell};
use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RECOMMENDATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Problem\s+([^\s-]+)[^\d]+(\d+)\)\s+-\s+Focus:\s+([^\n]+)").unwrap()
});
static ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

pub const NO_RESPONSE: &str = "No response generated. Please try again.";

/// Removes comments and tags and decodes the handful of entities the coach
/// output uses. Line structure is left untouched.
pub fn strip_markup(text: &str) -> String {
    let text = COMMENT.replace_all(text, "");
    let text = TAG.replace_all(&text, "");
    ENTITIES
        .iter()
        .fold(text.into_owned(), |acc, (entity, plain)| {
            acc.replace(entity, plain)
        })
}

/// Markup-free text with every blank-line run collapsed to one blank line.
pub fn plain_text(text: &str) -> String {
    BLANK_LINES
        .replace_all(&strip_markup(text), "\n\n")
        .trim()
        .to_string()
}

pub fn paragraphs(text: &str) -> Vec<String> {
    plain_text(text)
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct ProblemRecommendation {
    #[column("Problem ID")]
    pub problem_id: String,
    #[column("Problem Name")]
    pub name: String,
    #[column("Rating")]
    pub rating: String,
    #[column("Focus Area")]
    pub focus: String,
}

fn problem_name(line: &str, problem_id: &str) -> String {
    line.split_once(" - ")
        .map(|(_, rest)| rest.split(" (").next().unwrap_or(rest).trim())
        .filter(|name| !name.is_empty() && !name.starts_with("Focus:"))
        .map(String::from)
        .unwrap_or_else(|| problem_id.to_string())
}

/// Picks `Problem <id> - <name> (Rating: <n>) - Focus: <area>` lines out of a
/// daily problem set. Lines that do not match are dropped.
pub fn parse_recommendations(text: &str) -> Vec<ProblemRecommendation> {
    strip_markup(text)
        .lines()
        .filter_map(|line| {
            let captures = RECOMMENDATION.captures(line)?;
            let problem_id = captures.get(1)?.as_str().to_string();
            let rating = captures.get(2)?.as_str().to_string();
            let focus = captures.get(3)?.as_str().trim().to_string();
            Some(ProblemRecommendation {
                name: problem_name(line, &problem_id),
                problem_id,
                rating,
                focus,
            })
        })
        .collect()
}
