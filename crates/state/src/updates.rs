//! Extraction of update records from the text printed by `skills check`.
//!
//! The tool has no machine-readable output, so parsing is best effort: a
//! precise `name: 1.0.0 -> 1.1.0` form, then a keyword heuristic that looks
//! for known skill names. "Nothing found" and "could not parse" look the same.

use std::{collections::HashSet, sync::LazyLock};

use {
    regex::Regex,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

static VERSION_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\S+):\s*([\d.]+(?:-\S+)?)\s*(?:->|=>)\s*([\d.]+(?:-\S+)?)").ok()
});

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").ok());

const UPDATE_KEYWORDS: &[&str] = &["update", "outdated", "new version"];

/// A skill the tool reported as outdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
}

impl UpdateRecord {
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_version: None,
            latest_version: None,
        }
    }
}

/// Parse `text` line by line into update records, in line order.
///
/// A line matching `<name>: <version> (->|=>) <version>` yields a versioned
/// record and is not looked at again. Otherwise, if it mentions "update",
/// "outdated" or "new version" (any case), every name in `known_names`
/// occurring in the line yields a name-only record. A name is recorded at
/// most once.
pub fn parse_update_output(text: &str, known_names: &[String]) -> Vec<UpdateRecord> {
    let text = strip_ansi(text);
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for line in text.lines() {
        if let Some(caps) = VERSION_LINE.as_ref().and_then(|re| re.captures(line)) {
            let name = caps[1].to_string();
            if seen.insert(name.clone()) {
                records.push(UpdateRecord {
                    name,
                    current_version: Some(caps[2].to_string()),
                    latest_version: Some(caps[3].to_string()),
                });
            }
            continue;
        }

        let lower = line.to_lowercase();
        if !UPDATE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }
        for name in known_names {
            if !name.is_empty() && line.contains(name.as_str()) && seen.insert(name.clone()) {
                records.push(UpdateRecord::name_only(name.clone()));
            }
        }
    }

    debug!(count = records.len(), "parsed update output");
    records
}

fn strip_ansi(text: &str) -> std::borrow::Cow<'_, str> {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(text, ""),
        None => std::borrow::Cow::Borrowed(text),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn versioned_line() {
        let records = parse_update_output("my-skill: 1.0.0 -> 1.1.0", &[]);
        assert_eq!(records, vec![UpdateRecord {
            name: "my-skill".into(),
            current_version: Some("1.0.0".into()),
            latest_version: Some("1.1.0".into()),
        }]);
    }

    #[test]
    fn fat_arrow_and_prerelease_suffix() {
        let records = parse_update_output("pdf: 2.0.0-beta.1 => 2.0.0", &[]);
        assert_eq!(records[0].current_version.as_deref(), Some("2.0.0-beta.1"));
        assert_eq!(records[0].latest_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn keyword_fallback_uses_known_names() {
        let records = parse_update_output(
            "Note: an update is available for my-skill",
            &names(&["my-skill", "other"]),
        );
        assert_eq!(records, vec![UpdateRecord::name_only("my-skill")]);
    }

    #[test]
    fn fallback_is_case_insensitive_and_needs_a_keyword() {
        let known = names(&["docx"]);
        assert_eq!(parse_update_output("docx is OUTDATED", &known).len(), 1);
        assert_eq!(parse_update_output("New Version of docx", &known).len(), 1);
        assert!(parse_update_output("docx is fine", &known).is_empty());
    }

    #[test]
    fn versioned_line_skips_fallback() {
        // "update" appears, but the precise match already consumed the line.
        let records = parse_update_output("update-helper: 1.0 -> 2.0", &names(&["helper"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "update-helper");
    }

    #[test]
    fn first_occurrence_wins() {
        let text = "pdf: 1.0.0 -> 1.1.0\nupdate available: pdf\npdf: 1.0.0 -> 9.9.9\n";
        let records = parse_update_output(text, &names(&["pdf"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latest_version.as_deref(), Some("1.1.0"));
    }

    #[test]
    fn records_follow_line_order() {
        let text = "zeta: 1 -> 2\nalpha has an update\nmid: 0.1 -> 0.2";
        let records = parse_update_output(text, &names(&["alpha"]));
        let order: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn substring_names_can_false_positive() {
        let records = parse_update_output("update available: pdf-tools", &names(&["pdf", "pdf-tools"]));
        let got: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(got, vec!["pdf", "pdf-tools"]);
    }

    #[test]
    fn colour_codes_are_ignored() {
        let text = "\u{1b}[32mmy-skill\u{1b}[0m: 1.0.0 -> 1.2.0";
        let records = parse_update_output(text, &[]);
        assert_eq!(records[0].name, "my-skill");
    }

    #[test]
    fn empty_or_unrelated_input() {
        assert!(parse_update_output("", &names(&["a"])).is_empty());
        assert!(parse_update_output("All skills are up to date?\n", &[]).is_empty());
        assert!(parse_update_output("random noise\n\n", &names(&["a"])).is_empty());
    }
}
