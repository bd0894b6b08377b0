use std::collections::BTreeMap;

use {
    anyhow::{Context, bail},
    serde::Deserialize,
};

/// Validate a skill name: lowercase ASCII, digits, hyphens, 1-64 chars.
pub fn validate_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
}

/// Everything a `SKILL.md` declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillManifest {
    pub name: String,
    pub description: String,
    pub license: Option<String>,
    pub compatibility: Option<String>,
    pub allowed_tools: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Deserialize, Default)]
struct Frontmatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    compatibility: Option<String>,
    #[serde(default, rename = "allowed-tools", alias = "allowed_tools")]
    allowed_tools: Option<serde_yaml::Value>,
    #[serde(default)]
    metadata: Option<BTreeMap<String, serde_yaml::Value>>,
}

/// Parse a SKILL.md file.
///
/// `fallback_name` (normally the skill directory name) is used when the
/// frontmatter has no `name`. Third-party skills are not held to
/// [`validate_name`]; anything with well-formed frontmatter is accepted.
pub fn parse_manifest(content: &str, fallback_name: &str) -> anyhow::Result<SkillManifest> {
    let (frontmatter, body) = split_frontmatter(content)?;
    let fm: Frontmatter = if frontmatter.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(&frontmatter).context("invalid SKILL.md frontmatter")?
    };

    let name = fm
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| fallback_name.to_string());
    if name.is_empty() {
        bail!("SKILL.md has no name and no directory name to fall back on");
    }

    Ok(SkillManifest {
        name,
        description: fm.description.unwrap_or_default(),
        license: fm.license,
        compatibility: fm.compatibility,
        allowed_tools: fm.allowed_tools.and_then(render_allowed_tools),
        metadata: fm
            .metadata
            .map(|m| m.into_iter().map(|(k, v)| (k, flatten_value(v))).collect())
            .unwrap_or_default(),
        body,
    })
}

/// `allowed-tools` is a space-delimited string in the standard, but plenty of
/// skills in the wild write a YAML list.
fn render_allowed_tools(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::Sequence(items) => {
            let joined = items
                .into_iter()
                .map(flatten_value)
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        },
        other => Some(flatten_value(other)),
    }
}

fn flatten_value(value: serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_json::to_string(&other).unwrap_or_default(),
    }
}

/// Split SKILL.md content at `---` delimiters into (frontmatter, body).
pub fn split_frontmatter(content: &str) -> anyhow::Result<(String, String)> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("---") {
        bail!("SKILL.md must start with YAML frontmatter delimited by ---");
    }

    // Skip the opening ---
    let after_open = &trimmed[3..];
    let close_pos = after_open
        .find("\n---")
        .context("SKILL.md missing closing --- for frontmatter")?;

    let frontmatter = after_open[..close_pos].trim().to_string();
    let body = after_open[close_pos + 4..]
        .trim_start_matches(['-'])
        .trim_start_matches(['\r', '\n'])
        .to_string();
    Ok((frontmatter, body))
}
