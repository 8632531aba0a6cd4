//! `---`-delimited `key: value` frontmatter.

use std::collections::BTreeMap;
use std::fmt;

/// A coerced frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FrontmatterValue {
    /// `true`/`false` (any case) become booleans, all-digit values become
    /// integers, everything else stays text.
    pub fn coerce(raw: &str) -> Self {
        let lowered = raw.to_ascii_lowercase();
        if lowered == "true" || lowered == "false" {
            return FrontmatterValue::Bool(lowered == "true");
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return FrontmatterValue::Int(n);
            }
        }
        FrontmatterValue::Text(raw.to_string())
    }
}

impl fmt::Display for FrontmatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontmatterValue::Bool(b) => write!(f, "{b}"),
            FrontmatterValue::Int(n) => write!(f, "{n}"),
            FrontmatterValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    values: BTreeMap<String, FrontmatterValue>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.values.get(key)
    }

    /// Value rendered as text, whatever it was coerced to.
    pub fn text(&self, key: &str) -> Option<String> {
        self.values.get(key).map(ToString::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split leading frontmatter from the rest of the document.
///
/// Without an opening `---` line or without a closing one, the content is
/// returned unchanged and the frontmatter is empty.
pub fn parse_frontmatter(content: &str) -> (Frontmatter, String) {
    let lines: Vec<&str> = content.lines().collect();
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return (Frontmatter::default(), content.to_string());
    }

    let Some(end) = lines
        .iter()
        .skip(1)
        .position(|line| line.trim() == "---")
        .map(|offset| offset + 1)
    else {
        return (Frontmatter::default(), content.to_string());
    };

    let mut frontmatter = Frontmatter::default();
    for line in &lines[1..end] {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        frontmatter
            .values
            .insert(key.trim().to_string(), FrontmatterValue::coerce(value.trim()));
    }

    let remaining = lines[end + 1..].join("\n").trim().to_string();
    (frontmatter, remaining)
}
