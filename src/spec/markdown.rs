//! Structural extraction from descriptor markdown: title, description,
//! level-2 sections and list items. Nothing here renders markdown.

/// First `# ` heading and the content after it.
///
/// When no heading exists the title is empty and the content is returned
/// trimmed.
pub fn extract_title(content: &str) -> (String, String) {
    let lines: Vec<&str> = content.lines().collect();
    let mut title = String::new();
    let mut start = 0;
    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("# ") {
            title = rest.trim().to_string();
            start = i + 1;
            break;
        }
    }
    let remaining = lines[start..].join("\n").trim().to_string();
    (title, remaining)
}

/// Text preceding the first `## ` heading.
pub fn extract_description(content: &str) -> String {
    content
        .lines()
        .take_while(|line| !line.trim().starts_with("## "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Body of the `## <heading>` section (case-insensitive prefix match), up to
/// the next level-2 heading. Empty when the section is absent.
pub fn extract_section(content: &str, heading: &str) -> String {
    let marker = format!("## {}", heading.to_lowercase());
    let mut section = Vec::new();
    let mut in_section = false;

    for line in content.lines() {
        if line.trim().to_lowercase().starts_with(&marker) {
            in_section = true;
            continue;
        }
        if in_section && line.trim().starts_with("## ") {
            break;
        }
        if in_section {
            section.push(line);
        }
    }

    section.join("\n").trim().to_string()
}

/// Items of `- item` and `N. item` lists, in order.
pub fn extract_list_items(section: &str) -> Vec<String> {
    section
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if let Some(item) = line.strip_prefix("- ") {
                return Some(item.trim().to_string());
            }
            strip_ordinal(line).map(|item| item.trim().to_string())
        })
        .collect()
}

/// `"12.  text"` -> `"text"`; requires digits, a dot and whitespace.
fn strip_ordinal(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

/// `user-login-flow` -> `User Login Flow`.
pub fn title_from_stem(stem: &str) -> String {
    let spaced = stem.replace('-', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_alpha = false;
    for ch in spaced.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
