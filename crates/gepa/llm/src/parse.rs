//! Lenient readers for model replies.
//!
//! Models wrap JSON in prose or code fences and occasionally leave trailing
//! commas behind; these helpers recover what they can and report `None`
//! otherwise.
//!
//! Trailing commas are the only syntax repair. Single-quoted strings,
//! unquoted keys, comments and truncated objects are not repaired and read
//! as `None`, which the judge turns into a zero-score verdict.

use serde_json::Value;

const FENCE: &str = "```";
const LANGUAGE_TAGS: [&str; 3] = ["json", "python", "text"];

/// First JSON object that can be recovered from `reply`.
pub fn extract_json_object(reply: &str) -> Option<Value> {
    let trimmed = reply.trim();
    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }
    if let Some(block) = extract_fenced_block(trimmed) {
        if let Some(value) = parse_object(&block) {
            return Some(value);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(text: &str) -> Option<Value> {
    let parsed = serde_json::from_str::<Value>(text)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(&strip_trailing_commas(text)).ok())?;
    parsed.is_object().then_some(parsed)
}

/// Drop commas that directly precede a closing brace or bracket, outside
/// string literals.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Content of the first ```-fenced block, without a leading language tag.
pub fn extract_fenced_block(reply: &str) -> Option<String> {
    let mut parts = reply.split(FENCE);
    parts.next()?;
    let inner = parts.next()?;
    // An unterminated fence is not a block.
    parts.next()?;

    let inner = inner.trim();
    let inner = match inner.split_once('\n') {
        Some((first, rest)) if LANGUAGE_TAGS.contains(&first.trim()) => rest.trim(),
        None if LANGUAGE_TAGS.contains(&inner) => "",
        _ => inner,
    };
    Some(inner.to_string())
}

/// The fenced block when there is one, otherwise the whole trimmed reply.
pub fn extract_instruction(reply: &str) -> String {
    extract_fenced_block(reply).unwrap_or_else(|| reply.trim().to_string())
}
