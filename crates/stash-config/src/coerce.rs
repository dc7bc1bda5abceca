//! Coercion of lax legacy-INI scalars into typed TOML values.
//!
//! Legacy config files store everything as bare strings. Migration runs
//! each raw value through a fixed ladder: boolean literal, integer,
//! float, Python-style literal structure (quoted string, list, tuple),
//! JSON, and finally the original string unchanged. The ladder never
//! fails; an ambiguous value simply stays a string.

/// Coerce one raw legacy value. First rung of the ladder that succeeds
/// wins.
pub fn coerce(raw: &str) -> toml::Value {
    let trimmed = raw.trim();

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => return toml::Value::Boolean(true),
        "false" | "no" | "0" => return toml::Value::Boolean(false),
        _ => {}
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return toml::Value::Integer(int);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if trimmed.contains('.') {
            return toml::Value::Float(float);
        }
    }

    if let Some(value) = parse_literal(trimmed) {
        return value;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(value) = json_to_toml(json) {
            return value;
        }
    }

    toml::Value::String(trimmed.to_string())
}

/// Parse a Python-style literal: a quoted string, or a list/tuple of
/// literals. Anything else returns `None`.
fn parse_literal(raw: &str) -> Option<toml::Value> {
    if let Some(inner) = strip_quotes(raw) {
        return Some(toml::Value::String(inner.to_string()));
    }

    let inner = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .or_else(|| raw.strip_prefix('(').and_then(|r| r.strip_suffix(')')))?;

    let mut items = Vec::new();
    for element in split_top_level(inner) {
        let element = element.trim();
        if element.is_empty() {
            continue;
        }
        items.push(coerce_element(element));
    }
    Some(toml::Value::Array(items))
}

/// Coerce one element inside a literal structure. Unlike the top-level
/// ladder, `1`/`0`/`yes`/`no` here are NOT booleans: only the spelled-out
/// literals are, matching how a strict literal parse reads them.
fn coerce_element(raw: &str) -> toml::Value {
    if let Some(inner) = strip_quotes(raw) {
        return toml::Value::String(inner.to_string());
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => return toml::Value::Boolean(true),
        "false" => return toml::Value::Boolean(false),
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return toml::Value::Integer(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if raw.contains('.') {
            return toml::Value::Float(float);
        }
    }
    if let Some(nested) = parse_literal(raw) {
        return nested;
    }
    toml::Value::String(raw.to_string())
}

fn strip_quotes(raw: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            // reject strings like 'a', 'b' that merely start and end quoted
            if !inner.contains(quote) {
                return Some(inner);
            }
        }
    }
    None
}

/// Split on commas that are not nested inside quotes or brackets.
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (idx, ch) in raw.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&raw[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

fn json_to_toml(json: serde_json::Value) -> Option<toml::Value> {
    match json {
        // TOML has no null; let the caller fall back to a plain string
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(toml::Value::Boolean(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(toml::Value::Integer(i))
            } else {
                n.as_f64().map(toml::Value::Float)
            }
        }
        serde_json::Value::String(s) => Some(toml::Value::String(s)),
        serde_json::Value::Array(items) => {
            let converted: Option<Vec<_>> = items.into_iter().map(json_to_toml).collect();
            converted.map(toml::Value::Array)
        }
        serde_json::Value::Object(map) => {
            let mut table = toml::map::Map::new();
            for (key, value) in map {
                table.insert(key, json_to_toml(value)?);
            }
            Some(toml::Value::Table(table))
        }
    }
}
