//! Low-level splitting for grouped conditions and list values.
//!
//! Commas nested inside `( )`, `{ }` or a double-quoted item never act as
//! separators, so `status.in.(a,b,c),total.gte.5` splits into two parts.

/// Characters that force a list item to be double-quoted.
const RESERVED: [char; 7] = [',', '(', ')', '{', '}', '"', '\\'];

/// Splits `input` on `separator` occurrences at nesting depth zero.
///
/// Returns borrowed slices; an empty input yields no parts.
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    if input.is_empty() {
        return parts;
    }

    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '(' | '{' if !in_quotes => depth += 1,
            ')' | '}' if !in_quotes => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 && !in_quotes => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Strips one pair of enclosing delimiters, if both are present.
pub fn strip_delimiters(input: &str, open: char, close: char) -> Option<&str> {
    input.strip_prefix(open)?.strip_suffix(close)
}

/// Parses the body of a list (without its brackets) into items.
///
/// Items wrapped in double quotes are unquoted, with `\` escaping the next
/// character. An empty body is an empty list.
pub fn parse_list(body: &str) -> Vec<String> {
    split_top_level(body, ',')
        .into_iter()
        .map(unquote_item)
        .collect()
}

/// Renders items as a bracketed list, quoting items that need it.
pub fn format_list(items: &[String], open: char, close: char) -> String {
    let mut out = String::with_capacity(2 + items.iter().map(|i| i.len() + 1).sum::<usize>());
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote_item(item));
    }
    out.push(close);
    out
}

/// Double-quotes an item if it is empty or contains reserved characters.
///
/// Range bounds inside a group go through this too, so a bound holding a
/// comma or parenthesis survives [`split_top_level`].
pub fn quote_item(item: &str) -> String {
    if !item.is_empty() && !item.contains(RESERVED) {
        return item.to_string();
    }

    let mut out = String::with_capacity(item.len() + 2);
    out.push('"');
    for c in item.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Removes surrounding double quotes and escapes from an item.
///
/// An item that is not wrapped in quotes is returned unchanged.
pub fn unquote_item(item: &str) -> String {
    let Some(inner) = item
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return item.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
