//! Line-oriented `key=value` text format, as written by `java.util.Properties`

use crate::inject::Error;

/// One logical line of a properties file
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    /// Text following a `#` or `!` marker
    Comment(String),

    Entry { key: String, value: String },
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Does the line end in an unescaped backslash?
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw key and raw value
///
/// The key stops at the first unescaped `=`, `:`, or blank. Blanks around the separator are
/// skipped. Returns `None` when there is no separator at all.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    let mut key_end = None;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = Some(idx);
            break;
        }
    }

    let key_end = key_end?;
    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))?;
    Some((key, rest.trim_start_matches(is_blank)))
}

/// Resolve backslash escapes
fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("Malformed \\uxxxx escape '\\u{}'", hex))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => (),
        }
    }
    Ok(out)
}

/// Escape text so that it reads back as the same key or value
pub fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            c => out.push(c),
        }
    }
    out
}

/// Parse the logical lines of a properties file, paired with the (1-based) physical line number
/// each one starts on
///
/// Blank lines are skipped. Comments are only recognized at the start of a logical line.
pub fn parse(text: &str) -> Result<Vec<(usize, Line)>, Error> {
    let mut parsed = vec![];
    let mut physical = text.lines().enumerate();

    while let Some((idx, raw)) = physical.next() {
        let line_number = idx + 1;
        let line = raw.trim_start_matches(is_blank);
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#').or_else(|| line.strip_prefix('!')) {
            parsed.push((line_number, Line::Comment(comment.to_owned())));
            continue;
        }

        let mut logical = String::from(line);
        while continues(&logical) {
            logical.pop();
            match physical.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let format_error = |message: String| Error::Format {
            line: line_number,
            message,
        };
        let (key, value) = split_entry(&logical)
            .ok_or_else(|| format_error(String::from("Missing '=' separator")))?;
        let key = unescape(key).map_err(format_error)?;
        let value = unescape(value).map_err(format_error)?;
        parsed.push((line_number, Line::Entry { key, value }));
    }

    Ok(parsed)
}
