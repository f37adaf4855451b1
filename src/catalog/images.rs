//! Decoding of the bracketed image-list encoding used in catalog sources.
//!
//! Sources store image references as a list literal, e.g.
//! `['https://a/1.jpg', "https://a/2.jpg"]`. Decoding is strict here; the
//! catalog falls back to an empty list when this returns `None`.

/// Cell values spreadsheet exports emit for a missing list.
const MISSING_TOKENS: [&str; 4] = ["", "nan", "none", "null"];

/// Decode an image-list literal.
///
/// Returns `Some(vec![])` for empty or missing-value cells and `None` when the
/// value is not a well-formed list of quoted strings.
pub fn decode_image_list(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if MISSING_TOKENS
        .iter()
        .any(|t| trimmed.eq_ignore_ascii_case(t))
    {
        return Some(Vec::new());
    }

    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    let mut out = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        skip_whitespace(&mut chars);
        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };

        let mut value = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => value.push(chars.next()?),
                c if c == quote => {
                    closed = true;
                    break;
                }
                c => value.push(c),
            }
        }
        if !closed {
            return None;
        }
        let value = value.trim();
        if !value.is_empty() {
            out.push(value.to_string());
        }

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(out)
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_and_double_quoted_entries() {
        let list = decode_image_list(r#"[ 'https://x/1.jpg', "https://x/2.jpg" ]"#).unwrap();
        assert_eq!(list, vec!["https://x/1.jpg", "https://x/2.jpg"]);
    }

    #[test]
    fn empty_list_and_missing_tokens_decode_to_empty() {
        assert_eq!(decode_image_list("[]"), Some(vec![]));
        assert_eq!(decode_image_list("[ ]"), Some(vec![]));
        assert_eq!(decode_image_list(""), Some(vec![]));
        assert_eq!(decode_image_list("NaN"), Some(vec![]));
    }

    #[test]
    fn commas_inside_quotes_are_kept() {
        let list = decode_image_list("['a,b.jpg', 'c.jpg',]").unwrap();
        assert_eq!(list, vec!["a,b.jpg", "c.jpg"]);
    }

    #[test]
    fn malformed_lists_are_rejected() {
        assert_eq!(decode_image_list("https://x/1.jpg"), None);
        assert_eq!(decode_image_list("['unterminated]"), None);
        assert_eq!(decode_image_list("[bare, words]"), None);
        assert_eq!(decode_image_list("['a' 'b']"), None);
    }
}
