#![deny(missing_docs)]

//! # Registry Key Sanitization
//!
//! Component names must match `^[A-Za-z0-9._-]+$`. Fully qualified generic
//! identities (`Contoso.Map<System.Int32,System.String>`) do not, so they are
//! escaped:
//!
//! - `A-Z a-z 0-9 . _` are kept verbatim.
//! - `-` is written as `--`.
//! - Anything else is written as `-`, its uppercase hex code point, `-`
//!   (`<` becomes `-3C-`).
//!
//! Every escape starts with `-` and is self-delimiting, so the mapping is
//! injective and `restore_key` can invert it.

use regex::Regex;
use std::sync::OnceLock;

const ESCAPE: char = '-';

fn is_verbatim(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

/// Converts a type identity into a legal schema-definition key.
pub fn sanitize_key(identity: &str) -> String {
    let mut key = String::with_capacity(identity.len());
    for c in identity.chars() {
        if is_verbatim(c) {
            key.push(c);
        } else if c == ESCAPE {
            key.push_str("--");
        } else {
            key.push_str(&format!("-{:X}-", c as u32));
        }
    }
    key
}

/// Inverts `sanitize_key`. Returns `None` for text it could not have produced.
pub fn restore_key(key: &str) -> Option<String> {
    let mut identity = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        if is_verbatim(c) {
            identity.push(c);
            continue;
        }
        if c != ESCAPE {
            return None;
        }
        if chars.peek() == Some(&ESCAPE) {
            chars.next();
            identity.push(ESCAPE);
            continue;
        }

        let mut hex = String::new();
        loop {
            match chars.next()? {
                ESCAPE => break,
                h if h.is_ascii_hexdigit() => hex.push(h),
                _ => return None,
            }
        }
        let code = u32::from_str_radix(&hex, 16).ok()?;
        let decoded = char::from_u32(code)?;
        if is_verbatim(decoded) || decoded == ESCAPE {
            return None;
        }
        identity.push(decoded);
    }

    Some(identity)
}

/// Whether `key` is a legal schema-definition identifier.
pub fn is_legal_key(key: &str) -> bool {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    let key_re = KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("Invalid regex"));
    key_re.is_match(key)
}
