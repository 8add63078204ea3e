//! `${...}` placeholder resolution.
//!
//! Placeholders are resolved recursively against the full property
//! source chain. `${key}` substitutes the resolved value of `key`;
//! `${key:default}` substitutes the default literal when `key` is
//! absent. The default clause may itself contain placeholders
//! (`${a:${b}}`). Cycle detection threads a visited-key list through
//! the recursion; the list doubles as the diagnostic chain.

use crate::env::Environment;
use crate::error::{Result, StrataError};

const PREFIX: &str = "${";
const SUFFIX: char = '}';

/// Resolves every placeholder inside `value`.
///
/// `key` is the property whose value is being scanned, used for error
/// context. `visited` holds the keys currently being resolved, top of
/// the recursion first.
pub(crate) fn resolve(
    env: &Environment,
    key: &str,
    value: &str,
    visited: &mut Vec<String>,
) -> Result<String> {
    let mut output = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(PREFIX) {
        output.push_str(&rest[..start]);
        let after_prefix = &rest[start + PREFIX.len()..];

        match find_closing_brace(after_prefix) {
            None => {
                // Unterminated token: kept literal rather than guessed at.
                output.push_str(&rest[start..]);
                rest = "";
                break;
            },
            Some(end) => {
                let token = &after_prefix[..end];
                output.push_str(&resolve_token(env, key, token, visited)?);
                rest = &after_prefix[end + 1..];
            },
        }
    }

    output.push_str(rest);
    Ok(output)
}

/// Resolves one `key` or `key:default` token (braces stripped).
fn resolve_token(
    env: &Environment,
    key: &str,
    token: &str,
    visited: &mut Vec<String>,
) -> Result<String> {
    let (target, default) = split_default(token);

    if visited.iter().any(|k| k == target) {
        return Err(StrataError::circular_reference(target, visited));
    }

    match env.get_raw(target) {
        Some(tracked) => {
            visited.push(target.to_string());
            let resolved = resolve(env, target, &tracked.render(), visited)?;
            visited.pop();
            Ok(resolved)
        },
        None => match default {
            Some(default) => resolve(env, key, default, visited),
            None => Err(StrataError::unresolved_placeholder(target, key)),
        },
    }
}

/// Returns the byte offset of the `}` closing the token that starts
/// right after a `${`, accounting for nested `${...}` in the default
/// clause.
fn find_closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            depth += 1;
            i += PREFIX.len();
            continue;
        }
        if bytes[i] == SUFFIX as u8 {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
        i += 1;
    }

    None
}

/// Splits `key:default` at the first separator outside any nested
/// placeholder. Returns `(key, None)` when no default clause exists.
fn split_default(token: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let bytes = token.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            depth += 1;
            i += PREFIX.len();
            continue;
        }
        match bytes[i] {
            b'}' if depth > 0 => depth -= 1,
            b':' if depth == 0 => return (&token[..i], Some(&token[i + 1..])),
            _ => {},
        }
        i += 1;
    }

    (token, None)
}
