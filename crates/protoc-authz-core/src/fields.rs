//! Field parsers for the contents of an authz block.

use crate::error::ExtractError;
use crate::types::AuthzFields;
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PERMISSIONS_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpermissions\s*:\s*\[").expect("permissions regex is valid"));

#[allow(clippy::expect_used)]
static NO_AUTH_REQUIRED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bno_auth_required\s*:\s*(true|false)\b").expect("no_auth_required regex is valid")
});

/// Parses both fields out of a comment-free authz block.
///
/// # Errors
///
/// Returns [`ExtractError::PermissionsParse`] if the permissions list is
/// opened but never closed.
pub fn parse_authz_fields(block: &str) -> Result<AuthzFields, ExtractError> {
    Ok(AuthzFields {
        permissions: parse_permissions(block)?,
        no_auth_required: parse_no_auth_required(block),
    })
}

/// Parses `permissions: [ ... ]`.
///
/// A missing key yields an empty list. Elements are split on commas with
/// surrounding whitespace and quotes (`"` or `'`) removed; empty elements are
/// dropped and declaration order is kept. The list may span several lines.
///
/// # Errors
///
/// Returns [`ExtractError::PermissionsParse`] if there is no closing `]`.
pub fn parse_permissions(block: &str) -> Result<Vec<String>, ExtractError> {
    let Some(open) = PERMISSIONS_OPEN.find(block) else {
        return Ok(Vec::new());
    };

    let rest = &block[open.end()..];
    let close = rest.find(']').ok_or_else(|| ExtractError::PermissionsParse {
        message: "permissions list has no closing `]`".to_string(),
    })?;

    Ok(split_permissions(&rest[..close]))
}

fn split_permissions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|item| item.trim().trim_matches('"').trim_matches('\''))
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Parses `no_auth_required: true|false`, defaulting to `false`.
#[must_use]
pub fn parse_no_auth_required(block: &str) -> bool {
    NO_AUTH_REQUIRED
        .captures(block)
        .is_some_and(|caps| &caps[1] == "true")
}
