//! Rust module with a static rule table.

use crate::{proto_stem, EmitError, Emitter};
use protoc_authz_core::{AuthzRule, OutputFormat};
use std::fmt::Write;

const PRELUDE: &str = r"/// Authorization requirements of one HTTP endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthzRule {
    /// Path template, e.g. `/v1/foo/{foo_id}`.
    pub path: &'static str,
    /// Uppercase HTTP verb.
    pub method: &'static str,
    /// Required permissions, in declaration order.
    pub permissions: &'static [&'static str],
    /// Whether the endpoint needs no authentication.
    pub no_auth_required: bool,
}
";

const LOOKUP: &str = r"
/// Returns the rule for `path` and `method`, if any.
///
/// When several rules share a key the last declared one wins.
#[must_use]
pub fn lookup(path: &str, method: &str) -> Option<&'static AuthzRule> {
    AUTHZ_RULES
        .iter()
        .rev()
        .find(|r| r.path == path && r.method == method)
}
";

/// Emits a self-contained Rust module.
///
/// String values are written with `{:?}`, which yields valid Rust literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustEmitter;

impl RustEmitter {
    /// Creates a new emitter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for RustEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Rust
    }

    fn file_name(&self, proto_file: &str) -> String {
        format!("{}_authz.rs", proto_stem(proto_file))
    }

    fn render(&self, proto_file: &str, rules: &[AuthzRule]) -> Result<String, EmitError> {
        let mut out = String::new();
        let _ = writeln!(out, "// Code generated by protoc-gen-authz. DO NOT EDIT.");
        let _ = writeln!(out, "// source: {proto_file}");
        let _ = writeln!(out);
        out.push_str(PRELUDE);
        let _ = writeln!(out);
        let _ = writeln!(out, "/// Rules in declaration order.");
        let _ = writeln!(out, "pub static AUTHZ_RULES: &[AuthzRule] = &[");

        for rule in rules {
            let permissions: Vec<String> =
                rule.permissions.iter().map(|p| format!("{p:?}")).collect();
            let _ = writeln!(out, "    AuthzRule {{");
            let _ = writeln!(out, "        path: {:?},", rule.http_path);
            let _ = writeln!(out, "        method: {:?},", rule.http_method.as_str());
            let _ = writeln!(out, "        permissions: &[{}],", permissions.join(", "));
            let _ = writeln!(out, "        no_auth_required: {},", rule.no_auth_required);
            let _ = writeln!(out, "    }},");
        }

        let _ = writeln!(out, "];");
        out.push_str(LOOKUP);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc_authz_core::{AuthzFields, HttpBinding, HttpMethod};

    fn render(rules: &[AuthzRule]) -> String {
        RustEmitter::new().render("foo/v1/foo.proto", rules).unwrap()
    }

    #[test]
    fn file_name_uses_snake_suffix() {
        assert_eq!(
            RustEmitter::new().file_name("foo/v1/foo.proto"),
            "foo/v1/foo_authz.rs"
        );
    }

    #[test]
    fn writes_one_entry_per_rule() {
        let rule = AuthzRule::new(
            HttpBinding {
                method: HttpMethod::Post,
                path: "/v1/test2/{foo_id}".into(),
            },
            AuthzFields::with_permissions(["read:all", "write:all"]),
        );
        let out = render(&[rule]);

        insta::assert_snapshot!(
            out.lines()
                .skip_while(|l| !l.starts_with("pub static"))
                .take_while(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            @r#"
pub static AUTHZ_RULES: &[AuthzRule] = &[
    AuthzRule {
        path: "/v1/test2/{foo_id}",
        method: "POST",
        permissions: &["read:all", "write:all"],
        no_auth_required: false,
    },
];
"#
        );
    }

    #[test]
    fn header_names_source() {
        let out = render(&[]);
        assert!(out.starts_with("// Code generated by protoc-gen-authz. DO NOT EDIT.\n"));
        assert!(out.contains("// source: foo/v1/foo.proto"));
        assert!(out.contains("pub static AUTHZ_RULES: &[AuthzRule] = &[\n];"));
        assert!(out.contains("pub fn lookup(path: &str, method: &str)"));
    }

    #[test]
    fn escapes_string_literals() {
        let rule = AuthzRule::new(
            HttpBinding {
                method: HttpMethod::Get,
                path: "/v1/\"quoted\"".into(),
            },
            AuthzFields::with_permissions(["back\\slash"]),
        );
        let out = render(&[rule]);
        assert!(out.contains(r#"path: "/v1/\"quoted\"","#));
        assert!(out.contains(r#"permissions: &["back\\slash"],"#));
    }
}
