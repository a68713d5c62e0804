//! JSON lookup table.

use crate::{proto_stem, EmitError, Emitter};
use protoc_authz_core::{AuthzRule, OutputFormat};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Serialize)]
struct Table<'a> {
    source: &'a str,
    rules: BTreeMap<String, Entry<'a>>,
}

#[derive(Serialize)]
struct Entry<'a> {
    permissions: &'a [String],
    no_auth_required: bool,
}

/// Emits `{"source": ..., "rules": {"<path>|<METHOD>": {...}}}`.
///
/// Keys are sorted. When two rules share a key the later one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl JsonEmitter {
    /// Creates a new emitter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for JsonEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn file_name(&self, proto_file: &str) -> String {
        format!("{}.authz.json", proto_stem(proto_file))
    }

    fn render(&self, proto_file: &str, rules: &[AuthzRule]) -> Result<String, EmitError> {
        let mut table = Table {
            source: proto_file,
            rules: BTreeMap::new(),
        };

        for rule in rules {
            let key = rule.lookup_key();
            let entry = Entry {
                permissions: &rule.permissions,
                no_auth_required: rule.no_auth_required,
            };
            if table.rules.insert(key.clone(), entry).is_some() {
                warn!("{proto_file}: duplicate rule for {key}, keeping the last one");
            }
        }

        let mut out = serde_json::to_string_pretty(&table)?;
        out.push('\n');
        Ok(out)
    }
}
