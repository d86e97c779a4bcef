// crates/pixelrts-cli/src/io/fields.rs
//
// Content descriptors -> extension_fields.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::bail;

pub const KEY_TYPE: &str = "type";
pub const KEY_NAME: &str = "name";
pub const KEY_VERSION: &str = "version";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_SOURCE_NAME: &str = "source_name";

/// clap value parser for `--field key=value`.
pub fn parse_field(s: &str) -> anyhow::Result<(String, String)> {
    let Some((k, v)) = s.split_once('=') else {
        bail!("expected key=value, got {s:?}");
    };
    let k = k.trim();
    if k.is_empty() {
        bail!("empty key in {s:?}");
    }
    Ok((k.to_string(), v.to_string()))
}

#[derive(Debug, Default)]
pub struct Descriptors<'a> {
    pub content_type: Option<&'a str>,
    pub name: Option<&'a str>,
    pub version: Option<&'a str>,
    pub description: Option<&'a str>,
    pub extra: &'a [(String, String)],
}

/// Named descriptors win over `--field` entries with the same key.
pub fn extension_fields(input: &Path, d: &Descriptors<'_>) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = d.extra.iter().cloned().collect();
    if let Some(name) = input.file_name() {
        out.insert(KEY_SOURCE_NAME.to_string(), name.to_string_lossy().into_owned());
    }
    let named = [
        (KEY_TYPE, d.content_type),
        (KEY_NAME, d.name),
        (KEY_VERSION, d.version),
        (KEY_DESCRIPTION, d.description),
    ];
    for (k, v) in named {
        if let Some(v) = v {
            out.insert(k.to_string(), v.to_string());
        }
    }
    out
}
