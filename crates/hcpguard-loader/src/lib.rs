//! Loading adapters: read config files and turn them into canonical documents.
//!
//! This crate is allowed to do filesystem IO. Everything downstream of a `CanonicalDocument`
//! lives in `hcpguard-domain` and is pure.

#![forbid(unsafe_code)]

mod defaults;
mod detect;
mod discover;
mod error;
mod format;

use camino::Utf8Path;
use hcpguard_domain::{CanonicalDocument, Format};
use hcpguard_types::{TargetPath, Value};
use tracing::debug;

pub use defaults::apply_product_defaults;
pub use detect::detect_product;
pub use discover::{discover_configs, is_config_path};
pub use error::LoadError;
pub use format::{FormatParser, HclParser, JsonParser, SNIFF_ORDER, TomlParser, YamlParser, parser_for};

/// Parse raw bytes into a document.
///
/// The format comes from `hint`, else from the target's extension, else from content sniffing
/// (first format in [`SNIFF_ORDER`] that yields a map root).
pub fn load_bytes(
    bytes: &[u8],
    source: TargetPath,
    hint: Option<Format>,
) -> Result<CanonicalDocument, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|err| LoadError::Parse {
        format: hint,
        message: format!("input is not valid UTF-8: {err}"),
        location: Some(hcpguard_types::SourceLocation {
            line: None,
            column: None,
            offset: Some(err.valid_up_to()),
        }),
    })?;

    let known = hint.or_else(|| source.extension().as_deref().and_then(Format::from_extension));

    let (format, root) = match known {
        Some(format) => {
            let root = parser_for(format).parse(text)?;
            if !matches!(root, Value::Map(_)) {
                return Err(LoadError::UnsupportedFormat {
                    reason: format!("{format} root is a {}, expected a map", root.type_name()),
                });
            }
            (format, root)
        }
        None => sniff(text)?,
    };

    debug!(path = %source, format = %format, "document loaded");
    Ok(CanonicalDocument::new(root, source, format))
}

/// Read `path` from disk and parse it; the document is reported under `path`.
pub fn load_file(path: &Utf8Path, hint: Option<Format>) -> Result<CanonicalDocument, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(&bytes, TargetPath::from(path), hint)
}

fn sniff(text: &str) -> Result<(Format, Value), LoadError> {
    for format in SNIFF_ORDER {
        if let Ok(root @ Value::Map(_)) = parser_for(format).parse(text) {
            debug!(format = %format, "format detected from content");
            return Ok((format, root));
        }
    }
    Err(LoadError::UnsupportedFormat {
        reason: "content is not a map in any of json, hcl, toml, yaml".to_string(),
    })
}
