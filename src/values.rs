//! Values file editing.
//!
//! A values file is a YAML document owned by the deployment repository. Only
//! `image.tag` is read and written; the rest of the document is carried
//! through `serde_yaml::Value` untouched, although its formatting and comments
//! are whatever `serde_yaml` emits on the way back out.

use std::fs;
use std::path::Path;

use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::tag::next_tag;

/// The tag before and after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChange {
    pub previous: String,
    pub next: String,
}

/// Advance `image.tag` in the values file at `path` and write the file back.
pub fn advance_image_tag(path: &Path) -> Result<TagChange> {
    let content = fs::read_to_string(path)?;
    let mut document: YamlValue = serde_yaml::from_str(&content)?;

    let tag = document
        .get_mut("image")
        .and_then(|image| image.get_mut("tag"))
        .ok_or_else(|| missing_tag(path))?;

    let previous = tag_text(path, tag)?;
    let next = next_tag(&previous).to_string();
    *tag = YamlValue::String(next.clone());

    fs::write(path, serde_yaml::to_string(&document)?)?;

    Ok(TagChange { previous, next })
}

fn missing_tag(path: &Path) -> Error {
    Error::ValuesFile {
        path: path.display().to_string(),
        message: "missing 'image.tag'".to_string(),
    }
}

/// Textual form of a tag scalar. YAML reads an unquoted `0.1` as a number, and
/// a number keeps only its value: unquoted `0.10` reads as `0.1`.
fn tag_text(path: &Path, tag: &YamlValue) -> Result<String> {
    match tag {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        other => Err(Error::ValuesFile {
            path: path.display().to_string(),
            message: format!("'image.tag' must be a string, found {:?}", other),
        }),
    }
}
