//! Model code to market name lookup.
//!
//! The catalog is computed once: entries from an optional user file are
//! folded over the built-in table. File entries replace or add names; they
//! never remove a built-in code.

mod builtin;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use builtin::DEFAULT_MODELS;

#[derive(Debug)]
pub enum ModelCatalogError {
    Read {
        path: PathBuf,
        error: std::io::Error,
    },
    Json {
        path: PathBuf,
        error: serde_json::Error,
    },
}

impl std::fmt::Display for ModelCatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelCatalogError::Read { path, error } => {
                write!(f, "failed to read model database {}: {error}", path.display())
            }
            ModelCatalogError::Json { path, error } => {
                write!(f, "failed to parse model database {}: {error}", path.display())
            }
        }
    }
}

impl std::error::Error for ModelCatalogError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: BTreeMap<String, String>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelCatalog {
    pub fn builtin() -> Self {
        let entries = DEFAULT_MODELS
            .iter()
            .map(|(code, name)| ((*code).to_owned(), (*name).to_owned()))
            .collect();
        Self { entries }
    }

    pub fn with_overlay<I>(self, overlay: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries = overlay
            .into_iter()
            .fold(self.entries, |mut entries, (code, name)| {
                entries.insert(code, name);
                entries
            });
        Self { entries }
    }

    /// Built-in table merged with `path`, when given and present.
    ///
    /// Files ending in `.json` hold one object of code/name strings; anything
    /// else uses the `code = name` line format.
    pub fn load(path: Option<&Path>) -> Result<Self, ModelCatalogError> {
        let catalog = Self::builtin();
        let Some(path) = path else {
            return Ok(catalog);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "model database file absent; using built-in names");
            return Ok(catalog);
        }
        let text = fs::read_to_string(path).map_err(|error| ModelCatalogError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        let overlay = if path.extension().is_some_and(|ext| ext == "json") {
            parse_overlay_json(&text).map_err(|error| ModelCatalogError::Json {
                path: path.to_path_buf(),
                error,
            })?
        } else {
            parse_overlay_text(&text)
        };
        tracing::info!(path = %path.display(), entries = overlay.len(), "loaded model names");
        Ok(catalog.with_overlay(overlay))
    }

    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// `Name (code)` when the code is known, else the bare code.
    pub fn display_name(&self, code: &str) -> String {
        match self.lookup(code) {
            Some(name) if !name.is_empty() => format!("{name} ({code})"),
            _ => code.to_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Editable `code = name` form, sorted by code.
    pub fn to_editable_text(&self) -> String {
        let mut text = String::from("# Model Database\n# Format: model_code = Market Name\n\n");
        for (code, name) in self.iter() {
            text.push_str(code);
            text.push_str(" = ");
            text.push_str(name);
            text.push('\n');
        }
        text
    }
}

/// Recovers the model code from the last `(...)` group of a `Name (code)`
/// label; other text is returned trimmed.
pub fn extract_code(label: &str) -> &str {
    let label = label.trim();
    if let Some((_, rest)) = label.rsplit_once('(') {
        if let Some((code, _)) = rest.split_once(')') {
            return code.trim();
        }
    }
    label
}

pub fn parse_overlay_text(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (code, name) = line.split_once('=')?;
            let (code, name) = (code.trim(), name.trim());
            if code.is_empty() || name.is_empty() {
                return None;
            }
            Some((code.to_owned(), name.to_owned()))
        })
        .collect()
}

pub fn parse_overlay_json(text: &str) -> Result<Vec<(String, String)>, serde_json::Error> {
    let parsed: BTreeMap<String, String> = serde_json::from_str(text)?;
    Ok(parsed.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let root = std::env::temp_dir().join(format!("config-search-models-{ts}"));
        fs::create_dir_all(&root).expect("mkdir");
        let path = root.join(name);
        fs::write(&path, contents).expect("write overlay");
        path
    }

    #[test]
    fn builtin_table_resolves_known_codes() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.lookup("akita"), Some("Pixel 8a"));
        assert_eq!(catalog.display_name("a01q"), "Galaxy A01 (a01q)");
        assert_eq!(catalog.display_name("unknown-code"), "unknown-code");
        assert_eq!(catalog.len(), DEFAULT_MODELS.len());
    }

    #[test]
    fn overlay_text_skips_comments_blank_and_malformed_lines() {
        let parsed = parse_overlay_text(
            "# Model Database\n\n a01q = Galaxy A01 Custom \nbogus line\n= no code\nx1 =\nnew1 = New Phone = v2\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("a01q".to_owned(), "Galaxy A01 Custom".to_owned()),
                ("new1".to_owned(), "New Phone = v2".to_owned()),
            ]
        );
    }

    #[test]
    fn overlay_overrides_and_adds_without_deleting_builtins() {
        let catalog = ModelCatalog::builtin().with_overlay(vec![
            ("akita".to_owned(), "Pixel 8a (custom)".to_owned()),
            ("newcode".to_owned(), "Brand New".to_owned()),
        ]);
        assert_eq!(catalog.lookup("akita"), Some("Pixel 8a (custom)"));
        assert_eq!(catalog.lookup("newcode"), Some("Brand New"));
        assert_eq!(catalog.lookup("shiba"), Some("Pixel 8"));
        assert_eq!(catalog.len(), DEFAULT_MODELS.len() + 1);
    }

    #[test]
    fn load_reads_line_and_json_formats() {
        let text = temp_file("models.txt", "shiba = Pixel Eight\n");
        let catalog = ModelCatalog::load(Some(&text)).expect("load text");
        assert_eq!(catalog.lookup("shiba"), Some("Pixel Eight"));

        let json = temp_file("model_database.json", r#"{"zz1": "Phone Z"}"#);
        let catalog = ModelCatalog::load(Some(&json)).expect("load json");
        assert_eq!(catalog.lookup("zz1"), Some("Phone Z"));
        assert_eq!(catalog.lookup("akita"), Some("Pixel 8a"));
    }

    #[test]
    fn load_falls_back_to_builtin_when_file_is_absent() {
        let catalog = ModelCatalog::load(Some(Path::new("/no/such/model_database.json")))
            .expect("absent file is fine");
        assert_eq!(catalog, ModelCatalog::builtin());
    }

    #[test]
    fn invalid_json_is_reported() {
        let json = temp_file("broken.json", "{not json");
        let error = ModelCatalog::load(Some(&json)).expect_err("invalid json");
        assert!(error.to_string().contains("failed to parse model database"));
    }

    #[test]
    fn extract_code_reads_parenthesised_code() {
        assert_eq!(extract_code("Galaxy A01 (a01q)"), "a01q");
        assert_eq!(extract_code("  a01q "), "a01q");
        assert_eq!(extract_code("Moto Edge 2021 (XT-2141) (berlna)"), "berlna");
    }

    #[test]
    fn editable_text_round_trips_through_the_line_parser() {
        let catalog = ModelCatalog::builtin();
        let reparsed = ModelCatalog::builtin().with_overlay(parse_overlay_text(&catalog.to_editable_text()));
        assert_eq!(reparsed, catalog);
    }
}
