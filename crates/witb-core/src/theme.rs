//! Theme catalog loading.
//!
//! A theme is a named word list (`animals` → `cat`, `dog`, …). Themes are
//! read from CSV resources named `alias_<theme>.csv`, one per theme, each
//! with an `Alias` header column. The resulting [`Catalog`] is immutable:
//! construct it once at startup and share it by reference.
//!
//! Word lists are sorted alphabetically so that allocation scans are
//! reproducible across runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::AliasError;

const THEME_PREFIX: &str = "alias_";
const ALIAS_COLUMN: &str = "Alias";

/// Strip the reserved `alias_` token and lower-case.
pub fn normalize_theme_name(stem: &str) -> String {
    stem.replace(THEME_PREFIX, "").to_lowercase()
}

/// A named, alphabetically sorted list of candidate words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub words: Vec<String>,
}

/// Theme name → word list, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    themes: Vec<Theme>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from `(theme, words)` pairs.
    ///
    /// Names are normalized and words lower-cased and sorted. Pairs that
    /// normalize to the same name are merged. Empty word lists are kept.
    pub fn from_themes<I, N, W, S>(themes: I) -> Self
    where
        I: IntoIterator<Item = (N, W)>,
        N: AsRef<str>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Catalog::default();
        for (name, words) in themes {
            let slot = catalog.slot(&normalize_theme_name(name.as_ref()));
            slot.extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        }
        catalog.sort_words();
        catalog
    }

    fn slot(&mut self, name: &str) -> &mut Vec<String> {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.themes.push(Theme {
                    name: name.to_string(),
                    words: Vec::new(),
                });
                self.index.insert(name.to_string(), self.themes.len() - 1);
                self.themes.len() - 1
            }
        };
        &mut self.themes[idx].words
    }

    fn sort_words(&mut self) {
        for theme in &mut self.themes {
            theme.words.sort();
        }
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.index.get(name).map(|&idx| &self.themes[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Themes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    /// Theme names in alphabetical order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every `(shorter, longer)` pair where `shorter` is a literal prefix of
    /// `longer`. Prefix-based theme resolution cannot tell such themes apart.
    pub fn prefix_conflicts(&self) -> Vec<(String, String)> {
        let names = self.sorted_names();
        let mut conflicts = Vec::new();
        for (i, short) in names.iter().enumerate() {
            for long in &names[i + 1..] {
                if long.starts_with(short) {
                    conflicts.push((short.to_string(), long.to_string()));
                }
            }
        }
        conflicts
    }
}

/// Load every `*.csv` theme resource directly inside `dir`.
///
/// Files are visited in file-name order. A source that yields no words
/// contributes no theme.
pub fn load_aliases(dir: &Path) -> Result<Catalog, AliasError> {
    if !dir.exists() {
        return Err(AliasError::ResourceNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut catalog = Catalog::default();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            AliasError::Io {
                path,
                source: e.into(),
            }
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv")
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let theme = normalize_theme_name(stem);
        let words = read_theme_source(path)?;
        debug!(theme = %theme, words = words.len(), path = %path.display(), "loaded theme source");
        if words.is_empty() {
            continue;
        }
        catalog.slot(&theme).extend(words);
    }

    catalog.sort_words();

    for (short, long) in catalog.prefix_conflicts() {
        warn!(
            "theme '{}' is a prefix of theme '{}'; box theme resolution may misattribute aliases",
            short, long
        );
    }

    Ok(catalog)
}

fn read_theme_source(path: &Path) -> Result<Vec<String>, AliasError> {
    let content = std::fs::read_to_string(path).map_err(|source| AliasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_theme_csv(&content).map_err(|reason| AliasError::MalformedThemeSource {
        path: PathBuf::from(path),
        reason,
    })
}

/// Extract the lower-cased, non-empty `Alias` column of a CSV document.
fn parse_theme_csv(content: &str) -> Result<Vec<String>, String> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(h) => split_csv_record(h.trim_start_matches('\u{feff}')),
        None => return Ok(Vec::new()),
    };
    let column = header
        .iter()
        .position(|h| h.trim() == ALIAS_COLUMN)
        .ok_or_else(|| format!("missing '{}' column", ALIAS_COLUMN))?;

    Ok(lines
        .filter_map(|line| {
            let fields = split_csv_record(line);
            let value = fields.get(column)?.trim();
            (!value.is_empty()).then(|| value.to_lowercase())
        })
        .collect())
}

/// Split one CSV record. Double-quoted fields may contain commas and `""`
/// escapes. Quoted fields spanning lines are not supported.
fn split_csv_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_theme_name() {
        assert_eq!(normalize_theme_name("alias_Animals"), "animals");
        assert_eq!(normalize_theme_name("COLORS"), "colors");
        assert_eq!(normalize_theme_name("alias_sea_alias_life"), "sea_life");
    }

    #[test]
    fn test_split_csv_record_quotes() {
        assert_eq!(split_csv_record("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_csv_record(r#""Smith, John",x"#),
            vec!["Smith, John", "x"]
        );
        assert_eq!(split_csv_record(r#""say ""hi""",1"#), vec![r#"say "hi""#, "1"]);
        assert_eq!(split_csv_record("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn test_parse_theme_csv_picks_alias_column() {
        let csv = "Category,Alias\nbig,Tiger\nsmall,\nsmall,Mouse\r\n\n";
        assert_eq!(parse_theme_csv(csv).unwrap(), vec!["tiger", "mouse"]);
    }

    #[test]
    fn test_parse_theme_csv_missing_column() {
        let err = parse_theme_csv("Name\ntiger\n").unwrap_err();
        assert!(err.contains("Alias"));
    }

    #[test]
    fn test_from_themes_sorts_and_merges() {
        let catalog = Catalog::from_themes([
            ("alias_Animals", vec!["Zebra", "cat"]),
            ("colors", vec!["red"]),
            ("ANIMALS", vec!["ant"]),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("animals").unwrap().words, vec!["ant", "cat", "zebra"]);
        assert_eq!(catalog.sorted_names(), vec!["animals", "colors"]);
    }

    #[test]
    fn test_from_themes_keeps_duplicates_and_empty() {
        let catalog = Catalog::from_themes([("birds", vec!["owl", "owl"]), ("empty", vec![])]);
        assert_eq!(catalog.get("birds").unwrap().words, vec!["owl", "owl"]);
        assert!(catalog.get("empty").unwrap().words.is_empty());
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let catalog = Catalog::from_themes([("zoo", vec!["a"]), ("art", vec!["b"])]);
        let names: Vec<&str> = catalog.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zoo", "art"]);
    }

    #[test]
    fn test_prefix_conflicts() {
        let catalog = Catalog::from_themes([
            ("catfish", vec!["a"]),
            ("cat", vec!["b"]),
            ("dog", vec!["c"]),
        ]);
        assert_eq!(
            catalog.prefix_conflicts(),
            vec![("cat".to_string(), "catfish".to_string())]
        );
    }

    #[test]
    fn test_load_aliases_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let err = load_aliases(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, AliasError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_load_aliases_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("alias_Animals.csv"), "Alias\nTiger\nant\n").unwrap();
        fs::write(tmp.path().join("alias_colors.csv"), "Alias,Hex\nred,#f00\nBlue,#00f\n").unwrap();
        fs::write(tmp.path().join("alias_empty.csv"), "Alias\n").unwrap();
        fs::write(tmp.path().join("README.txt"), "not a theme").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/alias_deep.csv"), "Alias\nx\n").unwrap();

        let catalog = load_aliases(tmp.path()).unwrap();
        assert_eq!(catalog.sorted_names(), vec!["animals", "colors"]);
        assert_eq!(catalog.get("animals").unwrap().words, vec!["ant", "tiger"]);
        assert_eq!(catalog.get("colors").unwrap().words, vec!["blue", "red"]);
        assert!(!catalog.contains("empty"));
        assert!(!catalog.contains("deep"));
    }

    #[test]
    fn test_load_aliases_merges_sources_with_same_theme() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("alias_Animals.csv"), "Alias\nzebra\ncat\n").unwrap();
        fs::write(tmp.path().join("animals.csv"), "Alias\nant\nCat\n").unwrap();

        let catalog = load_aliases(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("animals").unwrap().words,
            vec!["ant", "cat", "cat", "zebra"]
        );
    }

    #[test]
    fn test_load_aliases_malformed_source() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("alias_bad.csv"), "Word\ncat\n").unwrap();
        let err = load_aliases(tmp.path()).unwrap_err();
        assert!(matches!(err, AliasError::MalformedThemeSource { .. }));
    }
}
