use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::calendar::LocalizedText;

const BUILTIN_DESCRIPTIONS_TOML: &str = include_str!("../assets/descriptions.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescription {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub he: Option<String>,
    #[serde(default, alias = "enSubtitle")]
    pub en_subtitle: Option<String>,
}

impl SeriesDescription {
    /// The bilingual description text, or `None` when neither side is written.
    pub fn text(&self) -> Option<LocalizedText> {
        if self.en.is_none() && self.he.is_none() {
            return None;
        }
        Some(LocalizedText {
            en: self.en.clone().unwrap_or_default(),
            he: self.he.clone().unwrap_or_default(),
        })
    }
}

/// Read-only enrichment data keyed by series title without its rite suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionTable {
    #[serde(default)]
    series: BTreeMap<String, SeriesDescription>,
}

impl DescriptionTable {
    /// The table shipped with the crate, parsed once per process.
    pub fn builtin() -> &'static DescriptionTable {
        static BUILTIN: OnceLock<DescriptionTable> = OnceLock::new();
        BUILTIN.get_or_init(load_builtin)
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, SeriesDescription)>,
        K: Into<String>,
    {
        Self {
            series: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let table: DescriptionTable =
            toml::from_str(text).context("failed parsing description table")?;
        Ok(table)
    }

    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let table = Self::from_toml_str(&text)
            .with_context(|| format!("invalid description table {}", path.display()))?;
        info!(series = table.len(), "loaded description table");
        Ok(table)
    }

    /// Finds the entry for a raw `title.en`, ignoring a trailing " (A)" / " (S)".
    pub fn lookup(&self, title_en: &str) -> Option<&SeriesDescription> {
        let key = lookup_key(title_en);
        let found = self.series.get(key);
        if found.is_none() {
            debug!(title = %title_en, key = %key, "no description for series");
        }
        found
    }

    pub fn get(&self, key: &str) -> Option<&SeriesDescription> {
        self.series.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SeriesDescription)> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Strips one trailing Ashkenazi/Sephardi rite marker. Other suffixes are kept.
pub fn lookup_key(title_en: &str) -> &str {
    match rite_suffix_re().and_then(|re| re.find(title_en)) {
        Some(found) => &title_en[..found.start()],
        None => title_en,
    }
}

fn rite_suffix_re() -> Option<&'static Regex> {
    static RITE_SUFFIX: OnceLock<Option<Regex>> = OnceLock::new();
    RITE_SUFFIX
        .get_or_init(|| match Regex::new(r" \([AS]\)$") {
            Ok(re) => Some(re),
            Err(err) => {
                error!(error = %err, "internal regex compile failure");
                None
            }
        })
        .as_ref()
}

fn load_builtin() -> DescriptionTable {
    match DescriptionTable::from_toml_str(BUILTIN_DESCRIPTIONS_TOML) {
        Ok(table) => {
            debug!(series = table.len(), "loaded built-in description table");
            table
        }
        Err(err) => {
            let message = format!("{err:#}");
            error!(error = %message, "failed parsing built-in descriptions; using empty table");
            DescriptionTable::default()
        }
    }
}
