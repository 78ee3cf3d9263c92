use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize};

/// Series title whose upstream `displayValue` is a heading rather than a citation.
pub const PARASHAT_HASHAVUA: &str = "Parashat Hashavua";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    #[serde(default, deserialize_with = "string_or_null")]
    pub en: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub he: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, he: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            he: he.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.he.is_empty()
    }

    /// Text for one interface language, falling back to the other side when empty.
    pub fn for_language(&self, language: Language) -> String {
        match language {
            Language::English if !self.en.is_empty() => self.en.clone(),
            Language::English => self.he.clone(),
            Language::Hebrew if !self.he.is_empty() => self.he.clone(),
            Language::Hebrew => self.en.clone(),
            Language::Bilingual => match (self.en.is_empty(), self.he.is_empty()) {
                (false, false) => format!("{} / {}", self.en, self.he),
                (false, true) => self.en.clone(),
                (true, _) => self.he.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    English,
    Hebrew,
    #[default]
    Bilingual,
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "he" | "hebrew" => Ok(Self::Hebrew),
            "bi" | "bilingual" | "both" => Ok(Self::Bilingual),
            other => Err(anyhow!("invalid language: {other}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::English => "en",
            Self::Hebrew => "he",
            Self::Bilingual => "bilingual",
        };
        f.write_str(name)
    }
}

/// One calendar item as delivered by the upstream calendars API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendarEntry {
    #[serde(default, deserialize_with = "text_or_null")]
    pub title: LocalizedText,

    #[serde(default, deserialize_with = "text_or_null")]
    pub display_value: LocalizedText,

    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_ref: Option<String>,

    #[serde(default, deserialize_with = "string_or_null")]
    pub url: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_or_null<'de, D>(deserializer: D) -> Result<LocalizedText, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LocalizedText>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawCalendarEntry {
    pub fn new(title_en: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: LocalizedText::new(title_en, ""),
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRef {
    pub url: String,
    pub display_value: LocalizedText,
}

impl CalendarRef {
    pub fn href(&self) -> String {
        format!("/{}", self.url)
    }
}

/// A display-ready calendar block: one per run of adjacent entries sharing `title.en`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub title: LocalizedText,

    pub display_title: LocalizedText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub url: String,

    pub refs: Vec<CalendarRef>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ListingRecord {
    pub fn title_href(&self) -> String {
        format!("/{}", self.url)
    }
}
