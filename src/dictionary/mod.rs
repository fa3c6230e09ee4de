//! Character lookup over two bundled sources.
//!
//! `unihan` carries the standardized reading, gloss and stroke count;
//! `hanzi` carries component decomposition and etymology. A lookup merges
//! both: pronunciation, definition and strokes prefer Unihan, radical,
//! decomposition and etymology prefer the etymological source, and every
//! field falls back to the other source when its preferred one is missing.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

const BUNDLED_UNIHAN: &str = include_str!("../../data/unihan.json");
const BUNDLED_HANZI: &str = include_str!("../../data/hanzi.json");

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Etymology {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub hint: Option<String>,
    pub phonetic: Option<String>,
    pub semantic: Option<String>,
}

impl Etymology {
    fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.hint.is_none()
            && self.phonetic.is_none()
            && self.semantic.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterInfo {
    pub character: String,
    pub pinyin: String,
    pub definition: String,
    pub radical: String,
    pub strokes: u32,
    pub decomposition: String,
    pub etymology: Option<Etymology>,
}

impl CharacterInfo {
    /// One-line breakdown for the detail view: decomposition followed by the
    /// semantic component, the quoted hint and the phonetic component.
    pub fn etymology_line(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(etymology) = &self.etymology {
            if let Some(semantic) = non_empty(etymology.semantic.as_deref()) {
                parts.push(semantic.to_string());
            }
            if let Some(hint) = non_empty(etymology.hint.as_deref()) {
                parts.push(format!("\"{hint}\""));
            }
            if let Some(phonetic) = non_empty(etymology.phonetic.as_deref()) {
                parts.push(format!("+ {phonetic}"));
            }
        }

        match (self.decomposition.is_empty(), parts.is_empty()) {
            (true, true) => None,
            (false, true) => Some(self.decomposition.clone()),
            (true, false) => Some(parts.join(" ")),
            (false, false) => Some(format!("{} {}", self.decomposition, parts.join(" "))),
        }
    }
}

pub trait CharacterLookup {
    fn lookup(&self, character: &str) -> Option<CharacterInfo>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UnihanEntry {
    pinyin: Option<String>,
    definition: Option<String>,
    radical: Option<String>,
    strokes: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct HanziEntry {
    definition: Option<String>,
    pinyin: Vec<String>,
    radical: Option<String>,
    decomposition: Option<String>,
    etymology: Option<Etymology>,
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    unihan: HashMap<String, UnihanEntry>,
    hanzi: HashMap<String, HanziEntry>,
}

impl Dictionary {
    pub fn bundled() -> AppResult<Self> {
        Self::from_json(BUNDLED_UNIHAN, BUNDLED_HANZI)
    }

    pub fn from_json(unihan: &str, hanzi: &str) -> AppResult<Self> {
        let unihan = serde_json::from_str(unihan)
            .map_err(|source| AppError::dictionary("unihan", source))?;
        let hanzi =
            serde_json::from_str(hanzi).map_err(|source| AppError::dictionary("hanzi", source))?;
        Ok(Self { unihan, hanzi })
    }

    pub fn len(&self) -> usize {
        self.unihan
            .keys()
            .chain(self.hanzi.keys().filter(|key| !self.unihan.contains_key(*key)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.unihan.is_empty() && self.hanzi.is_empty()
    }
}

impl CharacterLookup for Dictionary {
    fn lookup(&self, character: &str) -> Option<CharacterInfo> {
        let u = self.unihan.get(character);
        let h = self.hanzi.get(character);
        if u.is_none() && h.is_none() {
            return None;
        }

        let pinyin = u
            .and_then(|e| non_empty(e.pinyin.as_deref()))
            .or_else(|| h.and_then(|e| non_empty(e.pinyin.first().map(String::as_str))))
            .unwrap_or_default();
        let definition = u
            .and_then(|e| non_empty(e.definition.as_deref()))
            .or_else(|| h.and_then(|e| non_empty(e.definition.as_deref())))
            .unwrap_or_default();
        let radical = h
            .and_then(|e| non_empty(e.radical.as_deref()))
            .or_else(|| u.and_then(|e| non_empty(e.radical.as_deref())))
            .unwrap_or_default();
        let decomposition = h
            .and_then(|e| non_empty(e.decomposition.as_deref()))
            .unwrap_or_default();
        let etymology = h
            .and_then(|entry| entry.etymology.clone())
            .filter(|etymology| !etymology.is_empty());

        Some(CharacterInfo {
            character: character.to_string(),
            pinyin: pinyin.to_string(),
            definition: definition.to_string(),
            radical: radical.to_string(),
            strokes: u.and_then(|entry| entry.strokes).unwrap_or(0),
            decomposition: decomposition.to_string(),
            etymology,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{CharacterInfo, CharacterLookup, Dictionary, Etymology};

    fn sample() -> Dictionary {
        Dictionary::from_json(
            r#"{
                "道": { "pinyin": "dào", "definition": "path, road", "radical": "辵", "strokes": 12 },
                "可": { "pinyin": "", "radical": "口" }
            }"#,
            r#"{
                "道": {
                    "definition": "the Way",
                    "pinyin": ["dào"],
                    "radical": "辶",
                    "decomposition": "⿺辶首",
                    "etymology": { "type": "pictophonetic", "hint": "walk", "phonetic": "首", "semantic": "辶" }
                },
                "可": { "definition": "may, can", "pinyin": ["kě", "kè"] },
                "徼": { "definition": "frontier", "pinyin": ["jiào"], "radical": "彳" }
            }"#,
        )
        .expect("sample data should parse")
    }

    #[test]
    fn merge_prefers_reference_reading_and_etymological_structure() {
        let info = sample().lookup("道").expect("entry should exist");
        assert_eq!(info.pinyin, "dào");
        assert_eq!(info.definition, "path, road");
        assert_eq!(info.strokes, 12);
        assert_eq!(info.radical, "辶");
        assert_eq!(info.decomposition, "⿺辶首");
        assert_eq!(
            info.etymology.as_ref().and_then(|e| e.kind.as_deref()),
            Some("pictophonetic")
        );
    }

    #[test]
    fn merge_falls_back_across_sources_for_missing_fields() {
        let dictionary = sample();

        let ke = dictionary.lookup("可").expect("entry should exist");
        assert_eq!(ke.pinyin, "kě");
        assert_eq!(ke.definition, "may, can");
        assert_eq!(ke.radical, "口");
        assert_eq!(ke.strokes, 0);
        assert!(ke.etymology.is_none());

        let jiao = dictionary.lookup("徼").expect("hanzi-only entry should exist");
        assert_eq!(jiao.pinyin, "jiào");
        assert_eq!(jiao.strokes, 0);
        assert_eq!(jiao.radical, "彳");
    }

    #[test]
    fn lookup_returns_none_when_both_sources_miss() {
        assert!(sample().lookup("龘").is_none());
    }

    #[test]
    fn bundled_data_covers_first_chapter() {
        let dictionary = Dictionary::bundled().expect("bundled data should parse");
        for ch in "道可非常名無天地之始有萬物母故欲以觀其妙徼此兩者同出而異謂玄又眾門".chars() {
            assert!(
                dictionary.lookup(&ch.to_string()).is_some(),
                "missing bundled entry for {ch}"
            );
        }
        assert!(dictionary.len() >= 33);
    }

    #[test]
    fn etymology_line_joins_components() {
        let info = CharacterInfo {
            character: "道".to_string(),
            pinyin: "dào".to_string(),
            definition: String::new(),
            radical: String::new(),
            strokes: 0,
            decomposition: "⿺辶首".to_string(),
            etymology: Some(Etymology {
                kind: Some("pictophonetic".to_string()),
                hint: Some("walk".to_string()),
                phonetic: Some("首".to_string()),
                semantic: Some("辶".to_string()),
            }),
        };
        assert_eq!(info.etymology_line().as_deref(), Some("⿺辶首 辶 \"walk\" + 首"));

        let bare = CharacterInfo {
            etymology: None,
            decomposition: String::new(),
            ..info
        };
        assert_eq!(bare.etymology_line(), None);
    }
}
