//! TDK (Türk Dil Kurumu) dictionary entry format / TDK madde biçimi
//!
//! Shared by the `gts.json` dump importer and the online metadata lookup.
//! Only the fields this service uses are modelled.

use serde::Deserialize;
use serde_json::Value;

/// Property type code for part of speech (isim, sıfat, ...) / Sözcük türü kodu
const POS_PROPERTY_TYPE: &str = "3";

#[derive(Debug, Clone, Deserialize)]
pub struct TdkEntry {
    #[serde(default)]
    pub madde: Option<String>,
    #[serde(default)]
    pub lisan: Option<String>,
    #[serde(default, rename = "anlamlarListe")]
    pub anlamlar: Vec<TdkMeaning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TdkMeaning {
    #[serde(default)]
    pub anlam: Option<String>,
    #[serde(default, rename = "ozelliklerListe")]
    pub ozellikler: Vec<TdkProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TdkProperty {
    /// Sent as a string by the API, sometimes as a number in dumps
    #[serde(default)]
    pub tur: Option<Value>,
    #[serde(default)]
    pub tam_adi: Option<String>,
    #[serde(default)]
    pub kisa_adi: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl TdkProperty {
    fn is_type(&self, code: &str) -> bool {
        match &self.tur {
            Some(Value::String(s)) => s == code,
            Some(Value::Number(n)) => n.to_string() == code,
            _ => false,
        }
    }

    fn name(&self) -> Option<String> {
        non_empty(&self.tam_adi).or_else(|| non_empty(&self.kisa_adi))
    }
}

impl TdkEntry {
    pub fn lemma(&self) -> Option<String> {
        non_empty(&self.madde)
    }

    /// Language of origin / Köken dili
    pub fn origin(&self) -> Option<String> {
        non_empty(&self.lisan)
    }

    fn first_meaning(&self) -> Option<&TdkMeaning> {
        self.anlamlar.first()
    }

    /// Definition of the first sense / İlk anlamın tanımı
    pub fn first_definition(&self) -> Option<String> {
        self.first_meaning().and_then(|m| non_empty(&m.anlam))
    }

    /// First property of the first sense, whatever its type / İlk özellik
    pub fn first_property(&self) -> Option<String> {
        self.first_meaning()
            .and_then(|m| m.ozellikler.first())
            .and_then(TdkProperty::name)
    }

    /// Part of speech of the first sense / İlk anlamın sözcük türü
    pub fn part_of_speech(&self) -> Option<String> {
        self.first_meaning()
            .and_then(|m| m.ozellikler.iter().find(|p| p.is_type(POS_PROPERTY_TYPE)))
            .and_then(TdkProperty::name)
    }
}

/// Part of speech and origin found for a word / Bulunan tür ve köken
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TdkMetadata {
    pub pos: Option<String>,
    pub origin: Option<String>,
}

/// Parse a `/gts` API response / `/gts` cevabını çözümle
///
/// Unknown words come back as `{"error": "..."}` and yield `None`.
pub fn parse_lookup_response(body: &str) -> Option<TdkMetadata> {
    let entries: Vec<TdkEntry> = serde_json::from_str(body).ok()?;
    let first = entries.into_iter().next()?;
    if first.anlamlar.is_empty() {
        return None;
    }
    Some(TdkMetadata {
        pos: first.part_of_speech(),
        origin: first.origin(),
    })
}
