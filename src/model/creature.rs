use serde::{Deserialize, Serialize};

/// Language tag of the kana (katakana/hiragana) name variant.
pub const KANA_LANGUAGE: &str = "ja-Hrkt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub base_value: u32,
}

/// A creature as returned by `/pokemon/{id}`, reduced to what the card needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: u32,
    pub name: String,
    pub sprite_url: Option<String>,
    pub types: Vec<String>,
    pub stats: Vec<BaseStat>,
}

impl CreatureRecord {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Sum of all base stat values, 0 when the record lists none.
    pub fn strength_score(&self) -> u32 {
        self.stats.iter().map(|s| s.base_value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub language: String,
    pub name: String,
}

/// A species as returned by `/pokemon-species/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub canonical_name: String,
    pub localized_names: Vec<LocalizedName>,
}

impl SpeciesRecord {
    pub fn localized(&self, language: &str) -> Option<&str> {
        self.localized_names
            .iter()
            .find(|n| n.language == language && !n.name.is_empty())
            .map(|n| n.name.as_str())
    }

    /// Name to show on reveal: the `language` entry if present, else the
    /// canonical species name.
    pub fn display_name(&self, language: &str) -> &str {
        self.localized(language).unwrap_or(&self.canonical_name)
    }
}

/* =========================
   Wire payloads
   ========================= */

#[derive(Debug, Deserialize)]
pub(crate) struct NamedResource {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ArtworkPayload {
    pub front_default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OtherSpritesPayload {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpritesPayload {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSpritesPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlotPayload {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatSlotPayload {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PokemonPayload {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: SpritesPayload,
    #[serde(default)]
    pub types: Vec<TypeSlotPayload>,
    #[serde(default)]
    pub stats: Vec<StatSlotPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamePayload {
    pub name: String,
    pub language: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeciesPayload {
    pub name: String,
    #[serde(default)]
    pub names: Vec<NamePayload>,
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

impl From<PokemonPayload> for CreatureRecord {
    fn from(payload: PokemonPayload) -> Self {
        let official = payload
            .sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| non_empty(a.front_default));
        let sprite_url = official.or_else(|| non_empty(payload.sprites.front_default));

        let mut slots = payload.types;
        slots.sort_by_key(|t| t.slot);

        CreatureRecord {
            id: payload.id,
            name: payload.name,
            sprite_url,
            types: slots.into_iter().map(|t| t.kind.name).collect(),
            stats: payload
                .stats
                .into_iter()
                .map(|s| BaseStat {
                    name: s.stat.name,
                    base_value: s.base_stat,
                })
                .collect(),
        }
    }
}

impl From<SpeciesPayload> for SpeciesRecord {
    fn from(payload: SpeciesPayload) -> Self {
        SpeciesRecord {
            canonical_name: payload.name,
            localized_names: payload
                .names
                .into_iter()
                .map(|n| LocalizedName {
                    language: n.language.name,
                    name: n.name,
                })
                .collect(),
        }
    }
}

/// Parse a `/pokemon/{id}` body.
pub fn parse_creature(body: &str) -> serde_json::Result<CreatureRecord> {
    serde_json::from_str::<PokemonPayload>(body).map(CreatureRecord::from)
}

/// Parse a `/pokemon-species/{id}` body.
pub fn parse_species(body: &str) -> serde_json::Result<SpeciesRecord> {
    serde_json::from_str::<SpeciesPayload>(body).map(SpeciesRecord::from)
}
