use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An artwork record as served by the recommendation backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artwork {
    /// Dedup key, also names the image object (`<id>.jpg`)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub artist: String,
    /// Hyphen-delimited title, e.g. `the-starry-night`
    #[serde(default, deserialize_with = "text_or_null")]
    pub description: String,
    /// Loosely JSON-encoded list of genre tags, see [`crate::services::genre::parse_genres`]
    #[serde(default, deserialize_with = "text_or_null")]
    pub genre: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub image_url: String,
    #[serde(default)]
    pub vector_index: Option<f64>,
}

impl Artwork {
    /// Description with hyphens turned into spaces
    pub fn display_title(&self) -> String {
        self.description.replace('-', " ")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// `null` reads as empty text, scalars as their JSON rendering
fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

/// Decodes each record on its own, dropping the ones that do not fit
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Artwork>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<Value>::deserialize(deserializer)?;
    let total = records.len();

    let artworks: Vec<Artwork> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Artwork>(record) {
            Ok(artwork) => Some(artwork),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed artwork record");
                None
            }
        })
        .collect();

    if artworks.len() < total {
        tracing::warn!(
            kept = artworks.len(),
            dropped = total - artworks.len(),
            "Artwork payload contained malformed records"
        );
    }
    Ok(artworks)
}

/// Every response shape the backend has been seen to produce.
///
/// `/random-art` answers with `{ "artworks": [...] }` and `/recommend/:id`
/// with `{ "recommendations": [...] }`, but either may also come back as a
/// bare array. Records are decoded one by one, so a malformed record is
/// dropped without losing its neighbours. Anything else decodes as
/// [`ArtworkPayload::Unrecognized`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArtworkPayload {
    Bare(#[serde(deserialize_with = "lenient_list")] Vec<Artwork>),
    Artworks {
        #[serde(deserialize_with = "lenient_list")]
        artworks: Vec<Artwork>,
    },
    Recommendations {
        #[serde(deserialize_with = "lenient_list")]
        recommendations: Vec<Artwork>,
    },
    Unrecognized(Value),
}

impl ArtworkPayload {
    /// Normalizes any payload shape into a plain list
    pub fn into_artworks(self) -> Vec<Artwork> {
        match self {
            ArtworkPayload::Bare(artworks)
            | ArtworkPayload::Artworks { artworks }
            | ArtworkPayload::Recommendations {
                recommendations: artworks,
            } => artworks,
            ArtworkPayload::Unrecognized(value) => {
                tracing::warn!(payload = %value, "Unrecognized artwork payload, treating as empty");
                Vec::new()
            }
        }
    }
}

impl From<Vec<Artwork>> for ArtworkPayload {
    fn from(artworks: Vec<Artwork>) -> Self {
        ArtworkPayload::Bare(artworks)
    }
}
