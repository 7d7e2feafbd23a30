//! Core domain models for the collection store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the enumerated album types. Unknown strings coerce to `Album`
/// (§3: "unknown strings coerce to `Album` with a warning recorded in the
/// scan delta") — callers that need to surface that warning should check
/// the raw string against [`AlbumType::as_str`] / [`AlbumType::ALL`]
/// themselves (see `core::services::validation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumType {
    Album,
    Ep,
    Live,
    Demo,
    Compilation,
    Single,
    Instrumental,
    Split,
}

impl AlbumType {
    pub const ALL: [AlbumType; 8] = [
        AlbumType::Album,
        AlbumType::Ep,
        AlbumType::Live,
        AlbumType::Demo,
        AlbumType::Compilation,
        AlbumType::Single,
        AlbumType::Instrumental,
        AlbumType::Split,
    ];

    /// Parses a type-subfolder or inferred keyword into a variant.
    /// Anything unrecognized coerces to `Album`.
    pub fn parse(raw: &str) -> AlbumType {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "album" | "albums" => AlbumType::Album,
            "ep" | "eps" => AlbumType::Ep,
            "live" => AlbumType::Live,
            "demo" | "demos" => AlbumType::Demo,
            "compilation" | "compilations" | "best of" | "greatest hits" => AlbumType::Compilation,
            "single" | "singles" => AlbumType::Single,
            "instrumental" | "instrumentals" => AlbumType::Instrumental,
            "split" | "splits" => AlbumType::Split,
            _ => AlbumType::Album,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumType::Album => "Album",
            AlbumType::Ep => "EP",
            AlbumType::Live => "Live",
            AlbumType::Demo => "Demo",
            AlbumType::Compilation => "Compilation",
            AlbumType::Single => "Single",
            AlbumType::Instrumental => "Instrumental",
            AlbumType::Split => "Split",
        }
    }
}

impl Serialize for AlbumType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AlbumType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AlbumType::parse(&raw))
    }
}

/// Per-album analysis: a review and a 0-10 rating (0 = unrated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumAnalysisEntry {
    pub album_name: String,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub rate: u8,
}

/// Overall band analysis block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BandAnalysis {
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub rate: u8,
    #[serde(default)]
    pub similar_bands: Vec<String>,
    #[serde(default)]
    pub albums: Vec<AlbumAnalysisEntry>,
}

/// One album, local or missing. The `local` flag is derived from which list
/// the album sits in (§3) and is not itself persisted on disk — it is set by
/// the store when handing a record to a caller and cleared before writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub album_name: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "type", default = "default_album_type")]
    pub album_type: AlbumType,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub track_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
}

fn default_album_type() -> AlbumType {
    AlbumType::Album
}

impl Album {
    /// The `(title, year, edition)` identity fixed by the spec's Design Notes
    /// as the uniform album key, used everywhere two albums are compared.
    pub fn key(&self) -> (String, String, String) {
        (
            self.album_name.clone(),
            self.year.clone(),
            normalize_edition(&self.edition),
        )
    }
}

/// Edition strings compare as-written (§9 Open Questions); this only folds
/// the empty-vs-"Standard" case so the key is stable regardless of which
/// spelling a caller used.
pub fn normalize_edition(edition: &str) -> String {
    edition.trim().to_string()
}

pub fn edition_label(edition: &str) -> &str {
    if edition.trim().is_empty() {
        "Standard"
    } else {
        edition.trim()
    }
}

/// A full band record: the sidecar JSON's in-memory shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub band_name: String,
    #[serde(default)]
    pub formed: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub albums_missing: Vec<Album>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyze: Option<BandAnalysis>,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    /// Derived; may be omitted on write (§6.2) and is always recomputed on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums_count: Option<u32>,
}

impl Band {
    pub fn new(band_name: impl Into<String>) -> Self {
        Band {
            band_name: band_name.into(),
            formed: String::new(),
            genres: Vec::new(),
            origin: String::new(),
            members: Vec::new(),
            description: String::new(),
            albums: Vec::new(),
            albums_missing: Vec::new(),
            analyze: None,
            last_updated: String::new(),
            folder_path: None,
            albums_count: None,
        }
    }

    pub fn total_albums(&self) -> usize {
        self.albums.len() + self.albums_missing.len()
    }

    pub fn completion_rate(&self) -> f64 {
        let total = self.total_albums();
        if total == 0 {
            0.0
        } else {
            self.albums.len() as f64 / total as f64
        }
    }

    pub fn has_metadata(&self) -> bool {
        !self.formed.is_empty()
            || !self.genres.is_empty()
            || !self.origin.is_empty()
            || !self.members.is_empty()
            || !self.description.is_empty()
    }

    pub fn has_analysis(&self) -> bool {
        self.analyze.is_some()
    }

    /// The analysis entry for an album, keyed by title per §3 ("a list of
    /// per-album analysis entries keyed by album title").
    pub fn album_analysis(&self, album_name: &str) -> Option<&AlbumAnalysisEntry> {
        self.analyze
            .as_ref()?
            .albums
            .iter()
            .find(|a| a.album_name == album_name)
    }

    pub fn album_rating(&self, album_name: &str) -> Option<u8> {
        self.album_analysis(album_name)
            .map(|a| a.rate)
            .filter(|r| *r >= 1)
    }
}

/// A flattened, query-time view of one album joined with its analysis and
/// its owning band. Used by the query engine (C5); never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumView {
    pub band_name: String,
    pub album: Album,
    pub is_local: bool,
    pub rating: Option<u8>,
    pub review: Option<String>,
}

/// One entry in the collection index's band list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub name: String,
    pub folder_path: String,
    pub albums_count: u32,
    pub local_albums_count: u32,
    pub missing_albums_count: u32,
    pub has_metadata: bool,
    pub has_analysis: bool,
    pub last_updated: String,
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CollectionStats {
    pub total_bands: u32,
    pub total_albums: u32,
    pub total_local_albums: u32,
    pub total_missing_albums: u32,
    pub bands_with_metadata: u32,
    pub completion_percentage: f64,
    pub top_genres: std::collections::BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionIndex {
    pub bands: Vec<BandSummary>,
    pub stats: CollectionStats,
    pub last_updated: String,
}

impl CollectionIndex {
    pub fn empty(now: impl Into<String>) -> Self {
        CollectionIndex {
            bands: Vec::new(),
            stats: CollectionStats::default(),
            last_updated: now.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaturityLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBucket {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecommendation {
    pub band_name: String,
    pub album_type: AlbumType,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionUpgrade {
    pub band_name: String,
    pub album_name: String,
    pub rating: u8,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInsights {
    pub maturity_level: MaturityLevel,
    pub health_score: f64,
    pub health_bucket: HealthBucket,
    pub type_distribution: std::collections::BTreeMap<String, TypeCount>,
    pub type_diversity_score: f64,
    pub edition_distribution: std::collections::BTreeMap<String, u32>,
    pub edition_breakdown: EditionBreakdown,
    pub type_recommendations: Vec<TypeRecommendation>,
    pub edition_upgrades: Vec<EditionUpgrade>,
    pub decade_distribution: std::collections::BTreeMap<String, u32>,
    pub band_completion_rates: std::collections::BTreeMap<String, f64>,
    pub value_score: u32,
    pub discovery_potential: u32,
    pub generated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TypeCount {
    pub count: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EditionBreakdown {
    pub deluxe_percentage: f64,
    pub remaster_percentage: f64,
    pub anniversary_percentage: f64,
    pub standard_percentage: f64,
}
