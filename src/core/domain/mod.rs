//! Domain entities for the collection store: bands, albums, the collection
//! index, and derived analytics (§3).

pub mod models;
pub mod schema_version;

pub use models::{
    Album, AlbumAnalysisEntry, AlbumType, AlbumView, Band, BandAnalysis, BandSummary,
    CollectionIndex, CollectionInsights, CollectionStats, EditionBreakdown, EditionUpgrade,
    HealthBucket, MaturityLevel, Priority, TypeCount, TypeRecommendation, edition_label,
    normalize_edition,
};
pub use schema_version::{SchemaVersionWrapper, with_schema_version};
