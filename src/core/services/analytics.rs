//! Analytics Engine (C6): derived views, a deterministic function of C3/C4
//! state (§4.6). Same input state yields byte-identical output except
//! `generated_at`.

use crate::core::config::{MATURITY_BUMP_ANALYSIS_COVERAGE, MATURITY_BUMP_METADATA_COVERAGE};
use crate::core::domain::{
    Album, AlbumType, Band, CollectionInsights, EditionBreakdown, EditionUpgrade, HealthBucket,
    MaturityLevel, Priority, TypeCount, TypeRecommendation, edition_label,
};
use crate::core::services::path_normalizer::classify_folder_structure;
use std::collections::BTreeMap;

fn maturity_ladder(total_bands: usize) -> MaturityLevel {
    match total_bands {
        0..=9 => MaturityLevel::Beginner,
        10..=49 => MaturityLevel::Intermediate,
        50..=199 => MaturityLevel::Advanced,
        200..=499 => MaturityLevel::Expert,
        _ => MaturityLevel::Master,
    }
}

fn bump(level: MaturityLevel) -> MaturityLevel {
    match level {
        MaturityLevel::Beginner => MaturityLevel::Intermediate,
        MaturityLevel::Intermediate => MaturityLevel::Advanced,
        MaturityLevel::Advanced => MaturityLevel::Expert,
        MaturityLevel::Expert => MaturityLevel::Master,
        MaturityLevel::Master => MaturityLevel::Master,
    }
}

fn health_bucket(score: f64) -> HealthBucket {
    if score < 30.0 {
        HealthBucket::Critical
    } else if score < 50.0 {
        HealthBucket::Poor
    } else if score < 65.0 {
        HealthBucket::Fair
    } else if score < 85.0 {
        HealthBucket::Good
    } else {
        HealthBucket::Excellent
    }
}

fn all_albums(band: &Band) -> impl Iterator<Item = &Album> {
    band.albums.iter().chain(band.albums_missing.iter())
}

fn organization_compliance(bands: &[Band]) -> f64 {
    let scores: Vec<f64> = bands
        .iter()
        .filter_map(|band| {
            if band.albums.is_empty() {
                return None;
            }
            let is_direct: Vec<bool> = band
                .albums
                .iter()
                .map(|a| {
                    a.folder_path
                        .as_deref()
                        .map(|p| !p.contains('/') && !p.contains('\\'))
                        .unwrap_or(true)
                })
                .collect();
            Some(classify_folder_structure(&is_direct).1)
        })
        .collect();
    if scores.is_empty() {
        100.0
    } else {
        100.0 * scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn type_distribution(bands: &[Band]) -> (BTreeMap<String, TypeCount>, f64) {
    let mut counts: BTreeMap<AlbumType, u32> = BTreeMap::new();
    let mut total = 0u32;
    for band in bands {
        for album in all_albums(band) {
            *counts.entry(album.album_type).or_insert(0) += 1;
            total += 1;
        }
    }

    let mut result = BTreeMap::new();
    for t in AlbumType::ALL {
        let count = counts.get(&t).copied().unwrap_or(0);
        let percentage = if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        };
        result.insert(t.as_str().to_string(), TypeCount { count, percentage });
    }

    let distinct = counts.keys().filter(|_| true).count();
    let diversity_score = 100.0 * distinct as f64 / AlbumType::ALL.len() as f64;
    (result, diversity_score)
}

fn edition_analysis(bands: &[Band]) -> (BTreeMap<String, u32>, EditionBreakdown) {
    let mut distribution: BTreeMap<String, u32> = BTreeMap::new();
    let mut total = 0u32;
    let (mut deluxe, mut remaster, mut anniversary, mut standard) = (0u32, 0u32, 0u32, 0u32);

    for band in bands {
        for album in all_albums(band) {
            let label = edition_label(&album.edition).to_string();
            *distribution.entry(label.clone()).or_insert(0) += 1;
            total += 1;
            let lower = label.to_ascii_lowercase();
            if lower.contains("deluxe") {
                deluxe += 1;
            }
            if lower.contains("remaster") {
                remaster += 1;
            }
            if lower.contains("anniversary") {
                anniversary += 1;
            }
            if lower == "standard" {
                standard += 1;
            }
        }
    }

    let pct = |n: u32| if total == 0 { 0.0 } else { 100.0 * n as f64 / total as f64 };
    let breakdown = EditionBreakdown {
        deluxe_percentage: pct(deluxe),
        remaster_percentage: pct(remaster),
        anniversary_percentage: pct(anniversary),
        standard_percentage: pct(standard),
    };
    (distribution, breakdown)
}

fn decade_distribution(bands: &[Band]) -> BTreeMap<String, u32> {
    let mut histogram = BTreeMap::new();
    for band in bands {
        for album in all_albums(band) {
            if album.year.is_empty() {
                continue;
            }
            if let Ok(year) = album.year.parse::<u32>() {
                let decade = (year / 10) * 10;
                *histogram.entry(format!("{}s", decade)).or_insert(0) += 1;
            }
        }
    }
    histogram
}

fn is_core_for_genres(album_type: AlbumType, genres: &[String]) -> Priority {
    match album_type {
        AlbumType::Compilation => Priority::Medium,
        AlbumType::Demo => Priority::Low,
        AlbumType::Live => {
            let rock_or_metal = genres
                .iter()
                .any(|g| g.to_ascii_lowercase().contains("rock") || g.to_ascii_lowercase().contains("metal"));
            if rock_or_metal {
                Priority::High
            } else {
                Priority::Medium
            }
        }
        _ => Priority::Medium,
    }
}

fn type_recommendations(bands: &[Band]) -> Vec<TypeRecommendation> {
    let mut recs = Vec::new();
    for band in bands {
        if !band.has_analysis() {
            continue;
        }
        let present: std::collections::HashSet<AlbumType> =
            all_albums(band).map(|a| a.album_type).collect();
        for t in AlbumType::ALL {
            if !present.contains(&t) {
                recs.push(TypeRecommendation {
                    band_name: band.band_name.clone(),
                    album_type: t,
                    priority: is_core_for_genres(t, &band.genres),
                });
            }
        }
    }
    recs
}

fn edition_upgrades(bands: &[Band]) -> Vec<EditionUpgrade> {
    let mut upgrades = Vec::new();
    for band in bands {
        for album in &band.albums {
            if !album.edition.trim().is_empty() {
                continue;
            }
            if let Some(rating) = band.album_rating(&album.album_name) {
                if rating >= 8 {
                    upgrades.push(EditionUpgrade {
                        band_name: band.band_name.clone(),
                        album_name: album.album_name.clone(),
                        rating,
                        suggestion: "consider a deluxe or remaster edition".to_string(),
                    });
                }
            }
        }
    }
    upgrades
}

/// `Analytics()` (§4.6, C8). `bands` must be the full set of band records
/// (C3); `stats` is the already-recomputed collection stats (C4).
pub fn compute_insights(
    bands: &[Band],
    stats: &crate::core::domain::CollectionStats,
    now: &str,
) -> CollectionInsights {
    let total_bands = bands.len();
    let metadata_coverage = if total_bands == 0 {
        0.0
    } else {
        100.0 * bands.iter().filter(|b| b.has_metadata()).count() as f64 / total_bands as f64
    };
    let analysis_coverage = if total_bands == 0 {
        0.0
    } else {
        100.0 * bands.iter().filter(|b| b.has_analysis()).count() as f64 / total_bands as f64
    };

    let mut maturity = maturity_ladder(total_bands);
    if metadata_coverage >= MATURITY_BUMP_METADATA_COVERAGE
        && analysis_coverage >= MATURITY_BUMP_ANALYSIS_COVERAGE
    {
        maturity = bump(maturity);
    }

    let organization = organization_compliance(bands);
    let health_score = stats.completion_percentage * 0.40
        + metadata_coverage * 0.30
        + organization * 0.20
        + analysis_coverage * 0.10;

    let (type_distribution, type_diversity_score) = type_distribution(bands);
    let (edition_distribution, edition_breakdown) = edition_analysis(bands);
    let decade_distribution = decade_distribution(bands);

    let band_completion_rates: BTreeMap<String, f64> = bands
        .iter()
        .map(|b| (b.band_name.clone(), 100.0 * b.completion_rate()))
        .collect();

    let unanalyzed_album_total: u32 = bands
        .iter()
        .filter(|b| !b.has_analysis())
        .map(|b| b.total_albums() as u32)
        .sum();
    let discovery_potential = if stats.total_albums == 0 {
        0
    } else {
        ((100.0 * unanalyzed_album_total as f64 / stats.total_albums as f64).round() as u32).min(100)
    };

    let rare_editions: u32 = edition_distribution
        .iter()
        .filter(|(label, _)| *label != "Standard")
        .map(|(_, count)| *count)
        .sum();
    let total_editions: u32 = edition_distribution.values().sum();
    let value_score = if total_editions == 0 {
        0
    } else {
        ((100.0 * rare_editions as f64 / total_editions as f64).round() as u32).min(100)
    };

    CollectionInsights {
        maturity_level: maturity,
        health_score,
        health_bucket: health_bucket(health_score),
        type_distribution,
        type_diversity_score,
        edition_distribution,
        edition_breakdown,
        type_recommendations: type_recommendations(bands),
        edition_upgrades: edition_upgrades(bands),
        decade_distribution,
        band_completion_rates,
        value_score,
        discovery_potential,
        generated_at: now.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{AlbumAnalysisEntry, BandAnalysis};
    use crate::core::services::collection_index::compute_stats;
    use crate::core::domain::BandSummary;

    fn album(name: &str, year: &str, track_count: u32, folder: Option<&str>) -> Album {
        Album {
            album_name: name.to_string(),
            year: year.to_string(),
            album_type: AlbumType::Album,
            edition: String::new(),
            track_count,
            duration: None,
            genres: vec![],
            folder_path: folder.map(|s| s.to_string()),
        }
    }

    #[test]
    fn maturity_is_beginner_for_small_collection() {
        let bands = vec![Band::new("Metallica")];
        let summaries = vec![];
        let stats = compute_stats(&summaries, &std::collections::BTreeMap::new());
        let insights = compute_insights(&bands, &stats, "2026-01-01T00:00:00Z");
        assert_eq!(insights.maturity_level, MaturityLevel::Beginner);
    }

    #[test]
    fn scenario_s7_completion_rates() {
        let mut metallica = Band::new("Metallica");
        metallica.albums.push(album("A", "1983", 10, Some("A")));
        metallica.albums.push(album("B", "1984", 9, Some("B")));
        let mut ep = album("C", "1987", 5, Some("C"));
        ep.album_type = AlbumType::Ep;
        metallica.albums.push(ep);
        metallica.albums_missing.push(album("D", "1988", 0, None));
        metallica.analyze = Some(BandAnalysis {
            review: String::new(),
            rate: 8,
            similar_bands: vec![],
            albums: vec![AlbumAnalysisEntry {
                album_name: "A".to_string(),
                review: String::new(),
                rate: 9,
            }],
        });

        let mut iron_maiden = Band::new("Iron Maiden");
        iron_maiden.albums.push(album("E", "1982", 8, Some("E")));
        iron_maiden
            .albums_missing
            .push(album("F", "1983", 0, None));

        let bands = vec![metallica, iron_maiden];
        let summaries: Vec<BandSummary> = bands
            .iter()
            .map(|b| BandSummary {
                name: b.band_name.clone(),
                folder_path: String::new(),
                albums_count: b.total_albums() as u32,
                local_albums_count: b.albums.len() as u32,
                missing_albums_count: b.albums_missing.len() as u32,
                has_metadata: b.has_metadata(),
                has_analysis: b.has_analysis(),
                last_updated: String::new(),
                checksum: String::new(),
            })
            .collect();
        let stats = compute_stats(&summaries, &std::collections::BTreeMap::new());
        let insights = compute_insights(&bands, &stats, "2026-01-01T00:00:00Z");

        assert!((insights.band_completion_rates["Metallica"] - 66.666_666_7).abs() < 1e-3);
        assert_eq!(insights.band_completion_rates["Iron Maiden"], 50.0);
        assert!(insights.type_distribution.contains_key("Album"));
        assert!(insights.type_distribution.contains_key("EP"));
    }

    #[test]
    fn edition_upgrade_suggested_for_highly_rated_standard_album() {
        let mut band = Band::new("Pink Floyd");
        band.albums.push(album("The Wall", "1979", 26, Some("The Wall")));
        band.analyze = Some(BandAnalysis {
            review: String::new(),
            rate: 10,
            similar_bands: vec![],
            albums: vec![AlbumAnalysisEntry {
                album_name: "The Wall".to_string(),
                review: String::new(),
                rate: 9,
            }],
        });
        let bands = vec![band];
        let stats = compute_stats(&[], &std::collections::BTreeMap::new());
        let insights = compute_insights(&bands, &stats, "2026-01-01T00:00:00Z");
        assert_eq!(insights.edition_upgrades.len(), 1);
        assert_eq!(insights.edition_upgrades[0].album_name, "The Wall");
    }
}
