//! Query Engine (C5): list/search/filter/sort/paginate (§4.5). All
//! filtering and sorting is deterministic and order-stable.

use crate::core::domain::{Album, AlbumType, AlbumView, Band, BandSummary};

#[derive(Debug, Clone, Default)]
pub struct BandFilters {
    pub search_query: Option<String>,
    pub filter_genre: Option<String>,
    pub filter_has_metadata: Option<bool>,
    pub filter_missing_albums: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    AlbumsCount,
    LastUpdated,
    Completion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct PagedBandList {
    pub bands: Vec<BandSummary>,
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

/// A band summary's completion rate, for sorting (§4.5.1 sort key `completion`).
fn completion_rate(summary: &BandSummary) -> f64 {
    if summary.albums_count == 0 {
        0.0
    } else {
        summary.local_albums_count as f64 / summary.albums_count as f64
    }
}

fn matches_filters(summary: &BandSummary, band: Option<&Band>, filters: &BandFilters) -> bool {
    if let Some(query) = &filters.search_query {
        let query = query.to_ascii_lowercase();
        let name_matches = summary.name.to_ascii_lowercase().contains(&query);
        let album_matches = band
            .map(|b| {
                b.albums
                    .iter()
                    .chain(b.albums_missing.iter())
                    .any(|a| a.album_name.to_ascii_lowercase().contains(&query))
            })
            .unwrap_or(false);
        if !name_matches && !album_matches {
            return false;
        }
    }

    if let Some(genre) = &filters.filter_genre {
        let has_genre = band
            .map(|b| b.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)))
            .unwrap_or(false);
        if !has_genre {
            return false;
        }
    }

    if let Some(want_metadata) = filters.filter_has_metadata {
        if summary.has_metadata != want_metadata {
            return false;
        }
    }

    if let Some(want_missing) = filters.filter_missing_albums {
        let has_missing = summary.missing_albums_count > 0;
        if has_missing != want_missing {
            return false;
        }
    }

    true
}

/// `ListBands` (§4.5.1). `band_lookup` resolves a summary to its full band
/// record only when a predicate needs it (album-title search, genre
/// filter) — listing itself is index-only.
pub fn list_bands<'a>(
    summaries: &'a [BandSummary],
    band_lookup: impl Fn(&str) -> Option<Band>,
    filters: &BandFilters,
    sort_key: SortKey,
    sort_order: SortOrder,
    pagination: Pagination,
) -> PagedBandList {
    let needs_band = filters.search_query.is_some() || filters.filter_genre.is_some();

    let mut matched: Vec<BandSummary> = summaries
        .iter()
        .filter(|s| {
            let band = if needs_band { band_lookup(&s.name) } else { None };
            matches_filters(s, band.as_ref(), filters)
        })
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        let ordering = match sort_key {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::AlbumsCount => a.albums_count.cmp(&b.albums_count),
            SortKey::LastUpdated => a.last_updated.cmp(&b.last_updated),
            SortKey::Completion => completion_rate(a)
                .partial_cmp(&completion_rate(b))
                .unwrap_or(std::cmp::Ordering::Equal),
        };
        let ordering = if sort_order == SortOrder::Descending {
            ordering.reverse()
        } else {
            ordering
        };
        ordering.then_with(|| a.name.cmp(&b.name))
    });

    let total = matched.len() as u32;
    let page_size = pagination.page_size.max(1);
    let total_pages = total.div_ceil(page_size).max(1);
    let page = pagination.page.max(1);
    let start = ((page - 1) * page_size) as usize;
    let page_items = matched
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    PagedBandList {
        bands: page_items,
        total,
        page,
        page_size,
        total_pages,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlbumSearchFilters {
    pub album_types: Option<Vec<AlbumType>>,
    pub year_min: Option<u32>,
    pub year_max: Option<u32>,
    pub decades: Option<Vec<u32>>,
    pub editions: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub band_names: Option<Vec<String>>,
    pub has_rating: Option<bool>,
    pub rating_min: Option<u8>,
    pub rating_max: Option<u8>,
    pub is_local: Option<bool>,
    pub track_count_min: Option<u32>,
    pub track_count_max: Option<u32>,
}

fn decade_of(year: &str) -> Option<u32> {
    let y: u32 = year.parse().ok()?;
    Some((y / 10) * 10)
}

fn matches_album(view: &AlbumView, filters: &AlbumSearchFilters) -> bool {
    let album = &view.album;

    if let Some(types) = &filters.album_types {
        if !types.contains(&album.album_type) {
            return false;
        }
    }

    if filters.year_min.is_some() || filters.year_max.is_some() || filters.decades.is_some() {
        let Ok(year) = album.year.parse::<u32>() else {
            return false;
        };
        if let Some(min) = filters.year_min {
            if year < min {
                return false;
            }
        }
        if let Some(max) = filters.year_max {
            if year > max {
                return false;
            }
        }
        if let Some(decades) = &filters.decades {
            let Some(decade) = decade_of(&album.year) else {
                return false;
            };
            if !decades.contains(&decade) {
                return false;
            }
        }
    }

    if let Some(editions) = &filters.editions {
        let label = crate::core::domain::edition_label(&album.edition);
        if !editions.iter().any(|e| {
            let e = if e.trim().is_empty() { "Standard" } else { e.trim() };
            e.eq_ignore_ascii_case(label)
        }) {
            return false;
        }
    }

    if let Some(genres) = &filters.genres {
        if !album.genres.iter().any(|g| genres.iter().any(|want| want.eq_ignore_ascii_case(g))) {
            return false;
        }
    }

    if let Some(bands) = &filters.band_names {
        if !bands.iter().any(|b| b.eq_ignore_ascii_case(&view.band_name)) {
            return false;
        }
    }

    if let Some(want) = filters.has_rating {
        let has_rating = view.rating.is_some_and(|r| r >= 1);
        if has_rating != want {
            return false;
        }
    }

    if filters.rating_min.is_some() || filters.rating_max.is_some() {
        let Some(rating) = view.rating else {
            return false;
        };
        if let Some(min) = filters.rating_min {
            if rating < min {
                return false;
            }
        }
        if let Some(max) = filters.rating_max {
            if rating > max {
                return false;
            }
        }
    }

    if let Some(want) = filters.is_local {
        if view.is_local != want {
            return false;
        }
    }

    if let Some(min) = filters.track_count_min {
        if album.track_count < min {
            return false;
        }
    }
    if let Some(max) = filters.track_count_max {
        if album.track_count > max {
            return false;
        }
    }

    true
}

/// Builds the flattened per-album view for one band, joining its local and
/// missing albums with their analysis entries.
pub fn album_views_for_band(band: &Band) -> Vec<AlbumView> {
    let local = band.albums.iter().map(|a| to_view(band, a, true));
    let missing = band.albums_missing.iter().map(|a| to_view(band, a, false));
    local.chain(missing).collect()
}

fn to_view(band: &Band, album: &Album, is_local: bool) -> AlbumView {
    let analysis = band.album_analysis(&album.album_name);
    AlbumView {
        band_name: band.band_name.clone(),
        album: album.clone(),
        is_local,
        rating: analysis.map(|a| a.rate).filter(|r| *r >= 1),
        review: analysis.map(|a| a.review.clone()),
    }
}

/// `SearchAlbums` (§4.5.2): a single composable predicate over every album
/// across every band, grouped by band in the result.
pub fn search_albums(bands: &[Band], filters: &AlbumSearchFilters) -> Vec<AlbumView> {
    bands
        .iter()
        .flat_map(album_views_for_band)
        .filter(|view| matches_album(view, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::AlbumAnalysisEntry;

    fn sample_band(name: &str, local: usize, missing: usize) -> Band {
        let mut band = Band::new(name);
        for i in 0..local {
            band.albums.push(Album {
                album_name: format!("Local {}", i),
                year: "1990".to_string(),
                album_type: AlbumType::Album,
                edition: String::new(),
                track_count: 8,
                duration: None,
                genres: vec![],
                folder_path: Some(format!("Local {}", i)),
            });
        }
        for i in 0..missing {
            band.albums_missing.push(Album {
                album_name: format!("Missing {}", i),
                year: "1991".to_string(),
                album_type: AlbumType::Album,
                edition: String::new(),
                track_count: 0,
                duration: None,
                genres: vec![],
                folder_path: None,
            });
        }
        band
    }

    #[test]
    fn pagination_is_total() {
        let summaries: Vec<BandSummary> = (0..10)
            .map(|i| BandSummary {
                name: format!("Band {:02}", i),
                folder_path: String::new(),
                albums_count: 1,
                local_albums_count: 1,
                missing_albums_count: 0,
                has_metadata: false,
                has_analysis: false,
                last_updated: String::new(),
                checksum: String::new(),
            })
            .collect();

        let unpaged = list_bands(
            &summaries,
            |_| None,
            &BandFilters::default(),
            SortKey::Name,
            SortOrder::Ascending,
            Pagination { page: 1, page_size: 100 },
        );

        let mut concatenated = Vec::new();
        let mut page = 1;
        loop {
            let result = list_bands(
                &summaries,
                |_| None,
                &BandFilters::default(),
                SortKey::Name,
                SortOrder::Ascending,
                Pagination { page, page_size: 3 },
            );
            concatenated.extend(result.bands.clone());
            if !result.has_next {
                break;
            }
            page += 1;
        }

        assert_eq!(concatenated, unpaged.bands);
    }

    #[test]
    fn sort_by_completion_breaks_ties_by_name() {
        let summaries = vec![
            BandSummary {
                name: "Metallica".to_string(),
                folder_path: String::new(),
                albums_count: 4,
                local_albums_count: 3,
                missing_albums_count: 1,
                has_metadata: true,
                has_analysis: false,
                last_updated: String::new(),
                checksum: String::new(),
            },
            BandSummary {
                name: "Iron Maiden".to_string(),
                folder_path: String::new(),
                albums_count: 2,
                local_albums_count: 1,
                missing_albums_count: 1,
                has_metadata: true,
                has_analysis: false,
                last_updated: String::new(),
                checksum: String::new(),
            },
        ];
        let result = list_bands(
            &summaries,
            |_| None,
            &BandFilters {
                filter_missing_albums: Some(true),
                ..Default::default()
            },
            SortKey::Completion,
            SortOrder::Descending,
            Pagination { page: 1, page_size: 10 },
        );
        assert_eq!(result.bands[0].name, "Metallica");
        assert_eq!(result.bands[1].name, "Iron Maiden");
    }

    #[test]
    fn search_albums_filters_by_local_and_type() {
        let mut band = sample_band("Metallica", 1, 1);
        band.albums[0].album_type = AlbumType::Ep;
        band.albums[0].year = "1987".to_string();
        band.analyze = Some(crate::core::domain::BandAnalysis {
            review: String::new(),
            rate: 0,
            similar_bands: vec![],
            albums: vec![AlbumAnalysisEntry {
                album_name: "Local 0".to_string(),
                review: String::new(),
                rate: 9,
            }],
        });

        let hits = search_albums(
            &[band],
            &AlbumSearchFilters {
                album_types: Some(vec![AlbumType::Ep]),
                year_min: Some(1980),
                is_local: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rating, Some(9));
    }
}
