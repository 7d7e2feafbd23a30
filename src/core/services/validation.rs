//! Band record validation with remediation hints (§4.3, §7), grounded in
//! the original collection's `validate_band_metadata` tool: common
//! field-name mistakes and structural errors get a specific suggestion,
//! not just "schema invalid".

use crate::core::domain::{Album, AlbumType, Band};
use crate::core::errors::RemediationHint;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub schema_valid: bool,
    pub missing_required_fields: Vec<String>,
    pub unexpected_fields: Vec<String>,
}

impl ValidationReport {
    pub fn hints(&self) -> Vec<RemediationHint> {
        self.issues
            .iter()
            .filter_map(|issue| {
                issue
                    .suggestion
                    .as_ref()
                    .map(|s| RemediationHint::new(issue.field.clone(), s.clone()))
            })
            .collect()
    }
}

const REQUIRED_FIELDS: [&str; 7] = [
    "band_name",
    "formed",
    "genres",
    "origin",
    "members",
    "description",
    "albums",
];

const EXPECTED_FIELDS: [&str; 11] = [
    "band_name",
    "formed",
    "genres",
    "origin",
    "members",
    "description",
    "albums",
    "albums_missing",
    "analyze",
    "last_updated",
    "albums_count",
];

const COMMON_FIELD_ERRORS: [(&str, &str); 4] = [
    ("genre", "genres"),
    ("formed_year", "formed"),
    ("formed_location", "origin"),
    ("notable_albums", "albums"),
];

/// Validates a raw JSON record before it is parsed into a [`Band`] — this is
/// where client-facing mistakes (wrong field name, wrong shape) get a
/// specific remediation hint rather than a generic parse failure.
pub fn validate_raw_record(band_name: &str, raw: &Value) -> ValidationReport {
    let mut issues = Vec::new();
    let obj = raw.as_object();

    for (wrong, correct) in COMMON_FIELD_ERRORS {
        if obj.is_some_and(|o| o.contains_key(wrong)) {
            issues.push(ValidationIssue {
                field: wrong.to_string(),
                message: format!("field '{}' should be '{}'", wrong, correct),
                suggestion: Some(format!("rename '{}' to '{}'", wrong, correct)),
            });
        }
    }

    if let Some(members) = obj.and_then(|o| o.get("members")) {
        if members.is_object() {
            issues.push(ValidationIssue {
                field: "members".to_string(),
                message: "field 'members' should be a flat list, not a nested object with 'former'/'current'".to_string(),
                suggestion: Some("flatten members into a single array, e.g. [\"member1\", \"member2\"]".to_string()),
            });
        }
    }

    let mut missing_required_fields = Vec::new();
    for field in REQUIRED_FIELDS {
        if !obj.is_some_and(|o| o.contains_key(field)) {
            missing_required_fields.push(field.to_string());
            issues.push(ValidationIssue {
                field: field.to_string(),
                message: format!("missing required field '{}'", field),
                suggestion: Some(format!("add required field '{}'", field)),
            });
        }
    }

    if let Some(formed) = obj.and_then(|o| o.get("formed")) {
        if !formed.is_string() {
            issues.push(ValidationIssue {
                field: "formed".to_string(),
                message: format!(
                    "field 'formed' should be a string (YYYY format), got {}",
                    type_name(formed)
                ),
                suggestion: Some("convert 'formed' to a string, e.g. \"1965\" not 1965".to_string()),
            });
        }
    }

    let mut unexpected_fields = Vec::new();
    if let Some(obj) = obj {
        for field in obj.keys() {
            if !EXPECTED_FIELDS.contains(&field.as_str()) {
                unexpected_fields.push(field.clone());
                issues.push(ValidationIssue {
                    field: field.clone(),
                    message: format!("unexpected field '{}'", field),
                    suggestion: Some(format!("unexpected field '{}' - check spelling", field)),
                });
            }
        }
    }

    if let Some(name) = obj.and_then(|o| o.get("band_name")).and_then(|v| v.as_str()) {
        if name != band_name {
            issues.push(ValidationIssue {
                field: "band_name".to_string(),
                message: format!("band_name '{}' does not match requested band '{}'", name, band_name),
                suggestion: Some(format!("set band_name to \"{}\"", band_name)),
            });
        }
    }

    let schema_valid = serde_json::from_value::<Band>(raw.clone()).is_ok();
    if !schema_valid {
        issues.push(ValidationIssue {
            field: "<root>".to_string(),
            message: "record does not match the band metadata schema".to_string(),
            suggestion: None,
        });
    }

    let valid = schema_valid && missing_required_fields.is_empty() && unexpected_fields.is_empty();

    ValidationReport {
        valid,
        issues,
        schema_valid,
        missing_required_fields,
        unexpected_fields,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validates invariants over an already-typed [`Band`] (§3): this runs after
/// a record has successfully parsed, on every save and on `ApplyScan`.
pub fn validate_invariants(band: &Band) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !is_valid_year(&band.formed) {
        issues.push(ValidationIssue {
            field: "formed".to_string(),
            message: format!("'formed' must be a 4-digit string or empty, got \"{}\"", band.formed),
            suggestion: Some("send a 4-digit year string, e.g. \"1965\", or \"\"".to_string()),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for album in band.albums.iter().chain(band.albums_missing.iter()) {
        if !seen.insert(album.key()) {
            issues.push(ValidationIssue {
                field: "albums".to_string(),
                message: format!(
                    "duplicate album key ({}, {}, {})",
                    album.album_name, album.year, album.edition
                ),
                suggestion: Some("each (title, year, edition) triple must be unique across local and missing albums".to_string()),
            });
        }
        validate_album(album, &mut issues);
    }

    let local_keys: std::collections::HashSet<_> = band.albums.iter().map(Album::key).collect();
    let missing_keys: std::collections::HashSet<_> =
        band.albums_missing.iter().map(Album::key).collect();
    if local_keys.intersection(&missing_keys).next().is_some() {
        issues.push(ValidationIssue {
            field: "albums".to_string(),
            message: "an album key appears in both the local and missing lists".to_string(),
            suggestion: Some("an album must sit in exactly one of 'albums' or 'albums_missing'".to_string()),
        });
    }

    if let Some(analysis) = &band.analyze {
        if analysis.rate > 10 {
            issues.push(ValidationIssue {
                field: "analyze.rate".to_string(),
                message: format!("rating {} is outside [0, 10]", analysis.rate),
                suggestion: Some("'rate' fields must be between 0 and 10".to_string()),
            });
        }
        for entry in &analysis.albums {
            if entry.rate > 10 {
                issues.push(ValidationIssue {
                    field: format!("analyze.albums[{}].rate", entry.album_name),
                    message: format!("rating {} is outside [0, 10]", entry.rate),
                    suggestion: Some("'rate' fields must be between 0 and 10".to_string()),
                });
            }
        }
    }

    issues
}

fn validate_album(album: &Album, issues: &mut Vec<ValidationIssue>) {
    if !is_valid_year(&album.year) {
        issues.push(ValidationIssue {
            field: format!("albums[{}].year", album.album_name),
            message: format!("'year' must be a 4-digit string or empty, got \"{}\"", album.year),
            suggestion: Some("send a 4-digit year string, e.g. \"1973\", or \"\"".to_string()),
        });
    }
    if album.album_name.trim().is_empty() {
        issues.push(ValidationIssue {
            field: "album_name".to_string(),
            message: "album_name must not be empty".to_string(),
            suggestion: None,
        });
    }
}

fn is_valid_year(year: &str) -> bool {
    year.is_empty() || (year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
}

/// Warns when a raw type string does not match any canonical spelling and
/// will coerce to `Album` (§3, §4.1 rule 5).
pub fn unrecognized_album_type_warning(raw_type: &str) -> Option<String> {
    let canonical = AlbumType::ALL
        .iter()
        .any(|t| t.as_str().eq_ignore_ascii_case(raw_type.trim()));
    if canonical {
        None
    } else {
        Some(format!(
            "unknown album type \"{}\"; coerced to \"Album\"",
            raw_type
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_common_field_name_mistakes() {
        let raw = json!({
            "band_name": "Metallica",
            "genre": ["Thrash Metal"],
            "formed": "1981",
            "origin": "Los Angeles",
            "members": ["James Hetfield"],
            "description": "...",
            "albums": []
        });
        let report = validate_raw_record("Metallica", &raw);
        assert!(report.issues.iter().any(|i| i.field == "genre"));
    }

    #[test]
    fn flags_nested_members_object() {
        let raw = json!({
            "band_name": "Metallica",
            "formed": "1981",
            "genres": ["Thrash Metal"],
            "origin": "Los Angeles",
            "members": {"current": ["James Hetfield"], "former": []},
            "description": "...",
            "albums": []
        });
        let report = validate_raw_record("Metallica", &raw);
        assert!(report.issues.iter().any(|i| i.field == "members"));
    }

    #[test]
    fn flags_numeric_formed_year() {
        let raw = json!({
            "band_name": "Metallica",
            "formed": 1981,
            "genres": ["Thrash Metal"],
            "origin": "Los Angeles",
            "members": ["James Hetfield"],
            "description": "...",
            "albums": []
        });
        let report = validate_raw_record("Metallica", &raw);
        assert!(report.issues.iter().any(|i| i.field == "formed"));
    }

    #[test]
    fn valid_record_has_no_issues() {
        let raw = json!({
            "band_name": "Metallica",
            "formed": "1981",
            "genres": ["Thrash Metal"],
            "origin": "Los Angeles",
            "members": ["James Hetfield"],
            "description": "...",
            "albums": []
        });
        let report = validate_raw_record("Metallica", &raw);
        assert!(report.valid, "{:?}", report.issues);
    }

    #[test]
    fn detects_duplicate_album_keys() {
        let mut band = Band::new("Metallica");
        let album = Album {
            album_name: "Kill 'Em All".to_string(),
            year: "1983".to_string(),
            album_type: AlbumType::Album,
            edition: String::new(),
            track_count: 10,
            duration: None,
            genres: vec![],
            folder_path: Some("Kill 'Em All".to_string()),
        };
        band.albums.push(album.clone());
        band.albums_missing.push(album);
        let issues = validate_invariants(&band);
        assert!(issues.iter().any(|i| i.message.contains("both the local and missing")));
    }
}
