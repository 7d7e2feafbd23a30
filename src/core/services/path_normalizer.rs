//! Path & Name Normalizer (C1): folder names are the only information the
//! scanner has about an album; this turns one into structured attributes
//! (§4.1).

use crate::core::domain::AlbumType;

const TYPE_SUBFOLDER_NAMES: [(&str, AlbumType); 8] = [
    ("album", AlbumType::Album),
    ("ep", AlbumType::Ep),
    ("live", AlbumType::Live),
    ("demo", AlbumType::Demo),
    ("compilation", AlbumType::Compilation),
    ("single", AlbumType::Single),
    ("instrumental", AlbumType::Instrumental),
    ("split", AlbumType::Split),
];

/// Structured attributes parsed from one album folder name, optionally
/// qualified by the type subfolder it sits directly under.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAlbum {
    pub title: String,
    pub year: String,
    pub edition: String,
    pub album_type: AlbumType,
    /// True when the type came from rule 2 (a type subfolder), which beats
    /// keyword inference (rule 4).
    pub type_from_subfolder: bool,
}

/// Classifies a subfolder name as one of the eight known album types.
/// Case-insensitive; tolerates a trailing "s" (`Albums`, `EPs`, …).
pub fn classify_type_subfolder(name: &str) -> Option<AlbumType> {
    let lower = name.trim().to_ascii_lowercase();
    let singular = lower.strip_suffix('s').unwrap_or(&lower);
    TYPE_SUBFOLDER_NAMES
        .iter()
        .find(|(n, _)| *n == singular || *n == lower)
        .map(|(_, t)| *t)
}

/// Parses one album folder name, given the (already-classified) type
/// subfolder it lives under, if any.
pub fn parse_album_folder(folder_name: &str, type_subfolder: Option<AlbumType>) -> ParsedAlbum {
    let (year, rest) = strip_year_prefix(folder_name);
    let (title, edition) = extract_edition_suffix(&rest);

    let (album_type, type_from_subfolder) = match type_subfolder {
        Some(t) => (t, true),
        None => match infer_type_from_keywords(&title) {
            Some(t) => (t, false),
            None => (AlbumType::Album, false),
        },
    };

    ParsedAlbum {
        title,
        year,
        edition,
        album_type,
        type_from_subfolder,
    }
}

/// Rule 1: a `YYYY - ` prefix is stripped and recorded.
fn strip_year_prefix(name: &str) -> (String, String) {
    let bytes = name.as_bytes();
    if bytes.len() >= 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && &name[4..7] == " - "
    {
        (name[..4].to_string(), name[7..].to_string())
    } else {
        (String::new(), name.to_string())
    }
}

/// Rule 3: a trailing parenthesized clause is the edition. Case-preserving,
/// whitespace-trimmed.
fn extract_edition_suffix(name: &str) -> (String, String) {
    let trimmed = name.trim_end();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.rfind('(') {
            let edition = trimmed[open + 1..trimmed.len() - 1].trim().to_string();
            let title = trimmed[..open].trim_end().to_string();
            if !title.is_empty() {
                return (title, edition);
            }
        }
    }
    (trimmed.to_string(), String::new())
}

const KEYWORD_MAP: [(&str, AlbumType); 7] = [
    ("best of", AlbumType::Compilation),
    ("greatest hits", AlbumType::Compilation),
    ("compilation", AlbumType::Compilation),
    ("live", AlbumType::Live),
    ("demo", AlbumType::Demo),
    ("ep", AlbumType::Ep),
    ("single", AlbumType::Single),
];

/// Rule 4: word-boundary keyword inference over the title.
fn infer_type_from_keywords(title: &str) -> Option<AlbumType> {
    let lower = title.to_ascii_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (phrase, album_type) in KEYWORD_MAP {
        let phrase_words: Vec<&str> = phrase.split(' ').collect();
        if contains_subsequence(&words, &phrase_words) {
            return Some(album_type);
        }
    }
    None
}

fn contains_subsequence(haystack: &[&str], needle: &[&str]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// The three folder structures a band's albums can sit in (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStructure {
    Default,
    Typed,
    Mixed,
}

/// Given, per album, whether it sat directly under the band folder (`true`)
/// or under a type subfolder (`false`), classifies the band's structure and
/// scores how strongly it conforms.
pub fn classify_folder_structure(album_is_direct: &[bool]) -> (FolderStructure, f64) {
    if album_is_direct.is_empty() {
        return (FolderStructure::Default, 1.0);
    }
    let direct_count = album_is_direct.iter().filter(|d| **d).count();
    let total = album_is_direct.len();
    if direct_count == total {
        (FolderStructure::Default, 1.0)
    } else if direct_count == 0 {
        (FolderStructure::Typed, 1.0)
    } else {
        let dominant = direct_count.max(total - direct_count);
        (FolderStructure::Mixed, dominant as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_year_prefix() {
        let parsed = parse_album_folder("1973 - The Dark Side of the Moon", None);
        assert_eq!(parsed.year, "1973");
        assert_eq!(parsed.title, "The Dark Side of the Moon");
        assert_eq!(parsed.edition, "");
        assert_eq!(parsed.album_type, AlbumType::Album);
    }

    #[test]
    fn extracts_edition_suffix() {
        let parsed =
            parse_album_folder("1973 - The Dark Side of the Moon (Remastered)", None);
        assert_eq!(parsed.year, "1973");
        assert_eq!(parsed.title, "The Dark Side of the Moon");
        assert_eq!(parsed.edition, "Remastered");
    }

    #[test]
    fn type_subfolder_wins_over_keywords() {
        let parsed = parse_album_folder("1985 - Live in Tokyo", Some(AlbumType::Compilation));
        assert_eq!(parsed.album_type, AlbumType::Compilation);
        assert!(parsed.type_from_subfolder);
    }

    #[test]
    fn keyword_inference_without_subfolder() {
        let parsed = parse_album_folder("Greatest Hits", None);
        assert_eq!(parsed.album_type, AlbumType::Compilation);
        assert!(!parsed.type_from_subfolder);

        let parsed = parse_album_folder("Unplugged Live Session", None);
        assert_eq!(parsed.album_type, AlbumType::Live);
    }

    #[test]
    fn classifies_subfolder_names_case_insensitively_and_plural() {
        assert_eq!(classify_type_subfolder("EPs"), Some(AlbumType::Ep));
        assert_eq!(classify_type_subfolder("live"), Some(AlbumType::Live));
        assert_eq!(classify_type_subfolder("Bonus"), None);
    }

    #[test]
    fn structure_classification() {
        assert_eq!(
            classify_folder_structure(&[true, true, true]).0,
            FolderStructure::Default
        );
        assert_eq!(
            classify_folder_structure(&[false, false]).0,
            FolderStructure::Typed
        );
        let (structure, score) = classify_folder_structure(&[true, true, false]);
        assert_eq!(structure, FolderStructure::Mixed);
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }
}
