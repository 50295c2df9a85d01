// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbol normalization.
//!
//! The theory layer spells chords one way ("C", "Cmaj7", "Bm7b5"), the
//! renderer accepts another ("CM", "CM7", "Bdim7"). This module holds
//! the deterministic rewrites between the two, plus roman-numeral and
//! degree conversions.

use crate::error::Result;
use crate::music::chord::split_symbol;
use crate::music::key::Key;
use crate::music::note::Note;

/// Collapse repeated accidentals in a symbol's root ("C##m" -> "Dm").
pub fn simplify_root(symbol: &str) -> String {
    match split_symbol(symbol) {
        Ok((root, quality)) => format!("{}{}", root, quality),
        Err(_) => symbol.to_string(),
    }
}

/// Rewrite a chord symbol into the renderer's accepted vocabulary.
///
/// Applied to both the diatonic chord sets and user-supplied symbols so
/// repeat-avoidance comparisons and rendering see identical spellings:
/// accidentals collapsed, "maj" -> "M", bare major roots tagged "M",
/// "mb5"/"m7b5" -> "dim"/"dim7", and short dominant sevenths suffixed
/// "th" so they cannot collide with scale-degree number tokens.
pub fn to_renderer(symbol: &str) -> String {
    let mut sym = simplify_root(symbol);
    sym = sym.replace("maj", "M").replace("Maj", "M");

    if let Ok((root, quality)) = split_symbol(&sym) {
        if quality.is_empty() {
            sym = format!("{}M", root);
        }
    }

    sym = sym.replace("m7b5", "dim7");
    sym = sym.replace("mb5", "dim");

    let chars: Vec<char> = sym.chars().collect();
    let second = chars.get(1).copied();
    let third = chars.get(2).copied();
    let seventh_at_root = second == Some('7')
        || (matches!(second, Some('#') | Some('b')) && third == Some('7'));
    if chars.len() < 4 && seventh_at_root {
        sym.push_str("th");
    }
    sym = sym.replace("thth", "th");

    sym
}

/// Convert a roman-numeral token to an absolute chord symbol.
///
/// Accepts i-vii with an optional trailing "7". Lowercase numerals spell
/// minor, uppercase major; the degree root comes from the major scale of
/// the key tonic. Returns `None` when the token is not a numeral, so the
/// caller can fall through to explicit-symbol handling. Detection is a
/// whole-token match, not the substring probe the quality tags would
/// defeat ("Bdim", "Cmin").
pub fn roman_to_absolute(tonic: Note, token: &str) -> Option<String> {
    let (numeral, seventh) = match token.strip_suffix('7') {
        Some(head) => (head, true),
        None => (token, false),
    };
    if numeral.is_empty() || !numeral.chars().all(|c| matches!(c, 'i' | 'v' | 'I' | 'V')) {
        return None;
    }

    let degree = match numeral.to_lowercase().as_str() {
        "i" => 1,
        "ii" => 2,
        "iii" => 3,
        "iv" => 4,
        "v" => 5,
        "vi" => 6,
        "vii" => 7,
        _ => return None,
    };
    let minor = numeral.chars().all(|c| c.is_lowercase());

    const MAJOR: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
    let root = tonic.transpose(MAJOR[degree - 1] as i32);

    let quality = match (minor, seventh) {
        (true, false) => "m",
        (true, true) => "m7",
        (false, false) => "M",
        (false, true) => "M7",
    };
    Some(format!("{}{}", root, quality))
}

/// Scale degree (1-7) of a chord's root within a key, 0 when the root is
/// not a scale note. Degree 0 addresses the transition map's start row.
pub fn degree_of_chord(key: &Key, symbol: &str) -> Result<usize> {
    let (root, _) = split_symbol(symbol)?;
    Ok(key.degree_of(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::key::Mode;

    #[test]
    fn test_simplify_root() {
        assert_eq!(simplify_root("C##m"), "Dm");
        assert_eq!(simplify_root("Abb7"), "G7");
        assert_eq!(simplify_root("F#m"), "F#m");
    }

    #[test]
    fn test_to_renderer_major_tagging() {
        assert_eq!(to_renderer("C"), "CM");
        assert_eq!(to_renderer("F#"), "F#M");
        assert_eq!(to_renderer("Bb"), "A#M");
        assert_eq!(to_renderer("Cmaj7"), "CM7");
        assert_eq!(to_renderer("CMaj7"), "CM7");
    }

    #[test]
    fn test_to_renderer_diminished_rewrites() {
        assert_eq!(to_renderer("Bmb5"), "Bdim");
        assert_eq!(to_renderer("Bm7b5"), "Bdim7");
    }

    #[test]
    fn test_to_renderer_seventh_disambiguation() {
        assert_eq!(to_renderer("G7"), "G7th");
        assert_eq!(to_renderer("F#7"), "F#7th");
        assert_eq!(to_renderer("G7th"), "G7th");
        // Long symbols keep their tail untouched
        assert_eq!(to_renderer("C7b9"), "C7b9");
    }

    #[test]
    fn test_to_renderer_leaves_minor_alone() {
        assert_eq!(to_renderer("Dm"), "Dm");
        assert_eq!(to_renderer("Am7"), "Am7");
    }

    #[test]
    fn test_roman_to_absolute() {
        assert_eq!(roman_to_absolute(Note::C, "ii").unwrap(), "Dm");
        assert_eq!(roman_to_absolute(Note::C, "V").unwrap(), "GM");
        assert_eq!(roman_to_absolute(Note::C, "V7").unwrap(), "GM7");
        assert_eq!(roman_to_absolute(Note::C, "vii7").unwrap(), "Bm7");
        assert_eq!(roman_to_absolute(Note::G, "IV").unwrap(), "CM");
    }

    #[test]
    fn test_roman_rejects_non_numerals() {
        assert_eq!(roman_to_absolute(Note::C, "Bdim"), None);
        assert_eq!(roman_to_absolute(Note::C, "Cmin"), None);
        assert_eq!(roman_to_absolute(Note::C, "R"), None);
        assert_eq!(roman_to_absolute(Note::C, "viii"), None);
    }

    #[test]
    fn test_degree_of_chord() {
        let key = Key::new(Note::C, Mode::Ionian);
        assert_eq!(degree_of_chord(&key, "GM").unwrap(), 5);
        assert_eq!(degree_of_chord(&key, "Am7").unwrap(), 6);
        assert_eq!(degree_of_chord(&key, "F#dim").unwrap(), 0);
    }
}
