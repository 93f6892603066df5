//! Guess matching against canonical Pokémon names.
//!
//! Both operands are lowercased, a fixed set of accented Latin letters is
//! folded to its base letter, and every character outside `[a-z0-9]` is
//! dropped. There is no fuzzy tolerance: "pikachou" is not "Pikachu".

/// Fold one lowercased character, or `None` if it should be dropped.
fn fold(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    };
    (base.is_ascii_lowercase() || base.is_ascii_digit()).then_some(base)
}

/// Normalize a name for comparison.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().chars().filter_map(fold).collect()
}

/// Returns `true` if the guess names the same Pokémon as `canonical`.
///
/// Names with nothing left after normalization (Japanese names, for one)
/// are compared as trimmed lowercase text instead.
pub fn names_match(guess: &str, canonical: &str) -> bool {
    let (guess_norm, canonical_norm) = (normalize_name(guess), normalize_name(canonical));
    if guess_norm.is_empty() || canonical_norm.is_empty() {
        return guess.trim().to_lowercase() == canonical.trim().to_lowercase();
    }
    guess_norm == canonical_norm
}
