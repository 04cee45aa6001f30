//! Case folding for case-insensitive matching.
//!
//! Folding maps a character to a canonical lower-case form. A single
//! character can fold to more than one (`ß` folds to `ss`), so every
//! function here works on short sequences. [`MAX_FOLD_LEN`] bounds the
//! length of a single-character expansion.

use smallvec::SmallVec;

/// Longest case-fold expansion of a single character.
pub const MAX_FOLD_LEN: usize = 3;

/// The folded form of one character.
pub type Folded = SmallVec<[char; MAX_FOLD_LEN]>;

/// Fold one character.
pub fn fold_char(c: char) -> Folded {
    let mut out = Folded::new();
    match c {
        'ß' | 'ẞ' => {
            out.push('s');
            out.push('s');
        }
        _ if c.is_ascii() => out.push(c.to_ascii_lowercase()),
        _ => out.extend(c.to_lowercase().take(MAX_FOLD_LEN)),
    }
    out
}

/// Fold a whole string into a sequence of folded characters.
pub fn fold_str(s: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        out.extend(fold_char(c));
    }
    out
}

/// Fold a string into a `String`.
pub fn fold_string(s: &str) -> String {
    fold_str(s).into_iter().collect()
}

/// Compare two characters ignoring case.
pub fn eq_no_case(a: char, b: char) -> bool {
    a == b || fold_char(a) == fold_char(b)
}

/// Match already-folded `expected` against the start of `input`.
///
/// Returns the number of input bytes consumed when the folded input
/// lines up with `expected` exactly on a character boundary, `None`
/// otherwise.
pub fn match_folded(input: &str, expected: &[char]) -> Option<usize> {
    if expected.is_empty() {
        return Some(0);
    }
    let mut matched = 0;
    for (offset, c) in input.char_indices() {
        for folded in fold_char(c) {
            if expected.get(matched) != Some(&folded) {
                return None;
            }
            matched += 1;
        }
        if matched == expected.len() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

/// Check if `c`, in any case, falls in `lo..=hi`.
pub fn in_range_no_case(c: char, lo: char, hi: char) -> bool {
    let in_range = |c: char| lo <= c && c <= hi;
    in_range(c)
        || c.to_lowercase().any(in_range)
        || c.to_uppercase().any(in_range)
}
