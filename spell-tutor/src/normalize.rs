//! Text normalization for player input.
//!
//! Everything the detector matches against goes through [`normalize`] first,
//! and every spell-name comparison goes through [`match_key`].

/// Canonicalize player text for matching.
///
/// Lower-cases, replaces typographic quotes, dashes and exotic whitespace with
/// their ASCII forms, collapses whitespace runs and trims the ends. A run that
/// contains a line break becomes a single `\n`, since a line break ends a
/// sentence. `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    collapse(text.chars().flat_map(char::to_lowercase).map(fold_punctuation))
}

/// Like [`normalize`] but keeps the player's casing, for display.
pub fn clean(text: &str) -> String {
    collapse(text.chars().map(fold_punctuation))
}

/// The identity used to compare a candidate with a canonical spell name:
/// ASCII letters and digits only, lower-cased.
///
/// "Mage Hand", "magehand" and "MAGE-HAND" all share the key `magehand`.
pub fn match_key(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn fold_punctuation(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '`' | '\u{00B4}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => '"',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => '-',
        '\u{2026}' => '.',
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => '\n',
        c if c.is_whitespace() => ' ',
        c => c,
    }
}

/// Collapse whitespace runs left by [`fold_punctuation`]. Leading and trailing
/// runs are dropped.
fn collapse(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    let mut pending: Option<char> = None;
    for c in chars {
        if c == ' ' || c == '\n' {
            if !out.is_empty() && pending != Some('\n') {
                pending = Some(c);
            }
            continue;
        }
        if let Some(gap) = pending.take() {
            out.push(gap);
        }
        out.push(c);
    }
    out
}
