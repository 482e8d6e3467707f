//! POJ-style romanization into Tâi-lô: orthography rewrites, tone-number
//! parsing, and tone-mark placement.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

static ROMAN_SYLLABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+[1-9]?").unwrap());
static ROMAN_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+[1-9]").unwrap());

/// Combining diacritic for a marked tone. Tones 1 and 4 carry no mark.
fn tone_combining_mark(tone: u8) -> Option<char> {
    match tone {
        2 => Some('\u{0301}'), // acute
        3 => Some('\u{0300}'), // grave
        5 => Some('\u{0302}'), // circumflex
        6 => Some('\u{030C}'), // caron
        7 => Some('\u{0304}'), // macron
        8 => Some('\u{030D}'), // vertical line above
        _ => None,
    }
}

fn tone_of_mark(c: char) -> Option<u8> {
    match c {
        '\u{0301}' => Some(2),
        '\u{0300}' => Some(3),
        '\u{0302}' => Some(5),
        '\u{030C}' => Some(6),
        '\u{0304}' => Some(7),
        '\u{030D}' => Some(8),
        _ => None,
    }
}

/// Precomposed vowel-with-tone forms. Tone 8 (U+030D) never precomposes,
/// nor do the syllabic consonants m/n; those fall back to a combining mark.
fn precomposed(base: char, tone: u8) -> Option<char> {
    let row = match base {
        'a' => ['á', 'à', 'â', 'ǎ', 'ā'],
        'e' => ['é', 'è', 'ê', 'ě', 'ē'],
        'i' => ['í', 'ì', 'î', 'ǐ', 'ī'],
        'o' => ['ó', 'ò', 'ô', 'ǒ', 'ō'],
        'u' => ['ú', 'ù', 'û', 'ǔ', 'ū'],
        _ => return None,
    };
    let slot = match tone {
        2 => 0,
        3 => 1,
        5 => 2,
        6 => 3,
        7 => 4,
        _ => return None,
    };
    Some(row[slot])
}

/// Rewrite a POJ-ish syllable body into Tâi-lô spelling.
///
/// Nasal marker (`ⁿ`/`N`) becomes `nn`, then lowercase, then the digraph
/// rewrites: `chh`→`tsh`, `ch`→`ts` (prefix only), `oe`→`ue`, `oa`→`ua`.
/// Each rule is applied in one left-to-right pass, never re-scanned.
pub fn to_tailo_orthography(syllable: &str) -> String {
    let mut s = syllable
        .replace('ⁿ', "nn")
        .replace('N', "nn")
        .to_lowercase();

    if s.starts_with("chh") {
        s.replace_range(..3, "tsh");
    } else if s.starts_with("ch") {
        s.replace_range(..2, "ts");
    }

    s = s.replace("oe", "ue");
    s = s.replace("oa", "ua");
    s
}

/// Index of the character the tone mark lands on, if any.
///
/// Vowel-letter priority a > e > o, first occurrence of the chosen letter;
/// otherwise the last of the combined i/u occurrences; otherwise a leading
/// syllabic `ng`/`m`.
fn pick_mark_index(body: &str) -> Option<usize> {
    let chars: Vec<char> = body.chars().collect();

    for vowel in ['a', 'e', 'o'] {
        if let Some(idx) = chars.iter().position(|&c| c == vowel) {
            return Some(idx);
        }
    }

    if let Some(idx) = chars.iter().rposition(|&c| c == 'i' || c == 'u') {
        return Some(idx);
    }

    if body.starts_with("ng") || body.starts_with('m') {
        return Some(0);
    }
    None
}

/// Place the diacritic for `tone` on `body`. Tones 1 and 4 are the identity.
pub fn apply_tone_mark(body: &str, tone: u8) -> String {
    if tone == 1 || tone == 4 {
        return body.to_string();
    }
    let Some(idx) = pick_mark_index(body) else {
        return body.to_string();
    };

    let chars: Vec<char> = body.chars().collect();
    let base = chars[idx];

    let mut out = String::with_capacity(body.len() + 2);
    out.extend(&chars[..idx]);
    if let Some(pre) = precomposed(base, tone) {
        out.push(pre);
    } else if let Some(mark) = tone_combining_mark(tone) {
        out.push(base);
        out.push(mark);
    } else {
        return body.to_string();
    }
    out.extend(&chars[idx + 1..]);
    out
}

/// Strip any tone diacritic from `token` and normalize the remainder
/// (NFC, `ⁿ`→`nn`, lowercase).
///
/// A token with no mark gets tone 4 if it ends in a stop coda (p/t/k/h),
/// else tone 1.
pub fn strip_tone(token: &str) -> (String, u8) {
    let mut tone = None;
    let mut stripped = String::with_capacity(token.len());
    for c in token.nfd() {
        if let Some(t) = tone_of_mark(c) {
            tone = Some(t);
            continue;
        }
        stripped.push(c);
    }

    let base: String = stripped.nfc().collect();
    let base = base.replace('ⁿ', "nn").to_lowercase();

    let tone = tone.unwrap_or(if base.ends_with(['p', 't', 'k', 'h']) { 4 } else { 1 });
    (base, tone)
}

fn convert_token(token: &str, orthography: bool) -> String {
    let (body, tone) = match token.chars().next_back() {
        Some(c @ '1'..='9') => (&token[..token.len() - 1], Some(c as u8 - b'0')),
        _ => (token, None),
    };

    let body = if orthography {
        to_tailo_orthography(body)
    } else {
        body.replace('N', "nn").to_lowercase()
    };

    match tone {
        Some(t) => apply_tone_mark(&body, t),
        None => body,
    }
}

/// Convert every romanized syllable in `text` (grammar: letters plus an
/// optional trailing tone digit 1–9) into Tâi-lô. Punctuation, hyphens,
/// and non-Latin text pass through unchanged.
pub fn convert_word(text: &str, orthography: bool) -> String {
    ROMAN_SYLLABLE_RE
        .replace_all(text.trim(), |caps: &Captures| {
            convert_token(&caps[0], orthography)
        })
        .into_owned()
}

/// Convert only syllables that carry a trailing tone digit, leaving bare
/// words alone. This is what keeps ordinary English text intact in auto
/// mode.
pub fn convert_numeric_tones(text: &str, orthography: bool) -> String {
    ROMAN_NUMERIC_RE
        .replace_all(text, |caps: &Captures| convert_token(&caps[0], orthography))
        .into_owned()
}
