//! Tâi-lô syllables into IPA with superscript tone numerals.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::romanize::strip_tone;

const SYLLABIC: char = '\u{0329}'; // combining vertical line below
const NASAL: char = '\u{0303}'; // combining tilde

/// Onsets in match order: longer candidates first so `tsh` wins over `ts`
/// and `ng` over `n`. The `chh`/`ch` aliases cover POJ-ish input that
/// skipped orthography normalization.
const ONSETS: &[(&str, &str)] = &[
    ("tsh", "t͡sʰ"),
    ("chh", "t͡sʰ"),
    ("ts", "t͡s"),
    ("ch", "t͡s"),
    ("ph", "pʰ"),
    ("th", "tʰ"),
    ("kh", "kʰ"),
    ("ng", "ŋ"),
    ("p", "p"),
    ("b", "b"),
    ("m", "m"),
    ("t", "t"),
    ("n", "n"),
    ("l", "l"),
    ("k", "k"),
    ("g", "ɡ"),
    ("h", "h"),
    ("s", "s"),
    ("j", "d͡z"),
];

/// Codas by longest applicable suffix; stops are unreleased, `h` is a
/// glottal stop.
const CODAS: &[(&str, &str)] = &[
    ("ng", "ŋ"),
    ("m", "m"),
    ("n", "n"),
    ("p", "p̚"),
    ("t", "t̚"),
    ("k", "k̚"),
    ("h", "ʔ"),
];

// Base letters accepted in a romanized syllable. Deliberately small so
// ordinary English words fall through unconverted.
const ALLOWED_BASE_LETTERS: &str = "abceghijklmnopstu";

const VOWELS: &str = "aeiou";
const IPA_VOWELS: &str = "aeiouɔ";

static TAILO_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z\u{00C0}-\u{024F}\u{1E00}-\u{1EFF}\u{0300}-\u{036F}\u{207F}]+").unwrap()
});

fn tone_superscript(tone: u8) -> &'static str {
    match tone {
        1 => "¹",
        2 => "²",
        3 => "³",
        4 => "⁴",
        5 => "⁵",
        6 => "⁶",
        7 => "⁷",
        8 => "⁸",
        _ => "",
    }
}

fn onset_ipa(onset: &str) -> Option<&'static str> {
    if onset.is_empty() {
        return Some("");
    }
    ONSETS.iter().find(|(o, _)| *o == onset).map(|&(_, ipa)| ipa)
}

fn split_onset(base: &str) -> (&'static str, &str) {
    for &(onset, _) in ONSETS {
        if let Some(rest) = base.strip_prefix(onset) {
            return (onset, rest);
        }
    }
    ("", base)
}

fn split_coda(rime: &str) -> (&'static str, &str) {
    for &(coda, _) in CODAS {
        if let Some(body) = rime.strip_suffix(coda) {
            return (coda, body);
        }
    }
    ("", rime)
}

/// A coda that can stand in as a syllabic nucleus (sng, hm, hng).
fn coda_syllabic(coda: &str) -> Option<&'static str> {
    match coda {
        "m" => Some("m"),
        "n" => Some("n"),
        "ng" => Some("ŋ"),
        _ => None,
    }
}

/// Gate before conversion: accept only tokens whose stripped base is a
/// syllabic nasal, contains a recognized vowel over allowed base letters,
/// or is a valid onset plus a syllabic nasal rime.
fn looks_like_tailo_syllable(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    let (base, _tone) = strip_tone(token);
    if base == "m" || base == "ng" {
        return true;
    }

    let has_vowel = base.chars().any(|c| VOWELS.contains(c));
    if !has_vowel {
        if let Some(prefix) = base.strip_suffix("ng")
            && onset_ipa(prefix).is_some()
        {
            return true;
        }
        if let Some(prefix) = base.strip_suffix('m')
            && onset_ipa(prefix).is_some()
        {
            return true;
        }
        return false;
    }

    base.nfd()
        .filter(|c| !matches!(c.general_category_group(), GeneralCategoryGroup::Mark))
        .all(|c| ALLOWED_BASE_LETTERS.contains(c))
}

/// Insert the nasal tilde after the last vowel of the rime. With no vowel
/// to carry it, the flag is dropped.
fn nasalize(nucleus: &str) -> String {
    let chars: Vec<char> = nucleus.chars().collect();
    if let Some(idx) = chars.iter().rposition(|&c| IPA_VOWELS.contains(c)) {
        let mut out = String::with_capacity(nucleus.len() + 2);
        out.extend(&chars[..=idx]);
        out.push(NASAL);
        out.extend(&chars[idx + 1..]);
        return out;
    }
    nucleus.to_string()
}

/// Convert one Tâi-lô-shaped syllable into IPA with a superscript tone
/// digit. Tokens that do not look like a plausible syllable are returned
/// unchanged.
pub fn syllable_to_ipa(token: &str) -> String {
    if !looks_like_tailo_syllable(token) {
        return token.to_string();
    }

    let (base, tone) = strip_tone(token);
    let sup = tone_superscript(tone);

    if base == "m" {
        return format!("m{SYLLABIC}{sup}");
    }
    if base == "ng" {
        return format!("ŋ{SYLLABIC}{sup}");
    }

    let (onset, mut rime) = split_onset(&base);
    let mut nasal = false;
    if rime.ends_with("nn") && rime.len() > 2 {
        nasal = true;
        rime = &rime[..rime.len() - 2];
    }

    let (coda, mut nucleus) = split_coda(rime);
    if nucleus.ends_with("nn") && nucleus.len() > 2 {
        nasal = true;
        nucleus = &nucleus[..nucleus.len() - 2];
    }

    let onset_ipa = onset_ipa(onset).unwrap_or("");

    if nucleus.is_empty() {
        if let Some(nasal_nucleus) = coda_syllabic(coda) {
            return format!("{onset_ipa}{nasal_nucleus}{SYLLABIC}{sup}");
        }
        // No rime left at all: malformed, hand the token back.
        return token.to_string();
    }

    // `oo` is plain [o]; a lone `o` is open [ɔ]. Protect the digraph
    // through the blanket rewrite.
    let mut nucleus_ipa = nucleus.replace("oo", "O").replace('o', "ɔ").replace('O', "o");
    if nasal {
        nucleus_ipa = nasalize(&nucleus_ipa);
    }

    let coda_ipa = CODAS
        .iter()
        .find(|(c, _)| *c == coda)
        .map(|&(_, ipa)| ipa)
        .unwrap_or("");

    format!("{onset_ipa}{nucleus_ipa}{coda_ipa}{sup}")
        .nfc()
        .collect()
}

/// Convert every romanization-shaped token in `text` into IPA, leaving
/// everything else untouched.
pub fn text_to_ipa(text: &str) -> String {
    TAILO_TOKEN_RE
        .replace_all(text, |caps: &Captures| syllable_to_ipa(&caps[0]))
        .into_owned()
}
