//! Greedy longest-match segmentation of Hanzi runs into dictionary
//! pronunciations.

use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::dict::Dictionary;
use crate::{AmbiguousPolicy, UnknownPolicy};

/// Placeholder emitted for unmatched Hanzi under [`UnknownPolicy::Mark`].
pub const UNKNOWN_MARK: &str = "<?>";

/// CJK Unified Ideographs, Extension A, Compatibility Ideographs, and
/// Extension B.
pub fn is_hanzi(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}')
}

pub fn contains_hanzi(text: &str) -> bool {
    text.chars().any(is_hanzi)
}

fn is_wordish(c: char) -> bool {
    matches!(
        c.general_category_group(),
        GeneralCategoryGroup::Letter | GeneralCategoryGroup::Mark | GeneralCategoryGroup::Number
    )
}

fn needs_space(out: &str, seg: &str) -> bool {
    match (out.chars().next_back(), seg.chars().next()) {
        (Some(prev), Some(first)) => is_wordish(prev) && is_wordish(first),
        _ => false,
    }
}

/// Replace Hanzi runs in `text` with dictionary pronunciations.
///
/// A single left-to-right scan: at each Hanzi position the longest
/// dictionary key starting there wins, bounded by the dictionary's longest
/// key. The scan never backtracks to reconsider a shorter match. Non-Hanzi
/// characters are copied through unchanged, and a space separates two
/// adjacent emitted segments only when both sides are letter/mark/number
/// characters.
pub fn hanzi_to_tailo(
    text: &str,
    dict: &Dictionary,
    ambiguous: AmbiguousPolicy,
    unknown: UnknownPolicy,
) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if !is_hanzi(ch) {
            out.push(ch);
            i += 1;
            continue;
        }

        let window = dict.max_key_len().min(chars.len() - i);
        let hit = (1..=window).rev().find_map(|len| {
            let cand: String = chars[i..i + len].iter().collect();
            dict.lookup(&cand)
                .filter(|vals| !vals.is_empty())
                .map(|vals| (len, vals))
        });

        match hit {
            Some((len, vals)) => {
                let seg = match ambiguous {
                    AmbiguousPolicy::First => vals[0].clone(),
                    AmbiguousPolicy::All => format!("{{{}}}", vals.join("/")),
                };
                if needs_space(&out, &seg) {
                    out.push(' ');
                }
                out.push_str(&seg);
                i += len;
            }
            None => {
                match unknown {
                    UnknownPolicy::Mark => {
                        if out.chars().next_back().is_some_and(is_wordish) {
                            out.push(' ');
                        }
                        out.push_str(UNKNOWN_MARK);
                    }
                    UnknownPolicy::Keep => out.push(ch),
                }
                i += 1;
            }
        }
    }

    out
}
