use std::io::Write;
use std::path::Path;

use tailo::{
    AmbiguousPolicy, ConvertOptions, Dictionary, Mode, OutputFormat, Tailo, TailoError,
    UnknownPolicy, apply_tone_mark, contains_hanzi, convert_numeric_tones, convert_word,
    hanzi_to_tailo, strip_tone, syllable_to_ipa, text_to_ipa, to_tailo_orthography,
};

fn demo_dictionary() -> Dictionary {
    Dictionary::from_pairs([
        ("一", "tsi̍t"),
        ("一", "it"),
        ("大", "tuā"),
        ("囝", "kiánn"),
        ("一大", "tsi̍t-tuā"),
    ])
}

#[test]
fn tone_mark_round_trip() {
    for body in ["a", "tsi", "kiann", "tuann", "hue", "liu", "ng", "m", "sim"] {
        for tone in [2u8, 3, 5, 6, 7, 8] {
            let marked = apply_tone_mark(body, tone);
            assert_eq!(
                strip_tone(&marked),
                (body.to_string(), tone),
                "body={body} tone={tone} marked={marked}"
            );
        }
    }
}

#[test]
fn tones_one_and_four_are_unmarked() {
    assert_eq!(apply_tone_mark("tsit", 4), "tsit");
    assert_eq!(apply_tone_mark("e", 1), "e");
    // Tone 4 is implied by a stop coda, tone 1 otherwise.
    assert_eq!(strip_tone("tsit"), ("tsit".to_string(), 4));
    assert_eq!(strip_tone("kiann"), ("kiann".to_string(), 1));
}

#[test]
fn mark_lands_by_vowel_priority() {
    // a > e > o, first occurrence of the chosen letter.
    assert_eq!(apply_tone_mark("ue", 7), "uē");
    assert_eq!(apply_tone_mark("uan", 5), "uân");
    // No a/e/o: the last of the i/u positions.
    assert_eq!(apply_tone_mark("liu", 2), "liú");
    assert_eq!(apply_tone_mark("ui", 2), "uí");
    // Syllabic consonants take the mark on the leading letter.
    assert_eq!(apply_tone_mark("ng", 5), "n\u{0302}g");
    assert_eq!(apply_tone_mark("m", 7), "m\u{0304}");
}

#[test]
fn orthography_rewrites() {
    assert_eq!(to_tailo_orthography("chit"), "tsit");
    assert_eq!(to_tailo_orthography("chhiN"), "tshinn");
    assert_eq!(to_tailo_orthography("toa"), "tua");
    assert_eq!(to_tailo_orthography("boe"), "bue");
    assert_eq!(to_tailo_orthography("KiaN"), "kiann");
}

#[test]
fn convert_word_basic() {
    assert_eq!(convert_word("chit8", true), "tsi̍t");
    assert_eq!(convert_word("boe7", true), "buē");
    assert_eq!(convert_word("toa7", true), "tuā");
    assert_eq!(convert_word("kiaN2", true), "kiánn");
}

#[test]
fn convert_word_leaves_punctuation_alone() {
    assert_eq!(convert_word("chit8, (toa7)!", true), "tsi̍t, (tuā)!");
    assert_eq!(convert_word("tai5-oan5", true), "tâi-uân");
}

#[test]
fn convert_word_without_orthography() {
    assert_eq!(convert_word("chit8", false), "chi̍t");
    assert_eq!(convert_word("kiaN2", false), "kiánn");
}

#[test]
fn digit_zero_is_not_a_tone() {
    assert_eq!(convert_word("chit0", true), "tsit0");
}

#[test]
fn numeric_conversion_only_touches_toned_tokens() {
    assert_eq!(convert_numeric_tones("foo chit8 bar", true), "foo tsi̍t bar");
    assert_eq!(
        convert_numeric_tones("just some words", true),
        "just some words"
    );
}

#[test]
fn longest_match_wins() {
    let dict = demo_dictionary();
    assert_eq!(
        hanzi_to_tailo("一大囝", &dict, AmbiguousPolicy::First, UnknownPolicy::Keep),
        "tsi̍t-tuā kiánn"
    );
}

#[test]
fn ambiguous_all_lists_every_pronunciation() {
    let dict = demo_dictionary();
    assert_eq!(
        hanzi_to_tailo("一", &dict, AmbiguousPolicy::All, UnknownPolicy::Keep),
        "{tsi̍t/it}"
    );
}

#[test]
fn unknown_mark_emits_placeholder() {
    let dict = demo_dictionary();
    assert_eq!(
        hanzi_to_tailo("二", &dict, AmbiguousPolicy::First, UnknownPolicy::Mark),
        "<?>"
    );
    assert_eq!(
        hanzi_to_tailo("一二", &dict, AmbiguousPolicy::First, UnknownPolicy::Mark),
        "tsi̍t <?>"
    );
}

#[test]
fn unknown_keep_copies_the_character() {
    let dict = demo_dictionary();
    assert_eq!(
        hanzi_to_tailo("一二", &dict, AmbiguousPolicy::First, UnknownPolicy::Keep),
        "tsi̍t二"
    );
}

#[test]
fn no_space_next_to_punctuation() {
    let dict = demo_dictionary();
    assert_eq!(
        hanzi_to_tailo("一。一", &dict, AmbiguousPolicy::First, UnknownPolicy::Keep),
        "tsi̍t。tsi̍t"
    );
}

#[test]
fn hanzi_detection() {
    assert!(contains_hanzi("abc 一 def"));
    assert!(!contains_hanzi("abc def"));
    assert!(!contains_hanzi("カタカナ"));
}

#[test]
fn loads_csv_and_collapses_duplicates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "word,chinese").unwrap();
    writeln!(file, "chit8,[一]").unwrap();
    writeln!(file, "it4,[一]").unwrap();
    writeln!(file, "chit8,[一]").unwrap();
    writeln!(file, "tai5-oan5,[台灣]").unwrap();
    writeln!(file, ",[空]").unwrap();
    writeln!(file, "boe7,[]").unwrap();
    writeln!(file, "boe7,no-brackets").unwrap();

    let dict = Dictionary::from_csv_path(file.path(), true).unwrap();
    assert_eq!(
        dict.lookup("一"),
        Some(["tsi̍t".to_string(), "it".to_string()].as_slice())
    );
    assert_eq!(
        dict.lookup("台灣"),
        Some(["tâi-uân".to_string()].as_slice())
    );
    assert_eq!(dict.lookup("空"), None);
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.max_key_len(), 2);
}

#[test]
fn source_with_no_usable_rows_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "word,chinese").unwrap();
    writeln!(file, "x1,not-bracketed").unwrap();

    match Dictionary::from_csv_path(file.path(), true) {
        Err(TailoError::EmptyDictionary { .. }) => {}
        other => panic!("expected EmptyDictionary, got {other:?}"),
    }
}

#[test]
fn missing_source_is_an_error() {
    match Dictionary::from_csv_path(Path::new("no-such-dict.csv"), true) {
        Err(TailoError::SourceNotFound { .. }) => {}
        other => panic!("expected SourceNotFound, got {other:?}"),
    }
}

#[test]
fn syllable_ipa() {
    assert_eq!(syllable_to_ipa("tsi̍t"), "t͡sit̚⁸");
    assert_eq!(syllable_to_ipa("ê"), "e⁵");
    assert_eq!(syllable_to_ipa("buē"), "bue⁷");
    assert_eq!(syllable_to_ipa("kiánn"), "kiã²");
    assert_eq!(syllable_to_ipa("ia̍h"), "iaʔ⁸");
}

#[test]
fn ipa_oo_versus_o() {
    // `oo` is plain [o]; a bare `o` opens to [ɔ].
    assert_eq!(syllable_to_ipa("oo"), "o¹");
    assert_eq!(syllable_to_ipa("o"), "ɔ¹");
}

#[test]
fn ipa_syllabic_nasals() {
    assert_eq!(syllable_to_ipa("m̄"), "m\u{0329}⁷");
    assert_eq!(syllable_to_ipa("ng"), "ŋ\u{0329}¹");
    assert_eq!(syllable_to_ipa("sng"), "sŋ\u{0329}¹");
}

#[test]
fn ipa_keeps_foreign_words() {
    assert_eq!(syllable_to_ipa("world"), "world");
    assert_eq!(text_to_ipa("xyz 123"), "xyz 123");
}

#[test]
fn ipa_in_text() {
    assert_eq!(text_to_ipa("tsi̍t ê"), "t͡sit̚⁸ e⁵");
    assert_eq!(text_to_ipa("{tsi̍t/it}"), "{t͡sit̚⁸/it̚⁴}");
}

#[test]
fn auto_mode_segments_then_converts_numeric_tones() {
    let converter = Tailo::with_dictionary(demo_dictionary(), ConvertOptions::default());
    assert_eq!(
        converter.convert("一大囝 kap chit8").unwrap(),
        "tsi̍t-tuā kiánn kap tsi̍t"
    );
}

#[test]
fn auto_mode_never_rewrites_plain_english() {
    let converter = Tailo::new(ConvertOptions::default());
    assert_eq!(
        converter.convert("plain english text").unwrap(),
        "plain english text"
    );
}

#[test]
fn poj_mode_with_ipa_output() {
    let converter = Tailo::new(ConvertOptions {
        mode: Mode::Poj,
        output: OutputFormat::Ipa,
        ..ConvertOptions::default()
    });
    assert_eq!(converter.convert("chit8 e5").unwrap(), "t͡sit̚⁸ e⁵");
}

#[test]
fn hanzi_mode_requires_a_dictionary() {
    let converter = Tailo::new(ConvertOptions {
        mode: Mode::Hanzi,
        ..ConvertOptions::default()
    });
    match converter.convert("一") {
        Err(TailoError::DictionaryRequired) => {}
        other => panic!("expected DictionaryRequired, got {other:?}"),
    }
}

#[test]
fn lookup_hits_and_misses() {
    let converter = Tailo::with_dictionary(demo_dictionary(), ConvertOptions::default());
    assert_eq!(
        converter.lookup("一").unwrap(),
        ["tsi̍t".to_string(), "it".to_string()].as_slice()
    );
    match converter.lookup("嘛") {
        Err(TailoError::HeadwordNotFound { word }) => assert_eq!(word, "嘛"),
        other => panic!("expected HeadwordNotFound, got {other:?}"),
    }
}

#[test]
fn policy_strings_parse_or_are_rejected() {
    assert_eq!("first".parse::<AmbiguousPolicy>().unwrap(), AmbiguousPolicy::First);
    assert_eq!("all".parse::<AmbiguousPolicy>().unwrap(), AmbiguousPolicy::All);
    assert_eq!("keep".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Keep);
    assert_eq!("mark".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Mark);

    assert!(matches!(
        "both".parse::<AmbiguousPolicy>(),
        Err(TailoError::InvalidPolicy(_))
    ));
    assert!(matches!(
        "drop".parse::<UnknownPolicy>(),
        Err(TailoError::InvalidPolicy(_))
    ));
}

#[test]
fn parallel_conversion_matches_sequential() {
    let converter = Tailo::with_dictionary(demo_dictionary(), ConvertOptions::default());
    let text = "一大囝\nchit8 toa7\nplain english";

    let sequential: Vec<String> = text
        .lines()
        .map(|line| converter.convert(line).unwrap())
        .collect();
    assert_eq!(
        converter.convert_parallel(text).unwrap(),
        sequential.join("\n")
    );
}
