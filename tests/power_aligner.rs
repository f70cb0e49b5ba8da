use std::path::PathBuf;
use std::sync::Arc;

use power_align::EditOp::{Correct as C, Deletion as D, Insertion as I, Substitution as S};
use power_align::{
    phone_align_to_word_align, AlignmentInput, AlignmentOutput, Lexicon, PhoneStream,
    PhoneticCost, PhoneticCostConfig, PowerAligner, PowerAlignerBuilder, PowerConfig, Token,
};

fn lexicon_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/lexicon.json")
}

fn aligner() -> PowerAligner {
    let config = PowerConfig {
        lexicon_path: lexicon_path().to_string_lossy().to_string(),
        ..PowerConfig::default()
    };
    PowerAlignerBuilder::new(config)
        .build()
        .expect("test lexicon loads")
}

fn align(reference: &str, hypothesis: &str) -> AlignmentOutput {
    aligner()
        .align(&AlignmentInput {
            reference: reference.to_string(),
            hypothesis: hypothesis.to_string(),
        })
        .expect("alignment succeeds")
}

fn tokens(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, w)| Token {
            surface: w.to_string(),
            normalized: w.to_lowercase(),
            position,
        })
        .collect()
}

#[test]
fn misaligned_asked_is_refined_phonetically() {
    let reference =
        "They said Yes We asked them how happy they were and then we gave them an envelope";
    let hypothesis =
        "they said yes we gave we ask them how happy they were and then we gave them on low";
    let out = align(reference, hypothesis);

    assert_eq!(
        out.power_alignment.align(),
        [C, C, C, I, I, C, S, C, C, C, C, C, C, C, C, C, C, S, S]
    );
    assert_eq!(out.power_alignment.s1()[3..7], ["", "", "We", "asked"]);
    assert_eq!(out.power_alignment.s2()[3..7], ["we", "gave", "we", "ask"]);
    assert_eq!(out.power_alignment.s1_string(), reference);
    assert_eq!(out.power_alignment.s2_string(), hypothesis);
    assert_eq!(out.wer_alignment.s1_string(), reference);
    assert_eq!(out.wer_alignment.s2_string(), hypothesis);
    assert!(out.lookup_misses.is_empty());
}

#[test]
fn hyphenated_number_collapses_into_one_slot() {
    let out = align("A 50-year-old business man", "fifty year old business man");
    assert_eq!(out.wer_alignment.align(), [I, S, S, C, C]);
    assert_eq!(out.power_alignment.align(), [D, S, C, C]);
    assert_eq!(out.power_alignment.s2()[1], "fifty year old");

    let out = align("A fifty-year-old business man", "50 year old business man");
    assert_eq!(out.power_alignment.align(), [D, S, C, C]);
    assert_eq!(out.power_alignment.s1()[1], "fifty-year-old");
    assert_eq!(out.power_alignment.s2()[1], "50 year old");
}

#[test]
fn abbreviation_is_correct_after_refinement() {
    let out = align("see Dr. Brown", "see doctor brown");
    assert_eq!(out.wer_alignment.align(), [C, S, C]);
    assert_eq!(out.power_alignment.align(), [C, C, C]);
    assert_eq!(out.power_alignment.s1_string(), "see Dr. Brown");
}

#[test]
fn punctuation_and_case_never_substitute() {
    let out = align("Well, They said: YES.", "well they said yes");
    assert_eq!(out.wer_alignment.align(), [C, C, C, C]);
    assert_eq!(out.power_alignment.align(), [C, C, C, C]);
    assert_eq!(out.power_alignment.s1_string(), "Well, They said: YES.");
}

#[test]
fn phone_streams_map_to_word_slots() {
    let cost = PhoneticCost::english(PhoneticCostConfig::default()).unwrap();
    let (alignment, phones) = phone_align_to_word_align(
        &tokens("asked"),
        &tokens("gave we ask"),
        &PhoneStream::from_symbols(&["|", "#", "", "", "ae", "s", "k", "t", "|"]),
        &PhoneStream::from_symbols(&[
            "|", "#", "g", "ey", "v", "|", "#", "w", "iy", "|", "#", "ae", "s", "k", "", "|",
        ]),
        &cost,
    )
    .unwrap();
    assert_eq!(alignment.align(), [I, I, S]);
    assert_eq!(alignment.s1(), ["", "", "asked"]);
    assert_eq!(alignment.s2(), ["gave", "we", "ask"]);
    assert!(!phones.is_empty());
}

#[test]
fn empty_sides_are_all_insertions_or_deletions() {
    let out = align("", "we gave them");
    assert_eq!(out.power_alignment.align(), [I, I, I]);
    assert_eq!(out.power_alignment.error_counts().error_rate(), None);

    let out = align("we gave them", "");
    assert_eq!(out.power_alignment.align(), [D, D, D]);
    assert_eq!(out.power_alignment.s2_string(), "");

    let out = align("", "");
    assert!(out.wer_alignment.is_empty());
    assert!(out.power_alignment.is_empty());
}

#[test]
fn unknown_words_are_reported_not_fatal() {
    let out = align("the xyzzy table", "the plugh table");
    assert_eq!(out.power_alignment.align(), [C, S, C]);
    assert_eq!(out.lookup_misses, ["xyzzy", "plugh"]);
}

#[test]
fn power_never_has_more_errors_than_wer_on_homophones() {
    let out = align("see Dr. Brown", "see doctor brown");
    let wer = out.wer_alignment.error_counts();
    let power = out.power_alignment.error_counts();
    assert_eq!(wer.errors(), 1);
    assert_eq!(power.errors(), 0);
    assert_eq!(power.reference_tokens, 3);
}

#[test]
fn output_serializes_op_codes() {
    let out = align("an envelope", "on low");
    let json = serde_json::to_value(&out).expect("serializable");
    let ops: Vec<&str> = json["power_alignment"]["slots"]
        .as_array()
        .expect("slots array")
        .iter()
        .map(|slot| slot["op"].as_str().expect("op string"))
        .collect();
    assert_eq!(ops, ["S", "S"]);
}

#[test]
fn display_shows_gaps() {
    let out = align("we asked", "we gave we ask");
    let rendered = out.power_alignment.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("REF:"));
    assert!(lines[0].contains('*'));
    assert!(lines[1].starts_with("HYP:"));
}

#[test]
fn one_aligner_serves_concurrent_requests() {
    let lexicon = Arc::new(Lexicon::from_path(lexicon_path()).unwrap());
    let aligner = PowerAlignerBuilder::new(PowerConfig::default())
        .with_pronouncer(lexicon)
        .build()
        .unwrap();
    let input = AlignmentInput {
        reference: "They said Yes We asked them".to_string(),
        hypothesis: "they said yes we gave we ask them".to_string(),
    };
    let expected = aligner.align(&input).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| aligner.align(&input).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
