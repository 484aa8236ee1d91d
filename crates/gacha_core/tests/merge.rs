mod common;

use common::{char_pull, ids};
use gacha_core::{max_sequence_id, merge_records, CharacterPull};
use pretty_assertions::assert_eq;

fn history(seqs: &[u64]) -> Vec<CharacterPull> {
    seqs.iter().map(|&seq| char_pull(seq, seq * 100, 3)).collect()
}

#[test]
fn new_records_are_appended_and_sorted_newest_first() {
    let existing = history(&[5, 3]);
    let incoming = history(&[8]);

    let outcome = merge_records(&existing, &incoming);

    assert_eq!(ids(&outcome.merged), vec![8, 5, 3]);
    assert_eq!(outcome.new_count, 1);
}

#[test]
fn overlapping_incoming_records_are_not_duplicated() {
    let existing = history(&[7, 4, 2]);
    let incoming = history(&[9, 7, 6, 2]);

    let outcome = merge_records(&existing, &incoming);

    assert_eq!(ids(&outcome.merged), vec![9, 7, 6, 4, 2]);
    assert_eq!(outcome.new_count, 2);
}

#[test]
fn merging_twice_is_idempotent() {
    let existing = history(&[10, 1]);
    let incoming = history(&[12, 11, 10]);

    let first = merge_records(&existing, &incoming);
    let second = merge_records(&first.merged, &incoming);

    assert_eq!(second.new_count, 0);
    assert_eq!(second.merged, first.merged);
}

#[test]
fn stored_record_wins_over_refetched_copy() {
    let existing = vec![char_pull(4, 400, 6)];
    let mut refetched = char_pull(4, 400, 6);
    refetched.character_name = "Renamed".to_string();

    let outcome = merge_records(&existing, &[refetched]);

    assert_eq!(outcome.new_count, 0);
    assert_eq!(outcome.merged[0].character_name, "Operator 4");
}

#[test]
fn inputs_are_left_untouched() {
    let existing = history(&[1, 3]);
    let incoming = history(&[2]);
    let before = (existing.clone(), incoming.clone());

    let _ = merge_records(&existing, &incoming);

    assert_eq!((existing, incoming), before);
}

#[test]
fn merge_of_empty_lists_is_empty() {
    let outcome = merge_records::<CharacterPull>(&[], &[]);
    assert!(outcome.merged.is_empty());
    assert_eq!(outcome.new_count, 0);
}

#[test]
fn max_sequence_id_defaults_to_zero() {
    assert_eq!(max_sequence_id::<CharacterPull>(&[]), 0);
    assert_eq!(max_sequence_id(&history(&[3, 11, 7])), 11);
}
