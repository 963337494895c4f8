//! Voting tests: ballot replacement, positive-only storage, tallying, and
//! the full tally-to-ranking path.

mod common;

use common::*;
use picklejar::models::member;
use picklejar::models::results;
use picklejar::models::vote::{self, Allocation, BallotEntry};

fn ballot(entries: &[(&str, i64)]) -> Vec<BallotEntry> {
    entries
        .iter()
        .map(|(id, points)| BallotEntry {
            suggestion_id: id.to_string(),
            points: *points,
        })
        .collect()
}

#[test]
fn submitting_a_ballot_sets_has_voted() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");

    vote::replace_for_member(&conn, &jar_id, &member_id, &ballot(&[(&ramen, 3)])).unwrap();

    let m = member::find_by_id(&conn, &member_id).unwrap().unwrap();
    assert!(m.has_voted);
    assert_eq!(
        vote::points_for_member(&conn, &jar_id, &member_id).unwrap(),
        vec![(ramen, 3)]
    );
}

#[test]
fn resubmitting_replaces_the_whole_ballot() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");
    let tacos = add_suggestion(&conn, &jar_id, &member_id, "Tacos");

    vote::replace_for_member(
        &conn,
        &jar_id,
        &member_id,
        &ballot(&[(&ramen, 6), (&tacos, 4)]),
    )
    .unwrap();
    // Second ballot drops tacos entirely.
    vote::replace_for_member(&conn, &jar_id, &member_id, &ballot(&[(&ramen, 10)])).unwrap();

    let points = vote::points_for_member(&conn, &jar_id, &member_id).unwrap();
    assert_eq!(points, vec![(ramen, 10)]);
}

#[test]
fn failed_replacement_leaves_the_prior_ballot_intact() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");

    vote::replace_for_member(&conn, &jar_id, &member_id, &ballot(&[(&ramen, 3)])).unwrap();

    // Second entry points at a suggestion that does not exist, so the insert
    // hits the foreign key and the whole replacement rolls back.
    let result = vote::replace_for_member(
        &conn,
        &jar_id,
        &member_id,
        &ballot(&[(&ramen, 2), ("no-such-suggestion", 4)]),
    );
    assert!(result.is_err());

    assert_eq!(
        vote::points_for_member(&conn, &jar_id, &member_id).unwrap(),
        vec![(ramen, 3)]
    );
    let m = member::find_by_id(&conn, &member_id).unwrap().unwrap();
    assert!(m.has_voted);
}

#[test]
fn clearing_votes_resets_the_flag() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");

    vote::replace_for_member(&conn, &jar_id, &member_id, &ballot(&[(&ramen, 3)])).unwrap();
    let deleted = vote::clear_for_member(&conn, &jar_id, &member_id).unwrap();
    assert_eq!(deleted, 1);

    let m = member::find_by_id(&conn, &member_id).unwrap().unwrap();
    assert!(!m.has_voted);
    assert!(vote::points_for_member(&conn, &jar_id, &member_id)
        .unwrap()
        .is_empty());
}

#[test]
fn tally_includes_unvoted_suggestions_at_zero() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");
    let tacos = add_suggestion(&conn, &jar_id, &member_id, "Tacos");
    set_created_at(&conn, &ramen, "2026-01-01 10:00:00");
    set_created_at(&conn, &tacos, "2026-01-01 10:05:00");

    vote::replace_for_member(&conn, &jar_id, &member_id, &ballot(&[(&ramen, 5)])).unwrap();

    let tally = vote::tally_for_jar(&conn, &jar_id).unwrap();
    assert_eq!(tally.len(), 2);
    assert_eq!(tally[0].suggestion_id, ramen);
    assert_eq!(tally[0].total_points, 5);
    assert_eq!(tally[0].vote_count, 1);
    assert_eq!(tally[1].suggestion_id, tacos);
    assert_eq!(tally[1].total_points, 0);
    assert_eq!(tally[1].vote_count, 0);
}

#[test]
fn tally_sums_across_members() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let alice = join_member(&conn, &jar_id, "4165550100");
    let bob = join_member(&conn, &jar_id, "4165550101");
    let ramen = add_suggestion(&conn, &jar_id, &alice, "Ramen");

    vote::replace_for_member(&conn, &jar_id, &alice, &ballot(&[(&ramen, 4)])).unwrap();
    vote::replace_for_member(&conn, &jar_id, &bob, &ballot(&[(&ramen, 2)])).unwrap();

    let tally = vote::tally_for_jar(&conn, &jar_id).unwrap();
    assert_eq!(tally[0].total_points, 6);
    assert_eq!(tally[0].vote_count, 2);
}

#[test]
fn allocation_ballot_flows_straight_into_replace() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");
    let tacos = add_suggestion(&conn, &jar_id, &member_id, "Tacos");

    let mut allocation =
        Allocation::for_candidates(10, [ramen.clone(), tacos.clone()]);
    assert!(allocation.set(&ramen, 7));
    assert!(allocation.set(&tacos, 3));
    assert!(allocation.is_exhausted());

    vote::replace_for_member(&conn, &jar_id, &member_id, &allocation.ballot()).unwrap();
    let points = vote::points_for_member(&conn, &jar_id, &member_id).unwrap();
    assert_eq!(points.len(), 2);
}

#[test]
fn ranking_ties_break_by_submission_order() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");

    // X gets 5, Y and Z tie on 9; Y was submitted first and wins.
    let x = add_suggestion(&conn, &jar_id, &member_id, "X");
    let y = add_suggestion(&conn, &jar_id, &member_id, "Y");
    let z = add_suggestion(&conn, &jar_id, &member_id, "Z");
    set_created_at(&conn, &x, "2026-01-01 10:00:00");
    set_created_at(&conn, &y, "2026-01-01 10:01:00");
    set_created_at(&conn, &z, "2026-01-01 10:02:00");

    let alice = join_member(&conn, &jar_id, "4165550101");
    let bob = join_member(&conn, &jar_id, "4165550102");
    vote::replace_for_member(&conn, &jar_id, &alice, &ballot(&[(&x, 5), (&y, 9)])).unwrap();
    vote::replace_for_member(&conn, &jar_id, &bob, &ballot(&[(&z, 9)])).unwrap();

    let ranked = results::rank(vote::tally_for_jar(&conn, &jar_id).unwrap());
    assert_eq!(ranked[0].suggestion_id, y);
    assert!(ranked[0].is_winner);
    assert_eq!(ranked[1].suggestion_id, z);
    assert!(!ranked[1].is_winner);
    assert_eq!(ranked[2].suggestion_id, x);

    let winners = ranked.iter().filter(|r| r.is_winner).count();
    assert_eq!(winners, 1);
}

#[test]
fn soft_deleted_suggestions_drop_out_of_the_tally() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "voting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let ramen = add_suggestion(&conn, &jar_id, &member_id, "Ramen");
    let tacos = add_suggestion(&conn, &jar_id, &member_id, "Tacos");

    vote::replace_for_member(
        &conn,
        &jar_id,
        &member_id,
        &ballot(&[(&ramen, 5), (&tacos, 5)]),
    )
    .unwrap();

    let target = picklejar::models::suggestion::find_by_id(&conn, &tacos)
        .unwrap()
        .unwrap();
    picklejar::models::suggestion::soft_delete(&conn, &target).unwrap();

    let tally = vote::tally_for_jar(&conn, &jar_id).unwrap();
    assert_eq!(tally.len(), 1);
    assert_eq!(tally[0].suggestion_id, ramen);
}
