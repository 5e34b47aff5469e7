use tarocchi::cards::parse_cards;
use tarocchi::evaluator::{evaluate_hand, highest_card, tie_break_value, TARGET};

fn value_of(s: &str) -> i32 {
    evaluate_hand(&parse_cards(s).unwrap()).value
}

fn distance_of(s: &str) -> u32 {
    evaluate_hand(&parse_cards(s).unwrap()).distance()
}

#[test]
fn pips_and_courts_at_face_value() {
    assert_eq!(value_of("10W, 9C, 4S"), 23);
    assert_eq!(value_of("PW, ND, QS, KC"), 11 + 12 + 13 + 14);
    assert_eq!(distance_of("10W, 9C, 4S"), 0);
}

#[test]
fn negative_trumps_subtract() {
    // Death is -13, the Tower -16
    assert_eq!(value_of("13T, 10W"), -3);
    assert_eq!(value_of("16T, 17T, 14T"), -(16 + 17 + 14));
}

#[test]
fn zero_point_trumps_are_inert() {
    assert_eq!(value_of("0T, 10W, 9C"), 19);
    assert_eq!(value_of("20T, 5D"), 5);
}

#[test]
fn ace_promotes_only_when_it_helps() {
    // 1 + 10 = 11, promoting to 11 + 10 = 21 is closer
    assert_eq!(value_of("1W, 10C"), 21);
    // 1 + 10 + 10 = 21; promotion to 31 would bust
    assert_eq!(value_of("1W, 10C, 10S"), 21);
    // two aces: exactly one promotion fits under 23
    assert_eq!(value_of("1W, 1C, 10S"), 22);
}

#[test]
fn ace_promotion_works_on_the_negative_side() {
    // -16 + 1 = -15; promoting to -5 moves away from -23
    assert_eq!(value_of("16T, 1W"), -15);
}

#[test]
fn lovers_picks_the_better_sign() {
    // 20 + 6 = 26 busts, 20 - 6 = 14 does not
    assert_eq!(value_of("6T, 10W, 10C"), 14);
    // 17 + 6 = 23 exactly
    assert_eq!(value_of("6T, 10W, 7C"), 23);
    // alone, a tie between +6 and -6 goes positive
    assert_eq!(value_of("6T"), 6);
}

#[test]
fn negative_target_counts_as_perfect() {
    let score = evaluate_hand(&parse_cards("17T, 14T, 8D").unwrap());
    assert_eq!(score.value, -(17 + 14) + 8);
    assert_eq!(score.value, -23);
    assert!(!score.busted);
    assert_eq!(score.distance(), 0);
}

#[test]
fn bust_on_both_sides() {
    let over = evaluate_hand(&parse_cards("KW, KC").unwrap());
    assert!(over.busted);
    assert_eq!(over.distance(), u32::MAX);

    let under = evaluate_hand(&parse_cards("16T, 17T").unwrap());
    assert_eq!(under.value, -33);
    assert!(under.busted);
}

#[test]
fn empty_hand_scores_zero() {
    let score = evaluate_hand(&[]);
    assert_eq!(score.value, 0);
    assert!(!score.busted);
    assert_eq!(score.distance(), TARGET as u32);
}

#[test]
fn tie_break_uses_the_alternate_valuation() {
    let cards = parse_cards("1W, 10C, KD, 6T, 13T, 0T").unwrap();
    // ace counts 11, king 14, Lovers -6, Death -13, Fool 0
    assert_eq!(tie_break_value(cards[0]), 11);
    assert_eq!(tie_break_value(cards[1]), 10);
    assert_eq!(tie_break_value(cards[2]), 14);
    assert_eq!(tie_break_value(cards[3]), -6);
    assert_eq!(tie_break_value(cards[4]), -13);
    assert_eq!(tie_break_value(cards[5]), 0);
}

#[test]
fn highest_card_prefers_value_then_suit() {
    let hand = parse_cards("10S, 10C, 4D").unwrap();
    let high = highest_card(&hand).unwrap();
    // equal tens: Cups outranks Swords
    assert_eq!(high.card, hand[1]);
    assert_eq!(high.value, 10);
    assert!(highest_card(&[]).is_none());
}
