use holdem_agent::cards::parse_cards;
use holdem_agent::evaluator::{compare_holdem, evaluate, evaluate_five, evaluate_holdem, Category, HandRank};
use holdem_agent::hand::{Board, HoleCards};
use std::cmp::Ordering;

fn five(s: &str) -> [holdem_agent::cards::Card; 5] {
    let v = parse_cards(s).expect("valid cards");
    [v[0], v[1], v[2], v[3], v[4]]
}

fn rank(s: &str) -> HandRank {
    evaluate_five(&five(s))
}

#[test]
fn category_fixtures() {
    let cases = [
        ("As Ks Qs Js Ts", Category::StraightFlush),
        ("9c 9d 9h 9s Ac", Category::FourOfAKind),
        ("3c 3d 3h Js Jc", Category::FullHouse),
        ("Kh Th 8h 6h 3h", Category::Flush),
        ("Ac 5c 4d 3h 2s", Category::Straight),
        ("Qc Qd Qh Ts 2c", Category::ThreeOfAKind),
        ("Jc Jd 4h 4s 9c", Category::TwoPair),
        ("8c 8d Kh 5s 2c", Category::Pair),
        ("Ac Jd 9h 6s 3c", Category::HighCard),
    ];
    for (cards, expected) in cases {
        assert_eq!(rank(cards).category(), expected, "{cards}");
    }
}

#[test]
fn best_hand_of_each_category_sits_on_its_boundary() {
    let cases = [
        ("As Ks Qs Js Ts", 1),
        ("5d 4d 3d 2d Ad", 10),
        ("Ac Ad Ah As Kc", 11),
        ("Ac Ad Ah Ks Kc", 167),
        ("Ah Kh Qh Jh 9h", 323),
        ("Ac Kd Qh Js Tc", 1600),
        ("5c 4d 3h 2s Ac", 1609),
        ("Ac Ad Ah Ks Qc", 1610),
        ("Ac Ad Kh Ks Qc", 2468),
        ("Ac Ad Kh Qs Jc", 3326),
        ("Ac Kd Qh Js 9c", 6186),
        ("7c 5d 4h 3s 2c", 7462),
    ];
    for (cards, value) in cases {
        assert_eq!(rank(cards).value(), value, "{cards}");
    }
}

#[test]
fn categories_order_by_strength() {
    let ladder = [
        "Ac Jd 9h 6s 3c",
        "8c 8d Kh 5s 2c",
        "Jc Jd 4h 4s 9c",
        "Qc Qd Qh Ts 2c",
        "Ac 5c 4d 3h 2s",
        "Kh Th 8h 6h 3h",
        "3c 3d 3h Js Jc",
        "9c 9d 9h 9s Ac",
        "As Ks Qs Js Ts",
    ];
    for pair in ladder.windows(2) {
        assert!(rank(pair[1]).beats(rank(pair[0])), "{} should beat {}", pair[1], pair[0]);
    }
}

#[test]
fn kickers_break_ties() {
    assert!(rank("Ac Ad Kh 7s 2c").beats(rank("Ah As Qh Js Tc")));
    assert!(rank("Kc Kd 9h 9s Ac").beats(rank("Kh Ks 9c 9d Qc")));
    assert!(rank("Tc Td Th Ah 2c").beats(rank("Ts Tc Td Kh Qc")));
    assert!(rank("Ah Qh 9h 5h 3h").beats(rank("Ac Qc 9c 5c 2c")));
    assert_eq!(rank("Ac Kd Qh Js 9c"), rank("Ad Kc Qs Jh 9d"));
}

#[test]
fn wheel_is_the_lowest_straight() {
    assert!(rank("6c 5d 4h 3s 2c").beats(rank("5c 4d 3h 2s Ac")));
    assert_eq!(rank("5c 4d 3h 2s Ac").category(), Category::Straight);
}

#[test]
fn seven_card_hands_use_the_best_five() {
    let cards = parse_cards("2c 2d 2h Kc Kd 9s 9h").expect("valid cards");
    let eval = evaluate(&cards).expect("seven cards");
    assert_eq!(eval.category, Category::FullHouse);
    assert_eq!(eval.rank, rank("2c 2d 2h Kc Kd"));
}

#[test]
fn board_plays_for_both_players() {
    let board: Board = "As Ks Qs Js Ts".parse().expect("board");
    let a: HoleCards = "2c 3d".parse().expect("hole");
    let b: HoleCards = "Ah Kh".parse().expect("hole");
    assert_eq!(compare_holdem(&a, &b, &board).expect("valid"), Ordering::Equal);
    assert_eq!(evaluate_holdem(&a, &board).expect("valid").rank, HandRank::BEST);
}
