use holdem_agent::cards::{Card, Rank, Suit};
use holdem_agent::evaluator::{evaluate, evaluate_five, evaluate_seven, Category, HandRank};
use proptest::prelude::*;
use std::cmp::Ordering;

fn rank_from_val(v: u8) -> Rank {
    Rank::from_index(usize::from(v - 2))
}

fn straight_cards(top: u8) -> [Card; 5] {
    let ranks = if top == 5 {
        [Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]
    } else {
        [
            rank_from_val(top - 4),
            rank_from_val(top - 3),
            rank_from_val(top - 2),
            rank_from_val(top - 1),
            rank_from_val(top),
        ]
    };
    let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades, Suit::Clubs];
    [0, 1, 2, 3, 4].map(|i| Card::new(ranks[i], suits[i]))
}

/// Distinct cards drawn from the 52-card index space.
fn distinct_cards(n: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence((0..52).collect::<Vec<usize>>(), n)
        .prop_shuffle()
        .prop_map(|idx| idx.into_iter().map(Card::from_index).collect())
}

fn flush_rank_set() -> impl Strategy<Value = Vec<Rank>> {
    prop::collection::btree_set(2u8..=14u8, 5)
        .prop_filter("non-straight ranks", |set| {
            let vals: Vec<u8> = set.iter().copied().collect();
            let is_wheel = vals == vec![2, 3, 4, 5, 14];
            let is_straight = vals.windows(2).all(|w| w[1] == w[0] + 1);
            !(is_straight || is_wheel)
        })
        .prop_map(|set| set.into_iter().rev().map(rank_from_val).collect())
}

proptest! {
    #[test]
    fn ranks_stay_in_range_and_agree_with_category(cards in distinct_cards(5)) {
        let r = evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
        prop_assert!(r >= HandRank::BEST && r <= HandRank::WORST);
        prop_assert_eq!(evaluate(&cards).unwrap().category, r.category());
    }

    #[test]
    fn five_card_rank_ignores_card_order(cards in distinct_cards(5)) {
        let a = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        let b = [cards[4], cards[2], cards[0], cards[3], cards[1]];
        prop_assert_eq!(evaluate_five(&a), evaluate_five(&b));
    }

    #[test]
    fn seven_card_best_is_at_least_as_good_as_any_five(cards in distinct_cards(7)) {
        let seven = [cards[0], cards[1], cards[2], cards[3], cards[4], cards[5], cards[6]];
        let best7 = evaluate_seven(&seven);
        let mut found = false;
        for i in 0..3 { for j in (i+1)..4 { for k in (j+1)..5 { for l in (k+1)..6 { for m in (l+1)..7 {
            let e5 = evaluate_five(&[seven[i], seven[j], seven[k], seven[l], seven[m]]);
            prop_assert!(!e5.beats(best7));
            found |= e5 == best7;
        }}}}}
        prop_assert!(found);
    }

    #[test]
    fn strength_ordering_is_antisymmetric(a in distinct_cards(7), b in distinct_cards(7)) {
        let ra = evaluate(&a).unwrap().rank;
        let rb = evaluate(&b).unwrap().rank;
        prop_assert_eq!(ra.cmp_strength(rb), rb.cmp_strength(ra).reverse());
        prop_assert_eq!(ra.beats(rb), ra.cmp_strength(rb) == Ordering::Greater);
    }

    #[test]
    fn straight_ordering_respects_top_card(top_hi in 6u8..=14u8, top_lo in 5u8..=13u8) {
        prop_assume!(top_hi > top_lo);
        let e_hi = evaluate_five(&straight_cards(top_hi));
        let e_lo = evaluate_five(&straight_cards(top_lo));
        prop_assert_eq!(e_hi.category(), Category::Straight);
        prop_assert_eq!(e_lo.category(), Category::Straight);
        prop_assert!(e_hi.beats(e_lo));
    }

    #[test]
    fn flush_kicker_ordering(a in flush_rank_set(), b in flush_rank_set()) {
        let hand_a = [0, 1, 2, 3, 4].map(|i| Card::new(a[i], Suit::Hearts));
        let hand_b = [0, 1, 2, 3, 4].map(|i| Card::new(b[i], Suit::Spades));
        let e_a = evaluate_five(&hand_a);
        let e_b = evaluate_five(&hand_b);
        prop_assert_eq!(e_a.category(), Category::Flush);
        prop_assert_eq!(e_b.category(), Category::Flush);

        // ranks are already highest first, so lexicographic order is kicker order
        match a.cmp(&b) {
            Ordering::Greater => prop_assert!(e_a.beats(e_b)),
            Ordering::Less => prop_assert!(e_b.beats(e_a)),
            Ordering::Equal => prop_assert_eq!(e_a, e_b),
        }
    }
}
