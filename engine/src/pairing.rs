use crate::{Bracket, DuelPair, Item};
use rand::Rng;
use rand::seq::SliceRandom;

/// Build one round's bracket from `pool`.
///
/// The pool is shuffled (Fisher–Yates) and cut into consecutive pairs in
/// shuffled order. With an odd pool the last pair carries a single item and no
/// opponent: that item has a bye.
pub fn pair<R: Rng + ?Sized>(pool: &[Item], rng: &mut R) -> Bracket {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);

    let mut pairs = Vec::with_capacity(shuffled.len().div_ceil(2));
    let mut iter = shuffled.into_iter();
    while let Some(left) = iter.next() {
        pairs.push(DuelPair { left, right: iter.next() });
    }
    Bracket { pairs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entry, ItemId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn pool(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::from_entry(Entry::new(format!("Album {i}"), format!("Artist {i}"))))
            .collect()
    }

    #[test]
    fn every_item_appears_exactly_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=40 {
            let items = pool(n);
            let bracket = pair(&items, &mut rng);

            assert_eq!(bracket.len(), n.div_ceil(2), "n={n}");
            assert_eq!(bracket.item_count(), n, "n={n}");

            let mut seen = HashSet::new();
            for p in &bracket.pairs {
                assert!(seen.insert(p.left.id), "duplicate left for n={n}");
                if let Some(right) = &p.right {
                    assert_ne!(p.left.id, right.id, "item paired with itself");
                    assert!(seen.insert(right.id), "duplicate right for n={n}");
                }
            }
            let expected: HashSet<ItemId> = items.iter().map(|i| i.id).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn exactly_one_bye_iff_pool_is_odd() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 1..=25 {
            let bracket = pair(&pool(n), &mut rng);
            let expected = if n % 2 == 1 { 1 } else { 0 };
            assert_eq!(bracket.bye_count(), expected, "n={n}");
            if n % 2 == 1 {
                assert!(bracket.pairs.last().is_some_and(DuelPair::is_bye));
            }
        }
    }

    #[test]
    fn empty_pool_gives_empty_bracket() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(pair(&[], &mut rng).is_empty());
    }

    #[test]
    fn input_pool_is_left_untouched() {
        let items = pool(9);
        let before: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let _ = pair(&items, &mut rng);
        let after: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn no_item_is_stuck_in_the_bye_slot() {
        // Over many shuffles every item of a 5-pool should land on the bye.
        let items = pool(5);
        let mut rng = StdRng::seed_from_u64(42);
        let mut byes: HashMap<ItemId, usize> = HashMap::new();
        for _ in 0..2000 {
            let bracket = pair(&items, &mut rng);
            let bye = bracket.pairs.last().map(|p| p.left.id);
            if let Some(id) = bye {
                *byes.entry(id).or_default() += 1;
            }
        }
        assert_eq!(byes.len(), 5);
        for (_, count) in byes {
            // Expected 400 each; allow generous slack.
            assert!((250..=550).contains(&count), "bye count {count}");
        }
    }
}
