use crate::reducer::{ByePolicy, DuelReducer, JudgeOutcome, Phase};
use crate::{DuelPair, EngineResult, Entry, Item, ItemId, TournamentError};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// What happened in one finished round, kept for the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub entrants: usize,
    pub advancing: usize,
}

/// Owns one tournament from ingestion to shortlist.
///
/// The presentation layer reads through the accessors and only ever mutates
/// via `judge` and `undo`. Each finished round is followed directly by pairing
/// the next one; nothing waits on the caller in between.
#[derive(Debug)]
pub struct Tournament {
    reducer: DuelReducer,
    rng: StdRng,
    history: Vec<RoundSummary>,
}

impl Tournament {
    /// Assign ids to `entries` and open round 1.
    ///
    /// There must be strictly more entries than `target`, otherwise there is
    /// nothing to eliminate.
    pub fn start(entries: Vec<Entry>, target: usize, policy: ByePolicy) -> EngineResult<Self> {
        Self::start_with_rng(entries, target, policy, StdRng::from_entropy())
    }

    pub fn start_with_rng(
        entries: Vec<Entry>,
        target: usize,
        policy: ByePolicy,
        mut rng: StdRng,
    ) -> EngineResult<Self> {
        if target == 0 {
            return Err(TournamentError::InvalidInput(
                "target size must be at least 1".into(),
            ));
        }
        if entries.len() <= target {
            return Err(TournamentError::InvalidInput(format!(
                "need more than {target} entries to build a top {target}, got {}",
                entries.len()
            )));
        }

        let pool: Vec<Item> = entries.into_iter().map(Item::from_entry).collect();
        info!("tournament starts: {} entries, target {target}, byes {policy:?}", pool.len());

        let mut reducer = DuelReducer::new(pool, target, policy)?;
        reducer.begin_round(&mut rng)?;
        Ok(Self { reducer, rng, history: Vec::new() })
    }

    /// Settle the current duel in favour of `pick`.
    pub fn judge(&mut self, pick: ItemId) -> EngineResult<JudgeOutcome> {
        let entrants = self.reducer.pool().len();
        let outcome = self.reducer.judge(pick)?;

        match outcome {
            JudgeOutcome::Advanced => {}
            JudgeOutcome::RoundComplete { round, advancing } => {
                self.history.push(RoundSummary { round, entrants, advancing });
                self.reducer.begin_round(&mut self.rng)?;
            }
            JudgeOutcome::Finished => {
                self.history.push(RoundSummary {
                    round: self.reducer.round(),
                    entrants,
                    advancing: self.reducer.pool().len(),
                });
            }
        }
        Ok(outcome)
    }

    pub fn undo(&mut self) -> EngineResult<()> {
        self.reducer.undo()
    }

    /// The final ranked shortlist.
    pub fn finish(&self) -> EngineResult<&[Item]> {
        self.reducer.shortlist().ok_or(TournamentError::NotFinished)
    }

    pub fn pool(&self) -> &[Item] {
        self.reducer.pool()
    }

    pub fn round(&self) -> u32 {
        self.reducer.round()
    }

    pub fn target(&self) -> usize {
        self.reducer.target()
    }

    pub fn policy(&self) -> ByePolicy {
        self.reducer.policy()
    }

    pub fn phase(&self) -> Phase {
        self.reducer.phase()
    }

    pub fn current_pair(&self) -> Option<&DuelPair> {
        self.reducer.current_pair()
    }

    pub fn remaining_pairs(&self) -> impl Iterator<Item = &DuelPair> {
        self.reducer.remaining_pairs()
    }

    pub fn judged_pairs(&self) -> impl Iterator<Item = &DuelPair> {
        self.reducer.judged_pairs()
    }

    pub fn winners(&self) -> &[Item] {
        self.reducer.winners()
    }

    pub fn total_pairs(&self) -> usize {
        self.reducer.total_pairs()
    }

    pub fn judged_count(&self) -> usize {
        self.reducer.winners().len()
    }

    pub fn is_finished(&self) -> bool {
        self.reducer.is_finished()
    }

    pub fn shortlist(&self) -> Option<&[Item]> {
        self.reducer.shortlist()
    }

    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry::new(format!("Album {i}"), format!("Artist {i}")))
            .collect()
    }

    fn seeded(n: usize, target: usize, policy: ByePolicy, seed: u64) -> Tournament {
        Tournament::start_with_rng(entries(n), target, policy, StdRng::seed_from_u64(seed))
            .unwrap()
    }

    /// Pick the right-hand item when there is one, the lone item otherwise.
    fn pick_right(t: &Tournament) -> ItemId {
        let pair = t.current_pair().unwrap();
        pair.right.as_ref().unwrap_or(&pair.left).id
    }

    #[test]
    fn scenario_a_eleven_down_to_ten() {
        let mut t = seeded(11, 10, ByePolicy::Manual, 1);
        assert_eq!(t.round(), 1);
        assert_eq!(t.total_pairs(), 6);
        let byes = t.remaining_pairs().filter(|p| p.is_bye()).count();
        assert_eq!(byes, 1);

        let mut picked = Vec::new();
        for i in 0..6 {
            let pick = pick_right(&t);
            picked.push(pick);
            let outcome = t.judge(pick).unwrap();
            if i < 5 {
                assert_eq!(outcome, JudgeOutcome::Advanced);
                assert!(matches!(t.finish(), Err(TournamentError::NotFinished)));
            } else {
                assert_eq!(outcome, JudgeOutcome::Finished);
            }
        }

        let shortlist: Vec<ItemId> = t.finish().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(shortlist, picked);
        assert_eq!(t.history(), &[RoundSummary { round: 1, entrants: 11, advancing: 6 }]);
    }

    #[test]
    fn scenario_b_twenty_three_takes_two_rounds() {
        let mut t = seeded(23, 10, ByePolicy::Manual, 2);
        assert_eq!(t.total_pairs(), 12);

        for _ in 0..11 {
            assert_eq!(t.judge(pick_right(&t)).unwrap(), JudgeOutcome::Advanced);
        }
        assert!(t.current_pair().unwrap().is_bye());
        let outcome = t.judge(pick_right(&t)).unwrap();
        assert_eq!(outcome, JudgeOutcome::RoundComplete { round: 1, advancing: 12 });

        // Next round was paired straight away.
        assert_eq!(t.round(), 2);
        assert_eq!(t.pool().len(), 12);
        assert_eq!(t.total_pairs(), 6);
        assert!(t.winners().is_empty());

        for _ in 0..5 {
            t.judge(pick_right(&t)).unwrap();
        }
        assert_eq!(t.judge(pick_right(&t)).unwrap(), JudgeOutcome::Finished);
        assert_eq!(t.finish().unwrap().len(), 6);
        assert_eq!(
            t.history(),
            &[
                RoundSummary { round: 1, entrants: 23, advancing: 12 },
                RoundSummary { round: 2, entrants: 12, advancing: 6 },
            ]
        );
    }

    #[test]
    fn scenario_c_target_exceeds_pool() {
        let err = Tournament::start(entries(3), 10, ByePolicy::Manual).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidInput(_)));
    }

    #[test]
    fn start_rejects_equal_count_and_zero_target() {
        assert!(matches!(
            Tournament::start(entries(10), 10, ByePolicy::Manual),
            Err(TournamentError::InvalidInput(_))
        ));
        assert!(matches!(
            Tournament::start(entries(5), 0, ByePolicy::Manual),
            Err(TournamentError::InvalidInput(_))
        ));
    }

    #[test]
    fn scenario_d_one_over_target_is_a_single_round() {
        for target in [1usize, 4, 10, 15] {
            let mut t = seeded(target + 1, target, ByePolicy::Manual, target as u64);
            let mut calls = 0;
            while !t.is_finished() {
                t.judge(pick_right(&t)).unwrap();
                calls += 1;
            }
            let expected = (target + 1).div_ceil(2);
            assert_eq!(calls, expected);
            assert_eq!(t.history().len(), 1);
            assert_eq!(t.finish().unwrap().len(), expected.min(target));
        }
    }

    #[test]
    fn start_twice_gives_independent_equal_pools() {
        let input = entries(14);
        let a = Tournament::start(input.clone(), 5, ByePolicy::Manual).unwrap();
        let b = Tournament::start(input, 5, ByePolicy::Manual).unwrap();

        let mut titles_a: Vec<&str> = a.pool().iter().map(|i| i.title.as_str()).collect();
        let mut titles_b: Vec<&str> = b.pool().iter().map(|i| i.title.as_str()).collect();
        titles_a.sort();
        titles_b.sort();
        assert_eq!(titles_a, titles_b);
        assert_eq!(a.round(), 1);
        assert_eq!(b.round(), 1);

        let ids_a: Vec<ItemId> = a.pool().iter().map(|i| i.id).collect();
        assert!(b.pool().iter().all(|i| !ids_a.contains(&i.id)));
    }

    #[test]
    fn rejected_pick_is_reported_and_ignored() {
        let mut t = seeded(12, 3, ByePolicy::Manual, 9);
        let before = t.current_pair().cloned();
        let stranger = ItemId::new();
        assert_eq!(t.judge(stranger), Err(TournamentError::InvalidSelection(stranger)));
        assert_eq!(t.current_pair().cloned(), before);
        assert_eq!(t.judged_count(), 0);
        assert!(t.history().is_empty());
    }

    #[test]
    fn shortlist_is_a_subset_of_the_input() {
        let mut t = seeded(50, 7, ByePolicy::Auto, 5);
        let all: Vec<ItemId> = t.pool().iter().map(|i| i.id).collect();
        while !t.is_finished() {
            t.judge(pick_right(&t)).unwrap();
        }
        let shortlist = t.finish().unwrap();
        assert!(shortlist.len() <= 7);
        assert!(shortlist.iter().all(|i| all.contains(&i.id)));
        // 50 -> 25 -> 13 -> 7
        assert_eq!(t.history().len(), 3);
    }

    #[test]
    fn undo_is_forwarded() {
        let mut t = seeded(9, 2, ByePolicy::Manual, 4);
        let first = t.current_pair().cloned().unwrap();
        t.judge(first.left.id).unwrap();
        t.undo().unwrap();
        assert_eq!(t.current_pair(), Some(&first));
        assert_eq!(t.judged_count(), 0);
    }
}
