use crate::pairing::pair;
use crate::{DuelPair, EngineResult, Item, ItemId, Pool, TournamentError};
use log::{debug, error, info};
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// Where the reducer is in its round cycle.
///
/// A completed round is never observable as a resting state: `judge` either
/// finishes the tournament or drops back to `AwaitingBracket` for the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    AwaitingBracket,
    InRound,
    Finished,
}

/// How a lone item with no opponent gets through its round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByePolicy {
    /// The bye must be confirmed with an explicit `judge` of the lone item.
    #[default]
    Manual,
    /// Byes are consumed as soon as they reach the head of the bracket.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeOutcome {
    /// One duel settled, more remain in this round.
    Advanced,
    /// The round is over and `advancing` items go on to a fresh bracket.
    RoundComplete { round: u32, advancing: usize },
    /// The shortlist is settled.
    Finished,
}

#[derive(Debug, Clone)]
struct Judged {
    pair: DuelPair,
    auto: bool,
}

/// Single-elimination state machine over one live pool.
#[derive(Debug, Clone)]
pub struct DuelReducer {
    pool: Pool,
    target: usize,
    policy: ByePolicy,
    phase: Phase,
    round: u32,
    bracket_len: usize,
    remaining: VecDeque<DuelPair>,
    judged: Vec<Judged>,
    winners: Vec<Item>,
    shortlist: Option<Vec<Item>>,
}

impl DuelReducer {
    /// Create a reducer for `pool`. A pool that is already within `target`
    /// finishes immediately, unranked.
    pub fn new(pool: Pool, target: usize, policy: ByePolicy) -> EngineResult<Self> {
        if target == 0 {
            return Err(TournamentError::InvalidInput(
                "target size must be at least 1".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(pool.len());
        if let Some(dup) = pool.iter().find(|item| !seen.insert(item.id)) {
            return Err(TournamentError::InvalidInput(format!(
                "duplicate item id {} in pool",
                dup.id
            )));
        }

        let mut reducer = Self {
            pool,
            target,
            policy,
            phase: Phase::AwaitingBracket,
            round: 1,
            bracket_len: 0,
            remaining: VecDeque::new(),
            judged: Vec::new(),
            winners: Vec::new(),
            shortlist: None,
        };

        if reducer.pool.len() <= target {
            debug!(
                "pool of {} already within target {target}, nothing to duel",
                reducer.pool.len()
            );
            reducer.shortlist = Some(reducer.pool.clone());
            reducer.phase = Phase::Finished;
        }
        Ok(reducer)
    }

    /// Pair the live pool for a new round. Returns `false` without touching
    /// anything unless the reducer is waiting for a bracket.
    pub fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EngineResult<bool> {
        if self.phase != Phase::AwaitingBracket {
            return Ok(false);
        }

        let bracket = pair(&self.pool, rng);
        self.bracket_len = bracket.len();
        self.remaining = bracket.pairs.into();
        self.judged.clear();
        self.winners.clear();
        self.phase = Phase::InRound;
        debug!(
            "round {} starts: {} items, {} duels",
            self.round,
            self.pool.len(),
            self.bracket_len
        );

        // A bracket over two or more items always opens with a full duel, so
        // this cannot close the round.
        self.auto_advance_byes()?;
        Ok(true)
    }

    /// Settle the head duel in favour of `pick`.
    ///
    /// `pick` must be one of the head pair's items. Anything else is rejected
    /// with `InvalidSelection` and the reducer is left exactly as it was.
    pub fn judge(&mut self, pick: ItemId) -> EngineResult<JudgeOutcome> {
        if self.phase != Phase::InRound {
            return Err(TournamentError::NoRoundInProgress);
        }
        let Some(head) = self.remaining.front() else {
            return self.violation("in round with no pending duel");
        };
        let Some(winner) = head.eligible(pick).cloned() else {
            return Err(TournamentError::InvalidSelection(pick));
        };

        let outcome = self.settle_head(winner, false)?;
        if outcome == JudgeOutcome::Advanced
            && let Some(auto) = self.auto_advance_byes()?
        {
            return Ok(auto);
        }
        Ok(outcome)
    }

    /// Take back the latest explicit judgment of the current round, together
    /// with any byes that were advanced automatically after it.
    pub fn undo(&mut self) -> EngineResult<()> {
        if self.phase != Phase::InRound {
            return Err(TournamentError::NothingToUndo);
        }
        let Some(last_manual) = self.judged.iter().rposition(|j| !j.auto) else {
            return Err(TournamentError::NothingToUndo);
        };

        for judged in self.judged.drain(last_manual..).rev() {
            self.remaining.push_front(judged.pair);
        }
        self.winners.truncate(last_manual);
        self.check_invariants()
    }

    fn auto_advance_byes(&mut self) -> EngineResult<Option<JudgeOutcome>> {
        if self.policy != ByePolicy::Auto {
            return Ok(None);
        }
        let mut last = None;
        while self.phase == Phase::InRound
            && let Some(head) = self.remaining.front()
            && head.is_bye()
        {
            let lone = head.left.clone();
            debug!("auto-advancing bye for {}", lone.label());
            last = Some(self.settle_head(lone, true)?);
        }
        Ok(last)
    }

    fn settle_head(&mut self, winner: Item, auto: bool) -> EngineResult<JudgeOutcome> {
        let Some(pair) = self.remaining.pop_front() else {
            return self.violation("settled a duel that was not pending");
        };
        self.winners.push(winner);
        self.judged.push(Judged { pair, auto });
        self.check_invariants()?;

        if self.remaining.is_empty() {
            return Ok(self.complete_round());
        }
        Ok(JudgeOutcome::Advanced)
    }

    fn complete_round(&mut self) -> JudgeOutcome {
        let round = self.round;
        let advancing = self.winners.len();
        debug!("round {round} finished, {advancing} advance");

        self.remaining.clear();
        self.judged.clear();
        self.bracket_len = 0;
        self.pool = std::mem::take(&mut self.winners);

        if advancing <= self.target {
            let shortlist: Vec<Item> = self.pool.iter().take(self.target).cloned().collect();
            info!("shortlist settled after {round} round(s): {} items", shortlist.len());
            self.shortlist = Some(shortlist);
            self.phase = Phase::Finished;
            return JudgeOutcome::Finished;
        }

        self.round += 1;
        self.phase = Phase::AwaitingBracket;
        JudgeOutcome::RoundComplete { round, advancing }
    }

    fn check_invariants(&self) -> EngineResult<()> {
        if self.winners.len() != self.judged.len() {
            return self.violation(&format!(
                "{} winners for {} judged duels",
                self.winners.len(),
                self.judged.len()
            ));
        }
        if self.winners.len() + self.remaining.len() != self.bracket_len {
            return self.violation(&format!(
                "{} winners + {} pending != bracket of {}",
                self.winners.len(),
                self.remaining.len(),
                self.bracket_len
            ));
        }
        if let Some(w) = self
            .winners
            .iter()
            .find(|w| self.remaining.iter().any(|p| p.contains(w.id)))
        {
            return self.violation(&format!("{} is both a winner and pending", w.id));
        }
        Ok(())
    }

    fn violation<T>(&self, detail: &str) -> EngineResult<T> {
        error!("duel reducer invariant violated in round {}: {detail}", self.round);
        Err(TournamentError::InvariantViolation(detail.to_string()))
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn policy(&self) -> ByePolicy {
        self.policy
    }

    /// The live pool: entrants of the current round, or the survivors once
    /// finished.
    pub fn pool(&self) -> &[Item] {
        &self.pool
    }

    pub fn current_pair(&self) -> Option<&DuelPair> {
        match self.phase {
            Phase::InRound => self.remaining.front(),
            _ => None,
        }
    }

    pub fn remaining_pairs(&self) -> impl Iterator<Item = &DuelPair> {
        self.remaining.iter()
    }

    /// Duels settled so far this round, aligned index-for-index with `winners`.
    pub fn judged_pairs(&self) -> impl Iterator<Item = &DuelPair> {
        self.judged.iter().map(|j| &j.pair)
    }

    pub fn winners(&self) -> &[Item] {
        &self.winners
    }

    pub fn total_pairs(&self) -> usize {
        self.bracket_len
    }

    pub fn shortlist(&self) -> Option<&[Item]> {
        self.shortlist.as_deref()
    }
}
