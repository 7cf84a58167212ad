use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::assignment::Assignment;
use crate::clause_allocator::ClauseAllocator;
use crate::cref::ClauseRef;
use crate::watch::WatchList;

const CLA_RESCALE_LIMIT: f64 = 1e20;
const CLA_RESCALE_FACTOR: f64 = 1e-20;

/// Threshold below which the reduction sort falls back to selection sort.
const SORT_SMALL: usize = 15;

/// Root/learnt clause lists plus the learnt-clause activity machinery.
#[derive(Debug)]
pub struct ClauseDatabase {
    /// Original clauses.
    clauses: Vec<ClauseRef>,
    /// Learnt clauses.
    learnts: Vec<ClauseRef>,
    // Clause activity:
    cla_decay: f64,
    cla_inc: f64,
    /// Fixed-seed RNG for the reduction quicksort, for reproducible behavior.
    sort_rng: StdRng,
}

const SORT_SEED: u64 = 91_648_253;

impl ClauseDatabase {
    pub fn new(cla_decay: f64) -> Self {
        debug_assert!(cla_decay > 0.0 && cla_decay < 1.0);
        Self {
            clauses: Vec::new(),
            learnts: Vec::new(),
            cla_decay,
            cla_inc: 1.0,
            sort_rng: StdRng::seed_from_u64(SORT_SEED),
        }
    }
}

impl ClauseDatabase {
    pub fn clauses(&self) -> &[ClauseRef] {
        &self.clauses
    }
    pub fn learnts(&self) -> &[ClauseRef] {
        &self.learnts
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
    pub fn num_learnts(&self) -> usize {
        self.learnts.len()
    }

    pub fn register(&mut self, cref: ClauseRef, learnt: bool) {
        if learnt {
            self.learnts.push(cref);
        } else {
            self.clauses.push(cref);
        }
    }

    /// Drops deleted clauses from the root list (used after `simplify`).
    pub fn compact(&mut self, ca: &ClauseAllocator) {
        self.clauses.retain(|&cref| !ca[cref].is_deleted());
        self.learnts.retain(|&cref| !ca[cref].is_deleted());
    }

    pub fn cla_decay_activity(&mut self) {
        self.cla_inc *= 1.0 / self.cla_decay;
    }

    pub fn cla_bump_activity(&mut self, cref: ClauseRef, ca: &mut ClauseAllocator) {
        let clause = ca.clause_mut(cref);

        if !clause.is_learnt() {
            return;
        }

        clause.activity += self.cla_inc;

        // Rescale:
        if clause.activity > CLA_RESCALE_LIMIT {
            self.cla_inc *= CLA_RESCALE_FACTOR;
            for &cref in self.learnts.iter() {
                ca.clause_mut(cref).activity *= CLA_RESCALE_FACTOR;
            }
        }
    }

    /// Discards roughly half of the learnt clauses: the lower-activity half,
    /// plus clauses above the median whose activity fell below the decaying
    /// `cla_inc / num_learnts` threshold. Clauses that are currently some
    /// variable's reason are locked and always survive. Returns the crefs of
    /// the removed clauses (already detached from the watch lists).
    pub fn reduce(
        &mut self,
        assignment: &Assignment,
        ca: &mut ClauseAllocator,
        watches: &mut WatchList,
    ) -> Vec<ClauseRef> {
        if self.learnts.is_empty() {
            return Vec::new();
        }

        self.sort_learnts(ca);

        let index_lim = self.learnts.len() / 2;
        let extra_lim = self.cla_inc / self.learnts.len() as f64;

        let mut removed = Vec::new();
        let mut i = 0;
        let learnts = std::mem::take(&mut self.learnts);
        for cref in learnts {
            let clause = ca.clause(cref);
            let locked = assignment.reason(clause[0].var()) == Some(cref);
            let discard = !locked && (i < index_lim || clause.activity() < extra_lim);
            i += 1;
            if discard {
                watches.remove(clause[0], cref);
                watches.remove(clause[1], cref);
                ca.free(cref);
                removed.push(cref);
            } else {
                self.learnts.push(cref);
            }
        }

        debug!("Removed {} of {} learnt clauses", removed.len(), i);
        removed
    }

    pub fn clear_learnts(&mut self) -> Vec<ClauseRef> {
        std::mem::take(&mut self.learnts)
    }

    /// Orders the learnt list by ascending activity: selection sort for short
    /// ranges, seeded quicksort otherwise, for reproducible reductions.
    fn sort_learnts(&mut self, ca: &ClauseAllocator) {
        let mut learnts = std::mem::take(&mut self.learnts);
        quicksort(&mut learnts, ca, &mut self.sort_rng);
        self.learnts = learnts;
    }
}

fn selection_sort(v: &mut [ClauseRef], ca: &ClauseAllocator) {
    for i in 0..v.len() {
        let mut best = i;
        for j in (i + 1)..v.len() {
            if ca[v[j]].activity() < ca[v[best]].activity() {
                best = j;
            }
        }
        v.swap(i, best);
    }
}

fn quicksort(v: &mut [ClauseRef], ca: &ClauseAllocator, rng: &mut StdRng) {
    if v.len() <= SORT_SMALL {
        selection_sort(v, ca);
        return;
    }

    let last = v.len() - 1;
    let p = rng.gen_range(0..v.len());
    v.swap(p, last);
    let pivot = ca[v[last]].activity();

    let mut store = 0;
    for i in 0..last {
        if ca[v[i]].activity() < pivot {
            v.swap(i, store);
            store += 1;
        }
    }
    v.swap(store, last);

    let (left, right) = v.split_at_mut(store);
    quicksort(left, ca, rng);
    quicksort(&mut right[1..], ca, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;

    #[test]
    fn quicksort_orders_by_activity() {
        let mut ca = ClauseAllocator::new();
        let mut crefs = Vec::new();
        // enough clauses to exercise the quicksort path
        for i in 0..40 {
            let lits = vec![Lit::from_external(1), Lit::from_external(2)];
            let cref = ca.alloc(lits, true);
            ca.clause_mut(cref).activity = ((i * 7919) % 40) as f64;
            crefs.push(cref);
        }
        let mut rng = StdRng::seed_from_u64(SORT_SEED);
        quicksort(&mut crefs, &ca, &mut rng);
        for w in crefs.windows(2) {
            assert!(ca[w[0]].activity() <= ca[w[1]].activity());
        }
    }
}
