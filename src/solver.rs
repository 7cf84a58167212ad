use std::cmp::Reverse;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use tap::Tap;
use tracing::{debug, info};

use crate::assignment::Assignment;
use crate::clause_allocator::ClauseAllocator;
use crate::clause_database::ClauseDatabase;
use crate::cref::ClauseRef;
use crate::idx::{CrefVec, VarVec};
use crate::interpolate::{self, BooleanOps};
use crate::lbool::LBool;
use crate::learning::LearningSchedule;
use crate::lit::Lit;
use crate::options::Options;
use crate::proof::{Antecedent, Proof};
use crate::utils::parse_dimacs_clause;
use crate::utils::read_maybe_gzip;
use crate::var::Var;
use crate::var_order::VarOrder;
use crate::watch::{WatchList, Watcher};

#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize)]
pub enum SolveResult {
    Sat,
    Unsat,
    /// The backtrack budget ran out. The instance stays consistent and the
    /// next `solve` call resumes with everything learned so far.
    Unknown,
}

#[derive(Debug)]
pub struct Solver {
    ca: ClauseAllocator,
    db: ClauseDatabase,
    watchlist: WatchList,
    assignment: Assignment,
    var_order: VarOrder,
    learning: LearningSchedule,
    options: Options,
    ok: bool,
    next_var: u32,
    root_level: usize,
    // Conflict analysis scratch: a var is "seen" iff its stamp is current.
    seen: VarVec<u64>,
    analysis_stamp: u64,
    model: Vec<LBool>,
    // Enumeration
    projection: Option<Vec<Var>>,
    solutions: Vec<Vec<Lit>>,
    // Proof recording
    proof: Option<Proof>,
    clause_ante: CrefVec<Option<Antecedent>>,
    unit_ante: VarVec<Option<Antecedent>>,
    var_type_a: VarVec<bool>,
    verbosity: u32,
    // Statistics
    decisions: usize,
    propagations: usize,
    conflicts: usize,
    restarts: usize,
    reduces: usize,
    // Timings
    pub time_search: Duration,
    pub time_propagate: Duration,
}

impl Solver {
    pub fn new(options: Options) -> Self {
        Self {
            ca: ClauseAllocator::new(),
            db: ClauseDatabase::new(options.cla_decay),
            watchlist: WatchList::new(),
            assignment: Assignment::new(),
            var_order: VarOrder::new(options.var_decay),
            learning: LearningSchedule::new(&options),
            options,
            ok: true,
            next_var: 0,
            root_level: 0,
            seen: VarVec::new(),
            analysis_stamp: 0,
            model: Vec::new(),
            projection: None,
            solutions: Vec::new(),
            proof: None,
            clause_ante: CrefVec::new(),
            unit_ante: VarVec::new(),
            var_type_a: VarVec::new(),
            verbosity: 0,
            decisions: 0,
            propagations: 0,
            conflicts: 0,
            restarts: 0,
            reduces: 0,
            time_search: Duration::new(0, 0),
            time_propagate: Duration::new(0, 0),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut solver = Self::default();
        solver.init_from_file(path)?;
        Ok(solver)
    }

    /// Reads a DIMACS CNF file (gzipped when the extension is `.gz`) and adds
    /// its clauses. Comment and header lines are skipped.
    pub fn init_from_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        for line in read_maybe_gzip(path)?.lines() {
            let line = line?;
            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if line.starts_with('p') {
                debug!("skipping header '{}'", line);
                continue;
            }
            let lits = parse_dimacs_clause(&line);
            self.add_clause(&lits);
        }
        Ok(())
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Solver {
    pub fn num_vars(&self) -> usize {
        self.next_var as _
    }
    pub fn num_clauses(&self) -> usize {
        self.db.num_clauses()
    }
    pub fn num_learnts(&self) -> usize {
        self.db.num_learnts()
    }
    pub fn num_decisions(&self) -> usize {
        self.decisions
    }
    pub fn num_propagations(&self) -> usize {
        self.propagations
    }
    pub fn num_conflicts(&self) -> usize {
        self.conflicts
    }
    pub fn num_restarts(&self) -> usize {
        self.restarts
    }
    pub fn num_reduces(&self) -> usize {
        self.reduces
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn set_verbosity(&mut self, verbosity: u32) {
        self.verbosity = verbosity;
    }

    pub fn new_var(&mut self) -> Var {
        let var = Var(self.next_var);
        self.next_var += 1;
        self.watchlist.init(var);
        self.assignment.init_var();
        self.var_order.init_var(var);
        self.seen.push(0);
        self.unit_ante.push(None);
        self.var_type_a.push(false);
        var
    }

    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment.value_var(var)
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment.value(lit)
    }

    /// The model snapshot taken at the last `Sat` answer, one value per var.
    pub fn model(&self) -> &[LBool] {
        &self.model
    }
    pub fn model_value(&self, lit: Lit) -> LBool {
        self.model[lit.var().index()] ^ lit.negated()
    }

    // ==========================================
    // Clause addition
    // ==========================================

    /// Adds a clause. Literals falsified at level 0 are dropped, satisfied or
    /// tautological clauses are not stored, unit clauses become level-0 facts.
    /// Returns `false` iff the clause set is now unsatisfiable; afterwards the
    /// instance stays in a permanent-UNSAT state.
    pub fn add_clause(&mut self, lits: &[Lit]) -> bool {
        assert_eq!(self.assignment.decision_level(), 0);

        // Auto-create missing variables.
        for &lit in lits {
            while lit.var().index() >= self.num_vars() {
                self.new_var();
            }
        }

        // The verbatim clause is recorded even when it is not stored, so that
        // root indices keep matching the order of `add_clause` calls.
        let mut ante = if self.proof.is_some() {
            Some(self.proof.as_mut().unwrap().add_root(lits))
        } else {
            None
        };

        if !self.ok {
            return false;
        }

        let mut lits = lits.to_vec();
        lits.sort();
        lits.dedup();

        // Tautology:
        if lits.windows(2).any(|w| w[0] == !w[1]) {
            return true;
        }

        // Level-0 filtering:
        let mut satisfied = false;
        let mut removed = Vec::new();
        lits.retain(|&lit| match self.assignment.fixed(lit) {
            LBool::True => {
                satisfied = true;
                true
            }
            LBool::False => {
                removed.push(lit);
                false
            }
            LBool::Undef => true,
        });
        if satisfied {
            return true;
        }
        if let Some(a) = ante {
            let mut a = a;
            for lit in removed {
                let u = self.unit_antecedent(lit.var());
                a = self.proof.as_mut().unwrap().resolve(a, u, lit.var());
            }
            ante = Some(a);
        }

        match lits.len() {
            0 => {
                debug!("adding the empty clause");
                self.ok = false;
                if let Some(a) = ante {
                    self.proof.as_mut().unwrap().set_empty(a);
                }
            }
            1 => {
                let lit = lits[0];
                if self.assignment.enqueue(lit, None) {
                    if self.unit_ante[lit.var()].is_none() {
                        self.unit_ante[lit.var()] = ante;
                    }
                } else {
                    // contradicts an existing level-0 fact
                    self.ok = false;
                    if let Some(a) = ante {
                        let u = self.unit_antecedent(lit.var());
                        let empty = self.proof.as_mut().unwrap().resolve(a, u, lit.var());
                        self.proof.as_mut().unwrap().set_empty(empty);
                    }
                }
            }
            _ => {
                let cref = self.alloc_clause(lits, false, ante);
                self.db.register(cref, false);
                self.attach_clause(cref);
            }
        }
        self.ok
    }

    fn alloc_clause(&mut self, lits: Vec<Lit>, learnt: bool, ante: Option<Antecedent>) -> ClauseRef {
        let cref = self.ca.alloc(lits, learnt);
        self.clause_ante.push(ante);
        cref
    }

    fn attach_clause(&mut self, cref: ClauseRef) {
        let clause = &self.ca[cref];
        debug_assert!(clause.len() >= 2);
        let (a, b) = (clause[0], clause[1]);
        self.watchlist.insert(a, Watcher { cref, blocker: b });
        self.watchlist.insert(b, Watcher { cref, blocker: a });
    }

    fn detach_clause(&mut self, cref: ClauseRef) {
        let clause = &self.ca[cref];
        let (a, b) = (clause[0], clause[1]);
        self.watchlist.remove(a, cref);
        self.watchlist.remove(b, cref);
    }

    // ==========================================
    // Propagation
    // ==========================================

    fn propagate(&mut self) -> Option<ClauseRef> {
        let mut conflict = None;

        while let Some(p) = self.assignment.dequeue() {
            self.propagations += 1;
            let false_literal = !p;

            let mut watchers = std::mem::take(self.watchlist.lookup(false_literal));
            let mut i = 0;
            let mut j = 0;

            'watches: while i < watchers.len() {
                let w = watchers[i];
                i += 1;

                // Try to avoid inspecting the clause:
                if self.assignment.value(w.blocker) == LBool::True {
                    watchers[j] = w;
                    j += 1;
                    continue;
                }

                let cref = w.cref;

                // Make sure the false literal is at index 1:
                {
                    let clause = self.ca.clause_mut(cref);
                    if clause[0] == false_literal {
                        clause.lits.swap(0, 1);
                    }
                    debug_assert_eq!(clause[1], false_literal);
                }

                let first = self.ca[cref][0];
                let w = Watcher { cref, blocker: first };
                if self.assignment.value(first) == LBool::True {
                    watchers[j] = w;
                    j += 1;
                    continue;
                }

                // Find a replacement watch:
                for k in 2..self.ca[cref].len() {
                    let other = self.ca[cref][k];
                    if self.assignment.value(other) != LBool::False {
                        self.ca.clause_mut(cref).lits.swap(1, k);
                        self.watchlist.insert(other, w);
                        continue 'watches;
                    }
                }

                // Clause is unit or conflicting under the current assignment:
                watchers[j] = w;
                j += 1;
                if self.assignment.value(first) == LBool::False {
                    conflict = Some(cref);
                    self.assignment.clear_queue();
                    // Copy the remaining watches:
                    while i < watchers.len() {
                        watchers[j] = watchers[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    self.assignment.unchecked_enqueue(first, Some(cref));
                }
            }

            watchers.truncate(j);
            *self.watchlist.lookup(false_literal) = watchers;
        }

        conflict
    }

    // ==========================================
    // Conflict analysis
    // ==========================================

    /// 1-UIP conflict analysis. Returns the learnt clause (asserting literal
    /// first), the backtrack level, and, when recording, the derivation of the
    /// learnt clause.
    fn analyze(&mut self, conflict: ClauseRef) -> (Vec<Lit>, usize, Option<Antecedent>) {
        debug_assert!(self.assignment.decision_level() > self.root_level);

        self.analysis_stamp += 1;
        let stamp = self.analysis_stamp;

        let mut lemma = Vec::new();
        let mut zero_vars = Vec::new();
        let mut ante = if self.proof.is_some() { self.clause_ante[conflict] } else { None };
        let mut counter: u32 = 0;
        let mut confl = conflict;
        let mut start_index = 0; // 0 for the initial conflict, 1 thereafter
        let mut index = self.assignment.trail().len();

        loop {
            if self.ca[confl].is_learnt() {
                self.db.cla_bump_activity(confl, &mut self.ca);
            }

            for j in start_index..self.ca[confl].len() {
                let q = self.ca[confl][j];
                debug_assert_eq!(self.assignment.value(q), LBool::False);
                let v = q.var();
                if self.seen[v] == stamp {
                    continue;
                }
                if self.assignment.level(v) > 0 {
                    self.seen[v] = stamp;
                    self.var_order.bump_activity(v);
                    if self.assignment.level(v) < self.assignment.decision_level() {
                        lemma.push(q);
                    } else {
                        counter += 1;
                    }
                } else if self.proof.is_some() {
                    // dropped from the lemma; resolved in below
                    self.seen[v] = stamp;
                    zero_vars.push(v);
                }
            }

            // Select the next clause to look at:
            loop {
                index -= 1;
                if self.seen[self.assignment.trail()[index].var()] == stamp {
                    break;
                }
            }
            let p = self.assignment.trail()[index];
            self.seen[p.var()] = 0;
            counter -= 1;
            if counter == 0 {
                // Prepend the asserting literal:
                lemma.insert(0, !p);
                break;
            }
            let reason = self.assignment.reason(p.var()).unwrap();
            debug_assert_eq!(p, self.ca[reason][0]);
            if let Some(a) = ante {
                let r = self.clause_ante[reason].unwrap();
                ante = Some(self.proof.as_mut().unwrap().resolve(a, r, p.var()));
            }
            confl = reason;
            start_index = 1;
        }

        // Close the derivation over the level-0 facts consumed on the way:
        if let Some(mut a) = ante {
            for v in zero_vars {
                let u = self.unit_antecedent(v);
                a = self.proof.as_mut().unwrap().resolve(a, u, v);
            }
            ante = Some(a);
        }

        // Backtrack level: the second-highest decision level in the lemma.
        let bt_level = lemma
            .iter()
            .skip(1)
            .map(|lit| self.assignment.level(lit.var()))
            .max()
            .unwrap_or(0);

        (lemma, bt_level, ante)
    }

    /// Stores a learnt clause and enqueues its asserting literal. The second
    /// watch is the highest-level literal among the remaining positions; unit
    /// lemmas become level-0 facts instead of clause objects.
    fn record_learnt(&mut self, mut lemma: Vec<Lit>, ante: Option<Antecedent>) {
        debug_assert!(!lemma.is_empty());

        if lemma.len() == 1 {
            self.assignment.unchecked_enqueue(lemma[0], None);
            if self.assignment.decision_level() == 0 {
                let var = lemma[0].var();
                if self.unit_ante[var].is_none() {
                    self.unit_ante[var] = ante;
                }
            }
        } else {
            let mut max_i = 1;
            for i in 2..lemma.len() {
                if self.assignment.level(lemma[i].var()) > self.assignment.level(lemma[max_i].var()) {
                    max_i = i;
                }
            }
            lemma.swap(1, max_i);

            let cref = self.alloc_clause(lemma, true, ante);
            self.db.register(cref, true);
            self.attach_clause(cref);
            self.db.cla_bump_activity(cref, &mut self.ca);
            let first = self.ca[cref][0];
            self.assignment.unchecked_enqueue(first, Some(cref));
        }
    }

    /// Handles a conflict clause found by propagation (or an exhausted
    /// blocking clause). Returns `false` iff the conflict proves UNSAT.
    fn handle_conflict(&mut self, conflict: ClauseRef) -> bool {
        self.conflicts += 1;

        if self.assignment.decision_level() <= self.root_level {
            info!("UNSAT");
            if self.assignment.decision_level() == 0 {
                // a refutation of the clause set itself, not of the assumptions
                self.ok = false;
                if self.proof.is_some() {
                    self.record_final(conflict);
                }
            }
            return false;
        }

        let (lemma, bt_level, ante) = self.analyze(conflict);
        self.assignment.cancel_until(bt_level.max(self.root_level), &mut self.var_order);
        self.record_learnt(lemma, ante);

        self.var_order.decay_activity();
        self.db.cla_decay_activity();
        self.learning.on_conflict();
        true
    }

    // ==========================================
    // Proof bookkeeping
    // ==========================================

    /// The derivation of the level-0 fact `var`, resolving the reason chain
    /// down to a unit clause. Memoized.
    fn unit_antecedent(&mut self, var: Var) -> Antecedent {
        debug_assert_eq!(self.assignment.level(var), 0);
        if let Some(a) = self.unit_ante[var] {
            return a;
        }
        let reason = self
            .assignment
            .reason(var)
            .expect("level-0 fact without a recorded derivation");
        let mut ante = self.clause_ante[reason].unwrap();
        let lits: Vec<Lit> = self.ca[reason].lits().to_vec();
        for lit in lits {
            if lit.var() == var {
                continue;
            }
            let u = self.unit_antecedent(lit.var());
            ante = self.proof.as_mut().unwrap().resolve(ante, u, lit.var());
        }
        self.unit_ante[var] = Some(ante);
        ante
    }

    /// Resolves a level-0 conflict clause against the unit derivations of all
    /// its literals, yielding the empty clause.
    fn record_final(&mut self, conflict: ClauseRef) {
        let Some(mut ante) = self.clause_ante[conflict] else {
            return;
        };
        let lits: Vec<Lit> = self.ca[conflict].lits().to_vec();
        for lit in lits {
            let u = self.unit_antecedent(lit.var());
            ante = self.proof.as_mut().unwrap().resolve(ante, u, lit.var());
        }
        self.proof.as_mut().unwrap().set_empty(ante);
    }

    pub fn enable_proof_recording(&mut self) {
        assert_eq!(self.db.num_clauses(), 0, "recording must be enabled before any clause is added");
        assert_eq!(self.assignment.num_assigns(), 0);
        self.proof = Some(Proof::new());
    }

    pub fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    /// Marks the root clause with the given `add_clause` index as part of the
    /// A-partition for interpolation.
    pub fn mark_clause_type_a(&mut self, index: usize) {
        self.proof
            .as_mut()
            .expect("proof recording is not enabled")
            .set_type_a(index);
    }

    /// Marks a variable as A-local (`true`) or shared (`false`).
    pub fn set_var_type_a(&mut self, var: Var, type_a: bool) {
        self.var_type_a[var] = type_a;
    }

    pub fn compute_interpolant<B: BooleanOps>(&self, ops: &mut B) -> Option<B::Term> {
        let proof = self.proof.as_ref()?;
        interpolate::interpolant(proof, &self.var_type_a, ops)
    }

    // ==========================================
    // Enumeration
    // ==========================================

    /// Enumerate all assignments to `vars` consistent with the clauses, via
    /// solve-and-block; results accumulate in `solutions()`.
    pub fn set_projection(&mut self, vars: &[Var]) {
        self.projection = Some(vars.to_vec());
    }

    pub fn clear_projection(&mut self) {
        self.projection = None;
    }

    pub fn solutions(&self) -> &[Vec<Lit>] {
        &self.solutions
    }

    /// Records the current full assignment restricted to the projection and
    /// blocks it with the negation of its projection literals, handled like a
    /// conflict clause. `Some(Sat)` means the enumeration is exhausted.
    fn block_solution(&mut self) -> Option<SolveResult> {
        let projection = self.projection.as_ref().unwrap();
        let solution: Vec<Lit> = projection
            .iter()
            .map(|&var| Lit::new(var, self.assignment.value_var(var).is_false()))
            .collect();
        debug!("solution #{}: {:?}", self.solutions.len() + 1, solution);
        self.solutions.push(solution.clone());

        if solution.is_empty() {
            return Some(SolveResult::Sat);
        }

        let mut block: Vec<Lit> = solution.iter().map(|&lit| !lit).collect();
        // Two highest-level literals first, like a conflict clause.
        block.sort_by_key(|&lit| Reverse(self.assignment.level(lit.var())));

        if self.assignment.level(block[0].var()) <= self.root_level {
            // the whole projection is forced; nothing left to flip
            return Some(SolveResult::Sat);
        }

        if block.len() == 1 {
            self.assignment.cancel_until(self.root_level, &mut self.var_order);
            self.assignment.unchecked_enqueue(block[0], None);
            return None;
        }

        let bt_level = self.assignment.level(block[1].var()).max(self.root_level);
        let conflicting = self.assignment.level(block[0].var()) == bt_level;
        let cref = self.alloc_clause(block, false, None);
        self.db.register(cref, false);
        self.attach_clause(cref);
        self.assignment.cancel_until(bt_level, &mut self.var_order);
        if conflicting {
            // both watches falsified at the backtrack level
            if !self.handle_conflict(cref) {
                return Some(SolveResult::Sat);
            }
        } else {
            let first = self.ca[cref][0];
            self.assignment.unchecked_enqueue(first, Some(cref));
        }
        None
    }

    // ==========================================
    // Search
    // ==========================================

    /// One restart-bounded pass of the CDCL loop. `None` means a restart.
    fn search(&mut self, nof_conflicts: usize, budget: &mut Option<u64>) -> Option<SolveResult> {
        debug_assert!(self.ok);

        let mut current_conflicts = 0;

        loop {
            let time_propagate_start = Instant::now();
            let conflict = self.propagate().tap(|_| {
                self.time_propagate += time_propagate_start.elapsed();
            });

            if let Some(conflict) = conflict {
                current_conflicts += 1;
                if !self.handle_conflict(conflict) {
                    return Some(SolveResult::Unsat);
                }
                if let Some(b) = budget {
                    *b = b.saturating_sub(1);
                }
            } else {
                // NO conflict

                // Budget, checked once per decision cycle:
                if *budget == Some(0) {
                    info!("backtrack budget exhausted");
                    self.assignment.cancel_until(self.root_level, &mut self.var_order);
                    return Some(SolveResult::Unknown);
                }

                // Restart:
                if nof_conflicts > 0 && current_conflicts >= nof_conflicts {
                    self.restarts += 1;
                    if self.verbosity > 0 {
                        info!(
                            "restart #{}: {} conflicts, {} learnts, {} clauses",
                            self.restarts,
                            self.conflicts,
                            self.num_learnts(),
                            self.num_clauses()
                        );
                    }
                    self.assignment.cancel_until(self.root_level, &mut self.var_order);
                    return None;
                }

                // Reduce the learnt database:
                if self.num_learnts() >= self.learning.limit(self.assignment.num_assigns()) {
                    self.reduce_db();
                }

                // Make a decision:
                if let Some(var) = self.var_order.select(&self.assignment) {
                    self.decisions += 1;
                    let decision = Lit::new(var, false); // positive phase
                    self.assignment.new_decision_level();
                    self.assignment.unchecked_enqueue(decision, None);
                } else if self.projection.is_some() {
                    if let Some(result) = self.block_solution() {
                        return Some(result);
                    }
                } else {
                    info!("SAT");
                    self.model = (0..self.num_vars())
                        .map(|i| self.assignment.value_var(Var(i as u32)))
                        .collect();
                    return Some(SolveResult::Sat);
                }
            }
        }
    }

    pub fn solve(&mut self) -> SolveResult {
        self.solve_with(&[], None)
    }

    /// Solves under the given assumptions with an optional backtrack budget.
    /// On `Unknown` the trail is canceled to the root level and the instance
    /// is resumable; learnt clauses and activities persist across calls.
    pub fn solve_with(&mut self, assumptions: &[Lit], backtrack_limit: Option<u64>) -> SolveResult {
        let time_start = Instant::now();

        if !self.ok {
            return SolveResult::Unsat;
        }
        debug_assert!(
            self.proof.is_none() || self.projection.is_none(),
            "proof recording and enumeration are mutually exclusive"
        );

        self.assignment.cancel_until(0, &mut self.var_order);
        self.solutions.clear();
        self.learning.reset(self.db.num_clauses());

        for &lit in assumptions {
            self.assignment.new_decision_level();
            if !self.assignment.enqueue(lit, None) || self.propagate().is_some() {
                debug!("assumption {} failed", lit);
                self.assignment.cancel_until(0, &mut self.var_order);
                return SolveResult::Unsat;
            }
        }
        self.root_level = self.assignment.decision_level();

        let mut budget = backtrack_limit;
        let mut nof_conflicts = self.options.restart_init as f64;
        let mut status = None;
        while status.is_none() {
            let time_search_start = Instant::now();
            status = self.search(nof_conflicts as usize, &mut budget).tap(|_| {
                self.time_search += time_search_start.elapsed();
            });
            nof_conflicts *= self.options.restart_inc;
        }

        self.assignment.cancel_until(0, &mut self.var_order);
        self.root_level = 0;

        let mut result = status.unwrap();
        // With a projection, exhaustion can also surface as a root conflict
        // once the blocking clauses cover the whole space.
        if self.projection.is_some() && result == SolveResult::Unsat && !self.solutions.is_empty() {
            result = SolveResult::Sat;
        }
        debug!("solve done in {:?}: {:?}", time_start.elapsed(), result);
        result
    }

    // ==========================================
    // Database maintenance
    // ==========================================

    fn reduce_db(&mut self) {
        self.reduces += 1;
        self.db.reduce(&self.assignment, &mut self.ca, &mut self.watchlist);
    }

    /// Level-0 simplification: removes satisfied clauses and shrinks the rest
    /// by their falsified literals. Idempotent at a propagation fixpoint.
    pub fn simplify(&mut self) -> bool {
        assert_eq!(self.assignment.decision_level(), 0);
        if !self.ok {
            return false;
        }

        if let Some(conflict) = self.propagate() {
            self.ok = false;
            if self.proof.is_some() {
                self.record_final(conflict);
            }
            return false;
        }

        let crefs: Vec<ClauseRef> = self.db.clauses().iter().chain(self.db.learnts()).copied().collect();
        for cref in crefs {
            match self.ca[cref].fixed_status(&self.assignment) {
                LBool::True => {
                    self.detach_clause(cref);
                    self.ca.free(cref);
                }
                LBool::False => {
                    let removed = self.ca.clause_mut(cref).remove_falsified(&self.assignment);
                    debug_assert!(self.ca[cref].len() >= 2);
                    if let Some(mut a) = self.clause_ante[cref] {
                        for lit in removed {
                            let u = self.unit_antecedent(lit.var());
                            a = self.proof.as_mut().unwrap().resolve(a, u, lit.var());
                        }
                        self.clause_ante[cref] = Some(a);
                    }
                }
                LBool::Undef => {}
            }
        }
        self.db.compact(&self.ca);
        true
    }

    /// Bulk-discards all learnt clauses, for incremental reuse between
    /// independent solve calls.
    pub fn remove_learned(&mut self) {
        assert_eq!(self.assignment.decision_level(), 0);
        for cref in self.db.clear_learnts() {
            self.detach_clause(cref);
            self.ca.free(cref);
        }
    }

    /// Dumps the stored clauses in DIMACS form, followed by the level-0 unit
    /// facts, one clause per line, without a problem header.
    pub fn write_dimacs<W: Write>(&self, w: &mut W) -> io::Result<()> {
        use itertools::Itertools;
        for &cref in self.db.clauses() {
            let clause = &self.ca[cref];
            if clause.is_deleted() {
                continue;
            }
            writeln!(w, "{} 0", clause.iter().join(" "))?;
        }
        for &lit in self.assignment.fixed_lits() {
            writeln!(w, "{} 0", lit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sat_and_unsat() {
        let mut solver = Solver::default();

        let tie = Lit::new(solver.new_var(), false);
        let shirt = Lit::new(solver.new_var(), false);
        solver.add_clause(&[-tie, shirt]);
        solver.add_clause(&[tie, shirt]);
        solver.add_clause(&[-tie, -shirt]);

        assert_eq!(solver.solve(), SolveResult::Sat);
        assert_eq!(solver.model_value(tie), LBool::False);
        assert_eq!(solver.model_value(shirt), LBool::True);

        solver.add_clause(&[tie]);
        assert_eq!(solver.solve(), SolveResult::Unsat);
    }

    #[test]
    fn learnt_second_watch_is_highest_level() {
        let mut solver = Solver::default();
        let a = Lit::new(solver.new_var(), false);
        let b = Lit::new(solver.new_var(), false);
        let c = Lit::new(solver.new_var(), false);
        let d = Lit::new(solver.new_var(), false);

        solver.assignment.new_decision_level();
        solver.assignment.unchecked_enqueue(a, None); // level 1
        solver.assignment.new_decision_level();
        solver.assignment.unchecked_enqueue(b, None); // level 2
        solver.assignment.new_decision_level();
        solver.assignment.unchecked_enqueue(c, None); // level 3

        // asserting literal first, the rest in arbitrary order
        solver.record_learnt(vec![d, -a, -c, -b], None);

        let cref = solver.db.learnts()[0];
        assert_eq!(solver.ca[cref][0], d);
        assert_eq!(solver.ca[cref][1], -c);
        assert_eq!(solver.value(d), LBool::True);
    }

    #[test]
    fn empty_clause_is_immediate_unsat() {
        let mut solver = Solver::default();
        assert!(!solver.add_clause(&[]));
        assert_eq!(solver.solve(), SolveResult::Unsat);
    }

    #[test]
    fn contradicting_units() {
        let mut solver = Solver::default();
        let x = Lit::new(solver.new_var(), false);
        assert!(solver.add_clause(&[x]));
        assert!(!solver.add_clause(&[-x]));
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert_eq!(solver.num_decisions(), 0);
    }

    #[test]
    fn simplify_removes_satisfied_clauses() {
        let mut solver = Solver::default();
        let x = Lit::new(solver.new_var(), false);
        let y = Lit::new(solver.new_var(), false);
        let z = Lit::new(solver.new_var(), false);
        solver.add_clause(&[x, y]);
        solver.add_clause(&[-x, y, z]);
        solver.add_clause(&[x]);

        assert!(solver.simplify());
        // (x y) is satisfied; (-x y z) shrinks to (y z)
        assert_eq!(solver.num_clauses(), 1);
        let cref = solver.db.clauses()[0];
        assert_eq!(solver.ca[cref].lits(), &[y, z]);

        // idempotent
        assert!(solver.simplify());
        assert_eq!(solver.num_clauses(), 1);
        assert_eq!(solver.solve(), SolveResult::Sat);
    }
}
