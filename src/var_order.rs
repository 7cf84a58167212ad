use tracing::info;

use crate::assignment::Assignment;
use crate::idx::VarVec;
use crate::var::Var;

const ACTIVITY_RESCALE_LIMIT: f64 = 1e100;
const ACTIVITY_RESCALE_FACTOR: f64 = 1e-100;

/// Activity-ordered variable selection.
///
/// Not a binary heap: a position<->variable array kept approximately
/// activity-sorted lazily. Selection scans forward from a cached cursor for
/// the first unassigned variable; bumping bubbles a variable toward the front
/// insertion-style; cancelling an assignment rewinds the cursor.
#[derive(Debug)]
pub struct VarOrder {
    /// position -> variable
    vars: Vec<Var>,
    /// variable -> position
    pos: VarVec<usize>,
    activity: VarVec<f64>,
    cursor: usize,
    var_decay: f64,
    var_inc: f64,
}

impl VarOrder {
    pub fn new(var_decay: f64) -> Self {
        debug_assert!(var_decay > 0.0 && var_decay < 1.0);
        Self {
            vars: Vec::new(),
            pos: VarVec::new(),
            activity: VarVec::new(),
            cursor: 0,
            var_decay,
            var_inc: 1.0,
        }
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn activity(&self, var: Var) -> f64 {
        self.activity[var]
    }

    pub fn init_var(&mut self, var: Var) {
        debug_assert_eq!(var.index(), self.vars.len());
        self.pos.push(self.vars.len());
        self.vars.push(var);
        self.activity.push(0.0);
    }

    /// Returns the highest-activity unassigned variable reachable by a
    /// forward scan from the cached cursor, advancing the cursor to it.
    pub fn select(&mut self, assignment: &Assignment) -> Option<Var> {
        let mut i = self.cursor;
        while i < self.vars.len() {
            let var = self.vars[i];
            if assignment.value_var(var).is_undef() {
                self.cursor = i;
                return Some(var);
            }
            i += 1;
        }
        self.cursor = self.vars.len();
        None
    }

    /// Bubbles `var` toward the front while the predecessor's activity is
    /// lower, rewinding the cursor if the variable lands before it.
    pub fn update(&mut self, var: Var) {
        let mut p = self.pos[var];
        while p > 0 && self.activity[self.vars[p - 1]] < self.activity[var] {
            let prev = self.vars[p - 1];
            self.vars.swap(p - 1, p);
            self.pos[prev] = p;
            self.pos[var] = p - 1;
            p -= 1;
        }
        if p < self.cursor {
            self.cursor = p;
        }
    }

    /// Rewinds the selection cursor to `var`'s position, if earlier.
    pub fn undo(&mut self, var: Var) {
        let p = self.pos[var];
        if p < self.cursor {
            self.cursor = p;
        }
    }

    pub fn decay_activity(&mut self) {
        self.var_inc /= self.var_decay;
    }

    pub fn bump_activity(&mut self, var: Var) {
        self.activity[var] += self.var_inc;

        // Rescale large activities, if necessary:
        if self.activity[var] > ACTIVITY_RESCALE_LIMIT {
            self.rescale_activity();
        }

        self.update(var);
    }

    fn rescale_activity(&mut self) {
        info!("Rescaling activity");
        for a in self.activity.iter_mut() {
            *a *= ACTIVITY_RESCALE_FACTOR;
        }
        self.var_inc *= ACTIVITY_RESCALE_FACTOR;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: usize) -> (VarOrder, Assignment) {
        let mut order = VarOrder::new(0.95);
        let mut assignment = Assignment::new();
        for i in 0..n {
            order.init_var(Var::new(i as u32));
            assignment.init_var();
        }
        (order, assignment)
    }

    #[test]
    fn select_scans_forward() {
        let (mut order, mut assignment) = setup(3);
        let v0 = Var::new(0);
        let v1 = Var::new(1);

        assert_eq!(order.select(&assignment), Some(v0));
        assignment.enqueue(crate::lit::Lit::new(v0, false), None);
        assert_eq!(order.select(&assignment), Some(v1));
    }

    #[test]
    fn bump_bubbles_to_front() {
        let (mut order, assignment) = setup(3);
        let v2 = Var::new(2);

        order.bump_activity(v2);
        assert_eq!(order.select(&assignment), Some(v2));
    }

    #[test]
    fn undo_rewinds_cursor() {
        let (mut order, mut assignment) = setup(3);
        let v0 = Var::new(0);
        let v1 = Var::new(1);

        assignment.enqueue(crate::lit::Lit::new(v0, false), None);
        assignment.new_decision_level();
        assignment.unchecked_enqueue(crate::lit::Lit::new(v1, false), None);
        assert_eq!(order.select(&assignment), Some(Var::new(2)));

        // freeing an earlier position must make it selectable again
        assignment.cancel_until(0, &mut order);
        assert_eq!(order.select(&assignment), Some(v1));
    }

    #[test]
    fn rescale_keeps_relative_order() {
        let (mut order, _assignment) = setup(2);
        let v0 = Var::new(0);
        let v1 = Var::new(1);

        order.activity[v0] = ACTIVITY_RESCALE_LIMIT * 0.9;
        order.bump_activity(v0);
        order.bump_activity(v1);
        assert!(order.activity(v0) > order.activity(v1));
        assert!(order.activity(v0) < ACTIVITY_RESCALE_LIMIT);
    }
}
