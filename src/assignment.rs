use tracing::debug;

use crate::cref::ClauseRef;
use crate::idx::VarVec;
use crate::lbool::LBool;
use crate::lit::Lit;
use crate::var::Var;
use crate::var_order::VarOrder;

#[derive(Debug, Clone)]
pub struct VarData {
    pub(crate) reason: Option<ClauseRef>,
    pub(crate) level: usize,
}

/// The assignment state: per-variable value/reason/level, the trail with its
/// decision-level markers, and the propagation queue (`qhead` into the trail).
#[derive(Debug, Default)]
pub struct Assignment {
    assignment: VarVec<LBool>, // {var: value}
    var_data: VarVec<VarData>, // {var: {reason,level}}
    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    qhead: usize,
}

impl Assignment {
    pub const fn new() -> Self {
        Self {
            assignment: VarVec::new(),
            var_data: VarVec::new(),
            trail: vec![],
            trail_lim: vec![],
            qhead: 0,
        }
    }

    pub fn init_var(&mut self) {
        self.assignment.push(LBool::Undef);
        self.var_data.push(VarData { reason: None, level: 0 });
    }

    pub fn num_vars(&self) -> usize {
        self.assignment.len()
    }
    pub fn num_assigns(&self) -> usize {
        self.trail.len()
    }

    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment[var]
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment[lit.var()] ^ lit.negated()
    }

    /// The value of `lit` in the level-0 (fixed) part of the assignment.
    pub fn fixed(&self, lit: Lit) -> LBool {
        let value = self.value(lit);
        if !value.is_undef() && self.level(lit.var()) == 0 {
            value
        } else {
            LBool::Undef
        }
    }

    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.var_data[var].reason
    }
    pub fn level(&self, var: Var) -> usize {
        self.var_data[var].level
    }

    pub fn trail(&self) -> &[Lit] {
        &self.trail
    }

    /// The level-0 prefix of the trail: facts implied with no assumption.
    pub fn fixed_lits(&self) -> &[Lit] {
        let end = self.trail_lim.first().copied().unwrap_or(self.trail.len());
        &self.trail[..end]
    }

    pub fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }
    pub fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    /// If the literal is unassigned, assign it;
    /// if it is already assigned consistently, do nothing;
    /// if it is assigned to false (conflict), return `false`.
    pub fn enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) -> bool {
        match self.value(lit) {
            LBool::Undef => {
                self.unchecked_enqueue(lit, reason);
                true
            }
            LBool::True => {
                // existing consistent assignment => do nothing
                debug!("existing consistent assignment of {:?}", lit);
                true
            }
            LBool::False => {
                // conflict
                false
            }
        }
    }

    pub fn unchecked_enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        debug_assert_eq!(self.value(lit), LBool::Undef);

        self.assignment[lit.var()] = LBool::from(!lit.negated());
        self.var_data[lit.var()] = VarData {
            reason,
            level: self.decision_level(),
        };
        self.trail.push(lit);
    }

    pub fn dequeue(&mut self) -> Option<Lit> {
        if self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            Some(p)
        } else {
            None
        }
    }

    pub fn clear_queue(&mut self) {
        self.qhead = self.trail.len();
    }

    /// Pops the trail above `level`, resetting each variable's value, reason
    /// and level, and rewinds the order's selection cursor via `undo`.
    pub fn cancel_until(&mut self, level: usize, order: &mut VarOrder) {
        if self.decision_level() <= level {
            return;
        }
        debug!("cancel from level {} to {}", self.decision_level(), level);
        for i in (self.trail_lim[level]..self.trail.len()).rev() {
            let var = self.trail[i].var();
            self.assignment[var] = LBool::Undef;
            self.var_data[var] = VarData { reason: None, level: 0 };
            order.undo(var);
        }
        self.qhead = self.trail_lim[level];
        self.trail.truncate(self.trail_lim[level]);
        self.trail_lim.truncate(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_and_cancel() {
        let mut assignment = Assignment::new();
        let mut order = VarOrder::new(0.95);
        for _ in 0..3 {
            assignment.init_var();
            order.init_var(Var::new(order.num_vars() as u32));
        }
        let a = Lit::new(Var::new(0), false);
        let b = Lit::new(Var::new(1), true);

        assert!(assignment.enqueue(a, None));
        assert_eq!(assignment.level(a.var()), 0);
        assert_eq!(assignment.value(a), LBool::True);
        assert_eq!(assignment.value(!a), LBool::False);
        // consistent repeat is a no-op success, opposite value fails
        assert!(assignment.enqueue(a, None));
        assert!(!assignment.enqueue(!a, None));

        assignment.new_decision_level();
        assignment.unchecked_enqueue(b, None);
        assert_eq!(assignment.level(b.var()), 1);
        assert_eq!(assignment.num_assigns(), 2);
        assert_eq!(assignment.fixed_lits(), &[a]);

        assignment.cancel_until(0, &mut order);
        assert_eq!(assignment.decision_level(), 0);
        assert_eq!(assignment.num_assigns(), 1);
        assert!(assignment.value(b).is_undef());
        assert_eq!(assignment.value(a), LBool::True);
    }
}
