use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::assignment::Assignment;
use crate::lbool::LBool;
use crate::lit::Lit;

/// A clause. The literal sequence is fixed at creation, except for level-0
/// simplification, which may shrink it. Positions 0 and 1 are the two
/// watched literals.
#[derive(Debug, Clone)]
pub struct Clause {
    pub(crate) lits: Vec<Lit>,
    learnt: bool,
    deleted: bool,
    /// Activity of a learnt clause (unused for root clauses).
    pub(crate) activity: f64,
}

impl Clause {
    pub const fn new(lits: Vec<Lit>, learnt: bool) -> Self {
        Self {
            lits,
            learnt,
            deleted: false,
            activity: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub const fn is_learnt(&self) -> bool {
        self.learnt
    }

    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }
    pub fn mark_deleted(&mut self) {
        debug_assert!(!self.deleted);
        self.deleted = true;
    }

    pub const fn activity(&self) -> f64 {
        self.activity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    /// Checks the clause against the level-0 (fixed) part of the assignment:
    /// `True` if some literal is satisfied at level 0, `False` if some literal
    /// is falsified at level 0, `Undef` otherwise.
    pub fn fixed_status(&self, assignment: &Assignment) -> LBool {
        let mut shrinkable = false;
        for &lit in &self.lits {
            match assignment.fixed(lit) {
                LBool::True => return LBool::True,
                LBool::False => shrinkable = true,
                LBool::Undef => {}
            }
        }
        if shrinkable {
            LBool::False
        } else {
            LBool::Undef
        }
    }

    /// Removes the literals falsified at level 0, keeping the literal order.
    /// Returns the removed literals. The watched positions survive: after
    /// propagation to fixpoint at level 0 neither watch is false.
    pub fn remove_falsified(&mut self, assignment: &Assignment) -> Vec<Lit> {
        debug_assert!(assignment.fixed(self.lits[0]) != LBool::False);
        debug_assert!(self.lits.len() < 2 || assignment.fixed(self.lits[1]) != LBool::False);
        let mut removed = Vec::new();
        self.lits.retain(|&lit| {
            if assignment.fixed(lit) == LBool::False {
                removed.push(lit);
                false
            } else {
                true
            }
        });
        removed
    }
}

impl Index<usize> for Clause {
    type Output = Lit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.lits[index]
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.lits.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}
