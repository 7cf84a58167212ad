use crate::idx::VarVec;
use crate::proof::{Proof, TraceStep};
use crate::var::Var;

/// Boolean-algebra callbacks used to materialize an interpolant into an
/// arbitrary target representation (BDDs, AIGs, plain formula trees).
///
/// `reference`/`recursive_deref` exist for reference-counted backends; the
/// defaults are no-ops.
pub trait BooleanOps {
    type Term: Clone;

    fn const0(&mut self) -> Self::Term;
    fn const1(&mut self) -> Self::Term;
    fn var(&mut self, var: Var) -> Self::Term;
    fn not(&mut self, t: &Self::Term) -> Self::Term;
    fn and(&mut self, a: &Self::Term, b: &Self::Term) -> Self::Term;
    fn or(&mut self, a: &Self::Term, b: &Self::Term) -> Self::Term;

    fn reference(&mut self, _t: &Self::Term) {}
    fn recursive_deref(&mut self, _t: &Self::Term) {}
}

/// McMillan interpolant over a recorded refutation.
///
/// `var_type_a[v]` marks `v` as A-local; all other variables are shared.
/// Each A-root contributes the disjunction of its shared-variable literals,
/// each B-root contributes constant true, and each resolution step combines
/// its antecedents' interpolants with OR when the pivot is A-local, AND
/// otherwise. Returns `None` when no empty-clause derivation was recorded.
pub fn interpolant<B: BooleanOps>(
    proof: &Proof,
    var_type_a: &VarVec<bool>,
    ops: &mut B,
) -> Option<B::Term> {
    let from = proof.empty_clause()?;
    let steps = proof.collect(from);

    let mut terms: Vec<B::Term> = Vec::with_capacity(steps.len());
    for step in steps {
        let term = match step {
            TraceStep::Root { root, .. } => {
                if proof.is_type_a(root) {
                    let mut acc = ops.const0();
                    for &lit in proof.root_lits(root) {
                        if var_type_a[lit.var()] {
                            continue;
                        }
                        let v = ops.var(lit.var());
                        let l = if lit.negated() { ops.not(&v) } else { v };
                        acc = ops.or(&acc, &l);
                    }
                    acc
                } else {
                    ops.const1()
                }
            }
            TraceStep::Resolve { left, right, pivot, .. } => {
                if var_type_a[pivot] {
                    ops.or(&terms[left], &terms[right])
                } else {
                    ops.and(&terms[left], &terms[right])
                }
            }
        };
        ops.reference(&term);
        terms.push(term);
    }

    let result = terms.pop()?;
    for term in &terms {
        ops.recursive_deref(term);
    }
    Some(result)
}
