use std::io::{self, Write};

use itertools::Itertools;

use crate::lit::Lit;
use crate::var::Var;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RootId(pub(crate) usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) usize);

/// An antecedent of a resolution step: either an original (root) clause or
/// another step of the DAG.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Antecedent {
    Root(RootId),
    Node(NodeId),
}

/// One resolution step: resolvent of `left` and `right` on `pivot`.
#[derive(Debug, Copy, Clone)]
pub struct ResolutionNode {
    pub pivot: Var,
    pub left: Antecedent,
    pub right: Antecedent,
}

/// The resolution DAG recorded during search.
///
/// The proof keeps its own verbatim copy of every root clause, so clause
/// arena compaction or simplification never invalidates recorded steps.
/// Nodes are append-only during a run; nodes reachable only from discarded
/// learnt clauses simply become unreferenced.
#[derive(Debug, Default)]
pub struct Proof {
    roots: Vec<Vec<Lit>>,
    type_a: Vec<bool>,
    nodes: Vec<ResolutionNode>,
    empty: Option<Antecedent>,
}

/// A flattened proof entry, in topological order: every antecedent of a
/// `Resolve` entry has a smaller id.
#[derive(Debug, Copy, Clone)]
pub enum TraceStep {
    Root { id: usize, root: RootId },
    Resolve { id: usize, left: usize, right: usize, pivot: Var },
}

impl Proof {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Records a verbatim copy of an original clause. Roots are numbered in
    /// the order they are added.
    pub fn add_root(&mut self, lits: &[Lit]) -> Antecedent {
        let id = RootId(self.roots.len());
        self.roots.push(lits.to_vec());
        self.type_a.push(false);
        Antecedent::Root(id)
    }

    pub fn root_lits(&self, root: RootId) -> &[Lit] {
        &self.roots[root.0]
    }

    pub fn is_type_a(&self, root: RootId) -> bool {
        self.type_a[root.0]
    }

    pub fn set_type_a(&mut self, index: usize) {
        assert!(index < self.roots.len(), "no root clause with index {}", index);
        self.type_a[index] = true;
    }

    pub fn node(&self, node: NodeId) -> &ResolutionNode {
        &self.nodes[node.0]
    }

    pub fn resolve(&mut self, left: Antecedent, right: Antecedent, pivot: Var) -> Antecedent {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ResolutionNode { pivot, left, right });
        Antecedent::Node(id)
    }

    pub fn set_empty(&mut self, derivation: Antecedent) {
        self.empty = Some(derivation);
    }

    /// The derivation of the empty clause, present after an UNSAT outcome
    /// with recording enabled (and no assumptions).
    pub fn empty_clause(&self) -> Option<Antecedent> {
        self.empty
    }

    /// Topologically flattens the DAG reachable from `from` into an ordered
    /// list of steps; shared nodes appear once.
    pub fn collect(&self, from: Antecedent) -> Vec<TraceStep> {
        let mut steps = Vec::new();
        let mut root_ids: Vec<Option<usize>> = vec![None; self.roots.len()];
        let mut node_ids: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut next_id = 0usize;

        // Iterative post-order: (antecedent, children_expanded)
        let mut stack = vec![(from, false)];
        while let Some((a, expanded)) = stack.pop() {
            match a {
                Antecedent::Root(r) => {
                    if root_ids[r.0].is_none() {
                        root_ids[r.0] = Some(next_id);
                        steps.push(TraceStep::Root { id: next_id, root: r });
                        next_id += 1;
                    }
                }
                Antecedent::Node(n) => {
                    if node_ids[n.0].is_some() {
                        continue;
                    }
                    let node = self.nodes[n.0];
                    if expanded {
                        let left = self.step_id(&root_ids, &node_ids, node.left);
                        let right = self.step_id(&root_ids, &node_ids, node.right);
                        node_ids[n.0] = Some(next_id);
                        steps.push(TraceStep::Resolve {
                            id: next_id,
                            left,
                            right,
                            pivot: node.pivot,
                        });
                        next_id += 1;
                    } else {
                        stack.push((a, true));
                        stack.push((node.right, false));
                        stack.push((node.left, false));
                    }
                }
            }
        }
        steps
    }

    fn step_id(&self, root_ids: &[Option<usize>], node_ids: &[Option<usize>], a: Antecedent) -> usize {
        match a {
            Antecedent::Root(r) => root_ids[r.0].expect("antecedent not yet flattened"),
            Antecedent::Node(n) => node_ids[n.0].expect("antecedent not yet flattened"),
        }
    }

    /// Writes the proof of the empty clause as a line-oriented text trace:
    ///
    /// ```text
    /// <id>  =  <clause as DIMACS literals> 0
    /// <id>  :  <anteId1> <anteId2>  <pivotVar+1>   <resulting clause>
    /// ```
    ///
    /// An independent checker re-derives each resolvent via literal
    /// set-symmetric-difference and reaches the empty clause at the final id.
    pub fn write_trace<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let from = self
            .empty
            .expect("no empty-clause derivation has been recorded");
        let steps = self.collect(from);
        let mut clauses: Vec<Vec<Lit>> = Vec::with_capacity(steps.len());

        for step in steps {
            match step {
                TraceStep::Root { id, root } => {
                    let lits = self.root_lits(root);
                    writeln!(w, "{}  =  {} 0", id, lits.iter().join(" "))?;
                    clauses.push(lits.to_vec());
                }
                TraceStep::Resolve { id, left, right, pivot } => {
                    let resolvent = resolve_lits(&clauses[left], &clauses[right], pivot);
                    writeln!(
                        w,
                        "{}  :  {} {}  {}   {}",
                        id,
                        left,
                        right,
                        pivot.index() + 1,
                        resolvent.iter().join(" ")
                    )?;
                    clauses.push(resolvent);
                }
            }
        }
        Ok(())
    }

    /// Replays the recorded DAG bottom-up and returns the clause derived at
    /// `from`. Used by debug checks; the test suite re-verifies the written
    /// trace independently.
    pub fn replay(&self, from: Antecedent) -> Vec<Lit> {
        let steps = self.collect(from);
        let mut clauses: Vec<Vec<Lit>> = Vec::with_capacity(steps.len());
        for step in steps {
            match step {
                TraceStep::Root { root, .. } => clauses.push(self.root_lits(root).to_vec()),
                TraceStep::Resolve { left, right, pivot, .. } => {
                    let resolvent = resolve_lits(&clauses[left], &clauses[right], pivot);
                    clauses.push(resolvent);
                }
            }
        }
        clauses.pop().unwrap_or_default()
    }
}

/// Set-semantics resolvent of two clauses on `pivot`: the union of both
/// literal sets minus both pivot literals, sorted and deduplicated.
fn resolve_lits(left: &[Lit], right: &[Lit], pivot: Var) -> Vec<Lit> {
    let mut resolvent: Vec<Lit> = left
        .iter()
        .chain(right.iter())
        .copied()
        .filter(|lit| lit.var() != pivot)
        .collect();
    resolvent.sort();
    resolvent.dedup();
    resolvent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(xs: &[i32]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_external(x)).collect()
    }

    #[test]
    fn chain_to_empty_clause() {
        // (1 2), (-1 2), (-2)  is unsatisfiable
        let mut proof = Proof::new();
        let c1 = proof.add_root(&lits(&[1, 2]));
        let c2 = proof.add_root(&lits(&[-1, 2]));
        let c3 = proof.add_root(&lits(&[-2]));

        let n1 = proof.resolve(c1, c2, Var::new(0)); // (2)
        let n2 = proof.resolve(n1, c3, Var::new(1)); // ()
        proof.set_empty(n2);

        assert_eq!(proof.replay(n1), lits(&[2]));
        assert_eq!(proof.replay(n2), lits(&[]));
    }

    #[test]
    fn collect_is_topological_and_shares_nodes() {
        let mut proof = Proof::new();
        let c1 = proof.add_root(&lits(&[1, 2]));
        let c2 = proof.add_root(&lits(&[-1, 2]));
        let c3 = proof.add_root(&lits(&[-2, 3]));
        let c4 = proof.add_root(&lits(&[-2, -3]));

        let shared = proof.resolve(c1, c2, Var::new(0)); // (2)
        let a = proof.resolve(shared, c3, Var::new(1)); // (3)
        let b = proof.resolve(shared, c4, Var::new(1)); // (-3)
        let empty = proof.resolve(a, b, Var::new(2));

        let steps = proof.collect(empty);
        // 4 roots + 4 nodes, the shared node flattened once
        assert_eq!(steps.len(), 8);
        for step in &steps {
            if let TraceStep::Resolve { id, left, right, .. } = step {
                assert!(left < id && right < id);
            }
        }
        assert_eq!(proof.replay(empty), lits(&[]));
    }

    #[test]
    fn trace_format() {
        let mut proof = Proof::new();
        let c1 = proof.add_root(&lits(&[1]));
        let c2 = proof.add_root(&lits(&[-1]));
        let n = proof.resolve(c1, c2, Var::new(0));
        proof.set_empty(n);

        let mut out = Vec::new();
        proof.write_trace(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "0  =  1 0");
        assert_eq!(lines[1], "1  =  -1 0");
        assert_eq!(lines[2], "2  :  0 1  1   ");
    }
}
