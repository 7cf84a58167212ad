use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use intersat::lit::Lit;
use intersat::solver::{SolveResult, Solver};
use intersat::var::Var;

fn lit(x: i32) -> Lit {
    Lit::from_external(x)
}

fn add(solver: &mut Solver, clause: &[i32]) -> bool {
    let lits: Vec<Lit> = clause.iter().map(|&x| lit(x)).collect();
    solver.add_clause(&lits)
}

fn solver_for(clauses: &[Vec<i32>]) -> Solver {
    let mut solver = Solver::default();
    for clause in clauses {
        add(&mut solver, clause);
    }
    solver
}

/// All assignments (as bitmasks over `num_vars`) satisfying every clause.
fn brute_force(num_vars: u32, clauses: &[Vec<i32>]) -> Vec<u64> {
    let mut models = Vec::new();
    for mask in 0..(1u64 << num_vars) {
        let ok = clauses.iter().all(|clause| {
            clause.iter().any(|&x| {
                let bit = mask >> (x.unsigned_abs() - 1) & 1;
                if x > 0 {
                    bit == 1
                } else {
                    bit == 0
                }
            })
        });
        if ok {
            models.push(mask);
        }
    }
    models
}

fn random_cnf(rng: &mut StdRng, num_vars: u32, num_clauses: usize) -> Vec<Vec<i32>> {
    (0..num_clauses)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let var = rng.gen_range(1..=num_vars as i32);
                    if rng.gen() {
                        var
                    } else {
                        -var
                    }
                })
                .collect()
        })
        .collect()
}

/// Pigeonhole principle with `pigeons` pigeons and `holes` holes;
/// unsatisfiable whenever `pigeons > holes`. Var of pigeon `i` in hole `j`
/// is `i * holes + j + 1`.
fn pigeonhole(pigeons: i32, holes: i32) -> Vec<Vec<i32>> {
    let mut clauses = Vec::new();
    for i in 0..pigeons {
        clauses.push((0..holes).map(|j| i * holes + j + 1).collect());
    }
    for j in 0..holes {
        for i in 0..pigeons {
            for k in (i + 1)..pigeons {
                clauses.push(vec![-(i * holes + j + 1), -(k * holes + j + 1)]);
            }
        }
    }
    clauses
}

#[test]
fn unsat_triangle() {
    let mut solver = solver_for(&[vec![1, 2], vec![-1, 2], vec![-2]]);
    assert_eq!(solver.solve(), SolveResult::Unsat);
}

#[test]
fn sat_single_clause() {
    let mut solver = solver_for(&[vec![1, 2]]);
    assert_eq!(solver.solve(), SolveResult::Sat);
    assert!(solver.model_value(lit(1)).is_true() || solver.model_value(lit(2)).is_true());
}

#[test]
fn empty_clause_is_unsat() {
    let mut solver = Solver::default();
    assert!(!add(&mut solver, &[]));
    assert_eq!(solver.solve(), SolveResult::Unsat);
}

#[test]
fn contradicting_units_need_no_decision() {
    let mut solver = Solver::default();
    assert!(add(&mut solver, &[1]));
    assert!(!add(&mut solver, &[-1]));
    assert_eq!(solver.solve(), SolveResult::Unsat);
    assert_eq!(solver.num_decisions(), 0);
}

#[test]
fn tautologies_and_duplicates_are_not_stored() {
    let mut solver = Solver::default();
    assert!(add(&mut solver, &[1, -1]));
    assert!(add(&mut solver, &[1, 1, 2]));
    assert_eq!(solver.num_clauses(), 1);
    assert_eq!(solver.solve(), SolveResult::Sat);
}

#[test]
fn enumeration_of_disjunction() {
    let mut solver = solver_for(&[vec![1, 2]]);
    solver.set_projection(&[Var::new(0), Var::new(1)]);
    assert_eq!(solver.solve(), SolveResult::Sat);

    let mut found: Vec<u64> = solver
        .solutions()
        .iter()
        .map(|solution| {
            solution
                .iter()
                .enumerate()
                .map(|(i, l)| ((!l.negated()) as u64) << i)
                .sum()
        })
        .collect();
    found.sort();
    assert_eq!(found, vec![0b01, 0b10, 0b11]);
}

#[test]
fn enumeration_matches_brute_force() {
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let num_vars = 6;
        let clauses = random_cnf(&mut rng, num_vars, 12);
        let projection: Vec<Var> = (0..3).map(Var::new).collect();

        let mut solver = solver_for(&clauses);
        for _ in solver.num_vars()..num_vars as usize {
            solver.new_var();
        }
        solver.set_projection(&projection);
        let result = solver.solve();

        let mut expected: Vec<u64> = brute_force(num_vars, &clauses)
            .into_iter()
            .map(|m| m & 0b111)
            .collect();
        expected.sort();
        expected.dedup();

        let mut found: Vec<u64> = solver
            .solutions()
            .iter()
            .map(|solution| {
                solution
                    .iter()
                    .enumerate()
                    .map(|(i, l)| ((!l.negated()) as u64) << i)
                    .sum()
            })
            .collect();
        found.sort();
        // each projected assignment is reported exactly once
        let before = found.len();
        found.dedup();
        assert_eq!(found.len(), before, "seed {}: duplicate solution", seed);
        assert_eq!(found, expected, "seed {}", seed);
        if expected.is_empty() {
            assert_eq!(result, SolveResult::Unsat);
        } else {
            assert_eq!(result, SolveResult::Sat);
        }
    }
}

#[test]
fn random_formulas_are_decided_soundly() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(100 + seed);
        let num_vars = 8;
        let clauses = random_cnf(&mut rng, num_vars, 30);
        let models = brute_force(num_vars, &clauses);

        let mut solver = solver_for(&clauses);
        match solver.solve() {
            SolveResult::Sat => {
                assert!(!models.is_empty(), "seed {}: bogus SAT", seed);
                for clause in &clauses {
                    assert!(
                        clause.iter().any(|&x| solver.model_value(lit(x)).is_true()),
                        "seed {}: model violates {:?}",
                        seed,
                        clause
                    );
                }
            }
            SolveResult::Unsat => {
                assert!(models.is_empty(), "seed {}: bogus UNSAT", seed);
            }
            SolveResult::Unknown => panic!("no budget was set"),
        }
    }
}

#[test_log::test]
fn pigeonhole_is_unsat() {
    let mut solver = solver_for(&pigeonhole(4, 3));
    assert_eq!(solver.solve(), SolveResult::Unsat);
}

#[test]
fn assumptions_are_incremental() {
    let mut solver = solver_for(&[vec![1, 2]]);

    assert_eq!(solver.solve_with(&[lit(-1)], None), SolveResult::Sat);
    assert!(solver.model_value(lit(2)).is_true());

    assert_eq!(solver.solve_with(&[lit(-1), lit(-2)], None), SolveResult::Unsat);
    // assumption failure does not poison the instance
    assert!(solver.is_ok());
    assert_eq!(solver.solve(), SolveResult::Sat);
}

#[test_log::test]
fn backtrack_budget_returns_unknown_and_resumes() {
    let mut solver = solver_for(&pigeonhole(4, 3));

    assert_eq!(solver.solve_with(&[], Some(1)), SolveResult::Unknown);
    assert!(solver.is_ok());

    // resume without a budget; everything learned so far persists
    assert_eq!(solver.solve(), SolveResult::Unsat);
}

#[test]
fn simplify_is_idempotent() {
    let mut solver = solver_for(&[vec![1, 2, 3], vec![-1, 2, 4], vec![-4, 3], vec![1]]);
    assert!(solver.simplify());

    let mut once = Vec::new();
    solver.write_dimacs(&mut once).unwrap();

    assert!(solver.simplify());
    let mut twice = Vec::new();
    solver.write_dimacs(&mut twice).unwrap();

    assert_eq!(once, twice);
    assert_eq!(solver.solve(), SolveResult::Sat);
}

#[test]
fn remove_learned_keeps_the_instance_sound() {
    let mut rng = StdRng::seed_from_u64(7);
    let clauses = random_cnf(&mut rng, 10, 35);
    let models = brute_force(10, &clauses);

    let mut solver = solver_for(&clauses);
    let first = solver.solve();
    solver.remove_learned();
    assert_eq!(solver.num_learnts(), 0);
    let second = solver.solve();
    assert_eq!(first, second);
    assert_eq!(second == SolveResult::Sat, !models.is_empty());
}
