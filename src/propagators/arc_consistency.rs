//
// csprop is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License  v3
// as published by the Free Software Foundation.
//
// csprop is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY.
// See the GNU Lesser General Public License  for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with csprop. If not, see http://www.gnu.org/licenses/lgpl-3.0.en.html
//
// Copyright (c)  2022 by X. Gillard
//

//! This module provides the implementation of generalized arc consistency:
//! a worklist fixed point which keeps every live value of every variable
//! supported in every constraint bearing on that variable. It is the
//! strongest (and priciest) of the three strategies: a single invocation
//! can ripple a freshly committed assignment across the whole graph.

use std::collections::VecDeque;

use log::trace;
use rustc_hash::FxHashSet;

use crate::{CPResult, Constraint, Csp, Propagation, Propagator, PruneLog, Pruned, Variable};

/// Generalized arc consistency. Starting from the constraints touching the
/// trigger (or from the whole problem on the bootstrap call), it withdraws
/// every value that lost all support and chases the consequences until
/// nothing moves anymore.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcConsistency;

impl Propagator for ArcConsistency {
    fn propagate(&self, csp: &mut Csp, trigger: Option<Variable>) -> Propagation {
        let mut pruned = PruneLog::new();
        let status = enforce(csp, trigger, &mut pruned);
        Propagation { status, pruned }
    }
}

/// The worklist fixed point. The pending set suppresses duplicates in the
/// queue: reprocessing a constraint twice would be correct but wasteful,
/// so a constraint is only (re)enqueued when it is not already waiting.
/// Termination is guaranteed because a constraint only ever reenters the
/// worklist on the heels of an actual withdrawal, and domains are finite
/// and only ever shrink during one call.
fn enforce(csp: &mut Csp, trigger: Option<Variable>, pruned: &mut PruneLog) -> CPResult<()> {
    let mut worklist: VecDeque<Constraint> = match trigger {
        Some(var) => csp.constraints_on(var).iter().copied().collect(),
        None => csp.constraints().collect(),
    };
    let mut pending: FxHashSet<Constraint> = worklist.iter().copied().collect();
    trace!("gac worklist seeded with {} constraints", worklist.len());

    while let Some(c) = worklist.pop_front() {
        pending.remove(&c);
        revise(csp, c, &mut worklist, &mut pending, pruned)?;
    }
    Ok(())
}

/// Revises one constraint: every live value of every scope variable must
/// have a support in it. The values that do not are withdrawn, and each
/// withdrawal puts the constraints attached to the shrunk variable back on
/// the worklist (the one being revised included: it may well invalidate
/// its own earlier supports).
fn revise(
    csp: &mut Csp,
    c: Constraint,
    worklist: &mut VecDeque<Constraint>,
    pending: &mut FxHashSet<Constraint>,
    pruned: &mut PruneLog,
) -> CPResult<()> {
    for var in csp.scope(c).to_vec() {
        for value in csp.cur_domain(var) {
            if !csp.has_support(c, var, value) {
                pruned.push(Pruned {
                    variable: var,
                    value,
                });
                csp.prune(var, value)?;

                for attached in csp.constraints_on(var).iter().copied() {
                    if pending.insert(attached) {
                        worklist.push_back(attached);
                    }
                }
            }
        }
    }
    Ok(())
}

// #############################################################################
// ### UNIT TESTS ##############################################################
// #############################################################################
#[cfg(test)]
mod test_arc_consistency {
    use rustc_hash::FxHashSet;

    use crate::prelude::*;

    /// the satisfying tuples of x < y over 1..=n (both positions)
    fn lt_table(n: isize) -> Relation {
        let mut tuples = vec![];
        for a in 1..=n {
            for b in 1..=n {
                if a < b {
                    tuples.push(vec![a, b]);
                }
            }
        }
        Relation::table(tuples)
    }

    fn pruned_set(outcome: &Propagation) -> FxHashSet<Pruned> {
        outcome.pruned.iter().copied().collect()
    }

    #[test]
    fn an_assignment_ripples_through_an_order_constraint() {
        // one row of a 4x4 ordering puzzle: x1 < x2 with x2 committed
        // to 2 leaves x1 with the single candidate 1
        let mut csp = Csp::new();
        let x1 = csp.new_var("x1", 1..=4);
        let x2 = csp.new_var("x2", 1..=4);
        let _ = csp.post("x1<x2", vec![x1, x2], lt_table(4));

        csp.assign(x2, 2);
        let outcome = ArcConsistency.propagate(&mut csp, Some(x2));

        assert!(outcome.is_consistent());
        let expected = [
            Pruned { variable: x1, value: 2 },
            Pruned { variable: x1, value: 3 },
            Pruned { variable: x1, value: 4 },
        ]
        .into_iter()
        .collect::<FxHashSet<_>>();
        assert_eq!(expected, pruned_set(&outcome));
        assert_eq!(vec![1], csp.cur_domain(x1));
    }

    #[test]
    fn pinned_neighbours_starve_the_third_alldifferent_variable() {
        let mut csp = Csp::new();
        let a = csp.new_var("a", vec![1]);
        let b = csp.new_var("b", vec![2]);
        let c = csp.new_var("c", 1..=3);
        let _ = csp.post("alldiff", vec![a, b, c], Relation::AllDifferent);

        let outcome = ArcConsistency.propagate(&mut csp, None);

        assert!(outcome.is_consistent());
        let expected = [
            Pruned { variable: c, value: 1 },
            Pruned { variable: c, value: 2 },
        ]
        .into_iter()
        .collect::<FxHashSet<_>>();
        assert_eq!(expected, pruned_set(&outcome));
        assert_eq!(vec![3], csp.cur_domain(c));
    }

    #[test]
    fn the_bootstrap_call_reaches_a_fixed_point() {
        let mut csp = Csp::new();
        let x = csp.new_var("x", 1..=4);
        let y = csp.new_var("y", 1..=4);
        let z = csp.new_var("z", 1..=4);
        let _ = csp.post("x<y", vec![x, y], lt_table(4));
        let _ = csp.post("y<z", vec![y, z], lt_table(4));

        let first = ArcConsistency.propagate(&mut csp, None);
        assert!(first.is_consistent());
        // x < y < z over 1..=4 squeezes the ends: x loses {4, 3},
        // y loses {4, 1}, z loses {1, 2}
        assert_eq!(6, first.pruned.len());

        // immediately reinvoking on the untouched graph moves nothing
        let second = ArcConsistency.propagate(&mut csp, None);
        assert!(second.is_consistent());
        assert!(second.pruned.is_empty());
    }

    #[test]
    fn a_starved_variable_is_a_deadend_with_an_accurate_log() {
        let mut csp = Csp::new();
        let x = csp.new_var("x", vec![3]);
        let y = csp.new_var("y", vec![3]);
        let _ = csp.post("x!=y", vec![x, y], Relation::AllDifferent);

        let outcome = ArcConsistency.propagate(&mut csp, None);

        assert!(!outcome.is_consistent());
        assert_eq!(1, outcome.pruned.len());

        // whatever was withdrawn before the wipeout can be undone
        csp.restore_all(&outcome.pruned);
        assert_eq!(vec![3], csp.cur_domain(x));
        assert_eq!(vec![3], csp.cur_domain(y));
    }

    #[test]
    fn shrinking_a_variable_requeues_the_constraints_attached_to_it() {
        // a chain u < v < w: revising u < v shrinks v, which must put
        // v < w back on the worklist to shrink w in turn. the trigger
        // only seeds u < v, so any effect on w proves the requeue
        let mut csp = Csp::new();
        let u = csp.new_var("u", 1..=4);
        let v = csp.new_var("v", 1..=4);
        let w = csp.new_var("w", 1..=4);
        let _ = csp.post("u<v", vec![u, v], lt_table(4));
        let _ = csp.post("v<w", vec![v, w], lt_table(4));

        csp.assign(u, 2);
        let outcome = ArcConsistency.propagate(&mut csp, Some(u));

        assert!(outcome.is_consistent());
        let mut dom_v = csp.cur_domain(v);
        dom_v.sort_unstable();
        let mut dom_w = csp.cur_domain(w);
        dom_w.sort_unstable();
        assert_eq!(vec![3], dom_v);
        assert_eq!(vec![4], dom_w);
    }

    #[test]
    fn assigned_variables_keep_their_underlying_domain_intact() {
        let mut csp = Csp::new();
        let x = csp.new_var("x", 1..=3);
        let y = csp.new_var("y", 1..=3);
        let _ = csp.post("x!=y", vec![x, y], Relation::AllDifferent);

        csp.assign(x, 1);
        let outcome = ArcConsistency.propagate(&mut csp, Some(x));
        assert!(outcome.is_consistent());

        // y lost 1; x's underlying domain was never touched (only its
        // view is narrowed by the assignment)
        assert!(!csp.cur_contains(y, 1));
        csp.restore_all(&outcome.pruned);
        csp.unassign(x);
        let mut dom_x = csp.cur_domain(x);
        dom_x.sort_unstable();
        assert_eq!(vec![1, 2, 3], dom_x);
    }
}
