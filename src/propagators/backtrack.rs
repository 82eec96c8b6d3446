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

//! This module provides the implementation of the weakest propagation
//! strategy: no propagation at all. Only the constraints whose scope just
//! became fully assigned get checked, which is exactly the amount of work
//! a naked chronological backtracking search performs at each node.

use log::debug;

use crate::{CPResult, Csp, Inconsistency, Propagation, Propagator, Variable};

/// Plain backtracking checks: never prunes anything, reports a deadend iff
/// some constraint touching the just-assigned variable is fully assigned
/// and violated. It is the baseline the stronger strategies are validated
/// against.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainBacktracking;

impl Propagator for PlainBacktracking {
    fn propagate(&self, csp: &mut Csp, trigger: Option<Variable>) -> Propagation {
        let status = check_assigned(csp, trigger);
        Propagation {
            status,
            pruned: vec![],
        }
    }
}

/// Checks every fully assigned constraint touching the trigger against the
/// committed values of its scope; the first violated one is a deadend.
/// There is nothing at all to do before the first assignment.
fn check_assigned(csp: &Csp, trigger: Option<Variable>) -> CPResult<()> {
    if let Some(var) = trigger {
        for c in csp.constraints_on(var).iter().copied() {
            if let Some(tuple) = csp.assigned_tuple(c) {
                if !csp.check(c, &tuple) {
                    debug!("violated constraint {}", csp.constraint_name(c));
                    return Err(Inconsistency);
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
mod test_plain_backtracking {
    use crate::prelude::*;

    fn ne_csp() -> (Csp, Variable, Variable) {
        let mut csp = Csp::new();
        let x = csp.new_var("x", 1..=3);
        let y = csp.new_var("y", 1..=3);
        let _ = csp.post("x!=y", vec![x, y], Relation::AllDifferent);
        (csp, x, y)
    }

    #[test]
    fn the_bootstrap_call_does_nothing() {
        let (mut csp, _, _) = ne_csp();
        let outcome = PlainBacktracking.propagate(&mut csp, None);

        assert!(outcome.is_consistent());
        assert!(outcome.pruned.is_empty());
    }

    #[test]
    fn partially_assigned_constraints_are_ignored() {
        let (mut csp, x, _) = ne_csp();
        csp.assign(x, 1);

        let outcome = PlainBacktracking.propagate(&mut csp, Some(x));
        assert!(outcome.is_consistent());
        assert!(outcome.pruned.is_empty());
    }

    #[test]
    fn a_violated_fully_assigned_constraint_is_a_deadend() {
        let (mut csp, x, y) = ne_csp();
        csp.assign(x, 2);
        csp.assign(y, 2);

        let outcome = PlainBacktracking.propagate(&mut csp, Some(y));
        assert!(!outcome.is_consistent());
        assert!(outcome.pruned.is_empty());
    }

    #[test]
    fn a_satisfied_fully_assigned_constraint_lets_the_search_continue() {
        let (mut csp, x, y) = ne_csp();
        csp.assign(x, 2);
        csp.assign(y, 3);

        let outcome = PlainBacktracking.propagate(&mut csp, Some(y));
        assert!(outcome.is_consistent());
        assert!(outcome.pruned.is_empty());
    }

    #[test]
    fn it_never_prunes_even_when_values_are_doomed() {
        let mut csp = Csp::new();
        let x = csp.new_var("x", 1..=3);
        let y = csp.new_var("y", vec![3]);
        let _ = csp.post("x!=y", vec![x, y], Relation::AllDifferent);

        csp.assign(x, 3);
        // y only has 3 left and can never differ from x anymore, but bt
        // does not look that far: the constraint is not fully assigned
        let outcome = PlainBacktracking.propagate(&mut csp, Some(x));
        assert!(outcome.is_consistent());
        assert!(outcome.pruned.is_empty());
        assert_eq!(vec![3], csp.cur_domain(y));
    }
}
