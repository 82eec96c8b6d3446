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

//! This module provides the implementation of forward checking:
//! propagation limited to the constraints having exactly one unassigned
//! variable left in their scope. Every live value of that last variable
//! which the committed rest of the scope rules out is withdrawn on the
//! spot. Note that on the bootstrap call the working set is the whole
//! problem, so unary constraints get forward checked before the search
//! even makes its first assignment.

use crate::{
    CPResult, Constraint, Csp, Propagation, Propagator, PruneLog, Pruned, Variable,
};

/// Forward checking. Weaker than arc consistency (it only fires once a
/// scope is down to a single free variable) but much cheaper: no support
/// search, a single pass, no fixpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardChecking;

impl Propagator for ForwardChecking {
    fn propagate(&self, csp: &mut Csp, trigger: Option<Variable>) -> Propagation {
        let mut pruned = PruneLog::new();
        let status = forward_check(csp, trigger, &mut pruned);
        Propagation { status, pruned }
    }
}

/// Runs the actual forward checking pass. Withdrawals are appended to
/// `pruned` the moment they are made, so the log stays accurate when a
/// wipeout cuts the pass short.
fn forward_check(csp: &mut Csp, trigger: Option<Variable>, pruned: &mut PruneLog) -> CPResult<()> {
    let working: Vec<Constraint> = match trigger {
        Some(var) => csp.constraints_on(var).to_vec(),
        None => csp.constraints().collect(),
    };

    for c in working {
        // assignments do not move during the pass, so the target set is
        // stable: a constraint is its own target at most once
        if let [target] = csp.unassigned_in_scope(c)[..] {
            check_target(csp, c, target, pruned)?;
        }
    }
    Ok(())
}

/// Tests every live value of `target` against the committed values of the
/// rest of the scope of `c`, withdrawing the values that cannot complete
/// the scope into a satisfying tuple.
fn check_target(
    csp: &mut Csp,
    c: Constraint,
    target: Variable,
    pruned: &mut PruneLog,
) -> CPResult<()> {
    for value in csp.cur_domain(target) {
        let tuple = csp
            .scope(c)
            .iter()
            .map(|&x| {
                if x == target {
                    value
                } else {
                    csp.assigned_value(x).unwrap()
                }
            })
            .collect::<Vec<_>>();

        if !csp.check(c, &tuple) {
            pruned.push(Pruned {
                variable: target,
                value,
            });
            csp.prune(target, value)?;
        }
    }
    Ok(())
}
