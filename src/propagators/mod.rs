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

//! This module provides the propagation strategies a backtracking search
//! can be configured with: plain backtracking checks (bt), forward
//! checking (fc) and generalized arc consistency (gac). All three answer
//! the same contract -- csp plus the variable that was just assigned, in;
//! consistency verdict plus the exact list of withdrawn values, out -- and
//! only differ in how much inconsistency they are able to detect ahead of
//! time.

use crate::{CPResult, Csp, PruneLog, Variable};

mod arc_consistency;
mod backtrack;
mod forward_checking;

pub use arc_consistency::*;
pub use backtrack::*;
pub use forward_checking::*;

/// The outcome of running a propagator once: the consistency verdict and
/// the exact set of values the call withdrew from the current domains.
///
/// The log is accurate even when the verdict is a failure: upon failure
/// the driver must restore this log (plus the assignment it just made)
/// right away, whereas upon success it keeps the log on its own undo
/// trail for the day it backtracks past the node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Propagation {
    /// `Err(Inconsistency)` when the propagator detected a deadend (a
    /// domain wipeout, or a violated fully assigned constraint)
    pub status: CPResult<()>,
    /// Every value withdrawn from a current domain during the call (each
    /// variable/value pair occurs at most once)
    pub pruned: PruneLog,
}

impl Propagation {
    /// True iff no deadend was detected (the driver may keep going down
    /// this branch)
    pub fn is_consistent(&self) -> bool {
        self.status.is_ok()
    }
}

/// The propagator is the portion of the code where the magic actually
/// happens. The search driver calls it right after committing an
/// assignment (or once before the search starts, with no trigger at all)
/// and it enforces a certain level of consistency on the domains of the
/// variables.
///
/// The three strategies implementing this trait are stateless: one of
/// them is selected at search-configuration time and that same value is
/// reused at every node of the search tree.
pub trait Propagator {
    /// Actually runs the custom propagation algorithm. `trigger` is the
    /// variable the driver just assigned, or `None` for the bootstrap
    /// call establishing initial consistency before any assignment.
    fn propagate(&self, csp: &mut Csp, trigger: Option<Variable>) -> Propagation;
}

// #############################################################################
// ### UNIT TESTS ##############################################################
// #############################################################################
