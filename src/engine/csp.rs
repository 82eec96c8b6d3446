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

//! This module provides the definition and implementation of the csp
//! itself: the variables, the constraints bearing on them, and the index
//! tying both together. The csp is the sole owner of all that data;
//! variables and constraints are mere identifiers pointing into it, which
//! sidesteps the cyclic variable <-> constraint ownership the data model
//! would otherwise call for.

use log::debug;
use rustc_hash::FxHashSet;

use crate::{CPResult, Domain, Inconsistency};

/// A finite domain variable of the problem. A variable in itself is really
/// just an identifier in this implementation: its name, domain and
/// assignment status live in the csp that created it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Variable(usize);

/// An identifier to a constraint. A constraint in itself is really just an
/// identifier in this implementation. The bulk of the work is done by the
/// csp.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Constraint(usize);

/// One value withdrawn from one variable's current domain by a propagation
/// call. The complete list of these records is the undo currency of the
/// engine: a search driver restores exactly that set (no more, no less)
/// when it backtracks past the node whose propagation produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pruned {
    /// The variable whose current domain was shrunk
    pub variable: Variable,
    /// The value that was withdrawn from it
    pub value: isize,
}

/// The exact set of values one propagation call withdrew (in withdrawal
/// order, though restoration does not depend on it)
pub type PruneLog = Vec<Pruned>;

/// The semantics of a constraint: what it takes for a tuple of values,
/// positionally aligned with the constraint scope, to satisfy it. Model
/// builders mostly produce explicit tables; the predicate variants exist
/// for the relations whose table would be needlessly large, and both forms
/// answer the same uniform `check`.
#[derive(Debug, Clone)]
pub enum Relation {
    /// An explicit table of satisfying tuples
    Table(FxHashSet<Box<[isize]>>),
    /// All values in scope must be pairwise distinct (the cheap equivalent
    /// of the full permutation table)
    AllDifferent,
}

impl Relation {
    /// Builds an explicit table relation from the given satisfying tuples
    pub fn table<I, T>(tuples: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Box<[isize]>>,
    {
        Relation::Table(tuples.into_iter().map(Into::into).collect())
    }

    /// True iff the given tuple satisfies this relation
    fn check(&self, tuple: &[isize]) -> bool {
        match self {
            Relation::Table(tuples) => tuples.contains(tuple),
            Relation::AllDifferent => tuple
                .iter()
                .enumerate()
                .all(|(i, a)| tuple[..i].iter().all(|b| a != b)),
        }
    }
}

/// The per-variable data owned by the csp
#[derive(Debug)]
struct VarData {
    /// The name the variable was created with (diagnostics only)
    name: String,
    /// The candidates the variable may still assume
    domain: Domain,
    /// The value the search committed this variable to, if any. Assignment
    /// and domain restriction are deliberately tracked apart: committing a
    /// value does not collapse the underlying domain, and pruning keeps
    /// operating underneath an assignment.
    assigned: Option<isize>,
}

/// The per-constraint data owned by the csp
#[derive(Debug)]
struct ConstraintData {
    /// The name the constraint was posted with (diagnostics only)
    name: String,
    /// The ordered variables the constraint bears on. Ordering matters:
    /// satisfying tuples are positional.
    scope: Vec<Variable>,
    /// What it takes to satisfy this constraint
    relation: Relation,
}

/// The constraint graph of one problem: the sole owner of its variables
/// and constraints, along with the index from each variable to the
/// constraints whose scope mentions it. Once the model builder is done
/// posting, the structure never changes; the only things that mutate
/// during a search are the current domains and the assignments.
#[derive(Debug, Default)]
pub struct Csp {
    /// The data of all variables, indexed by `Variable`
    variables: Vec<VarData>,
    /// The data of all constraints, indexed by `Constraint`
    constraints: Vec<ConstraintData>,
    /// For each variable, the constraints whose scope mentions it
    attached: Vec<Vec<Constraint>>,
}

//------------------------------------------------------------------------------
// Model building facet (consumed by the -- external -- model builders)
//------------------------------------------------------------------------------
impl Csp {
    /// Creates a new, empty problem
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new variable with the given original candidate set. The
    /// set is fixed once and for all: propagation only ever withdraws (and
    /// restoration only ever reinstates) candidates given here.
    pub fn new_var(
        &mut self,
        name: impl Into<String>,
        domain: impl IntoIterator<Item = isize>,
    ) -> Variable {
        let id = self.variables.len();
        self.variables.push(VarData {
            name: name.into(),
            domain: Domain::new(domain),
            assigned: None,
        });
        self.attached.push(vec![]);
        Variable(id)
    }

    /// Posts a new constraint over the given scope and returns its handle.
    /// The variable -> constraints index is maintained here; it is the last
    /// structural mutation a constraint ever causes.
    ///
    /// # Panics
    /// When the relation is a table holding a tuple whose length differs
    /// from the scope length. Such a table is meaningless, and letting it
    /// through would silently corrupt every later feasibility check.
    pub fn post(
        &mut self,
        name: impl Into<String>,
        scope: Vec<Variable>,
        relation: Relation,
    ) -> Constraint {
        if let Relation::Table(tuples) = &relation {
            for tuple in tuples.iter() {
                assert!(
                    tuple.len() == scope.len(),
                    "tuple of length {} posted on a scope of length {}",
                    tuple.len(),
                    scope.len()
                );
            }
        }
        let id = Constraint(self.constraints.len());
        for var in scope.iter() {
            // a variable occurring twice in a scope is attached once
            if !self.attached[var.0].contains(&id) {
                self.attached[var.0].push(id);
            }
        }
        self.constraints.push(ConstraintData {
            name: name.into(),
            scope,
            relation,
        });
        id
    }
}

//------------------------------------------------------------------------------
// Structural queries
//------------------------------------------------------------------------------
impl Csp {
    /// The number of variables in the problem
    pub fn n_vars(&self) -> usize {
        self.variables.len()
    }
    /// The number of constraints in the problem
    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }
    /// Iterates over the handles of all variables
    pub fn vars(&self) -> impl Iterator<Item = Variable> {
        (0..self.variables.len()).map(Variable)
    }
    /// Iterates over the handles of all constraints
    pub fn constraints(&self) -> impl Iterator<Item = Constraint> {
        (0..self.constraints.len()).map(Constraint)
    }
    /// The constraints whose scope mentions the given variable
    /// (precomputed index, in posting order)
    pub fn constraints_on(&self, var: Variable) -> &[Constraint] {
        &self.attached[var.0]
    }
    /// The ordered scope of the given constraint
    pub fn scope(&self, c: Constraint) -> &[Variable] {
        &self.constraints[c.0].scope
    }
    /// The name the given variable was created with
    pub fn var_name(&self, var: Variable) -> &str {
        &self.variables[var.0].name
    }
    /// The name the given constraint was posted with
    pub fn constraint_name(&self, c: Constraint) -> &str {
        &self.constraints[c.0].name
    }
}

//------------------------------------------------------------------------------
// Domain and assignment facet (the only mutable state of a search)
//------------------------------------------------------------------------------
impl Csp {
    /// The values the variable may still assume. For an assigned variable
    /// that is its committed value and nothing else; the underlying
    /// pruned-set keeps existing (and keeps being pruned and restored
    /// value by value) underneath the assignment.
    pub fn cur_domain(&self, var: Variable) -> Vec<isize> {
        let data = &self.variables[var.0];
        match data.assigned {
            Some(v) if data.domain.contains(v) => vec![v],
            Some(_) => vec![],
            None => data.domain.iter().collect(),
        }
    }

    /// The number of values the variable may still assume
    pub fn cur_size(&self, var: Variable) -> usize {
        let data = &self.variables[var.0];
        match data.assigned {
            Some(v) => {
                if data.domain.contains(v) {
                    1
                } else {
                    0
                }
            }
            None => data.domain.size(),
        }
    }

    /// True iff the variable may still assume the given value
    pub fn cur_contains(&self, var: Variable, value: isize) -> bool {
        let data = &self.variables[var.0];
        match data.assigned {
            Some(a) => a == value && data.domain.contains(a),
            None => data.domain.contains(value),
        }
    }

    /// The original candidate set of the variable, withdrawn or not
    pub fn original_domain(&self, var: Variable) -> Vec<isize> {
        self.variables[var.0].domain.original().collect()
    }

    /// Commits the variable to a single value. This does not shrink the
    /// underlying domain: assignment and domain restriction are undone
    /// through separate channels (`unassign` vs `restore`).
    ///
    /// # Panics
    /// When the variable is already assigned, or when the value is not a
    /// live candidate. Either would mean the search driver lost track of
    /// its own trail.
    pub fn assign(&mut self, var: Variable, value: isize) {
        assert!(
            self.variables[var.0].assigned.is_none(),
            "{} is already assigned",
            self.variables[var.0].name
        );
        assert!(
            self.cur_contains(var, value),
            "{} is not a live candidate of {}",
            value,
            self.variables[var.0].name
        );
        self.variables[var.0].assigned = Some(value);
    }

    /// Retracts the variable's assignment (its domain is untouched)
    pub fn unassign(&mut self, var: Variable) {
        self.variables[var.0].assigned = None;
    }

    /// The value the variable is committed to, if any
    pub fn assigned_value(&self, var: Variable) -> Option<isize> {
        self.variables[var.0].assigned
    }

    /// Iterates over the handles of the variables not committed to a value
    /// yet (drivers build their variable ordering on top of this)
    pub fn unassigned_vars(&self) -> impl Iterator<Item = Variable> + '_ {
        self.vars()
            .filter(move |v| self.variables[v.0].assigned.is_none())
    }

    /// Withdraws the given value from the variable's current domain. This
    /// is THE primitive propagators do their work with, and every call must
    /// be mirrored by a `Pruned` record in the propagation log so that the
    /// search driver can undo it later.
    ///
    /// Returns `Err(Inconsistency)` when the withdrawal wipes the variable
    /// out: either the underlying domain is drained, or the value withdrawn
    /// is the one the variable is committed to.
    ///
    /// # Panics
    /// When the value is not a live candidate of the underlying domain
    /// (see `Domain::prune`: the double prune must fail fast).
    pub fn prune(&mut self, var: Variable, value: isize) -> CPResult<()> {
        let data = &mut self.variables[var.0];
        data.domain.prune(value);
        if data.domain.is_empty() || data.assigned == Some(value) {
            debug!("domain wipeout on {} pruning {}", data.name, value);
            Err(Inconsistency)
        } else {
            Ok(())
        }
    }

    /// Puts a previously pruned value back into the variable's current
    /// domain. This is the driver-facing undo primitive: propagators never
    /// restore anything themselves.
    ///
    /// # Panics
    /// When the value is live or was never a candidate (see
    /// `Domain::restore`).
    pub fn restore(&mut self, var: Variable, value: isize) {
        self.variables[var.0].domain.restore(value);
    }

    /// Undoes a whole propagation log. Restoration is order independent, so
    /// the log can be replayed as is.
    pub fn restore_all(&mut self, log: &[Pruned]) {
        for pruned in log.iter() {
            self.restore(pruned.variable, pruned.value);
        }
    }
}

//------------------------------------------------------------------------------
// Feasibility facet (consumed by the propagators)
//------------------------------------------------------------------------------
impl Csp {
    /// True iff the given tuple, positionally aligned with the constraint
    /// scope, satisfies the constraint
    pub fn check(&self, c: Constraint, tuple: &[isize]) -> bool {
        self.constraints[c.0].relation.check(tuple)
    }

    /// The number of scope variables not committed to a value yet
    pub fn n_unassigned(&self, c: Constraint) -> usize {
        self.constraints[c.0]
            .scope
            .iter()
            .filter(|v| self.variables[v.0].assigned.is_none())
            .count()
    }

    /// The scope variables not committed to a value yet, in scope order
    pub fn unassigned_in_scope(&self, c: Constraint) -> Vec<Variable> {
        self.constraints[c.0]
            .scope
            .iter()
            .copied()
            .filter(|v| self.variables[v.0].assigned.is_none())
            .collect()
    }

    /// The committed values of the whole scope, in scope order, provided
    /// every scope variable is assigned (`None` as soon as one is not)
    pub fn assigned_tuple(&self, c: Constraint) -> Option<Vec<isize>> {
        self.constraints[c.0]
            .scope
            .iter()
            .map(|v| self.variables[v.0].assigned)
            .collect()
    }

    /// True iff there exists an assignment drawn from the current domains
    /// of every other scope variable which, together with `var = value`,
    /// satisfies the constraint. This is the support notion generalized
    /// arc consistency is built on.
    ///
    /// # Note
    /// The search is a naive depth first walk of the cartesian product of
    /// the other positions' current domains, short-circuiting on the first
    /// satisfying tuple. Scopes stay small for the problems this engine
    /// targets, so correctness -- not support caching -- is the contract.
    pub fn has_support(&self, c: Constraint, var: Variable, value: isize) -> bool {
        let data = &self.constraints[c.0];
        debug_assert!(data.scope.contains(&var));
        let mut tuple = vec![0; data.scope.len()];
        self.support_search(data, var, value, &mut tuple, 0)
    }

    /// Fills `tuple` position by position: the positions held by `var` are
    /// pinned to `value`, every other position enumerates its variable's
    /// current domain. Stops as soon as one complete tuple checks out.
    fn support_search(
        &self,
        data: &ConstraintData,
        var: Variable,
        value: isize,
        tuple: &mut Vec<isize>,
        depth: usize,
    ) -> bool {
        if depth == data.scope.len() {
            return data.relation.check(tuple);
        }
        let x = data.scope[depth];
        if x == var {
            tuple[depth] = value;
            self.support_search(data, var, value, tuple, depth + 1)
        } else {
            self.cur_domain(x).into_iter().any(|v| {
                tuple[depth] = v;
                self.support_search(data, var, value, tuple, depth + 1)
            })
        }
    }
}
