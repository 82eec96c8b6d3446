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

//! csprop is a small constraint propagation engine meant to be embedded in a
//! backtracking search. It provides the variable/constraint data model of a
//! finite domain csp along with three propagation strategies of increasing
//! strength (plain backtracking checks, forward checking and generalized arc
//! consistency) which all account exactly for every value they withdraw from
//! a domain, so that the surrounding search can undo their work when it
//! retracts an assignment.

pub mod engine;
pub mod propagators;

pub use engine::*;
pub use propagators::*;

/// A convenience module meant to be glob imported to bring the complete
/// engine surface in scope at once.
pub mod prelude {
    pub use crate::engine::*;
    pub use crate::propagators::*;
}
