// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pattern geometry: lattice cells, the rotation group, and the canonical
//! cell-list pattern form.

pub mod cell;
pub mod pattern;
pub mod transform;

pub use cell::Cell;
pub use pattern::{Pattern, RleError};
pub use transform::{Transform, ROTATIONS};
