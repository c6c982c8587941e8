// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog loading and the public context.

mod context;
mod load;
mod registry;

pub use context::Context;
pub use load::{load_defs, LoadError};
pub use registry::{CaseMode, Registry};
