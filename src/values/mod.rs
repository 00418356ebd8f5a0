// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The run-scoped values store and the typed input/output bags processors work with.

mod io;
mod store;
mod value;

pub use io::{Input, Output};
pub use store::{Origin, Values, WritePolicy};
pub use value::{Lookup, Slot, TypeTag, Value};
