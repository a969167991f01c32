//! Application activation: which app a Dock label names, and whether a click
//! should restore or hide it.

mod alias;
mod registry;
mod resolver;

pub use alias::AliasTable;
pub use registry::{ProcessRegistry, RunningApp};
pub use resolver::{Action, ActivationResolver, Resolution};
