//! Small cross-cutting helpers.

pub mod thread;
