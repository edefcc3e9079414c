//! World coordinate conventions.

pub mod coords;
