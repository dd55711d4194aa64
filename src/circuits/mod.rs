//! Reference circuit evaluators
//!
//! Hand-maintained instances of the shape the compiler emits: a signal table
//! built in the constructor, slot indices resolved once, and a flat settle
//! sequence in dependency order inside `step`. They double as executable
//! documentation of the evaluator contract.

pub mod counter;
pub mod gcd;

pub use counter::Counter;
pub use gcd::Gcd;
