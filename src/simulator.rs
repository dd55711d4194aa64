//! The cycle evaluator contract
//!
//! One `Simulator` instance is one compiled circuit: registers and
//! combinational signals behind a name-keyed view. A driver that speaks this
//! trait can operate any circuit without knowing anything beyond signal
//! names.
//!
//! A cycle is two strict phases. The settle phase recomputes every
//! combinational signal and stages every register's next-value candidate,
//! purely from current register values and current inputs; it mutates no
//! persistent state, so re-running it is observationally idempotent. The
//! commit phase, entered only when `update_registers` is true, atomically
//! replaces register values with their staged candidates (or reset values
//! while reset is asserted). Within one `step`, settling strictly precedes
//! commit; across steps, cycle N's commit is fully peek-visible before cycle
//! N+1 settles.
//!
//! Evaluator lifecycle: construction assigns initial register values and
//! leaves the instance settled-equivalent; `step(false)` settles without
//! advancing; `step(true)` advances one cycle. An evaluator with a terminal
//! condition reports it by returning `false` from `step` - once stopped,
//! further steps must not corrupt state (they may be no-ops that keep
//! reporting the stop), and `peek` keeps working.

use num_bigint::BigUint;

/// Uniform control surface over one compiled circuit instance.
pub trait Simulator {
    /// Current value of a named signal as an unsigned magnitude. `None` for
    /// names this evaluator does not export; callers treat that as a
    /// distinguishable miss, not a failure.
    fn peek(&self, name: &str) -> Option<BigUint>;

    /// Overwrite a named signal's current value immediately, bypassing
    /// recomputation. Unknown names are a no-op. A poked register holds the
    /// value only until the next commit overwrites it.
    fn poke(&mut self, name: &str, value: &BigUint);

    /// Evaluate one cycle: settle, then commit when `update_registers` is
    /// true. Returns whether simulation may continue.
    fn step(&mut self, update_registers: bool) -> bool;
}

/// Drive `sim` for up to `cycles` committed cycles, stopping early when the
/// evaluator declares a stop. Returns the number of cycles executed.
pub fn run(sim: &mut dyn Simulator, cycles: usize) -> usize {
    for n in 0..cycles {
        if !sim.step(true) {
            return n + 1;
        }
    }
    cycles
}
