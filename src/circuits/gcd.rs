//! Width-16 subtractive GCD unit
//!
//! Registers `x` and `y` run Euclid's algorithm by repeated subtraction:
//! each committed cycle the larger operand sheds the smaller one. Asserting
//! `io_e` loads fresh operands from `io_a`/`io_b` instead. `io_z` exposes
//! `x` and `io_v` goes high once `y` reaches zero, at which point `io_z`
//! holds the result. Neither register carries a reset value, so the reset
//! control signal leaves them alone.

use num_bigint::BigUint;

use crate::bits;
use crate::simulator::Simulator;
use crate::table::{InitPolicy, SignalDef, SignalKind, SignalTable, TableDef};

const WIDTH: usize = 16;

pub struct Gcd {
    table: SignalTable,
    io_a: usize,
    io_b: usize,
    io_e: usize,
    reset: usize,
    io_z: usize,
    io_v: usize,
    x_sub: usize,
    y_sub: usize,
    x: usize,
    y: usize,
    x_slot: usize,
    y_slot: usize,
}

impl Gcd {
    pub fn new(init: InitPolicy) -> Result<Self, String> {
        let signals = vec![
            ("io_a", WIDTH, SignalKind::Input),
            ("io_b", WIDTH, SignalKind::Input),
            ("io_e", 1, SignalKind::Input),
            ("reset", 1, SignalKind::Input),
            ("io_z", WIDTH, SignalKind::Output),
            ("io_v", 1, SignalKind::Output),
            ("x_sub", WIDTH, SignalKind::Wire),
            ("y_sub", WIDTH, SignalKind::Wire),
            ("x", WIDTH, SignalKind::Register),
            ("y", WIDTH, SignalKind::Register),
        ];
        let def = TableDef {
            name: "gcd".to_string(),
            signals: signals
                .into_iter()
                .map(|(name, width, kind)| SignalDef {
                    name: name.to_string(),
                    width,
                    kind,
                    reset_value: None,
                })
                .collect(),
        };
        let table = SignalTable::new(&def, init)?;
        let io_a = table.index("io_a").unwrap_or(0);
        let io_b = table.index("io_b").unwrap_or(0);
        let io_e = table.index("io_e").unwrap_or(0);
        let reset = table.index("reset").unwrap_or(0);
        let io_z = table.index("io_z").unwrap_or(0);
        let io_v = table.index("io_v").unwrap_or(0);
        let x_sub = table.index("x_sub").unwrap_or(0);
        let y_sub = table.index("y_sub").unwrap_or(0);
        let x = table.index("x").unwrap_or(0);
        let y = table.index("y").unwrap_or(0);
        let x_slot = table.reg_index("x").unwrap_or(0);
        let y_slot = table.reg_index("y").unwrap_or(0);
        Ok(Self {
            table,
            io_a,
            io_b,
            io_e,
            reset,
            io_z,
            io_v,
            x_sub,
            y_sub,
            x,
            y,
            x_slot,
            y_slot,
        })
    }
}

impl Simulator for Gcd {
    fn peek(&self, name: &str) -> Option<BigUint> {
        self.table.peek(name)
    }

    fn poke(&mut self, name: &str, value: &BigUint) {
        self.table.poke(name, value);
    }

    fn step(&mut self, update_registers: bool) -> bool {
        let x = self.table.word(self.x);
        let y = self.table.word(self.y);
        // Subtraction borrows into the high bits; mask back to width
        let x_sub = x.wrapping_sub(y) & bits::mask(WIDTH);
        let y_sub = y.wrapping_sub(x) & bits::mask(WIDTH);
        let x_step = if x > y { x_sub } else { x };
        let y_step = if x > y { y } else { y_sub };
        self.table.set_word(self.x_sub, x_sub);
        self.table.set_word(self.y_sub, y_sub);
        self.table.set_word(self.io_z, x);
        self.table.set_word(self.io_v, (y == 0) as u64);
        let load = self.table.word(self.io_e) != 0;
        let x_next = if load { self.table.word(self.io_a) } else { x_step };
        let y_next = if load { self.table.word(self.io_b) } else { y_step };
        self.table.set_next_word(self.x_slot, x_next);
        self.table.set_next_word(self.y_slot, y_next);
        if update_registers {
            let reset = self.table.word(self.reset) != 0;
            self.table.commit(reset);
        }
        true
    }
}
