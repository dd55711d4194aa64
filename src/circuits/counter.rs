//! Free-running 4-bit counter
//!
//! Register `r` increments modulo 16 every committed cycle and drives the
//! `out` port combinationally. Reset loads zero.

use num_bigint::BigUint;

use crate::bits;
use crate::simulator::Simulator;
use crate::table::{InitPolicy, SignalDef, SignalKind, SignalTable, TableDef};

const WIDTH: usize = 4;

pub struct Counter {
    table: SignalTable,
    reset: usize,
    out: usize,
    r: usize,
    r_slot: usize,
}

impl Counter {
    pub fn new(init: InitPolicy) -> Result<Self, String> {
        let def = TableDef {
            name: "counter".to_string(),
            signals: vec![
                SignalDef {
                    name: "reset".to_string(),
                    width: 1,
                    kind: SignalKind::Input,
                    reset_value: None,
                },
                SignalDef {
                    name: "out".to_string(),
                    width: WIDTH,
                    kind: SignalKind::Output,
                    reset_value: None,
                },
                SignalDef {
                    name: "r".to_string(),
                    width: WIDTH,
                    kind: SignalKind::Register,
                    reset_value: Some(0),
                },
            ],
        };
        let table = SignalTable::new(&def, init)?;
        let reset = table.index("reset").unwrap_or(0);
        let out = table.index("out").unwrap_or(0);
        let r = table.index("r").unwrap_or(0);
        let r_slot = table.reg_index("r").unwrap_or(0);
        Ok(Self {
            table,
            reset,
            out,
            r,
            r_slot,
        })
    }
}

impl Simulator for Counter {
    fn peek(&self, name: &str) -> Option<BigUint> {
        self.table.peek(name)
    }

    fn poke(&mut self, name: &str, value: &BigUint) {
        self.table.poke(name, value);
    }

    fn step(&mut self, update_registers: bool) -> bool {
        let r = self.table.word(self.r);
        let r_next = r.wrapping_add(1) & bits::mask(WIDTH);
        self.table.set_word(self.out, r);
        self.table.set_next_word(self.r_slot, r_next);
        if update_registers {
            let reset = self.table.word(self.reset) != 0;
            self.table.commit(reset);
        }
        true
    }
}
