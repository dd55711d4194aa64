//! Signal dictionary and register commit machinery
//!
//! A compiled evaluator owns one `SignalTable`: the string-keyed dictionary
//! built once at construction, the backing storage for every signal, and the
//! next-value slot each register's settle-phase candidate lands in. The hot
//! path works on pre-resolved indices; names are only touched by peek/poke
//! and by the one-time index resolution in an evaluator's constructor.

use std::collections::HashMap;

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::bits;
use crate::value::SignalValue;
use crate::wide;

/// Signal role within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Input,
    Output,
    Wire,
    Register,
}

/// One signal declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalDef {
    pub name: String,
    pub width: usize,
    pub kind: SignalKind,
    /// Value the commit phase loads while reset is asserted. `None` opts the
    /// register out of reset entirely. Ignored for non-registers.
    #[serde(default)]
    pub reset_value: Option<u64>,
}

/// Complete signal dictionary for one circuit.
#[derive(Debug, Clone, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub signals: Vec<SignalDef>,
}

/// Register initial-value policy, fixed per evaluator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPolicy {
    /// Registers start at zero.
    Zero,
    /// Registers start at their reset value (zero when they have none).
    Reset,
    /// Registers start at width-masked values drawn from a seeded generator.
    /// The same seed reproduces the same values.
    Random(u64),
}

/// A register's target slot plus its pending next value.
#[derive(Debug, Clone)]
struct RegSlot {
    target: usize,
    next: SignalValue,
    reset_value: Option<SignalValue>,
}

/// Name-keyed signal storage for one circuit instance.
#[derive(Debug, Clone)]
pub struct SignalTable {
    values: Vec<SignalValue>,
    widths: Vec<usize>,
    name_to_idx: HashMap<String, usize>,
    regs: Vec<RegSlot>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl SignalTable {
    pub fn new(def: &TableDef, init: InitPolicy) -> Result<Self, String> {
        let mut values = Vec::with_capacity(def.signals.len());
        let mut widths = Vec::with_capacity(def.signals.len());
        let mut name_to_idx = HashMap::new();
        let mut regs = Vec::new();
        let mut input_names = Vec::new();
        let mut output_names = Vec::new();
        let seed = match init {
            InitPolicy::Random(seed) => seed,
            _ => 0,
        };
        let mut rng = StdRng::seed_from_u64(seed);

        for sdef in &def.signals {
            if sdef.width == 0 {
                return Err(format!("Signal {} has zero width", sdef.name));
            }
            let idx = values.len();
            if name_to_idx.insert(sdef.name.clone(), idx).is_some() {
                return Err(format!("Duplicate signal name: {}", sdef.name));
            }
            widths.push(sdef.width);
            match sdef.kind {
                SignalKind::Input => input_names.push(sdef.name.clone()),
                SignalKind::Output => output_names.push(sdef.name.clone()),
                SignalKind::Wire | SignalKind::Register => {}
            }

            if sdef.kind == SignalKind::Register {
                let reset_value = match sdef.reset_value {
                    Some(v) => {
                        if sdef.width < bits::WORD_BITS && v > bits::mask(sdef.width) {
                            return Err(format!(
                                "Reset value {} does not fit width {} of register {}",
                                v, sdef.width, sdef.name
                            ));
                        }
                        Some(SignalValue::from_biguint(&BigUint::from(v), sdef.width))
                    }
                    None => None,
                };
                let initial = match init {
                    InitPolicy::Zero => SignalValue::zero(sdef.width),
                    InitPolicy::Reset => reset_value
                        .clone()
                        .unwrap_or_else(|| SignalValue::zero(sdef.width)),
                    InitPolicy::Random(_) => Self::random_value(&mut rng, sdef.width),
                };
                regs.push(RegSlot {
                    target: idx,
                    next: SignalValue::zero(sdef.width),
                    reset_value,
                });
                values.push(initial);
            } else {
                values.push(SignalValue::zero(sdef.width));
            }
        }

        debug!(
            circuit = %def.name,
            signals = values.len(),
            registers = regs.len(),
            "signal table constructed"
        );

        Ok(Self {
            values,
            widths,
            name_to_idx,
            regs,
            input_names,
            output_names,
        })
    }

    /// Build from a JSON signal dictionary.
    pub fn from_json(json: &str, init: InitPolicy) -> Result<Self, String> {
        let def: TableDef = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse signal table JSON: {}", e))?;
        Self::new(&def, init)
    }

    fn random_value(rng: &mut StdRng, width: usize) -> SignalValue {
        if width <= bits::WORD_BITS {
            SignalValue::Word(rng.next_u64() & bits::mask(width))
        } else {
            let mut bytes = vec![0u8; (width + 7) / 8];
            rng.fill_bytes(&mut bytes);
            SignalValue::Wide(BigUint::from_bytes_le(&bytes) & wide::mask(width))
        }
    }

    /// Current value of a named signal. `None` for unknown names.
    pub fn peek(&self, name: &str) -> Option<BigUint> {
        let &idx = self.name_to_idx.get(name)?;
        Some(self.values[idx].to_biguint())
    }

    /// Overwrite a named signal's current value, masked to its declared
    /// width. Unknown names are a silent no-op.
    pub fn poke(&mut self, name: &str, value: &BigUint) {
        if let Some(&idx) = self.name_to_idx.get(name) {
            let width = self.widths[idx];
            self.values[idx].store(value, width);
        }
    }

    /// Slot index for a named signal, for one-time resolution at evaluator
    /// construction.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.name_to_idx.get(name).copied()
    }

    /// Register-slot index for a named register.
    pub fn reg_index(&self, name: &str) -> Option<usize> {
        let target = self.index(name)?;
        self.regs.iter().position(|slot| slot.target == target)
    }

    pub fn width(&self, idx: usize) -> usize {
        self.widths[idx]
    }

    /// Low 64 bits of a signal's current value.
    #[inline(always)]
    pub fn word(&self, idx: usize) -> u64 {
        self.values[idx].word()
    }

    /// Store a combinational result, masked to the slot's declared width.
    #[inline(always)]
    pub fn set_word(&mut self, idx: usize, value: u64) {
        let width = self.widths[idx];
        self.values[idx].store_word(value, width);
    }

    pub fn value(&self, idx: usize) -> &SignalValue {
        &self.values[idx]
    }

    pub fn set_value(&mut self, idx: usize, value: &BigUint) {
        let width = self.widths[idx];
        self.values[idx].store(value, width);
    }

    /// Stage a register's next-value candidate, masked to its width.
    #[inline(always)]
    pub fn set_next_word(&mut self, slot: usize, value: u64) {
        let width = self.widths[self.regs[slot].target];
        self.regs[slot].next.store_word(value, width);
    }

    /// Stage a wide register's next-value candidate, masked to its width.
    pub fn set_next(&mut self, slot: usize, value: &BigUint) {
        let width = self.widths[self.regs[slot].target];
        self.regs[slot].next.store(value, width);
    }

    /// Commit phase: replace every register's current value with its staged
    /// candidate. While `reset` is asserted, registers carrying a reset
    /// value load that value instead; registers without one still take their
    /// candidate.
    pub fn commit(&mut self, reset: bool) {
        if reset {
            trace!("reset asserted; registers with reset values load them");
        }
        for i in 0..self.regs.len() {
            let value = if reset {
                match &self.regs[i].reset_value {
                    Some(v) => v.clone(),
                    None => self.regs[i].next.clone(),
                }
            } else {
                self.regs[i].next.clone()
            };
            let target = self.regs[i].target;
            self.values[target] = value;
        }
    }

    pub fn signal_count(&self) -> usize {
        self.values.len()
    }

    pub fn reg_count(&self) -> usize {
        self.regs.len()
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn sig(name: &str, width: usize, kind: SignalKind, reset_value: Option<u64>) -> SignalDef {
        SignalDef {
            name: name.to_string(),
            width,
            kind,
            reset_value,
        }
    }

    fn two_reg_def() -> TableDef {
        TableDef {
            name: "pair".to_string(),
            signals: vec![
                sig("in", 8, SignalKind::Input, None),
                sig("a", 8, SignalKind::Register, Some(0)),
                sig("b", 8, SignalKind::Register, None),
            ],
        }
    }

    #[test]
    fn test_rejects_zero_width() {
        let def = TableDef {
            name: "bad".to_string(),
            signals: vec![sig("w", 0, SignalKind::Wire, None)],
        };
        assert!(SignalTable::new(&def, InitPolicy::Zero).is_err());
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let def = TableDef {
            name: "bad".to_string(),
            signals: vec![
                sig("x", 4, SignalKind::Wire, None),
                sig("x", 4, SignalKind::Wire, None),
            ],
        };
        assert!(SignalTable::new(&def, InitPolicy::Zero).is_err());
    }

    #[test]
    fn test_rejects_oversized_reset_value() {
        let def = TableDef {
            name: "bad".to_string(),
            signals: vec![sig("r", 4, SignalKind::Register, Some(16))],
        };
        assert!(SignalTable::new(&def, InitPolicy::Zero).is_err());
    }

    #[test]
    fn test_peek_poke_and_unknown_names() {
        let mut t = SignalTable::new(&two_reg_def(), InitPolicy::Zero).unwrap();
        t.poke("a", &BigUint::from(0x1ffu32));
        // Masked to width 8
        assert_eq!(t.peek("a"), Some(BigUint::from(0xffu32)));
        assert_eq!(t.peek("nonexistent"), None);

        let before: Vec<_> = ["in", "a", "b"].iter().map(|n| t.peek(n)).collect();
        t.poke("nonexistent", &BigUint::from(5u32));
        let after: Vec<_> = ["in", "a", "b"].iter().map(|n| t.peek(n)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_commit_applies_candidates() {
        let mut t = SignalTable::new(&two_reg_def(), InitPolicy::Zero).unwrap();
        let a = t.reg_index("a").unwrap();
        let b = t.reg_index("b").unwrap();
        t.set_next_word(a, 3);
        t.set_next_word(b, 7);
        // Nothing moves before commit
        assert_eq!(t.peek("a"), Some(BigUint::from(0u32)));
        t.commit(false);
        assert_eq!(t.peek("a"), Some(BigUint::from(3u32)));
        assert_eq!(t.peek("b"), Some(BigUint::from(7u32)));
    }

    #[test]
    fn test_reset_is_per_register() {
        let mut t = SignalTable::new(&two_reg_def(), InitPolicy::Zero).unwrap();
        let a = t.reg_index("a").unwrap();
        let b = t.reg_index("b").unwrap();
        t.set_next_word(a, 3);
        t.set_next_word(b, 7);
        t.commit(true);
        // `a` resets to zero, `b` has no reset value and takes its candidate
        assert_eq!(t.peek("a"), Some(BigUint::from(0u32)));
        assert_eq!(t.peek("b"), Some(BigUint::from(7u32)));
    }

    #[test]
    fn test_init_policies() {
        let def = TableDef {
            name: "init".to_string(),
            signals: vec![sig("r", 8, SignalKind::Register, Some(0x2a))],
        };
        let zero = SignalTable::new(&def, InitPolicy::Zero).unwrap();
        assert_eq!(zero.peek("r"), Some(BigUint::from(0u32)));

        let reset = SignalTable::new(&def, InitPolicy::Reset).unwrap();
        assert_eq!(reset.peek("r"), Some(BigUint::from(0x2au32)));
    }

    #[test]
    fn test_random_init_is_seeded_and_masked() {
        let def = TableDef {
            name: "rand".to_string(),
            signals: vec![
                sig("r", 5, SignalKind::Register, None),
                sig("w", 90, SignalKind::Register, None),
            ],
        };
        let a = SignalTable::new(&def, InitPolicy::Random(7)).unwrap();
        let b = SignalTable::new(&def, InitPolicy::Random(7)).unwrap();
        assert_eq!(a.peek("r"), b.peek("r"));
        assert_eq!(a.peek("w"), b.peek("w"));
        assert!(a.peek("r").unwrap() <= BigUint::from(31u32));
        assert!(a.peek("w").unwrap() < (BigUint::one() << 90usize));
    }

    #[test]
    fn test_wide_signal_storage() {
        let def = TableDef {
            name: "wide".to_string(),
            signals: vec![sig("acc", 80, SignalKind::Register, None)],
        };
        let mut t = SignalTable::new(&def, InitPolicy::Zero).unwrap();
        let over = (BigUint::one() << 100usize) | BigUint::from(5u32);
        t.poke("acc", &over);
        // Bit 100 is beyond width 80
        assert_eq!(t.peek("acc"), Some(BigUint::from(5u32)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "counter",
            "signals": [
                {"name": "reset", "width": 1, "kind": "input"},
                {"name": "out", "width": 4, "kind": "output"},
                {"name": "r", "width": 4, "kind": "register", "reset_value": 0}
            ]
        }"#;
        let t = SignalTable::from_json(json, InitPolicy::Zero).unwrap();
        assert_eq!(t.signal_count(), 3);
        assert_eq!(t.reg_count(), 1);
        assert_eq!(t.input_names(), ["reset"]);
        assert_eq!(t.output_names(), ["out"]);

        assert!(SignalTable::from_json("not json", InitPolicy::Zero).is_err());
    }
}
