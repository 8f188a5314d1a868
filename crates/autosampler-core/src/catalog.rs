//! Fixed bank of sample slots.
//!
//! Slot `i` maps to dynamic layer `i / 12` and pitch `i % 12`; its display
//! name (and recorded file stem) is `<layer>_<pitch>`.

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Dynamic layers, softest first.
pub const DYNAMIC_LAYERS: [&str; 3] = ["p", "mf", "ff"];

/// Pitches sampled per layer.
pub const PITCHES: [&str; 12] = [
    "C0", "G0", "D1", "A1", "E2", "B2", "F#3", "C#4", "G#4", "D#5", "A#5", "F6",
];

pub const SLOT_COUNT: usize = DYNAMIC_LAYERS.len() * PITCHES.len();

/// Index of the final slot. Advancing stops here.
pub const LAST_SLOT: usize = SLOT_COUNT - 1;

/// One addressable (dynamic layer, pitch) sample destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SampleSlot {
    index: usize,
    layer: &'static str,
    pitch: &'static str,
    name: String,
}

impl SampleSlot {
    fn new(index: usize) -> Self {
        let layer = DYNAMIC_LAYERS[index / PITCHES.len()];
        let pitch = PITCHES[index % PITCHES.len()];
        Self {
            index,
            layer,
            pitch,
            name: format!("{layer}_{pitch}"),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn layer(&self) -> &'static str {
        self.layer
    }

    pub fn pitch(&self) -> &'static str {
        self.pitch
    }

    /// `<layer>_<pitch>`, e.g. `mf_F#3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name the slot is recorded to, e.g. `p_C0.wav`.
    pub fn file_name(&self) -> String {
        format!("{}.wav", self.name)
    }

    pub fn is_last(&self) -> bool {
        self.index == LAST_SLOT
    }
}

impl fmt::Display for SampleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Read-only registry of every sample slot, built once per process.
#[derive(Debug)]
pub struct SampleCatalog {
    slots: Vec<SampleSlot>,
}

static CATALOG: OnceLock<SampleCatalog> = OnceLock::new();

impl SampleCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static SampleCatalog {
        CATALOG.get_or_init(|| SampleCatalog {
            slots: (0..SLOT_COUNT).map(SampleSlot::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SampleSlot> {
        self.slots.get(index)
    }

    pub fn slot(&self, index: usize) -> Result<&SampleSlot> {
        self.get(index).ok_or(Error::InvalidSlot(index))
    }

    /// Slot at `index`, saturating at the last slot.
    pub fn saturating(&self, index: usize) -> &SampleSlot {
        &self.slots[index.min(LAST_SLOT)]
    }

    /// Look a slot up by its display name.
    pub fn find(&self, name: &str) -> Option<&SampleSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleSlot> {
        self.slots.iter()
    }
}
