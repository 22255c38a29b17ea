use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::decoder::Decoder;

/// Per-mnemonic histogram over a stream of instruction words.
pub struct InstCounter<'d, D: Decoder> {
    decoder: &'d D,
    counts: BTreeMap<String, u64>,
    total: u64,
    unknown: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub mnemonic: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountReport {
    pub total: u64,
    pub unknown: u64,
    /// Highest count first, then by mnemonic.
    pub entries: Vec<CountEntry>,
}

impl<'d, D: Decoder> InstCounter<'d, D> {
    pub fn new(decoder: &'d D) -> Self {
        Self {
            decoder,
            counts: BTreeMap::new(),
            total: 0,
            unknown: 0,
        }
    }

    /// Counts one word. Returns false when no table row matches it.
    pub fn record(&mut self, raw32: u32) -> bool {
        self.total += 1;
        match self.decoder.decode(raw32) {
            Some(d) => {
                trace!(raw = raw32, mnemonic = d.mnemonic, "counted");
                *self.counts.entry(d.mnemonic.to_string()).or_insert(0) += 1;
                true
            }
            None => {
                self.unknown += 1;
                false
            }
        }
    }

    pub fn count(&self, mnemonic: &str) -> u64 {
        self.counts.get(mnemonic).copied().unwrap_or(0)
    }

    pub fn report(&self) -> CountReport {
        let mut entries: Vec<CountEntry> = self
            .counts
            .iter()
            .map(|(m, &count)| CountEntry { mnemonic: m.clone(), count })
            .collect();
        // BTreeMap order already sorts ties by mnemonic; the sort is stable
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        CountReport {
            total: self.total,
            unknown: self.unknown,
            entries,
        }
    }
}
