use serde::Serialize;
use tracing::{debug, warn};

use crate::assemble::assemble;
use crate::decoder::{Decoded, Decoder};
use crate::encode::Derivation;
use crate::error::{Error, Result};
use crate::line::SpecLine;

/// Canonical encoding and decode mask of one vector instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpcodeEntry {
    pub mnemonic: String,
    pub encoding: u32,
    pub mask: u32,
}

impl OpcodeEntry {
    pub fn from_line(line: &SpecLine) -> Result<Self> {
        let encoding = assemble(line, Derivation::Encoding)?.word()?;
        let mask = assemble(line, Derivation::Mask)?.word()?;
        Ok(Self {
            mnemonic: line.mnemonic.clone(),
            encoding,
            mask,
        })
    }

    pub fn matches(&self, raw32: u32) -> bool {
        raw32 & self.mask == self.encoding
    }
}

/// A row that could not be turned into an [`OpcodeEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub index: usize,
    pub error: Error,
}

/// Mask/match decoder over the vector opcode table.
#[derive(Debug, Clone, Default)]
pub struct RvvDecoder {
    entries: Vec<OpcodeEntry>,
    // entry indices, most mask bits first, table order among equals
    by_specificity: Vec<usize>,
}

impl RvvDecoder {
    pub fn new(entries: Vec<OpcodeEntry>) -> Self {
        let mut by_specificity: Vec<usize> = (0..entries.len()).collect();
        by_specificity.sort_by_key(|&i| std::cmp::Reverse(entries[i].mask.count_ones()));
        Self { entries, by_specificity }
    }

    /// Builds the decoder from raw table rows. Rows that fail are skipped
    /// and reported; they never poison the rest of the table.
    pub fn from_lines<'a, I>(lines: I) -> (Self, Vec<RowError>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = Vec::new();
        let mut errors = Vec::new();
        for (index, text) in lines.into_iter().enumerate() {
            match SpecLine::parse(text).and_then(|line| OpcodeEntry::from_line(&line)) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    warn!(index, %error, "skipping opcode row");
                    errors.push(RowError { index, error });
                }
            }
        }
        debug!(entries = entries.len(), rejected = errors.len(), "opcode table built");
        (Self::new(entries), errors)
    }

    pub fn entries(&self) -> &[OpcodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Decoder for RvvDecoder {
    fn decode(&self, raw32: u32) -> Option<Decoded<'_>> {
        let entry = self
            .by_specificity
            .iter()
            .map(|&i| &self.entries[i])
            .find(|e| e.matches(raw32))?;
        Some(Decoded {
            mnemonic: &entry.mnemonic,
            raw: raw32,
            operands: raw32 & !entry.mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &[&str] = &[
        "vmerge.vvm 31..26=0x17 25=0 vs2 vs1 14..12=0x0 vd 6..0=0x57",
        "vmv.v.v 31..26=0x17 25=1 24..20=0 vs1 14..12=0x0 vd 6..0=0x57",
        "vadd.vv 31..26=0x00 vm vs2 vs1 14..12=0x0 vd 6..0=0x57",
    ];

    #[test]
    fn entry_holds_encoding_and_mask() {
        let e = OpcodeEntry::from_line(&SpecLine::parse(ROWS[2]).unwrap()).unwrap();
        assert_eq!(e.encoding, 0x0000_0057);
        assert_eq!(e.mask, 0xfc00_707f);
        // vadd.vv v1, v2, v3 (unmasked)
        assert!(e.matches(0x0221_80d7));
    }

    #[test]
    fn most_specific_row_wins() {
        let (dec, errors) = RvvDecoder::from_lines(ROWS.iter().copied());
        assert!(errors.is_empty());
        assert_eq!(dec.len(), 3);
        // vmv.v.v v1, v3: funct6=0x17, vm=1, vs2=0, vs1=3
        let raw = (0x17 << 26) | (1 << 25) | (3 << 15) | (1 << 7) | 0x57;
        let d = dec.decode(raw).unwrap();
        assert_eq!(d.mnemonic, "vmv.v.v");
        assert_eq!(d.operands, (3 << 15) | (1 << 7));
        // vmerge.vvm v1, v2, v3, v0: vm=0
        let raw = (0x17 << 26) | (2 << 20) | (3 << 15) | (1 << 7) | 0x57;
        assert_eq!(dec.decode(raw).unwrap().mnemonic, "vmerge.vvm");
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let rows = ["vshort 6..0=0x57", ROWS[2], "vbad 2..0=0x9"];
        let (dec, errors) = RvvDecoder::from_lines(rows);
        assert_eq!(dec.len(), 1);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].index, 0);
        assert!(matches!(errors[0].error, Error::WidthMismatch { width: 7, .. }));
        assert!(matches!(errors[1].error, Error::MalformedRange { .. }));
        assert!(dec.decode(0x0000_0013).is_none());
    }
}
