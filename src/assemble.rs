use std::fmt;

use tracing::debug;

use crate::encode::{derive, Derivation, Encoded};
use crate::error::{Error, Result};
use crate::field::Bits;
use crate::line::SpecLine;

/// A table row with every field resolved, still in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub mnemonic: String,
    pub derivation: Derivation,
    pub fields: Vec<Encoded>,
}

pub fn assemble(line: &SpecLine, derivation: Derivation) -> Result<Assembled> {
    let fields = line
        .fields
        .iter()
        .map(|f| derive(f, derivation))
        .collect::<Result<Vec<_>>>()?;
    let word = Assembled {
        mnemonic: line.mnemonic.clone(),
        derivation,
        fields,
    };
    debug!(mnemonic = %word.mnemonic, ?derivation, width = word.width(), "assembled");
    Ok(word)
}

impl Assembled {
    pub fn width(&self) -> usize {
        self.fields.iter().map(Encoded::width).sum()
    }

    pub fn is_resolved(&self) -> bool {
        self.fields.iter().all(|f| matches!(f, Encoded::Bits(_)))
    }

    pub fn bit_string(&self) -> String {
        let mut s = String::with_capacity(self.width());
        for field in &self.fields {
            field.push_digits(&mut s);
        }
        s
    }

    /// Concatenated bits; fails on the first unresolved operand.
    pub fn to_bits(&self) -> Result<Bits> {
        let mut bits = Bits::with_capacity(self.width());
        for field in &self.fields {
            match field {
                Encoded::Bits(b) => bits.extend_from_bitslice(b),
                Encoded::Unresolved(name) => {
                    return Err(Error::UnresolvedOperand {
                        mnemonic: self.mnemonic.clone(),
                        name: name.clone(),
                    })
                }
            }
        }
        Ok(bits)
    }

    /// Unsigned value of the bit string in the 64-bit working width.
    pub fn value(&self) -> Result<u64> {
        let bits = self.to_bits()?;
        let Some(first) = bits.first_one() else {
            return Ok(0);
        };
        let significant = &bits[first..];
        if significant.len() > u64::BITS as usize {
            return Err(Error::Overflow {
                mnemonic: self.mnemonic.clone(),
                bits: significant.len(),
            });
        }
        Ok(significant
            .iter()
            .by_vals()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(b)))
    }

    /// The value as a 32-bit instruction word. Only exact 32-bit rows qualify.
    pub fn word(&self) -> Result<u32> {
        let width = self.width();
        if width != 32 {
            return Err(Error::WidthMismatch {
                mnemonic: self.mnemonic.clone(),
                width,
            });
        }
        // 32 resolved bits always fit
        Ok(self.value()? as u32)
    }
}

impl fmt::Display for Assembled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mnemonic, self.bit_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> SpecLine {
        SpecLine::parse(text).unwrap()
    }

    #[test]
    fn concatenates_in_field_order() {
        let w = assemble(&line("vadd.vv 31..26=0x00 vm vs2 vs1 14..12=0x0 vd 6..0=0x57"), Derivation::Encoding).unwrap();
        assert_eq!(w.to_string(), "vadd.vv 00000000000000000000000001010111");
        assert_eq!(w.width(), 32);
        assert_eq!(w.value().unwrap(), 0x57);
        assert_eq!(w.word().unwrap(), 0x0000_0057);
    }

    #[test]
    fn mask_of_range_and_rs1() {
        let w = assemble(&line("vx 31..26=0x2f rs1"), Derivation::Mask).unwrap();
        assert_eq!(w.bit_string(), "11111100000");
    }

    #[test]
    fn unresolved_operand_stays_as_text() {
        let w = assemble(&line("vodd 31..28=0x1 imm4"), Derivation::Encoding).unwrap();
        assert!(!w.is_resolved());
        assert_eq!(w.bit_string(), "0001imm4");
        assert!(matches!(w.value(), Err(Error::UnresolvedOperand { name, .. }) if name == "imm4"));
    }

    #[test]
    fn values_beyond_64_bits_overflow() {
        let wide = format!("vwide {}", "1".repeat(65));
        let w = assemble(&line(&wide), Derivation::Encoding).unwrap();
        assert_eq!(w.value(), Err(Error::Overflow { mnemonic: "vwide".into(), bits: 65 }));

        // leading zeros do not count against the working width
        let padded = format!("vpad {}1", "0".repeat(80));
        let w = assemble(&line(&padded), Derivation::Encoding).unwrap();
        assert_eq!(w.value().unwrap(), 1);
    }

    #[test]
    fn word_requires_32_bits() {
        let w = assemble(&line("vshort 6..0=0x57"), Derivation::Encoding).unwrap();
        assert_eq!(w.word(), Err(Error::WidthMismatch { mnemonic: "vshort".into(), width: 7 }));
    }
}
