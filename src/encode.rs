use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::field::{operand_width, range_width, Bits, Field};

/// Which word a table row is assembled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Derivation {
    /// Canonical instruction encoding with every operand zeroed.
    #[default]
    Encoding,
    /// Decode mask: opcode bits forced high, operand bits low.
    Mask,
}

/// A field after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Bits(Bits),
    /// Operand name with no known width, carried through as text.
    Unresolved(String),
}

impl Encoded {
    /// Number of characters this field contributes to the assembled string.
    pub fn width(&self) -> usize {
        match self {
            Encoded::Bits(bits) => bits.len(),
            Encoded::Unresolved(name) => name.len(),
        }
    }

    /// Forces every resolved bit high. Unresolved text is left alone.
    pub fn masked(self) -> Self {
        match self {
            Encoded::Bits(mut bits) => {
                bits.fill(true);
                Encoded::Bits(bits)
            }
            other => other,
        }
    }

    pub fn push_digits(&self, out: &mut String) {
        match self {
            Encoded::Bits(bits) => {
                out.extend(bits.iter().by_vals().map(|b| if b { '1' } else { '0' }));
            }
            Encoded::Unresolved(name) => out.push_str(name),
        }
    }

    pub fn digits(&self) -> String {
        let mut s = String::with_capacity(self.width());
        self.push_digits(&mut s);
        s
    }
}

/// Resolves one field to its canonical bits.
pub fn encode(field: &Field) -> Result<Encoded> {
    let encoded = match field {
        Field::BitRange { hi, lo, value } => {
            let width = range_width(*hi, *lo).ok_or_else(|| Error::MalformedField {
                token: field.to_string(),
            })?;
            if width < u64::BITS && value >> width != 0 {
                return Err(Error::MalformedRange {
                    token: field.to_string(),
                    value: *value,
                    width,
                });
            }
            let mut bits = Bits::with_capacity(width as usize);
            bits.extend((0..width).rev().map(|i| (value >> i) & 1 == 1));
            Encoded::Bits(bits)
        }
        Field::SingleBit { value } => Encoded::Bits(Bits::repeat(*value, 1)),
        Field::NamedOperand { name } => match operand_width(name) {
            Some(width) => Encoded::Bits(Bits::repeat(false, width as usize)),
            None => {
                warn!(operand = %name, "unknown operand name left unresolved");
                Encoded::Unresolved(name.clone())
            }
        },
        Field::Literal { bits } => Encoded::Bits(bits.clone()),
    };
    Ok(encoded)
}

/// Resolves one field for the given derivation. In mask mode every
/// constant or literal field comes out all ones; operands stay zero.
pub fn derive(field: &Field, derivation: Derivation) -> Result<Encoded> {
    let encoded = encode(field)?;
    Ok(match derivation {
        Derivation::Mask if !field.is_operand() => encoded.masked(),
        _ => encoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(token: &str) -> Result<String> {
        encode(&Field::classify(token)?).map(|e| e.digits())
    }

    #[test]
    fn bit_range_is_zero_padded() {
        assert_eq!(enc("31..26=0x0c").unwrap(), "001100");
        assert_eq!(enc("6..0=0x57").unwrap(), "1010111");
        assert_eq!(enc("14..12=0x0").unwrap(), "000");
        assert_eq!(enc("24..20=0").unwrap(), "00000");
    }

    #[test]
    fn bit_range_value_must_fit() {
        let err = enc("28..26=0x8").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedRange { token: "28..26=0x8".into(), value: 8, width: 3 }
        );
    }

    #[test]
    fn oversized_range_is_an_error() {
        let field = Field::BitRange { hi: u32::MAX, lo: 0, value: 0 };
        assert!(matches!(encode(&field), Err(Error::MalformedField { .. })));
        let field = Field::BitRange { hi: 3, lo: 7, value: 0 };
        assert!(matches!(encode(&field), Err(Error::MalformedField { .. })));
    }

    #[test]
    fn single_bit_and_operands() {
        assert_eq!(enc("30=1").unwrap(), "1");
        assert_eq!(enc("31=0").unwrap(), "0");
        assert_eq!(enc("nf").unwrap(), "000");
        assert_eq!(enc("zimm11").unwrap(), "00000000000");
        assert_eq!(enc("funct9").unwrap(), "funct9");
    }

    #[test]
    fn mask_forces_constants_high_and_operands_low() {
        let derive_str = |t: &str| derive(&Field::classify(t).unwrap(), Derivation::Mask).unwrap().digits();
        assert_eq!(derive_str("31..26=0x00"), "111111");
        assert_eq!(derive_str("25=0"), "1");
        assert_eq!(derive_str("0101"), "1111");
        assert_eq!(derive_str("rs1"), "00000");
        assert_eq!(derive_str("imm"), "imm");
    }

    #[test]
    fn masking_twice_changes_nothing() {
        let once = derive(&Field::classify("14..12=0x5").unwrap(), Derivation::Mask).unwrap();
        assert_eq!(once.clone().masked(), once);
    }
}
