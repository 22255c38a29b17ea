use std::fmt;

use bitvec::prelude::*;
use tracing::trace;

use crate::error::{Error, Result};

/// Bit storage for resolved fields, most significant bit first.
pub type Bits = BitVec<u32, Msb0>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandDesc {
    pub name: &'static str,
    pub width: u32,
}

/// Operand placeholders known to the `opcodes-rvv` table.
pub const OPERANDS: &[OperandDesc] = &[
    OperandDesc { name: "nf", width: 3 },
    OperandDesc { name: "rd", width: 5 },
    OperandDesc { name: "rs1", width: 5 },
    OperandDesc { name: "rs2", width: 5 },
    OperandDesc { name: "simm5", width: 5 },
    OperandDesc { name: "vd", width: 5 },
    OperandDesc { name: "vm", width: 1 },
    OperandDesc { name: "vs1", width: 5 },
    OperandDesc { name: "vs2", width: 5 },
    OperandDesc { name: "vs3", width: 5 },
    OperandDesc { name: "wd", width: 1 },
    OperandDesc { name: "zimm", width: 5 },
    OperandDesc { name: "zimm10", width: 10 },
    OperandDesc { name: "zimm11", width: 11 },
];

pub fn operand_width(name: &str) -> Option<u32> {
    OPERANDS.iter().find(|d| d.name == name).map(|d| d.width)
}

/// Width of `hi..lo`, `None` when reversed or wider than the 64-bit working width.
pub fn range_width(hi: u32, lo: u32) -> Option<u32> {
    hi.checked_sub(lo)
        .and_then(|d| d.checked_add(1))
        .filter(|&w| w <= u64::BITS)
}

/// One classified token of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `hi..lo=<hex>`: bits `hi` down to `lo` fixed to `value`.
    BitRange { hi: u32, lo: u32, value: u64 },
    /// `<n>=0` or `<n>=1`.
    SingleBit { value: bool },
    /// Register or immediate slot such as `vs2` or `zimm11`.
    NamedOperand { name: String },
    /// Already-resolved run of binary digits.
    Literal { bits: Bits },
}

impl Field {
    /// Classifies a raw token. Bit ranges are tried before single bits,
    /// single bits before literals, and literals before operand names.
    pub fn classify(token: &str) -> Result<Self> {
        let malformed = || Error::MalformedField { token: token.to_string() };

        let field = if let Some((hi, lo, value)) = split_bit_range(token) {
            let hi: u32 = hi.parse().map_err(|_| malformed())?;
            let lo: u32 = lo.parse().map_err(|_| malformed())?;
            range_width(hi, lo).ok_or_else(malformed)?;
            let value = parse_hex(value).ok_or_else(malformed)?;
            Field::BitRange { hi, lo, value }
        } else if let Some(value) = single_bit_value(token) {
            Field::SingleBit { value }
        } else if is_binary(token) {
            Field::Literal { bits: token.chars().map(|c| c == '1').collect() }
        } else if token.starts_with(|c: char| c.is_ascii_lowercase()) {
            Field::NamedOperand { name: token.to_string() }
        } else {
            return Err(malformed());
        };

        trace!(token, ?field, "classified");
        Ok(field)
    }

    /// Width in bits, `None` for an operand name missing from [`OPERANDS`]
    /// or a bit range that [`range_width`] rejects.
    pub fn width(&self) -> Option<u32> {
        match self {
            Field::BitRange { hi, lo, .. } => range_width(*hi, *lo),
            Field::SingleBit { .. } => Some(1),
            Field::NamedOperand { name } => operand_width(name),
            Field::Literal { bits } => Some(bits.len() as u32),
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Field::NamedOperand { .. })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::BitRange { hi, lo, value } => write!(f, "{hi}..{lo}={value:#x}"),
            Field::SingleBit { value } => write!(f, "{}", u8::from(*value)),
            Field::NamedOperand { name } => f.write_str(name),
            Field::Literal { bits } => {
                for bit in bits.iter().by_vals() {
                    f.write_str(if bit { "1" } else { "0" })?;
                }
                Ok(())
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_binary(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b == b'0' || b == b'1')
}

fn split_bit_range(token: &str) -> Option<(&str, &str, &str)> {
    let (range, value) = token.split_once('=')?;
    let (hi, lo) = range.split_once("..")?;
    (is_digits(hi) && is_digits(lo)).then_some((hi, lo, value))
}

fn single_bit_value(token: &str) -> Option<bool> {
    let (position, value) = token.rsplit_once('=')?;
    if !position.ends_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    match value {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

fn parse_hex(s: &str) -> Option<u64> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
