use std::str::FromStr;

use crate::error::{Error, Result};
use crate::field::Field;

/// One row of the opcode table: mnemonic followed by its fields in
/// most-significant-first order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLine {
    pub mnemonic: String,
    pub fields: Vec<Field>,
}

impl SpecLine {
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let mnemonic = tokens.next().ok_or(Error::EmptyLine)?.to_string();
        let fields = tokens.map(Field::classify).collect::<Result<Vec<_>>>()?;
        Ok(Self { mnemonic, fields })
    }

    /// Sum of the known field widths, `None` if any operand is unknown.
    pub fn width(&self) -> Option<u32> {
        self.fields.iter().map(Field::width).sum()
    }
}

impl FromStr for SpecLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
