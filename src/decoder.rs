use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decoded<'a> {
    pub mnemonic: &'a str,
    pub raw: u32,
    /// Bits of `raw` outside the mask, i.e. the operand fields.
    pub operands: u32,
}

pub trait Decoder {
    fn decode(&self, raw32: u32) -> Option<Decoded<'_>>;
}
