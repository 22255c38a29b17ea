use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assemble::{assemble, Assembled};
use crate::encode::Derivation;
use crate::error::Result;
use crate::line::SpecLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    #[default]
    Binary,
    Decimal,
    Hex,
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Base::Binary => "binary",
            Base::Decimal => "decimal",
            Base::Hex => "hex",
        })
    }
}

impl FromStr for Base {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Base::Binary),
            "decimal" => Ok(Base::Decimal),
            "hex" => Ok(Base::Hex),
            other => Err(format!("unknown base `{other}` (expected binary, decimal or hex)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub base: Base,
    /// Drop the `0b`/`0x` prefix.
    pub no_prefix: bool,
    /// Emit decode masks instead of encodings.
    pub mask_mode: bool,
}

impl RenderConfig {
    pub fn derivation(&self) -> Derivation {
        if self.mask_mode {
            Derivation::Mask
        } else {
            Derivation::Encoding
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub mnemonic: String,
    pub value: String,
    pub width: usize,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mnemonic, self.value)
    }
}

pub fn render(word: &Assembled, cfg: &RenderConfig) -> Result<Rendered> {
    let prefix = |p: &'static str| if cfg.no_prefix { "" } else { p };
    let value = match cfg.base {
        Base::Binary => format!("{}{}", prefix("0b"), word.bit_string()),
        Base::Decimal => word.value()?.to_string(),
        Base::Hex => format!("{}{:08x}", prefix("0x"), word.value()?),
    };
    Ok(Rendered {
        mnemonic: word.mnemonic.clone(),
        value,
        width: word.width(),
    })
}

/// Full pipeline for one table row: parse, resolve, assemble and render.
pub fn render_line(text: &str, cfg: &RenderConfig) -> Result<Rendered> {
    let line = SpecLine::parse(text)?;
    let word = assemble(&line, cfg.derivation())?;
    render(&word, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const VSETVLI: &str = "vsetvli 31=0 zimm11 rs1 14..12=0x7 rd 6..0=0x57";

    fn cfg(base: Base, no_prefix: bool, mask_mode: bool) -> RenderConfig {
        RenderConfig { base, no_prefix, mask_mode }
    }

    #[test]
    fn binary_with_and_without_prefix() {
        let r = render_line(VSETVLI, &cfg(Base::Binary, false, false)).unwrap();
        assert_eq!(r.to_string(), "vsetvli 0b00000000000000000111000001010111");
        let r = render_line(VSETVLI, &cfg(Base::Binary, true, false)).unwrap();
        assert_eq!(r.value, "00000000000000000111000001010111");
    }

    #[test]
    fn decimal_has_no_padding_or_prefix() {
        let r = render_line(VSETVLI, &cfg(Base::Decimal, false, false)).unwrap();
        assert_eq!(r.value, (0x7057u32).to_string());
    }

    #[test]
    fn hex_is_eight_lowercase_digits() {
        let r = render_line(VSETVLI, &cfg(Base::Hex, false, true)).unwrap();
        assert_eq!(r.to_string(), "vsetvli 0x8000707f");
        let r = render_line(VSETVLI, &cfg(Base::Hex, true, false)).unwrap();
        assert_eq!(r.value, "00007057");
    }

    #[test]
    fn unresolved_operand_only_renders_in_binary() {
        let text = "vodd 31..28=0x1 imm4";
        assert_eq!(render_line(text, &cfg(Base::Binary, false, false)).unwrap().value, "0b0001imm4");
        assert!(matches!(
            render_line(text, &cfg(Base::Hex, false, false)),
            Err(Error::UnresolvedOperand { .. })
        ));
    }

    #[test]
    fn base_names_round_trip() {
        for base in [Base::Binary, Base::Decimal, Base::Hex] {
            assert_eq!(base.to_string().parse::<Base>(), Ok(base));
        }
        assert!("octal".parse::<Base>().is_err());
    }
}
