pub mod assemble;
pub mod counter;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod field;
pub mod line;
pub mod render;

pub mod isa {
    pub mod rvv; // RISC-V "V" extension, opcodes-rvv table
}

pub use assemble::{assemble, Assembled};
pub use counter::{CountReport, InstCounter};
pub use decoder::{Decoded, Decoder};
pub use encode::{Derivation, Encoded};
pub use error::{Error, Result};
pub use field::Field;
pub use line::SpecLine;
pub use render::{render, render_line, Base, RenderConfig, Rendered};
