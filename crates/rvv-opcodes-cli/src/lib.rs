pub mod image;
pub mod table;

pub use image::load_words;
pub use table::{load_table, select_lines, TableLine};

use std::io::Write;
use std::path::Path;

use rvv_opcodes::isa::rvv::RvvDecoder;
use rvv_opcodes::{render_line, RenderConfig, Rendered};

/// Result of rendering a batch of table rows. Rows fail independently.
#[derive(Debug, Default)]
pub struct Batch {
    pub rendered: Vec<Rendered>,
    pub failures: Vec<(usize, rvv_opcodes::Error)>,
}

pub fn render_rows(rows: &[TableLine], cfg: &RenderConfig) -> Batch {
    let mut batch = Batch::default();
    for row in rows {
        match render_line(&row.text, cfg) {
            Ok(r) => {
                if r.width != 32 {
                    tracing::warn!(line = row.number, mnemonic = %r.mnemonic, width = r.width, "row is not 32 bits wide");
                }
                batch.rendered.push(r);
            }
            Err(e) => batch.failures.push((row.number, e)),
        }
    }
    batch
}

/// Builds the decode table from the selected rows. Failures carry the
/// table line number of the rejected row, as in [`Batch::failures`].
pub fn decode_table(rows: &[TableLine]) -> (RvvDecoder, Vec<(usize, rvv_opcodes::Error)>) {
    let (dec, errors) = RvvDecoder::from_lines(rows.iter().map(|r| r.text.as_str()));
    let failures = errors
        .into_iter()
        .map(|e| (rows[e.index].number, e.error))
        .collect();
    (dec, failures)
}

/// Writes one `<table>:<line>: <error>` line per failed row.
pub fn report_failures<W: Write>(
    w: &mut W,
    table: &Path,
    failures: &[(usize, rvv_opcodes::Error)],
) -> std::io::Result<()> {
    for (line, err) in failures {
        writeln!(w, "{}:{line}: {err}", table.display())?;
    }
    Ok(())
}

/// Text form of one row, optionally led by its assembled width.
pub fn format_row(r: &Rendered, count_bits: bool) -> String {
    if count_bits {
        format!("{} {}", r.width, r)
    } else {
        r.to_string()
    }
}

pub fn parse_u32(s: &str) -> anyhow::Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}
