use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rvv_opcodes::{Base, Decoder, InstCounter, RenderConfig};
use rvv_opcodes_cli::{
    decode_table, format_row, load_table, load_words, parse_u32, render_rows, report_failures,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "RISC-V vector opcode and decode-mask generator", long_about = None)]
struct Cli {
    /// Opcode table in opcodes-rvv format
    #[arg(long, value_name = "FILE", default_value = "opcodes-rvv")]
    table: PathBuf,
    /// Only use rows whose mnemonic starts with this prefix
    #[arg(long, default_value = "v")]
    filter: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print "<mnemonic> <opcode>" for every selected row
    Encode {
        /// Base of the printed opcode
        #[arg(long, value_enum, default_value_t = BaseArg::Binary)]
        base: BaseArg,
        /// Omit the 0b/0x prefix
        #[arg(long)]
        no_prefix: bool,
        /// Print decode masks (opcode bits set, operand bits cleared) instead of opcodes
        #[arg(long)]
        vector_mask: bool,
        /// Lead each row with its assembled width in bits (text output only;
        /// JSON always carries the width)
        #[arg(long)]
        count_bits: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Match instruction words (hex or dec) against the table
    Decode {
        #[arg(value_name = "WORD", required = true)]
        words: Vec<String>,
    },
    /// Histogram of vector instructions in a raw little-endian binary
    Count {
        #[arg(value_name = "BINFILE")]
        input: PathBuf,
        /// Skip N bytes at start of file
        #[arg(long, default_value_t = 0usize)]
        skip: usize,
        /// Limit bytes read (default: to EOF after --skip)
        #[arg(long)]
        len: Option<usize>,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BaseArg { Binary, Decimal, Hex }

impl From<BaseArg> for Base {
    fn from(b: BaseArg) -> Self {
        match b {
            BaseArg::Binary => Base::Binary,
            BaseArg::Decimal => Base::Decimal,
            BaseArg::Hex => Base::Hex,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rows = load_table(&cli.table, &cli.filter)?;

    match cli.cmd {
        Command::Encode { base, no_prefix, vector_mask, count_bits, format, out } => {
            let cfg = RenderConfig { base: base.into(), no_prefix, mask_mode: vector_mask };
            let batch = render_rows(&rows, &cfg);
            report_failures(&mut std::io::stderr(), &cli.table, &batch.failures)?;

            let mut buf = String::new();
            match format {
                OutputFormat::Text => {
                    for r in &batch.rendered {
                        let _ = writeln!(buf, "{}", format_row(r, count_bits));
                    }
                }
                OutputFormat::Json => {
                    buf = serde_json::to_string_pretty(&batch.rendered)?;
                    buf.push('\n');
                }
            }
            if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }

            anyhow::ensure!(batch.failures.is_empty(), "{} row(s) failed", batch.failures.len());
        }
        Command::Decode { words } => {
            let (dec, failures) = decode_table(&rows);
            report_failures(&mut std::io::stderr(), &cli.table, &failures)?;
            for w in words {
                let raw = parse_u32(&w)?;
                match dec.decode(raw) {
                    Some(d) => println!("{raw:#010x}: {} (operands {:#010x})", d.mnemonic, d.operands),
                    None => println!("{raw:#010x}: <unknown>"),
                }
            }

            anyhow::ensure!(failures.is_empty(), "{} row(s) failed", failures.len());
        }
        Command::Count { input, skip, len, format } => {
            let (dec, failures) = decode_table(&rows);
            report_failures(&mut std::io::stderr(), &cli.table, &failures)?;
            let words = load_words(&input, skip, len)?;
            let mut counter = InstCounter::new(&dec);
            for w in words {
                counter.record(w);
            }
            let report = counter.report();
            match format {
                OutputFormat::Text => {
                    println!("total   : {}", report.total);
                    println!("unknown : {}", report.unknown);
                    for e in &report.entries {
                        println!("{:>10}  {}", e.count, e.mnemonic);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }

            anyhow::ensure!(failures.is_empty(), "{} row(s) failed", failures.len());
        }
    }

    Ok(())
}
