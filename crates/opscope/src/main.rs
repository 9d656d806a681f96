//! opscope - x86-64 machine-code disassembler
//!
//! Usage:
//!   opscope <file>               Disassemble a raw code file
//!   opscope --hex "48 89 d8"     Disassemble bytes given on the command line

use anyhow::{bail, Context, Result};
use clap::Parser;
use opscope_disasm::{create, DisasmOptions};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "opscope")]
#[command(about = "x86-64 machine-code disassembler", long_about = None)]
struct Cli {
    /// Raw machine-code file to disassemble
    file: Option<PathBuf>,

    /// Bytes to disassemble, as hex digits (spaces allowed)
    #[arg(long, conflicts_with = "file")]
    hex: Option<String>,

    /// Target architecture
    #[arg(short, long, default_value = "x64")]
    arch: String,

    /// Keep instructions decoded before a truncated trailing instruction
    /// instead of failing
    #[arg(long)]
    swallow: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let bytes = match (&cli.file, &cli.hex) {
        (Some(path), None) => fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, Some(hex)) => parse_hex(hex)?,
        _ => bail!("give either a file or --hex bytes"),
    };

    let disasm = create(&cli.arch, DisasmOptions { swallow: cli.swallow })
        .with_context(|| format!("no decoder for architecture {:?}", cli.arch))?;
    let instructions = disasm.disasm(&bytes).context("decode failed")?;

    for ins in &instructions {
        println!("{:#010x}  {}", ins.offset, ins);
    }

    Ok(())
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("bad hex byte {:?}", &digits[i..i + 2]))
        })
        .collect()
}
