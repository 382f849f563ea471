// src/main.rs
use clap::{Args, Parser, Subcommand};
use huffpack::driver::{self, CompressOptions, Report};
use huffpack::logger;
use huffpack::tree::CodeTable;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "huffpack", version)]
#[command(about = "Static Huffman file compressor.", long_about = None)]
struct Cli {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Verbosity {
    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a plain file
    Compress {
        input: PathBuf,
        /// Defaults to <INPUT>.huff
        output: Option<PathBuf>,
        /// Decode in memory and compare digests before writing
        #[arg(long)]
        verify: bool,
    },
    /// Decompress an archive
    Decompress {
        input: PathBuf,
        /// Defaults to <INPUT> without .huff, or <INPUT>.out
        output: Option<PathBuf>,
    },
    /// Show an archive's header and code table
    Inspect { archive: PathBuf },
    /// Show the code table a plain file would get
    Codes { input: PathBuf },
    #[command(external_subcommand)]
    Other(Vec<String>),
}

fn print_report(report: &Report) {
    println!(
        "  {} plain bytes, {} archive bytes ({:.1}%)",
        report.plain_bytes,
        report.archive_bytes,
        report.ratio() * 100.0
    );
    println!(
        "  {} symbols, {} payload bits, sha256 {}",
        report.distinct_symbols, report.payload_bits, report.digest
    );
}

fn print_codes(codes: &CodeTable, counts: impl Fn(u8) -> u64) {
    for (symbol, code) in codes.iter() {
        let shown = if symbol.is_ascii_graphic() {
            format!("'{}'", symbol as char)
        } else {
            format!("{symbol:#04x}")
        };
        println!("  {shown:>6} {:>10}  {code}", counts(symbol));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbosity.verbose, cli.verbosity.quiet))?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Compress {
            input,
            output,
            verify,
        } => {
            let output = output.unwrap_or_else(|| driver::compressed_path(&input));
            let report = driver::compress_file(&input, &output, CompressOptions { verify })?;
            println!("File successfully compressed: {}", output.display());
            print_report(&report);
        }
        Commands::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| driver::restored_path(&input));
            let report = driver::decompress_file(&input, &output)?;
            println!("File successfully decompressed: {}", output.display());
            print_report(&report);
        }
        Commands::Inspect { archive } => {
            let inspection = driver::inspect_file(&archive)?;
            let header = &inspection.header;
            println!("{}", archive.display());
            println!(
                "  {} symbols, {} payload bits, header {} bytes, packed {} of {} bytes",
                header.table.len(),
                header.bit_len,
                inspection.header_bytes,
                inspection.packed_bytes,
                header.packed_len()
            );
            if !inspection.is_complete() {
                println!("  packed region is truncated");
            }
            print_codes(&inspection.codes, |s| header.table.get(s).unwrap_or(0));
        }
        Commands::Codes { input } => {
            let (table, codes) = driver::code_table_for(&input)?;
            println!(
                "{}: {} symbols, {} payload bits",
                input.display(),
                table.len(),
                codes.encoded_bits(&table)
            );
            print_codes(&codes, |s| table.get(s).unwrap_or(0));
        }
        Commands::Other(args) => {
            tracing::debug!(?args, "unknown command");
            println!("Invalid option. Please choose 'compress' or 'decompress'");
        }
    }

    Ok(())
}
