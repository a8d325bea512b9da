use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cram_arith::{ArithCodec, BlockCodec, CodecConfig, LegacyArithCodec, Order, Result};

#[derive(Parser, Debug)]
#[command(name = "cram-arith")]
#[command(about = "Compress or decompress a single CRAM arith-coded block")]
#[command(version)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// Context order (0 or 1)
    #[arg(short = 'O', long, default_value = "0")]
    order: u8,

    /// Run-length escape repeated bytes
    #[arg(long)]
    rle: bool,

    /// Store the block uncompressed
    #[arg(long)]
    cat: bool,

    /// Omit the length from the block header
    #[arg(long)]
    nosize: bool,

    /// Uncompressed length of a block written with --nosize
    #[arg(long)]
    size: Option<usize>,

    /// Use the legacy fixed-header stream layout
    #[arg(long, conflicts_with_all = ["rle", "cat", "nosize"])]
    legacy: bool,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let order = Order::from_level(args.order);

    let mut codec: Box<dyn BlockCodec> = if args.legacy {
        Box::new(LegacyArithCodec::new(order))
    } else {
        Box::new(ArithCodec::new(CodecConfig {
            order,
            rle: args.rle,
            cat: args.cat,
            external_size: args.nosize,
        }))
    };

    let input = read_input(&args.input)?;

    let start = std::time::Instant::now();
    let output = if args.decompress {
        codec.decompress(&input, args.size)?
    } else {
        codec.compress(&input)?
    };
    let elapsed = start.elapsed();

    write_output(&args.output, &output)?;

    if args.verbose {
        if args.decompress {
            eprintln!("Decompress {} => {}", input.len(), output.len());
        } else {
            eprintln!("Compress order {}, {} => {}", order.level(), input.len(), output.len());
        }
        eprintln!("  Time:             {:.2?}", elapsed);
        eprintln!(
            "  Throughput:       {:.1} MB/s",
            input.len() as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
    }

    Ok(())
}

fn read_input(path: &PathBuf) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    if path.to_str() == Some("-") {
        io::stdin().lock().read_to_end(&mut data)?;
    } else {
        BufReader::new(File::open(path)?).read_to_end(&mut data)?;
    }
    Ok(data)
}

fn write_output(path: &PathBuf, data: &[u8]) -> Result<()> {
    if path.to_str() == Some("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
    } else {
        let mut output = BufWriter::new(File::create(path)?);
        output.write_all(data)?;
        output.flush()?;
    }
    Ok(())
}
