//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, BufWriter},
    path::Path,
};

use blockhuff::tools::cli::{hcopts_init, HcOpts, Mode};
use blockhuff::{compress, decode, decompress, verify, HcError, Result, Stats};

use log::{error, info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const EXTENSION: &str = ".hc";

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace
    if TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Could not start the terminal logger.");
    }

    let options = hcopts_init();

    //----- Figure how what we need to do and go do it
    let mut failed = false;
    for name in &options.files {
        let result = match options.op_mode {
            Mode::Zip => zip_file(name, &options),
            Mode::Unzip => unzip_file(name, &options),
            Mode::Test => test_file(name, &options),
        };
        if let Err(e) = result {
            error!("{}: {}", name, e);
            failed = true;
        }
    }

    info!("Done.\n");
    if failed {
        std::process::exit(1);
    }
}

/// Compress `name` into `name.hc`.
fn zip_file(name: &str, opts: &HcOpts) -> Result<()> {
    let fin = open_source(name)?;
    let out_name = format!("{}{}", name, EXTENSION);
    let fout = create_sink(&out_name, opts.force_overwrite)?;

    let stats = compress(BufReader::new(fin), BufWriter::new(fout), opts)
        .and_then(|stats| {
            if opts.check {
                check(name, &out_name, opts)?;
            }
            Ok(stats)
        })
        .map_err(|e| discard(&out_name, e))?;
    report(name, &stats);
    Ok(())
}

/// Decompress `name.hc` into `name`.
fn unzip_file(name: &str, opts: &HcOpts) -> Result<()> {
    let out_name = match name.strip_suffix(EXTENSION) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => {
            warn!("{} does not end in {}, writing {}.out", name, EXTENSION, name);
            format!("{}.out", name)
        }
    };
    let fin = open_source(name)?;
    let fout = create_sink(&out_name, opts.force_overwrite)?;
    let stats = decompress(BufReader::new(fin), BufWriter::new(fout), opts)
        .map_err(|e| discard(&out_name, e))?;
    info!(
        "{} decoded to {} ({} bytes, block length {}).",
        name, out_name, stats.output_bytes, stats.block_len
    );
    Ok(())
}

/// Decode `name` in memory and throw the text away.
fn test_file(name: &str, opts: &HcOpts) -> Result<()> {
    let stats = decompress(BufReader::new(open_source(name)?), io::sink(), opts)?;
    info!("{}: ok ({} bytes of text).", name, stats.output_bytes);
    Ok(())
}

/// Decode the freshly written artifact and compare it with the input file.
fn check(name: &str, out_name: &str, opts: &HcOpts) -> Result<()> {
    let original = fs::read(name)?;
    let encoded = fs::read(out_name)?;
    let decoded = decode(&encoded, opts.codec.char_codec())?;
    verify(&original, decoded.as_bytes())?;
    info!("File encoded/decoded successfully.");
    Ok(())
}

fn report(name: &str, stats: &Stats) {
    info!("{} encoded with block length {}.", name, stats.block_len);
    info!("Original size: {}", stats.input_bytes);
    info!("Encoded size: {}", stats.output_bytes);
    info!("Ratio: {:.4}", stats.ratio());
}

fn open_source(name: &str) -> Result<File> {
    File::open(name).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HcError::MissingSource(name.to_string()),
        _ => HcError::Io(e),
    })
}

fn create_sink(name: &str, force: bool) -> Result<File> {
    if !force && Path::new(name).exists() {
        return Err(HcError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists, use -f to overwrite", name),
        )));
    }
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(name)?)
}

/// Remove a half written output file and pass the error on.
fn discard(out_name: &str, e: HcError) -> HcError {
    if let Err(rm) = fs::remove_file(out_name) {
        warn!("Could not remove {}: {}", out_name, rm);
    }
    e
}
