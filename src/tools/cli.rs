use clap::Parser;
use log::{info, warn};
use std::{fmt::Display, fmt::Formatter};

use super::char_codec::{CharCodec, Latin1Codec, Utf8Codec};

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Map the numeric -v level (0-5) to a verbosity.
    pub fn from_level(v: u8) -> Self {
        match v {
            0 => Verbosity::Quiet,
            1 => Verbosity::Errors,
            2 => Verbosity::Warnings,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Off,
            Verbosity::Errors => log::LevelFilter::Error,
            Verbosity::Warnings => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How leaf characters are stored in the tree description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Utf8,
    Latin1,
}
impl Codec {
    pub fn char_codec(&self) -> &'static dyn CharCodec {
        match self {
            Codec::Utf8 => &Utf8Codec,
            Codec::Latin1 => &Latin1Codec,
        }
    }
}
impl Display for Codec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub const DEFAULT_CANDIDATES: [usize; 4] = [1, 2, 3, 4];

#[derive(Debug, Clone)]
pub struct HcOpts {
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Fixed block length. None lets the optimizer (or quick mode) choose.
    pub block_size: Option<usize>,
    /// Skip the search and use a block length of 1
    pub quick: bool,
    /// Block lengths the optimizer tries
    pub candidates: Vec<usize>,
    /// Character codec for leaf symbols
    pub codec: Codec,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Decode the output again after compressing and compare with the input
    pub check: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HcOpts {
    pub fn new() -> Self {
        Self {
            op_mode: Mode::Zip,
            files: vec![],
            block_size: None,
            quick: false,
            candidates: DEFAULT_CANDIDATES.to_vec(),
            codec: Codec::Utf8,
            force_overwrite: false,
            check: false,
            verbose: Verbosity::Info,
        }
    }
}

impl Default for HcOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Block Huffman text compressor",
    long_about = "
    Compresses text with a static Huffman code over fixed length blocks of characters.
    Unless told otherwise, several block lengths are tried and the one giving the
    smallest file is kept. Compressed files get the .hc extension."
)]
pub struct Args {
    /// Files to process
    #[clap()]
    files: Vec<String>,

    /// Perform compression on the input files (default)
    #[clap(short = 'z', long = "compress", conflicts_with_all = &["decompress", "test"])]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress", conflicts_with = "test")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Use this block length instead of searching for the best one
    #[clap(short = 'b', long = "block-size")]
    block_size: Option<usize>,

    /// Encode more quickly with a block length of 1, possibly at cost of file size
    #[clap(long = "quick")]
    quick: bool,

    /// Comma separated block lengths to try when searching
    #[clap(long = "candidates", value_delimiter = ',')]
    candidates: Vec<usize>,

    /// Store leaf characters as Latin-1 instead of UTF-8
    #[clap(long = "latin1")]
    latin1: bool,

    ///Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Decode the compressed file again and compare it with the input
    #[clap(long = "check")]
    check: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Put command line information from CLAP into our internal structure.
pub fn hcopts_from_args(args: Args) -> HcOpts {
    let mut opts = HcOpts::new();
    opts.files = args.files;
    if args.decompress {
        opts.op_mode = Mode::Unzip
    };
    if args.test {
        opts.op_mode = Mode::Test
    };
    opts.block_size = args.block_size;
    opts.quick = args.quick;
    if !args.candidates.is_empty() {
        opts.candidates = args.candidates;
    }
    if args.latin1 {
        opts.codec = Codec::Latin1
    };
    opts.force_overwrite = args.force;
    opts.check = args.check;
    opts.verbose = Verbosity::from_level(args.v);
    opts
}

/// Parse the command line, set the log level and report the settings.
pub fn hcopts_init() -> HcOpts {
    let opts = hcopts_from_args(Args::parse());

    // Set the log level
    log::set_max_level(opts.verbose.level_filter());

    // Below we report initialization status to the user
    info!("---- Initialization Start ----",);
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    if opts.files.is_empty() {
        warn!("No input files given")
    }
    match opts.block_size {
        Some(b) => info!("Block size fixed at {}", b),
        None if opts.quick => info!("Quick mode, block size 1"),
        None => info!("Searching block sizes {:?}", opts.candidates),
    }
    info!("Leaf characters stored as {}", opts.codec);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    info!("---- Initialization End ----\n");
    opts
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> HcOpts {
        hcopts_from_args(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn defaults_test() {
        let opts = parse(&["blockhuff", "book.txt"]);
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.files, vec!["book.txt"]);
        assert_eq!(opts.block_size, None);
        assert_eq!(opts.candidates, DEFAULT_CANDIDATES.to_vec());
        assert_eq!(opts.codec, Codec::Utf8);
        assert_eq!(opts.verbose, Verbosity::Info);
        assert!(!opts.quick && !opts.check && !opts.force_overwrite);
    }

    #[test]
    fn flags_test() {
        let opts = parse(&[
            "blockhuff", "a.hc", "b.hc", "-d", "-f", "-v", "5", "--latin1",
        ]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert_eq!(opts.files, vec!["a.hc", "b.hc"]);
        assert!(opts.force_overwrite);
        assert_eq!(opts.verbose, Verbosity::Trace);
        assert_eq!(opts.codec, Codec::Latin1);
    }

    #[test]
    fn block_choice_test() {
        let opts = parse(&["blockhuff", "-b", "3", "x.txt"]);
        assert_eq!(opts.block_size, Some(3));
        let opts = parse(&["blockhuff", "x.txt", "--candidates", "2,5,8"]);
        assert_eq!(opts.candidates, vec![2, 5, 8]);
        let opts = parse(&["blockhuff", "--quick", "--check", "x.txt"]);
        assert!(opts.quick && opts.check);
    }

    #[test]
    fn conflicting_modes_test() {
        assert!(Args::try_parse_from(["blockhuff", "-z", "-d", "x"]).is_err());
        assert!(Args::try_parse_from(["blockhuff", "-d", "-t", "x"]).is_err());
    }
}
