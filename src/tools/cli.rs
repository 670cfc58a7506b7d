use clap::Parser;
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};
use std::{fmt::Display, fmt::Formatter};

/// Extension added to compressed files.
pub const EXTENSION: &str = "huff";
/// Extension used for decompressed files whose name does not end in `.huff`.
pub const OUT_EXTENSION: &str = "out";

/// Verbosity of user information
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Errors,
            2 => Verbosity::Warnings,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A huffman coding file compressor",
    long_about = "
    Compresses each file with a single huffman table built from the file's own byte
    frequencies. The table is stored at the front of the compressed file, followed by
    the packed codes.

    Compressed files get the extension .huff. Decompressing strips it again (or adds .out
    if the name does not end in .huff)."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    files: Vec<String>,

    /// Perform compression on the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress", conflicts_with = "compress")]
    decompress: bool,

    /// Compress and decompress in memory and compare with the original. Writes nothing.
    #[clap(short = 't', long = "test", conflicts_with_all = &["compress", "decompress"])]
    test: bool,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Output file (only with a single input file)
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Sets verbosity. 0 is silent, 3 reports progress, 5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// All user settable options that control program behavior.
#[derive(Debug)]
pub struct HuffOpts {
    /// Files to read for input
    pub files: Vec<PathBuf>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Explicit output path, only valid with one input file
    pub output: Option<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            op_mode: Mode::Zip,
            output: None,
            force_overwrite: false,
            verbose: Verbosity::Info,
        }
    }

    /// Copy the parsed arguments into our options.
    pub fn from_args(args: Args) -> Result<Self, String> {
        let mut opts = HuffOpts::new();
        opts.files = args.files.iter().map(PathBuf::from).collect();
        if args.decompress {
            opts.op_mode = Mode::Unzip
        };
        if args.test {
            opts.op_mode = Mode::Test
        };
        opts.force_overwrite = args.force;
        opts.verbose = Verbosity::from_level(args.v);
        if let Some(output) = args.output {
            if opts.files.len() != 1 {
                return Err("--output needs exactly one input file".to_string());
            }
            opts.output = Some(PathBuf::from(output));
        }
        Ok(opts)
    }

    /// Where the result for `input` goes.
    pub fn output_for(&self, input: &Path) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        match self.op_mode {
            Mode::Zip | Mode::Test => {
                let mut name = input.as_os_str().to_owned();
                name.push(".");
                name.push(EXTENSION);
                PathBuf::from(name)
            }
            Mode::Unzip => {
                if input.extension().map_or(false, |e| e == EXTENSION) {
                    input.with_extension("")
                } else {
                    let mut name = input.as_os_str().to_owned();
                    name.push(".");
                    name.push(OUT_EXTENSION);
                    PathBuf::from(name)
                }
            }
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the command line, set the log level, and report what we are going to do.
pub fn huffopts_init() -> HuffOpts {
    let args = Args::parse();
    let opts = match HuffOpts::from_args(args) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("huffzip: {}", msg);
            std::process::exit(1);
        }
    };

    // Set the log level
    log::set_max_level(opts.verbose.level_filter());

    info!("---- Huffzip Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Processing {} file(s)", opts.files.len());
    if let Some(output) = &opts.output {
        info!("Writing output to {}", output.display());
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    info!("---- Huffzip Initialization End ----\n");
    opts
}
