//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::path::Path;

use huffzip::tools::cli::{huffopts_init, HuffOpts, Mode};
use huffzip::{compress, compress_bytes, decompress, decompress_bytes, Error, Outcome};

use log::{error, info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The real level is set by
    // huffopts_init() from the command line.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("huffzip: could not start logging: {}", e);
    }

    let opts = huffopts_init();

    let mut failures = 0;
    for file in &opts.files {
        //----- Figure how what we need to do and go do it
        let result = match opts.op_mode {
            Mode::Zip => zip(&opts, file),
            Mode::Unzip => unzip(&opts, file),
            Mode::Test => test(file),
        };
        if let Err(e) = result {
            error!("{}: {}", file.display(), e);
            failures += 1;
        }
    }

    info!("Done.\n");
    if failures > 0 {
        std::process::exit(1);
    }
}

/// Refuse to clobber an existing output unless forced.
fn check_output(opts: &HuffOpts, output: &Path) -> Result<(), Error> {
    if output.exists() && !opts.force_overwrite {
        return Err(Error::at(
            huffzip::error::IoOp::Create,
            output,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "file exists (use -f to overwrite)",
            ),
        ));
    }
    Ok(())
}

fn zip(opts: &HuffOpts, file: &Path) -> Result<(), Error> {
    let output = opts.output_for(file);
    check_output(opts, &output)?;
    match compress(file, &output)? {
        Outcome::Compressed(stats) => {
            println!("{}:", file.display());
            println!("  Original Size: {} bytes", stats.original_bytes);
            println!("  Compressed Size: {} bytes", stats.compressed_bytes);
            println!("  Compression Ratio: {:.2}%", stats.ratio());
        }
        Outcome::EmptyInput => {
            warn!("{} is empty, nothing written.", file.display());
        }
    }
    Ok(())
}

fn unzip(opts: &HuffOpts, file: &Path) -> Result<(), Error> {
    let output = opts.output_for(file);
    check_output(opts, &output)?;
    decompress(file, &output)?;
    println!("{}: decompressed to {}", file.display(), output.display());
    Ok(())
}

/// Round trip the file in memory and compare the result with the original.
fn test(file: &Path) -> Result<(), Error> {
    let original = std::fs::read(file)
        .map_err(|e| Error::at(huffzip::error::IoOp::Read, file, e))?;
    if original.is_empty() {
        println!("{}: empty, nothing to test", file.display());
        return Ok(());
    }
    let packed = compress_bytes(&original)?;
    let restored = decompress_bytes(&packed)?;
    if restored == original {
        println!(
            "{}: ok ({} -> {} bytes)",
            file.display(),
            original.len(),
            packed.len()
        );
        Ok(())
    } else {
        Err(Error::corrupt("decompressed data does not match the original"))
    }
}
