//! Driver binary: runs a fixed, ordered sequence of generators over a parsed
//! descriptor set against one generator context, then finalizes to disk.
//!
//! This is the only layer allowed to terminate the process: a generator's
//! `FaultExit`/`FaultAbort` signal is honored here, never inside the library.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use schemagen::descriptor::{FileDescriptor, parse_file_set};
use schemagen::mock::MockCodeGenerator;
use schemagen::{CodeGenError, CodeGenerator, DiskOutputStreamProvider, GeneratorContext};

#[derive(Parser)]
#[command(name = "schemagen", about = "Run code generators over a descriptor set.")]
struct Args {
    /// Path to a descriptor-set JSON file.
    input: PathBuf,

    /// Generator to run, as `name` or `name=parameter`. Repeatable; runs in
    /// the given order.
    #[arg(long = "generator", required = true)]
    generators: Vec<String>,

    /// Directory where output files are written.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn run(args: &Args) -> Result<bool, CodeGenError> {
    let json: String = fs::read_to_string(&args.input)?;
    let files: Vec<FileDescriptor> = parse_file_set(&json)?;
    let mut context: GeneratorContext = GeneratorContext::for_files(&files);

    let mut any_failed: bool = false;
    for entry in &args.generators {
        let (name, parameter): (&str, &str) =
            entry.split_once('=').unwrap_or((entry.as_str(), ""));
        let generator = MockCodeGenerator::new(name);
        for file in &files {
            match generator.generate(file, parameter, &mut context) {
                Ok(()) => {}
                Err(CodeGenError::FaultExit { status, message }) => {
                    eprintln!("{message}");
                    process::exit(status);
                }
                Err(CodeGenError::FaultAbort { message }) => {
                    eprintln!("{message}");
                    process::abort();
                }
                Err(error) => {
                    eprintln!("{name}: {error}");
                    any_failed = true;
                }
            }
        }
    }

    let mut provider = DiskOutputStreamProvider::new(&args.out);
    context.finalize(&mut provider)?;
    Ok(any_failed)
}

fn main() {
    let args: Args = Args::parse();
    match run(&args) {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
