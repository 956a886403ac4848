//! Entrypoint for CLI
mod error;

use std::{env, fs, time::Instant};

use error::AppError;
use intlang::prelude::*;
use log::{error, info};

static USAGE: &str = r#"
usage: intlang SOURCE [OUTPUT]

Compiles SOURCE into an Intcode image. The image is written to OUTPUT,
or to standard output when no OUTPUT is given.

environment:
    STACK_SIZE    Cells in the stack section (default 2048)
    HEAP_SIZE     Cells in the heap section (default 4096)
    RUST_LOG      Log level, for example info or trace

examples:
    intlang fib.intl fib.int
    STACK_SIZE=512 intlang fib.intl
"#;

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let cmd = match parse_args() {
        Some(cmd) => cmd,
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    };

    if let Err(err) = run_compiler(cmd) {
        error!("{err}");
        std::process::exit(1)
    }
}

fn run_compiler(cmd: Cmd) -> Result<(), AppError> {
    let conf = read_conf()?;
    let source_code = fs::read_to_string(&cmd.source)?;

    let start = Instant::now();
    let image = compile_str(source_code.as_str(), conf)?;
    let end = Instant::now();

    info!(
        "compiled {} in {}ms",
        cmd.source,
        end.duration_since(start).as_nanos() as f64 / 1000000.0
    );
    report_sections(&image);

    match cmd.output {
        Some(output) => fs::write(output, image.to_string())?,
        None => println!("{image}"),
    }

    Ok(())
}

/// Section sizes from the environment, falling back to the defaults.
fn read_conf() -> Result<CompilerConf, AppError> {
    let defaults = CompilerConf::default();
    Ok(CompilerConf {
        stack_size: read_size("STACK_SIZE", defaults.stack_size)?,
        heap_size: read_size("HEAP_SIZE", defaults.heap_size)?,
    })
}

fn read_size(name: &'static str, default: usize) -> Result<usize, AppError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| AppError::config(name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(value)) => Err(AppError::config(name, value.to_string_lossy())),
    }
}

fn report_sections(image: &Image) {
    for (kind, range) in image.sections() {
        info!("{kind:>12}: {} - {}", range.start, range.end);
    }
    info!("{:>12}: {} intcodes", "total", image.len());
}

fn parse_args() -> Option<Cmd> {
    let mut args = env::args().skip(1);
    let source = args.next()?;
    let output = args.next();

    // Anything after the output is a usage error.
    if args.next().is_some() {
        return None;
    }

    Some(Cmd { source, output })
}

fn print_usage() {
    println!("intlang v{}", env!("CARGO_PKG_VERSION"));
    println!("{USAGE}");
}

struct Cmd {
    source: String,
    output: Option<String>,
}
