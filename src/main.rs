use clap::Parser as CParser;
use log::error;

use nac_lang::interpreter::Interpreter;

#[derive(CParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the NaC program to run.
    file: Option<std::path::PathBuf>,

    /// Enable verbose interpreter logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).unwrap();

    let Some(file) = args.file else {
        println!("NaC Language Interpreter v{}", env!("CARGO_PKG_VERSION"));
        println!("Usage: nac <file.nac>");
        std::process::exit(1);
    };

    let source = match std::fs::read_to_string(&file) {
        Ok(source) => source,
        Err(_) => {
            error!("Cannot open file: {}", file.to_string_lossy());
            std::process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new(&source);
    let errors = interpreter.run();

    if errors > 0 {
        error!("Execution completed with {errors} error(s).");
        std::process::exit(1);
    }
}
