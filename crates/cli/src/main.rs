use std::process::ExitCode;

use argsketch_cli::cli_args::Args;
use argsketch_cli::compilation::{compile, format_namespace};
use argsketch_cli::input::{Input, Provider};
use argsketch_core::compile::Compiled;
use argsketch_core::error::{Error, Result};
use clap::Parser;
use log::{debug, info};

fn print_compiled(compiled: &Compiled) {
    println!("Compiled arguments for `{}`:", compiled.name());
    print!("{compiled}");
}

fn execute(args: &Args) -> Result<()> {
    let input = args.get_input()?;
    let compiled = compile(args)?;
    debug!("Compiled {} entries", compiled.entries().len());

    if args.dry_run || input == Input::None {
        if !args.dry_run {
            info!("Nothing to parse, showing the compiled arguments.");
        }
        print_compiled(&compiled);
        return Ok(());
    }

    if let Some(namespace) = input.parse(&compiled)? {
        println!("{}", format_namespace(&namespace));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        // Help and usage output from the compiled parser
        Err(Error::Arguments(e)) => {
            let _ = e.print();
            if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
