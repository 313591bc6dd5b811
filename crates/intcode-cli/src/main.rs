//! Intcode CLI.
//!
//! Commands:
//! - `intcode run [prog.txt]` - Run a program on the terminal
//! - `intcode disas [prog.txt]` - Print a static listing of a program
//! - `intcode paint [prog.txt]` - Drive the hull-painting robot
//!
//! Programs are read from stdin when no path is given.

mod robot;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use intcode_vm::{InputChannel, OutputChannel, Variant, Vm};

#[derive(Parser)]
#[command(name = "intcode")]
#[command(about = "Intcode virtual machine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run(RunArgs),

    /// Disassemble a program without running it
    Disas {
        /// Program file (defaults to stdin)
        program: Option<PathBuf>,

        /// Decode with the basic instruction set (no relative base)
        #[arg(long)]
        basic: bool,
    },

    /// Run the hull-painting robot and render what it painted
    Paint {
        /// Program file (defaults to stdin)
        program: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Program file (defaults to stdin)
    program: Option<PathBuf>,

    /// Scripted input values instead of prompting (e.g. `--input 1,2,3`)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "ascii")]
    input: Option<Vec<i64>>,

    /// Exchange text with the program, one character code per value
    #[arg(long)]
    ascii: bool,

    /// Print every instruction before it executes
    #[arg(long)]
    trace: bool,

    /// Use the basic instruction set (no relative base)
    #[arg(long)]
    basic: bool,

    /// Overwrite a memory word before running (e.g. `--patch 1=12`)
    #[arg(long, value_name = "ADDR=VALUE", value_parser = parse_patch)]
    patch: Vec<(usize, i64)>,

    /// Print a memory word after the program halts
    #[arg(long, value_name = "ADDR")]
    show: Vec<usize>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Disas { program, basic } => cmd_disas(program, variant(basic)),
        Commands::Paint { program } => cmd_paint(program),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn variant(basic: bool) -> Variant {
    if basic {
        Variant::Basic
    } else {
        Variant::Extended
    }
}

fn parse_patch(s: &str) -> Result<(usize, i64), String> {
    let (addr, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got `{}`", s))?;
    let addr = addr.trim().parse().map_err(|_| format!("bad address `{}`", addr))?;
    let value = value.trim().parse().map_err(|_| format!("bad value `{}`", value))?;
    Ok((addr, value))
}

/// Loads the program from `path`, or from stdin when absent.
fn load_program(path: Option<&PathBuf>) -> anyhow::Result<Vec<i64>> {
    match path {
        Some(path) => intcode_vm::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => intcode_vm::load_reader(io::stdin().lock()).context("failed to load stdin"),
    }
}

/// Run a program with terminal, ASCII or scripted I/O.
fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let program = load_program(args.program.as_ref())?;
    if args.program.is_none() && args.input.is_none() {
        log::debug!("program read from stdin; terminal input will see end of file");
    }

    let mut vm = Vm::with_variant(&program, variant(args.basic));
    for &(addr, value) in &args.patch {
        vm.memory_mut()
            .store(addr, value)
            .with_context(|| format!("failed to patch address {}", addr))?;
    }

    let (mut input, mut output) = match (&args.input, args.ascii) {
        (Some(values), _) => (InputChannel::values(values.iter().copied()), OutputChannel::Terminal),
        (None, true) => (InputChannel::Ascii, OutputChannel::Ascii),
        (None, false) => (InputChannel::Terminal, OutputChannel::Terminal),
    };
    vm.run(&mut input, &mut output, args.trace)
        .with_context(|| format!("program stopped at ip {}", vm.ip()))?;

    for &addr in &args.show {
        match vm.memory().get(addr) {
            Some(value) => println!("[{}] = {}", addr, value),
            None => bail!("address {} is beyond memory ({} words)", addr, vm.memory().len()),
        }
    }
    Ok(())
}

/// Print the static listing.
fn cmd_disas(path: Option<PathBuf>, variant: Variant) -> anyhow::Result<()> {
    let program = load_program(path.as_ref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    intcode_vm::write_listing(&mut out, &program, variant)?;
    out.flush()?;
    Ok(())
}

/// Paint starting on black and report coverage, then paint starting on white
/// and render the hull.
fn cmd_paint(path: Option<PathBuf>) -> anyhow::Result<()> {
    let program = load_program(path.as_ref())?;

    let hull = robot::paint(&program, false).context("robot starting on black")?;
    println!("{}", hull.painted_count());

    let hull = robot::paint(&program, true).context("robot starting on white")?;
    print!("{}", hull.render());
    Ok(())
}
