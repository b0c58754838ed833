use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Args;

use crate::BoolfuckWriter;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct TranslateArgs {
    /// Write Boolfuck to PATH instead of stdout
    #[arg(short = 'o', long = "output", value_name = "OUTPUT-FILE")]
    pub output: Option<PathBuf>,

    /// Brainfuck program to translate; reads stdin when omitted
    #[arg(value_name = "INPUT-FILE")]
    pub file: Option<PathBuf>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: TranslateArgs) -> i32 {
    if args.help {
        usage_and_exit(program);
    }

    let TranslateArgs { output, file, .. } = args;

    let input: Box<dyn Read> = match file {
        Some(path) => match File::open(&path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("{program}: {}: {e}", path.display());
                let _ = io::stderr().flush();
                return 1;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let sink: Box<dyn Write> = match output {
        Some(path) => match File::create(&path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("{program}: {}: {e}", path.display());
                let _ = io::stderr().flush();
                return 1;
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match BoolfuckWriter::translate_stream(input, sink) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn usage_and_exit(program: &str) -> ! {
    let text = format!(
        r#"Usage: {0} [-o OUTPUT-FILE] [INPUT-FILE]

Translate a Brainfuck program into Boolfuck. Reads INPUT-FILE, or standard
input if none is given, and writes one line of Boolfuck per Brainfuck
instruction. Other characters are dropped.

Options:
  --output, -o <PATH>  Set output file name (default: stdout)
  --help,   -h         Print help message
  --version, -V        Print version message

Examples:
  {0} hello.bf | boof
  {0} -o hello.bool hello.bf
"#,
        program
    );
    print!("{text}");
    let _ = io::stdout().flush();
    std::process::exit(0);
}
