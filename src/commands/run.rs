use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::BoolfuckReader;
use crate::cli_util::print_reader_error;
use crate::config;
use crate::loader::load_program;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Treat a skipped loop with no matching ']' as an error (fallback BOOF_STRICT)
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print a step-by-step table of executed instructions to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Boolfuck program to run; reads the program from stdin when omitted
    #[arg(value_name = "INPUT-FILE")]
    pub file: Option<PathBuf>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program);
    }

    let RunArgs {
        strict,
        debug,
        file,
        ..
    } = args;

    // Resolve settings: flags -> env -> config file -> defaults
    let settings = config::settings();
    let strict = strict || settings.strict;
    debug!(?settings, strict, "resolved settings");

    let code = match load_program(file.as_deref()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let mut bf = match BoolfuckReader::with_page_bytes(code, settings.page_bytes) {
        Ok(bf) => bf.strict(strict).debug(debug),
        Err(e) => {
            eprintln!("{program}: Fatal error: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    match bf.run() {
        Ok(()) => 0,
        Err(err) => {
            let _ = io::stdout().flush();
            print_reader_error(Some(program), bf.code(), &err);
            1
        }
    }
}

fn usage_and_exit(program: &str) -> ! {
    let text = format!(
        r#"Usage: {0} [OPTIONS] [INPUT-FILE]

Interpret a Boolfuck program. If no input file is given, reads standard input.

Options:
  --strict       Report a skipped loop with no matching ']' as an error
  --debug,  -d   Print a step-by-step table of executed instructions to stderr
  --help,   -h   Print this help message and exit
  --version, -V  Print version message and exit

Instructions:
  +  flip the selected bit        ,  read one bit from stdin
  ;  write the selected bit       <  >  select the bit to the left/right
  [  enter loop if bit is set     ]  repeat loop while bit is set

Notes:
- Bits are read and written least significant bit first; EOF reads as 0.
- A newline is always printed when the program ends; unfinished bytes are dropped.
- Settings are read from $XDG_CONFIG_HOME/boof.toml ([runtime] page_bytes, strict)
  and the BOOF_PAGE_BYTES / BOOF_STRICT environment variables.
- Set BOOF_LOG (e.g. BOOF_LOG=debug) to see diagnostic logs on stderr.
"#,
        program
    );
    print!("{text}");
    let _ = io::stdout().flush();
    std::process::exit(0);
}
