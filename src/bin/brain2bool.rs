use boof::commands::translate::{self, TranslateArgs};
use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(name = "brain2bool", version, disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: TranslateArgs,
}

fn main() {
    let program = env::args().next().unwrap_or_else(|| String::from("brain2bool"));

    let cli = Cli::parse();
    boof::init_logging();

    let code = translate::run(&program, cli.args);
    std::process::exit(code);
}
