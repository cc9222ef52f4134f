use clap::Parser;
use mw_core::cli::{run, Cli};
use mw_core::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.global.log_options());
    let code = run(&cli);
    std::process::exit(code.as_i32());
}
