use std::env;
use std::path::Path;

use bitpaint::commands::edit::{self, EditArgs};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bitpaint", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    edit: EditArgs,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("BITPAINT_LOG", "warn"))
        .format_timestamp(None)
        .init();

    // Program name for message prefixes and help rendering
    let program = env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| String::from("bitpaint"));

    let cli = Cli::parse();
    let code = edit::run(&program, cli.edit);

    std::process::exit(code);
}
