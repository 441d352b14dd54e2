use std::io;
use std::process::ExitCode;

use writer_app::format_cli::{self, FormatArgs};
use writer_app::{log_destination, parse_args};
use writer_engine::PulldownRenderer;
use writer_logging::writer_error;

fn main() -> ExitCode {
    let args: FormatArgs = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    writer_logging::initialize(log_destination(args.log_file.clone()), args.verbose);

    match format_cli::run(&args, &PulldownRenderer, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            writer_error!("format failed: {err:#}");
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
