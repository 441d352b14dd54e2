use std::io;
use std::process::ExitCode;

use writer_app::publish_cli::{self, PublishArgs};
use writer_app::{log_destination, parse_args};
use writer_logging::writer_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env is fine; credentials may come from the shell or flags.
    dotenvy::dotenv().ok();

    let args: PublishArgs = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    writer_logging::initialize(log_destination(args.log_file.clone()), args.verbose);

    let mut stdout = io::stdout();
    match publish_cli::run(&args, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            writer_error!("publish failed: {err:#}");
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
