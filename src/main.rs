use clap::Parser;
use loancalc::{cli::Args, report};
use log::debug;
use simple_logger::SimpleLogger;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = SimpleLogger::new().with_level(args.log_level).init() {
        eprintln!("error: logger was not installed: {}", err);
    }
    debug!("{:?}", args);

    let response = report::respond(&args.request(), args.schedule, args.first_payment);
    for line in &response.stdout {
        println!("{}", line);
    }
    for line in &response.stderr {
        eprintln!("{}", line);
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
