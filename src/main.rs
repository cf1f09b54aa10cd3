use log::{debug, error, warn};
use pipemin::cli::Cli;
use pipemin::error::ReturnCode;
use pipemin::input::InputSequence;
use pipemin::logging;
use pipemin::process::{run_pair, Outcome};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let args = Cli::parse_args();
    logging::init(args.log_level());

    if args.is_verbose() {
        debug!("Verbose logging enabled (level {})", args.verbosity_level());
    }

    // Generated before the fork so both processes see the same values
    let input = InputSequence::random();
    println!("{}", input);

    match run_pair(&input) {
        Ok(Outcome::Parent(report)) => {
            if report.combined.degraded {
                debug!("[Parent] Finished with the child's result missing");
            }
            ReturnCode::NoError.as_exit_code()
        }
        Ok(Outcome::Child(report)) => {
            debug!("[Child] Exiting (sent: {})", report.sent);
            ReturnCode::NoError.as_exit_code()
        }
        Err(e) if e.is_fatal() => {
            error!("{}", e);
            e.exit_code()
        }
        Err(e) => {
            warn!("{}", e);
            ReturnCode::NoError.as_exit_code()
        }
    }
}
