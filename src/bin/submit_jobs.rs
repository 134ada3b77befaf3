use clap::Parser;
use phonon_tools::cli::submit::SubmitArgs;
use phonon_tools::{commands, utils};

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let args = SubmitArgs::parse();

    if let Err(e) = utils::logging::setup_logging(args.verbose, args.quiet) {
        utils::output::print_warning(&format!("{}", e));
    }

    if let Err(e) = commands::submit::execute(args) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
