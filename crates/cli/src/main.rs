use std::process::ExitCode;

fn main() -> ExitCode {
    outfitter_cli::run()
}
