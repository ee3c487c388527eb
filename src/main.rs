use std::process::ExitCode;

fn main() -> ExitCode {
    dsp_numbers::cli::run()
}
