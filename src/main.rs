use clap::Parser;
use std::process::ExitCode;
use tidyup::cli::{Args, main_with_args};

fn main() -> ExitCode {
    main_with_args(Args::parse())
}
