//! arch-info entry point.
//!
//! Prints the platform string and exits 0, or prints
//! `Architecture: Unknown` and exits 1.

use std::process::ExitCode;

fn main() -> ExitCode {
    match arch_info::platform() {
        Some(platform) => {
            println!("{platform}");
            ExitCode::SUCCESS
        }
        None => {
            println!("{}", arch_info::UNKNOWN);
            ExitCode::FAILURE
        }
    }
}
