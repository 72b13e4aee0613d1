// SPDX-License-Identifier: MIT

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use sincrs::Cli;

fn main() {
    let cli = Cli::parse();
    std::process::exit(sincrs::run(cli));
}
