//! CLI Module
//!
//! Command-line interface for the Stompbox pedal chain.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stompbox - run a recording through a chain of guitar pedals
#[derive(Parser, Debug)]
#[command(name = "stompbox-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a WAV file through a pedalboard or chain
    #[command(
        name = "process",
        after_help = "An enabled Reverb without ir_path loads assets/impulse_responses/room.wav \
                      from the working directory. No impulse response ships with stompbox, \
                      so set ir_path in the board or chain file unless that file exists."
    )]
    Process {
        /// Input WAV file
        #[arg(short, long, required_unless_present = "demo")]
        input: Option<PathBuf>,

        /// Use the built-in 440 Hz demo tone as input
        #[arg(long, conflicts_with = "input")]
        demo: bool,

        /// Where to write the processed WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Pedalboard JSON file (eight fixed slots)
        #[arg(short, long, conflicts_with = "chain")]
        board: Option<PathBuf>,

        /// Chain JSON file (ordered list of {name, params})
        #[arg(short, long)]
        chain: Option<PathBuf>,
    },

    /// List available effects and their parameters
    #[command(name = "effects")]
    Effects,

    /// Estimate the pitch of a recording
    #[command(name = "tune")]
    Tune {
        /// Input WAV file
        #[arg(short, long, required_unless_present = "demo")]
        input: Option<PathBuf>,

        /// Use the built-in 440 Hz demo tone as input
        #[arg(long, conflicts_with = "input")]
        demo: bool,
    },

    /// Write the demo tone to a WAV file
    #[command(name = "demo")]
    Demo {
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },
}
