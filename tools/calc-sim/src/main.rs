//! Touch Calculator Simulator
//!
//! Replays scripted touch input through the calculator firmware's control
//! loop on the host, against an in-memory framebuffer instead of the
//! ILI9341 panel.
//!
//! # Usage
//!
//! ```bash
//! # Run a session file and check its expectations
//! calc-sim run sessions/seven_plus_three.toml
//!
//! # Tap a key sequence and save the final screen
//! calc-sim keys "12*3=" --screenshot screen.ppm
//!
//! # Print the button table
//! calc-sim layout
//! ```

mod error;
mod runner;
mod screen;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use calc_core::STANDARD_KEYPAD;
use runner::{simulate, Report};
use session::{Session, DEFAULT_HOLD};

/// Touch Calculator Simulator
///
/// Drives the calculator firmware with scripted touches
#[derive(Parser)]
#[command(name = "calc-sim")]
#[command(version = "0.1.0")]
#[command(about = "Host-side simulator for the STM32F429 touch calculator")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session file
    Run {
        /// Path to the session TOML
        session: PathBuf,

        /// Save the final screen as PPM
        #[arg(short, long)]
        screenshot: Option<PathBuf>,

        /// Print every key activation and release
        #[arg(short, long)]
        trace: bool,
    },

    /// Tap a sequence of keys, one per character
    Keys {
        /// Key labels, e.g. "7+3="
        keys: String,

        /// Ticks each key stays pressed
        #[arg(long, default_value_t = DEFAULT_HOLD)]
        hold: usize,

        /// Save the final screen as PPM
        #[arg(short, long)]
        screenshot: Option<PathBuf>,
    },

    /// Print the keypad button table
    Layout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Run {
            session,
            screenshot,
            trace,
        } => handle_run(&session, screenshot.as_deref(), trace),
        Commands::Keys {
            keys,
            hold,
            screenshot,
        } => handle_keys(&keys, hold, screenshot.as_deref()),
        Commands::Layout => {
            print_layout();
            Ok(())
        }
    }
}

fn handle_run(path: &Path, screenshot: Option<&Path>, trace: bool) -> Result<()> {
    let session = Session::load(path)?;
    let (report, fb) = simulate(&session)?;

    print_report(session.display_name(), &report, trace);
    if let Some(out) = screenshot {
        screen::save_screenshot(&fb, out)?;
    }

    let Some(expect) = &session.expect else {
        return Ok(());
    };

    println!("\n{}", "Expectations:".white().bold());
    let checks = expect.checks(&report);
    for check in &checks {
        if check.passed() {
            println!("  {} {} = {}", "[PASS]".green().bold(), check.field, check.actual);
        } else {
            println!(
                "  {} {}: expected {}, got {}",
                "[FAIL]".red().bold(),
                check.field,
                check.expected,
                check.actual
            );
        }
    }
    for check in checks {
        check.into_result()?;
    }
    Ok(())
}

fn handle_keys(keys: &str, hold: usize, screenshot: Option<&Path>) -> Result<()> {
    let session = Session::from_keys(keys, hold);
    let (report, fb) = simulate(&session)?;

    print_report(session.display_name(), &report, false);
    if let Some(out) = screenshot {
        screen::save_screenshot(&fb, out)?;
    }
    Ok(())
}

fn print_report(name: &str, report: &Report, trace: bool) {
    println!("{}", "=".repeat(40));
    println!("{}", format!("Session: {}", name).cyan().bold());
    println!("{}", "=".repeat(40));

    if trace {
        println!("\n{}", "Events:".white().bold());
        for (tick, event) in &report.events {
            let label = |index: usize| {
                STANDARD_KEYPAD
                    .button(index)
                    .map(|b| b.label)
                    .unwrap_or("?")
            };
            if let Some(index) = event.activated {
                let outcome = event
                    .outcome
                    .map(|o| format!("{:?}", o))
                    .unwrap_or_default();
                println!("  {:>5}  press   {:<2} {}", tick, label(index), outcome);
            }
            if let Some(index) = event.released {
                println!("  {:>5}  release {}", tick, label(index));
            }
        }
    }

    println!("\n{}", "Readout:".white().bold());
    let [status, operator, pointer] = report.readout.lines();
    let status = if report.state.is_error() {
        status.red().bold()
    } else {
        status.green().bold()
    };
    println!("  {}", status);
    println!("  {}", operator);
    println!("  {}", pointer.yellow());

    println!(
        "\n{} ticks, {} activations, {} releases, {} readout redraws",
        report.ticks, report.activations, report.releases, report.redraws
    );
}

fn print_layout() {
    let geometry = STANDARD_KEYPAD.geometry();
    println!("{}", "=".repeat(50));
    println!(
        "{}",
        format!(
            "Keypad {}x{} (key {}x{}, spacing {})",
            geometry.screen_width,
            geometry.screen_height,
            geometry.button_width(),
            geometry.button_height,
            geometry.spacing
        )
        .cyan()
        .bold()
    );
    println!("{}", "=".repeat(50));

    for (index, button) in STANDARD_KEYPAD.buttons().iter().enumerate() {
        let rect = button.rect;
        println!(
            "  {:>2}  {:<2} {:<9} x {:>3}..={:<3} y {:>3}..={:<3}",
            index,
            button.label.white().bold(),
            format!("{:?}", button.kind()),
            rect.x,
            rect.x + rect.w,
            rect.y,
            rect.y + rect.h
        );
    }
}
