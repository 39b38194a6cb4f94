mod script;

use anyhow::{Context, Result};
use clap::Parser;
use ssr_bridge::protocol::{Array, Dispatcher};
use ssr_bridge::renderer::DirectMixRenderer;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Drive the SSR bridge from a command script, one call per line.
#[derive(Parser, Debug)]
#[command(about = "Runs chained SSR bridge commands from a script", version)]
struct Args {
    /// Script to execute (reads stdin when omitted)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Function name shown in the help text
    #[arg(long, default_value = "ssr_dm")]
    name: String,

    /// Log every dispatched command and scene event
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let lines: Vec<String> = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("failed to read commands from stdin")?,
    };

    let mut bridge = Dispatcher::<DirectMixRenderer>::new(args.name);
    let mut failures = 0;

    for (number, line) in lines.iter().enumerate() {
        let call = match script::parse_line(line) {
            Ok(Some(call)) => call,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("line {}: parse error: {:#}", number + 1, e);
                failures += 1;
                continue;
            }
        };

        match bridge.execute(&call.args, call.outputs.len()) {
            Ok(results) => {
                for (index, value) in results.iter().enumerate() {
                    let name = call.outputs.get(index).map_or("ans", String::as_str);
                    println!("{} = {}", name, format_array(value));
                }
            }
            Err(e) => {
                eprintln!("line {}: {}", number + 1, e);
                failures += 1;
            }
        }

        for event in bridge.poll_events() {
            log::debug!("{:?}", event);
        }
    }

    if failures > 0 {
        log::warn!("{} line(s) failed", failures);
    }
    Ok(())
}

/// Scalars print as a number; larger arrays print their shape and, when
/// small, their rows.
fn format_array(array: &Array) -> String {
    if let Some(value) = array.as_scalar() {
        return value.to_string();
    }

    let mut text = format!(
        "[{}x{} {}]",
        array.rows(),
        array.cols(),
        array.data().class_name()
    );
    if array.len() <= 64 {
        for row in 0..array.rows() {
            let values: Vec<String> = (0..array.cols())
                .filter_map(|col| array.get(row, col))
                .map(|v| format!("{:.4}", v))
                .collect();
            text.push_str("\n  ");
            text.push_str(&values.join(" "));
        }
    }
    text
}
