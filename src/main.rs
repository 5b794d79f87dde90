use std::fmt::Write;

use clap::Parser;
use remnant_optimizer::config::{DEFAULT_KERF, DEFAULT_MIN_REST_LENGTH, DEFAULT_WHOLE_PROFILE_LENGTH};
use remnant_optimizer::error::CutError;
use remnant_optimizer::render;
use remnant_optimizer::request::CutRequest;
use remnant_optimizer::scheme::Scheme;
use remnant_optimizer::strategy::Strategy;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "remnant_optimizer",
    about = "Linear cutting optimizer for remnants and whole profiles"
)]
struct Cli {
    /// Ordered piece widths (e.g. 1.2 0.85 0.85)
    #[arg(long, num_args = 1.., required = true)]
    pieces: Vec<f64>,

    /// Remnant lengths in stock; repeat a length for several units
    #[arg(long, num_args = 1..)]
    stock: Vec<f64>,

    /// Length of a whole profile
    #[arg(long, default_value_t = DEFAULT_WHOLE_PROFILE_LENGTH)]
    whole_length: f64,

    /// Number of whole profiles available
    #[arg(long, default_value_t = 0)]
    whole_count: usize,

    /// Saw kerf, charged once per piece
    #[arg(long, default_value_t = DEFAULT_KERF)]
    kerf: f64,

    /// Leftovers shorter than this are waste
    #[arg(long, default_value_t = DEFAULT_MIN_REST_LENGTH)]
    min_rest: f64,

    /// Subtracted from every piece width
    #[arg(long, default_value_t = 0.0)]
    correction: f64,

    /// Strategy: quick, middle, or best
    #[arg(long, default_value = "quick", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Give up after this many milliseconds (best defaults to 10000)
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Show a bar layout of each stock unit
    #[arg(long)]
    layout: bool,

    /// Log search progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
}

/// Scheme text, followed by the bar layout of every unit when asked.
fn report(scheme: &Scheme, layout: bool) -> String {
    let mut out = scheme.to_string();
    if layout && !scheme.is_empty() {
        out.push_str("\nLayout:\n");
        for (key, cuts) in scheme.entries() {
            let _ = writeln!(out, "{key}:");
            for cut in cuts {
                let _ = writeln!(out, "\t{}", render::render_unit(key.length, cut, scheme.kerf()));
            }
        }
    }
    out
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let request = CutRequest {
        pieces: cli.pieces,
        stock: cli.stock,
        whole_profile_length: cli.whole_length,
        whole_profile_count: cli.whole_count,
        kerf: cli.kerf,
        min_rest_length: cli.min_rest,
        correction: cli.correction,
        strategy: cli.strategy,
        time_limit_ms: cli.time_limit_ms,
    }
    .with_default_time_limit();

    let scheme = match request.solve() {
        Ok(scheme) => scheme,
        Err(CutError::InsufficientStock {
            partial,
            unassigned,
            ..
        }) => {
            eprintln!("Error: not enough remnants and whole profiles");
            if !partial.is_empty() {
                eprint!("Cut before stock ran out:\n{}", report(&partial, cli.layout));
            }
            let left: Vec<String> = unassigned.iter().map(|p| format!("{p:.3}")).collect();
            eprintln!("Unassigned pieces: {}", left.join(", "));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report(&scheme, cli.layout));

    let waste = scheme.waste();
    println!(
        "Summary: {} unit{} cut with {}, {:.3} waste ({:.3}%)",
        scheme.unit_count(),
        if scheme.unit_count() == 1 { "" } else { "s" },
        cli.strategy,
        waste.absolute,
        waste.percent,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use remnant_optimizer::solver::Solver;
    use remnant_optimizer::types::StockKey;

    fn scheme() -> Scheme {
        Solver::new(Strategy::Quick, 0.0, 1.0)
            .solve(&[4.0, 1.5], &[StockKey::new(6.0, 1)])
            .unwrap()
    }

    #[test]
    fn test_report_is_scheme_text() {
        let scheme = scheme();
        assert_eq!(report(&scheme, false), scheme.to_string());
        assert_eq!(
            report(&scheme, false),
            "6.000 x1:\n\t[4.000, 1.500] = 5.500 (6.000, rest: 0.500)\n"
        );
    }

    #[test]
    fn test_report_appends_layout() {
        let scheme = scheme();
        let text = report(&scheme, true);
        assert!(text.starts_with(&scheme.to_string()));
        assert!(text.contains("\nLayout:\n6.000 x1:\n\t|"));
    }
}
