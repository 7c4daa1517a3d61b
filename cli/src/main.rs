use std::error::Error;
use std::io::Write;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};
use shiftadd_constmult::{ConstMult, LinearTiming, PeriodicConstant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Text,
    Dot,
    Json,
}

impl FromStr for Output {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Output::Text),
            "dot" => Ok(Output::Dot),
            "json" => Ok(Output::Json),
            _ => Err(()),
        }
    }
}

struct Options {
    constant: String,
    width: u32,
    frequency: f64,
    lut_delay: Option<f64>,
    carry_delay: Option<f64>,
    ff_delay: Option<f64>,
    wire_delay: Option<f64>,
    fraction: String,
    precision: u32,
    output: Output,
    trace: bool,
}

fn parse_options() -> Options {
    let mut options = Options {
        constant: String::new(),
        width: 16,
        frequency: LinearTiming::DEFAULT_FREQUENCY / 1e6,
        lut_delay: None,
        carry_delay: None,
        ff_delay: None,
        wire_delay: None,
        fraction: String::new(),
        precision: 24,
        output: Output::Text,
        trace: false,
    };
    {
        let mut parser = argparse::ArgumentParser::new();
        parser.set_description("Build a shift-and-add multiplier by a constant.");
        parser.refer(&mut options.width).add_option(&["-w", "--width"], argparse::Store, "Input width in bits");
        parser.refer(&mut options.frequency).add_option(
            &["-f", "--frequency"],
            argparse::Store,
            "Target frequency in MHz (0 for a combinatorial multiplier)",
        );
        parser.refer(&mut options.lut_delay).add_option(
            &["--lut-delay"],
            argparse::StoreOption,
            "LUT delay in seconds",
        );
        parser.refer(&mut options.carry_delay).add_option(
            &["--carry-delay"],
            argparse::StoreOption,
            "Carry chain delay per bit in seconds",
        );
        parser.refer(&mut options.ff_delay).add_option(
            &["--ff-delay"],
            argparse::StoreOption,
            "Flip-flop delay in seconds",
        );
        parser.refer(&mut options.wire_delay).add_option(
            &["--wire-delay"],
            argparse::StoreOption,
            "Routing delay in seconds",
        );
        parser.refer(&mut options.fraction).add_option(
            &["--fraction"],
            argparse::Store,
            "Multiply by the rational A/B instead (CONSTANT is ignored)",
        );
        parser.refer(&mut options.precision).add_option(
            &["--precision"],
            argparse::Store,
            "Significant bits of the rational constant",
        );
        parser.refer(&mut options.output).add_option(
            &["-o", "--output"],
            argparse::Store,
            "Output format (text, dot, json)",
        );
        parser.refer(&mut options.trace).add_option(
            &["--trace"],
            argparse::StoreTrue,
            "Print hierarchical trace output",
        );
        parser.refer(&mut options.constant).add_argument("CONSTANT", argparse::Store, "Integer constant");
        parser.parse_args_or_exit();
    }
    options
}

fn init_logging(trace: bool) {
    if trace {
        use tracing_subscriber::prelude::*;
        tracing_subscriber::registry()
            .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    } else {
        env_logger::init();
    }
}

fn timing(options: &Options) -> LinearTiming {
    let mut timing = LinearTiming::new(options.frequency * 1e6);
    if let Some(lut_delay) = options.lut_delay {
        timing.lut_delay = lut_delay;
    }
    if let Some(carry_delay) = options.carry_delay {
        timing.carry_delay = carry_delay;
    }
    if let Some(ff_delay) = options.ff_delay {
        timing.ff_delay = ff_delay;
    }
    if let Some(wire_delay) = options.wire_delay {
        timing.wire_delay = wire_delay;
    }
    timing
}

fn build(options: &Options) -> Result<ConstMult, Box<dyn Error>> {
    let timing = timing(options);
    if !options.fraction.is_empty() {
        let Some((numerator, denominator)) = options.fraction.split_once('/') else {
            return Err(format!("fraction {:?} is not of the form A/B", options.fraction).into());
        };
        let numerator = BigUint::from_str(numerator.trim())?;
        let denominator = BigUint::from_str(denominator.trim())?;
        let fraction = PeriodicConstant::from_fraction(&numerator, &denominator, options.precision)?;
        eprintln!("{numerator}/{denominator} ~= {} * 2^{}", fraction.significand, fraction.exponent);
        return Ok(ConstMult::periodic(&fraction.constant, options.width, &timing)?);
    }
    if options.constant.is_empty() {
        return Err("a constant or a fraction is required".into());
    }
    let constant = BigInt::from_str(&options.constant)?;
    Ok(ConstMult::new(&constant, options.width, &timing)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = parse_options();
    init_logging(options.trace);

    let mult = build(&options)?;
    eprintln!(
        "{}: cost {} FA/LUT, depth {}, {} stage(s), result width {}",
        mult.name(),
        mult.total_cost(),
        mult.dag_depth(),
        mult.stages(),
        mult.result_width()
    );

    let mut stdout = std::io::stdout().lock();
    match options.output {
        Output::Text => write!(stdout, "{}", mult.graph())?,
        Output::Dot => shiftadd_graphviz::describe(&mut stdout, mult.graph(), Some(mult.schedule()))?,
        Output::Json => shiftadd_json::export(&mut stdout, &mult)?,
    }
    Ok(())
}
