use crate::cli_args::PlanArgs;
use anyhow::{Context, Result};
use et_core::configuration::{DEFAULT_BUDGET, DEFAULT_CARGO_CAPACITY};
use et_domain::Isk;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanInputs {
    pub from: String,
    pub to: String,
    pub cargo_capacity: f64,
    pub budget: Isk,
}

/// Blank, unparsable or negative input falls back to the default capacity. Zero is a valid capacity.
pub fn parse_cargo_capacity(input: &str) -> f64 {
    match input.trim().replace('_', "").parse::<f64>() {
        Ok(cargo) if cargo.is_finite() && cargo >= 0.0 => cargo,
        _ => DEFAULT_CARGO_CAPACITY,
    }
}

pub fn parse_budget(input: &str) -> Isk {
    match input.trim().replace('_', "").parse::<f64>() {
        Ok(budget) if budget.is_finite() && budget >= 0.0 => Isk::from_f64(budget),
        _ => Isk::from_f64(DEFAULT_BUDGET),
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Takes what was given on the command line and asks for the rest.
pub fn resolve_plan_inputs_from<R: BufRead, W: Write>(args: &PlanArgs, input: &mut R, output: &mut W) -> Result<PlanInputs> {
    let from = match &args.from {
        Some(from) => from.trim().to_string(),
        None => prompt(input, output, "Origin system")?,
    };
    let to = match &args.to {
        Some(to) => to.trim().to_string(),
        None => prompt(input, output, "Destination system")?,
    };
    let cargo_capacity = match args.cargo {
        Some(cargo) if cargo.is_finite() && cargo >= 0.0 => cargo,
        Some(_) => DEFAULT_CARGO_CAPACITY,
        None => parse_cargo_capacity(&prompt(input, output, &format!("Cargo capacity in m³ [{DEFAULT_CARGO_CAPACITY}]"))?),
    };
    let budget = match args.budget {
        Some(budget) if budget.is_finite() && budget >= 0.0 => Isk::from_f64(budget),
        Some(_) => Isk::from_f64(DEFAULT_BUDGET),
        None => parse_budget(&prompt(input, output, &format!("Budget in ISK [{DEFAULT_BUDGET}]"))?),
    };

    Ok(PlanInputs {
        from,
        to,
        cargo_capacity,
        budget,
    })
}

pub fn resolve_plan_inputs(args: &PlanArgs) -> Result<PlanInputs> {
    let stdin = io::stdin();
    resolve_plan_inputs_from(args, &mut stdin.lock(), &mut io::stdout())
}
