use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use expression_evaluator::interpreter::{EvaluationMode, Evaluator};
use log::debug;

/// Evaluates the given expression
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Arguments {
    /// The expression to evaluate
    expression: String,

    /// Evaluate directly through recursive descent instead of converting
    /// to postfix first
    #[clap(short, long)]
    direct: bool,

    /// Print the recorded intermediate steps
    #[clap(short, long)]
    steps: bool,

    #[clap(flatten)]
    verbose: Verbosity,
}

fn main() -> Result<()> {
    let args = Arguments::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mode = if args.direct {
        EvaluationMode::InfixEvaluation
    } else {
        EvaluationMode::InfixToPostfix
    };

    let mut evaluator = Evaluator::new();
    let (postfix, result) = evaluator.evaluate(&args.expression, mode)?;
    debug!("postfix form: {:?}", postfix);

    if args.steps {
        print_steps(&evaluator);
    }
    if !postfix.is_empty() {
        println!("{}", postfix);
    }
    println!("{}", result);
    Ok(())
}

fn print_steps(evaluator: &Evaluator) {
    if !evaluator.conversion_steps().is_empty() {
        println!("{:<5} {:<25} {:<25} {}", "step", "input", "operator stack", "output");
        for step in evaluator.conversion_steps() {
            println!(
                "{:<5} {:<25} {:<25} {}",
                step.step, step.input, step.operator_stack, step.output_queue
            );
        }
        println!();
    }
    if !evaluator.evaluation_steps().is_empty() {
        println!("{:<5} {:<25} {}", "step", "input", "operand stack");
        for step in evaluator.evaluation_steps() {
            println!("{:<5} {:<25} {}", step.step, step.input, step.operand_stack);
        }
        println!();
    }
    if !evaluator.reduction_steps().is_empty() {
        println!("{:<5} {:<25} {}", "step", "operation", "result");
        for step in evaluator.reduction_steps() {
            println!("{:<5} {:<25} {}", step.step, step.operation, step.result);
        }
        println!();
    }
}
