pub mod infix_converter;
mod infix_evaluator;
pub mod lexer;
pub mod operator;
mod postfix_evaluator;
pub mod token;
pub mod trace;

use crate::debug;
use crate::interpreter::token::Token;
use crate::interpreter::trace::{ConversionStep, EvaluationStep, ReductionStep};
use anyhow::{Context, Result};
use string_builder::Builder;

/// How [`Evaluator::evaluate`] should process its input.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationMode {
    /// Convert the expression to postfix, then run the postfix stack machine.
    InfixToPostfix,
    /// Evaluate an already-converted postfix token sequence.
    PostfixEvaluation(Vec<Token>),
    /// Evaluate the expression directly through recursive descent.
    InfixEvaluation,
}

/// The expression engine: evaluates expressions while recording a replayable
/// trace of every intermediate step, and holds the result register consulted
/// by the `\ANS` placeholder.
#[derive(Debug, Default)]
pub struct Evaluator {
    conversion_steps: Vec<ConversionStep>,
    evaluation_steps: Vec<EvaluationStep>,
    reduction_steps: Vec<ReductionStep>,
    previous_result: Option<f64>,
}

/// Mutable evaluation state threaded through the evaluators: the register
/// value visible to `\ANS`, the trace sinks, and the current nesting depth.
pub(crate) struct EvaluationContext<'a> {
    pub(crate) previous_result: Option<f64>,
    pub(crate) evaluation_steps: &'a mut Vec<EvaluationStep>,
    pub(crate) reduction_steps: &'a mut Vec<ReductionStep>,
    pub(crate) depth: usize,
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator::default()
    }

    /// Evaluates the given expression in the given mode.
    ///
    /// All traces recorded by a previous call are cleared first. On success
    /// the result register is updated; a failed evaluation leaves it
    /// untouched.
    ///
    /// # Arguments
    ///
    /// * `expression`: A text expression in infix format. Ignored in
    ///   [`EvaluationMode::PostfixEvaluation`], which carries its own tokens.
    /// * `mode`: The processing strategy.
    ///
    /// returns: The postfix form (empty when none is produced) and the result,
    /// both as text.
    ///
    /// # Examples
    ///
    /// ```
    /// use expression_evaluator::interpreter::{EvaluationMode, Evaluator};
    /// # use anyhow::Result;
    ///
    /// # fn main() -> Result<()> {
    /// let mut evaluator = Evaluator::new();
    /// let (postfix, result) = evaluator.evaluate("2 + 3 * 4", EvaluationMode::InfixToPostfix)?;
    /// assert_eq!(postfix, "2 3 4 * +");
    /// assert_eq!(result, "14");
    /// # Ok::<(), anyhow::Error>(()) }
    /// ```
    pub fn evaluate(
        &mut self,
        expression: &str,
        mode: EvaluationMode,
    ) -> Result<(String, String)> {
        self.clear_traces();

        match mode {
            EvaluationMode::InfixToPostfix => {
                let tokens = lexer::tokenize(expression)?;
                let postfix =
                    infix_converter::infix_to_postfix(tokens, &mut self.conversion_steps)?;
                debug!(&postfix);
                let postfix_expression = tokens_to_string(&postfix)?;
                let result = postfix_evaluator::evaluate_postfix(postfix, &mut self.context())?;
                self.previous_result = Some(result);
                Ok((postfix_expression, result.to_string()))
            }
            EvaluationMode::PostfixEvaluation(tokens) => {
                let postfix_expression = tokens_to_string(&tokens)?;
                // Snapshot of the machine before the first token is consumed.
                self.evaluation_steps.push(EvaluationStep {
                    step: 0,
                    input: postfix_expression.clone(),
                    operand_stack: String::new(),
                });
                let result = postfix_evaluator::evaluate_postfix(tokens, &mut self.context())?;
                self.previous_result = Some(result);
                Ok((postfix_expression, result.to_string()))
            }
            EvaluationMode::InfixEvaluation => {
                let result = infix_evaluator::evaluate_infix(expression, &mut self.context())?;
                self.previous_result = Some(result);
                Ok((String::new(), result.to_string()))
            }
        }
    }

    /// The rows recorded by the most recent infix-to-postfix conversion.
    pub fn conversion_steps(&self) -> &[ConversionStep] {
        &self.conversion_steps
    }

    /// The rows recorded by the most recent postfix evaluation.
    pub fn evaluation_steps(&self) -> &[EvaluationStep] {
        &self.evaluation_steps
    }

    /// The reductions recorded by the most recent direct evaluation.
    pub fn reduction_steps(&self) -> &[ReductionStep] {
        &self.reduction_steps
    }

    /// The value of the most recent successfully completed evaluation.
    pub fn previous_result(&self) -> Option<f64> {
        self.previous_result
    }

    /// Clears all recorded traces without evaluating anything.
    pub fn clear_traces(&mut self) {
        self.conversion_steps.clear();
        self.evaluation_steps.clear();
        self.reduction_steps.clear();
    }

    fn context(&mut self) -> EvaluationContext<'_> {
        EvaluationContext {
            previous_result: self.previous_result,
            evaluation_steps: &mut self.evaluation_steps,
            reduction_steps: &mut self.reduction_steps,
            depth: 0,
        }
    }
}

/// Pretty-prints the given tokens with a space between each pair.
///
/// # Arguments
///
/// * `tokens`: The tokens to print.
///
/// returns: A text-version of the given tokens.
///
/// # Examples
///
/// ```
/// use expression_evaluator::interpreter::token::Token;
/// use expression_evaluator::interpreter::tokens_to_string;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tokens = vec![Token::Number(2.0), Token::Number(3.0)];
/// assert_eq!(tokens_to_string(&tokens)?, "2 3");
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn tokens_to_string(tokens: &[Token]) -> Result<String> {
    let mut builder = Builder::new(tokens.len());

    for (position, token) in tokens.iter().enumerate() {
        if position > 0 {
            builder.append(" ");
        }
        builder.append(token.to_string());
    }

    builder.string().context("Failed to build token string")
}
