use crate::interpreter::infix_evaluator::evaluate_function;
use crate::interpreter::operator::factorial;
use crate::interpreter::token::Token;
use crate::interpreter::trace::EvaluationStep;
use crate::interpreter::EvaluationContext;
use anyhow::{bail, Context, Result};
use itertools::Itertools;
use std::collections::VecDeque;

/// Runs the postfix stack machine over the given token sequence.
///
/// One [`EvaluationStep`] is recorded after each consumed token. The machine
/// fails unless exactly one value remains on the operand stack at the end.
pub(crate) fn evaluate_postfix(tokens: Vec<Token>, context: &mut EvaluationContext) -> Result<f64> {
    let mut remaining: VecDeque<Token> = VecDeque::from(tokens);
    let mut stack: Vec<f64> = vec![];
    let mut step_count = 0;

    while let Some(token) = remaining.pop_front() {
        let input = remaining.iter().join(" ");
        step_count += 1;

        match token {
            Token::Number(value) => stack.push(value),
            Token::PreviousAnswer => match context.previous_result {
                Some(value) => stack.push(value),
                None => bail!("No previous result"),
            },
            Token::Constant(constant) => stack.push(constant.value()),
            Token::Function(ref value) => {
                let result = evaluate_function(value, context)?;
                stack.push(result);
            }
            Token::Operator(operator) if operator.is_unary() => {
                let operand = stack
                    .pop()
                    .with_context(|| format!("Operator {} lacks operand", operator))?;
                stack.push(factorial(operand)?);
            }
            Token::Operator(operator) => {
                if stack.len() < 2 {
                    bail!("Operator {} lacks operands", operator);
                }
                // The right-hand operand was pushed last.
                let b = stack.pop().with_context(|| "Operand stack is empty.")?;
                let a = stack.pop().with_context(|| "Operand stack is empty.")?;
                stack.push(operator.evaluate(a, b)?);
            }
            token => bail!("Unknown symbol {}", token),
        }

        context.evaluation_steps.push(EvaluationStep {
            step: step_count,
            input,
            operand_stack: stack.iter().join(" "),
        });
    }

    if stack.len() != 1 {
        bail!("Invalid postfix expression");
    }

    Ok(stack[0])
}
