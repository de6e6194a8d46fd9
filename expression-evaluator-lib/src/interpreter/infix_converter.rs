use crate::interpreter::operator::{Associativity, Operator};
use crate::interpreter::token::Token;
use crate::interpreter::trace::ConversionStep;
use anyhow::{bail, Context, Result};
use itertools::Itertools;
use std::collections::VecDeque;

/// Converts the given infix token sequence into postfix (reverse Polish)
/// order using the shunting-yard algorithm.
///
/// One [`ConversionStep`] is appended to `steps` for every consumed token
/// except the trailing [`Token::End`] sentinel, capturing the remaining
/// input, the operator stack and the output queue at that point.
///
/// # Arguments
///
/// * `original_tokens`: The tokens to convert, in infix format.
/// * `steps`: Trace sink for the conversion.
///
/// returns: The tokens in postfix format.
///
/// # Examples
///
/// ```
/// use expression_evaluator::interpreter::infix_converter::infix_to_postfix;
/// use expression_evaluator::interpreter::lexer::tokenize;
/// use expression_evaluator::interpreter::tokens_to_string;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tokens = tokenize("2 + 3 * 4")?;
/// let postfix = infix_to_postfix(tokens, &mut Vec::new())?;
/// assert_eq!(tokens_to_string(&postfix)?, "2 3 4 * +");
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn infix_to_postfix(
    original_tokens: Vec<Token>,
    steps: &mut Vec<ConversionStep>,
) -> Result<Vec<Token>> {
    let mut tokens: VecDeque<Token> = VecDeque::from(original_tokens);
    // The bottom-of-stack marker lets the final drain stop before emptying
    // the stack entirely.
    let mut operators: Vec<Token> = vec![Token::End];
    let mut output: Vec<Token> = vec![];
    let mut step_count = 0;

    while let Some(token) = tokens.pop_front() {
        let input = tokens.iter().join(" ");
        step_count += 1;

        match token {
            Token::Number(_) | Token::Constant(_) | Token::PreviousAnswer | Token::Function(_) => {
                output.push(token)
            }
            Token::OpenParenthesis => operators.push(token),
            Token::CloseParenthesis => {
                parse_closing_parenthesis_token(&mut operators, &mut output)?
            }
            Token::Operator(operator) => {
                parse_operator_token(&mut operators, &mut output, &operator)?;
                operators.push(Token::Operator(operator));
            }
            Token::End => {
                transfer_leftover_operators(&mut operators, &mut output)?;
                break;
            }
        };

        steps.push(ConversionStep {
            step: step_count,
            input,
            operator_stack: operators.iter().join(" "),
            output_queue: output.iter().join(" "),
        });
    }

    Ok(output)
}

fn transfer_leftover_operators(
    operators: &mut Vec<Token>,
    output: &mut Vec<Token>,
) -> Result<()> {
    while let Some(operator) = operators.pop() {
        match operator {
            Token::End => break,
            Token::OpenParenthesis | Token::CloseParenthesis => {
                bail!("Mismatched parentheses");
            }
            operator => output.push(operator),
        }
    }
    Ok(())
}

fn parse_closing_parenthesis_token(
    operators: &mut Vec<Token>,
    output: &mut Vec<Token>,
) -> Result<()> {
    while let Some(top_of_operator_stack) = operators.last() {
        if matches!(top_of_operator_stack, Token::OpenParenthesis | Token::End) {
            break;
        }
        let operator = operators.pop().with_context(|| "No operators left.")?;
        output.push(operator);
    }
    match operators.pop() {
        // Discard the open parenthesis.
        Some(Token::OpenParenthesis) => Ok(()),
        _ => bail!("Mismatched parentheses"),
    }
}

fn parse_operator_token(
    operators: &mut Vec<Token>,
    output: &mut Vec<Token>,
    operator: &Operator,
) -> Result<()> {
    while let Some(Token::Operator(top_of_operator_stack)) = operators.last() {
        let should_pop = match operator.associativity() {
            Associativity::Left => operator.precedence() <= top_of_operator_stack.precedence(),
            Associativity::Right => operator.precedence() < top_of_operator_stack.precedence(),
        };
        if !should_pop {
            break;
        }
        let top_token = operators.pop().with_context(|| "No operators left.")?;
        output.push(top_token);
    }
    Ok(())
}
