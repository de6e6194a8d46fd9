use crate::interpreter::operator::Operator;
use crate::interpreter::token::{Constant, Function, FunctionValue, Token};
use anyhow::{bail, Result};

/// Characters that end a function argument at parenthesis depth zero.
const ARGUMENT_BOUNDARY: &str = "+-*/^()!";

/// Splits the given expression into a flat sequence of tokens, ending with
/// the [`Token::End`] sentinel.
///
/// A pure function of the input string: errors are returned, never partial
/// token sequences.
///
/// # Arguments
///
/// * `expression`: A text expression in infix format.
///
/// returns: The tokens of the expression.
///
/// # Examples
///
/// ```
/// use expression_evaluator::interpreter::lexer::tokenize;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tokens = tokenize("2 + \\pi")?;
/// assert_eq!(tokens.len(), 4);
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let characters: Vec<char> = expression.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut index = 0;

    while index < characters.len() {
        // Full-width parentheses are accepted as their ASCII equivalents.
        let character = match characters[index] {
            '（' => '(',
            '）' => ')',
            other => other,
        };

        if character.is_whitespace() {
            index += 1;
        } else if character.is_ascii_digit() || character == '.' {
            let literal = read_number(&characters, &mut index);
            tokens.push(parse_number(&literal)?);
        } else if character == '-' {
            if follows_value(tokens.last()) {
                tokens.push(Token::Operator(Operator::Subtract));
                index += 1;
            } else {
                // A minus in value position must start a negative literal.
                index += 1;
                let starts_number = characters
                    .get(index)
                    .map_or(false, |next| next.is_ascii_digit() || *next == '.');
                if !starts_number {
                    bail!("Invalid negative number");
                }
                let literal = format!("-{}", read_number(&characters, &mut index));
                tokens.push(parse_number(&literal)?);
            }
        } else if character == '\\' {
            index += 1;
            let mut command = String::from("\\");
            while index < characters.len() && characters[index].is_alphabetic() {
                command.push(characters[index]);
                index += 1;
            }
            tokens.push(read_command(&command, &characters, &mut index)?);
        } else if character == '(' {
            tokens.push(Token::OpenParenthesis);
            index += 1;
        } else if character == ')' {
            tokens.push(Token::CloseParenthesis);
            index += 1;
        } else if let Ok(operator) = character.to_string().parse::<Operator>() {
            tokens.push(Token::Operator(operator));
            index += 1;
        } else {
            bail!("Unknown character: {}", character);
        }
    }

    tokens.push(Token::End);
    Ok(tokens)
}

/// A minus is binary subtraction only when it follows something that already
/// produced a value.
fn follows_value(last_token: Option<&Token>) -> bool {
    match last_token {
        Some(Token::CloseParenthesis) => true,
        Some(token) => token.is_value(),
        None => false,
    }
}

fn read_number(characters: &[char], index: &mut usize) -> String {
    let mut literal = String::new();
    while *index < characters.len()
        && (characters[*index].is_ascii_digit() || characters[*index] == '.')
    {
        literal.push(characters[*index]);
        *index += 1;
    }
    literal
}

fn parse_number(literal: &str) -> Result<Token> {
    match literal.parse::<f64>() {
        Ok(value) => Ok(Token::Number(value)),
        Err(_) => bail!("Invalid number: {}", literal),
    }
}

fn read_command(command: &str, characters: &[char], index: &mut usize) -> Result<Token> {
    match command {
        "\\pi" => Ok(Token::Constant(Constant::Pi)),
        "\\e" => Ok(Token::Constant(Constant::E)),
        "\\ANS" => Ok(Token::PreviousAnswer),
        "\\sin" => read_function_value(Function::Sine, characters, index),
        "\\cos" => read_function_value(Function::Cosine, characters, index),
        "\\tan" => read_function_value(Function::Tangent, characters, index),
        "\\log" => read_function_value(Function::Logarithm, characters, index),
        command => bail!("Unknown function {}", command),
    }
}

fn read_function_value(
    function: Function,
    characters: &[char],
    index: &mut usize,
) -> Result<Token> {
    if characters.get(*index) != Some(&'_') {
        bail!("Expected '_' after function name");
    }
    *index += 1;

    let mut arguments = Vec::new();
    loop {
        arguments.push(read_argument(characters, index)?);
        if characters.get(*index) == Some(&'_') {
            *index += 1;
        } else {
            break;
        }
    }

    Ok(Token::Function(FunctionValue {
        function,
        arguments,
    }))
}

/// Reads one raw argument substring, tracking parenthesis depth so that an
/// argument containing parenthesized sub-expressions is captured whole.
fn read_argument(characters: &[char], index: &mut usize) -> Result<String> {
    let mut argument = String::new();
    let mut parenthesis_count = 0;

    while *index < characters.len() {
        let character = characters[*index];
        if character == '(' {
            parenthesis_count += 1;
        } else if character == ')' {
            parenthesis_count -= 1;
        }
        if parenthesis_count < 0 {
            bail!("Mismatched parentheses");
        }
        if character == '_' && parenthesis_count == 0 {
            break;
        }
        argument.push(character);
        *index += 1;
        let at_boundary = characters
            .get(*index)
            .map_or(true, |next| ARGUMENT_BOUNDARY.contains(*next));
        if parenthesis_count == 0 && at_boundary {
            break;
        }
    }

    Ok(argument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn number_literal_becomes_single_token() {
        let tokens = tokenize("3.14").unwrap();
        assert_eq!(tokens, vec![Token::Number(3.14), Token::End]);
    }

    #[test]
    fn whitespace_is_skipped() {
        let tokens = tokenize(" 1 + 2 ").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(1.0),
                Token::Operator(Operator::Add),
                Token::Number(2.0),
                Token::End,
            ]
        );
    }

    #[test]
    fn full_width_parentheses_are_normalized() {
        let tokens = tokenize("（1）").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpenParenthesis,
                Token::Number(1.0),
                Token::CloseParenthesis,
                Token::End,
            ]
        );
    }

    #[test]
    fn leading_minus_starts_negative_literal() {
        let tokens = tokenize("-5 + 3").unwrap();
        assert_eq!(tokens[0], Token::Number(-5.0));
    }

    #[test]
    fn minus_after_value_is_subtraction() {
        let tokens = tokenize("2-3").unwrap();
        assert_eq!(tokens[1], Token::Operator(Operator::Subtract));
    }

    #[test]
    fn minus_after_function_value_is_subtraction() {
        let tokens = tokenize("\\sin_0-3").unwrap();
        assert_eq!(tokens[1], Token::Operator(Operator::Subtract));
        assert_eq!(tokens[2], Token::Number(3.0));
    }

    #[test]
    fn minus_after_operator_starts_negative_literal() {
        let tokens = tokenize("2 - -3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Subtract),
                Token::Number(-3.0),
                Token::End,
            ]
        );
    }

    #[test]
    fn dangling_minus_is_rejected() {
        let error = tokenize("1 + -").unwrap_err();
        assert_eq!(error.to_string(), "Invalid negative number");
    }

    #[test]
    fn malformed_number_literal_is_rejected() {
        let error = tokenize("1.2.3").unwrap_err();
        assert_eq!(error.to_string(), "Invalid number: 1.2.3");
    }

    #[test]
    fn unknown_character_is_rejected() {
        let error = tokenize("2 & 3").unwrap_err();
        assert_eq!(error.to_string(), "Unknown character: &");
    }

    #[test]
    fn constants_are_recognized() {
        let tokens = tokenize("\\pi + \\e").unwrap();
        assert_eq!(tokens[0], Token::Constant(Constant::Pi));
        assert_eq!(tokens[2], Token::Constant(Constant::E));
    }

    #[test]
    fn previous_answer_is_recognized() {
        let tokens = tokenize("\\ANS * 2").unwrap();
        assert_eq!(tokens[0], Token::PreviousAnswer);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let error = tokenize("\\foo_2").unwrap_err();
        assert_eq!(error.to_string(), "Unknown function \\foo");
    }

    #[test]
    fn function_name_without_underscore_is_rejected() {
        let error = tokenize("\\sin(0)").unwrap_err();
        assert_eq!(error.to_string(), "Expected '_' after function name");
    }

    #[test]
    fn logarithm_reads_base_and_argument() {
        let tokens = tokenize("\\log_2_8").unwrap();
        assert_eq!(
            tokens[0],
            Token::Function(FunctionValue {
                function: Function::Logarithm,
                arguments: vec!["2".to_string(), "8".to_string()],
            })
        );
    }

    #[test]
    fn parenthesized_argument_is_captured_whole() {
        let tokens = tokenize("\\sin_(1+2)*3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Function(FunctionValue {
                    function: Function::Sine,
                    arguments: vec!["(1+2)".to_string()],
                }),
                Token::Operator(Operator::Multiply),
                Token::Number(3.0),
                Token::End,
            ]
        );
    }

    #[test]
    fn nested_function_argument_is_captured_whole() {
        let tokens = tokenize("\\sin_(\\log_2_8)").unwrap();
        assert_eq!(
            tokens[0],
            Token::Function(FunctionValue {
                function: Function::Sine,
                arguments: vec!["(\\log_2_8)".to_string()],
            })
        );
    }

    #[test]
    fn unbalanced_argument_parenthesis_is_rejected() {
        let error = tokenize("\\sin_)").unwrap_err();
        assert_eq!(error.to_string(), "Mismatched parentheses");
    }
}
