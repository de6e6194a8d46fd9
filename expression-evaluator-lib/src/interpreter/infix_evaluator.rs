use crate::interpreter::lexer::tokenize;
use crate::interpreter::operator::Operator;
use crate::interpreter::token::{Function, FunctionValue, Token};
use crate::interpreter::trace::ReductionStep;
use crate::interpreter::EvaluationContext;
use anyhow::{anyhow, bail, Result};

/// Upper bound on function-argument re-entry and parenthesis nesting.
const MAX_NESTING_DEPTH: usize = 64;

/// Evaluates the given expression directly through recursive descent,
/// without materializing a postfix form.
///
/// One [`ReductionStep`] is recorded per binary reduction, in left-to-right
/// evaluation order. Also entered recursively to resolve the raw argument
/// substrings stored in [`FunctionValue`] tokens.
pub(crate) fn evaluate_infix(expression: &str, context: &mut EvaluationContext) -> Result<f64> {
    if context.depth >= MAX_NESTING_DEPTH {
        bail!("Expression is nested too deeply");
    }
    context.depth += 1;
    let result = parse_and_evaluate(expression, context);
    context.depth -= 1;
    result
}

fn parse_and_evaluate(expression: &str, context: &mut EvaluationContext) -> Result<f64> {
    let mut tokens = tokenize(expression)?;
    // Drop the end-of-input sentinel; the grammar stops at any token it
    // cannot consume.
    tokens.pop();

    let mut parser = InfixParser {
        tokens,
        cursor: 0,
        depth: 0,
        context,
    };
    parser.parse_expression()
}

/// Applies a named function to its raw argument substrings, each evaluated
/// through [`evaluate_infix`]. Shared by both evaluators.
pub(crate) fn evaluate_function(
    value: &FunctionValue,
    context: &mut EvaluationContext,
) -> Result<f64> {
    match value.function {
        Function::Logarithm => match &value.arguments[..] {
            [base_expression, argument_expression] => {
                let base = evaluate_infix(base_expression, context)?;
                let argument = evaluate_infix(argument_expression, context)?;
                if base <= 0.0 || base == 1.0 || argument <= 0.0 {
                    bail!("Invalid log parameters");
                }
                Ok(argument.ln() / base.ln())
            }
            _ => bail!("Invalid log format"),
        },
        Function::Sine | Function::Cosine | Function::Tangent => match &value.arguments[..] {
            [argument_expression] => {
                let argument = evaluate_infix(argument_expression, context)?;
                Ok(match value.function {
                    Function::Sine => argument.sin(),
                    Function::Cosine => argument.cos(),
                    _ => argument.tan(),
                })
            }
            _ => bail!("Invalid function arguments: {}", value),
        },
    }
}

/// Cursor over a token sequence, descending through the three precedence
/// tiers of the grammar.
struct InfixParser<'a, 'b> {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
    context: &'a mut EvaluationContext<'b>,
}

impl InfixParser<'_, '_> {
    /// expression := term (('+' | '-') term)*
    fn parse_expression(&mut self) -> Result<f64> {
        let mut result = self.parse_term()?;
        while let Some(operator) = self.peek_operator(&[Operator::Add, Operator::Subtract]) {
            self.cursor += 1;
            let term = self.parse_term()?;
            result = self.reduce(result, operator, term)?;
        }
        Ok(result)
    }

    /// term := factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<f64> {
        let mut result = self.parse_factor()?;
        while let Some(operator) = self.peek_operator(&[Operator::Multiply, Operator::Divide]) {
            self.cursor += 1;
            let factor = self.parse_factor()?;
            result = self.reduce(result, operator, factor)?;
        }
        Ok(result)
    }

    /// factor := '(' expression ')' | value
    fn parse_factor(&mut self) -> Result<f64> {
        match self.tokens.get(self.cursor) {
            Some(Token::OpenParenthesis) => {
                self.cursor += 1;
                self.depth += 1;
                if self.depth >= MAX_NESTING_DEPTH {
                    bail!("Expression is nested too deeply");
                }
                let result = self.parse_expression()?;
                self.depth -= 1;
                match self.tokens.get(self.cursor) {
                    Some(Token::CloseParenthesis) => {
                        self.cursor += 1;
                        Ok(result)
                    }
                    _ => bail!("Mismatched parentheses"),
                }
            }
            _ => self.parse_value(),
        }
    }

    /// value := number | previous answer | constant | function value
    fn parse_value(&mut self) -> Result<f64> {
        let token = match self.tokens.get(self.cursor) {
            Some(token) => token.clone(),
            None => bail!("Unexpected end of expression"),
        };
        self.cursor += 1;

        match token {
            Token::Number(value) => Ok(value),
            Token::PreviousAnswer => self
                .context
                .previous_result
                .ok_or_else(|| anyhow!("No previous result")),
            Token::Constant(constant) => Ok(constant.value()),
            Token::Function(ref value) => evaluate_function(value, self.context),
            token => bail!("Invalid value: {}", token),
        }
    }

    fn peek_operator(&self, expected: &[Operator]) -> Option<Operator> {
        match self.tokens.get(self.cursor) {
            Some(Token::Operator(operator)) if expected.contains(operator) => Some(*operator),
            _ => None,
        }
    }

    fn reduce(&mut self, left: f64, operator: Operator, right: f64) -> Result<f64> {
        let result = operator.evaluate(left, right)?;
        let step = self.context.reduction_steps.len() + 1;
        self.context.reduction_steps.push(ReductionStep {
            step,
            operation: format!("{} {} {}", left, operator, right),
            result: result.to_string(),
        });
        Ok(result)
    }
}
