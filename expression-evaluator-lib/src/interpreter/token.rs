use crate::interpreter::operator::Operator;
use std::fmt;
use std::fmt::Formatter;

/// A discrete part of an expression
#[derive(Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    OpenParenthesis,
    CloseParenthesis,
    Constant(Constant),
    PreviousAnswer,
    Function(FunctionValue),
    /// End-of-input sentinel, also used as the converter's bottom-of-stack marker.
    End,
}

impl Token {
    /// A 'value' is a token that either represents, contains or resolves to
    /// a numerical value.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Constant(_) | Token::PreviousAnswer | Token::Function(_)
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Operator(operator) => write!(f, "{}", operator),
            Token::OpenParenthesis => write!(f, "("),
            Token::CloseParenthesis => write!(f, ")"),
            Token::Constant(constant) => write!(f, "{}", constant),
            Token::PreviousAnswer => write!(f, "\\ANS"),
            Token::Function(value) => write!(f, "{}", value),
            Token::End => write!(f, "#"),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A named mathematical constant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Pi => write!(f, "\\pi"),
            Constant::E => write!(f, "\\e"),
        }
    }
}

/// A named function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Sine,
    Cosine,
    Tangent,
    Logarithm,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Function::Sine => "\\sin",
            Function::Cosine => "\\cos",
            Function::Tangent => "\\tan",
            Function::Logarithm => "\\log",
        };
        write!(f, "{}", name)
    }
}

/// A function call whose arguments are kept as raw substrings, parsed only
/// when the value is actually evaluated.
#[derive(Clone, PartialEq)]
pub struct FunctionValue {
    pub function: Function,
    pub arguments: Vec<String>,
}

impl fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function)?;
        for argument in &self.arguments {
            write!(f, "_{}", argument)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_displays_without_trailing_zeroes() {
        assert_eq!(Token::Number(3.5).to_string(), "3.5");
        assert_eq!(Token::Number(14.0).to_string(), "14");
    }

    #[test]
    fn function_value_displays_in_command_syntax() {
        let token = Token::Function(FunctionValue {
            function: Function::Logarithm,
            arguments: vec!["2".to_string(), "8".to_string()],
        });
        assert_eq!(token.to_string(), "\\log_2_8");
    }

    #[test]
    fn end_sentinel_displays_as_bottom_marker() {
        assert_eq!(Token::End.to_string(), "#");
    }

    #[test]
    fn value_tokens_are_recognized() {
        assert!(Token::Number(1.0).is_value());
        assert!(Token::Constant(Constant::Pi).is_value());
        assert!(Token::PreviousAnswer.is_value());
        assert!(!Token::OpenParenthesis.is_value());
        assert!(!Token::Operator(Operator::Add).is_value());
    }
}
