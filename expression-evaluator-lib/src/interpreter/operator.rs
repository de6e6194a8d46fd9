use anyhow::{bail, Result};
use std::fmt;
use std::fmt::Formatter;
use std::str;

/// A mathematical operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponentiate,
    Factorial,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Exponentiate => '^',
            Operator::Factorial => '!',
        }
    }

    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 2,
            Operator::Multiply | Operator::Divide => 3,
            Operator::Exponentiate => 4,
            Operator::Factorial => 5,
        }
    }

    pub(crate) fn associativity(&self) -> Associativity {
        match self {
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide => {
                Associativity::Left
            }
            Operator::Exponentiate | Operator::Factorial => Associativity::Right,
        }
    }

    /// Whether the operator consumes a single operand (postfix factorial).
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Factorial)
    }

    /// Applies a binary operator to its operands.
    ///
    /// Division by zero is an error; exponentiation follows IEEE-754 `powf`
    /// semantics, so invalid real-domain combinations produce NaN values
    /// rather than errors.
    pub fn evaluate(&self, a: f64, b: f64) -> Result<f64> {
        match self {
            Operator::Add => Ok(a + b),
            Operator::Subtract => Ok(a - b),
            Operator::Multiply => Ok(a * b),
            Operator::Divide => {
                if b == 0.0 {
                    bail!("Division by zero");
                }
                Ok(a / b)
            }
            Operator::Exponentiate => Ok(f64::powf(a, b)),
            Operator::Factorial => bail!("Operator {} is not binary", self),
        }
    }
}

/// Computes the factorial of the operand truncated toward zero.
///
/// Factorial is undefined for negative integers, so those are rejected.
pub fn factorial(operand: f64) -> Result<f64> {
    let n = operand.trunc() as i64;
    if n < 0 {
        bail!("Invalid factorial operand");
    }
    let mut result = 1.0;
    for factor in 2..=n {
        result *= factor as f64;
    }
    Ok(result)
}

#[derive(Clone, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl str::FromStr for Operator {
    type Err = ();

    fn from_str(input: &str) -> Result<Operator, Self::Err> {
        match input {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Exponentiate),
            "!" => Ok(Operator::Factorial),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_precedence_orders_arithmetic_before_exponentiation() {
        assert!(Operator::Add.precedence() < Operator::Multiply.precedence());
        assert!(Operator::Multiply.precedence() < Operator::Exponentiate.precedence());
        assert!(Operator::Exponentiate.precedence() < Operator::Factorial.precedence());
    }

    #[test]
    fn exponentiation_is_right_associative() {
        assert!(Operator::Exponentiate.associativity() == Associativity::Right);
        assert!(Operator::Subtract.associativity() == Associativity::Left);
    }

    #[test]
    fn binary_operators_evaluate() {
        assert_eq!(Operator::Add.evaluate(2.0, 3.0).unwrap(), 5.0);
        assert_eq!(Operator::Subtract.evaluate(2.0, 3.0).unwrap(), -1.0);
        assert_eq!(Operator::Multiply.evaluate(2.0, 3.0).unwrap(), 6.0);
        assert_eq!(Operator::Divide.evaluate(3.0, 2.0).unwrap(), 1.5);
        assert_eq!(Operator::Exponentiate.evaluate(2.0, -1.0).unwrap(), 0.5);
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let error = Operator::Divide.evaluate(5.0, 0.0).unwrap_err();
        assert_eq!(error.to_string(), "Division by zero");
    }

    #[test]
    fn factorial_of_zero_and_one_is_one() {
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert_eq!(factorial(1.0).unwrap(), 1.0);
    }

    #[test]
    fn factorial_truncates_toward_zero() {
        assert_eq!(factorial(5.0).unwrap(), 120.0);
        assert_eq!(factorial(3.9).unwrap(), 6.0);
    }

    #[test]
    fn factorial_of_negative_operand_is_rejected() {
        factorial(-2.0).expect_err("Should return Err");
    }

    #[test]
    fn operator_parses_from_symbol() {
        let operator: Operator = "^".parse().unwrap();
        assert_eq!(operator, Operator::Exponentiate);
        "?".parse::<Operator>().expect_err("Should return Err");
    }
}
