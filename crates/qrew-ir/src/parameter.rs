//! Gate parameter expressions.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A numeric or symbolic gate parameter, e.g. the angle of a phase gate.
///
/// Equality is structural: `pi/2` and `1.5707963267948966` are different
/// expressions even though they evaluate to the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A named, unbound parameter.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Evaluate to a number, `None` if a symbol is involved or on division by zero.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
        }
    }

    /// True if any symbol occurs in the expression.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            ParameterExpression::Add(..) | ParameterExpression::Sub(..) => 1,
            ParameterExpression::Mul(..) | ParameterExpression::Div(..) => 2,
            ParameterExpression::Neg(_) => 3,
            _ => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "pi"),
            ParameterExpression::Neg(e) => {
                write!(f, "-")?;
                e.fmt_operand(f, 4)
            }
            ParameterExpression::Add(a, b) => {
                a.fmt_operand(f, 1)?;
                write!(f, " + ")?;
                b.fmt_operand(f, 2)
            }
            ParameterExpression::Sub(a, b) => {
                a.fmt_operand(f, 1)?;
                write!(f, " - ")?;
                b.fmt_operand(f, 2)
            }
            ParameterExpression::Mul(a, b) => {
                a.fmt_operand(f, 2)?;
                write!(f, "*")?;
                b.fmt_operand(f, 3)
            }
            ParameterExpression::Div(a, b) => {
                a.fmt_operand(f, 2)?;
                write!(f, "/")?;
                b.fmt_operand(f, 3)
            }
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self {
        ParameterExpression::Neg(Box::new(self))
    }
}

macro_rules! binary_op {
    ($($trait:ident :: $method:ident => $variant:ident),* $(,)?) => {
        $(
            impl std::ops::$trait for ParameterExpression {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self {
                    ParameterExpression::$variant(Box::new(self), Box::new(rhs))
                }
            }
        )*
    };
}

binary_op! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        let half_pi = ParameterExpression::Pi / ParameterExpression::constant(2.0);
        assert!((half_pi.as_f64().unwrap() - PI / 2.0).abs() < 1e-12);
        assert!(ParameterExpression::symbol("theta").as_f64().is_none());
        let by_zero = ParameterExpression::Pi / ParameterExpression::constant(0.0);
        assert!(by_zero.as_f64().is_none());
    }

    #[test]
    fn test_display_parenthesizes_by_precedence() {
        let e = (ParameterExpression::Pi + ParameterExpression::symbol("t"))
            / ParameterExpression::constant(2.0);
        assert_eq!(e.to_string(), "(pi + t)/2");
        let e = -ParameterExpression::Pi / ParameterExpression::constant(4.0);
        assert_eq!(e.to_string(), "-pi/4");
    }

    #[test]
    fn test_structural_equality() {
        let a = ParameterExpression::Pi / ParameterExpression::constant(2.0);
        let b = ParameterExpression::constant(PI / 2.0);
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }
}
