//! Parameter expression parsing.

use qrew_ir::ParameterExpression;

use super::Parser;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    fn apply(self, left: ParameterExpression, right: ParameterExpression) -> ParameterExpression {
        match self {
            BinOp::Add => left + right,
            BinOp::Sub => left - right,
            BinOp::Mul => left * right,
            BinOp::Div => left / right,
        }
    }
}

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<ParameterExpression> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<ParameterExpression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = self.parse_binary_expr(prec + 1)?;
            left = op.apply(left, right);
        }

        Ok(left)
    }

    /// Parse unary expression. A minus in front of a literal folds into it.
    fn parse_unary_expr(&mut self) -> ParseResult<ParameterExpression> {
        if self.consume(&Token::Minus) {
            return Ok(match self.parse_unary_expr()? {
                ParameterExpression::Constant(v) => ParameterExpression::Constant(-v),
                expr => -expr,
            });
        }
        self.parse_primary_expr()
    }

    /// Parse primary expression.
    #[allow(clippy::cast_precision_loss)]
    fn parse_primary_expr(&mut self) -> ParseResult<ParameterExpression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(ParameterExpression::constant(v as f64))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(ParameterExpression::constant(v))
            }
            Token::Pi => {
                self.advance();
                Ok(ParameterExpression::Pi)
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(ParameterExpression::symbol(name))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            _ => None,
        }
    }

    /// Parse expression list.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<ParameterExpression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use qrew_ir::{Gate, ParameterExpression, StandardGate};

    fn first_param(source: &str) -> ParameterExpression {
        let program = parse(source).unwrap();
        let gate = program.gates().next().unwrap();
        gate.gate.parameters()[0].clone()
    }

    #[test]
    fn test_precedence() {
        let p = first_param("qubit a; rz(pi/2 + 1) a;");
        assert_eq!(
            p,
            ParameterExpression::Pi / ParameterExpression::constant(2.0)
                + ParameterExpression::constant(1.0)
        );
        assert_eq!(p.to_string(), "pi/2 + 1");
    }

    #[test]
    fn test_parentheses_and_negation() {
        let p = first_param("qubit a; p(-(pi + theta)/4) a;");
        assert_eq!(p.to_string(), "-(pi + theta)/4");
        assert!(p.is_symbolic());

        let p = first_param("qubit a; rx(-0.25) a;");
        assert_eq!(p, ParameterExpression::constant(-0.25));
    }

    #[test]
    fn test_left_associative() {
        let p = first_param("qubit a; ry(8 / 2 / 2) a;");
        assert_eq!(p.as_f64(), Some(2.0));
    }

    #[test]
    fn test_phase_alias() {
        let program = parse("qubit a; phase(pi) a;").unwrap();
        let gate = program.gates().next().unwrap();
        assert_eq!(gate.gate, Gate::from(StandardGate::P(ParameterExpression::Pi)));
    }
}
