//! Statement parsing.

use qrew_ir::{
    CustomGate, Declaration, Gate, GateApplication, Guard, ParameterExpression, QubitRef,
    StandardGate,
};

use super::Parser;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

/// One `ctrl(n) @` or `negctrl(n) @` prefix.
#[derive(Debug, Clone, Copy)]
struct Modifier {
    negated: bool,
    count: usize,
}

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some(Token::Include) => self.parse_include(),
            Some(Token::Qubit) => self.parse_qubit_decl(),
            Some(Token::Qif) => self.parse_qif_block(),
            Some(Token::Ctrl | Token::NegCtrl | Token::Identifier(_)) => self.parse_gate_call(),
            Some(Token::Semicolon) => {
                self.advance();
                Ok(())
            }
            Some(_) => Err(self.unexpected("statement")),
            None => Err(ParseError::UnexpectedEof("statement".into())),
        }
    }

    /// Parse and discard `include "file";`.
    fn parse_include(&mut self) -> ParseResult<()> {
        self.expect(Token::Include)?;
        self.expect(Token::StringLiteral(String::new()))?;
        self.expect(Token::Semicolon)
    }

    /// Parse `qif q do ... end`.
    fn parse_qif_block(&mut self) -> ParseResult<()> {
        self.expect(Token::Qif)?;
        let qubit = self.parse_qubit_ref()?;
        self.expect(Token::Do)?;

        self.block_guards.push(Guard::ctrl(qubit));
        while !self.consume(&Token::End) {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof("'end' closing qif block".into()));
            }
            self.parse_statement()?;
        }
        self.block_guards.pop();
        Ok(())
    }

    /// Parse `qubit name;` or `qubit[N] name;`.
    fn parse_qubit_decl(&mut self) -> ParseResult<()> {
        if !self.block_guards.is_empty() {
            return Err(ParseError::Generic(format!(
                "line {}: declarations are not allowed inside a qif block",
                self.line()
            )));
        }
        self.expect(Token::Qubit)?;

        let size = if self.consume(&Token::LBracket) {
            let line = self.line();
            let n = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            match u32::try_from(n) {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ParseError::Generic(format!(
                        "line {line}: register size must be between 1 and {}",
                        u32::MAX
                    )));
                }
            }
        } else {
            None
        };

        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;

        if self.scope.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }
        self.scope.insert(name.clone(), size);

        let declaration = match size {
            Some(n) => Declaration::register(name, n),
            None => Declaration::qubit(name),
        };
        self.program.push(declaration);
        Ok(())
    }

    /// Parse the modifier chain in front of a gate name.
    fn parse_modifiers(&mut self) -> ParseResult<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            let negated = if self.consume(&Token::Ctrl) {
                false
            } else if self.consume(&Token::NegCtrl) {
                true
            } else {
                break;
            };

            let count = if self.consume(&Token::LParen) {
                let line = self.line();
                let n = self.parse_int_literal()?;
                self.expect(Token::RParen)?;
                match usize::try_from(n) {
                    Ok(n) if n > 0 => n,
                    _ => {
                        return Err(ParseError::Generic(format!(
                            "line {line}: modifier count must be positive"
                        )));
                    }
                }
            } else {
                1
            };

            self.expect(Token::At)?;
            modifiers.push(Modifier { negated, count });
        }
        Ok(modifiers)
    }

    /// Parse a gate application, guards first.
    fn parse_gate_call(&mut self) -> ParseResult<()> {
        let modifiers = self.parse_modifiers()?;
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            vec![]
        };

        let mut operands = vec![self.parse_qubit_ref()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_qubit_ref()?);
        }
        self.expect(Token::Semicolon)?;

        let num_guards: usize = modifiers.iter().map(|m| m.count).sum();
        if operands.len() <= num_guards {
            return Err(ParseError::WrongGuardCount {
                gate: name,
                guards: num_guards,
                operands: operands.len(),
            });
        }

        let targets = operands.split_off(num_guards);
        let mut guards = self.block_guards.clone();
        guards.extend(
            modifiers
                .iter()
                .flat_map(|m| std::iter::repeat_n(m.negated, m.count))
                .zip(operands)
                .map(|(negated, qubit)| Guard { qubit, negated }),
        );

        let gate = resolve_gate(name, params, targets.len())?;
        self.program
            .push(GateApplication::new(gate, targets).with_guards(guards));
        Ok(())
    }

    /// Parse `name` or `name[index]` and check it against the declarations.
    fn parse_qubit_ref(&mut self) -> ParseResult<QubitRef> {
        let name = self.parse_identifier()?;
        let size = *self
            .scope
            .get(&name)
            .ok_or_else(|| ParseError::UndefinedIdentifier(name.clone()))?;

        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            let Some(size) = size else {
                return Err(ParseError::IndexMismatch(name, "without an index"));
            };
            match u32::try_from(index) {
                Ok(i) if i < size => Ok(QubitRef::indexed(name, i)),
                _ => Err(ParseError::IndexOutOfBounds {
                    register: name,
                    index,
                    size,
                }),
            }
        } else if size.is_some() {
            Err(ParseError::IndexMismatch(name, "with an index"))
        } else {
            Ok(QubitRef::plain(name))
        }
    }
}

/// Parameter count of a standard gate name, `None` for names we don't know.
fn standard_arity(name: &str) -> Option<usize> {
    match name {
        "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "cx" | "cy" | "cz" | "swap"
        | "ccx" => Some(0),
        "p" | "phase" | "rx" | "ry" | "rz" => Some(1),
        _ => None,
    }
}

/// Map a gate name to a standard gate, or an opaque one if unknown.
fn resolve_gate(
    name: String,
    params: Vec<ParameterExpression>,
    num_targets: usize,
) -> ParseResult<Gate> {
    let got = params.len();
    if let Some(expected) = standard_arity(&name) {
        let Some(gate) = StandardGate::from_name(&name, params) else {
            return Err(ParseError::WrongParameterCount {
                gate: name,
                expected,
                got,
            });
        };
        let expected = gate.num_qubits() as usize;
        if expected != num_targets {
            return Err(ParseError::WrongQubitCount {
                gate: name,
                expected,
                got: num_targets,
            });
        }
        return Ok(gate.into());
    }

    let num_qubits = u32::try_from(num_targets)
        .map_err(|_| ParseError::Generic(format!("too many operands for '{name}'")))?;
    Ok(CustomGate::new(name, num_qubits).with_params(params).into())
}
