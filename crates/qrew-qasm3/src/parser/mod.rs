//! Parser for flat `OpenQASM` 3 programs.

mod expression;
mod statement;

use qrew_ir::{Guard, Program};
use rustc_hash::FxHashMap;

use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a source string into a flat program.
///
/// Accepts an optional `OPENQASM 3.x;` header, `include` lines (ignored),
/// qubit and register declarations, gate applications with any chain of
/// `ctrl` / `negctrl` modifiers, and `qif q do ... end` blocks, which add a
/// `ctrl q` guard to every gate inside them.
pub fn parse(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    Ok(parser.program)
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    /// Declared names, with the register size for registers.
    pub(super) scope: FxHashMap<String, Option<u32>>,
    /// Guards of the enclosing `qif` blocks, outermost first.
    pub(super) block_guards: Vec<Guard>,
    pub(super) program: Program,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((line, message)) => {
                    return Err(ParseError::LexerError { line, message });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            scope: FxHashMap::default(),
            block_guards: Vec::new(),
            program: Program::new(),
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Build an "unexpected token" error for the current position.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                line: self.line(),
                expected: expected.into(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.into()),
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<()> {
        if self.consume(&Token::OpenQasm) {
            self.parse_version()?;
            self.expect(Token::Semicolon)?;
        }
        while !self.is_eof() {
            self.parse_statement()?;
        }
        Ok(())
    }

    /// Parse the version number; only major version 3 is accepted.
    fn parse_version(&mut self) -> ParseResult<String> {
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => format!("{v}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            Some(other) => return Err(ParseError::InvalidVersion(other.to_string())),
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };
        if !version.starts_with("3.") && version != "3" {
            return Err(ParseError::InvalidVersion(version));
        }
        Ok(version)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Identifier(_)) => match self.advance() {
                Some(Token::Identifier(s)) => Ok(s),
                _ => Err(self.unexpected("identifier")),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse an integer literal.
    pub(super) fn parse_int_literal(&mut self) -> ParseResult<u64> {
        match self.peek() {
            Some(Token::IntLiteral(v)) => {
                let v = *v;
                self.pos += 1;
                Ok(v)
            }
            _ => Err(self.unexpected("integer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrew_ir::{Declaration, GateApplication, QubitRef, StandardGate};

    #[test]
    fn test_parse_header_and_declarations() {
        let source = r#"
            OPENQASM 3.0;
            include "stdgates.inc";
            qubit a;
            qubit[3] q;
        "#;
        let program = parse(source).unwrap();
        let decls: Vec<_> = program.declarations().cloned().collect();
        assert_eq!(
            decls,
            vec![Declaration::qubit("a"), Declaration::register("q", 3)]
        );
        assert_eq!(program.gate_count(), 0);
    }

    #[test]
    fn test_header_is_optional() {
        let program = parse("qubit a; x a;").unwrap();
        assert_eq!(program.gate_count(), 1);
    }

    #[test]
    fn test_parse_guarded_gate() {
        let program = parse("qubit a; qubit b; qubit t; negctrl @ ctrl @ x a, b, t;").unwrap();
        let gate = program.gates().next().unwrap();
        let expected = GateApplication::new(StandardGate::X, [QubitRef::plain("t")])
            .negctrl(QubitRef::plain("a"))
            .ctrl(QubitRef::plain("b"));
        assert_eq!(gate, &expected);
    }

    #[test]
    fn test_parse_counted_modifiers() {
        let program = parse("qubit[4] q; ctrl(2) @ negctrl(1) @ h q[0], q[1], q[2], q[3];").unwrap();
        let gate = program.gates().next().unwrap();
        assert_eq!(gate.targets, vec![QubitRef::indexed("q", 3)]);
        assert_eq!(gate.guards.len(), 3);
        assert!(!gate.guards[0].negated);
        assert!(!gate.guards[1].negated);
        assert!(gate.guards[2].negated);
    }

    #[test]
    fn test_qif_block_guards_body() {
        let program = parse("qubit a; qubit c; qif c do h a; x a; end h a;").unwrap();
        let gates: Vec<_> = program.gates().collect();
        assert_eq!(gates.len(), 3);
        for gate in &gates[..2] {
            assert_eq!(gate.guards, vec![Guard::ctrl(QubitRef::plain("c"))]);
        }
        assert!(gates[2].guards.is_empty());
    }

    #[test]
    fn test_nested_qif_blocks() {
        let source = "qubit a; qubit b; qubit c; qubit d; qif a do qif b do negctrl @ x c, d; end end";
        let program = parse(source).unwrap();
        let gate = program.gates().next().unwrap();
        let guards: Vec<_> = gate.guards.iter().map(|g| g.qubit.to_string()).collect();
        assert_eq!(guards, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unterminated_qif() {
        assert!(matches!(
            parse("qubit a; qubit c; qif c do h a;"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_rejects_other_versions() {
        assert!(matches!(
            parse("OPENQASM 2.0; qubit a;"),
            Err(ParseError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_error_reports_line() {
        let source = "qubit a;\nqubit b;\nx a b;";
        match parse(source) {
            Err(ParseError::UnexpectedToken { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected UnexpectedToken, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_qubit() {
        assert!(matches!(
            parse("qubit a; h b;"),
            Err(ParseError::UndefinedIdentifier(name)) if name == "b"
        ));
    }
}
