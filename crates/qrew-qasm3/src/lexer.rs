//! Lexer for the flat `OpenQASM` 3 subset.

use logos::Logos;

/// Tokens for flat `OpenQASM` 3 programs.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qubit")]
    Qubit,

    // Modifiers
    #[token("ctrl")]
    Ctrl,

    #[token("negctrl")]
    NegCtrl,

    // Guarded blocks
    #[token("qif")]
    Qif,

    #[token("do")]
    Do,

    #[token("end")]
    End,

    // Constants
    #[token("pi")]
    #[token("π")]
    Pi,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("@")]
    At,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qubit => write!(f, "qubit"),
            Token::Ctrl => write!(f, "ctrl"),
            Token::NegCtrl => write!(f, "negctrl"),
            Token::Qif => write!(f, "qif"),
            Token::Do => write!(f, "do"),
            Token::End => write!(f, "end"),
            Token::Pi => write!(f, "pi"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::At => write!(f, "@"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with the line it starts on.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// A lexing failure: the line and a message.
pub type LexError = (usize, String);

/// Tokenize a source string.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, LexError>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[scanned..span.start].matches('\n').count();
        scanned = span.start;
        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, line }));
        } else {
            let slice = &source[span];
            tokens.push(Err((line, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .filter_map(Result::ok)
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_version_header() {
        let tokens = tokens("OPENQASM 3.0;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::OpenQasm);
        assert!(matches!(tokens[1], Token::FloatLiteral(v) if (v - 3.0).abs() < 0.001));
        assert_eq!(tokens[2], Token::Semicolon);
    }

    #[test]
    fn test_register_declaration() {
        let tokens = tokens("qubit[2] q;");
        assert_eq!(tokens[0], Token::Qubit);
        assert_eq!(tokens[1], Token::LBracket);
        assert_eq!(tokens[2], Token::IntLiteral(2));
        assert_eq!(tokens[3], Token::RBracket);
        assert_eq!(tokens[4], Token::Identifier("q".into()));
        assert_eq!(tokens[5], Token::Semicolon);
    }

    #[test]
    fn test_modifier_chain() {
        let tokens = tokens("negctrl(2) @ ctrl @ x a, b, c, t;");
        assert_eq!(tokens[0], Token::NegCtrl);
        assert_eq!(tokens[1], Token::LParen);
        assert_eq!(tokens[2], Token::IntLiteral(2));
        assert_eq!(tokens[3], Token::RParen);
        assert_eq!(tokens[4], Token::At);
        assert_eq!(tokens[5], Token::Ctrl);
        assert_eq!(tokens[6], Token::At);
        assert_eq!(tokens[7], Token::Identifier("x".into()));
    }

    #[test]
    fn test_guarded_block() {
        let tokens = tokens("qif c do h a; end");
        assert_eq!(
            tokens,
            vec![
                Token::Qif,
                Token::Identifier("c".into()),
                Token::Do,
                Token::Identifier("h".into()),
                Token::Identifier("a".into()),
                Token::Semicolon,
                Token::End,
            ]
        );
    }

    #[test]
    fn test_keywords_are_not_prefixes() {
        // "ctrlx" and "pi2" are ordinary identifiers.
        let tokens = tokens("ctrlx pi2 qubits");
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("ctrlx".into()),
                Token::Identifier("pi2".into()),
                Token::Identifier("qubits".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_lines() {
        let source = "// header\nqubit q;\n/* block\n comment */\nh q;";
        let spanned: Vec<_> = tokenize(source).into_iter().filter_map(Result::ok).collect();
        assert_eq!(spanned.len(), 6);
        assert_eq!(spanned[0].line, 2);
        assert_eq!(spanned[3].line, 5);
    }

    #[test]
    fn test_invalid_token_reports_line() {
        let errors: Vec<_> = tokenize("qubit a;\n$").into_iter().filter_map(Result::err).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 2);
    }
}
