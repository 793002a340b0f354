use logos::Logos;
use std::fmt;

/// Tokens of the script code surrounding markup.
///
/// The lexer only needs enough of the language to keep brackets balanced,
/// step over strings and comments, and decide whether a `<` opens markup.
/// Markup itself and template literal bodies are scanned by the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f\u{feff}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    /// `/*` with no terminator; a complete comment is skipped by the longer match
    #[token("/*")]
    UnterminatedComment,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9A-Za-z_]*)?", |lex| lex.slice())]
    #[regex(r"\.[0-9][0-9A-Za-z_]*", |lex| lex.slice())]
    Number(&'src str),

    #[token("`")]
    Backtick,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token("=>")]
    Arrow,

    #[token("=")]
    Assign,

    #[token("...")]
    Spread,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("!")]
    Bang,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("??")]
    Nullish,

    /// Compound assignment and comparison operators
    #[regex(r"[-+*/%&|^]=|\*\*=?|&&=|\|\|=|\?\?=|<<=?|>>>?=?|<=|>=|===?|!==?")]
    Operator,

    #[regex(r"[-+*/%&|^~.@#]")]
    Punct,
}

impl<'src> Token<'src> {
    /// Whether an expression may begin right after this token.
    ///
    /// Markup is only recognized in expression position, which keeps
    /// comparisons (`a < b`) and type arguments (`useState<T>()`) out of it.
    pub fn begins_expression(&self) -> bool {
        match self {
            Token::Ident(word) => matches!(
                *word,
                "return"
                    | "yield"
                    | "default"
                    | "case"
                    | "else"
                    | "do"
                    | "await"
                    | "typeof"
                    | "void"
                    | "in"
                    | "of"
            ),
            Token::LBrace
            | Token::LParen
            | Token::LBracket
            | Token::Arrow
            | Token::Assign
            | Token::Spread
            | Token::Comma
            | Token::Semicolon
            | Token::Colon
            | Token::Question
            | Token::Bang
            | Token::AndAnd
            | Token::OrOr
            | Token::Nullish => true,
            _ => false,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::UnterminatedComment => write!(f, "/*"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Backtick => write!(f, "`"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LAngle => write!(f, "<"),
            Token::RAngle => write!(f, ">"),
            Token::Arrow => write!(f, "=>"),
            Token::Assign => write!(f, "="),
            Token::Spread => write!(f, "..."),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Colon => write!(f, ":"),
            Token::Question => write!(f, "?"),
            Token::Bang => write!(f, "!"),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Nullish => write!(f, "??"),
            Token::Operator => write!(f, "operator"),
            Token::Punct => write!(f, "punctuation"),
        }
    }
}

/// Tokenize a source string, dropping anything the lexer rejects
pub fn tokenize(source: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
