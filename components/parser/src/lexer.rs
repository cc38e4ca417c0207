//! NumScript lexer - tokenizes script source into tokens
//!
//! Spaces and tabs are skipped, comments are discarded, and every line
//! break becomes a [`TokenKind::Newline`] token because the grammar uses
//! newlines as statement and clause terminators.

use crate::ast::TypeTag;
use crate::error::{unexpected_character, unterminated_comment, unterminated_string};
use core_types::{ScriptError, SourcePosition};
use serde::Serialize;

/// NumScript keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    /// vars keyword
    Vars,
    /// meta keyword
    Meta,
    /// set_tx_meta keyword
    SetTxMeta,
    /// set_account_meta keyword
    SetAccountMeta,
    /// print keyword
    Print,
    /// fail keyword
    Fail,
    /// send keyword
    Send,
    /// source keyword
    Source,
    /// from keyword
    From,
    /// max keyword
    Max,
    /// destination keyword
    Destination,
    /// to keyword
    To,
    /// allocate keyword (reserved)
    Allocate,
    /// remaining keyword
    Remaining,
    /// kept keyword
    Kept,
    /// balance keyword
    Balance,
    /// save keyword
    Save,
    /// `allowing overdraft up to` phrase
    AllowingOverdraftUpTo,
    /// `allowing unbounded overdraft` phrase
    AllowingUnboundedOverdraft,
}

const WORD_KEYWORDS: [Keyword; 17] = [
    Keyword::Vars,
    Keyword::Meta,
    Keyword::SetTxMeta,
    Keyword::SetAccountMeta,
    Keyword::Print,
    Keyword::Fail,
    Keyword::Send,
    Keyword::Source,
    Keyword::From,
    Keyword::Max,
    Keyword::Destination,
    Keyword::To,
    Keyword::Allocate,
    Keyword::Remaining,
    Keyword::Kept,
    Keyword::Balance,
    Keyword::Save,
];

const PHRASE_KEYWORDS: [Keyword; 2] = [
    Keyword::AllowingOverdraftUpTo,
    Keyword::AllowingUnboundedOverdraft,
];

impl Keyword {
    /// Source spelling of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Vars => "vars",
            Keyword::Meta => "meta",
            Keyword::SetTxMeta => "set_tx_meta",
            Keyword::SetAccountMeta => "set_account_meta",
            Keyword::Print => "print",
            Keyword::Fail => "fail",
            Keyword::Send => "send",
            Keyword::Source => "source",
            Keyword::From => "from",
            Keyword::Max => "max",
            Keyword::Destination => "destination",
            Keyword::To => "to",
            Keyword::Allocate => "allocate",
            Keyword::Remaining => "remaining",
            Keyword::Kept => "kept",
            Keyword::Balance => "balance",
            Keyword::Save => "save",
            Keyword::AllowingOverdraftUpTo => "allowing overdraft up to",
            Keyword::AllowingUnboundedOverdraft => "allowing unbounded overdraft",
        }
    }

    /// Single-word keyword spelled `word`, if any
    pub fn from_word(word: &str) -> Option<Self> {
        WORD_KEYWORDS.iter().copied().find(|k| k.as_str() == word)
    }
}

/// NumScript punctuators (operators and delimiters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Comma
    Comma,
    /// Colon
    Colon,
    /// Question mark
    Question,
    /// Star (all of an asset)
    Star,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Percent sign on its own (reserved)
    Percent,
    /// Assignment
    Assign,
    /// Equality
    EqEq,
    /// Inequality
    NotEq,
    /// Logical NOT
    Not,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Logical AND
    AndAnd,
    /// Logical OR
    OrOr,
}

impl Punctuator {
    /// Source spelling of the punctuator
    pub fn as_str(&self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::Comma => ",",
            Punctuator::Colon => ":",
            Punctuator::Question => "?",
            Punctuator::Star => "*",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Percent => "%",
            Punctuator::Assign => "=",
            Punctuator::EqEq => "==",
            Punctuator::NotEq => "!=",
            Punctuator::Not => "!",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
        }
    }
}

/// Category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Keyword or keyword phrase
    Keyword(Keyword),
    /// Type keyword used in `vars` declarations
    Type(TypeTag),
    /// Punctuator/operator
    Punctuator(Punctuator),
    /// `"..."` string literal
    String,
    /// `50%`, `12.5%` or `1/3` portion literal
    Portion,
    /// Decimal integer literal
    Number,
    /// `@name:segment` account address
    Account,
    /// `USD/2` asset code
    Asset,
    /// `$name` variable
    Variable,
    /// Line break
    Newline,
    /// End of input
    EOF,
}

impl TokenKind {
    /// Short human description used in "expected ..." diagnostics
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(k) => format!("`{}`", k.as_str()),
            TokenKind::Type(ty) => format!("`{}`", ty.keyword()),
            TokenKind::Punctuator(p) => format!("`{}`", p.as_str()),
            TokenKind::String => "string".to_string(),
            TokenKind::Portion => "portion".to_string(),
            TokenKind::Number => "number".to_string(),
            TokenKind::Account => "account".to_string(),
            TokenKind::Asset => "asset".to_string(),
            TokenKind::Variable => "variable".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::EOF => "end of input".to_string(),
        }
    }
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token category
    pub kind: TokenKind,
    /// Source text of the token, sigils and quotes included
    pub lexeme: String,
    /// Position of the first character
    pub position: SourcePosition,
}

impl Token {
    /// Create a token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// 1-based line of the token
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// 1-based column of the token
    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// How the token is named in a "found ..." diagnostic
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Newline | TokenKind::EOF => self.kind.describe(),
            _ => format!("`{}`", self.lexeme),
        }
    }
}

/// Lexer for NumScript source
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Scan the whole source, ending with a single `EOF` token
    pub fn tokenize(self) -> Result<Vec<Token>, ScriptError> {
        self.collect()
    }

    /// Get the next token from the source; returns `EOF` repeatedly at the end
    pub fn next_token(&mut self) -> Result<Token, ScriptError> {
        self.skip_whitespace_and_comments()?;

        let start = self.current_position();
        if self.is_at_end() {
            return Ok(Token::new(TokenKind::EOF, "", start));
        }

        match self.peek() {
            '\n' | '\r' => {
                let lexeme = self.consume_line_break();
                Ok(Token::new(TokenKind::Newline, lexeme, start))
            }
            '"' => self.scan_string(start),
            '@' => self.scan_account(start),
            '$' => self.scan_variable(start),
            '0'..='9' => Ok(self.scan_numeric(start)),
            'A'..='Z' => {
                let len = self.run_length(self.position, is_asset_char);
                Ok(self.take_token(TokenKind::Asset, len, start))
            }
            'a'..='z' | '_' => self.scan_word(start),
            _ => self.scan_punctuator(start),
        }
    }

    fn scan_string(&mut self, start: SourcePosition) -> Result<Token, ScriptError> {
        let mut lexeme = String::from(self.advance());
        loop {
            if self.is_at_end() {
                return Err(unterminated_string(start));
            }
            match self.peek() {
                '"' => {
                    lexeme.push(self.advance());
                    return Ok(Token::new(TokenKind::String, lexeme, start));
                }
                '\n' | '\r' => {
                    let brk = self.consume_line_break();
                    lexeme.push_str(&brk);
                }
                _ => lexeme.push(self.advance()),
            }
        }
    }

    fn scan_account(&mut self, start: SourcePosition) -> Result<Token, ScriptError> {
        let head = self.position + 1;
        if !self.char_at(head).map_or(false, |c| c.is_ascii_alphabetic() || c == '_') {
            return Err(unexpected_character('@', start));
        }
        let len = 1 + self.run_length(head, |c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
        Ok(self.take_token(TokenKind::Account, len, start))
    }

    fn scan_variable(&mut self, start: SourcePosition) -> Result<Token, ScriptError> {
        let head = self.position + 1;
        if !self.char_at(head).map_or(false, |c| c.is_ascii_lowercase() || c == '_') {
            return Err(unexpected_character('$', start));
        }
        let len = 1 + self.run_length(head, |c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        Ok(self.take_token(TokenKind::Variable, len, start))
    }

    /// Digit-initial lexemes: the longest of portion, number and asset wins,
    /// ties resolved in that order.
    fn scan_numeric(&mut self, start: SourcePosition) -> Token {
        let number_len = self.run_length(self.position, |c| c.is_ascii_digit());
        let portion_len = self.portion_length(self.position + number_len).map(|end| end - self.position);
        let asset_len = self.run_length(self.position, is_asset_char);

        match portion_len {
            Some(len) if len >= asset_len => self.take_token(TokenKind::Portion, len, start),
            _ if number_len >= asset_len => self.take_token(TokenKind::Number, number_len, start),
            _ => self.take_token(TokenKind::Asset, asset_len, start),
        }
    }

    /// End offset of a portion whose leading digits stop at `digits_end`:
    /// `D+ ('.' D+)? '%'` or `D+ ' '? '/' ' '? D+`.
    fn portion_length(&self, digits_end: usize) -> Option<usize> {
        let mut i = digits_end;
        if self.char_at(i) == Some('.') {
            let fraction = self.run_length(i + 1, |c| c.is_ascii_digit());
            if fraction > 0 && self.char_at(i + 1 + fraction) == Some('%') {
                return Some(i + 2 + fraction);
            }
            return None;
        }
        if self.char_at(i) == Some('%') {
            return Some(i + 1);
        }

        if self.char_at(i) == Some(' ') {
            i += 1;
        }
        if self.char_at(i) != Some('/') {
            return None;
        }
        i += 1;
        if self.char_at(i) == Some(' ') {
            i += 1;
        }
        let denominator = self.run_length(i, |c| c.is_ascii_digit());
        if denominator == 0 {
            return None;
        }
        Some(i + denominator)
    }

    fn scan_word(&mut self, start: SourcePosition) -> Result<Token, ScriptError> {
        for phrase in PHRASE_KEYWORDS {
            if self.starts_with(phrase.as_str()) {
                let len = phrase.as_str().chars().count();
                return Ok(self.take_token(TokenKind::Keyword(phrase), len, start));
            }
        }

        let len = self.run_length(self.position, |c| c.is_ascii_lowercase() || c == '_');
        let word: String = self.chars[self.position..self.position + len].iter().collect();
        if let Some(keyword) = Keyword::from_word(&word) {
            return Ok(self.take_token(TokenKind::Keyword(keyword), len, start));
        }
        if let Some(ty) = TypeTag::from_keyword(&word) {
            return Ok(self.take_token(TokenKind::Type(ty), len, start));
        }
        Err(unexpected_character(self.peek(), start))
    }

    fn scan_punctuator(&mut self, start: SourcePosition) -> Result<Token, ScriptError> {
        let ch = self.advance();
        let punctuator = match ch {
            '(' => Punctuator::LParen,
            ')' => Punctuator::RParen,
            '[' => Punctuator::LBracket,
            ']' => Punctuator::RBracket,
            '{' => Punctuator::LBrace,
            '}' => Punctuator::RBrace,
            ',' => Punctuator::Comma,
            ':' => Punctuator::Colon,
            '?' => Punctuator::Question,
            '*' => Punctuator::Star,
            '+' => Punctuator::Plus,
            '-' => Punctuator::Minus,
            '%' => Punctuator::Percent,
            '=' => {
                if self.match_char('=') {
                    Punctuator::EqEq
                } else {
                    Punctuator::Assign
                }
            }
            '!' => {
                if self.match_char('=') {
                    Punctuator::NotEq
                } else {
                    Punctuator::Not
                }
            }
            '<' => {
                if self.match_char('=') {
                    Punctuator::LtEq
                } else {
                    Punctuator::Lt
                }
            }
            '>' => {
                if self.match_char('=') {
                    Punctuator::GtEq
                } else {
                    Punctuator::Gt
                }
            }
            '&' if self.match_char('&') => Punctuator::AndAnd,
            '|' if self.match_char('|') => Punctuator::OrOr,
            _ => return Err(unexpected_character(ch, start)),
        };
        Ok(Token::new(TokenKind::Punctuator(punctuator), punctuator.as_str(), start))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ScriptError> {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    // The line break stays in the input and becomes a Newline token.
                    while !self.is_at_end() && !matches!(self.peek(), '\n' | '\r') {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    /// Block comments nest: `/* a /* b */ c */` is a single comment.
    fn skip_block_comment(&mut self) -> Result<(), ScriptError> {
        let start = self.current_position();
        let mut depth = 0usize;
        loop {
            if self.is_at_end() {
                return Err(unterminated_comment(start));
            }
            if self.peek() == '/' && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                depth += 1;
            } else if self.peek() == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            } else if matches!(self.peek(), '\n' | '\r') {
                self.consume_line_break();
            } else {
                self.advance();
            }
        }
    }

    /// Consume one `\r\n`, `\n` or `\r` and move to the next line.
    fn consume_line_break(&mut self) -> String {
        let mut lexeme = String::from(self.advance());
        if lexeme == "\r" && self.char_at(self.position) == Some('\n') {
            lexeme.push(self.advance());
        }
        self.line += 1;
        self.column = 1;
        lexeme
    }

    fn take_token(&mut self, kind: TokenKind, len: usize, start: SourcePosition) -> Token {
        let lexeme: String = (0..len).map(|_| self.advance()).collect();
        Token::new(kind, lexeme, start)
    }

    fn run_length(&self, from: usize, accept: impl Fn(char) -> bool) -> usize {
        self.chars
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|c| accept(**c)).count())
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.char_at(self.position + i) == Some(c))
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    fn peek(&self) -> char {
        self.char_at(self.position).unwrap_or('\0')
    }

    fn peek_next(&self) -> Option<char> {
        self.char_at(self.position + 1)
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.column += 1;
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.char_at(self.position) != Some(expected) {
            false
        } else {
            self.position += 1;
            self.column += 1;
            true
        }
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }
}

/// Yields tokens up to and including `EOF`, or up to the first error.
impl Iterator for Lexer {
    type Item = Result<Token, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(&result, Ok(Token { kind: TokenKind::EOF, .. }) | Err(_)) {
            self.finished = true;
        }
        Some(result)
    }
}

fn is_asset_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '/'
}
