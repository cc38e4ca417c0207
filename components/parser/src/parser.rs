//! Recursive descent parser for NumScript
//!
//! Statements, sources and destinations are parsed by one function per
//! grammar rule. Binary operators go through a single precedence-climbing
//! loop driven by [`binary_operator`]. Where two block shapes share an
//! opening `{`, the parser looks ahead past newlines at the first entry to
//! pick the rule.

use std::collections::VecDeque;

use crate::ast::*;
use crate::error::*;
use crate::lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
use core_types::{ScriptError, SourcePosition};

type TokenResult = Result<Token, ScriptError>;

/// Token kinds that can start an expression, as listed in diagnostics.
const EXPRESSION_START: [&str; 9] = [
    "`!`", "`(`", "`[`", "account", "asset", "number", "portion", "string", "variable",
];

/// Deepest nesting of expressions, sources and destinations accepted.
pub const MAX_NESTING: usize = 128;

const STATEMENT_START: [Keyword; 6] = [
    Keyword::Print,
    Keyword::Save,
    Keyword::SetTxMeta,
    Keyword::SetAccountMeta,
    Keyword::Fail,
    Keyword::Send,
];

/// Binary operators, ranked by [`binary_operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOperator {
    Or,
    And,
    Comparison(ComparisonOp),
    AddSub(AddSubOp),
}

impl BinaryOperator {
    fn build(self, lhs: Expr, rhs: Expr) -> Expr {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            BinaryOperator::Or => Expr::LogicalOr { lhs, rhs },
            BinaryOperator::And => Expr::LogicalAnd { lhs, rhs },
            BinaryOperator::Comparison(op) => Expr::Comparison { op, lhs, rhs },
            BinaryOperator::AddSub(op) => Expr::AddSub { op, lhs, rhs },
        }
    }
}

/// Operator precedence table. Higher binds tighter; all levels are
/// left-associative.
fn binary_operator(kind: TokenKind) -> Option<(BinaryOperator, u8)> {
    let TokenKind::Punctuator(p) = kind else {
        return None;
    };
    let entry = match p {
        Punctuator::OrOr => (BinaryOperator::Or, 1),
        Punctuator::AndAnd => (BinaryOperator::And, 2),
        Punctuator::EqEq => (BinaryOperator::Comparison(ComparisonOp::Eq), 3),
        Punctuator::NotEq => (BinaryOperator::Comparison(ComparisonOp::NotEq), 3),
        Punctuator::Lt => (BinaryOperator::Comparison(ComparisonOp::Lt), 3),
        Punctuator::LtEq => (BinaryOperator::Comparison(ComparisonOp::LtEq), 3),
        Punctuator::Gt => (BinaryOperator::Comparison(ComparisonOp::Gt), 3),
        Punctuator::GtEq => (BinaryOperator::Comparison(ComparisonOp::GtEq), 3),
        Punctuator::Plus => (BinaryOperator::AddSub(AddSubOp::Add), 4),
        Punctuator::Minus => (BinaryOperator::AddSub(AddSubOp::Sub), 4),
        _ => return None,
    };
    Some(entry)
}

fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::String
            | TokenKind::Portion
            | TokenKind::Number
            | TokenKind::Account
            | TokenKind::Asset
            | TokenKind::Variable
            | TokenKind::Punctuator(Punctuator::Not)
            | TokenKind::Punctuator(Punctuator::LParen)
            | TokenKind::Punctuator(Punctuator::LBracket)
    )
}

/// Operand following `send` or `save`: either an expression or `[<asset> *]`.
enum MonetaryOperand {
    Expr(Expr),
    All(MonetaryAll),
}

/// NumScript parser
pub struct Parser<'a> {
    tokens: Box<dyn Iterator<Item = TokenResult> + 'a>,
    lookahead: VecDeque<Token>,
    last_position: SourcePosition,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code
    pub fn new(source: &'a str) -> Self {
        Self::from_iter(Lexer::new(source))
    }

    /// Create a parser over an already-scanned token sequence.
    ///
    /// A missing trailing `EOF` token is supplied at the position of the last
    /// token read so far, or of the last consumed token when none is buffered.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::from_iter(tokens.into_iter().map(Ok))
    }

    fn from_iter(tokens: impl Iterator<Item = TokenResult> + 'a) -> Self {
        Self {
            tokens: Box::new(tokens),
            lookahead: VecDeque::new(),
            last_position: SourcePosition::start(),
            depth: 0,
        }
    }

    /// Parse the whole input into a [`Script`]
    pub fn parse(&mut self) -> Result<Script, ScriptError> {
        self.skip_newlines()?;

        let variables = if self.check_keyword(Keyword::Vars)? {
            self.parse_vars_block()?
        } else {
            Vec::new()
        };

        let mut statements = vec![self.parse_statement()?];
        loop {
            match self.peek_kind()? {
                TokenKind::EOF => break,
                TokenKind::Newline => {
                    self.skip_newlines()?;
                    if self.check(TokenKind::EOF)? {
                        break;
                    }
                    statements.push(self.parse_statement()?);
                }
                _ => return Err(self.error_here(["newline", "end of input"])?),
            }
        }

        Ok(Script {
            variables,
            statements,
        })
    }

    // ---------------------------------------------------------------
    // Variable declarations
    // ---------------------------------------------------------------

    /// `vars { NL+ (<decl> NL+)+ } NL+`
    fn parse_vars_block(&mut self) -> Result<Vec<VarDecl>, ScriptError> {
        self.expect_keyword(Keyword::Vars)?;
        self.expect_punctuator(Punctuator::LBrace)?;
        self.expect_newlines()?;

        let mut decls = Vec::new();
        loop {
            match self.peek_kind()? {
                TokenKind::Type(_) => {
                    decls.push(self.parse_var_decl()?);
                    self.expect_newlines()?;
                }
                TokenKind::Punctuator(Punctuator::RBrace) if !decls.is_empty() => break,
                _ => {
                    let mut expected: Vec<String> =
                        TypeTag::ALL.iter().map(|ty| TokenKind::Type(*ty).describe()).collect();
                    if !decls.is_empty() {
                        expected.push(TokenKind::Punctuator(Punctuator::RBrace).describe());
                    }
                    return Err(self.error_here(expected)?);
                }
            }
        }

        self.expect_punctuator(Punctuator::RBrace)?;
        self.expect_newlines()?;
        Ok(decls)
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, ScriptError> {
        let token = self.advance()?;
        let TokenKind::Type(ty) = token.kind else {
            return Err(syntax_error("expected a type keyword", token.position));
        };
        let name = self.parse_variable()?;

        let origin = if self.check_punctuator(Punctuator::Assign)? {
            self.advance()?;
            Some(self.parse_origin()?)
        } else {
            None
        };

        Ok(VarDecl { ty, name, origin })
    }

    /// `meta(<expr>, "<key>")` or `balance(<expr>, <expr>)`
    fn parse_origin(&mut self) -> Result<Origin, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Keyword(Keyword::Meta) => {
                self.advance()?;
                self.expect_punctuator(Punctuator::LParen)?;
                let account = self.parse_expression()?;
                self.expect_punctuator(Punctuator::Comma)?;
                let key = self.parse_string()?;
                self.expect_punctuator(Punctuator::RParen)?;
                Ok(Origin::MetaOf { account, key })
            }
            TokenKind::Keyword(Keyword::Balance) => {
                self.advance()?;
                self.expect_punctuator(Punctuator::LParen)?;
                let account = self.parse_expression()?;
                self.expect_punctuator(Punctuator::Comma)?;
                let asset = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RParen)?;
                Ok(Origin::BalanceOf { account, asset })
            }
            _ => Err(self.error_here(["`meta`", "`balance`"])?),
        }
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Keyword(Keyword::Print) => {
                self.advance()?;
                let expr = self.parse_expression()?;
                Ok(Statement::Print { expr })
            }
            TokenKind::Keyword(Keyword::Save) => {
                self.advance()?;
                let amount = match self.parse_monetary_operand()? {
                    MonetaryOperand::Expr(expr) => SaveAmount::Monetary(expr),
                    MonetaryOperand::All(all) => SaveAmount::All(all),
                };
                self.expect_keyword(Keyword::From)?;
                let account = self.parse_expression()?;
                Ok(Statement::Save { amount, account })
            }
            TokenKind::Keyword(Keyword::SetTxMeta) => {
                self.advance()?;
                self.expect_punctuator(Punctuator::LParen)?;
                let key = self.parse_string()?;
                self.expect_punctuator(Punctuator::Comma)?;
                let value = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RParen)?;
                Ok(Statement::SetTxMeta { key, value })
            }
            TokenKind::Keyword(Keyword::SetAccountMeta) => {
                self.advance()?;
                self.expect_punctuator(Punctuator::LParen)?;
                let account = self.parse_expression()?;
                self.expect_punctuator(Punctuator::Comma)?;
                let key = self.parse_string()?;
                self.expect_punctuator(Punctuator::Comma)?;
                let value = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RParen)?;
                Ok(Statement::SetAccountMeta {
                    account,
                    key,
                    value,
                })
            }
            TokenKind::Keyword(Keyword::Fail) => {
                self.advance()?;
                Ok(Statement::Fail)
            }
            TokenKind::Keyword(Keyword::Send) => self.parse_send(),
            _ => {
                let expected = STATEMENT_START.iter().map(|k| TokenKind::Keyword(*k).describe());
                Err(self.error_here(expected)?)
            }
        }
    }

    /// `send <monetary> ( NL+ <clauses> NL+ )`
    fn parse_send(&mut self) -> Result<Statement, ScriptError> {
        self.expect_keyword(Keyword::Send)?;
        let operand = self.parse_monetary_operand()?;
        self.expect_punctuator(Punctuator::LParen)?;
        self.expect_newlines()?;

        let statement = match operand {
            MonetaryOperand::Expr(monetary) => Statement::Send {
                monetary,
                clauses: self.parse_send_clauses(Self::parse_value_aware_source)?,
            },
            MonetaryOperand::All(monetary) => Statement::SendAll {
                monetary,
                clauses: self.parse_send_clauses(Self::parse_send_all_source)?,
            },
        };

        self.expect_newlines()?;
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(statement)
    }

    /// `source = … NL+ destination = …` in either order
    fn parse_send_clauses<S>(
        &mut self,
        parse_source: fn(&mut Self) -> Result<S, ScriptError>,
    ) -> Result<SendClauses<S>, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Keyword(Keyword::Source) => {
                self.advance()?;
                self.expect_punctuator(Punctuator::Assign)?;
                let source = parse_source(self)?;
                self.expect_newlines()?;
                self.expect_keyword(Keyword::Destination)?;
                self.expect_punctuator(Punctuator::Assign)?;
                let destination = self.parse_destination()?;
                Ok(SendClauses {
                    source,
                    destination,
                })
            }
            TokenKind::Keyword(Keyword::Destination) => {
                self.advance()?;
                self.expect_punctuator(Punctuator::Assign)?;
                let destination = self.parse_destination()?;
                self.expect_newlines()?;
                self.expect_keyword(Keyword::Source)?;
                self.expect_punctuator(Punctuator::Assign)?;
                let source = parse_source(self)?;
                Ok(SendClauses {
                    source,
                    destination,
                })
            }
            _ => Err(self.error_here(["`source`", "`destination`"])?),
        }
    }

    /// Operand of `send`/`save`. A leading `[` is either `[<asset> *]` or a
    /// monetary literal, which may then continue as a larger expression.
    fn parse_monetary_operand(&mut self) -> Result<MonetaryOperand, ScriptError> {
        if !self.check_punctuator(Punctuator::LBracket)? {
            return Ok(MonetaryOperand::Expr(self.parse_expression()?));
        }

        self.advance()?;
        let asset = self.parse_expression()?;
        if self.check_punctuator(Punctuator::Star)? {
            self.advance()?;
            self.expect_punctuator(Punctuator::RBracket)?;
            return Ok(MonetaryOperand::All(MonetaryAll { asset }));
        }

        let amount = self.parse_expression()?;
        self.expect_punctuator(Punctuator::RBracket)?;
        let head = Expr::monetary(asset, amount);
        Ok(MonetaryOperand::Expr(self.parse_expression_from(head)?))
    }

    // ---------------------------------------------------------------
    // Sources
    // ---------------------------------------------------------------

    fn parse_value_aware_source(&mut self) -> Result<ValueAwareSource, ScriptError> {
        if self.is_source_allotment()? {
            let entries = self.parse_block(|p| {
                let portion = p.parse_allotment_portion()?;
                p.expect_keyword(Keyword::From)?;
                let source = p.parse_source()?;
                Ok(SourceAllotment { portion, source })
            })?;
            return Ok(ValueAwareSource::Allotted { entries });
        }
        Ok(ValueAwareSource::Plain(self.parse_source()?))
    }

    fn parse_send_all_source(&mut self) -> Result<Source, ScriptError> {
        if self.is_source_allotment()? {
            let brace = self.peek()?.position;
            return Err(syntax_error(
                "a source allotment cannot be used when sending all of an asset",
                brace,
            ));
        }
        self.parse_source()
    }

    fn parse_source(&mut self) -> Result<Source, ScriptError> {
        self.nested(Self::parse_source_inner)
    }

    fn parse_source_inner(&mut self) -> Result<Source, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Keyword(Keyword::Max) => {
                self.advance()?;
                let cap = self.parse_expression()?;
                self.expect_keyword(Keyword::From)?;
                let inner = Box::new(self.parse_source()?);
                Ok(Source::Maxed { cap, inner })
            }
            TokenKind::Punctuator(Punctuator::LBrace) => {
                let sequence = self.parse_block(Self::parse_source)?;
                Ok(Source::InOrder { sequence })
            }
            kind if starts_expression(kind) => {
                let account = self.parse_expression()?;
                let overdraft = self.parse_overdraft()?;
                Ok(Source::FromAccount { account, overdraft })
            }
            _ => {
                let expected = EXPRESSION_START.iter().copied().chain(["`max`", "`{`"]);
                Err(self.error_here(expected)?)
            }
        }
    }

    fn parse_overdraft(&mut self) -> Result<Option<Overdraft>, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Keyword(Keyword::AllowingOverdraftUpTo) => {
                self.advance()?;
                Ok(Some(Overdraft::Bounded(self.parse_expression()?)))
            }
            TokenKind::Keyword(Keyword::AllowingUnboundedOverdraft) => {
                self.advance()?;
                Ok(Some(Overdraft::Unbounded))
            }
            _ => Ok(None),
        }
    }

    /// `{` whose first entry is `<portion|variable> from` or `remaining`
    fn is_source_allotment(&mut self) -> Result<bool, ScriptError> {
        let Some(first) = self.first_block_entry()? else {
            return Ok(false);
        };
        match self.peek_nth(first)?.kind {
            TokenKind::Portion | TokenKind::Variable => {
                Ok(self.peek_nth(first + 1)?.kind == TokenKind::Keyword(Keyword::From))
            }
            TokenKind::Keyword(Keyword::Remaining) => Ok(true),
            _ => Ok(false),
        }
    }

    // ---------------------------------------------------------------
    // Destinations
    // ---------------------------------------------------------------

    fn parse_destination(&mut self) -> Result<Destination, ScriptError> {
        self.nested(Self::parse_destination_inner)
    }

    fn parse_destination_inner(&mut self) -> Result<Destination, ScriptError> {
        let kind = self.peek_kind()?;
        if kind == TokenKind::Punctuator(Punctuator::LBrace) {
            if self.is_destination_in_order()? {
                return self.parse_destination_in_order();
            }
            let entries = self.parse_block(|p| {
                let portion = p.parse_allotment_portion()?;
                let target = p.parse_kept_or_destination()?;
                Ok(DestinationAllotment { portion, target })
            })?;
            return Ok(Destination::Allotted { entries });
        }
        if starts_expression(kind) {
            return Ok(Destination::ToAccount(self.parse_expression()?));
        }
        let expected = EXPRESSION_START.iter().copied().chain(["`{`"]);
        Err(self.error_here(expected)?)
    }

    fn is_destination_in_order(&mut self) -> Result<bool, ScriptError> {
        let Some(first) = self.first_block_entry()? else {
            return Ok(false);
        };
        Ok(self.peek_nth(first)?.kind == TokenKind::Keyword(Keyword::Max))
    }

    /// `{ NL+ (max <expr> <kept|to> NL+)+ remaining <kept|to> NL+ }`
    fn parse_destination_in_order(&mut self) -> Result<Destination, ScriptError> {
        self.expect_punctuator(Punctuator::LBrace)?;
        self.expect_newlines()?;

        let mut capped = Vec::new();
        loop {
            match self.peek_kind()? {
                TokenKind::Keyword(Keyword::Max) => {
                    self.advance()?;
                    let cap = self.parse_expression()?;
                    let target = self.parse_kept_or_destination()?;
                    self.expect_newlines()?;
                    capped.push(CappedDestination { cap, target });
                }
                TokenKind::Keyword(Keyword::Remaining) if !capped.is_empty() => break,
                TokenKind::Punctuator(Punctuator::RBrace) if !capped.is_empty() => {
                    let brace = self.peek()?.clone();
                    let error = unexpected_token(["`max`", "`remaining`"], &brace);
                    return Err(ScriptError {
                        message: "in-order destination must end with a `remaining` entry".to_string(),
                        ..error
                    });
                }
                _ => return Err(self.error_here(["`max`", "`remaining`"])?),
            }
        }

        self.expect_keyword(Keyword::Remaining)?;
        let remainder = self.parse_kept_or_destination()?;
        self.expect_newlines()?;
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Destination::InOrder { capped, remainder })
    }

    fn parse_kept_or_destination(&mut self) -> Result<KeptOrDestination, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Keyword(Keyword::Kept) => {
                self.advance()?;
                Ok(KeptOrDestination::Kept)
            }
            TokenKind::Keyword(Keyword::To) => {
                self.advance()?;
                Ok(KeptOrDestination::To(Box::new(self.parse_destination()?)))
            }
            _ => Err(self.error_here(["`to`", "`kept`"])?),
        }
    }

    fn parse_allotment_portion(&mut self) -> Result<AllotmentPortion, ScriptError> {
        match self.peek_kind()? {
            TokenKind::Portion => Ok(AllotmentPortion::Const(self.advance()?.lexeme)),
            TokenKind::Variable => Ok(AllotmentPortion::VariablePortion(self.parse_variable()?)),
            TokenKind::Keyword(Keyword::Remaining) => {
                self.advance()?;
                Ok(AllotmentPortion::Remaining)
            }
            _ => Err(self.error_here(["portion", "variable", "`remaining`"])?),
        }
    }

    /// `{ NL+ (<entry> NL+)+ }` with at least one entry
    fn parse_block<T>(
        &mut self,
        mut parse_entry: impl FnMut(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<Vec<T>, ScriptError> {
        self.expect_punctuator(Punctuator::LBrace)?;
        self.expect_newlines()?;

        let mut entries = Vec::new();
        loop {
            if !entries.is_empty() && self.check_punctuator(Punctuator::RBrace)? {
                break;
            }
            entries.push(parse_entry(self)?);
            self.expect_newlines()?;
        }

        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(entries)
    }

    /// Lookahead index of the first entry of the `{` block at the cursor
    fn first_block_entry(&mut self) -> Result<Option<usize>, ScriptError> {
        if self.peek_kind()? != TokenKind::Punctuator(Punctuator::LBrace) {
            return Ok(None);
        }
        let mut i = 1;
        while self.peek_nth(i)?.kind == TokenKind::Newline {
            i += 1;
        }
        Ok(Some(i))
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    /// Parse a full expression, including a trailing ternary
    pub fn parse_expression(&mut self) -> Result<Expr, ScriptError> {
        self.nested(|p| {
            let lhs = p.parse_unary()?;
            p.parse_expression_from(lhs)
        })
    }

    /// Continue an expression whose leftmost operand is already parsed
    fn parse_expression_from(&mut self, lhs: Expr) -> Result<Expr, ScriptError> {
        let cond = self.parse_binary(lhs, 1)?;
        if !self.check_punctuator(Punctuator::Question)? {
            return Ok(cond);
        }

        self.advance()?;
        let if_true = self.parse_expression()?;
        self.expect_punctuator(Punctuator::Colon)?;
        let if_false = self.parse_expression()?;
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    fn parse_binary(&mut self, mut lhs: Expr, min_precedence: u8) -> Result<Expr, ScriptError> {
        while let Some((op, precedence)) = binary_operator(self.peek_kind()?) {
            if precedence < min_precedence {
                break;
            }
            self.advance()?;

            let mut rhs = self.parse_unary()?;
            while let Some((_, next)) = binary_operator(self.peek_kind()?) {
                if next <= precedence {
                    break;
                }
                rhs = self.parse_binary(rhs, next)?;
            }
            lhs = op.build(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        if self.check_punctuator(Punctuator::Not)? {
            self.advance()?;
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expr::UnaryNot(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let literal = match self.peek_kind()? {
            TokenKind::String => Literal::String(self.parse_string()?),
            TokenKind::Portion => Literal::Portion(self.advance()?.lexeme),
            TokenKind::Number => Literal::Number(self.advance()?.lexeme),
            TokenKind::Asset => Literal::Asset(self.advance()?.lexeme),
            TokenKind::Account => Literal::Account(strip_sigil(self.advance()?.lexeme)),
            TokenKind::Variable => return Ok(Expr::VariableRef(self.parse_variable()?)),
            TokenKind::Punctuator(Punctuator::LParen) => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RParen)?;
                return Ok(Expr::Parenthesized(Box::new(inner)));
            }
            TokenKind::Punctuator(Punctuator::LBracket) => {
                self.advance()?;
                let asset = self.parse_expression()?;
                if self.check_punctuator(Punctuator::Star)? {
                    let star = self.peek()?.position;
                    return Err(syntax_error(
                        "`[<asset> *]` is only allowed as the amount of `send` or `save`",
                        star,
                    ));
                }
                let amount = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RBracket)?;
                return Ok(Expr::monetary(asset, amount));
            }
            _ => return Err(self.error_here(EXPRESSION_START)?),
        };
        Ok(Expr::Literal(literal))
    }

    fn parse_variable(&mut self) -> Result<Variable, ScriptError> {
        let token = self.expect(TokenKind::Variable)?;
        Ok(Variable::new(strip_sigil(token.lexeme)))
    }

    fn parse_string(&mut self) -> Result<String, ScriptError> {
        let token = self.expect(TokenKind::String)?;
        let text = token.lexeme.as_str();
        let inner = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(text);
        Ok(inner.to_string())
    }

    // ---------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------

    /// Run a recursive rule one nesting level deeper
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<T, ScriptError> {
        if self.depth >= MAX_NESTING {
            let position = self.peek()?.position;
            return Err(syntax_error("script nested too deeply", position));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Make sure the lookahead buffer holds at least `n + 1` tokens
    fn fill(&mut self, n: usize) -> Result<(), ScriptError> {
        while self.lookahead.len() <= n {
            let token = match self.tokens.next() {
                Some(result) => result?,
                None => Token::new(TokenKind::EOF, "", self.end_position()),
            };
            self.lookahead.push_back(token);
        }
        Ok(())
    }

    fn end_position(&self) -> SourcePosition {
        self.lookahead
            .back()
            .map_or(self.last_position, |token| token.position)
    }

    fn peek_nth(&mut self, n: usize) -> Result<&Token, ScriptError> {
        self.fill(n)?;
        Ok(&self.lookahead[n])
    }

    fn peek(&mut self) -> Result<&Token, ScriptError> {
        self.peek_nth(0)
    }

    fn peek_kind(&mut self) -> Result<TokenKind, ScriptError> {
        Ok(self.peek()?.kind)
    }

    fn advance(&mut self) -> Result<Token, ScriptError> {
        self.fill(0)?;
        match self.lookahead.pop_front() {
            Some(token) => {
                self.last_position = token.position;
                Ok(token)
            }
            None => Err(syntax_error("unexpected end of input", self.last_position)),
        }
    }

    fn check(&mut self, kind: TokenKind) -> Result<bool, ScriptError> {
        Ok(self.peek_kind()? == kind)
    }

    fn check_keyword(&mut self, k: Keyword) -> Result<bool, ScriptError> {
        self.check(TokenKind::Keyword(k))
    }

    fn check_punctuator(&mut self, p: Punctuator) -> Result<bool, ScriptError> {
        self.check(TokenKind::Punctuator(p))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ScriptError> {
        if self.check(kind)? {
            self.advance()
        } else {
            Err(self.error_here([kind.describe()])?)
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<Token, ScriptError> {
        self.expect(TokenKind::Keyword(k))
    }

    fn expect_punctuator(&mut self, p: Punctuator) -> Result<Token, ScriptError> {
        self.expect(TokenKind::Punctuator(p))
    }

    /// One or more newline tokens
    fn expect_newlines(&mut self) -> Result<(), ScriptError> {
        self.expect(TokenKind::Newline)?;
        self.skip_newlines()
    }

    fn skip_newlines(&mut self) -> Result<(), ScriptError> {
        while self.check(TokenKind::Newline)? {
            self.advance()?;
        }
        Ok(())
    }

    /// Unexpected-token error at the current token
    fn error_here<I, S>(&mut self, expected: I) -> Result<ScriptError, ScriptError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let found = self.peek()?;
        Ok(unexpected_token(expected, found))
    }
}

/// Drop the leading `@` or `$`
fn strip_sigil(lexeme: String) -> String {
    match lexeme.strip_prefix(['@', '$']) {
        Some(name) => name.to_string(),
        None => lexeme,
    }
}
