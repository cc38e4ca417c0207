//! Abstract Syntax Tree node definitions
//!
//! Nodes are built bottom-up in a single parse pass. Each node owns its
//! children, so a [`Script`] is a plain tree with no shared references.

use serde::Serialize;

/// Complete parsed script: optional declarations plus statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    /// Declarations from the `vars` block, in written order
    pub variables: Vec<VarDecl>,
    /// Top-level statements, never empty for a parsed script
    pub statements: Vec<Statement>,
}

impl Script {
    /// Number of top-level statements
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Look up a declaration by variable name (without the `$` sigil)
    pub fn variable(&self, name: &str) -> Option<&VarDecl> {
        self.variables.iter().find(|decl| decl.name.name == name)
    }
}

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    /// `account`
    Account,
    /// `asset`
    Asset,
    /// `number`
    Number,
    /// `monetary`
    Monetary,
    /// `portion`
    Portion,
    /// `string`
    String,
    /// `bool`
    Bool,
}

impl TypeTag {
    /// Every type keyword, in declaration order
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Account,
        TypeTag::Asset,
        TypeTag::Number,
        TypeTag::Monetary,
        TypeTag::Portion,
        TypeTag::String,
        TypeTag::Bool,
    ];

    /// Keyword spelling of the type
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeTag::Account => "account",
            TypeTag::Asset => "asset",
            TypeTag::Number => "number",
            TypeTag::Monetary => "monetary",
            TypeTag::Portion => "portion",
            TypeTag::String => "string",
            TypeTag::Bool => "bool",
        }
    }

    /// Type named by a keyword, if any
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.keyword() == word)
    }
}

/// Variable name without its `$` sigil
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Variable {
    /// Identifier text
    pub name: String,
}

impl Variable {
    /// Create a variable reference by name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One declaration inside the `vars` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarDecl {
    /// Declared type
    pub ty: TypeTag,
    /// Declared variable
    pub name: Variable,
    /// Where the value comes from when not supplied by the caller
    pub origin: Option<Origin>,
}

/// External lookup a declared variable is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Origin {
    /// `meta(<account>, "<key>")`
    MetaOf {
        /// Account whose metadata is read
        account: Expr,
        /// Metadata key
        key: String,
    },
    /// `balance(<account>, <asset>)`
    BalanceOf {
        /// Account whose balance is read
        account: Expr,
        /// Asset of the balance
        asset: Expr,
    },
}

/// Script statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement {
    /// `print <expr>`
    Print {
        /// Printed value
        expr: Expr,
    },
    /// `save (<expr> | [<asset> *]) from <account>`
    Save {
        /// Amount kept out of later sends
        amount: SaveAmount,
        /// Account the amount is saved on
        account: Expr,
    },
    /// `set_tx_meta("<key>", <expr>)`
    SetTxMeta {
        /// Metadata key
        key: String,
        /// Metadata value
        value: Expr,
    },
    /// `set_account_meta(<account>, "<key>", <expr>)`
    SetAccountMeta {
        /// Account receiving the metadata
        account: Expr,
        /// Metadata key
        key: String,
        /// Metadata value
        value: Expr,
    },
    /// `fail`
    Fail,
    /// `send <monetary> ( source = … destination = … )`
    Send {
        /// Amount to move
        monetary: Expr,
        /// Where funds come from and go to
        clauses: SendClauses<ValueAwareSource>,
    },
    /// `send [<asset> *] ( source = … destination = … )`
    SendAll {
        /// Asset whose whole available balance moves
        monetary: MonetaryAll,
        /// Where funds come from and go to
        clauses: SendClauses<Source>,
    },
}

/// Amount operand of `save`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SaveAmount {
    /// A monetary expression
    Monetary(Expr),
    /// `[<asset> *]`
    All(MonetaryAll),
}

/// Source and destination of a send, normalized from either written order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendClauses<S> {
    /// `source = …`
    pub source: S,
    /// `destination = …`
    pub destination: Destination,
}

/// `[<asset> *]`: all of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonetaryAll {
    /// Asset expression
    pub asset: Expr,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// `$name`
    VariableRef(Variable),
    /// `[<asset> <amount>]`
    MonetaryNew {
        /// Asset expression
        asset: Box<Expr>,
        /// Amount expression
        amount: Box<Expr>,
    },
    /// `( <expr> )`
    Parenthesized(Box<Expr>),
    /// `!<expr>`
    UnaryNot(Box<Expr>),
    /// `<lhs> + <rhs>` or `<lhs> - <rhs>`
    AddSub {
        /// Operator
        op: AddSubOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `<lhs> == <rhs>` and the other comparisons
    Comparison {
        /// Operator
        op: ComparisonOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `<lhs> && <rhs>`
    LogicalAnd {
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `<lhs> || <rhs>`
    LogicalOr {
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `<cond> ? <if_true> : <if_false>`
    Ternary {
        /// Condition
        cond: Box<Expr>,
        /// Value when the condition holds
        if_true: Box<Expr>,
        /// Value otherwise
        if_false: Box<Expr>,
    },
}

impl Expr {
    /// Account literal, `name` without the `@` sigil
    pub fn account(name: impl Into<String>) -> Self {
        Expr::Literal(Literal::Account(name.into()))
    }

    /// Asset literal
    pub fn asset(code: impl Into<String>) -> Self {
        Expr::Literal(Literal::Asset(code.into()))
    }

    /// Number literal from its decimal text
    pub fn number(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::Number(text.into()))
    }

    /// String literal, without quotes
    pub fn string(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(text.into()))
    }

    /// Portion literal from its source text
    pub fn portion(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::Portion(text.into()))
    }

    /// Variable reference, `name` without the `$` sigil
    pub fn variable(name: impl Into<String>) -> Self {
        Expr::VariableRef(Variable::new(name))
    }

    /// `[<asset> <amount>]`
    pub fn monetary(asset: Expr, amount: Expr) -> Self {
        Expr::MonetaryNew {
            asset: Box::new(asset),
            amount: Box::new(amount),
        }
    }
}

/// `+` / `-`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddSubOp {
    /// `+`
    Add,
    /// `-`
    Sub,
}

impl AddSubOp {
    /// Operator spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            AddSubOp::Add => "+",
            AddSubOp::Sub => "-",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl ComparisonOp {
    /// Operator spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::GtEq => ">=",
        }
    }
}

/// Literal values; text is kept verbatim for the consumer to interpret
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Literal {
    /// Account address without `@`
    Account(String),
    /// Asset code, e.g. `USD/2`
    Asset(String),
    /// Decimal digits
    Number(String),
    /// String contents without quotes
    String(String),
    /// Portion text, e.g. `12.5%` or `1/3`
    Portion(String),
}

impl Literal {
    /// The retained text of the literal
    pub fn as_str(&self) -> &str {
        match self {
            Literal::Account(s)
            | Literal::Asset(s)
            | Literal::Number(s)
            | Literal::String(s)
            | Literal::Portion(s) => s,
        }
    }
}

/// Where funds may be drawn from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Source {
    /// `<account> [allowing …overdraft…]`
    FromAccount {
        /// Account expression
        account: Expr,
        /// Permission to go below zero
        overdraft: Option<Overdraft>,
    },
    /// `max <cap> from <source>`
    Maxed {
        /// Most that may be drawn
        cap: Expr,
        /// Capped source
        inner: Box<Source>,
    },
    /// `{ <source>… }`, tried in written order
    InOrder {
        /// Sources, never empty
        sequence: Vec<Source>,
    },
}

/// Overdraft clause of an account source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Overdraft {
    /// `allowing overdraft up to <expr>`
    Bounded(Expr),
    /// `allowing unbounded overdraft`
    Unbounded,
}

/// Source of a `send` that knows the amount being sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValueAwareSource {
    /// Any plain source
    Plain(Source),
    /// `{ <portion> from <source>… }`
    Allotted {
        /// Allotment entries, never empty
        entries: Vec<SourceAllotment>,
    },
}

/// `<portion> from <source>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAllotment {
    /// Share of the amount
    pub portion: AllotmentPortion,
    /// Where that share is drawn from
    pub source: Source,
}

/// Where funds are routed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Destination {
    /// A single account
    ToAccount(Expr),
    /// `{ max <cap> (to … | kept)… remaining (to … | kept) }`
    InOrder {
        /// Capped entries in written order
        capped: Vec<CappedDestination>,
        /// Where whatever is left goes
        remainder: KeptOrDestination,
    },
    /// `{ <portion> (to … | kept)… }`
    Allotted {
        /// Allotment entries, never empty
        entries: Vec<DestinationAllotment>,
    },
}

/// `max <cap> (to <destination> | kept)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CappedDestination {
    /// Most that is routed to the target
    pub cap: Expr,
    /// Target of the capped amount
    pub target: KeptOrDestination,
}

/// `<portion> (to <destination> | kept)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationAllotment {
    /// Share of the amount
    pub portion: AllotmentPortion,
    /// Target of that share
    pub target: KeptOrDestination,
}

/// `kept` or `to <destination>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum KeptOrDestination {
    /// Stays with the source
    Kept,
    /// Routed to a nested destination
    To(Box<Destination>),
}

/// Share of an allotment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AllotmentPortion {
    /// Portion literal text
    Const(String),
    /// `$name` holding a portion
    VariablePortion(Variable),
    /// `remaining`
    Remaining,
}
