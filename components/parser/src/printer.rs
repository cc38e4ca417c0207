//! Canonical source printer
//!
//! `Display` for the AST writes NumScript that parses back to an equal
//! tree: blocks are indented four spaces per level, `source` is written
//! before `destination`, and parentheses appear only where the tree holds
//! an [`Expr::Parenthesized`] node.

use std::fmt::{self, Display, Formatter};

use crate::ast::*;

const INDENT: &str = "    ";

fn indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

impl Display for Script {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.variables.is_empty() {
            writeln!(f, "vars {{")?;
            for decl in &self.variables {
                writeln!(f, "{}{}", INDENT, decl)?;
            }
            writeln!(f, "}}")?;
        }
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Display for VarDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(origin) = &self.origin {
            write!(f, " = {}", origin)?;
        }
        Ok(())
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Origin::MetaOf { account, key } => write!(f, "meta({}, \"{}\")", account, key),
            Origin::BalanceOf { account, asset } => write!(f, "balance({}, {})", account, asset),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Print { expr } => write!(f, "print {}", expr),
            Statement::Save { amount, account } => write!(f, "save {} from {}", amount, account),
            Statement::SetTxMeta { key, value } => write!(f, "set_tx_meta(\"{}\", {})", key, value),
            Statement::SetAccountMeta {
                account,
                key,
                value,
            } => write!(f, "set_account_meta({}, \"{}\", {})", account, key, value),
            Statement::Fail => f.write_str("fail"),
            Statement::Send { monetary, clauses } => {
                writeln!(f, "send {} (", monetary)?;
                write!(f, "{}source = ", INDENT)?;
                write_value_aware_source(f, &clauses.source, 1)?;
                write_destination_clause(f, &clauses.destination)
            }
            Statement::SendAll { monetary, clauses } => {
                writeln!(f, "send {} (", monetary)?;
                write!(f, "{}source = ", INDENT)?;
                write_source(f, &clauses.source, 1)?;
                write_destination_clause(f, &clauses.destination)
            }
        }
    }
}

fn write_destination_clause(f: &mut Formatter<'_>, destination: &Destination) -> fmt::Result {
    write!(f, "\n{}destination = ", INDENT)?;
    write_destination(f, destination, 1)?;
    f.write_str("\n)")
}

impl Display for SaveAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SaveAmount::Monetary(expr) => expr.fmt(f),
            SaveAmount::All(all) => all.fmt(f),
        }
    }
}

impl Display for MonetaryAll {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{} *]", self.asset)
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_source(f, self, 0)
    }
}

impl Display for ValueAwareSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_value_aware_source(f, self, 0)
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_destination(f, self, 0)
    }
}

/// Write `{`, one line per entry at `depth + 1`, then `}` at `depth`.
fn write_block<T>(
    f: &mut Formatter<'_>,
    entries: &[T],
    depth: usize,
    mut write_entry: impl FnMut(&mut Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("{\n")?;
    for entry in entries {
        indent(f, depth + 1)?;
        write_entry(f, entry)?;
        f.write_str("\n")?;
    }
    indent(f, depth)?;
    f.write_str("}")
}

fn write_source(f: &mut Formatter<'_>, source: &Source, depth: usize) -> fmt::Result {
    match source {
        Source::FromAccount { account, overdraft } => {
            write!(f, "{}", account)?;
            match overdraft {
                Some(Overdraft::Bounded(limit)) => write!(f, " allowing overdraft up to {}", limit),
                Some(Overdraft::Unbounded) => f.write_str(" allowing unbounded overdraft"),
                None => Ok(()),
            }
        }
        Source::Maxed { cap, inner } => {
            write!(f, "max {} from ", cap)?;
            write_source(f, inner, depth)
        }
        Source::InOrder { sequence } => {
            write_block(f, sequence, depth, |f, s| write_source(f, s, depth + 1))
        }
    }
}

fn write_value_aware_source(f: &mut Formatter<'_>, source: &ValueAwareSource, depth: usize) -> fmt::Result {
    match source {
        ValueAwareSource::Plain(source) => write_source(f, source, depth),
        ValueAwareSource::Allotted { entries } => write_block(f, entries, depth, |f, entry| {
            write!(f, "{} from ", entry.portion)?;
            write_source(f, &entry.source, depth + 1)
        }),
    }
}

fn write_destination(f: &mut Formatter<'_>, destination: &Destination, depth: usize) -> fmt::Result {
    match destination {
        Destination::ToAccount(account) => write!(f, "{}", account),
        Destination::InOrder { capped, remainder } => {
            f.write_str("{\n")?;
            for entry in capped {
                indent(f, depth + 1)?;
                write!(f, "max {} ", entry.cap)?;
                write_kept_or_destination(f, &entry.target, depth + 1)?;
                f.write_str("\n")?;
            }
            indent(f, depth + 1)?;
            f.write_str("remaining ")?;
            write_kept_or_destination(f, remainder, depth + 1)?;
            f.write_str("\n")?;
            indent(f, depth)?;
            f.write_str("}")
        }
        Destination::Allotted { entries } => write_block(f, entries, depth, |f, entry| {
            write!(f, "{} ", entry.portion)?;
            write_kept_or_destination(f, &entry.target, depth + 1)
        }),
    }
}

fn write_kept_or_destination(f: &mut Formatter<'_>, target: &KeptOrDestination, depth: usize) -> fmt::Result {
    match target {
        KeptOrDestination::Kept => f.write_str("kept"),
        KeptOrDestination::To(destination) => {
            f.write_str("to ")?;
            write_destination(f, destination, depth)
        }
    }
}

impl Display for AllotmentPortion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AllotmentPortion::Const(text) => f.write_str(text),
            AllotmentPortion::VariablePortion(var) => var.fmt(f),
            AllotmentPortion::Remaining => f.write_str("remaining"),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Account(name) => write!(f, "@{}", name),
            Literal::String(text) => write!(f, "\"{}\"", text),
            Literal::Asset(text) | Literal::Number(text) | Literal::Portion(text) => f.write_str(text),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::VariableRef(var) => var.fmt(f),
            Expr::MonetaryNew { asset, amount } => write!(f, "[{} {}]", asset, amount),
            Expr::Parenthesized(inner) => write!(f, "({})", inner),
            Expr::UnaryNot(operand) => write!(f, "!{}", operand),
            Expr::AddSub { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
            Expr::Comparison { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
            Expr::LogicalAnd { lhs, rhs } => write!(f, "{} && {}", lhs, rhs),
            Expr::LogicalOr { lhs, rhs } => write!(f, "{} || {}", lhs, rhs),
            Expr::Ternary {
                cond,
                if_true,
                if_false,
            } => write!(f, "{} ? {} : {}", cond, if_true, if_false),
        }
    }
}
