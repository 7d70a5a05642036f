/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * License:
 * This file is part of the NUA programming language project.
 *
 * NUA is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fmt;
use std::rc::Rc;

use crate::ast::Stmt;
use crate::span::Span;
use crate::value::Value;

#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this expression can appear on the left of `=` or under
    /// `++`/`--`.
    pub fn is_assignable(&self) -> bool {
        match &self.kind {
            ExprKind::Variable(_) => true,
            ExprKind::Access { tails, .. } => ends_in_slot(tails),
            _ => false,
        }
    }

    /// Converts an assignable expression into a target.
    ///
    /// Returns the expression back unchanged when it is not assignable so
    /// the parser can report it.
    pub fn into_target(self) -> Result<Target, Expr> {
        let span = self.span;

        match self.kind {
            ExprKind::Variable(name) => Ok(Target::Variable(name)),
            ExprKind::Access { base, tails } if ends_in_slot(&tails) => {
                Ok(Target::Access { base, tails })
            }
            kind => Err(Expr::new(kind, span)),
        }
    }
}

fn ends_in_slot(tails: &[AccessTail]) -> bool {
    matches!(
        tails.last().map(|t| &t.kind),
        Some(AccessKind::Member(_)) | Some(AccessKind::Index(_))
    )
}

#[derive(Debug)]
pub enum ExprKind {
    /// Literal scalar; `None` is the `null` literal.
    Literal(Option<Value>),
    Variable(String),
    List(Vec<Expr>),
    Table(Vec<(Expr, Expr)>),
    Function(FunctionLiteral),
    Negate(Box<Expr>),
    Not(Box<Expr>),

    /// One precedence level of arithmetic/comparison operators: a left
    /// operand followed by `(operator, operand)` tails, folded left to right.
    Binary {
        left: Box<Expr>,
        tails: Vec<BinaryTail>,
    },

    /// `a and b and c` / `a or b or c`; yields the last evaluated operand.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        rest: Vec<Expr>,
    },

    /// A primary value followed by member/index/invoke suffixes.
    Access {
        base: Box<Expr>,
        tails: Vec<AccessTail>,
    },

    Assign {
        target: Target,
        op: AssignOp,
        value: Box<Expr>,
    },

    /// `++x`, `x++`, `--x`, `x--`.
    Step {
        target: Target,
        op: StepOp,
        fixity: Fixity,
    },
}

#[derive(Debug)]
pub struct FunctionLiteral {
    pub name: Option<String>,
    pub params: Rc<[String]>,
    /// Shared with every Function value built from this literal.
    pub body: Rc<Stmt>,
}

#[derive(Debug)]
pub struct BinaryTail {
    pub op: BinaryOp,
    pub right: Expr,
    /// Covers the operator and its right operand.
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug)]
pub struct AccessTail {
    pub kind: AccessKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum AccessKind {
    /// `.name`
    Member(String),
    /// `[expr]`
    Index(Expr),
    /// `(args)`
    Invoke(Vec<Expr>),
}

/// Left-hand side of an assignment or increment.
#[derive(Debug)]
pub enum Target {
    Variable(String),
    /// Access chain whose last tail is a member or index.
    Access {
        base: Box<Expr>,
        tails: Vec<AccessTail>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
}

impl AssignOp {
    /// Arithmetic applied by compound forms.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOp {
    Increment,
    Decrement,
}

impl StepOp {
    pub fn delta(self) -> f64 {
        match self {
            StepOp::Increment => 1.0,
            StepOp::Decrement => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Suffix,
}
