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

use crate::ast::Expr;
use crate::span::Span;

#[derive(Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Statements of a sequence, or the statement itself otherwise.
    pub fn statements(&self) -> &[Stmt] {
        match &self.kind {
            StmtKind::Sequence(stmts) => stmts,
            _ => std::slice::from_ref(self),
        }
    }
}

#[derive(Debug)]
pub enum StmtKind {
    /// Expression evaluated for its value (and side effects).
    Expression(Expr),

    /// `if` and any number of `elif`s, in source order, plus `else`.
    If {
        branches: Vec<(Expr, Stmt)>,
        otherwise: Option<Box<Stmt>>,
    },

    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    /// `for k in x`: iterates keys / indices.
    ForIn {
        variable: String,
        iterable: Expr,
        body: Box<Stmt>,
    },

    /// `for v of x`: iterates values.
    ForOf {
        variable: String,
        iterable: Expr,
        body: Box<Stmt>,
    },

    Break,
    Continue,
    Return(Option<Expr>),

    /// `global a, b`: pins names to the root frame for this call frame.
    Global(Vec<String>),

    /// Block or whole program.
    Sequence(Vec<Stmt>),
}
