/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Statement Grammar
 * -----------------
 *
 *   statement := ';'
 *              | 'if' expr block ('elif' expr block)* ('else' block)?
 *              | 'while' expr block
 *              | 'for' IDENT ('in' | 'of') expr block
 *              | 'break' | 'continue'
 *              | 'return' expr?
 *              | 'global' IDENT (',' IDENT)*
 *              | 'fn' IDENT '(' params ')' block
 *              | expr
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

use crate::ast::{AssignOp, Expr, ExprKind, Stmt, StmtKind, Target};
use crate::error::ParseError;
use crate::lexer::token::TokenKind;
use crate::parser::parser::{PResult, Parser};
use crate::stack::ensure_sufficient_stack;

impl<'a> Parser<'a> {
    /// Parses one statement. Leading `;` separators are skipped by callers.
    pub(crate) fn statement(&mut self) -> PResult<Stmt> {
        ensure_sufficient_stack(|| self.statement_kind())
    }

    fn statement_kind(&mut self) -> PResult<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Break | TokenKind::Continue => self.jump_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Global => self.global_statement(),

            TokenKind::Import => Err(ParseError::fatal(
                "'import' is reserved and not supported",
                self.peek_span(),
            )),

            TokenKind::Fn if self.peek_next_kind() == TokenKind::Identifier => self.function_declaration(),

            _ => {
                let expr = self.require(Self::expression, "a statement")?;
                let span = expr.span;
                Ok(Stmt::new(StmtKind::Expression(expr), span))
            }
        }
    }

    /// `{ statement* }`
    pub(crate) fn block(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::LeftBrace, "'{' to start a block")?;
        let mut statements = Vec::new();

        loop {
            if let Some(end) = self.match_span(TokenKind::RightBrace) {
                return Ok(Stmt::new(StmtKind::Sequence(statements), start.to(end)));
            }

            if self.is_at_end() {
                return Err(self.missing("'}' to close the block"));
            }

            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }

            statements.push(self.statement()?);
        }
    }

    /// Body of a loop; `break`/`continue` are legal inside.
    fn loop_body(&mut self) -> PResult<Stmt> {
        self.loop_depth += 1;
        let body = self.block();
        self.loop_depth -= 1;
        body
    }

    fn condition(&mut self, keyword: &str) -> PResult<Expr> {
        self.require(Self::expression, &format!("a condition after '{}'", keyword))
    }

    /* ------------------------------------------------------------------
     * if / elif / else
     * ---------------------------------------------------------------- */
    fn if_statement(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::If, "'if'")?;

        let mut branches = Vec::new();
        let condition = self.condition("if")?;
        let body = self.block()?;
        let mut end = body.span;
        branches.push((condition, body));

        while self.match_kind(TokenKind::Elif) {
            let condition = self.condition("elif")?;
            let body = self.block()?;
            end = body.span;
            branches.push((condition, body));
        }

        let otherwise = if self.match_kind(TokenKind::Else) {
            let body = self.block()?;
            end = body.span;
            Some(Box::new(body))
        } else {
            None
        };

        Ok(Stmt::new(StmtKind::If { branches, otherwise }, start.to(end)))
    }

    /* ------------------------------------------------------------------
     * while
     * ---------------------------------------------------------------- */
    fn while_statement(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::While, "'while'")?;
        let condition = self.condition("while")?;
        let body = self.loop_body()?;
        let span = start.to(body.span);

        Ok(Stmt::new(
            StmtKind::While {
                condition,
                body: Box::new(body),
            },
            span,
        ))
    }

    /* ------------------------------------------------------------------
     * for k in x / for v of x
     * ---------------------------------------------------------------- */
    fn for_statement(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::For, "'for'")?;
        let (variable, _) = self.expect_identifier("a loop variable after 'for'")?;

        let over_values = if self.match_kind(TokenKind::In) {
            false
        } else if self.match_kind(TokenKind::Of) {
            true
        } else {
            return Err(self.missing("'in' or 'of' after the loop variable"));
        };

        let iterable = self.require(Self::expression, "something to iterate over")?;
        let body = Box::new(self.loop_body()?);
        let span = start.to(body.span);

        let kind = if over_values {
            StmtKind::ForOf {
                variable,
                iterable,
                body,
            }
        } else {
            StmtKind::ForIn {
                variable,
                iterable,
                body,
            }
        };

        Ok(Stmt::new(kind, span))
    }

    /* ------------------------------------------------------------------
     * break / continue / return
     * ---------------------------------------------------------------- */
    fn jump_statement(&mut self) -> PResult<Stmt> {
        let span = self.peek_span();
        let is_break = self.check(TokenKind::Break);
        self.advance();

        let keyword = if is_break { "break" } else { "continue" };
        if self.loop_depth == 0 {
            return Err(ParseError::fatal(format!("'{}' outside of a loop", keyword), span));
        }

        let kind = if is_break { StmtKind::Break } else { StmtKind::Continue };
        Ok(Stmt::new(kind, span))
    }

    /// `return` takes a value only when one can start here.
    fn return_statement(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::Return, "'return'")?;

        let value = match self.peek_kind() {
            TokenKind::RightBrace | TokenKind::Semicolon | TokenKind::Eof => None,
            _ => self.expression()?,
        };

        let span = match &value {
            Some(expr) => start.to(expr.span),
            None => start,
        };

        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    /* ------------------------------------------------------------------
     * global a, b
     * ---------------------------------------------------------------- */
    fn global_statement(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::Global, "'global'")?;

        let (first, mut end) = self.expect_identifier("a name after 'global'")?;
        let mut names = vec![first];

        while self.match_kind(TokenKind::Comma) {
            let (name, span) = self.expect_identifier("a name after ','")?;
            names.push(name);
            end = span;
        }

        Ok(Stmt::new(StmtKind::Global(names), start.to(end)))
    }

    /* ------------------------------------------------------------------
     * fn name(params) { ... }   ==   name = fn(params) { ... }
     * ---------------------------------------------------------------- */
    fn function_declaration(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::Fn, "'fn'")?;
        let (name, _) = self.expect_identifier("a function name")?;

        let function = self.function_literal(Some(name.clone()))?;
        let span = start.to(function.body.span);

        let value = Expr::new(ExprKind::Function(function), span);
        let assign = Expr::new(
            ExprKind::Assign {
                target: Target::Variable(name),
                op: AssignOp::Set,
                value: Box::new(value),
            },
            span,
        );

        Ok(Stmt::new(StmtKind::Expression(assign), span))
    }
}
