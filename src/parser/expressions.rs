/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Expression Grammar
 * ------------------
 * The precedence ladder, lowest binding first:
 *
 *   assignment → or → and → equality → relational → additive
 *   → multiplicative → process → unary → primary → value
 *
 * Each level asks the next one for its left operand, then greedily
 * collects same-level operator tails into one left-associative node.
 *
 * A matcher that finds nothing it can start with returns `Ok(None)`
 * without consuming anything. Once an operator or opening bracket has
 * been consumed, whatever must follow it is required.
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

use std::rc::Rc;

use crate::ast::{
    AccessKind, AccessTail, AssignOp, BinaryOp, BinaryTail, Expr, ExprKind, Fixity, FunctionLiteral, LogicalOp,
    StepOp,
};
use crate::error::ParseError;
use crate::lexer::token::TokenKind;
use crate::parser::parser::{PResult, Parser};
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

type Matcher<'a> = fn(&mut Parser<'a>) -> PResult<Option<Expr>>;

fn equality_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqualEqual => Some(BinaryOp::Equal),
        TokenKind::BangEqual => Some(BinaryOp::NotEqual),
        _ => None,
    }
}

fn relational_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::LessEqual => Some(BinaryOp::LessEqual),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
        _ => None,
    }
}

fn additive_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

/// `**` shares this level, so it is left-associative like `*`.
fn multiplicative_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::SlashSlash => Some(BinaryOp::FloorDiv),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::StarStar => Some(BinaryOp::Pow),
        _ => None,
    }
}

fn step_op(kind: TokenKind) -> Option<StepOp> {
    match kind {
        TokenKind::PlusPlus => Some(StepOp::Increment),
        TokenKind::MinusMinus => Some(StepOp::Decrement),
        _ => None,
    }
}

fn invalid_target(expr: Expr, what: &str) -> ParseError {
    ParseError::fatal(format!("invalid {} target", what), expr.span)
}

impl<'a> Parser<'a> {
    /// Entry point for any expression. Every nested group, list, table,
    /// argument and index comes back through here.
    pub(crate) fn expression(&mut self) -> PResult<Option<Expr>> {
        ensure_sufficient_stack(|| self.assignment())
    }

    /* ------------------------------------------------------------------
     * assignment := target ('=' | '+=' | '-=') assignment | or
     * ---------------------------------------------------------------- */
    fn assignment(&mut self) -> PResult<Option<Expr>> {
        let Some(left) = self.or()? else {
            return Ok(None);
        };

        let op = match self.peek_kind() {
            TokenKind::Equal => AssignOp::Set,
            TokenKind::PlusEqual => AssignOp::Add,
            TokenKind::MinusEqual => AssignOp::Sub,
            _ => return Ok(Some(left)),
        };
        self.advance();

        let start = left.span;
        let target = left.into_target().map_err(|e| invalid_target(e, "assignment"))?;
        let value = self.require(Self::assignment, "a value to assign")?;
        let span = start.to(value.span);

        Ok(Some(Expr::new(
            ExprKind::Assign {
                target,
                op,
                value: Box::new(value),
            },
            span,
        )))
    }

    /* ------------------------------------------------------------------
     * or / and
     * ---------------------------------------------------------------- */
    fn or(&mut self) -> PResult<Option<Expr>> {
        self.logical(TokenKind::Or, LogicalOp::Or, Self::and)
    }

    fn and(&mut self) -> PResult<Option<Expr>> {
        self.logical(TokenKind::And, LogicalOp::And, Self::equality)
    }

    fn logical(&mut self, token: TokenKind, op: LogicalOp, next: Matcher<'a>) -> PResult<Option<Expr>> {
        let Some(left) = next(self)? else {
            return Ok(None);
        };

        let mut span = left.span;
        let mut rest = Vec::new();

        while self.match_kind(token) {
            let operand = self.require(next, &format!("an operand after '{}'", token.describe()))?;
            span = span.to(operand.span);
            rest.push(operand);
        }

        if rest.is_empty() {
            return Ok(Some(left));
        }

        Ok(Some(Expr::new(
            ExprKind::Logical {
                op,
                left: Box::new(left),
                rest,
            },
            span,
        )))
    }

    /* ------------------------------------------------------------------
     * Binary levels
     * ---------------------------------------------------------------- */
    fn equality(&mut self) -> PResult<Option<Expr>> {
        self.binary_level(equality_op, Self::relational)
    }

    fn relational(&mut self) -> PResult<Option<Expr>> {
        self.binary_level(relational_op, Self::additive)
    }

    fn additive(&mut self) -> PResult<Option<Expr>> {
        self.binary_level(additive_op, Self::multiplicative)
    }

    fn multiplicative(&mut self) -> PResult<Option<Expr>> {
        self.binary_level(multiplicative_op, Self::process)
    }

    fn binary_level(&mut self, ops: fn(TokenKind) -> Option<BinaryOp>, next: Matcher<'a>) -> PResult<Option<Expr>> {
        let Some(left) = next(self)? else {
            return Ok(None);
        };

        let mut span = left.span;
        let mut tails = Vec::new();

        while let Some(op) = ops(self.peek_kind()) {
            let op_span = self.peek_span();
            self.advance();

            let right = self.require(next, &format!("an operand after '{}'", op))?;
            let tail_span = op_span.to(right.span);
            span = span.to(right.span);
            tails.push(BinaryTail {
                op,
                right,
                span: tail_span,
            });
        }

        if tails.is_empty() {
            return Ok(Some(left));
        }

        Ok(Some(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                tails,
            },
            span,
        )))
    }

    /* ------------------------------------------------------------------
     * process := ('++' | '--') target | unary ('++' | '--')?
     * ---------------------------------------------------------------- */
    fn process(&mut self) -> PResult<Option<Expr>> {
        if let Some(op) = step_op(self.peek_kind()) {
            let start = self.peek_span();
            self.advance();

            let operand = self.require(Self::primary, &format!("a target after '{}'", start_symbol(op)))?;
            let span = start.to(operand.span);
            let target = operand.into_target().map_err(|e| invalid_target(e, "increment"))?;

            return Ok(Some(Expr::new(
                ExprKind::Step {
                    target,
                    op,
                    fixity: Fixity::Prefix,
                },
                span,
            )));
        }

        let Some(operand) = self.unary()? else {
            return Ok(None);
        };

        let Some(op) = step_op(self.peek_kind()) else {
            return Ok(Some(operand));
        };
        let end = self.peek_span();
        self.advance();

        let span = operand.span.to(end);
        let target = operand.into_target().map_err(|e| invalid_target(e, "increment"))?;

        Ok(Some(Expr::new(
            ExprKind::Step {
                target,
                op,
                fixity: Fixity::Suffix,
            },
            span,
        )))
    }

    /* ------------------------------------------------------------------
     * unary := ('-' | 'not') unary | primary
     * ---------------------------------------------------------------- */
    fn unary(&mut self) -> PResult<Option<Expr>> {
        ensure_sufficient_stack(|| self.unary_operand())
    }

    fn unary_operand(&mut self) -> PResult<Option<Expr>> {
        let negate = match self.peek_kind() {
            TokenKind::Minus => true,
            TokenKind::Not => false,
            _ => return self.primary(),
        };

        let start = self.peek_span();
        self.advance();

        let what = if negate { "an operand after '-'" } else { "an operand after 'not'" };
        let operand = self.require(Self::unary, what)?;
        let span = start.to(operand.span);

        let kind = if negate {
            ExprKind::Negate(Box::new(operand))
        } else {
            ExprKind::Not(Box::new(operand))
        };

        Ok(Some(Expr::new(kind, span)))
    }

    /* ------------------------------------------------------------------
     * primary := value tail*
     * ---------------------------------------------------------------- */
    pub(crate) fn primary(&mut self) -> PResult<Option<Expr>> {
        let Some(base) = self.value()? else {
            return Ok(None);
        };

        let mut tails = Vec::new();

        loop {
            let start = self.peek_span();

            let tail = match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let (name, end) = self.expect_identifier("a member name after '.'")?;
                    AccessTail {
                        kind: AccessKind::Member(name),
                        span: start.to(end),
                    }
                }

                TokenKind::LeftBracket => {
                    self.advance();
                    let key = self.require(Self::expression, "an index expression")?;
                    let end = self.expect(TokenKind::RightBracket, "']' to close the index")?;
                    AccessTail {
                        kind: AccessKind::Index(key),
                        span: start.to(end),
                    }
                }

                TokenKind::LeftParen => {
                    self.advance();
                    let (args, end) = self.items(TokenKind::RightParen, "an argument", "',' or ')' after an argument")?;
                    AccessTail {
                        kind: AccessKind::Invoke(args),
                        span: start.to(end),
                    }
                }

                _ => break,
            };

            tails.push(tail);
        }

        let Some(last) = tails.last() else {
            return Ok(Some(base));
        };

        let span = base.span.to(last.span);
        Ok(Some(Expr::new(
            ExprKind::Access {
                base: Box::new(base),
                tails,
            },
            span,
        )))
    }

    /* ------------------------------------------------------------------
     * value
     * ---------------------------------------------------------------- */
    fn value(&mut self) -> PResult<Option<Expr>> {
        let span = self.peek_span();

        let literal = |value: Option<Value>| -> PResult<Option<Expr>> { Ok(Some(Expr::new(ExprKind::Literal(value), span))) };

        match self.peek_kind() {
            TokenKind::Number => {
                let text = self.advance().map(|t| t.text()).unwrap_or_default();
                let n: f64 = text
                    .parse()
                    .map_err(|_| ParseError::fatal(format!("invalid number '{}'", text), span))?;
                literal(Some(Value::Number(n)))
            }

            TokenKind::String => {
                let text = self.advance().map(|t| t.text().to_string()).unwrap_or_default();
                literal(Some(Value::String(text)))
            }

            TokenKind::True => {
                self.advance();
                literal(Some(Value::Bool(true)))
            }

            TokenKind::False => {
                self.advance();
                literal(Some(Value::Bool(false)))
            }

            TokenKind::Null => {
                self.advance();
                literal(None)
            }

            TokenKind::Identifier => {
                let name = self.advance().map(|t| t.text().to_string()).unwrap_or_default();
                Ok(Some(Expr::new(ExprKind::Variable(name), span)))
            }

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.require(Self::expression, "an expression after '('")?;
                self.expect(TokenKind::RightParen, "')' to close the group")?;
                Ok(Some(inner))
            }

            TokenKind::LeftBracket => {
                self.advance();
                let (items, end) = self.items(TokenKind::RightBracket, "a list item", "',' or ']' in the list")?;
                Ok(Some(Expr::new(ExprKind::List(items), span.to(end))))
            }

            TokenKind::LeftBrace => self.table().map(Some),

            TokenKind::Fn => {
                self.advance();
                let function = self.function_literal(None)?;
                let end = function.body.span;
                Ok(Some(Expr::new(ExprKind::Function(function), span.to(end))))
            }

            _ => Ok(None),
        }
    }

    /// Comma-separated expressions up to `close`; a trailing comma is
    /// allowed. The opening token has been consumed.
    fn items(&mut self, close: TokenKind, item: &str, separator: &str) -> PResult<(Vec<Expr>, Span)> {
        let mut items = Vec::new();

        loop {
            if let Some(end) = self.match_span(close) {
                return Ok((items, end));
            }

            items.push(self.require(Self::expression, item)?);

            if !self.match_kind(TokenKind::Comma) {
                let end = self.expect(close, separator)?;
                return Ok((items, end));
            }
        }
    }

    /* ------------------------------------------------------------------
     * table := '{' (key ':' expr (',' key ':' expr)* ','?)? '}'
     * ---------------------------------------------------------------- */
    fn table(&mut self) -> PResult<Expr> {
        let start = self.expect(TokenKind::LeftBrace, "'{'")?;
        let mut entries = Vec::new();

        loop {
            if let Some(end) = self.match_span(TokenKind::RightBrace) {
                return Ok(Expr::new(ExprKind::Table(entries), start.to(end)));
            }

            let key = self.table_key()?;
            self.expect(TokenKind::Colon, "':' after the table key")?;
            let value = self.require(Self::expression, "a value for the table key")?;
            entries.push((key, value));

            if !self.match_kind(TokenKind::Comma) {
                let end = self.expect(TokenKind::RightBrace, "',' or '}' in the table")?;
                return Ok(Expr::new(ExprKind::Table(entries), start.to(end)));
            }
        }
    }

    /// A bare name is a string key; `[expr]` is computed; anything else
    /// must be a value.
    fn table_key(&mut self) -> PResult<Expr> {
        let span = self.peek_span();

        match self.peek_kind() {
            TokenKind::Identifier => {
                let name = self.advance().map(|t| t.text().to_string()).unwrap_or_default();
                Ok(Expr::new(ExprKind::Literal(Some(Value::String(name))), span))
            }

            TokenKind::LeftBracket => {
                self.advance();
                let key = self.require(Self::expression, "a key expression")?;
                self.expect(TokenKind::RightBracket, "']' to close the key")?;
                Ok(key)
            }

            _ => self.require(Self::value, "a table key or '}'"),
        }
    }

    /// `(params) block`, after `fn` and the optional name.
    pub(crate) fn function_literal(&mut self, name: Option<String>) -> PResult<FunctionLiteral> {
        self.expect(TokenKind::LeftParen, "'(' to start the parameter list")?;

        let mut params = Vec::new();
        while !self.match_kind(TokenKind::RightParen) {
            let (param, _) = self.expect_identifier("a parameter name or ')'")?;
            params.push(param);

            if !self.match_kind(TokenKind::Comma) {
                self.expect(TokenKind::RightParen, "',' or ')' after a parameter")?;
                break;
            }
        }

        let enclosing_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.block();
        self.loop_depth = enclosing_loops;

        Ok(FunctionLiteral {
            name,
            params: params.into(),
            body: Rc::new(body?),
        })
    }
}

fn start_symbol(op: StepOp) -> &'static str {
    match op {
        StepOp::Increment => "++",
        StepOp::Decrement => "--",
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, ExprKind, StmtKind};
    use crate::lexer::lex;
    use crate::parser::parse;

    fn expr(source: &str) -> ExprKind {
        let tokens = lex(source).unwrap();
        let program = parse(&tokens).unwrap();
        match program.kind {
            StmtKind::Sequence(mut stmts) => match stmts.remove(0).kind {
                StmtKind::Expression(e) => e.kind,
                other => panic!("not an expression statement: {:?}", other),
            },
            other => panic!("not a sequence: {:?}", other),
        }
    }

    #[test]
    fn same_level_operators_form_one_chain() {
        match expr("1 - 2 + 3") {
            ExprKind::Binary { tails, .. } => {
                let ops: Vec<BinaryOp> = tails.iter().map(|t| t.op).collect();
                assert_eq!(ops, vec![BinaryOp::Sub, BinaryOp::Add]);
            }
            other => panic!("expected binary chain, got {:?}", other),
        }
    }

    #[test]
    fn access_chain_collects_every_tail() {
        match expr("a.b[c](d).e") {
            ExprKind::Access { tails, .. } => assert_eq!(tails.len(), 4),
            other => panic!("expected access chain, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        match expr("a = b = 1") {
            ExprKind::Assign { value, .. } => {
                assert!(matches!(value.kind, ExprKind::Assign { .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn literal_cannot_be_assigned() {
        let tokens = lex("1 = 2").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(err.message.as_deref(), Some("invalid assignment target"));
    }

    #[test]
    fn call_result_cannot_be_incremented() {
        let tokens = lex("f()++").unwrap();
        assert!(!parse(&tokens).unwrap_err().is_recoverable());
    }
}
