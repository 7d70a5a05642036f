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

//! Syntax tree produced by the parser.
//!
//! Nodes are immutable once built. Binary operators and access suffixes
//! are stored as a left operand plus an ordered list of tails rather than
//! as left-recursive nesting. Function bodies are `Rc<Stmt>` so the tree
//! walker and the closure compiler can both hold them without copying.

pub mod expr;
pub mod stmt;

pub use expr::{
    AccessKind, AccessTail, AssignOp, BinaryOp, BinaryTail, Expr, ExprKind, Fixity,
    FunctionLiteral, LogicalOp, StepOp, Target,
};
pub use stmt::{Stmt, StmtKind};
