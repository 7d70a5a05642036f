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

/// Core parser orchestration:
/// - Owns the `Parser` struct
/// - Exposes the main `parse(tokens)` entry point
pub mod parser;

/// Statement-level parsing:
/// - if / elif / else, while, for-in, for-of
/// - break / continue / return / global
/// - `fn name() {}` declarations
pub mod statements;

/// Expression-level parsing:
/// - assignment → or → and → equality → relational → additive
///   → multiplicative → process → unary → primary → value
/// - list, table and function literals, access chains
pub mod expressions;

/// Shared parser helpers:
/// - token matching
/// - lookahead checks
/// - fatal vs. incomplete errors
pub mod helpers;

/// Re-export the public parse entry point so callers can use:
/// `crate::parser::parse(...)`
pub use parser::{parse, Parser};
