/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Stack Growth
 * ------------
 * Parsing, compiling and evaluating all recurse on the shape of the
 * program. Nested source and script-level recursion must not be bounded
 * by the host thread's native stack, so every recursive entry point runs
 * through `ensure_sufficient_stack`, which switches to a freshly
 * allocated segment when the current one is nearly exhausted.
 *
 * The call-depth limit stays the only bound on script recursion.
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

/// Space that must remain before `f` runs on the current segment.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Runs `f`, first moving to a new stack segment when fewer than
/// `RED_ZONE` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
