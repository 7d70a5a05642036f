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

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interpreter::environment::DEFAULT_MAX_CALL_DEPTH;

/// Which engine executes programs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// Walk the tree directly.
    #[default]
    Tree,
    /// Build a closure graph, then run it.
    Compiled,
}

/// What a constant list or table literal evaluates to on the compiled path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LiteralPolicy {
    /// A new container per evaluation, same as the tree walker.
    #[default]
    Fresh,
    /// One container shared by every evaluation of the literal.
    Cache,
}

/// Session settings.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "mode": "compiled", "max_call_depth": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: EvalMode,
    pub literal_policy: LiteralPolicy,
    pub max_call_depth: usize,
    /// Install `print`, `len` and the other core globals.
    pub prelude: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: EvalMode::default(),
            literal_policy: LiteralPolicy::default(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            prelude: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
