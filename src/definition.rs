//! Grammar documents: grammars written as YAML or JSON data.
//!
//! A document is a tree of single-key maps, one key per node kind:
//!
//! ```yaml
//! description: a quoted string between blanks
//! grammar:
//!   seq:
//!     - repeat: { class: whitespace }
//!     - var:
//!         name: var1
//!         tag: string
//!         completions: ['"hello"', '"help"']
//!         node:
//!           seq:
//!             - literal: '"'
//!             - repeat: { class: '[^"]' }
//!             - literal: '"'
//!     - repeat: { class: whitespace }
//! ```
//!
//! `class` takes either a class expression (`[a-z]`, `\d`) or one of the
//! named classes listed by [`CharClass::names`]. A `seq` or `alt` with a
//! single entry stands for that entry.

use crate::grammar::{literal, repeat, CharClass, ConstructionError, Node, Variable, WordCompleter};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read grammar document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML grammar document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON grammar document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{kind}` needs at least one entry")]
    EmptyList { kind: &'static str },

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// Serialization format of a grammar document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDocument {
    #[serde(default)]
    pub description: Option<String>,
    pub grammar: GrammarDef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarDef {
    Seq(Vec<GrammarDef>),
    Alt(Vec<GrammarDef>),
    Literal(String),
    Class(String),
    Repeat(Box<GrammarDef>),
    Var(VariableDef),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDef {
    pub name: String,
    pub node: Box<GrammarDef>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Fixed candidates offered by a [`WordCompleter`].
    #[serde(default)]
    pub completions: Option<Vec<String>>,
}

impl GrammarDocument {
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, DefinitionError> {
        let document = match format {
            DocumentFormat::Json => serde_json::from_str(text)?,
            DocumentFormat::Yaml => serde_yaml::with::singleton_map_recursive::deserialize(
                serde_yaml::Deserializer::from_str(text),
            )?,
        };
        Ok(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::parse(&text, DocumentFormat::from_path(path))?;
        tracing::debug!(path = %path.display(), "loaded grammar document");
        Ok(document)
    }

    pub fn to_node(&self) -> Result<Node, DefinitionError> {
        self.grammar.to_node()
    }
}

impl GrammarDef {
    /// Build the node tree this definition describes.
    ///
    /// Every call builds fresh nodes, so two calls never share identity.
    pub fn to_node(&self) -> Result<Node, DefinitionError> {
        match self {
            GrammarDef::Seq(items) => build_list("seq", items, Node::sequence),
            GrammarDef::Alt(items) => build_list("alt", items, Node::any),
            GrammarDef::Literal(text) => Ok(literal(text)),
            GrammarDef::Class(expr) => Ok(class(expr)?.into()),
            GrammarDef::Repeat(child) => Ok(repeat(child.to_node()?)),
            GrammarDef::Var(def) => {
                let mut var = Variable::new(def.node.to_node()?, def.name.as_str());
                if let Some(tag) = &def.tag {
                    var = var.with_tag(tag.as_str());
                }
                if let Some(words) = &def.completions {
                    var = var.with_completer(WordCompleter::new(words.iter().cloned()));
                }
                Ok(var.into())
            }
        }
    }
}

fn build_list(
    kind: &'static str,
    items: &[GrammarDef],
    combine: impl FnOnce(Vec<Node>) -> Result<Node, ConstructionError>,
) -> Result<Node, DefinitionError> {
    match items {
        [] => Err(DefinitionError::EmptyList { kind }),
        [single] => single.to_node(),
        _ => {
            let children = items
                .iter()
                .map(GrammarDef::to_node)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(combine(children)?)
        }
    }
}

/// Bare words name a class; anything else is a class expression.
fn class(expr: &str) -> Result<CharClass, ConstructionError> {
    let is_name = expr.len() > 1 && expr.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
    if is_name {
        CharClass::named(expr)
    } else {
        CharClass::new(expr)
    }
}
