//! Subcommand implementations. Each returns the text printed on stdout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bst_ast::Module;
use bst_eval::{Database, EvalConfig, Machine, RunReport};
use config::constants::MAX_FILE_SIZE;
use rayon::prelude::*;

/// Reads a style or database file, refusing files over [`MAX_FILE_SIZE`].
pub fn read_source(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot access {}", path.display()))?;
    if metadata.len() > MAX_FILE_SIZE as u64 {
        bail!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            metadata.len(),
            MAX_FILE_SIZE
        );
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// `bst parse`: the syntax tree, errors included, as pretty JSON.
pub fn parse(path: &Path) -> Result<String> {
    let source = read_source(path)?;
    let cst = bst_parser::parse(&source);
    for error in &cst.errors {
        tracing::warn!(file = %path.display(), "{}", error);
    }
    serde_json::to_string_pretty(&cst).context("cannot serialize syntax tree")
}

/// `bst lower`: reductions of every function, one section per file.
pub fn lower(paths: &[PathBuf]) -> Result<String> {
    let sections = paths
        .par_iter()
        .map(|path| lower_one(path))
        .collect::<Result<Vec<_>>>()?;
    Ok(sections.join("\n"))
}

fn lower_one(path: &Path) -> Result<String> {
    let source = read_source(path)?;
    let module =
        Module::from_text(&source).with_context(|| format!("cannot load {}", path.display()))?;
    tracing::debug!(file = %path.display(), %module, "lowered");

    let mut out = format!("// {}\n", path.display());
    for reduction in module.reductions() {
        writeln!(out, "{}", reduction)?;
        for diagnostic in &reduction.diagnostics {
            writeln!(out, "// {}", diagnostic)?;
        }
    }
    Ok(out)
}

/// Limits given on the command line; unset values keep their defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOverrides {
    pub max_call_depth: Option<usize>,
    pub max_stack_size: Option<usize>,
    pub max_while_iterations: Option<usize>,
}

impl LimitOverrides {
    pub fn apply(&self, mut config: EvalConfig) -> EvalConfig {
        if let Some(depth) = self.max_call_depth {
            config = config.with_max_call_depth(depth);
        }
        if let Some(size) = self.max_stack_size {
            config = config.with_max_stack_size(size);
        }
        if let Some(iterations) = self.max_while_iterations {
            config = config.with_max_while_iterations(iterations);
        }
        config
    }
}

/// `bst run`: run the style over the database.
pub fn run(path: &Path, database: Option<&Path>, limits: LimitOverrides) -> Result<RunReport> {
    let source = read_source(path)?;
    let module =
        Module::from_text(&source).with_context(|| format!("cannot load {}", path.display()))?;
    let database = match database {
        Some(db_path) => Database::from_json(&read_source(db_path)?)
            .with_context(|| format!("invalid database {}", db_path.display()))?,
        None => Database::default(),
    };

    let config = limits.apply(EvalConfig::default());
    Machine::new(&module)
        .with_config(config)
        .with_database(database)
        .run()
        .with_context(|| format!("error while running {}", path.display()))
}

/// `bst grammar`
pub fn grammar() -> Result<String> {
    tree_sitter_bst::language()
        .node_types_json()
        .context("cannot serialize node types")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_overrides() {
        let overrides = LimitOverrides {
            max_call_depth: Some(8),
            ..Default::default()
        };
        let config = overrides.apply(EvalConfig::default());
        assert_eq!(config.limits.max_call_depth, 8);
        assert_eq!(
            config.limits.max_stack_size,
            EvalConfig::default().limits.max_stack_size
        );
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_source(Path::new("/nonexistent/style.bst")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/style.bst"));
    }

    #[test]
    fn test_grammar_json_names_grammar() {
        let json = grammar().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "bst");
    }
}
