//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;

use buildsmith_model::{TypeDecl, TypeRepository};

use crate::derive::{DerivationConfig, DeriveError, DerivedFamily, Deriver};
use crate::outline::outline;

use super::{CliError, CliResult, ExitCode};

/// Maximum model file size (100 MB)
///
/// Larger files are rejected before reading.
const MAX_MODEL_SIZE: u64 = 100 * 1024 * 1024;

/// Read a model file with a size check.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be accessed or read
/// - The file exceeds `MAX_MODEL_SIZE` (100 MB)
pub fn read_model_file(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_MODEL_SIZE {
        return Err(CliError::failure(format!(
            "Model file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_MODEL_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Decode one optional array of declarations from the model document.
fn section(document: &mut serde_json::Value, key: &str) -> CliResult<Vec<TypeDecl>> {
    match document.get_mut(key).map(serde_json::Value::take) {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|e| CliError::failure(format!("Invalid `{key}`: {e}"))),
    }
}

/// Build a repository from a JSON model document.
///
/// `types` are registered first, then `buildables`, each in file order.
pub fn load_model(json: &str) -> CliResult<TypeRepository> {
    let mut document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| CliError::failure(format!("Invalid model JSON: {e}")))?;
    if !document.is_object() {
        return Err(CliError::failure("Invalid model: expected an object with `types` and `buildables`"));
    }

    let types = section(&mut document, "types")?;
    let buildables = section(&mut document, "buildables")?;
    tracing::debug!(types = types.len(), buildables = buildables.len(), "loaded model");

    let mut repo = TypeRepository::new();
    for decl in types {
        repo.register(decl);
    }
    repo.register_buildables(buildables);
    Ok(repo)
}

/// Render a derivation failure with its diagnostic code and help.
fn derive_failure(err: DeriveError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

fn derive_all(repo: &mut TypeRepository, config: &DerivationConfig) -> CliResult<Vec<DerivedFamily>> {
    Deriver::new(repo, config.clone()).derive_buildables().map_err(derive_failure)
}

/// Whether `family` is selected by `only` (simple or qualified source name).
fn selected(family: &DerivedFamily, only: Option<&str>) -> bool {
    only.is_none_or(|name| family.source.simple_name() == name || family.source.id.to_string() == name)
}

/// Outline of every derived declaration, one block per source type.
pub fn render_families(families: &[DerivedFamily], only: Option<&str>) -> String {
    let mut blocks = Vec::new();
    for family in families.iter().filter(|f| selected(f, only)) {
        let mut block = format!("// {}", family.source.id);
        for decl in family.derived() {
            block.push('\n');
            block.push_str(&outline(decl));
        }
        blocks.push(block);
    }
    blocks.join("\n\n")
}

/// `buildsmith derive <model>`
pub fn derive_model(file_path: &str, only: Option<&str>, config: &DerivationConfig) -> CliResult<ExitCode> {
    let source = read_model_file(file_path)?;
    let mut repo = load_model(&source)?;
    let families = derive_all(&mut repo, config)?;

    if let Some(name) = only {
        if !families.iter().any(|f| selected(f, Some(name))) {
            return Err(CliError::failure(format!("No buildable type named '{name}' in {file_path}")));
        }
    }
    println!("{}", render_families(&families, only));
    Ok(ExitCode::SUCCESS)
}

/// `buildsmith check <model>`
pub fn check_model(file_path: &str, config: &DerivationConfig) -> CliResult<ExitCode> {
    let source = read_model_file(file_path)?;
    let mut repo = load_model(&source)?;
    let families = derive_all(&mut repo, config)?;

    let derived: usize = families.iter().map(|f| f.derived().count()).sum();
    tracing::info!(families = families.len(), derived, "model derives cleanly");
    println!("✓ {} ({} buildable types, {} derived declarations)", file_path, families.len(), derived);
    Ok(ExitCode::SUCCESS)
}
