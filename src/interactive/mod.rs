//! Interactive prompts for the pieces the CLI flags did not provide.
//!
//! Validation happens inside the prompts, so a typo re-asks instead of
//! aborting; piping input or passing all flags skips this module entirely.

use crate::scan::SearchMode;
use crate::target::{select_members, MemberKind, TargetSpec};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{miette, IntoDiagnostic, Result};
use std::path::PathBuf;

const SOURCE_EXTENSIONS: &[&str] = &["kt", "kts", "java"];

/// Ask for the target file path, insisting on an existing Kotlin/Java file.
pub fn prompt_target_path() -> Result<PathBuf> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Target Kotlin/Java class file (.kt/.kts/.java)")
        .validate_with(|value: &String| -> Result<(), String> {
            let path = expand_path(value);
            if !path.is_file() {
                return Err(format!("not a file: {}", path.display()));
            }
            let ok = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| SOURCE_EXTENSIONS.contains(&e))
                .unwrap_or(false);
            if !ok {
                return Err("expected a .kt, .kts, or .java file".to_string());
            }
            Ok(())
        })
        .interact_text()
        .into_diagnostic()?;

    Ok(expand_path(&input))
}

/// Ask which kind of usages to search for.
pub fn prompt_mode() -> Result<SearchMode> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Search mode")
        .items(&[
            "Class usages",
            "Method usages",
            "Field/property usages",
        ])
        .default(0)
        .interact()
        .into_diagnostic()?;

    Ok(match choice {
        0 => SearchMode::Class,
        1 => SearchMode::Method,
        _ => SearchMode::Field,
    })
}

/// Ask for the member subset in method/field mode.
pub fn prompt_members(target: &TargetSpec, kind: MemberKind) -> Result<Vec<String>> {
    let available = target.members_of_kind(kind);
    if available.is_empty() {
        return Err(miette!(
            "no {} found in target class {}",
            kind.plural(),
            target.simple_name
        ));
    }

    println!("Available {}: {}", kind.plural(), available.join(", "));

    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Select {} (comma-separated names, /regex/, or 'all')",
            kind.plural()
        ))
        .validate_with(|value: &String| -> Result<(), String> {
            select_members(value, &available, kind)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .into_diagnostic()?;

    select_members(&input, &available, kind).map_err(Into::into)
}

fn expand_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(trimmed)
}
