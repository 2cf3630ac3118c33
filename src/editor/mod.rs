//! Opening matched locations in an editor.
//!
//! Editor preference comes from `$VISUAL`/`$EDITOR`; VS Code, IntelliJ IDEA
//! and Android Studio get line-precise invocations, everything else falls
//! back to the platform opener without a line number.

use crate::scan::FileScanResult;
use dialoguer::MultiSelect;
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// One openable location.
struct Location<'a> {
    path: &'a Path,
    line: usize,
    label: String,
}

/// Open every hit, or let the user pick with `select`.
pub fn open_results(results: &[FileScanResult], select: bool) -> Result<()> {
    let mut locations = Vec::new();
    for result in results {
        for hit in &result.hits {
            let member = hit
                .member
                .as_deref()
                .map(|m| format!(" {} {}", hit.category, m))
                .unwrap_or_default();
            locations.push(Location {
                path: &result.path,
                line: hit.line,
                label: format!("{}:{}{}", result.path.display(), hit.line, member),
            });
        }
    }

    if locations.is_empty() {
        println!("No results to open.");
        return Ok(());
    }

    let chosen: Vec<&Location> = if select {
        let labels: Vec<&str> = locations.iter().map(|l| l.label.as_str()).collect();
        let picked = MultiSelect::new()
            .with_prompt("Select locations to open (space to toggle, enter to confirm)")
            .items(&labels)
            .interact()
            .into_diagnostic()?;
        picked.into_iter().map(|i| &locations[i]).collect()
    } else {
        locations.iter().collect()
    };

    for location in chosen {
        if !open_in_editor(location.path, location.line) {
            eprintln!("Failed to open: {}", location.label);
        }
    }

    Ok(())
}

/// Try to open `path` at `line`. Returns false when no opener worked.
pub fn open_in_editor(path: &Path, line: usize) -> bool {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_default();

    // Known editors first, with line-precise arguments.
    let attempts: Vec<(&str, Vec<String>)> = vec![
        (
            "code",
            vec!["-g".to_string(), format!("{}:{}", path.display(), line)],
        ),
        (
            "idea",
            vec![
                "--line".to_string(),
                line.to_string(),
                path.display().to_string(),
            ],
        ),
        (
            "studio",
            vec![
                "--line".to_string(),
                line.to_string(),
                path.display().to_string(),
            ],
        ),
    ];

    // Honor an explicit preference before probing in order.
    let preferred = attempts
        .iter()
        .position(|(name, _)| !editor.is_empty() && editor.contains(*name));

    let ordered: Vec<&(&str, Vec<String>)> = match preferred {
        Some(i) => {
            let mut v = vec![&attempts[i]];
            v.extend(attempts.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, a)| a));
            v
        }
        None => attempts.iter().collect(),
    };

    for (program, args) in ordered {
        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => return true,
            Ok(_) | Err(_) => {
                debug!("editor candidate {} not usable", program);
            }
        }
    }

    // Platform fallback, without line positioning.
    let fallback = if cfg!(target_os = "macos") {
        Some(("open", vec![path.display().to_string()]))
    } else if cfg!(target_os = "linux") {
        Some(("xdg-open", vec![path.display().to_string()]))
    } else if cfg!(target_os = "windows") {
        Some(("cmd", vec!["/C".to_string(), "start".to_string(), String::new(), path.display().to_string()]))
    } else {
        None
    };

    if let Some((program, args)) = fallback {
        if let Ok(status) = Command::new(program).args(args).status() {
            return status.success();
        }
    }

    false
}
