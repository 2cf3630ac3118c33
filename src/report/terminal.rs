use super::ReportOptions;
use crate::scan::{FileScanResult, SearchMode};
use colored::Colorize;
use console::truncate_str;
use miette::Result;

/// Human-readable table output.
pub struct TerminalReporter<'a> {
    options: &'a ReportOptions,
}

impl<'a> TerminalReporter<'a> {
    pub fn new(options: &'a ReportOptions) -> Self {
        Self { options }
    }

    pub fn report(&self, mode: SearchMode, results: &[&FileScanResult]) -> Result<()> {
        if self.options.no_color {
            colored::control::set_override(false);
        }

        if results.is_empty() {
            println!("No usage found.");
            return Ok(());
        }

        let shown: &[&FileScanResult] = match self.options.limit {
            Some(limit) if results.len() > limit => {
                println!("Showing first {} results (of {} total)", limit, results.len());
                &results[..limit]
            }
            _ => results,
        };

        let path_width = shown
            .iter()
            .map(|r| r.path.to_string_lossy().len())
            .max()
            .unwrap_or(4)
            .max(4);

        let member_header = if mode == SearchMode::Class { "" } else { "  Members" };
        println!(
            "{}",
            format!("{:<path_width$}  {:>7}{}", "Path", "Matches", member_header).bold()
        );
        println!("{}", "-".repeat(path_width + 9 + member_header.len()));

        for result in shown {
            let path = result.path.to_string_lossy();
            let member_info = if mode == SearchMode::Class {
                String::new()
            } else {
                format!("  {}", result.members().join(",").yellow())
            };

            println!(
                "{}  {:>7}{}",
                format!("{:<path_width$}", path).green(),
                result.total_matches,
                member_info
            );

            if self.options.with_lines {
                for hit in &result.hits {
                    let snippet = truncate_str(&hit.snippet, 80, "...");
                    match &hit.member {
                        Some(member) => println!(
                            "  {:>5}: {} {}  {}",
                            hit.line,
                            hit.category.as_str().yellow(),
                            member.yellow(),
                            snippet
                        ),
                        None => println!(
                            "  {:>5}: {}  {}",
                            hit.line,
                            hit.category.as_str().blue(),
                            snippet
                        ),
                    }
                }
            }
        }

        Ok(())
    }
}
