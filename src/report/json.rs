use super::ReportOptions;
use crate::scan::{FileScanResult, SearchMode};
use crate::target::TargetSpec;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// JSON reporter for programmatic output.
pub struct JsonReporter<'a> {
    options: &'a ReportOptions,
}

impl<'a> JsonReporter<'a> {
    pub fn new(options: &'a ReportOptions) -> Self {
        Self { options }
    }

    pub fn report(
        &self,
        target: &TargetSpec,
        mode: SearchMode,
        members: &[String],
        results: &[&FileScanResult],
    ) -> Result<()> {
        let report = JsonReport::build(target, mode, members, results, self.options.with_lines);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.options.output {
            std::fs::write(path, &json).into_diagnostic()?;
            eprintln!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    target: JsonTarget<'a>,
    mode: SearchMode,
    members: &'a [String],
    total_files: usize,
    total_matches: usize,
    results: Vec<JsonFile>,
}

#[derive(Serialize)]
struct JsonTarget<'a> {
    package: &'a str,
    class_name: &'a str,
    fqn: &'a str,
}

#[derive(Serialize)]
struct JsonFile {
    path: String,
    count: usize,
    package: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hits: Vec<JsonHit>,
}

#[derive(Serialize)]
struct JsonHit {
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    member: Option<String>,
    category: &'static str,
    snippet: String,
}

impl<'a> JsonReport<'a> {
    fn build(
        target: &'a TargetSpec,
        mode: SearchMode,
        members: &'a [String],
        results: &[&FileScanResult],
        with_lines: bool,
    ) -> Self {
        let files: Vec<JsonFile> = results
            .iter()
            .map(|result| JsonFile {
                // POSIX-style paths keep the output stable across platforms.
                path: result.path.to_string_lossy().replace('\\', "/"),
                count: result.total_matches,
                package: result.package.clone(),
                hits: if with_lines {
                    result
                        .hits
                        .iter()
                        .map(|hit| JsonHit {
                            line: hit.line,
                            column: hit.column,
                            member: hit.member.clone(),
                            category: hit.category.as_str(),
                            snippet: hit.snippet.clone(),
                        })
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect();

        Self {
            version: "1.0",
            target: JsonTarget {
                package: &target.package,
                class_name: &target.simple_name,
                fqn: &target.fqn,
            },
            mode,
            members,
            total_files: files.len(),
            total_matches: results.iter().map(|r| r.total_matches).sum(),
            results: files,
        }
    }
}
