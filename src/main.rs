use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use asyncsuffix_linter::config::{attribute_catalog, find_config_file, load_config, merge_config};
use asyncsuffix_linter::location::LineIndex;
use asyncsuffix_linter::models::{Severity, Violation};
use asyncsuffix_linter::rules::{self, base::LintRule};
use asyncsuffix_linter::workspace::Workspace;
use asyncsuffix_linter::{find_csharp_files, fix, lint_path, rule_docs, LinterOptions};

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Github,
}

#[derive(ValueEnum, Clone, Debug)]
enum SeverityLevel {
    Error,
    Warning,
    Info,
}

/// Exit codes used by the linter
mod exit_codes {
    pub const SUCCESS: i32 = 0; // No violations found
    pub const VIOLATIONS_FOUND: i32 = 1; // Violations found
    pub const USAGE_ERROR: i32 = 2; // Invalid arguments or usage
    pub const FILE_ERROR: i32 = 3; // File not found or I/O error
    pub const PARSE_ERROR: i32 = 4; // Failed to parse C# files
    pub const CONFIG_ERROR: i32 = 5; // Configuration file error
}

#[derive(Parser, Debug)]
#[command(
    name = "asyncsuffix-linter",
    author,
    version,
    about = "Check C# test methods for async naming convention violations",
    long_about = "Check C# test methods for async naming convention violations.\n\nIf no paths are provided, the current directory is checked recursively."
)]
struct Args {
    /// Paths to analyze (files or directories)
    ///
    /// Examples: asyncsuffix-linter (current dir), asyncsuffix-linter src/, asyncsuffix-linter Tests.cs
    #[arg(default_value = ".")]
    paths: Vec<String>,

    /// Path to configuration file (asyncsuffix.toml)
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Output format
    ///
    /// Example: -f json (for CI/CD), -f github (for GitHub Actions)
    #[arg(
        short = 'f',
        long = "output-format",
        value_enum,
        default_value = "terminal"
    )]
    output_format: OutputFormat,

    /// Disable specific rules (can be used multiple times)
    ///
    /// Example: -d ASL002
    #[arg(short = 'd', long = "disable")]
    disable: Vec<String>,

    /// Enable only specific rules (can be used multiple times)
    ///
    /// Example: -e ASL001
    #[arg(short = 'e', long = "enable")]
    enable: Vec<String>,

    /// Apply fixes: rename suffixed test methods (and their references)
    /// and convert awaiting test methods to async
    #[arg(long = "fix")]
    fix: bool,

    /// Disable parallel processing
    #[arg(long = "no-parallel")]
    no_parallel: bool,

    /// Show source code in violations
    #[arg(long = "show-source", default_value = "true")]
    show_source: bool,

    /// Disable source code in violations
    #[arg(long = "no-show-source", conflicts_with = "show_source")]
    no_show_source: bool,

    /// Enable colored output
    #[arg(long = "color", default_value = "true")]
    color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    no_color: bool,

    /// Minimum severity level to report
    ///
    /// Example: -s error (only errors), -s warning (warnings+errors)
    #[arg(
        short = 's',
        long = "severity",
        value_enum,
        conflicts_with = "show_only"
    )]
    severity: Option<SeverityLevel>,

    /// Show only specific severity levels (comma-separated: error,warning,info)
    #[arg(long = "show-only", value_delimiter = ',', conflicts_with = "severity")]
    show_only: Vec<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Show documentation for asyncsuffix.toml configuration
    #[arg(long = "show-config-docs")]
    show_config_docs: bool,

    /// Show detailed documentation for a specific rule
    ///
    /// Example: --show-rule-doc ASL001
    #[arg(long = "show-rule-doc")]
    show_rule_doc: Option<String>,

    /// Number of threads to use (0 = auto)
    #[arg(short = 'j', long = "threads", default_value = "0", hide = true)]
    threads: usize,

    /// Skip files matching pattern
    #[arg(long = "skip", hide = true)]
    skip: Vec<String>,

    /// Cache parsed trees
    #[arg(long = "cache", hide = true)]
    cache: bool,

    /// Count files only (don't analyze)
    #[arg(long = "count", hide = true)]
    count: bool,

    /// Exit with non-zero code if warnings are found
    #[arg(long = "error-on-warning")]
    error_on_warning: bool,
}

fn show_configuration_docs() {
    let docs = r#"
asyncsuffix-linter Configuration Documentation
==============================================

The linter reads an asyncsuffix.toml found by walking up from the analyzed
path (or passed explicitly with --config).

Example Configuration:
----------------------

# Enable specific rules (if not specified, all rules are enabled)
enable = ["ASL001", "ASL002"]

# Or disable specific rules
disable = ["ASL002"]

# Exclude paths from linting
exclude = ["bin", "obj", "Generated"]

# Replace the recognized test attribute catalog...
test_attributes = ["TestMethod", "Test", "Fact", "Theory"]

# ...or extend it for in-house frameworks
extra_test_attributes = ["IntegrationFact"]

# Rename behavior used by --fix
[rename]
overloads = true   # rename same-named method declarations too
strings = false    # leave string literals alone
comments = true    # rename whole-word occurrences in comments

Available Rules:
----------------
- ASL001: Test methods returning Task should not have an 'Async' suffix
- ASL002: Test methods that await must be declared async

Configuration Precedence:
-------------------------
1. Command line options (--enable, --disable) override all
2. Explicit config file specified with --config
3. Nearest asyncsuffix.toml above the analyzed path
4. Default configuration (all rules enabled)
"#;
    println!("{docs}");
}

fn show_rule_documentation(rule_id: &str) -> Result<()> {
    let rule_id = rule_id.trim().to_uppercase();
    let docs = rule_docs::get_rule_docs();

    if let Some(content) = docs.get(rule_id.as_str()) {
        println!("{content}");
        Ok(())
    } else {
        eprintln!("Error: No documentation found for rule {rule_id}");
        eprintln!("Use --show-config-docs to see available rules.");
        process::exit(exit_codes::USAGE_ERROR);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start = Instant::now();

    init_logging(args.verbose);

    let mut had_file_errors = false;
    let mut had_parse_errors = false;

    if args.show_config_docs {
        show_configuration_docs();
        return Ok(());
    }

    if let Some(rule_id) = args.show_rule_doc {
        return show_rule_documentation(&rule_id);
    }

    let show_source = !args.no_show_source && args.show_source;
    let use_color = !args.no_color && args.color;

    // Load configuration early for all modes
    let config = if let Some(config_path) = &args.config {
        let loaded = load_config(Some(Path::new(config_path)));
        if loaded.is_none() {
            eprintln!("Error: Could not load configuration from {config_path}");
            process::exit(exit_codes::CONFIG_ERROR);
        }
        loaded
    } else {
        let start_path = Path::new(&args.paths[0]);
        let abs_path = start_path
            .canonicalize()
            .unwrap_or_else(|_| start_path.to_path_buf());
        if let Some(found) = find_config_file(&abs_path) {
            load_config(Some(&found))
        } else {
            load_config(None)
        }
    };

    let (enable_rules, skip_patterns) =
        merge_config(config.as_ref(), &args.enable, &args.disable, &args.skip);
    let catalog = attribute_catalog(config.as_ref());
    let rename_options = config
        .as_ref()
        .map_or_else(fix::RenameOptions::default, |c| c.rename.to_options());

    // Quick count mode
    if args.count {
        let mut total = 0;
        for path_str in &args.paths {
            let path = Path::new(path_str);
            let files = if path.is_file() {
                vec![path.to_path_buf()]
            } else {
                find_csharp_files(path, &skip_patterns)
            };
            total += files.len();
        }
        println!("Found {total} C# files");
        return Ok(());
    }

    let cancel = CancellationToken::new();

    // Apply fixes first, then report whatever remains. Only enabled rules
    // are fixed.
    if args.fix {
        let fix_rules = rules::get_rules_for_ids(enable_rules.as_deref());
        for path_str in &args.paths {
            let path = Path::new(path_str);
            if !path.exists() {
                eprintln!("Error: Path not found: {}", path.display());
                had_file_errors = true;
                continue;
            }

            match run_fix(path, &skip_patterns, &fix_rules, &catalog, rename_options, &cancel) {
                Ok((applied, written, skipped)) => {
                    if applied > 0 {
                        eprintln!(
                            "Applied {} fix{} across {} file{}",
                            applied,
                            if applied == 1 { "" } else { "es" },
                            written,
                            if written == 1 { "" } else { "s" }
                        );
                    }
                    for note in skipped {
                        eprintln!("Skipped: {note}");
                    }
                }
                Err(e) => {
                    eprintln!("Error fixing {}: {}", path.display(), e);
                    had_file_errors = true;
                }
            }
        }
    }

    // Process each path
    let mut all_violations = Vec::new();
    let mut total_files = 0;

    let options = LinterOptions {
        threads: if args.no_parallel { 1 } else { args.threads },
        rule: enable_rules.map(|rules| rules.join(",")),
        skip_patterns: skip_patterns.clone(),
        cache: args.cache || !args.no_parallel,
        attributes: catalog.clone(),
    };

    for path_str in &args.paths {
        let path = Path::new(path_str);

        if !path.exists() {
            eprintln!("Error: Path not found: {}", path.display());
            had_file_errors = true;
            continue;
        }

        match lint_path(path, &options, &cancel) {
            Ok(result) => {
                total_files += result.files_analyzed;
                if result.files_with_errors > 0 {
                    had_file_errors = true;
                }
                if result.parse_errors > 0 {
                    had_parse_errors = true;
                }
                for (file, violations) in result.violations {
                    all_violations.push((file, violations));
                }
            }
            Err(e) => {
                eprintln!("Error processing path {}: {}", path.display(), e);
                had_file_errors = true;
            }
        }
    }

    let filter_applied = args.severity.is_some() || !args.show_only.is_empty();
    filter_by_severity(&mut all_violations, args.severity, &args.show_only);

    match args.output_format {
        OutputFormat::Terminal => {
            report_terminal(&all_violations, show_source, use_color)?;
        }
        OutputFormat::Json => {
            report_json(&all_violations)?;
        }
        OutputFormat::Github => {
            report_github(&all_violations)?;
        }
    }

    let elapsed = start.elapsed();
    show_statistics(
        &all_violations,
        total_files,
        elapsed.as_secs_f64(),
        use_color,
        filter_applied,
    );

    let exit_code = if had_parse_errors {
        exit_codes::PARSE_ERROR
    } else if had_file_errors {
        exit_codes::FILE_ERROR
    } else {
        let has_errors = all_violations.iter().any(|(_, violations)| {
            violations
                .iter()
                .any(|v| matches!(v.severity, Severity::Error))
        });
        let has_warnings = all_violations.iter().any(|(_, violations)| {
            violations
                .iter()
                .any(|v| matches!(v.severity, Severity::Warning))
        });

        if has_errors || (has_warnings && args.error_on_warning) {
            exit_codes::VIOLATIONS_FOUND
        } else {
            exit_codes::SUCCESS
        }
    };

    if exit_code != exit_codes::SUCCESS {
        process::exit(exit_code);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("asyncsuffix_linter=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the batch fixer over one path. Returns (fixes applied, files
/// written, skipped-fix notes).
fn run_fix(
    path: &Path,
    skip_patterns: &[String],
    rules: &[Box<dyn LintRule>],
    catalog: &asyncsuffix_linter::config::TestAttributeCatalog,
    rename_options: fix::RenameOptions,
    cancel: &CancellationToken,
) -> Result<(usize, usize, Vec<String>)> {
    let baseline = Workspace::load(path, skip_patterns)?;
    let report = fix::fix_workspace(&baseline, rules, catalog, rename_options, cancel)?;
    let written = report.workspace.commit(&baseline)?;
    Ok((report.fixes_applied, written.len(), report.fixes_skipped))
}

fn filter_by_severity(
    all_violations: &mut Vec<(PathBuf, Vec<Violation>)>,
    minimum: Option<SeverityLevel>,
    show_only: &[String],
) {
    if let Some(min_severity) = minimum {
        let keep = move |severity: Severity| match min_severity {
            SeverityLevel::Error => matches!(severity, Severity::Error),
            SeverityLevel::Warning => matches!(severity, Severity::Error | Severity::Warning),
            SeverityLevel::Info => true,
        };
        retain_severities(all_violations, keep);
    } else if !show_only.is_empty() {
        use std::collections::HashSet;

        let mut show_levels = HashSet::new();
        for level in show_only {
            match level.to_lowercase().as_str() {
                "error" | "errors" => {
                    show_levels.insert(Severity::Error);
                }
                "warning" | "warnings" => {
                    show_levels.insert(Severity::Warning);
                }
                "info" => {
                    show_levels.insert(Severity::Info);
                }
                other => {
                    eprintln!(
                        "Warning: Unknown severity level '{other}', valid values are: error, warning, info"
                    );
                }
            }
        }

        if !show_levels.is_empty() {
            retain_severities(all_violations, move |s| show_levels.contains(&s));
        }
    }
}

fn retain_severities(
    all_violations: &mut Vec<(PathBuf, Vec<Violation>)>,
    keep: impl Fn(Severity) -> bool,
) {
    for (_, violations) in all_violations.iter_mut() {
        violations.retain(|v| keep(v.severity));
    }
    all_violations.retain(|(_, violations)| !violations.is_empty());
}

fn show_statistics(
    violations: &[(PathBuf, Vec<Violation>)],
    total_files: usize,
    elapsed_secs: f64,
    use_color: bool,
    filter_applied: bool,
) {
    let total_violations: usize = violations.iter().map(|(_, v)| v.len()).sum();

    let mut errors = 0;
    let mut warnings = 0;
    let mut infos = 0;
    let mut rule_counts: HashMap<String, usize> = HashMap::new();

    for (_, file_violations) in violations {
        for violation in file_violations {
            match violation.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
            }
            *rule_counts.entry(violation.rule_id.clone()).or_insert(0) += 1;
        }
    }

    eprintln!("\n{}", "=".repeat(60));

    if total_violations == 0 {
        if use_color {
            eprintln!("\x1b[32m✓ No issues found!\x1b[0m");
        } else {
            eprintln!("✓ No issues found!");
        }
    } else {
        eprintln!(
            "Linting Summary{}",
            if filter_applied { " (filtered)" } else { "" }
        );
        eprintln!("{}", "-".repeat(60));

        eprintln!("Total violations: {total_violations}");
        if use_color {
            eprintln!("  \x1b[31mErrors: {errors}\x1b[0m");
            eprintln!("  \x1b[33mWarnings: {warnings}\x1b[0m");
            eprintln!("  \x1b[34mInfo: {infos}\x1b[0m");
        } else {
            eprintln!("  Errors: {errors}");
            eprintln!("  Warnings: {warnings}");
            eprintln!("  Info: {infos}");
        }

        if !rule_counts.is_empty() {
            eprintln!("\nViolations by rule:");
            let mut sorted_rules: Vec<_> = rule_counts.iter().collect();
            sorted_rules.sort_by(|a, b| b.1.cmp(a.1));
            for (rule, count) in sorted_rules {
                eprintln!("  {rule}: {count}");
            }
        }
    }

    eprintln!("\nPerformance:");
    eprintln!("  Files analyzed: {total_files}");
    eprintln!("  Time: {elapsed_secs:.2}s");
    eprintln!("{}", "=".repeat(60));

    if total_violations > 0 {
        eprintln!("\nUse --show-rule-doc <RULE_ID> for detailed rule information and examples");
        eprintln!("Run with --fix to apply the rewrites automatically");
    }
}

fn report_terminal(
    violations: &[(PathBuf, Vec<Violation>)],
    show_source: bool,
    use_color: bool,
) -> Result<()> {
    let mut sorted_violations = violations.to_vec();
    sorted_violations.sort_by(|a, b| a.0.cmp(&b.0));

    for (file_idx, (file, file_violations)) in sorted_violations.iter().enumerate() {
        if file_idx > 0 {
            println!();
        }

        let mut file_errors = 0;
        let mut file_warnings = 0;
        let mut file_infos = 0;
        for violation in file_violations {
            match violation.severity {
                Severity::Error => file_errors += 1,
                Severity::Warning => file_warnings += 1,
                Severity::Info => file_infos += 1,
            }
        }

        if use_color {
            print!("\x1b[1;4m{}\x1b[0m", file.display());
            print!(" (");
            if file_errors > 0 {
                print!(
                    "\x1b[31m{} error{}\x1b[0m",
                    file_errors,
                    if file_errors == 1 { "" } else { "s" }
                );
                if file_warnings > 0 || file_infos > 0 {
                    print!(", ");
                }
            }
            if file_warnings > 0 {
                print!(
                    "\x1b[33m{} warning{}\x1b[0m",
                    file_warnings,
                    if file_warnings == 1 { "" } else { "s" }
                );
                if file_infos > 0 {
                    print!(", ");
                }
            }
            if file_infos > 0 {
                print!("\x1b[34m{file_infos} info\x1b[0m");
            }
            println!(")");
        } else {
            println!(
                "{} ({} error{}, {} warning{}, {} info)",
                file.display(),
                file_errors,
                if file_errors == 1 { "" } else { "s" },
                file_warnings,
                if file_warnings == 1 { "" } else { "s" },
                file_infos
            );
        }

        if let Ok(content) = fs::read_to_string(file) {
            let line_index = LineIndex::new(&content);

            let mut sorted_file_violations = file_violations.clone();
            sorted_file_violations.sort_by(|a, b| a.offset.cmp(&b.offset));

            for violation in sorted_file_violations {
                let (line, column) = line_index.line_col(&content, violation.offset);

                if use_color {
                    print!("  {line}:{column}: ");
                    match violation.severity {
                        Severity::Error => print!("\x1b[31m{}\x1b[0m", violation.rule_id),
                        Severity::Warning => print!("\x1b[33m{}\x1b[0m", violation.rule_id),
                        Severity::Info => print!("\x1b[34m{}\x1b[0m", violation.rule_id),
                    }
                    println!(": {}", violation.message);
                } else {
                    println!(
                        "  {}:{}: {}: {}",
                        line, column, violation.rule_id, violation.message
                    );
                }

                if show_source && line > 0 {
                    if let Some(source_line) = content.lines().nth(line - 1) {
                        println!("      {source_line}");
                        if column > 0 {
                            println!("      {}^", " ".repeat(column - 1));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn report_json(violations: &[(PathBuf, Vec<Violation>)]) -> Result<()> {
    use serde_json::json;

    let mut all_violations = Vec::new();

    for (file, file_violations) in violations {
        if let Ok(content) = fs::read_to_string(file) {
            let line_index = LineIndex::new(&content);

            for violation in file_violations {
                let (line, column) = line_index.line_col(&content, violation.offset);

                all_violations.push(json!({
                    "file": violation.file_path,
                    "line": line,
                    "column": column,
                    "rule": violation.rule_id,
                    "message": violation.message,
                    "method": violation.method_name,
                    "severity": format!("{:?}", violation.severity).to_lowercase(),
                }));
            }
        }
    }

    let output = json!({
        "violations": all_violations,
        "count": all_violations.len(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn report_github(violations: &[(PathBuf, Vec<Violation>)]) -> Result<()> {
    // GitHub Actions annotation format
    for (file, file_violations) in violations {
        if let Ok(content) = fs::read_to_string(file) {
            let line_index = LineIndex::new(&content);

            for violation in file_violations {
                let (line, column) = line_index.line_col(&content, violation.offset);

                let level = match violation.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "notice",
                };

                // ::error file=Tests.cs,line=1,col=5,title=RULE::message
                println!(
                    "::{} file={},line={},col={},title={}::{}",
                    level, violation.file_path, line, column, violation.rule_id, violation.message
                );
            }
        }
    }

    Ok(())
}
