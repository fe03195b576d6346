#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cognitive_complexity)]
// Allow some common patterns that are fine in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod errors;
pub mod fix;
pub mod location;
pub mod models;
pub mod rule_docs;
pub mod rules;
pub mod suppress;
pub mod syntax;
pub mod workspace;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tree_sitter::Tree;

use crate::config::TestAttributeCatalog;
use crate::errors::{LintError, Result};
use crate::location::LineIndex;
use crate::models::{RuleContext, Violation};
use crate::rules::base::LintRule;

/// Options for the linter
#[derive(Clone)]
pub struct LinterOptions {
    pub threads: usize,
    /// Comma-separated rule id filter
    pub rule: Option<String>,
    pub skip_patterns: Vec<String>,
    pub cache: bool,
    pub attributes: TestAttributeCatalog,
}

impl Default for LinterOptions {
    fn default() -> Self {
        Self {
            threads: 0,
            rule: None,
            skip_patterns: vec![],
            cache: true,
            attributes: TestAttributeCatalog::with_defaults(),
        }
    }
}

/// Result of linting
pub struct LintResult {
    pub violations: Vec<(PathBuf, Vec<Violation>)>,
    pub files_analyzed: usize,
    pub cached_trees: usize,
    pub files_with_errors: usize,
    pub parse_errors: usize,
}

/// A parsed file held by the cache. Source and tree travel together so spans
/// always index the text they were produced from.
struct CachedParse {
    content: String,
    tree: Tree,
}

type ParseCache = Arc<Mutex<HashMap<PathBuf, Arc<CachedParse>>>>;

/// Early exit check - generated sources are not worth analyzing
fn should_analyze_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.ends_with(".g.cs")
            || name.ends_with(".Designer.cs")
            || name.ends_with(".generated.cs")
        {
            return false;
        }
    }
    true
}

/// Analyze a single file with caching support
fn analyze_file(
    path: &Path,
    rules: &[Box<dyn LintRule>],
    catalog: &TestAttributeCatalog,
    cache: Option<&ParseCache>,
    cancel: &CancellationToken,
) -> Result<Vec<Violation>> {
    if !should_analyze_file(path) {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|e| LintError::io(path, e))?;

    if cancel.is_cancelled() {
        return Err(LintError::Cancelled);
    }

    // Quick check: both rules need an async marker or an await somewhere.
    let lowered = content.to_lowercase();
    if !lowered.contains("async") && !lowered.contains("await") {
        return Ok(Vec::new());
    }

    let parsed = if let Some(cache) = cache {
        let mut cache_guard = cache.lock().unwrap();
        if let Some(cached) = cache_guard.get(path) {
            cached.clone()
        } else {
            let tree = syntax::parse(&content, path)?;
            let cached = Arc::new(CachedParse { content, tree });
            cache_guard.insert(path.to_path_buf(), cached.clone());
            cached
        }
    } else {
        let tree = syntax::parse(&content, path)?;
        Arc::new(CachedParse { content, tree })
    };

    if parsed.tree.root_node().has_error() {
        debug!(file = %path.display(), "syntax errors present, analyzing tolerant tree");
    }

    analyze_parsed(path, &parsed.content, &parsed.tree, rules, catalog)
}

/// Lint an in-memory source text. Shared by the file driver and the batch
/// fixer's workspace linting.
pub fn analyze_source(
    path: &Path,
    content: &str,
    rules: &[Box<dyn LintRule>],
    catalog: &TestAttributeCatalog,
) -> Result<Vec<Violation>> {
    let tree = syntax::parse(content, path)?;
    analyze_parsed(path, content, &tree, rules, catalog)
}

fn analyze_parsed(
    path: &Path,
    content: &str,
    tree: &Tree,
    rules: &[Box<dyn LintRule>],
    catalog: &TestAttributeCatalog,
) -> Result<Vec<Violation>> {
    let file_path = path.to_str().unwrap_or_default();
    let mut violations = Vec::new();

    for method in syntax::method::collect_methods(tree) {
        let context = RuleContext {
            method,
            file_path,
            source: content,
            attributes: catalog,
        };
        for rule in rules {
            violations.extend(rule.check(&context));
        }
    }

    // Filter out violations suppressed by noqa comments
    let directives = suppress::parse_noqa_directives(content);
    if !directives.is_empty() {
        let line_index = LineIndex::new(content);
        violations.retain(|violation| {
            let (line, _) = line_index.line_col(content, violation.offset);
            !suppress::is_violation_suppressed(line, &violation.rule_id, &directives)
        });
    }

    Ok(violations)
}

/// Find all C# files in a directory
pub fn find_csharp_files(path: &Path, skip_patterns: &[String]) -> Vec<PathBuf> {
    use walkdir::{DirEntry, WalkDir};

    let mut files = Vec::new();

    let is_excluded = |entry: &DirEntry| -> bool {
        let path_str = entry.path().to_str().unwrap_or("");
        for component in entry.path().components() {
            if let Some(name) = component.as_os_str().to_str() {
                if skip_patterns
                    .iter()
                    .any(|pattern| name == pattern || path_str.contains(pattern))
                {
                    return true;
                }
            }
        }
        false
    };

    let walker = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e));

    for entry in walker.filter_map(std::result::Result::ok) {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("cs") {
            files.push(path.to_path_buf());
        }
    }

    files
}

/// Main linting function
pub fn lint_path(
    path: &Path,
    options: &LinterOptions,
    cancel: &CancellationToken,
) -> Result<LintResult> {
    if options.threads > 0 {
        // Later calls are a no-op once the global pool exists.
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build_global()
            .ok();
    }

    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        find_csharp_files(path, &options.skip_patterns)
    };

    let files_analyzed = files.len();
    debug!(count = files_analyzed, path = %path.display(), "analyzing C# files");

    let rule_ids: Option<Vec<String>> = options
        .rule
        .as_ref()
        .map(|filter| filter.split(',').map(|id| id.trim().to_string()).collect());
    let rules = rules::get_rules_for_ids(rule_ids.as_deref());

    let cache: Option<ParseCache> = if options.cache {
        Some(Arc::new(Mutex::new(HashMap::new())))
    } else {
        None
    };

    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            let outcome = analyze_file(file, &rules, &options.attributes, cache.as_ref(), cancel);
            (file.clone(), outcome)
        })
        .collect();

    let mut violations = Vec::new();
    let mut files_with_errors = 0;
    let mut parse_errors = 0;

    for (file, result) in results {
        match result {
            Ok(file_violations) => {
                if !file_violations.is_empty() {
                    violations.push((file, file_violations));
                }
            }
            Err(LintError::Cancelled) => return Err(LintError::Cancelled),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "analysis failed");
                files_with_errors += 1;
                if matches!(e, LintError::Parse { .. }) {
                    parse_errors += 1;
                }
            }
        }
    }

    let cached_trees = cache.map_or(0, |c| c.lock().unwrap().len());

    Ok(LintResult {
        violations,
        files_analyzed,
        cached_trees,
        files_with_errors,
        parse_errors,
    })
}
