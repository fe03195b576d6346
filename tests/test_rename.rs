use std::path::Path;

use tokio_util::sync::CancellationToken;

use asyncsuffix_linter::config::TestAttributeCatalog;
use asyncsuffix_linter::errors::LintError;
use asyncsuffix_linter::fix::{fix_workspace, rename_symbol, RenameOptions, RenameRequest};
use asyncsuffix_linter::rules::get_all_rules;
use asyncsuffix_linter::workspace::Workspace;

const DECLARATION: &str = r#"class Tests
{
    [Fact]
    Task DoWorkAsync()
    {
        return Task.CompletedTask;
    }
}
"#;

const CALLER: &str = r#"class Caller
{
    async Task RunAll()
    {
        // DoWorkAsync covers the happy path
        await new Tests().DoWorkAsync();
        Log("DoWorkAsync");
    }
}
"#;

fn workspace_of(files: &[(&str, &str)]) -> Workspace {
    let mut ws = Workspace::new();
    for (path, text) in files {
        ws.insert(*path, *text);
    }
    ws
}

fn rename_do_work(ws: &Workspace, options: RenameOptions) -> Workspace {
    let declaration_offset = DECLARATION.find("DoWorkAsync").unwrap();
    let request = RenameRequest {
        old_name: "DoWorkAsync",
        new_name: "DoWork",
        declaration_file: Path::new("Tests.cs"),
        declaration_offset,
        options,
    };
    rename_symbol(ws, &request, &CancellationToken::new()).unwrap()
}

#[test]
fn test_rename_reaches_every_reference_across_files() {
    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("Caller.cs", CALLER)]);
    let catalog = TestAttributeCatalog::with_defaults();

    let report = fix_workspace(
        &ws,
        &get_all_rules(),
        &catalog,
        RenameOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(report.fixes_applied, 1);

    let tests = report.workspace.text(Path::new("Tests.cs")).unwrap();
    let caller = report.workspace.text(Path::new("Caller.cs")).unwrap();

    assert!(tests.contains("Task DoWork()"));
    assert!(caller.contains("await new Tests().DoWork();"));
    // Comments follow the default options, strings do not.
    assert!(caller.contains("// DoWork covers the happy path"));
    assert!(caller.contains("Log(\"DoWorkAsync\");"));
}

#[test]
fn test_rename_in_strings_when_enabled() {
    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("Caller.cs", CALLER)]);
    let options = RenameOptions {
        strings: true,
        ..RenameOptions::default()
    };

    let renamed = rename_do_work(&ws, options);
    let caller = renamed.text(Path::new("Caller.cs")).unwrap();
    assert!(caller.contains("Log(\"DoWork\");"));
}

#[test]
fn test_comments_untouched_when_disabled() {
    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("Caller.cs", CALLER)]);
    let options = RenameOptions {
        comments: false,
        ..RenameOptions::default()
    };

    let renamed = rename_do_work(&ws, options);
    let caller = renamed.text(Path::new("Caller.cs")).unwrap();
    assert!(caller.contains("// DoWorkAsync covers the happy path"));
    assert!(caller.contains("await new Tests().DoWork();"));
}

#[test]
fn test_comment_rename_is_whole_word_only() {
    let source = r#"class Notes
{
    // DoWorkAsyncFast is unrelated; DoWorkAsync is not.
    void Touch() { }
}
"#;
    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("Notes.cs", source)]);

    let renamed = rename_do_work(&ws, RenameOptions::default());
    let notes = renamed.text(Path::new("Notes.cs")).unwrap();
    assert!(notes.contains("DoWorkAsyncFast is unrelated"));
    assert!(notes.contains("DoWork is not."));
}

#[test]
fn test_overload_declarations_follow_the_option() {
    let overloads = r#"class MoreTests
{
    [Fact]
    Task DoWorkAsync(int retries)
    {
        return Task.CompletedTask;
    }
}
"#;

    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("More.cs", overloads)]);

    let renamed = rename_do_work(&ws, RenameOptions::default());
    assert!(renamed
        .text(Path::new("More.cs"))
        .unwrap()
        .contains("Task DoWork(int retries)"));

    let options = RenameOptions {
        overloads: false,
        ..RenameOptions::default()
    };
    let renamed = rename_do_work(&ws, options);
    assert!(renamed
        .text(Path::new("More.cs"))
        .unwrap()
        .contains("Task DoWorkAsync(int retries)"));
}

#[test]
fn test_unrelated_declarations_with_same_name_are_not_references() {
    let shadows = r#"class Shadows
{
    int DoWorkAsync;

    void Touch(string DoWorkAsync)
    {
        var DoWorkAsync = 1;
    }
}
"#;

    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("Shadows.cs", shadows)]);
    let options = RenameOptions {
        comments: false,
        strings: false,
        overloads: true,
    };

    let renamed = rename_do_work(&ws, options);
    let result = renamed.text(Path::new("Shadows.cs")).unwrap();
    // Field, parameter, and local declarations keep their names.
    assert!(result.contains("int DoWorkAsync;"));
    assert!(result.contains("string DoWorkAsync)"));
    assert!(result.contains("var DoWorkAsync = 1;"));
}

#[test]
fn test_rename_is_cancellable() {
    let ws = workspace_of(&[("Tests.cs", DECLARATION)]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let request = RenameRequest {
        old_name: "DoWorkAsync",
        new_name: "DoWork",
        declaration_file: Path::new("Tests.cs"),
        declaration_offset: DECLARATION.find("DoWorkAsync").unwrap(),
        options: RenameOptions::default(),
    };
    let err = rename_symbol(&ws, &request, &cancel).unwrap_err();
    assert!(matches!(err, LintError::Cancelled));
}

#[test]
fn test_rename_leaves_input_workspace_untouched() {
    let ws = workspace_of(&[("Tests.cs", DECLARATION), ("Caller.cs", CALLER)]);

    let _renamed = rename_do_work(&ws, RenameOptions::default());
    assert_eq!(ws.text(Path::new("Tests.cs")), Some(DECLARATION));
    assert_eq!(ws.text(Path::new("Caller.cs")), Some(CALLER));
}
