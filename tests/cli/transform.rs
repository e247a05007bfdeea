use anyhow::Result;

use crate::{CliTest, stdout_of};

#[test]
fn test_dry_run_previews_without_writing() -> Result<()> {
    let source = "console.log(nameof(window.alert));\n";
    let test = CliTest::with_file("src/app.ts", source)?;

    let output = test.transform_command().output()?;

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Would rewrite 1 file"));
    assert_eq!(test.read_file("src/app.ts")?, source);

    Ok(())
}

#[test]
fn test_apply_rewrites_in_place() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.ts",
        "console.log(nameof(window.alert));\nconsole.log(nameof.full(a.b));\n",
    )?;

    let output = test.transform_command().arg("--apply").output()?;

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Rewrote 1 file"));
    assert_eq!(
        test.read_file("src/app.ts")?,
        "console.log(\"alert\");\nconsole.log(\"a.b\");\n"
    );

    Ok(())
}

#[test]
fn test_apply_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "console.log(nameof(x.y));\n")?;

    test.transform_command().arg("--apply").output()?;
    let first = test.read_file("src/app.ts")?;

    let output = test.transform_command().arg("--apply").output()?;
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Rewrote 0 files"));
    assert_eq!(test.read_file("src/app.ts")?, first);

    Ok(())
}

#[test]
fn test_bad_call_site_leaves_its_file_consistent() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.ts",
        "nameof(nameof(x));\nconsole.log(nameof(ok));\n",
    )?;

    let output = test.transform_command().arg("--apply").output()?;

    assert_eq!(output.status.code(), Some(1));
    let rewritten = test.read_file("src/app.ts")?;
    // the bad outer call keeps its text, independent call sites proceed
    assert!(rewritten.contains("nameof("));
    assert!(rewritten.contains("\"ok\""));

    Ok(())
}

#[test]
fn test_macro_name_override() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "console.log(myNameof(a.b));\n")?;

    let output = test
        .transform_command()
        .args(["--apply", "--macro-name", "myNameof"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("src/app.ts")?, "console.log(\"b\");\n");

    Ok(())
}
