use anyhow::Result;

use crate::{CliTest, stdout_of};

#[test]
fn test_clean_file_passes() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.ts",
        "console.log(nameof(window.alert));\n",
    )?;

    let output = test.check_command().output()?;

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Checked 1 source file"));

    Ok(())
}

#[test]
fn test_bad_call_site_fails_with_location() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "const a = 1;\nnameof();\n")?;

    let output = test.check_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("invalid-default-call"));
    assert!(stdout.contains("src/app.ts:2:1"));
    assert!(stdout.contains("1 error found"));

    Ok(())
}

#[test]
fn test_check_does_not_modify_files() -> Result<()> {
    let source = "console.log(nameof(window));\n";
    let test = CliTest::with_file("src/app.ts", source)?;

    test.check_command().output()?;

    assert_eq!(test.read_file("src/app.ts")?, source);

    Ok(())
}

#[test]
fn test_config_ignores_are_respected() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".nameofrc.json",
        r#"{
            "ignores": ["**/generated/**"],
            "includes": []
        }"#,
    )?;
    test.write_file("generated/bad.ts", "nameof();\n")?;
    test.write_file("app.ts", "console.log(nameof(ok));\n")?;

    let output = test.check_command().output()?;

    assert!(output.status.success());

    Ok(())
}

#[test]
fn test_unparsable_file_is_reported() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "const = ;;;\n")?;

    let output = test.check_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("parse-error"));

    Ok(())
}
