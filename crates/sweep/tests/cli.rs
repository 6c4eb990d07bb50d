#![cfg(unix)]

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use insta_cmd::{assert_cmd_snapshot, get_cargo_bin};
use sweep_metadata::DEFAULT_SUITE_FILE_NAME;
use sweep_test::{RUNNER_PATH, TestContext, report_fragment, test_event};

const SUITE: &str = r#"
[[whitelist]]
directory = "src"
suffix = ".ext"

[[testsuites]]
name = "unit"

[[testsuites.directory]]
directory = "tests"
suffix = "Test.ext"
"#;

fn project(files: &[(&str, &str)]) -> TestContext {
    let context = TestContext::with_files([(DEFAULT_SUITE_FILE_NAME, SUITE)]);
    context.write_files(files.iter().copied());
    context.write_runner();
    context
}

fn sweep(context: &TestContext) -> Command {
    let mut command = Command::new(get_cargo_bin("sweep"));
    command
        .current_dir(context.root())
        .env_remove("SWEEP_RUNNER_CONFIG")
        .env_remove("SWEEP_RUNNER_OPTIONS_FILE")
        .env_remove("SWEEP_RUNNER_BINARY")
        .env_remove("SWEEP_LOG")
        .env("XDG_CONFIG_HOME", context.root().join(".config"));
    command
}

fn sweep_test(context: &TestContext) -> Command {
    let mut command = sweep(context);
    command.args(["test", "--runner-binary", RUNNER_PATH]);
    command
}

#[test]
fn version() {
    let context = TestContext::new();

    let mut command = sweep(&context);
    command.arg("version");

    assert_cmd_snapshot!(command, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    sweep 0.0.0

    ----- stderr -----
    ");
}

#[test]
fn locate_prints_candidate_directories() {
    let context = TestContext::new();

    let mut command = sweep(&context);
    command.args(["locate", "src/Model/User.php"]);

    assert_cmd_snapshot!(command, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    src/Model/
    src/Model/tests/
    src/Model/Tests/
    src/tests/
    src/Tests/
    tests/
    Tests/
    tests/Model/
    Tests/Model/
    src/tests/Model/
    src/Tests/Model/
    tests/src/Model/
    Tests/src/Model/

    ----- stderr -----
    ");
}

#[test]
fn passing_tests() {
    let context = project(&[
        (
            "tests/ATest.ext",
            report_fragment(&[test_event("ATest::testA", "pass")], 0).as_str(),
        ),
        (
            "tests/nested/BTest.ext",
            report_fragment(
                &[
                    test_event("BTest::testB", "pass"),
                    test_event("BTest::testC", "pass"),
                ],
                0,
            )
            .as_str(),
        ),
    ]);

    assert_cmd_snapshot!(sweep_test(&context), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    test ATest::testA ... ok
    test BTest::testB ... ok
    test BTest::testC ... ok

    test result: ok. 3 passed; 0 failed; 0 skipped; 0 broken; finished in [TIME]

    ----- stderr -----
    ");
}

#[test]
fn failing_and_broken_tests() {
    let failure = r#"{"event":"test","suite":"ATest","test":"ATest::testFails","status":"fail","time":0.01,"trace":[],"message":"Failed asserting that false is true."}"#;

    let context = project(&[
        (
            "tests/ATest.ext",
            report_fragment(
                &[test_event("ATest::testPasses", "pass"), failure.to_string()],
                1,
            )
            .as_str(),
        ),
        ("tests/BTest.ext", "echo 'PHP Fatal error: boom' >&2\nexit 255\n"),
    ]);

    assert_cmd_snapshot!(sweep_test(&context), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test ATest::testPasses ... ok
    test ATest::testFails ... FAILED
    test tests/BTest.ext ... BROKEN

    failures:

    ---- ATest::testFails ----
        Failed asserting that false is true.

    ---- tests/BTest.ext ----
        PHP Fatal error: boom

    test result: FAILED. 1 passed; 1 failed; 0 skipped; 1 broken; finished in [TIME]

    ----- stderr -----
    ");
}

#[test]
fn coverage_summary_for_changed_files() {
    let context = project(&[
        ("src/A.ext", "a\nb\n"),
        ("src/B.ext", "b\n"),
        (
            "tests/ATest.ext",
            r#"ROOT=$(pwd -P)
cat > "$REPORT" <<EOF
{"event":"test","suite":"ATest","test":"ATest::testA","status":"pass","time":0.01,"trace":[],"message":""}
EOF
cat > "$COVERAGE" <<EOF
<coverage><project>
<file name="$ROOT/src/A.ext"><line num="1" type="stmt" count="1"/><line num="2" type="stmt" count="0"/></file>
<file name="$ROOT/src/B.ext"><line num="1" type="stmt" count="1"/></file>
</project></coverage>
EOF
exit 0
"#,
        ),
    ]);

    let mut command = sweep_test(&context);
    command.args(["--coverage", "src/A.ext"]);

    assert_cmd_snapshot!(command, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    test ATest::testA ... ok

    coverage:
        src/A.ext: 1/2 lines

    test result: ok. 1 passed; 0 failed; 0 skipped; 0 broken; finished in [TIME]

    ----- stderr -----
    ");
}

#[test]
fn no_test_files() {
    let context = project(&[("src/A.ext", "a\n")]);

    assert_cmd_snapshot!(sweep_test(&context), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    No tests to run.

    ----- stderr -----
    ");
}

#[test]
fn missing_runner_binary() {
    let context = project(&[(
        "tests/ATest.ext",
        report_fragment(&[test_event("ATest::testA", "pass")], 0).as_str(),
    )]);

    let mut command = sweep(&context);
    command.args(["test", "--runner-binary", "does-not-exist"]);

    assert_cmd_snapshot!(command, @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    sweep failed
      Cause: Test runner `does-not-exist` was not found on `PATH`, relative to the project root, or in `vendor/bin`
    ");
    assert!(context.runner_invocations().is_empty());
}

#[test]
fn missing_suite_description() {
    let context = project(&[]);

    let mut command = sweep_test(&context);
    command.args(["--runner-config", "missing.toml"]);

    assert_cmd_snapshot!(command, @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    sweep failed
      Cause: Suite description `missing.toml` does not exist
    ");
}

#[test]
fn relative_suite_description_is_found_from_the_working_directory() {
    let context = TestContext::new();
    context.write_files([
        ("config/custom.toml", SUITE),
        (
            "tests/ATest.ext",
            report_fragment(&[test_event("ATest::testA", "pass")], 0).as_str(),
        ),
    ]);
    context.write_runner();

    let mut command = sweep(&context);
    command
        .current_dir(context.root().join("config"))
        .args(["test", "--project-root", ".."])
        .args(["--runner-binary", RUNNER_PATH])
        .args(["--runner-config", "custom.toml"]);

    assert_cmd_snapshot!(command, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    test ATest::testA ... ok

    test result: ok. 1 passed; 0 failed; 0 skipped; 0 broken; finished in [TIME]

    ----- stderr -----
    ");
}

#[test]
fn interrupted_run_exits_with_an_error() {
    let context = project(&[("tests/ATest.ext", "sleep 5\nexit 0\n")]);

    let mut child = sweep_test(&context)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while context.runner_invocations().is_empty() {
        assert!(Instant::now() < deadline, "the runner was never started");
        thread::sleep(Duration::from_millis(20));
    }

    let killed = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(2));
}
