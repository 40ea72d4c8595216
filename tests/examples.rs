use {
    demo::{Execute, Program},
    heap::{Allocator, FailingAllocator, SystemAllocator, TrackingAllocator},
    rstest::rstest,
    rstest_reuse::{apply, template},
    std::process::Command,
};

#[template]
#[rstest]
#[case::hello(false, "scenarios/hello.stdout", 0)]
#[case::alloc_failure(true, "scenarios/alloc_failure.stdout", 1)]
fn scenarios(#[case] fail_alloc: bool, #[case] expected_path: &str, #[case] exit_code: u8) {}

#[apply(scenarios)]
fn execute_program(#[case] fail_alloc: bool, #[case] expected_path: &str, #[case] exit_code: u8) {
    let inner: &dyn Allocator = if fail_alloc {
        &FailingAllocator
    } else {
        &SystemAllocator
    };
    let allocator = TrackingAllocator::new(inner);
    let mut output = Vec::new();
    let final_state = Program::hello().execute(&allocator, &mut output).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), expected_output(expected_path));
    assert_eq!(final_state.status.exit_code(), exit_code);
    assert_eq!(allocator.live(), 0);
}

#[apply(scenarios)]
fn execute_binary(#[case] fail_alloc: bool, #[case] expected_path: &str, #[case] exit_code: u8) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hello_heap"));
    command.arg("run");
    if fail_alloc {
        command.arg("--fail-alloc");
    }
    let output = command.output().unwrap();
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        expected_output(expected_path)
    );
    assert_eq!(output.status.code(), Some(i32::from(exit_code)));
}

#[test]
fn run_is_the_default_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_hello_heap"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        expected_output("scenarios/hello.stdout")
    );
}

#[test]
fn show_lists_every_step() {
    let output = Command::new(env!("CARGO_BIN_EXE_hello_heap"))
        .arg("show")
        .output()
        .unwrap();
    assert!(output.status.success());
    let listing = String::from_utf8(output.stdout).unwrap();
    assert_eq!(listing, Program::hello().to_string());
    assert_eq!(listing.lines().count(), 7);
}

#[test]
fn print_state_reports_released_values() {
    let output = Command::new(env!("CARGO_BIN_EXE_hello_heap"))
        .args(["run", "--print-state"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with(
        "final state:\nstatus: success (exit code 0)\nreleased: [0, 1, 4, 9, 16]\n"
    ));
}

#[test]
fn debug_logging_stays_off_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_hello_heap"))
        .args(["--debug", "run"])
        .output()
        .unwrap();
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        expected_output("scenarios/hello.stdout")
    );
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("allocations: 1, failures: 0, releases: 1"));
}

#[test]
fn debug_logging_names_the_allocation_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_hello_heap"))
        .args(["--debug", "run", "--fail-alloc"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to allocate 5 integers: injected fault"));
}

fn expected_output(path: &str) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read expected output file at path {path:?}: {e}"))
}
