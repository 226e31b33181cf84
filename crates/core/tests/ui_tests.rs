//! UI tests for the `#[injectable]` attribute macro using trybuild
//!
//! Valid usage has to compile and run, invalid usage has to fail with the
//! diagnostic recorded next to each case.

#[test]
fn ui_pass_tests() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/pass/*.rs");
}

#[test]
fn ui_fail_tests() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/fail/*.rs");
}
