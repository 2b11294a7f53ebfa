// Test intent: FRAMEWISE_THREADS sizes the context built from the environment.
#![cfg(feature = "parallel")]

use std::process::Command;

use framewise::exec::{ExecContext, THREADS_ENV};

#[test]
fn print_threads() {
    println!("{}", ExecContext::from_env().threads());
}

/// Runs `print_threads` in a child process with `value` set and returns what
/// it printed.
fn threads_with_env(value: &str) -> usize {
    let exe = std::env::current_exe().unwrap();
    let output = Command::new(&exe)
        .env(THREADS_ENV, value)
        .args(["--exact", "print_threads", "--nocapture"])
        .output()
        .expect("run print_threads");
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .rev()
        .find_map(|l| l.split_whitespace().last()?.parse().ok())
        .unwrap()
}

#[test]
fn env_sets_thread_count() {
    assert_eq!(threads_with_env("3"), 3);
    assert_eq!(threads_with_env("1"), 1);
}

#[test]
fn invalid_env_value_falls_back_to_cores() {
    assert!(threads_with_env("not-a-number") >= 1);
    assert!(threads_with_env("0") >= 1);
}
