use std::{
    io::Write,
    process::{Command, Stdio},
};

fn play(args: &[&str], script: &str) -> (bool, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cop-and-robber"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to launch the cop-and-robber binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("failed to write the script");

    let output = child.wait_with_output().expect("binary did not finish");
    (
        output.status.success(),
        String::from_utf8(output.stdout).expect("stdout is utf8"),
    )
}

#[test]
fn scripted_game_greets_and_quits() {
    let (success, stdout) = play(
        &["--seed", "21", "--columns", "8", "--rows", "8"],
        "status\nlie\ncancel\nend\nquit\n",
    );

    assert!(success, "binary exited with an error:\n{stdout}");
    assert!(stdout.contains("Welcome to Cop and Robber."));
    assert!(stdout.contains("round 1: Robber to move"));
    assert!(stdout.contains("lie cancelled"));
    assert!(stdout.contains("take every step first"));
    assert!(stdout.trim_end().ends_with("bye"));
}

#[test]
fn end_of_input_ends_the_session() {
    let (success, stdout) = play(&["--seed", "5"], "help\n");
    assert!(success);
    assert!(stdout.contains("quit"));
}

#[test]
fn invalid_board_is_refused() {
    let (success, stdout) = play(&["--columns", "2"], "");
    assert!(!success);
    assert!(stdout.is_empty());
}
