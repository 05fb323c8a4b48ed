use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::io::{BufRead, BufReader, Write};

// Helper to start the MCP server with its stdio wired up
fn spawn_server() -> Child {
    Command::new(env!("CARGO_BIN_EXE_fsearch"))
        .arg("mcp-server")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn server")
}

// Helper to wait for exit without letting a regression hang the test run
fn wait_with_deadline(child: &mut Child, deadline: Duration) -> Option<ExitStatus> {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if let Some(status) = child.try_wait().expect("failed to poll server") {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(50));
    }
    child.kill().ok();
    child.wait().ok();
    None
}

#[cfg(unix)]
fn send_signal(child: &Child, name: &str) {
    let status = Command::new("kill")
        .arg(format!("-{}", name))
        .arg(child.id().to_string())
        .status()
        .expect("failed to run kill");
    assert!(status.success());
}

// Shared body for the signal tests: the server must exit 0 on the signal
// alone, with stdin still open and mid-session.
#[cfg(unix)]
fn assert_signal_exits_zero(name: &str) {
    let mut child = spawn_server();
    let mut stdin = child.stdin.take().unwrap();
    let mut reader = BufReader::new(child.stdout.take().unwrap());

    // Round-trip a ping so the server is fully up before the signal fires
    writeln!(stdin, r#"{{"jsonrpc":"2.0","id":1,"method":"ping"}}"#).unwrap();
    stdin.flush().unwrap();
    let mut response = String::new();
    reader.read_line(&mut response).unwrap();
    assert!(response.contains("\"result\""), "no ping reply: {}", response);

    send_signal(&child, name);

    let status = wait_with_deadline(&mut child, Duration::from_secs(10))
        .unwrap_or_else(|| panic!("server kept running after SIG{}", name));
    assert_eq!(status.code(), Some(0));

    drop(stdin);
}

#[test]
fn test_stdin_eof_exits_zero() {
    let mut child = spawn_server();

    drop(child.stdin.take());

    let status = wait_with_deadline(&mut child, Duration::from_secs(10))
        .expect("server kept running after stdin closed");
    assert_eq!(status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_sigterm_exits_zero_while_stdin_stays_open() {
    assert_signal_exits_zero("TERM");
}

#[cfg(unix)]
#[test]
fn test_sigint_exits_zero_while_stdin_stays_open() {
    assert_signal_exits_zero("INT");
}
