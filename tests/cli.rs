use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread;

/// Answers a single HTTP request with a canned response and returns its URL.
fn serve_once(
    status: &'static str,
    body: &'static str,
) -> Result<String, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?;

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buffer = [0; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut buffer) {
                    Ok(0) | Err(_) => break,
                    Ok(read) => request.extend_from_slice(&buffer[..read]),
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    Ok(format!("http://{}/status.json", address))
}

#[test]
fn value_outside_both_ranges_is_critical() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/simple_dict.json")
        .arg("--check-value")
        .arg("level;level;1;2");
    cmd.assert().code(2).stdout(predicate::str::starts_with(
        "CRITICAL - level: 3 outside critical range 2 | level=3;1;2\n",
    ));

    Ok(())
}

#[test]
fn value_inside_both_ranges_is_ok() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/simple_dict.json")
        .arg("--check-value")
        .arg("level;level;5;10");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("OK - level: 3"));

    Ok(())
}

#[test]
fn text_check_matches() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/advanced_dict.json")
        .arg("--check-text-ok")
        .arg("first_status;results[?component=='first'].status;ok");
    cmd.assert()
        .success()
        .stdout("OK - first_status: 'ok' as expected\n");

    Ok(())
}

#[test]
fn text_check_mismatch_is_warning() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/advanced_dict.json")
        .arg("--check-text-ok")
        .arg("second_status;results[?component=='second'].status;ok");
    cmd.assert()
        .code(1)
        .stdout("WARNING - second_status: expected 'ok' but is 'fail'\n");

    Ok(())
}

#[test]
fn checks_are_reported_in_input_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/advanced_dict.json")
        .arg("--check-text-ok")
        .arg("a;results[?component=='first'].status;ok")
        .arg("--check-text-ok")
        .arg("b;results[?component=='second'].status;ok")
        .arg("--check-text-ok")
        .arg("c;results[0].component;first");
    cmd.assert().code(1).stdout(
        "WARNING - a: 'ok' as expected, b: expected 'ok' but is 'fail', c: 'first' as expected\n",
    );

    Ok(())
}

#[test]
fn interleaved_flags_are_reported_in_command_line_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/advanced_dict.json")
        .arg("--check-text-ok")
        .arg("a;results[?component=='first'].status;ok")
        .arg("--check-value")
        .arg("b;data.level;5;10")
        .arg("--check-text-ok")
        .arg("c;results[?component=='second'].status;ok");
    cmd.assert().code(1).stdout(
        "WARNING - a: 'ok' as expected, b: 1 inside warning range 5 and inside critical range 10, c: expected 'ok' but is 'fail' | b=1;5;10\n",
    );

    Ok(())
}

#[test]
fn missing_value_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/simple_dict.json")
        .arg("--check-value")
        .arg("gone;missing;1;2")
        .arg("--check-value")
        .arg("level;level;5;10");
    cmd.assert().code(3).stdout(predicate::str::starts_with(
        "UNKNOWN - gone: no result for query 'missing', level: 3",
    ));

    Ok(())
}

#[test]
fn malformed_check_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/simple_dict.json")
        .arg("--check-value")
        .arg("level;level;20:10");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::contains("invalid range '20:10'"));

    Ok(())
}

#[test]
fn base_selector_is_applied() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/advanced_dict.json")
        .arg("--base")
        .arg("data")
        .arg("--check-value")
        .arg("level;level;1;2");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "OK - level: 1 inside warning range 1 and inside critical range 2 | level=1;1;2",
        ));

    Ok(())
}

#[test]
fn verbose_prints_a_line_per_check() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/simple_dict.json")
        .arg("--check-value")
        .arg("load;load;1;2")
        .arg("-v");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "\nOK load: 0.75 inside warning range 1 and inside critical range 2\n",
        ));

    Ok(())
}

#[test]
fn no_checks_is_ok() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file").arg("tests/fixtures/simple_dict.json");
    cmd.assert()
        .success()
        .stdout("OK - Everything looks good\n");

    Ok(())
}

#[test]
fn file_doesnt_exist() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("test/file/doesnt/exist")
        .arg("--check-value")
        .arg("level;level;1;2");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN - JSON API: unable to load document"));

    Ok(())
}

#[test]
fn malformed_document_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file").arg("tests/fixtures/malformed.json");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::contains("unable to parse JSON"));

    Ok(())
}

#[test]
fn unreachable_url_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--url")
        .arg("http://127.0.0.1:9/status.json")
        .arg("--timeout")
        .arg("2");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN - JSON API: unable to load document"));

    Ok(())
}

#[test]
fn source_is_required() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--check-value").arg("level;level;1;2");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN - "));

    Ok(())
}

#[test]
fn file_and_url_are_exclusive() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--file")
        .arg("tests/fixtures/simple_dict.json")
        .arg("--url")
        .arg("http://127.0.0.1:9/");
    cmd.assert().code(3);

    Ok(())
}

#[test]
fn fetched_document_is_checked() -> Result<(), Box<dyn std::error::Error>> {
    let url = serve_once("200 OK", r#"{"level": 3}"#)?;
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--url")
        .arg(&url)
        .arg("--check-value")
        .arg("level;level;5;10");
    cmd.assert().success().stdout(
        "OK - level: 3 inside warning range 5 and inside critical range 10 | level=3;5;10\n",
    );

    Ok(())
}

#[test]
fn error_status_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let url = serve_once("500 Internal Server Error", r#"{"level": 3}"#)?;
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--url")
        .arg(&url)
        .arg("--check-value")
        .arg("level;level;5;10");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN - JSON API: unable to load document"))
        .stdout(predicate::str::contains("500"));

    Ok(())
}

#[test]
fn fetched_garbage_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let url = serve_once("200 OK", "<html>not json</html>")?;
    let mut cmd = Command::cargo_bin("check_json")?;

    cmd.arg("--url")
        .arg(&url)
        .arg("--check-value")
        .arg("level;level;5;10");
    cmd.assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN - JSON API: unable to parse JSON"));

    Ok(())
}
