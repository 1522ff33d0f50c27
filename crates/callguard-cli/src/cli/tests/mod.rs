//! CLI parse tests.

use super::{Cli, CliCommand};
use callguard_core::http::Method;
use clap::Parser;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_call_defaults() {
    match parse(&["callguard", "call", "https://api.example.com/v1/me", "--token", "abc"]) {
        CliCommand::Call {
            target,
            method,
            data,
            headers,
            token,
        } => {
            assert_eq!(target, "https://api.example.com/v1/me");
            assert_eq!(method, Method::Get);
            assert!(data.is_none());
            assert!(headers.is_empty());
            assert_eq!(token, "abc");
        }
        _ => panic!("expected Call"),
    }
}

#[test]
fn cli_parse_call_put_with_body_and_headers() {
    match parse(&[
        "callguard",
        "call",
        "me/player/play",
        "-X",
        "put",
        "-d",
        r#"{"position_ms":0}"#,
        "-H",
        "Content-Type: application/json",
        "-H",
        "Accept: application/json",
        "--token",
        "abc",
    ]) {
        CliCommand::Call {
            method,
            data,
            headers,
            ..
        } => {
            assert_eq!(method, Method::Put);
            assert_eq!(data.as_deref(), Some(r#"{"position_ms":0}"#));
            assert_eq!(headers.len(), 2);
        }
        _ => panic!("expected Call"),
    }
}

#[test]
fn cli_parse_rejects_unknown_method() {
    assert!(Cli::try_parse_from(["callguard", "call", "x", "-X", "TRACE", "--token", "t"]).is_err());
}

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["callguard", "config"]), CliCommand::Config));
}
