#![forbid(unsafe_code)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn list_groups_shows_tiered_hybrids() {
    let mut cmd = Command::cargo_bin("pqprov-cli").unwrap();
    cmd.arg("list-groups").env_remove("PQPROV_LOG_LEVEL").env_remove("PQPROV_OVERRIDE_POLICY");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0x023a  128  kyber512"))
        .stdout(predicate::str::contains("0x2f90  192  x448_kyber768"))
        .stdout(predicate::str::contains("p521_kyber1024"))
        .stdout(predicate::str::contains("x448_kyber1024").not())
        .stdout(predicate::str::contains("48 TLS-GROUP records"));
}

#[test]
fn list_groups_applies_env_override() {
    let mut cmd = Command::cargo_bin("pqprov-cli").unwrap();
    cmd.arg("list-groups").env("OQS_CODEPOINT_P256_KYBER512", "0x3a3a");
    cmd.assert().success().stdout(predicate::str::contains("0x3a3a  128  p256_kyber512"));
}

#[test]
fn list_sigalgs_json_uses_wire_names() {
    let mut cmd = Command::cargo_bin("pqprov-cli").unwrap();
    cmd.arg("list-sigalgs").arg("--json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"tls-sigalg-name\": \"rsa3072_falcon512\""))
        .stdout(predicate::str::contains("\"tls-sigalg-code-point\": 65200"))
        .stdout(predicate::str::contains("\"tls-sigalg-oid\": \"1.3.9999.3.8\""));
}

#[test]
fn duplicate_override_is_reported() {
    let mut cmd = Command::cargo_bin("pqprov-cli").unwrap();
    cmd.arg("list-sigalgs")
        .env("OQS_CODEPOINT_FALCON512", "65200");
    cmd.assert().failure().stderr(predicate::str::contains("duplicate sigalg codepoint"));
}
