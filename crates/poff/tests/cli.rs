//! Runs the `poff` binary against fixture files.

mod common;

use std::process::{Command, Output};

use common::ImageBuilder;
use poff_file::{SHF_EXEC, SHT_LINENO, SHT_PROGDATA, SHT_STRTAB, SHT_SYMTAB, STT_FUNC};
use poff_insn::opcode::{END, NOP, OPERAND16};

fn poff(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_poff"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run poff")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_info() {
    let (_dir, path) = ImageBuilder::program()
        .name(1)
        .section(SHT_PROGDATA, SHF_EXEC, &[NOP, END])
        .section(SHT_STRTAB, 0, b"\0demo\0")
        .write();
    let output = poff(&["info", path.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("demo"));
    assert!(text.contains("program"));
    assert!(text.contains("code"));
    assert!(text.contains("strings"));
}

#[test]
fn test_disasm() {
    let (_dir, path) = ImageBuilder::program()
        .section(SHT_PROGDATA, SHF_EXEC, &[NOP, OPERAND16 | 1, 0x12, 0x34, END])
        .write();
    let output = poff(&["disasm", path.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("op.w 0x01 0x1234"));
}

#[test]
fn test_disasm_truncated_operand() {
    let (_dir, path) = ImageBuilder::unit()
        .section(SHT_PROGDATA, SHF_EXEC, &[NOP, OPERAND16 | 1, 0x12])
        .write();
    let path = path.to_str().unwrap();

    assert!(!poff(&["disasm", path]).status.success());
    assert!(poff(&["disasm", "--zero-fill", path]).status.success());
}

#[test]
fn test_disasm_reports_listing_failure() {
    // The line table points at a file table that does not exist: the verify
    // pass succeeds, the listing fails.
    let (_dir, path) = ImageBuilder::program()
        .section(SHT_PROGDATA, SHF_EXEC, &[NOP, END])
        .section(SHT_LINENO, 0, &common::line(1, 3, 0))
        .write();
    let output = poff(&["disasm", path.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("✗ not a valid object file: File table index 3 out of range"));
}

#[test]
fn test_symbols() {
    let (_dir, path) = ImageBuilder::program()
        .section(SHT_SYMTAB, 0, &common::symbol(STT_FUNC, 0, 1, 0x40, 8))
        .section(SHT_STRTAB, 0, b"\0square\0")
        .write();
    let output = poff(&["symbols", path.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("square"));
    assert!(text.contains("func"));
}

#[test]
fn test_strict_sections() {
    let (_dir, path) = ImageBuilder::program()
        .section(SHT_STRTAB, 0, b"\0")
        .section(SHT_STRTAB, 0, b"\0")
        .write();
    let path = path.to_str().unwrap();

    assert!(poff(&["info", path]).status.success());
    assert!(!poff(&["info", "--strict-sections", path]).status.success());
}

#[test]
fn test_not_a_poff_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.o");
    std::fs::write(&path, b"\x7fELF\x02\x01\x01\x00 definitely not poff").unwrap();

    let output = poff(&["info", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a valid object file"));
}
