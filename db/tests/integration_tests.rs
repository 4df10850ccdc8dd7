use std::fs;
use std::path::Path;

use command_bridge_db::{BridgeContext, GrammarSet, LoadError, TemplateBundle, load_operations_file};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn write_apt_grammar(dir: &Path) {
    let yaml = r#"
program: apt
style: hierarchical
subcommands:
  - name: install
    id: install_base
    arguments:
      - name: assume_yes
        spellings: ["-y", "--yes"]
        arity: "0"
      - name: pkgs
        arity: "+"
  - name: reinstall
    include: install_base
  - name: remove
    aliases: [purge]
    arguments:
      - name: pkgs
        arity: "+"
"#;
    fs::write(dir.join("apt.yaml"), yaml).unwrap();
}

fn write_pacman_grammar(dir: &Path) {
    let json = serde_json::json!({
        "program": "pacman",
        "style": "flat",
        "arguments": [
            { "name": "sync", "spellings": ["-S", "--sync"], "arity": "0" },
            { "name": "remove", "spellings": ["-R", "--remove"], "arity": "0" },
            { "name": "targets", "arity": "*" }
        ]
    });
    fs::write(
        dir.join("pacman.json"),
        serde_json::to_string_pretty(&json).unwrap(),
    )
    .unwrap();
}

fn write_operations(dir: &Path) {
    fs::write(
        dir.join("apt-ops.yaml"),
        r#"
program: apt
operations:
  install_remote.apt:
    format: "apt install {pkgs}"
  remove:
    format: "apt remove {pkgs}"
"#,
    )
    .unwrap();
    fs::write(
        dir.join("pacman-ops.yaml"),
        r#"
program: pacman
operations:
  install_remote:
    format: "pacman -S {pkgs}"
    final_format: "pacman -S --noconfirm {pkgs}"
  remove:
    format: "pacman -R {pkgs}"
"#,
    )
    .unwrap();
}

fn build_context(dir: &Path) -> BridgeContext {
    let grammars = GrammarSet::from_dir(dir).unwrap();
    let operations = vec![
        load_operations_file(dir.join("apt-ops.yaml")).unwrap(),
        load_operations_file(dir.join("pacman-ops.yaml")).unwrap(),
    ];
    let (libraries, formats) = grammars.compile(&operations).unwrap();
    BridgeContext::new(grammars, libraries, formats)
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

#[test]
fn loads_mixed_json_and_yaml_grammars() {
    let dir = tempfile::tempdir().unwrap();
    write_apt_grammar(dir.path());
    write_pacman_grammar(dir.path());

    let set = GrammarSet::from_dir(dir.path()).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("apt"));
    assert!(set.contains("pacman"));

    let apt = set.get("apt").unwrap();
    assert!(apt.find_subcommand("install").is_some());
    // Alias resolution from the document.
    assert!(apt.find_subcommand("purge").is_some());
    // Include directive copied the install scope.
    let reinstall = apt.find_subcommand("reinstall").unwrap();
    assert_eq!(reinstall.arguments.len(), 2);
}

#[test]
fn ignores_unrelated_files_in_grammar_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_pacman_grammar(dir.path());
    fs::write(dir.path().join("README.md"), "not a grammar").unwrap();

    let set = GrammarSet::from_dir(dir.path()).unwrap();
    assert_eq!(set.len(), 1);
}

#[test]
fn include_cycle_in_document_fails_loading() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("bad.yaml"),
        r#"
program: bad
subcommands:
  - name: a
    id: a
    include: b
  - name: b
    id: b
    include: a
"#,
    )
    .unwrap();

    assert!(matches!(
        GrammarSet::from_dir(dir.path()).unwrap_err(),
        LoadError::IncludeCycle(_)
    ));
}

// ---------------------------------------------------------------------------
// End-to-end translation from configuration on disk
// ---------------------------------------------------------------------------

#[test]
fn translates_between_loaded_programs() {
    let dir = tempfile::tempdir().unwrap();
    write_apt_grammar(dir.path());
    write_pacman_grammar(dir.path());
    write_operations(dir.path());

    let context = build_context(dir.path());

    let to_pacman = context
        .translate(&args(&["apt", "install", "vim", "git"]), "pacman")
        .unwrap()
        .unwrap();
    assert_eq!(to_pacman.command, "pacman -S --noconfirm vim git");

    let to_apt = context
        .translate(&args(&["pacman", "-S", "htop"]), "apt")
        .unwrap()
        .unwrap();
    assert_eq!(to_apt.command, "apt install htop");
}

#[test]
fn operation_key_program_suffix_is_stripped() {
    let dir = tempfile::tempdir().unwrap();
    write_apt_grammar(dir.path());
    write_pacman_grammar(dir.path());
    write_operations(dir.path());

    let context = build_context(dir.path());

    // `install_remote.apt` in the document compiles to `install_remote`,
    // so the pacman-side lookup finds it.
    let rendered = context
        .translate(&args(&["apt", "install", "emacs"]), "pacman")
        .unwrap()
        .unwrap();
    assert_eq!(rendered.command, "pacman -S --noconfirm emacs");
}

#[test]
fn unmatched_source_command_maps_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_apt_grammar(dir.path());
    write_pacman_grammar(dir.path());
    write_operations(dir.path());

    let context = build_context(dir.path());
    // `-y` adds a flag that no compiled template carries.
    let result = context
        .translate(&args(&["apt", "install", "-y", "vim"]), "pacman")
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Bundle persistence
// ---------------------------------------------------------------------------

#[test]
fn bundle_survives_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    write_apt_grammar(dir.path());
    write_pacman_grammar(dir.path());
    write_operations(dir.path());

    let grammars = GrammarSet::from_dir(dir.path()).unwrap();
    let operations = vec![
        load_operations_file(dir.path().join("apt-ops.yaml")).unwrap(),
        load_operations_file(dir.path().join("pacman-ops.yaml")).unwrap(),
    ];
    let (libraries, formats) = grammars.compile(&operations).unwrap();

    let mut bundle = TemplateBundle::new("0.1.0", "2026-08-01T00:00:00Z");
    bundle.libraries = libraries;
    bundle.formats = formats;

    let path = dir.path().join("bundle.json");
    bundle.save(&path).unwrap();
    let reloaded = TemplateBundle::load(&path).unwrap();

    let context = BridgeContext::from_bundle(grammars, reloaded);
    let rendered = context
        .translate(&args(&["pacman", "-R", "vim"]), "apt")
        .unwrap()
        .unwrap();
    assert_eq!(rendered.command, "apt remove vim");
}
