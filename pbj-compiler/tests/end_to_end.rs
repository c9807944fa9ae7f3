//! Drives the whole pipeline against real files on disk: parse, resolve,
//! emit, write — then checks the output tree lands where the CLI contract
//! says it should.

use std::fs;

use pbj_compiler::driver;

#[test]
fn writes_four_files_per_message_under_the_package_mirroring_tree() {
    let src_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    fs::write(
        src_dir.path().join("account.proto"),
        r#"
        syntax = "proto3";
        package example.v1;

        message Account {
            string id = 1;
            int64 balance = 2;
        }
        "#,
    )
    .unwrap();

    let opts = driver::Options {
        sources: vec![src_dir.path().to_path_buf()],
        out: out_dir.path().to_path_buf(),
        base_package: None,
    };
    driver::run(&opts).expect("a well-formed schema should emit cleanly");

    let message_dir = out_dir.path().join("example").join("v1");
    for sub in ["model", "schemas", "parsers", "writers"] {
        let path = message_dir.join(sub).join("Account.rs");
        assert!(path.exists(), "missing {}", path.display());
    }

    let model_source = fs::read_to_string(message_dir.join("model").join("Account.rs")).unwrap();
    assert!(model_source.contains("pub struct Account"));
    assert!(model_source.contains("pub id: String"));
    assert!(model_source.contains("pub balance: i64"));

    let writer_source = fs::read_to_string(message_dir.join("writers").join("Account.rs")).unwrap();
    assert!(writer_source.contains("fn write(&self"));
    assert!(writer_source.contains("fn measure(&self)"));
}

#[test]
fn base_package_is_prepended_when_the_file_has_no_override() {
    let src_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    fs::write(
        src_dir.path().join("note.proto"),
        r#"
        syntax = "proto3";
        package notes;

        message Note {
            string text = 1;
        }
        "#,
    )
    .unwrap();

    let opts = driver::Options {
        sources: vec![src_dir.path().to_path_buf()],
        out: out_dir.path().to_path_buf(),
        base_package: Some("com.acme".to_owned()),
    };
    driver::run(&opts).unwrap();

    let expected = out_dir.path().join("com").join("acme").join("notes").join("model").join("Note.rs");
    assert!(expected.exists(), "missing {}", expected.display());
}

#[test]
fn map_field_fails_loudly_instead_of_generating_anything() {
    let src_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    fs::write(
        src_dir.path().join("bad.proto"),
        r#"
        syntax = "proto3";
        package bad;

        message Bad {
            map<string, string> labels = 1;
        }
        "#,
    )
    .unwrap();

    let opts = driver::Options {
        sources: vec![src_dir.path().to_path_buf()],
        out: out_dir.path().to_path_buf(),
        base_package: None,
    };
    let err = driver::run(&opts).expect_err("map fields are not supported");
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("mapField"));
}
