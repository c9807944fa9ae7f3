//! Exercises the four-emitter pipeline end to end: parse a small schema,
//! resolve it, and check the generated sources carry the shapes the
//! per-emitter unit tests already check in isolation.

use pbj_codegen::generate_file;
use pbj_schema::parse_file;
use pbj_schema::resolver::SymbolTable;

#[test]
fn generates_four_sources_per_message_and_a_model_for_the_enum() {
    let source = r#"
        syntax = "proto3";
        package example.v1;

        enum Status {
            UNKNOWN = 0;
            ACTIVE = 1;
        }

        message Account {
            string id = 1;
            int64 balance = 2;
            Status status = 3;
        }
    "#;
    let file = parse_file("account.proto", source).unwrap();
    let table = SymbolTable::build(std::slice::from_ref(&file));

    let (messages, enums) = generate_file(&file, std::slice::from_ref(&file), &table).unwrap();

    assert_eq!(messages.len(), 1);
    let account = &messages[0];
    assert_eq!(account.message_name, "Account");
    assert!(account.model_source.contains("pub struct Account"));
    assert!(account.schema_source.contains("FIELD_ID"));
    assert!(account.parser_source.contains("fn parse("));
    assert!(account.writer_source.contains("fn write("));

    assert_eq!(enums.len(), 1);
    assert!(enums[0].model_source.contains("pub enum Status"));
}

#[test]
fn optional_field_of_a_type_with_no_wrapper_fails_with_file_and_message_context() {
    let source = r#"
        syntax = "proto3";
        package example.v1;

        message Inner {
            string text = 1;
        }

        message Outer {
            optional Inner inner = 1;
        }
    "#;
    let file = parse_file("outer.proto", source).unwrap();
    let table = SymbolTable::build(std::slice::from_ref(&file));

    let err = generate_file(&file, std::slice::from_ref(&file), &table).expect_err("message fields have no wrapper");
    assert_eq!(err.message_name, "Outer");
    assert!(err.to_string().contains("Outer"));
}

#[test]
fn optional_scalar_field_with_a_well_known_wrapper_succeeds() {
    let source = r#"
        syntax = "proto3";
        package example.v1;

        message Profile {
            optional int32 age = 1;
        }
    "#;
    let file = parse_file("profile.proto", source).unwrap();
    let table = SymbolTable::build(std::slice::from_ref(&file));

    let (messages, _) = generate_file(&file, std::slice::from_ref(&file), &table).unwrap();
    assert!(messages[0].model_source.contains("pub age: Option<i32>"));
}
