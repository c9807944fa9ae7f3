use pbj_schema::error::SchemaError;
use pbj_schema::model::FieldOrOneOf;
use pbj_schema::model::FieldTypeRef;
use pbj_schema::parser::parse_file;
use pbj_schema::resolver::ResolverContext;
use pbj_schema::resolver::SymbolTable;

#[test]
fn parses_message_with_scalar_and_nested_types() {
    let src = r#"
        syntax = "proto3";
        package example;

        message Account {
            string id = 1;
            int64 balance = 2;
            repeated string tags = 3;

            enum Status {
                UNKNOWN = 0;
                ACTIVE = 1;
            }

            Status status = 4;
        }
    "#;
    let file = parse_file("account.proto", src).unwrap();
    assert_eq!(file.package.as_deref(), Some("example"));
    assert_eq!(file.messages.len(), 1);
    let msg = &file.messages[0];
    assert_eq!(msg.name, "Account");
    assert_eq!(msg.all_fields().len(), 4);
    assert_eq!(msg.nested_enums.len(), 1);
    assert_eq!(msg.nested_enums[0].values.len(), 2);
}

#[test]
fn parses_oneof_block() {
    let src = r#"
        syntax = "proto3";
        message Event {
            oneof payload {
                string text = 1;
                int32 code = 2;
            }
        }
    "#;
    let file = parse_file("event.proto", src).unwrap();
    let msg = &file.messages[0];
    assert_eq!(msg.oneofs().len(), 1);
    let oneof = &msg.oneofs()[0];
    assert_eq!(oneof.name, "payload");
    assert_eq!(oneof.variants.len(), 2);
    assert!(oneof.variants.iter().all(|f| f.one_of.as_deref() == Some("payload")));
}

#[test]
fn rejects_map_fields_loudly() {
    let src = r#"
        syntax = "proto3";
        message Bag {
            map<string, int32> counts = 1;
        }
    "#;
    let err = parse_file("bag.proto", src).unwrap_err();
    match err {
        SchemaError::UnsupportedFeature { feature, .. } => assert_eq!(feature, "mapField"),
        other => panic!("expected UnsupportedFeature, got {:?}", other),
    }
}

#[test]
fn rejects_enum_without_zero_value() {
    let src = r#"
        syntax = "proto3";
        enum Status {
            ACTIVE = 1;
        }
    "#;
    let err = parse_file("status.proto", src).unwrap_err();
    assert!(matches!(err, SchemaError::SchemaParseError { .. }));
}

#[test]
fn captures_java_package_and_comparable_option_comments() {
    let src = r#"
        // <<<pbj.java_package = "com.example.pbj">>>
        syntax = "proto3";
        package example;

        // <<<pbj.comparable = "id, balance">>>
        message Account {
            string id = 1;
            int64 balance = 2;
        }
    "#;
    let file = parse_file("account.proto", src).unwrap();
    assert_eq!(file.java_package_override.as_deref(), Some("com.example.pbj"));
    assert_eq!(
        file.messages[0].comparable.as_deref(),
        Some(&["id".to_owned(), "balance".to_owned()][..])
    );
}

#[test]
fn rejects_comparable_referencing_unknown_field() {
    let src = r#"
        syntax = "proto3";
        // <<<pbj.comparable = "missing">>>
        message Account {
            string id = 1;
        }
    "#;
    let err = parse_file("account.proto", src).unwrap_err();
    assert!(matches!(err, SchemaError::SchemaParseError { .. }));
}

#[test]
fn resolves_named_field_type_within_same_file() {
    let src = r#"
        syntax = "proto3";
        package example;

        message Wallet {
            Account owner = 1;
        }

        message Account {
            string id = 1;
        }
    "#;
    let file = parse_file("wallet.proto", src).unwrap();
    let files = vec![file];
    let table = SymbolTable::build(&files);
    let ctx = ResolverContext::new(&table, &files[0], &files).unwrap();

    let wallet = &files[0].messages[0];
    let owner_field = match &wallet.fields[0] {
        FieldOrOneOf::Field(f) => f,
        _ => panic!("expected a field"),
    };
    let resolved = ctx.resolve(&owner_field.ty, &[]).unwrap();
    assert_eq!(resolved, ".example.Account");
}

#[test]
fn resolves_named_field_type_across_imported_file() {
    let account_src = r#"
        syntax = "proto3";
        package example.accounts;

        message Account {
            string id = 1;
        }
    "#;
    let wallet_src = r#"
        syntax = "proto3";
        package example.wallets;
        import "account.proto";

        message Wallet {
            Account owner = 1;
        }
    "#;
    let account_file = parse_file("account.proto", account_src).unwrap();
    let wallet_file = parse_file("wallet.proto", wallet_src).unwrap();
    let files = vec![account_file, wallet_file];
    let table = SymbolTable::build(&files);
    let ctx = ResolverContext::new(&table, &files[1], &files).unwrap();

    let wallet = &files[1].messages[0];
    let owner_field = match &wallet.fields[0] {
        FieldOrOneOf::Field(f) => f,
        _ => panic!("expected a field"),
    };
    let resolved = ctx.resolve(&owner_field.ty, &[]).unwrap();
    assert_eq!(resolved, ".example.accounts.Account");
}

#[test]
fn reports_missing_import() {
    let wallet_src = r#"
        syntax = "proto3";
        import "does_not_exist.proto";

        message Wallet {
            string id = 1;
        }
    "#;
    let wallet_file = parse_file("wallet.proto", wallet_src).unwrap();
    let files = vec![wallet_file];
    let table = SymbolTable::build(&files);
    let err = ResolverContext::new(&table, &files[0], &files).unwrap_err();
    assert!(matches!(err, SchemaError::MissingImport { .. }));
}

#[test]
fn reports_unresolved_type() {
    let src = r#"
        syntax = "proto3";
        package example;

        message Wallet {
            Ghost owner = 1;
        }
    "#;
    let file = parse_file("wallet.proto", src).unwrap();
    let files = vec![file];
    let table = SymbolTable::build(&files);
    let ctx = ResolverContext::new(&table, &files[0], &files).unwrap();

    let wallet = &files[0].messages[0];
    let owner_field = match &wallet.fields[0] {
        FieldOrOneOf::Field(f) => f,
        _ => panic!("expected a field"),
    };
    let err = ctx.resolve(&owner_field.ty, &[]).unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvedType { .. }));
}

#[test]
fn resolves_nested_type_from_enclosing_scope() {
    let src = r#"
        syntax = "proto3";
        package example;

        message Account {
            message Address {
                string city = 1;
            }

            Address home = 1;
        }
    "#;
    let file = parse_file("account.proto", src).unwrap();
    let files = vec![file];
    let table = SymbolTable::build(&files);
    let ctx = ResolverContext::new(&table, &files[0], &files).unwrap();

    let account = &files[0].messages[0];
    let home_field = match &account.fields[0] {
        FieldOrOneOf::Field(f) => f,
        _ => panic!("expected a field"),
    };
    let resolved = ctx.resolve(&home_field.ty, &["Account"]).unwrap();
    assert_eq!(resolved, ".example.Account.Address");
}

#[test]
fn ignores_field_type_that_is_scalar() {
    let ty = FieldTypeRef::Scalar(pbj_runtime::field::FieldType::Int32);
    assert!(ty.is_scalar());
}
