//! Recursive-descent parser building a [`crate::model::FileDescriptor`]
//! from Protobuf 3 source.

use std::path::Path;
use std::path::PathBuf;

use pbj_runtime::field::FieldType as ScalarType;

use crate::error::SchemaError;
use crate::error::SchemaResult;
use crate::lexer::Loc;
use crate::lexer::Token;
use crate::lexer::Tokenizer;
use crate::model::Enum;
use crate::model::EnumValue;
use crate::model::Field;
use crate::model::FieldOrOneOf;
use crate::model::FieldTypeRef;
use crate::model::FileDescriptor;
use crate::model::Import;
use crate::model::Message;
use crate::model::Method;
use crate::model::OneOf;
use crate::model::Service;
use crate::model::Syntax;

pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    lookahead: (Token, Loc),
    path: PathBuf,
    java_package_override: Option<String>,
    captured_file_level_comment: bool,
}

impl<'a> Parser<'a> {
    pub fn new(path: impl Into<PathBuf>, source: &'a str) -> SchemaResult<Parser<'a>> {
        let mut tokenizer = Tokenizer::new(source);
        let path = path.into();
        let lookahead = tokenizer.next_token().map_err(|e| SchemaError::SchemaParseError {
            file: path.clone(),
            loc: e.loc,
            message: e.message,
        })?;
        Ok(Parser {
            tokenizer,
            lookahead,
            path,
            java_package_override: None,
            captured_file_level_comment: false,
        })
    }

    fn loc(&self) -> Loc {
        self.lookahead.1
    }

    fn err(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::SchemaParseError {
            file: self.path.clone(),
            loc: self.loc(),
            message: message.into(),
        }
    }

    fn bump(&mut self) -> SchemaResult<(Token, Loc)> {
        let next = self
            .tokenizer
            .next_token()
            .map_err(|e| SchemaError::SchemaParseError {
                file: self.path.clone(),
                loc: e.loc,
                message: e.message,
            })?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn expect_symbol(&mut self, c: char) -> SchemaResult<()> {
        match self.lookahead.0.clone() {
            Token::Symbol(s) if s == c => {
                self.bump()?;
                Ok(())
            }
            other => Err(self.err(format!("expected `{}`, found {:?}", c, other))),
        }
    }

    fn eat_symbol(&mut self, c: char) -> SchemaResult<bool> {
        if matches!(&self.lookahead.0, Token::Symbol(s) if *s == c) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_ident(&mut self) -> SchemaResult<String> {
        match self.lookahead.0.clone() {
            Token::Ident(s) => {
                self.bump()?;
                Ok(s)
            }
            other => Err(self.err(format!("expected identifier, found {:?}", other))),
        }
    }

    fn expect_str_lit(&mut self) -> SchemaResult<String> {
        match self.lookahead.0.clone() {
            Token::StrLit(s) => {
                self.bump()?;
                Ok(s)
            }
            other => Err(self.err(format!("expected string literal, found {:?}", other))),
        }
    }

    fn expect_int_lit(&mut self) -> SchemaResult<u64> {
        match self.lookahead.0.clone() {
            Token::IntLit(v) => {
                self.bump()?;
                Ok(v)
            }
            other => Err(self.err(format!("expected integer literal, found {:?}", other))),
        }
    }

    fn peek_is_ident(&self, kw: &str) -> bool {
        matches!(&self.lookahead.0, Token::Ident(s) if s == kw)
    }

    /// Capture a `pbj.java_package` option-comment above the upcoming
    /// token, at most once per file.
    fn maybe_capture_file_java_package(&mut self) {
        if self.captured_file_level_comment {
            return;
        }
        self.captured_file_level_comment = true;
        let loc = self.loc();
        for c in self.tokenizer.take_option_comments_above(loc) {
            if c.name == "pbj.java_package" {
                self.java_package_override = Some(c.value);
            } else if c.name != "pbj.comparable" {
                log::warn!("{}: unrecognized option-comment `{}`, ignored", self.path.display(), c.name);
            }
        }
    }

    /// Parse the entire file into a [`FileDescriptor`]:
    /// `proto → syntax?, package?, import*, topLevelDef*`.
    pub fn parse_file(mut self) -> SchemaResult<FileDescriptor> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut messages = Vec::new();
        let mut enums = Vec::new();
        let mut services = Vec::new();

        if self.peek_is_ident("syntax") {
            self.bump()?;
            self.expect_symbol('=')?;
            let syntax = self.expect_str_lit()?;
            if syntax != "proto3" {
                return Err(self.err(format!("unsupported syntax `{}`, only proto3 is supported", syntax)));
            }
            self.expect_symbol(';')?;
        }

        self.maybe_capture_file_java_package();
        if self.peek_is_ident("package") {
            self.bump()?;
            package = Some(self.expect_dotted_ident()?);
            self.expect_symbol(';')?;
        }

        loop {
            self.maybe_capture_file_java_package();
            match self.lookahead.0.clone() {
                Token::Eof => break,
                Token::Ident(ref kw) if kw == "import" => {
                    self.bump()?;
                    let public = self.peek_is_ident("public");
                    if public {
                        self.bump()?;
                    } else if self.peek_is_ident("weak") {
                        self.bump()?;
                    }
                    let path = self.expect_str_lit()?;
                    self.expect_symbol(';')?;
                    imports.push(Import { path, public });
                }
                Token::Ident(ref kw) if kw == "message" => {
                    messages.push(self.parse_message()?);
                }
                Token::Ident(ref kw) if kw == "enum" => {
                    enums.push(self.parse_enum()?);
                }
                Token::Ident(ref kw) if kw == "service" => {
                    services.push(self.parse_service()?);
                }
                Token::Ident(ref kw) if kw == "option" => {
                    self.parse_option_statement()?;
                }
                other => return Err(self.err(format!("unexpected top-level token {:?}", other))),
            }
        }

        Ok(FileDescriptor {
            path: self.path.clone(),
            package,
            syntax: Syntax::Proto3,
            imports,
            messages,
            enums,
            services,
            java_package_override: self.java_package_override,
        })
    }

    fn expect_dotted_ident(&mut self) -> SchemaResult<String> {
        // The tokenizer already folds `a.b.c` into a single `Ident` token
        // (dots are accepted as identifier continuation characters), so
        // this is just `expect_ident` under a name that documents intent
        // at call sites.
        self.expect_ident()
    }

    fn parse_option_statement(&mut self) -> SchemaResult<()> {
        self.bump()?; // `option`
        self.eat_symbol('(')?;
        self.expect_ident()?;
        self.eat_symbol(')')?;
        while self.eat_symbol('.')? {
            self.expect_ident()?;
        }
        self.expect_symbol('=')?;
        self.parse_constant()?;
        self.expect_symbol(';')?;
        Ok(())
    }

    fn parse_constant(&mut self) -> SchemaResult<()> {
        match self.lookahead.0.clone() {
            Token::StrLit(_) | Token::IntLit(_) | Token::FloatLit(_) | Token::Ident(_) => {
                self.bump()?;
                Ok(())
            }
            Token::Symbol('-') => {
                self.bump()?;
                self.parse_constant()
            }
            other => Err(self.err(format!("expected constant value, found {:?}", other))),
        }
    }

    fn parse_field_options(&mut self) -> SchemaResult<()> {
        if self.eat_symbol('[')? {
            loop {
                self.expect_ident()?;
                self.expect_symbol('=')?;
                self.parse_constant()?;
                if !self.eat_symbol(',')? {
                    break;
                }
            }
            self.expect_symbol(']')?;
        }
        Ok(())
    }

    fn parse_reserved(&mut self) -> SchemaResult<()> {
        self.bump()?; // `reserved`
        loop {
            match self.lookahead.0.clone() {
                Token::IntLit(_) => {
                    self.bump()?;
                    if self.peek_is_ident("to") {
                        self.bump()?;
                        self.expect_int_lit()?;
                    }
                }
                Token::StrLit(_) => {
                    self.bump()?;
                }
                other => return Err(self.err(format!("invalid reserved entry {:?}", other))),
            }
            if !self.eat_symbol(',')? {
                break;
            }
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn scalar_type_from_ident(name: &str) -> Option<ScalarType> {
        Some(match name {
            "double" => ScalarType::Double,
            "float" => ScalarType::Float,
            "int32" => ScalarType::Int32,
            "int64" => ScalarType::Int64,
            "uint32" => ScalarType::Uint32,
            "uint64" => ScalarType::Uint64,
            "sint32" => ScalarType::Sint32,
            "sint64" => ScalarType::Sint64,
            "fixed32" => ScalarType::Fixed32,
            "fixed64" => ScalarType::Fixed64,
            "sfixed32" => ScalarType::Sfixed32,
            "sfixed64" => ScalarType::Sfixed64,
            "bool" => ScalarType::Bool,
            "string" => ScalarType::String,
            "bytes" => ScalarType::Bytes,
            _ => return None,
        })
    }

    fn parse_field_type(&mut self) -> SchemaResult<FieldTypeRef> {
        let name = self.expect_ident()?;
        if let Some(scalar) = Self::scalar_type_from_ident(&name) {
            Ok(FieldTypeRef::Scalar(scalar))
        } else {
            Ok(FieldTypeRef::Named(name))
        }
    }

    /// Parses one field, including the `repeated`/`map<...>` prefix. A
    /// `map<K,V>` declaration is rejected outright: this compiler fails
    /// loudly with `mapField not supported` rather than generating code
    /// for it.
    fn parse_field(&mut self, one_of: Option<String>) -> SchemaResult<Field> {
        let loc = self.loc();
        let mut repeated = false;
        let mut optional = false;
        if self.peek_is_ident("repeated") {
            self.bump()?;
            repeated = true;
        } else if self.peek_is_ident("optional") {
            self.bump()?;
            optional = true;
        }

        if self.peek_is_ident("map") {
            return Err(SchemaError::UnsupportedFeature {
                feature: "mapField".to_owned(),
                file: self.path.clone(),
                loc,
            });
        }

        let ty = self.parse_field_type()?;
        let name = self.expect_ident()?;
        self.expect_symbol('=')?;
        let number = self.expect_int_lit()?;
        self.parse_field_options()?;
        self.expect_symbol(';')?;

        Ok(Field {
            name,
            ty,
            repeated,
            optional,
            one_of,
            number: number as u32,
            loc,
        })
    }

    fn parse_oneof(&mut self) -> SchemaResult<OneOf> {
        let loc = self.loc();
        self.bump()?; // `oneof`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;
        let mut variants = Vec::new();
        while !self.eat_symbol('}')? {
            let field = self.parse_field(Some(name.clone()))?;
            if field.repeated {
                return Err(self.err("a oneof variant cannot be repeated"));
            }
            variants.push(field);
        }
        Ok(OneOf { name, variants, loc })
    }

    fn parse_message(&mut self) -> SchemaResult<Message> {
        let loc = self.loc();
        self.bump()?; // `message`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut fields = Vec::new();
        let mut nested_messages = Vec::new();
        let mut nested_enums = Vec::new();
        let mut comparable = None;

        while !self.eat_symbol('}')? {
            let field_loc = self.loc();
            let comments = self.tokenizer.take_option_comments_above(field_loc);
            for c in &comments {
                if c.name == "pbj.comparable" {
                    comparable = Some(
                        c.value
                            .split(',')
                            .map(|s| s.trim().to_owned())
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>(),
                    );
                } else if c.name != "pbj.java_package" {
                    log::warn!(
                        "{}: unrecognized option-comment `{}`, ignored",
                        self.path.display(),
                        c.name
                    );
                }
            }

            match self.lookahead.0.clone() {
                Token::Ident(ref kw) if kw == "message" => {
                    nested_messages.push(self.parse_message()?);
                }
                Token::Ident(ref kw) if kw == "enum" => {
                    nested_enums.push(self.parse_enum()?);
                }
                Token::Ident(ref kw) if kw == "oneof" => {
                    fields.push(FieldOrOneOf::OneOf(self.parse_oneof()?));
                }
                Token::Ident(ref kw) if kw == "reserved" => {
                    self.parse_reserved()?;
                }
                Token::Ident(ref kw) if kw == "option" => {
                    self.parse_option_statement()?;
                }
                Token::Symbol(';') => {
                    self.bump()?;
                }
                _ => {
                    fields.push(FieldOrOneOf::Field(self.parse_field(None)?));
                }
            }
        }

        if let Some(fields_list) = &comparable {
            let names = Message {
                name: name.clone(),
                fields: fields.clone(),
                nested_messages: nested_messages.clone(),
                nested_enums: nested_enums.clone(),
                comparable: None,
                loc,
            };
            for f in fields_list {
                if names.field_by_name(f).is_none() {
                    return Err(self.err(format!(
                        "pbj.comparable references unknown field `{}` in message `{}`",
                        f, name
                    )));
                }
            }
        }

        Ok(Message {
            name,
            fields,
            nested_messages,
            nested_enums,
            comparable,
            loc,
        })
    }

    fn parse_enum(&mut self) -> SchemaResult<Enum> {
        let loc = self.loc();
        self.bump()?; // `enum`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;
        let mut values = Vec::new();
        while !self.eat_symbol('}')? {
            if self.peek_is_ident("option") {
                self.parse_option_statement()?;
                continue;
            }
            if self.peek_is_ident("reserved") {
                self.parse_reserved()?;
                continue;
            }
            let value_name = self.expect_ident()?;
            self.expect_symbol('=')?;
            let sign = self.eat_symbol('-')?;
            let mut number = self.expect_int_lit()? as i32;
            if sign {
                number = -number;
            }
            self.parse_field_options()?;
            self.expect_symbol(';')?;
            values.push(EnumValue { name: value_name, number });
        }
        if !values.iter().any(|v| v.number == 0) {
            return Err(self.err(format!(
                "enum `{}` has no zero-valued member (proto3 requires one)",
                name
            )));
        }
        Ok(Enum { name, values, loc })
    }

    fn parse_service(&mut self) -> SchemaResult<Service> {
        self.bump()?; // `service`
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;
        let mut methods = Vec::new();
        while !self.eat_symbol('}')? {
            if self.peek_is_ident("option") {
                self.parse_option_statement()?;
                continue;
            }
            self.expect_ident_kw("rpc")?;
            let method_name = self.expect_ident()?;
            self.expect_symbol('(')?;
            self.eat_symbol_opt("stream");
            let input_type = self.expect_ident()?;
            self.expect_symbol(')')?;
            self.expect_ident_kw("returns")?;
            self.expect_symbol('(')?;
            self.eat_symbol_opt("stream");
            let output_type = self.expect_ident()?;
            self.expect_symbol(')')?;
            if self.eat_symbol('{')? {
                while !self.eat_symbol('}')? {
                    self.bump()?;
                }
            } else {
                self.expect_symbol(';')?;
            }
            methods.push(Method {
                name: method_name,
                input_type,
                output_type,
            });
        }
        Ok(Service { name, methods })
    }

    fn expect_ident_kw(&mut self, kw: &str) -> SchemaResult<()> {
        if self.peek_is_ident(kw) {
            self.bump()?;
            Ok(())
        } else {
            Err(self.err(format!("expected `{}`", kw)))
        }
    }

    fn eat_symbol_opt(&mut self, kw: &str) {
        if self.peek_is_ident(kw) {
            let _ = self.bump();
        }
    }
}

/// Parse `source` (read from `path`, used only for diagnostics) into a
/// [`FileDescriptor`].
pub fn parse_file(path: impl Into<PathBuf>, source: &str) -> SchemaResult<FileDescriptor> {
    Parser::new(path, source)?.parse_file()
}

/// Normalizes a path for import matching: strip surrounding quotes
/// (callers already do this via string-literal parsing) and convert
/// separators to the platform's.
pub fn normalize_import_path(raw: &str) -> PathBuf {
    let unix_style = raw.trim_matches('"').trim_matches('\'');
    let mut normalized = PathBuf::new();
    for part in unix_style.split(|c| c == '/' || c == '\\') {
        normalized.push(part);
    }
    normalized
}

pub fn path_display_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
