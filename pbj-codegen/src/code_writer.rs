//! Indentation-tracking text emitter used by every generator in this
//! crate. Generated source is built with plain string writes rather
//! than a token-tree macro (`quote!`).

pub struct CodeWriter {
    buf: String,
    indent: usize,
}

impl CodeWriter {
    pub fn new() -> CodeWriter {
        CodeWriter {
            buf: String::new(),
            indent: 0,
        }
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
    }

    pub fn write_line(&mut self, line: &str) {
        if line.is_empty() {
            self.buf.push('\n');
            return;
        }
        self.write_indent();
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    pub fn comment(&mut self, text: &str) {
        self.write_line(&format!("// {}", text));
    }

    pub fn doc_comment(&mut self, text: &str) {
        self.write_line(&format!("/// {}", text));
    }

    pub fn derive(&mut self, traits: &[&str]) {
        self.write_line(&format!("#[derive({})]", traits.join(", ")));
    }

    pub fn attribute(&mut self, attr: &str) {
        self.write_line(&format!("#[{}]", attr));
    }

    pub fn indented(&mut self, cb: impl FnOnce(&mut CodeWriter)) {
        self.indent += 1;
        cb(self);
        self.indent -= 1;
    }

    /// Opens `prefix {`, runs `cb` at one deeper indent, closes `}`.
    pub fn block(&mut self, prefix: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.write_line(&format!("{} {{", prefix));
        self.indented(cb);
        self.write_line("}");
    }

    pub fn pub_struct(&mut self, name: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("pub struct {}", name), cb);
    }

    pub fn pub_enum(&mut self, name: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("pub enum {}", name), cb);
    }

    pub fn field_decl(&mut self, name: &str, ty: &str) {
        self.write_line(&format!("pub {}: {},", name, ty));
    }

    pub fn field_entry(&mut self, name: &str, expr: &str) {
        self.write_line(&format!("{}: {},", name, expr));
    }

    pub fn def_fn(&mut self, sig: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("fn {}", sig), cb);
    }

    pub fn pub_fn(&mut self, sig: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("pub fn {}", sig), cb);
    }

    pub fn impl_self_block(&mut self, type_name: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("impl {}", type_name), cb);
    }

    pub fn impl_for_block(&mut self, trait_name: &str, type_name: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("impl {} for {}", trait_name, type_name), cb);
    }

    pub fn match_block(&mut self, expr: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("match {}", expr), cb);
    }

    pub fn case_block(&mut self, pattern: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("{} =>", pattern), cb);
    }

    pub fn if_stmt(&mut self, cond: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("if {}", cond), cb);
    }

    pub fn if_let_stmt(&mut self, pattern: &str, expr: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("if let {} = {}", pattern, expr), cb);
    }

    pub fn while_block(&mut self, cond: &str, cb: impl FnOnce(&mut CodeWriter)) {
        self.block(&format!("while {}", cond), cb);
    }

    pub fn loop_block(&mut self, cb: impl FnOnce(&mut CodeWriter)) {
        self.block("loop", cb);
    }
}

impl Default for CodeWriter {
    fn default() -> CodeWriter {
        CodeWriter::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nests_blocks_with_four_space_indent() {
        let mut w = CodeWriter::new();
        w.def_fn("foo() -> u32", |w| {
            w.if_stmt("true", |w| {
                w.write_line("return 1;");
            });
            w.write_line("0");
        });
        let out = w.finish();
        assert_eq!(
            out,
            "fn foo() -> u32 {\n    if true {\n        return 1;\n    }\n    0\n}\n"
        );
    }

    #[test]
    fn struct_and_field_decls() {
        let mut w = CodeWriter::new();
        w.derive(&["Debug", "Clone"]);
        w.pub_struct("Foo", |w| {
            w.field_decl("id", "String");
        });
        let out = w.finish();
        assert_eq!(
            out,
            "#[derive(Debug, Clone)]\npub struct Foo {\n    pub id: String,\n}\n"
        );
    }
}
