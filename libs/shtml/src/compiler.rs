//! Turning node trees into programs.

use std::collections::HashSet;

use anyhow::{Result, Context, bail};
use kstring::KString;
use shtml_bindings::Schema;
use shtml_safe::{TrustLevel, required_trust_for_attribute};
use shtml_util::trace;

use crate::{error::StructuralError,
            node::{Attribute, Element, IndentStyle, Node, Subsection, Switch, Text, Value},
            options::CompileOptions,
            template::{Chunk, Program, Wrap},
            wrap::push_wrapped};

/// Names are written out verbatim, hence only plain ones are allowed.
fn check_name(kind: &'static str, name: &str) -> Result<(), StructuralError> {
    let plain = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.');
    if name.is_empty() || !name.chars().all(plain) {
        return Err(StructuralError::InvalidName { kind, name: KString::from_ref(name) })
    }
    Ok(())
}

/// The attributes of `attributes` with the last occurrence of each
/// name, in their original order.
fn deduplicated(attributes: &[Attribute]) -> Vec<&Attribute> {
    let mut seen = HashSet::new();
    let mut result: Vec<&Attribute> = attributes.iter().rev()
        .filter(|a| seen.insert(a.name.as_str()))
        .collect();
    result.reverse();
    result
}

pub(crate) struct Compiler<'o> {
    /// Static text not yet turned into a chunk.
    pending: Option<String>,
    chunks: Vec<Chunk>,
    opts: &'o CompileOptions,
}

impl<'o> Compiler<'o> {
    pub(crate) fn new(opts: &'o CompileOptions) -> Self {
        Compiler { pending: None, chunks: Vec::new(), opts }
    }

    /// Compile `node` at indentation `depth`, declaring its variables
    /// and subsections in `schema`.
    pub(crate) fn run(mut self, node: &Node, schema: &mut Schema, depth: usize)
                      -> Result<Program> {
        self.compile(node, schema, depth)?;
        self.flush();
        Ok(Program { chunks: self.chunks })
    }

    /// Whether the output so far ends with a newline followed by
    /// nothing but indentation.
    fn fresh_line(&self) -> bool {
        match &self.pending {
            None => self.chunks.is_empty(),
            Some(p) => {
                for c in p.chars().rev() {
                    match c {
                        '\n' => return true,
                        ' ' | '\t' => (),
                        _ => return false
                    }
                }
                false
            }
        }
    }

    fn flush(&mut self) {
        if let Some(p) = self.pending.take() {
            self.push_chunk(Chunk::Static(KString::from(p)));
        }
    }

    fn push_chunk(&mut self, chunk: Chunk) {
        trace!("chunk #{}: {chunk}", self.chunks.len() + 1);
        self.chunks.push(chunk);
    }

    fn append_chunk(&mut self, chunk: Chunk) {
        self.flush();
        self.push_chunk(chunk);
    }

    fn buffer(&mut self) -> &mut String {
        if self.opts.separate_static_chunks {
            self.flush();
        }
        self.pending.get_or_insert_with(String::new)
    }

    fn write(&mut self, s: &str) {
        self.buffer().push_str(s);
    }

    fn new_line(&mut self, depth: usize) {
        let opts = self.opts;
        let buf = self.buffer();
        buf.push('\n');
        for _ in 0..depth {
            buf.push_str(&opts.indent);
        }
    }

    fn compile(&mut self, node: &Node, schema: &mut Schema, depth: usize) -> Result<()> {
        match node {
            Node::Element(e) => self.element(e, schema, depth),
            Node::Text(t) => self.text(t, schema, depth),
            Node::Raw(value) => self.raw(value, schema),
            Node::Multi(m) => {
                if let Some(e) = &m.error {
                    bail!(e.clone())
                }
                self.children(&m.contents, schema, depth, "multi")
            }
            Node::Subsection(s) => self.subsection(s, schema, depth),
            Node::Switch(s) => self.switch(s, schema, depth),
        }
    }

    fn children(&mut self, nodes: &[Node], schema: &mut Schema, depth: usize, parent: &str)
                -> Result<()> {
        for (i, node) in nodes.iter().enumerate() {
            self.compile(node, schema, depth).with_context(
                || format!("child #{} of {parent}", i + 1))?;
        }
        Ok(())
    }

    fn element(&mut self, e: &Element, schema: &mut Schema, mut depth: usize) -> Result<()> {
        if let Some(err) = &e.error {
            bail!(err.clone())
        }
        check_name("element", &e.name)?;
        let self_closing = e.self_closing || e.xml_self_closing;
        if self_closing && !e.contents.is_empty() {
            bail!(StructuralError::SelfClosingWithContents(e.name.clone()))
        }
        let is_block = e.indent == IndentStyle::Block && !self.opts.compact;

        if is_block && !self.fresh_line() {
            self.new_line(depth);
        }
        self.write(&format!("<{}", e.name));
        for a in deduplicated(&e.attributes) {
            self.attribute(a, schema).with_context(
                || format!("attribute {:?} of <{}>", a.name.as_str(), e.name))?;
        }
        if e.xml_self_closing {
            self.write("/>");
        } else {
            self.write(">");
        }
        if self_closing {
            return Ok(())
        }

        if is_block {
            depth += 1;
            self.new_line(depth);
        }
        self.children(&e.contents, schema, depth, &format!("<{}>", e.name))?;
        if is_block {
            depth -= 1;
            self.new_line(depth);
        }
        self.write(&format!("</{}>", e.name));
        Ok(())
    }

    fn attribute(&mut self, a: &Attribute, schema: &mut Schema) -> Result<()> {
        check_name("attribute", &a.name)?;
        let required = required_trust_for_attribute(&a.name).join(a.trust);
        self.write(&format!(" {}=\"", a.name));
        match &a.value {
            Value::Concrete(s) => {
                let checked = s.check(required)?;
                self.write(&checked);
            }
            Value::Deferred(var) => {
                let var = schema.attach(var, required);
                self.append_chunk(Chunk::Scalar { var, wrap: None });
            }
        }
        self.write("\"");
        Ok(())
    }

    fn text(&mut self, t: &Text, schema: &mut Schema, depth: usize) -> Result<()> {
        let width = t.width.unwrap_or(self.opts.text_width);
        match &t.value {
            Value::Concrete(s) => {
                let checked = s.check(TrustLevel::TextSafe)?;
                let opts = self.opts;
                push_wrapped(self.buffer(), &checked, width, depth, &opts.indent);
            }
            Value::Deferred(var) => {
                let var = schema.attach(var, TrustLevel::TextSafe);
                let wrap = (width > 0).then(|| Wrap {
                    width,
                    depth,
                    indent: KString::from_ref(&self.opts.indent)
                });
                self.append_chunk(Chunk::Scalar { var, wrap });
            }
        }
        Ok(())
    }

    fn raw(&mut self, value: &Value, schema: &mut Schema) -> Result<()> {
        match value {
            Value::Concrete(s) => {
                let checked = s.check(TrustLevel::HtmlSafe)?;
                self.write(&checked);
            }
            Value::Deferred(var) => {
                let var = schema.attach(var, TrustLevel::HtmlSafe);
                self.append_chunk(Chunk::Scalar { var, wrap: None });
            }
        }
        Ok(())
    }

    fn subsection(&mut self, s: &Subsection, schema: &mut Schema, depth: usize) -> Result<()> {
        check_name("subsection", &s.name)?;
        let (tag, child) = schema.declare_subsection(&s.name);
        let program = Compiler::new(self.opts).run(&s.prototype, child, depth)
            .with_context(|| format!("compiling subsection {:?}", s.name.as_str()))?;
        self.append_chunk(Chunk::Subsection { tag, program });
        Ok(())
    }

    /// The cases are compiled against the surrounding schema, their
    /// variables are shared with it.
    fn switch(&mut self, s: &Switch, schema: &mut Schema, depth: usize) -> Result<()> {
        let n = s.cases.len();
        let mut cases = Vec::with_capacity(n);
        for (i, case) in s.cases.iter().enumerate() {
            let program = match &case.output {
                Some(node) => Some(
                    Compiler::new(self.opts).run(node, schema, depth)
                        .with_context(|| format!("compiling case {}/{n}", i + 1))?),
                None => None
            };
            cases.push((case.condition.clone(), program));
        }
        let default = match &s.default {
            Some(node) => Some(
                Compiler::new(self.opts).run(node, schema, depth)
                    .context("compiling default case")?),
            None => None
        };
        self.append_chunk(Chunk::Switch { cases, default });
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use shtml_safe::SafeString;

    use super::*;

    fn attr(name: &'static str, value: &'static str) -> Attribute {
        Attribute {
            name: KString::from_static(name),
            value: Value::from(value),
            trust: TrustLevel::Untrusted
        }
    }

    #[test]
    fn t_deduplicated() {
        let attrs = [attr("a", "1"), attr("b", "2"), attr("a", "3")];
        let got: Vec<_> = deduplicated(&attrs).into_iter()
            .map(|a| (a.name.as_str(), a.value.clone()))
            .collect();
        assert_eq!(got, [("b", Value::from("2")), ("a", Value::from("3"))]);
    }

    #[test]
    fn t_check_name() {
        for name in ["p", "h1", "data-x", "xml:lang", "my_el.x"] {
            assert!(check_name("element", name).is_ok(), "{name:?}");
        }
        for name in ["", "a b", "p>", "x\"", "é"] {
            assert!(check_name("element", name).is_err(), "{name:?}");
        }
    }

    #[test]
    fn t_fresh_line() {
        let opts = CompileOptions::tidy();
        let mut c = Compiler::new(&opts);
        assert!(c.fresh_line());
        c.write("<p>");
        assert!(! c.fresh_line());
        c.new_line(2);
        assert!(c.fresh_line());
        c.flush();
        // No pending text and chunks exist: not known to be fresh.
        assert!(! c.fresh_line());
    }

    #[test]
    fn t_separate_static_chunks() {
        let opts = CompileOptions::debug();
        let mut schema = Schema::new();
        let node = Node::Multi(crate::node::Multi {
            contents: vec![
                Node::Text(Text { value: Value::from("a"), width: None }),
                Node::Text(Text { value: Value::from(SafeString::untrusted("<b>")), width: None }),
            ],
            error: None,
        });
        let program = Compiler::new(&opts).run(&node, &mut schema, 0).unwrap();
        assert_eq!(program.chunks().len(), 2);

        let compact = CompileOptions::compact();
        let program = Compiler::new(&compact).run(&node, &mut schema, 0).unwrap();
        match program.chunks() {
            [Chunk::Static(s)] => assert_eq!(s.as_str(), "a&lt;b&gt;"),
            chunks => panic!("unexpected {chunks:?}")
        }
    }
}
