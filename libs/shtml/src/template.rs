//! Compiled templates, and rendering them.

use std::{fmt::{self, Display, Write as FmtWrite},
          io::Write};

use anyhow::{Result, Context};
use kstring::KString;
use shtml_bindings::{BindArg, DebugDump, Schema, Tag, ValueSet, Var, bind};

use crate::{node::Condition, wrap::push_wrapped};

/// Reflow parameters for a value only known when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrap {
    pub width: usize,
    pub depth: usize,
    pub indent: KString,
}

/// One step of a compiled program.
#[derive(Debug, Clone)]
pub enum Chunk {
    Static(KString),
    Scalar {
        var: Var,
        wrap: Option<Wrap>,
    },
    /// `program` is rendered once per row of the subsection `tag`.
    Subsection {
        tag: Tag,
        program: Program,
    },
    /// The program of the first matching case is rendered, if it has
    /// one; otherwise the default.
    Switch {
        cases: Vec<(Condition, Option<Program>)>,
        default: Option<Program>,
    },
}

impl Chunk {
    fn render(&self, vs: &ValueSet<'_>, out: &mut dyn Write) -> Result<()> {
        match self {
            Chunk::Static(s) => out.write_all(s.as_bytes())?,
            Chunk::Scalar { var, wrap: None } => out.write_all(vs.get_scalar(var).as_bytes())?,
            Chunk::Scalar { var, wrap: Some(Wrap { width, depth, indent }) } => {
                let mut s = String::new();
                push_wrapped(&mut s, vs.get_scalar(var), *width, *depth, indent);
                out.write_all(s.as_bytes())?
            }
            Chunk::Subsection { tag, program } => {
                vs.get_stream(tag).each(&mut |row| program.render(row, &mut *out))?
            }
            Chunk::Switch { cases, default } => {
                for (condition, program) in cases {
                    if condition.matches(vs) {
                        if let Some(program) = program {
                            program.render(vs, out)?;
                        }
                        return Ok(())
                    }
                }
                if let Some(program) = default {
                    program.render(vs, out)?;
                }
            }
        }
        Ok(())
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Static(s) => write!(f, "static {:?}", s.as_str()),
            Chunk::Scalar { var, wrap: None } => write!(f, "scalar {var}"),
            Chunk::Scalar { var, wrap: Some(w) } =>
                write!(f, "scalar {var} wrapped at {}, depth {}, indent {:?}",
                       w.width, w.depth, w.indent.as_str()),
            Chunk::Subsection { tag, program } =>
                write!(f, "subsection {tag} ({} chunks)", program.chunks.len()),
            Chunk::Switch { cases, default } =>
                write!(f, "switch ({} cases{})", cases.len(),
                       if default.is_some() { ", default" } else { "" }),
        }
    }
}

/// A sequence of chunks.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub(crate) chunks: Vec<Chunk>,
}

impl Program {
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    fn render(&self, vs: &ValueSet<'_>, out: &mut dyn Write) -> Result<()> {
        let n = self.chunks.len();
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.render(vs, out).with_context(
                || format!("rendering chunk #{} of {n}", i + 1))?;
        }
        Ok(())
    }
}

impl DebugDump for Program {
    fn debug_dump(&self, out: &mut dyn FmtWrite, depth: usize) -> fmt::Result {
        let ind = "\t".repeat(depth);
        let n = self.chunks.len();
        for (i, chunk) in self.chunks.iter().enumerate() {
            writeln!(out, "{ind}chunk {}/{n}: {chunk}", i + 1)?;
            match chunk {
                Chunk::Subsection { program, .. } => program.debug_dump(out, depth + 1)?,
                Chunk::Switch { cases, default } => {
                    for (j, (_, program)) in cases.iter().enumerate() {
                        writeln!(out, "{ind}\tcase {}/{}:", j + 1, cases.len())?;
                        if let Some(program) = program {
                            program.debug_dump(out, depth + 2)?;
                        }
                    }
                    if let Some(program) = default {
                        writeln!(out, "{ind}\tdefault:")?;
                        program.debug_dump(out, depth + 2)?;
                    }
                }
                _ => ()
            }
        }
        Ok(())
    }
}

/// A compiled node tree with the schema of its values. Immutable,
/// can be rendered from several threads at once.
#[derive(Debug)]
pub struct Template {
    pub(crate) schema: Schema,
    pub(crate) program: Program,
}

impl Template {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// A new, empty set of values for this template.
    pub fn value_set(&self) -> ValueSet<'_> {
        self.schema.value_set()
    }

    pub fn bind(&self, args: &[BindArg]) -> Result<ValueSet<'_>> {
        bind(&self.schema, args)
    }

    /// Write the output for `vs` to `out`. Missing values render as
    /// empty, missing subsections as no rows. Panics if `vs` was not
    /// made from this template's schema.
    pub fn render(&self, vs: &ValueSet<'_>, out: &mut impl Write) -> Result<()> {
        if vs.schema().id() != self.schema.id() {
            panic!("ValueSet of schema {} rendered with a template of schema {} \
                    (programmer error: values used in wrong context)",
                   vs.schema().id(), self.schema.id())
        }
        self.program.render(vs, out)
    }

    /// Bind `args` and render.
    pub fn generate_html(&self, out: &mut impl Write, args: &[BindArg]) -> Result<()> {
        let vs = self.bind(args)?;
        self.render(&vs, out)
    }

    pub fn render_to_string(&self, vs: &ValueSet<'_>) -> Result<String> {
        let mut out = Vec::new();
        self.render(vs, &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}

impl DebugDump for Template {
    fn debug_dump(&self, out: &mut dyn FmtWrite, depth: usize) -> fmt::Result {
        let ind = "\t".repeat(depth);
        writeln!(out, "{ind}Template{{")?;
        self.program.debug_dump(out, depth + 1)?;
        writeln!(out, "{ind}\t-- bindings follow after this line --")?;
        self.schema.debug_dump(out, depth + 1)?;
        writeln!(out, "{ind}}}")
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug_dump(f, 0)
    }
}
