//! Verbose descriptions of schemas and values, for debugging and
//! for comparing structures in tests.

use std::fmt::{self, Display, Write};

use crate::{bind::{BindArg, Key}, schema::Schema, values::ValueSet};

pub trait DebugDump {
    /// Write a description to `out`, indented by `depth` tabs.
    fn debug_dump(&self, out: &mut dyn Write, depth: usize) -> fmt::Result;

    fn debug_string(&self) -> String {
        let mut s = String::new();
        self.debug_dump(&mut s, 0).expect("writing to a String can't fail");
        s
    }
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

impl DebugDump for Schema {
    fn debug_dump(&self, out: &mut dyn Write, depth: usize) -> fmt::Result {
        let ind = indent(depth);
        write!(out, "{ind}Schema{{ strict={}", self.strict())?;
        if !self.is_root() {
            write!(out, " (nested, named {:?})", self.debug_name())?;
        }
        writeln!(out)?;
        let vars = self.scalars();
        for (i, v) in vars.iter().enumerate() {
            writeln!(out, "{ind}\tvar {}/{}: {:?}@{} ({})",
                     i + 1, vars.len(), v.name(), v.index(), v.trust())?;
        }
        let n = self.subsection_count();
        for (i, (_, child)) in self.subsections().enumerate() {
            writeln!(out, "{ind}\tnested schema {}/{n}:", i + 1)?;
            child.debug_dump(out, depth + 1)?;
        }
        writeln!(out, "{ind}}}")
    }
}

impl<'s> DebugDump for ValueSet<'s> {
    fn debug_dump(&self, out: &mut dyn Write, depth: usize) -> fmt::Result {
        let ind = indent(depth);
        let schema = self.schema();
        write!(out, "{ind}ValueSet{{ strict={}", schema.strict())?;
        if !schema.is_root() {
            write!(out, " (nested, named {:?})", schema.debug_name())?;
        }
        writeln!(out)?;
        let vars = schema.scalars();
        for (i, v) in vars.iter().enumerate() {
            writeln!(out, "{ind}\tvar {}/{}: {:?}@{} ({})",
                     i + 1, vars.len(), v.name(), v.index(), v.trust())?;
            match self.get_scalar(v) {
                "" => writeln!(out, "{ind}\t\t(empty)")?,
                s => writeln!(out, "{ind}\t\tstring {s:?}")?,
            }
        }
        let n = schema.subsection_count();
        for (i, (tag, _)) in schema.subsections().enumerate() {
            writeln!(out, "{ind}\tnested schema {}/{n} {:?}@{}:",
                     i + 1, tag.name(), tag.index())?;
            let mut j = 0;
            let streamed = self.get_stream(tag).each(&mut |row| {
                j += 1;
                writeln!(out, "{ind}\tinstantiation (ValueSet) #{j}:")?;
                row.debug_dump(out, depth + 2)?;
                Ok(())
            });
            match streamed {
                Err(e) if e.is::<fmt::Error>() => return Err(fmt::Error),
                Err(e) => writeln!(out, "{ind}\t\t(stream failed: {e})")?,
                Ok(()) if j == 0 => writeln!(out, "{ind}\t\t(empty)")?,
                Ok(()) => ()
            }
        }
        writeln!(out, "{ind}}}")
    }
}

impl DebugDump for BindArg {
    fn debug_dump(&self, out: &mut dyn Write, depth: usize) -> fmt::Result {
        let ind = "  ".repeat(depth);
        match self {
            BindArg::Scalar { key, value, trust } => {
                match key {
                    Key::Handle(var) => write!(out, "{ind}BindArg{{ var={var}, ")?,
                    Key::Name(name) => write!(out, "{ind}BindArg{{ named {:?}, ",
                                              name.as_str())?,
                }
                write!(out, "string={value}, req={trust} }}")
            }
            BindArg::Rows { key, rows } => {
                match key {
                    Key::Handle(tag) => write!(out, "{ind}BindArg{{ subsection {tag}, ")?,
                    Key::Name(name) => write!(out, "{ind}BindArg{{ subsection named {:?}, ",
                                              name.as_str())?,
                }
                write!(out, "{} rows", rows.len())?;
                for (i, row) in rows.iter().enumerate() {
                    writeln!(out, "\n{ind}  row {}/{}:", i + 1, rows.len())?;
                    for col in row {
                        col.debug_dump(out, depth + 2)?;
                        writeln!(out)?;
                    }
                }
                if !rows.is_empty() {
                    write!(out, "{ind}")?;
                }
                write!(out, "}}")
            }
        }
    }
}

impl DebugDump for [BindArg] {
    fn debug_dump(&self, out: &mut dyn Write, depth: usize) -> fmt::Result {
        let ind = "  ".repeat(depth);
        for (i, arg) in self.iter().enumerate() {
            writeln!(out, "{ind}arg {}/{}:", i + 1, self.len())?;
            arg.debug_dump(out, depth + 1)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug_dump(f, 0)
    }
}

impl<'s> Display for ValueSet<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug_dump(f, 0)
    }
}
