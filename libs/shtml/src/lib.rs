//! Safe HTML generation: node trees are compiled once into a
//! `Template`, a flat program of static text and references to
//! variables, which is then rendered for every page with freshly
//! bound values.

//! Every string put into the output is checked against the trust
//! level its place requires: constants when compiling, bound values
//! when binding (see `shtml_safe`). Rendering itself does no checks
//! and cannot fail except for errors writing the output.

pub mod error;
pub mod options;
pub mod node;
pub mod content;
pub mod elements;
pub mod wrap;
pub mod template;
mod compiler;

use anyhow::Result;
use shtml_bindings::Schema;

pub use error::StructuralError;
pub use options::CompileOptions;
pub use node::{Attribute, Case, Condition, Element, IndentStyle, Multi, Node, Subsection,
               Switch, Text, Value};
pub use content::Content;
pub use elements::*;
pub use template::{Chunk, Program, Template, Wrap};

/// Compile `node` into a template with a new schema.
pub fn compile(node: &Node, opts: &CompileOptions) -> Result<Template> {
    compile_with_schema(node, Schema::new(), opts)
}

/// Compile `node`, declaring its variables and subsections in
/// `schema`, which may already have declarations (or be strict).
pub fn compile_with_schema(node: &Node, mut schema: Schema, opts: &CompileOptions)
                           -> Result<Template> {
    let program = compiler::Compiler::new(opts).run(node, &mut schema, opts.root_depth)?;
    Ok(Template { schema, program })
}
