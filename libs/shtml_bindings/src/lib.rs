//! The variables of a template (`Schema`), and the values bound to
//! them for one rendering (`ValueSet`).

//! A `Schema` is declared once, then a `ValueSet` is instantiated
//! from it for every page generated. Variables (`Var`) and nested,
//! repeated subsections (`Tag`) are addressed by their index into
//! the schema, not by name, so binding and lookup avoid hashing.
//! Handles carry the identity of the schema they were declared on;
//! using them with a different schema is a bug in the calling code
//! and panics.

pub mod error;
pub mod var;
pub mod schema;
pub mod stream;
pub mod values;
pub mod bind;
pub mod json;
pub mod debug;

pub use error::BindError;
pub use var::{Var, Tag};
pub use schema::{Schema, SchemaId};
pub use stream::{ValueStream, ValueSeries, GeneratedStream, EmptyStream};
pub use values::ValueSet;
pub use bind::{BindArg, Key, bind, bind_declaring, bind_into};
pub use json::{bind_json, json_bind_args};
pub use debug::DebugDump;
