//! Binding values from JSON data, e.g. as received from an API or
//! read from a file.

use anyhow::Result;
use serde_json::{Map, Value};
use shtml_safe::{TrustLevel, bless};

use crate::{bind::{BindArg, bind}, error::BindError, schema::Schema, values::ValueSet};

fn object_args(obj: &Map<String, Value>, trust: TrustLevel, path: &str)
               -> Result<Vec<BindArg>, BindError> {
    let mut args = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        let path = format!("{path}/{key}");
        let arg = match value {
            Value::Null => continue,
            Value::String(s) => BindArg::scalar(key, bless(trust, s)),
            Value::Number(n) => BindArg::scalar(key, bless(trust, n.to_string())),
            Value::Bool(b) => BindArg::scalar(key, bless(trust, b.to_string())),
            Value::Object(o) => BindArg::rows(key, vec![object_args(o, trust, &path)?]),
            Value::Array(items) => {
                let mut rows = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let path = format!("{path}/{i}");
                    match item {
                        Value::Object(o) => rows.push(object_args(o, trust, &path)?),
                        _ => return Err(BindError::Json {
                            path,
                            reason: "subsection rows must be objects"
                        })
                    }
                }
                BindArg::rows(key, rows)
            }
        };
        args.push(arg);
    }
    Ok(args)
}

/// The bind arguments for a JSON object: strings, numbers and
/// booleans become values blessed at `trust`, arrays of objects
/// become subsection rows, a nested object is a subsection with one
/// row; `null` is skipped.
pub fn json_bind_args(value: &Value, trust: TrustLevel) -> Result<Vec<BindArg>, BindError> {
    match value {
        Value::Object(obj) => object_args(obj, trust, ""),
        _ => Err(BindError::Json {
            path: String::new(),
            reason: "expecting an object at the top level"
        })
    }
}

/// Bind the JSON object `value` to `schema` (see `json_bind_args`).
pub fn bind_json<'s>(schema: &'s Schema, value: &Value, trust: TrustLevel)
                     -> Result<ValueSet<'s>> {
    let args = json_bind_args(value, trust)?;
    bind(schema, &args)
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use shtml_safe::TrustLevel::*;

    use super::*;

    #[test]
    fn t_bind_json() {
        let mut schema = Schema::new();
        let title = schema.declare_scalar("title", TextSafe);
        let count = schema.declare_scalar("count", Untrusted);
        let (comments, comment) = schema.declare_subsection("comments");
        let author = comment.declare_scalar("author", TextSafe);
        let (profile, profile_schema) = schema.declare_subsection("profile");
        let handle = profile_schema.declare_scalar("handle", Untrusted);

        let data = json!({
            "title": "Cats & dogs",
            "count": 2,
            "missing": null,
            "comments": [{"author": "<Jane>"}, {"author": "John"}],
            "profile": {"handle": "jd"},
        });
        let vs = bind_json(&schema, &data, Untrusted).unwrap();
        assert_eq!(vs.get_scalar(&title), "Cats &amp; dogs");
        assert_eq!(vs.get_scalar(&count), "2");
        let mut authors = Vec::new();
        vs.get_stream(&comments).each(&mut |c| {
            authors.push(c.get_scalar(&author).to_string());
            Ok(())
        }).unwrap();
        assert_eq!(authors, ["&lt;Jane&gt;", "John"]);
        let mut handles = Vec::new();
        vs.get_stream(&profile).each(&mut |p| {
            handles.push(p.get_scalar(&handle).to_string());
            Ok(())
        }).unwrap();
        assert_eq!(handles, ["jd"]);
    }

    #[test]
    fn t_bind_json_errors() {
        assert!(matches!(json_bind_args(&json!([1, 2]), Untrusted),
                         Err(BindError::Json { .. })));
        match json_bind_args(&json!({"rows": [{"a": 1}, 2]}), Untrusted) {
            Err(BindError::Json { path, .. }) => assert_eq!(path, "/rows/1"),
            r => panic!("unexpected {r:?}")
        }
    }

    #[test]
    fn t_bind_json_trust_is_checked() {
        let mut schema = Schema::new();
        schema.declare_scalar("class", AttributeSafe);
        let data = json!({"class": "x"});
        assert!(bind_json(&schema, &data, Untrusted).is_err());
        assert!(bind_json(&schema, &data, AttributeSafe).is_ok());
    }
}
