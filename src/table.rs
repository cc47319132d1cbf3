//! A page consisting of one big table, for timing the renderer on
//! many small rows.

use shtml::{Node, body, contents, element, head, html_page, text};
use shtml_bindings::{BindArg, Var};
use shtml_safe::SafeString;

pub fn table_page_node() -> Node {
    let cell = |name: &'static str| element("td", contents![text(Var::free(name))]);
    html_page(
        head(contents![element("title", contents![text("Test page")])]),
        body(contents![
            element("table", contents![
                element("tbody", contents![
                    shtml::subsection("rows", element("tr", contents![
                        cell("label"),
                        cell("state"),
                    ]))
                ])
            ])
        ]),
        vec![])
}

/// `num_rows` rows, their values derived from `counter`.
pub fn table_args(counter: i64, num_rows: usize) -> Vec<BindArg> {
    let label = format!("{counter}abc");
    let rows = (100..100 + num_rows as i64).map(|i| {
        let state = if (i as f64 * 0.1).sin() > 0.432 { "on" } else { "off" };
        vec![
            BindArg::scalar("label", SafeString::untrusted(&label)),
            BindArg::scalar("state", SafeString::untrusted(format!("{} - {state}", i + counter))),
        ]
    }).collect();
    vec![BindArg::rows("rows", rows)]
}


#[cfg(test)]
mod tests {
    use shtml::{CompileOptions, compile};

    use super::*;

    #[test]
    fn t_table() {
        let t = compile(&table_page_node(), &CompileOptions::compact()).unwrap();
        let vs = t.bind(&table_args(1, 2)).unwrap();
        let html = t.render_to_string(&vs).unwrap();
        assert!(html.contains("<tbody><tr><td>1abc</td><td>101 - off</td></tr>\
                               <tr><td>1abc</td><td>102 - off</td></tr></tbody>"),
                "{html}");
    }
}
