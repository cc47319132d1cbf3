//! Reflowing text to a line width.

/// Append the whitespace-separated words of `text` to `out`, starting
/// a new line indented `depth` times with `indent` before a word that
/// would make the line longer than `width` characters. The indentation
/// counts towards the width. A word that is wider than `width` on its
/// own stays whole on its own line; no empty lines are produced. With
/// `width` 0, `text` is appended unchanged.
pub fn push_wrapped(out: &mut String, text: &str, width: usize, depth: usize, indent: &str) {
    if width == 0 {
        out.push_str(text);
        return
    }
    let base = depth * indent.chars().count();
    let mut line_len = base;
    let mut line_empty = true;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if !line_empty {
            if line_len + 1 + len > width {
                out.push('\n');
                for _ in 0..depth {
                    out.push_str(indent);
                }
                line_len = base;
            } else {
                out.push(' ');
                line_len += 1;
            }
        }
        out.push_str(word);
        line_len += len;
        line_empty = false;
    }
}

pub fn wrapped(text: &str, width: usize, depth: usize, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_wrapped(&mut out, text, width, depth, indent);
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_wrapped() {
        for (text, width, depth, result) in [
            ("Hello, World!", 1, 0, "Hello,\nWorld!"),
            ("Hello, World!", 1, 1, "Hello,\n  World!"),
            ("Hello, World!", 0, 3, "Hello, World!"),
            ("Hello, World!", 80, 0, "Hello, World!"),
            ("  a  b\n\tc ", 80, 0, "a b c"),
            ("aa bb cc dd", 5, 0, "aa bb\ncc dd"),
            ("aa bb cc dd", 7, 1, "aa bb\n  cc dd"),
            ("extraordinarily long words", 4, 0, "extraordinarily\nlong\nwords"),
            ("ääää öö", 7, 0, "ääää öö"),
            ("", 10, 2, ""),
        ] {
            assert_eq!(wrapped(text, width, depth, "  "), result,
                       "{text:?} at width {width}, depth {depth}");
        }
    }

    #[test]
    fn t_no_empty_lines() {
        let text = "a bb ccc dddd eeeee ffffff";
        for width in 1..12 {
            let s = wrapped(text, width, 1, "\t");
            assert!(!s.starts_with('\n'), "{s:?}");
            assert!(!s.contains("\n\t\n"), "{s:?}");
            assert_eq!(s.split_whitespace().collect::<Vec<_>>(),
                       text.split_whitespace().collect::<Vec<_>>());
        }
    }
}
