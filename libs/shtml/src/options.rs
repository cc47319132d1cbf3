use serde::{Deserialize, Serialize};

/// How the output of a template is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// One level of indentation.
    pub indent: String,
    /// No newlines or indentation around block elements.
    pub compact: bool,
    /// Don't merge adjacent static text into one chunk; for looking
    /// at the compiled program.
    pub separate_static_chunks: bool,
    /// Reflow text to this many characters per line; 0 means no
    /// reflowing.
    pub text_width: usize,
    /// Indentation depth of the top-level node.
    pub root_depth: usize,
}

impl CompileOptions {
    pub fn compact() -> Self {
        CompileOptions {
            indent: "  ".into(),
            compact: true,
            separate_static_chunks: false,
            text_width: 0,
            root_depth: 0,
        }
    }

    pub fn tidy() -> Self {
        CompileOptions {
            compact: false,
            ..Self::compact()
        }
    }

    pub fn debug() -> Self {
        CompileOptions {
            separate_static_chunks: true,
            ..Self::tidy()
        }
    }

    pub fn with_text_width(self, text_width: usize) -> Self {
        CompileOptions { text_width, ..self }
    }

    pub fn with_root_depth(self, root_depth: usize) -> Self {
        CompileOptions { root_depth, ..self }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::compact()
    }
}
