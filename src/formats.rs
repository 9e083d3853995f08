//! Output formats
//!
//! - `markdown`: the rendered document
//! - `tree`: treeviz dump of the AST
//! - `json`: the AST as JSON
//!
//! AST formats implement [`Formatter`]; the processor resolves the markdown, tree
//! and json modes through a [`FormatRegistry`]. The token listing works on the
//! token stream instead and is a plain function.

pub mod json;
pub mod markdown;
pub mod registry;
pub mod tokens;
pub mod treeviz;

pub use json::{to_json_string, JsonFormatter};
pub use markdown::{MarkdownRenderer, DEFAULT_WIKI_BASE_URL, RESERVED_KEYS};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tokens::to_token_listing;
pub use treeviz::{to_treeviz_str, TreevizFormatter};
