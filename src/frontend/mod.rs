//! Source front end.
//!
//! Turns program text into the structured tree consumed by
//! [`CodeGenerator`](crate::codegen::CodeGenerator).
//!
//! ```text
//! ; comments run to the end of the line
//! create setup
//!     save 6 * 7 in ret
//! end
//! setup                   ; the program returns 42
//! ```
//!
//! Keywords (`create`, `end`, `save`, `in`) are case-insensitive. A bare
//! identifier is a call of a procedure defined earlier in the program.

pub mod lexer;
pub mod parser;

use crate::ast::Node;
use crate::core::CompileResult;

/// Parse `source` into a `Program` node.
pub fn parse(source: &str) -> CompileResult<Node> {
    let tokens = lexer::tokenize(source)?;
    parser::Parser::new(tokens).parse_program()
}
