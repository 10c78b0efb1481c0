//! Character scanning and the annotation tree builder.

pub mod node;
pub mod scanner;

pub use node::{Content, Fragment, Node};
pub use scanner::{Scanned, Scanner};
