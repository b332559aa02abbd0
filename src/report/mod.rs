pub mod terminal;

pub use terminal::{preview, TerminalPrinter};
