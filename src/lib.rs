pub mod cli;
pub mod llm;
pub mod pdf;
pub mod report;
pub mod session;
