use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::llm::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "resumepilot",
    about = "Interactive resume analysis against a locally hosted LLM server",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Defaults to an interactive `analyze` run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a resume PDF and ask follow-up questions
    Analyze(AnalyzeArgs),

    /// Display the effective LLM configuration
    Config(LlmArgs),

    /// Show information about ResumePilot
    Info,
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Path to the resume PDF. Prompted for when omitted
    #[arg(value_name = "PDF")]
    pub pdf: Option<PathBuf>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub struct LlmArgs {
    /// Chat-completions endpoint URL (overrides LLM_API_URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Model identifier (overrides LLM_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature between 0.0 and 1.0 (overrides LLM_TEMPERATURE)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Maximum tokens in each reply (overrides LLM_MAX_TOKENS)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Log full prompts at debug level
    #[arg(long)]
    pub llm_debug: bool,
}

impl From<LlmArgs> for ConfigOverrides {
    fn from(args: LlmArgs) -> Self {
        Self {
            api_url: args.api_url,
            model: args.model,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
            debug: args.llm_debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
