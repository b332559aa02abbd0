use anyhow::Result;
use std::env;

use crate::cli::commands::LlmArgs;
use crate::llm::LlmConfig;

pub fn handle_config_command(args: LlmArgs) -> Result<()> {
    // Load .env file if it exists
    let env_file_loaded = dotenv::dotenv().is_ok();
    let config = LlmConfig::from_env().with_overrides(args.into());

    println!("🔧 ResumePilot Configuration");
    println!("═══════════════════════════════════════");
    println!();

    println!("📦 Version Information:");
    println!("  • ResumePilot: v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("🌍 Environment Configuration:");
    if env_file_loaded {
        println!("  • .env file: ✅ Loaded");
    } else {
        println!("  • .env file: ⚠️  Not found (using system environment)");
    }
    for var in ["LLM_API_URL", "LLM_MODEL", "LLM_TEMPERATURE", "LLM_MAX_TOKENS", "LLM_DEBUG"] {
        match env::var(var) {
            Ok(val) => println!("  • {}: {}", var, val),
            Err(_) => println!("  • {}: not set (default)", var),
        }
    }
    match env::var("RUST_LOG") {
        Ok(val) => println!("  • RUST_LOG: {}", val),
        Err(_) => println!("  • RUST_LOG: warn (default)"),
    }
    println!();

    println!("🤖 Effective LLM Settings:");
    println!("  • Endpoint: {}", config.api_url);
    println!("  • Model: {}", config.model);
    println!("  • Temperature: {}", config.temperature);
    println!("  • Max Tokens: {}", config.max_tokens);
    println!("  • Streaming: disabled");
    match config.validate() {
        Ok(()) => println!("  • Status: ✅ Valid"),
        Err(e) => println!("  • Status: ❌ {}", e),
    }

    println!();
    println!("💡 Tips:");
    println!("  • Start LM Studio's local server before running `resumepilot analyze`");
    println!("  • Use RUST_LOG=debug or --verbose for detailed logging");

    Ok(())
}
