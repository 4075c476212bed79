//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// EssayLens - LLM-powered essay feedback
///
/// Grammar, structure, content and spelling feedback plus an overall
/// score, using a local Ollama model. Markdown/JSON reports or an HTTP API.
///
/// Examples:
///   essaylens "My essay text..."
///   essaylens --file essay.txt --format json --output report.json
///   cat essay.txt | essaylens --profile pillars
///   essaylens --file essay.txt --profile heuristic
///   essaylens --file essay.txt --profile simple
///   essaylens --serve --port 8000
///   essaylens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Essay text to analyze
    ///
    /// If neither TEXT nor --file is given, the essay is read from stdin.
    #[arg(value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the essay from a file
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Analysis profile
    #[arg(long, default_value = "coordinator", value_name = "PROFILE")]
    pub profile: Profile,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Requester id recorded with the analysis session
    #[arg(short, long, value_name = "ID")]
    pub user: Option<String>,

    /// Ollama model to use for analysis
    ///
    /// Can also be set via ESSAYLENS_MODEL env var or .essaylens.toml config.
    #[arg(short, long, env = "ESSAYLENS_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint URL
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Temperature for LLM responses (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Upper bound on one analysis, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Run the grammar, structure and content roles one after another
    #[arg(long)]
    pub sequential_roles: bool,

    /// Do not check that the model is installed before analyzing
    #[arg(long)]
    pub skip_model_check: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .essaylens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serve the HTTP API instead of analyzing one essay
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub serve: bool,

    /// Address to bind the HTTP API to
    #[arg(long, requires = "serve")]
    pub host: Option<String>,

    /// Port for the HTTP API
    #[arg(long, requires = "serve")]
    pub port: Option<u16>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .essaylens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Which analysis to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Profile {
    /// Grammar, structure, content and spelling feedback via the analyzer roles (default)
    #[default]
    Coordinator,
    /// Four scored pillars via a single engine call
    Pillars,
    /// Four scored pillars from text statistics, no engine call
    Heuristic,
    /// One overall score from length and paragraphing, no engine call
    Simple,
}

impl Profile {
    /// Whether this profile talks to the engine.
    pub fn uses_engine(&self) -> bool {
        !matches!(self, Profile::Heuristic | Profile::Simple)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Coordinator => "coordinator",
            Profile::Pillars => "pillars",
            Profile::Heuristic => "heuristic",
            Profile::Simple => "simple",
        }
    }
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 1.0".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref path) = self.file {
            if !path.is_file() {
                return Err(format!("Essay file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["essaylens"];
        argv.extend_from_slice(args);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["An essay."]);
        assert_eq!(args.text.as_deref(), Some("An essay."));
        assert_eq!(args.profile, Profile::Coordinator);
        assert_eq!(args.format, OutputFormat::Markdown);
        assert!(!args.serve);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_profiles() {
        assert_eq!(parse(&["--profile", "pillars", "x"]).profile, Profile::Pillars);
        assert_eq!(parse(&["--profile", "heuristic", "x"]).profile, Profile::Heuristic);
        assert_eq!(parse(&["--profile", "simple", "x"]).profile, Profile::Simple);
        assert!(!Profile::Heuristic.uses_engine());
        assert!(!Profile::Simple.uses_engine());
        assert!(Profile::Pillars.uses_engine());
    }

    #[test]
    fn test_serve_conflicts_with_text() {
        assert!(Args::try_parse_from(["essaylens", "--serve", "text"]).is_err());
        assert!(Args::try_parse_from(["essaylens", "--port", "80"]).is_err());
        assert!(Args::try_parse_from(["essaylens", "--serve", "--port", "80"]).is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = parse(&["x"]);
        args.ollama_url = Some("localhost:11434".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_temperature() {
        let mut args = parse(&["x"]);
        args.temperature = Some(1.5);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_file() {
        let args = parse(&["--file", "/definitely/not/here.txt"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = parse(&["x"]);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["x"]);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
