// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use ipynb_translator::app_config::{self, Config, TranslationProvider};
use ipynb_translator::app_controller::{CHECK_TIMEOUT_SECS, Controller, NotebookCommand};
use ipynb_translator::ui::{CancellationFlag, ConsoleUi, HostUi, cancel_on_interrupt};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Zhipu,
    Aliyun,
    Volcano,
    Custom,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Zhipu => TranslationProvider::Zhipu,
            CliTranslationProvider::Aliyun => TranslationProvider::Aliyun,
            CliTranslationProvider::Volcano => TranslationProvider::Volcano,
            CliTranslationProvider::Custom => TranslationProvider::Custom,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Notebook input and output paths
#[derive(Args, Debug)]
struct NotebookArgs {
    /// Notebook file to translate
    #[arg(value_name = "NOTEBOOK")]
    notebook: PathBuf,

    /// Write the result here instead of overwriting NOTEBOOK
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Overrides applied on top of the configuration file
#[derive(Args, Debug)]
struct SettingsArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(short = 'k', long, env = "IPYNB_TRANSLATOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Endpoint for the custom provider
    #[arg(long, value_name = "URL")]
    custom_url: Option<String>,

    /// Maximum number of simultaneous requests
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Also translate cells made only of a code block
    #[arg(long)]
    no_skip_code_blocks: bool,

    /// Also translate cells made only of a math formula
    #[arg(long)]
    no_skip_math: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate one Markdown cell and insert the result after it
    TranslateCell {
        #[command(flatten)]
        notebook: NotebookArgs,

        /// Zero-based index of the cell to translate
        #[arg(long, value_name = "INDEX")]
        cell: usize,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Translate every eligible Markdown cell
    TranslateAll {
        #[command(flatten)]
        notebook: NotebookArgs,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Send a sample text to check the provider settings
    Check {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Generate shell completions for ipynbt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ipynbt - translate Jupyter notebook Markdown cells with AI
#[derive(Parser, Debug)]
#[command(name = "ipynbt")]
#[command(version)]
#[command(about = "AI-powered Jupyter notebook Markdown translation tool")]
#[command(long_about = "ipynbt translates the Markdown cells of Jupyter notebooks with AI providers and inserts each translation right after its source cell.

EXAMPLES:
    ipynbt translate-cell lesson.ipynb --cell 3          # Translate one cell in place
    ipynbt translate-all lesson.ipynb                    # Translate all Markdown cells
    ipynbt translate-all -y -o out.ipynb lesson.ipynb    # No prompt, write to out.ipynb
    ipynbt translate-all -p aliyun -m qwen-turbo a.ipynb # Use a specific provider and model
    ipynbt check -p volcano                              # Check provider settings
    ipynbt completions bash > ipynbt.bash                # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key can also be given through the
    IPYNB_TRANSLATOR_API_KEY environment variable.

SUPPORTED PROVIDERS:
    zhipu   - Zhipu BigModel (default model: glm-4-flash)
    aliyun  - Aliyun DashScope, OpenAI-compatible mode
    volcano - Volcano Engine Ark
    custom  - Any OpenAI-compatible endpoint (requires --custom-url)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ipynbt", &mut std::io::stdout());
            Ok(())
        }
        Commands::TranslateCell {
            notebook,
            cell,
            settings,
        } => run_notebook_command(notebook, NotebookCommand::TranslateCell(cell), false, settings).await,
        Commands::TranslateAll {
            notebook,
            yes,
            settings,
        } => run_notebook_command(notebook, NotebookCommand::TranslateAll, yes, settings).await,
        Commands::Check { settings } => run_check(settings).await,
    }
}

/// Load the configuration file and apply command line overrides
fn load_config(options: &SettingsArgs) -> Result<Config> {
    if let Some(log_level) = &options.log_level {
        let level: app_config::LogLevel = log_level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(provider) = &options.provider {
        let provider: TranslationProvider = provider.clone().into();
        config.translation.provider = provider.to_lowercase_string();
    }

    if let Some(model) = &options.model {
        config.translation.model_name = model.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }

    if let Some(custom_url) = &options.custom_url {
        config.translation.custom_api_url = Some(custom_url.clone());
    }

    if let Some(concurrency) = options.concurrency {
        config.batch.concurrency = concurrency;
    }

    if let Some(timeout) = options.timeout {
        config.translation.timeout_secs = Some(timeout);
    }

    if options.no_skip_code_blocks {
        config.batch.skip_code_blocks = false;
    }

    if options.no_skip_math {
        config.batch.skip_math_formulas = false;
    }

    match &options.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.into()),
    }

    Ok(config)
}

/// Stop the running batch on Ctrl-C; a second Ctrl-C quits right away
fn install_ctrl_c_handler(cancellation: CancellationFlag) {
    tokio::spawn(async move {
        if cancel_on_interrupt(tokio::signal::ctrl_c, cancellation).await {
            warn!("Interrupted again, exiting");
            std::process::exit(130);
        }
    });
}

async fn run_notebook_command(
    args: NotebookArgs,
    command: NotebookCommand,
    assume_yes: bool,
    settings: SettingsArgs,
) -> Result<()> {
    let config = load_config(&settings)?;

    let cancellation = CancellationFlag::new();
    if command.is_cancellable() {
        install_ctrl_c_handler(cancellation.clone());
    }
    let ui = ConsoleUi::new(assume_yes, cancellation);

    if let Err(e) = execute(config, &args, command, &ui).await {
        ui.error(&format!("Translation failed: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

async fn execute(config: Config, args: &NotebookArgs, command: NotebookCommand, ui: &ConsoleUi) -> Result<bool> {
    let controller = Controller::with_config(config)?;
    controller
        .run_notebook(&args.notebook, args.output.as_deref(), command, ui)
        .await
}

async fn run_check(settings: SettingsArgs) -> Result<()> {
    let mut config = load_config(&settings)?;
    config.translation.timeout_secs.get_or_insert(CHECK_TIMEOUT_SECS);

    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    match controller.check_provider().await {
        Ok(translation) => {
            info!(
                "✅ {} ({}) is reachable. Sample translation: {}",
                controller.service().provider_name(),
                controller.service().model_name(),
                translation.trim()
            );
            Ok(())
        }
        Err(e) => {
            error!("Provider check failed: {}", e);
            std::process::exit(1);
        }
    }
}
