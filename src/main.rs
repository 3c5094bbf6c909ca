use anyhow::{Context, Result, anyhow, bail};
use automate::{
    Catalog, CompiledScript, Engine, EngineConfig, LogEffector, RunOutcome, Settings, Tokenizer,
    compile_file, compile_str,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "automate",
    about = "Compile and run keyboard/mouse macro scripts",
    version
)]
struct Args {
    /// Log every executed instruction
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run a script file (effects are logged, not sent to the OS)
    Run {
        /// Path to the script file
        script: PathBuf,

        /// Delay between lines in milliseconds
        #[arg(short, long, default_value_t = 0)]
        line_delay: u64,

        /// Delay before the first line in milliseconds
        #[arg(short, long, default_value_t = 0)]
        start_delay: u64,
    },

    /// Run a script saved in a settings file
    RunSaved {
        /// Name of the saved script
        name: String,

        /// Path to the settings file
        #[arg(long, default_value = "settings.json")]
        settings: PathBuf,
    },

    /// Compile a script without running it
    Check {
        /// Path to the script file
        script: PathBuf,
    },

    /// Print the classified tokens of a script
    Tokens {
        /// Path to the script file
        script: PathBuf,
    },

    /// List the available commands
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Cmd::Run {
            script,
            line_delay,
            start_delay,
        } => {
            let compiled = compile_file(&script)
                .with_context(|| format!("Failed to compile script: {}", script.display()))?;
            let config = EngineConfig {
                start_delay: Duration::from_millis(start_delay),
            };
            run(compiled, config, Duration::from_millis(line_delay)).await
        }
        Cmd::RunSaved { name, settings } => {
            let settings = Settings::load(&settings)?;
            let info = settings
                .find_script(&name)
                .ok_or_else(|| anyhow!("No saved script named '{name}'"))?;
            let compiled = compile_str(&info.script)
                .with_context(|| format!("Failed to compile saved script '{}'", info.name))?;
            run(compiled, settings.engine_config(), info.line_delay()).await
        }
        Cmd::Check { script } => {
            let compiled = compile_file(&script)
                .with_context(|| format!("Failed to compile script: {}", script.display()))?;
            println!(
                "{}: ok ({} instructions, {} lines)",
                script.display(),
                compiled.len(),
                compiled.line_count()
            );
            Ok(())
        }
        Cmd::Tokens { script } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script file: {}", script.display()))?;
            let tokenizer = Tokenizer::builtin();
            for token in tokenizer.tokenize(&text) {
                println!("{:>6}  {:<10?} {}", token.position, token.kind, token.text);
            }
            Ok(())
        }
        Cmd::Commands => {
            for descriptor in Catalog::builtin().iter() {
                println!("{:<14} {}", descriptor.name, descriptor.usage);
            }
            Ok(())
        }
    }
}

async fn run(script: CompiledScript, config: EngineConfig, line_delay: Duration) -> Result<()> {
    let engine = Engine::with_config(Arc::new(LogEffector), config);
    let Some(handle) = engine.start(script, line_delay) else {
        bail!("Engine refused to start");
    };

    let stopper = engine.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            stopper.stop();
        }
    });

    match handle.wait().await {
        RunOutcome::Failed(err) => Err(err).context("Failed to execute script"),
        RunOutcome::Completed | RunOutcome::Stopped => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "automate=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
