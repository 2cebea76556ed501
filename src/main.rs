use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use conserv_stage::request::chain::ChainQuery;
use conserv_stage::request::form::read_form;
use conserv_stage::response::Response;
use conserv_stage::scheduler::SchedulerKind;
use conserv_stage::workspace::allocate::ThreadRandom;
use conserv_stage::{handle, Config, Verdict};

#[derive(Parser)]
#[command(name = "conserv-stage")]
#[command(about = "Stage a PDB chain request and queue a Conserv job", long_about = None)]
struct Cli {
    /// JSON configuration file, built-in defaults if absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the scheduler family from the configuration
    #[arg(long, value_enum, global = true)]
    scheduler: Option<SchedulerKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage a request given on the command line
    Submit {
        /// 4 character PDB ID
        #[arg(long)]
        pdb_id: String,
        /// 1 character chain ID
        #[arg(long)]
        chain: String,
    },

    /// Stage a request from an urlencoded form body on stdin (PDBID, CHAIN)
    Form {
        /// Print a CGI Content-Type header before the body
        #[arg(long)]
        cgi: bool,
    },

    /// Write the default configuration
    GenerateConfig {
        #[arg(short, long, default_value = "conserv.json")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    info!("conserv-stage starting up");

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            println!("Sorry, the job could not be prepared: {err}");
            ExitCode::from(Verdict::Fatal.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(kind) = cli.scheduler {
        config.scheduler.kind = kind;
    }

    let (input, cgi) = match cli.command {
        Commands::GenerateConfig { output } => {
            std::fs::write(&output, config.to_json()?)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote configuration to {}", output.display());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Submit { pdb_id, chain } => (ChainQuery::new(&pdb_id, &chain), false),
        Commands::Form { cgi } => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body).context("Failed to read form body")?;
            (read_form(&body), cgi)
        }
    };

    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let (response, verdict) = runtime.block_on(handle(&config, input, &mut ThreadRandom));

    emit(&response, cgi)?;
    Ok(ExitCode::from(verdict.exit_code()))
}

fn emit(response: &Response, cgi: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if cgi {
        write!(stdout, "Content-Type: {}\r\n\r\n", response.content_type())?;
    }
    stdout.write_all(response.body().as_bytes())?;
    stdout.flush()?;
    Ok(())
}
