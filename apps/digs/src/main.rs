mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	version = digs_cli::VERSION,
	styles = digs_cli::styles(),
	about = "Hybrid lexical and semantic retrieval over structured rental listings."
)]
struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	config: PathBuf,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Extract structured records from a JSON array of raw listing posts.
	Extract {
		#[arg(long, value_name = "FILE")]
		input: PathBuf,
		#[arg(long, value_name = "FILE")]
		output: PathBuf,
	},
	/// Rebuild the lexical index and the vector collection from extracted
	/// records.
	Ingest {
		#[arg(long, value_name = "FILE")]
		input: PathBuf,
	},
	/// Run a hybrid search for a free-text housing request.
	Search {
		query: String,
		#[arg(long)]
		top_k: Option<u32>,
		#[arg(long)]
		alpha: Option<f32>,
	},
	/// Answer a free-text housing request from the corpus, streaming the
	/// reply.
	Ask {
		question: String,
		#[arg(long, value_name = "FILE", default_value = "prompts/rag_prompt.txt")]
		prompt: PathBuf,
		#[arg(long)]
		top_k: Option<u32>,
		#[arg(long)]
		alpha: Option<f32>,
	},
	/// List the models installed on the inference backend.
	Models,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	let cfg = digs_config::load(&args.config)?;

	tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&cfg.app.log_level)).init();

	match args.command {
		Command::Extract { input, output } => commands::extract(&cfg, &input, &output).await,
		Command::Ingest { input } => commands::ingest(cfg, &input).await,
		Command::Search { query, top_k, alpha } =>
			commands::search(cfg, &query, top_k, alpha).await,
		Command::Ask { question, prompt, top_k, alpha } =>
			commands::ask(cfg, &question, &prompt, top_k, alpha).await,
		Command::Models => commands::models(&cfg).await,
	}
}
