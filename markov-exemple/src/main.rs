use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;

use markov_core::io::read_lines;
use markov_core::{Generator, KeyOrder, Order, TokenizerConfig, TransitionTable};

#[derive(Parser, Debug)]
#[command(name = "markov-exemple")]
#[command(about = "Train (or load) a Markov model and generate text from prompts", long_about = None)]
struct Cli {
	/// Model file, loaded if it exists, written after training otherwise
	#[arg(short, long, default_value = "markov_model.json")]
	model: PathBuf,

	/// Plain text corpus, one message per line
	#[arg(short, long, default_value = "corpus.txt")]
	corpus: PathBuf,

	/// Context order (1 or 2)
	#[arg(short, long, default_value_t = 1)]
	order: u8,

	/// Maximum number of tokens per answer
	#[arg(long, default_value_t = 1000)]
	max_tokens: usize,

	/// Fixed seed for reproducible output
	#[arg(long)]
	seed: Option<u64>,

	/// Write the model with sorted keys
	#[arg(long)]
	sorted: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let cli = Cli::parse();
	let order = Order::try_from(cli.order)?;

	// Load the model if it was already trained, otherwise build it from the corpus
	let table = if cli.model.exists() {
		markov_core::load(&cli.model)?
	} else {
		let mut table = TransitionTable::new();
		// Messages keep their punctuation
		let config = TokenizerConfig::default().with_skip("");
		let lines = read_lines(&cli.corpus)?;
		for line in &lines {
			table.train_text(line, &config, order);
		}
		info!("trained on {} messages", lines.len());

		let key_order = if cli.sorted { KeyOrder::Sorted } else { KeyOrder::Insertion };
		markov_core::save(&table, &cli.model, key_order)?;
		table
	};

	match cli.seed {
		Some(seed) => prompt_loop(&table, Generator::seeded(seed), cli.max_tokens, order),
		None => prompt_loop(&table, Generator::from_entropy(), cli.max_tokens, order),
	}
}

/// Reads prompts from stdin until EOF and prints one generation per prompt.
fn prompt_loop<R: rand::Rng>(
	table: &TransitionTable,
	mut generator: Generator<R>,
	max_tokens: usize,
	order: Order,
) -> Result<(), Box<dyn std::error::Error>> {
	let stdin = io::stdin();
	let mut stdout = io::stdout();

	loop {
		print!("Enter a prompt: (can be empty): ");
		stdout.flush()?;

		let mut prompt = String::new();
		if stdin.lock().read_line(&mut prompt)? == 0 {
			break;
		}

		let output = generator.generate(table, prompt.trim_end_matches(['\r', '\n']), max_tokens, order)?;
		println!("{}\n\n", output.join(" "));
	}

	Ok(())
}
