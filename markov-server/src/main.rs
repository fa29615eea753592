use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use markov_core::{Generator, KeyOrder, MarkovError, Order, TokenizerConfig, TransitionTable};

/// Command-line configuration for the HTTP service
#[derive(Parser, Debug)]
#[command(name = "markov-server")]
#[command(about = "Serve a Markov chain text model over HTTP", long_about = None)]
struct Cli {
	/// Model file used by /v1/save and /v1/load (JSON document)
	#[arg(short, long, default_value = "./markov_model.json")]
	model: PathBuf,

	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	bind: String,

	/// Port to bind
	#[arg(short, long, default_value_t = 5000)]
	port: u16,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	start: Option<String>,
	max_tokens: Option<usize>,
	order: Option<u8>,
	seed: Option<u64>,
}

#[derive(Deserialize)]
struct TrainParams {
	order: Option<u8>,
}

#[derive(Deserialize)]
struct SaveParams {
	sorted: Option<bool>,
}

#[derive(Serialize)]
struct Stats {
	contexts: usize,
	transitions: u128,
}

/// Everything behind the lock: training and loading mutate the table,
/// so every handler goes through the same `Mutex`.
struct SharedData {
	table: TransitionTable,
	model_path: PathBuf,
}

fn parse_order(order: Option<u8>) -> Result<Order, MarkovError> {
	order.map_or(Ok(Order::default()), Order::try_from)
}

/// Maps a core error to a response.
fn error_response(e: MarkovError) -> HttpResponse {
	match e {
		MarkovError::NotFound { .. } => HttpResponse::NotFound().body(e.to_string()),
		MarkovError::Io(_) => HttpResponse::InternalServerError().body(e.to_string()),
		_ => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// GET /v1/generate
///
/// Generates a sequence from the shared table. Without `start`, a random
/// context key is used; with `seed`, the output is reproducible.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let max_tokens = query.max_tokens.unwrap_or(100);
	let order = match parse_order(query.order) {
		Ok(o) => o,
		Err(e) => return error_response(e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let result = match query.seed {
		Some(seed) => run_generation(&shared_data.table, Generator::seeded(seed), query.start.as_deref(), max_tokens, order),
		None => run_generation(&shared_data.table, Generator::from_entropy(), query.start.as_deref(), max_tokens, order),
	};

	match result {
		Ok(tokens) => HttpResponse::Ok().body(tokens.join(" ")),
		Err(e) => error_response(e),
	}
}

fn run_generation<R: Rng>(
	table: &TransitionTable,
	mut generator: Generator<R>,
	start: Option<&str>,
	max_tokens: usize,
	order: Order,
) -> Result<Vec<String>, MarkovError> {
	let start = match start {
		Some(s) => s.to_owned(),
		None => table.random_context(generator.rng_mut()).unwrap_or_default().to_owned(),
	};
	generator.generate(table, &start, max_tokens, order)
}

/// PUT /v1/train
///
/// Trains the shared table from the raw text body.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainParams>, body: String) -> impl Responder {
	let order = match parse_order(query.order) {
		Ok(o) => o,
		Err(e) => return error_response(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	shared_data.table.train_text(&body, &TokenizerConfig::default(), order);
	HttpResponse::Ok().body(shared_data.table.len().to_string())
}

#[put("/v1/save")]
async fn put_save(data: web::Data<Mutex<SharedData>>, query: web::Query<SaveParams>) -> impl Responder {
	let key_order = if query.sorted.unwrap_or(false) { KeyOrder::Sorted } else { KeyOrder::Insertion };

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.table.save_to(&shared_data.model_path, key_order) {
		Ok(()) => HttpResponse::Ok().body("Model saved successfully"),
		Err(e) => error_response(e),
	}
}

#[put("/v1/load")]
async fn put_load(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let path = shared_data.model_path.clone();
	match shared_data.table.load_from(&path) {
		Ok(()) => HttpResponse::Ok().body("Model loaded successfully"),
		Err(e) => error_response(e),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().json(Stats {
		contexts: shared_data.table.len(),
		transitions: shared_data.table.total_transitions(),
	})
}

/// Loads the startup model.
///
/// A missing file starts an empty table; any other failure is returned so the
/// server never overwrites a file it could not read.
fn initial_table(path: &Path) -> Result<TransitionTable, MarkovError> {
	match markov_core::load(path) {
		Err(MarkovError::NotFound { .. }) => {
			info!("no model at {}, starting empty", path.display());
			Ok(TransitionTable::new())
		}
		other => other,
	}
}

/// Main entry point for the server.
///
/// Loads the model file if present (an empty table otherwise, exiting on a
/// malformed file), wraps it in a `Mutex` and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();
	let cli = Cli::parse();

	let table = initial_table(&cli.model)
		.map_err(|e| std::io::Error::other(format!("cannot load model {}: {}", cli.model.display(), e)))?;

	let shared_data = SharedData { table, model_path: cli.model };
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("listening on {}:{}", cli.bind, cli.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(put_train)
			.service(put_save)
			.service(put_load)
			.service(get_stats)
	})
		.bind((cli.bind.as_str(), cli.port))?
		.run()
		.await
}
