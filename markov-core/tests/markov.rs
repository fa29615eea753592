use markov_core::persistence::{load_snapshot, save_snapshot};
use markov_core::{generate, load, save, Generator, KeyOrder, MarkovError, Order, TokenizerConfig, TransitionTable};

const CORPUS: &str = "The cat sat on the mat. The dog sat on the log!\n\
	A cat and a dog; the cat (again) sat.";

fn trained(order: Order) -> TransitionTable {
	let mut table = TransitionTable::new();
	table.train_text(CORPUS, &TokenizerConfig::default(), order);
	table
}

#[test]
fn text_to_generation_to_disk_and_back() {
	let dir = tempfile::tempdir().unwrap();
	let table = trained(Order::First);

	let before = generate(&table, "the", 30, Order::First, Some(11)).unwrap();

	let path = dir.path().join("markov_model.json");
	save(&table, &path, KeyOrder::Insertion).unwrap();
	let reloaded = load(&path).unwrap();

	let after = generate(&reloaded, "the", 30, Order::First, Some(11)).unwrap();
	assert_eq!(before, after);
}

#[test]
fn sorted_and_insertion_files_hold_the_same_weights() {
	let dir = tempfile::tempdir().unwrap();
	let table = trained(Order::Second);

	let insertion = dir.path().join("insertion.json");
	let sorted = dir.path().join("sorted.json");
	save(&table, &insertion, KeyOrder::Insertion).unwrap();
	save(&table, &sorted, KeyOrder::Sorted).unwrap();

	let from_insertion = load(&insertion).unwrap();
	let from_sorted = load(&sorted).unwrap();
	assert_eq!(from_insertion, table);
	assert_eq!(from_sorted, table);
	assert_eq!(from_sorted.total_transitions(), table.total_transitions());
}

#[test]
fn snapshot_preserves_generation() {
	let dir = tempfile::tempdir().unwrap();
	let table = trained(Order::Second);
	let path = dir.path().join("model.bin");
	save_snapshot(&table, &path).unwrap();
	let reloaded = load_snapshot(&path).unwrap();

	assert_eq!(
		generate(&table, "the cat", 25, Order::Second, Some(5)).unwrap(),
		generate(&reloaded, "the cat", 25, Order::Second, Some(5)).unwrap()
	);
}

#[test]
fn second_order_generation_only_uses_seen_trigrams() {
	let table = trained(Order::Second);
	let mut generator = Generator::seeded(99);

	for _ in 0..200 {
		let output = generator.generate(&table, "the cat", 40, Order::Second).unwrap();
		assert!(output.len() <= 40);
		for triple in output.windows(3) {
			let key = format!("{} {}", triple[0], triple[1]);
			assert!(table.weight(&key, &triple[2]).is_some(), "{triple:?}");
		}
	}
}

#[test]
fn different_seeds_can_diverge() {
	let table = trained(Order::First);
	let outputs: std::collections::HashSet<Vec<String>> = (0..20)
		.map(|seed| generate(&table, "the", 30, Order::First, Some(seed)).unwrap())
		.collect();
	assert!(outputs.len() > 1);
}

#[test]
fn pre_tokenized_and_raw_text_training_agree() {
	let config = TokenizerConfig::default();
	let mut from_text = TransitionTable::new();
	from_text.train_text(CORPUS, &config, Order::Second);

	let mut from_tokens = TransitionTable::new();
	from_tokens.train_tokens(&config.tokenize(CORPUS), Order::Second);

	assert_eq!(from_text, from_tokens);
}

#[test]
fn flat_document_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("flat.json");
	std::fs::write(&path, r#"{"the": 4}"#).unwrap();

	let mut table = trained(Order::First);
	let before = table.clone();
	assert!(matches!(table.load_from(&path), Err(MarkovError::Format(_))));
	assert_eq!(table, before);
}

#[test]
fn random_context_is_a_known_key() {
	let table = trained(Order::First);
	let mut rng = rand::rng();
	let context = table.random_context(&mut rng).unwrap();
	assert!(table.contains_context(context));
}
