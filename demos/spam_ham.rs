use category_dictionary::{
    CategoryEntries, Classifier, Dictionary, DictionaryClassifier, FileIndex, Instance,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> category_dictionary::Result<()> {
    init_tracing("info");

    let training = [
        Instance::new(["buy", "cheap", "pills"], "spam"),
        Instance::new(["free", "money", "now"], "spam"),
        Instance::new(["meeting", "notes", "monday"], "ham"),
        Instance::new(["project", "plan", "review"], "ham"),
    ];
    let classifier = DictionaryClassifier::default();
    let mut model = classifier.train(&training)?;
    println!("{model}");

    for document in [vec!["buy", "notes"], vec!["free", "pills", "plan"], vec!["unknown"]] {
        let result = classifier.classify(&document, &model);
        match result.most_likely() {
            Some(best) => println!("{document:?} -> {best} {result}"),
            None => println!("{document:?} -> no known terms"),
        }
    }

    // copy the trained table into a file index under the temp directory
    let directory = std::env::temp_dir().join("category-dictionary-demo");
    let mut file_index = FileIndex::in_directory(&directory, model.name());
    let terms = model.index_into(&mut file_index, true)?;
    tracing::info!(terms, path = %file_index.path().display(), "saved dictionary");

    let mut reloaded = Dictionary::with_index(model.config().clone(), file_index);
    let session = reloaded.open_index()?;
    println!("money -> {}", session.entries("money"));
    session.finish()
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
