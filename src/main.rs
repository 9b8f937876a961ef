use std::env;
use std::path::PathBuf;

use product_matcher::domain::product::ProductListing;
use product_matcher::models::config::MatcherSettings;
use product_matcher::processing::comparison::compare_catalogs;
use product_matcher::processing::embedding::FastEmbedder;
use product_matcher::processing::matcher::ProductMatcher;

fn read_listings(path: &str) -> Result<Vec<ProductListing>, String> {
    let raw =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse {path}: {e}"))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = env::args().skip(1).collect();
    let [targets_path, candidates_path] = args.as_slice() else {
        log::error!("Usage: product-matcher <catalog-b.json> <catalog-a.json>");
        std::process::exit(1);
    };

    let config_path = env::var("MATCHER_CONFIG_FILE").ok().map(PathBuf::from);
    let settings = match MatcherSettings::load(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    let (config, model) = match (settings.matcher_config(), settings.model_choice()) {
        (Ok(config), Ok(model)) => (config, model),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let listings = (read_listings(targets_path), read_listings(candidates_path));
    let (targets, candidates) = match listings {
        (Ok(targets), Ok(candidates)) => (targets, candidates),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let embedder = FastEmbedder::process_wide(model, settings.show_download_progress);
    let matcher = ProductMatcher::new(embedder, config);

    let report = compare_catalogs(&matcher, &targets, &candidates).await;
    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize report: {e}");
            std::process::exit(1);
        }
    }
}
