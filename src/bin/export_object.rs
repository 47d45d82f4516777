use anyhow::{bail, Context, Result};
use object_viewer::api::ObjectId;
use object_viewer::config::Config;
use object_viewer::export::{export_page, write_pdf, ExportOptions};
use object_viewer::i18n::{Language, TranslationMetrics};
use object_viewer::loader::DetailLoader;
use object_viewer::translation::TextField;
use std::sync::Arc;
use tracing::{info, warn};

const USAGE: &str = "Usage: export-object <object-id> [language-code] [output-path]";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("export_object=info".parse()?)
                .add_directive("object_viewer=info".parse()?),
        )
        .init();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(id) = args.first() else {
        bail!(USAGE);
    };

    let config = Config::from_env()?;
    let language = match args.get(1) {
        Some(code) => Language::from_code(code)?,
        None => config.default_language,
    };
    let output_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| config.pdf_output_path.clone());

    info!("Exporting object {} in {}", id, language.name());

    let client = config.http_client()?;
    let loader = DetailLoader::new(client, Arc::new(config));
    let page = loader.load_page(ObjectId::from(id.as_str()), language).await;

    let Some(object) = page.object() else {
        bail!("Object {} could not be loaded; see the log for details", id);
    };
    for field in TextField::ALL {
        match object.outcome(field).fallback_reason() {
            None => info!("  {}: translated", field.as_str()),
            Some(reason) => warn!("  {}: kept original ({:?})", field.as_str(), reason),
        }
    }

    let bytes = export_page(
        &page,
        loader.client(),
        &loader.config().api_base_url,
        &ExportOptions::default(),
    )
    .await
    .context("Failed to export PDF")?;
    write_pdf(&output_path, &bytes).context("Failed to save PDF")?;

    let metrics = TranslationMetrics::global().report();
    info!(
        "✓ Exported {} to {} ({} translated, {} fallbacks)",
        id, output_path, metrics.translated, metrics.fallbacks
    );

    Ok(())
}
