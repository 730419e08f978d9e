use std::process::ExitCode;

use nfce_import::{
    config::{app::ImportConfig, db},
    discover_sources,
    store::postgres,
    utils::logging::init_logging,
    BatchReport, DocumentSource, ImportResult, Importer, MemoryStore,
};

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run() {
        Ok(report) => {
            let summary = report.summary();
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("Failed to serialize batch summary: {}", e),
            }
            if summary.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> ImportResult<BatchReport> {
    let config = ImportConfig::from_env()?;
    log::info!("Input directory: {}", config.xml_dir.display());

    let files = discover_sources(&config.xml_dir)?;
    if files.is_empty() {
        log::warn!("No XML files found in '{}'", config.xml_dir.display());
        return Ok(BatchReport::default());
    }
    let sources = files.iter().map(|path| DocumentSource::from_path(path));

    if config.dry_run {
        log::info!("Dry run: loading into an in-memory store, nothing is written to the database");
        let mut importer = Importer::new(MemoryStore::new());
        let report = importer.import_batch(sources);
        let tables = importer.unit_of_work().tables();
        log::info!(
            "Dry run would write {} nfce, {} emitente, {} produto, {} impostos_detalhados, {} pagamento row(s)",
            tables.nfce.len(),
            tables.emitente.len(),
            tables.produto.len(),
            tables.impostos_detalhados.len(),
            tables.pagamento.len()
        );
        return Ok(report);
    }

    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| nfce_import::ImportError::configuration("no database configured"))?;
    if let Some(redacted) = config.redacted_url() {
        log::info!("Connecting to {}", redacted);
    }

    let pool = db::init_db_pool(url, config.pool_size)?;
    let mut importer = Importer::new(pool);
    let report = importer.import_batch(sources);

    if let Some(count) = postgres::stored_document_count(importer.unit_of_work()) {
        log::info!("Store now holds {} NFC-e document(s)", count);
    }

    Ok(report)
}
