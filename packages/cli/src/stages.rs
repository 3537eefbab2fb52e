//! Wires each pipeline stage to the real backends and prints its result.

use book_pipeline::{PipelineConfig, extract, inspect, migrate};
use book_pipeline_cli_utils::{IndicatifProgress, MultiProgress};
use book_pipeline_scraper::catalog::CatalogScraper;
use book_pipeline_store::docdb::MongoDocumentStore;
use book_pipeline_store::dynamodb::DynamoTable;

async fn connect_documents(
    config: &PipelineConfig,
) -> Result<MongoDocumentStore, Box<dyn std::error::Error>> {
    let store = MongoDocumentStore::connect(&config.document_db).await?;
    println!("Connected to DocumentDB!");
    Ok(store)
}

async fn connect_table(config: &PipelineConfig) -> DynamoTable {
    let table = DynamoTable::connect(&config.dynamo).await;
    println!("Connected to DynamoDB!");
    table
}

async fn extract_into(
    config: &PipelineConfig,
    documents: &MongoDocumentStore,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let scraper = CatalogScraper::new(&config.catalog.page_url, &config.catalog.base_url);
    let progress = IndicatifProgress::records_bar(multi, "Extracting");

    let stored = extract::run(&scraper, documents, progress).await?;

    println!("Successfully scraped and saved {stored} books into DocumentDB!");
    Ok(())
}

async fn transform_into(
    documents: &MongoDocumentStore,
    table: &DynamoTable,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::records_bar(multi, "Transforming");

    let summary = migrate::run(documents, table, progress).await?;

    for failure in summary.failures() {
        println!("Skipped {failure}");
    }
    println!(
        "Successfully migrated {} of {} books into DynamoDB after transformation!",
        summary.migrated(),
        summary.seen()
    );
    Ok(())
}

/// Scrapes the catalog page into the document store.
///
/// # Errors
///
/// Returns an error if the connection, the scrape or an insert fails.
pub async fn extract(
    config: &PipelineConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = connect_documents(config).await?;
    extract_into(config, &documents, multi).await
}

/// Migrates every stored listing into the key-value store.
///
/// # Errors
///
/// Returns an error if the connection or the scan fails. Individual
/// records that fail are printed and skipped.
pub async fn transform(
    config: &PipelineConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = connect_documents(config).await?;
    let table = connect_table(config).await;
    transform_into(&documents, &table, multi).await
}

/// Prints up to `limit` raw listings, one JSON object per line.
///
/// # Errors
///
/// Returns an error if the connection or the read fails.
pub async fn inspect(config: &PipelineConfig, limit: u32) -> Result<(), Box<dyn std::error::Error>> {
    let documents = connect_documents(config).await?;

    for listing in inspect::sample(&documents, limit).await? {
        println!("{}", inspect::render(&listing)?);
    }

    println!("Data extracted successfully!");
    Ok(())
}

/// Runs extract then transform over one document store connection.
///
/// # Errors
///
/// Returns an error if either stage aborts.
pub async fn run_all(
    config: &PipelineConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = connect_documents(config).await?;
    extract_into(config, &documents, multi).await?;

    let table = connect_table(config).await;
    transform_into(&documents, &table, multi).await
}
