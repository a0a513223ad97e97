use mongodb::Client;

use notifylog_setup::{
    config, report,
    schema::COLLECTIONS,
    services::{
        db_init::{self, ApplyOptions},
        mongo_store::{self, MongoStore},
    },
    Result,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!("schema setup failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = config::load()?;

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .map_err(mongo_store::classify)?;
    let store = MongoStore::new(client.database(&settings.mongodb_db));

    tracing::info!("setting up database {}", settings.mongodb_db);

    let opts = ApplyOptions {
        dry_run: settings.dry_run,
    };
    let summary = db_init::ensure_schema(&store, COLLECTIONS, opts).await?;

    tracing::info!("verifying collections and indexes");
    let report = report::collect(
        &store,
        &settings.mongodb_db,
        COLLECTIONS,
        summary,
        settings.dry_run,
    )
    .await?;

    println!("{}", report.render(settings.report_format)?);

    Ok(())
}
