// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use feature_stream_engine::backends::{
    HttpScoringClient, IngestStats, JsonLinesSource, JsonLinesStore, UnconfiguredLookup,
};
use feature_stream_engine::config::{load_config, validate_loaded_config, LogFormat, LoggingConfig};
use feature_stream_engine::engine::{DetectionService, IngestQueue, MicroBatchScheduler, WorkerPool};
use feature_stream_engine::flow::{FlowFactory, FlowRegistry};
use feature_stream_engine::traits::RelationalLookup;

fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .with_context(|| format!("invalid logging.level '{}'", cfg.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match cfg.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml> [input.jsonl]", args[0]);
        eprintln!("Reads JSON-lines records from the input file, or stdin when omitted.");
        std::process::exit(1);
    }
    let config_path = Path::new(&args[1]);

    let cfg = load_config(config_path)?;
    init_logging(&cfg.logging)?;
    let (cfg, flow_names) = validate_loaded_config(config_path, cfg)?;

    // No database driver ships with the binary; DB_QUERY steps fail per record.
    let lookup: Arc<dyn RelationalLookup> = Arc::new(UnconfiguredLookup);
    let factory = FlowFactory::new(&cfg.engine.config_dir, lookup);
    let registry = Arc::new(FlowRegistry::load(&factory, &flow_names).context("building flows")?);
    let flow = registry.require(&cfg.engine.target_flow)?;

    let scoring = HttpScoringClient::new(
        &cfg.scoring.base_url,
        &cfg.scoring.context_path,
        cfg.scoring.timeout(),
    )?;
    info!(endpoint = scoring.endpoint(), "Scoring client ready");
    let detection = DetectionService::new(
        Arc::new(scoring),
        Arc::new(JsonLinesStore::new(&cfg.store.output_path)),
        cfg.engine.exclusions(),
        cfg.engine.id_field.as_str(),
        cfg.engine.event_name.as_str(),
    );

    let (queue, receiver) =
        IngestQueue::bounded(cfg.scheduler.queue_capacity, cfg.scheduler.enqueue_wait());
    let scheduler = MicroBatchScheduler::new(
        flow,
        WorkerPool::new(cfg.scheduler.workers, cfg.engine.id_field.as_str()),
        Arc::new(detection),
        cfg.scheduler.settings(),
    );

    let cancel = CancellationToken::new();
    let scheduler_task = tokio::spawn(scheduler.run(receiver, cancel.clone()));

    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, finishing the current micro-batch");
            on_signal.cancel();
        }
    });

    let id_field = cfg.engine.id_field.as_str();
    let ingest = async {
        match args.get(2) {
            Some(input) => {
                let source = JsonLinesSource::open(Path::new(input), id_field)
                    .await
                    .with_context(|| format!("opening input '{}'", input))?;
                Ok::<IngestStats, anyhow::Error>(source.pump(&queue).await?)
            }
            None => Ok(JsonLinesSource::stdin(id_field).pump(&queue).await?),
        }
    };

    let ingested = tokio::select! {
        result = ingest => result.map(|_| ()),
        _ = cancel.cancelled() => Ok(()),
    };
    // Closing the queue lets the scheduler drain what is left and stop, even
    // when ingestion failed.
    drop(queue);

    let batches = scheduler_task.await.context("scheduler task failed")?;
    info!(batches, flows = registry.len(), "Feature stream engine stopped");
    ingested.context("ingestion failed")
}
