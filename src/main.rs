use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use kube::runtime::controller::Controller;
use kube::runtime::watcher::Config;
use kube::{Api, Client, CustomResourceExt};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use worker_fleet_operator::core::config::{compose_config, OperatorConfig};
use worker_fleet_operator::model::context::ContextData;
use worker_fleet_operator::model::spec::WorkerFleet;
use worker_fleet_operator::policy::error::error_policy;
use worker_fleet_operator::policy::reconciliation::{reconcile, RECONCILE_DURATION_METRIC_NAME};

use crate::args::{Commands, OperatorArgs};

mod args;

fn setup_metrics_recorder(config: &OperatorConfig) -> anyhow::Result<()> {
    const RECONCILE_SECONDS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

    let Some(address) = config.metrics_address else {
        log::debug!("Metrics exporter disabled");
        return Ok(());
    };

    PrometheusBuilder::new()
        .with_http_listener(address)
        .set_buckets_for_metric(
            Matcher::Full(String::from(RECONCILE_DURATION_METRIC_NAME)),
            RECONCILE_SECONDS,
        )?
        .install()
        .context("Error installing prometheus exporter")?;

    log::info!("Serving metrics on {address}");
    Ok(())
}

async fn run(config: OperatorConfig) -> anyhow::Result<()> {
    setup_metrics_recorder(&config)?;

    let kubernetes_client = Client::try_default().await
        .context("Error building kubernetes client")?;

    let fleets_api = match &config.namespace {
        Some(namespace) => Api::<WorkerFleet>::namespaced(kubernetes_client.clone(), namespace),
        None => Api::<WorkerFleet>::all(kubernetes_client.clone()),
    };

    let context = Arc::new(ContextData::from_client(kubernetes_client, &config));

    log::info!(
        "Starting WorkerFleet controller - namespace: {}, resync every {:?}",
        config.namespace.as_deref().unwrap_or("*"), config.resync_interval(),
    );

    Controller::new(fleets_api, Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok((fleet, action)) => log::debug!("Reconciled {fleet:?} - {action:?}"),
                Err(reconciliation_err) => log::warn!("Reconciliation error: {reconciliation_err:?}"),
            }
        })
        .await;

    log::info!("WorkerFleet controller stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = OperatorArgs::parse();

    match args.subcommand.unwrap_or(Commands::Run) {
        Commands::Crd => {
            print!("{}", serde_yaml::to_string(&WorkerFleet::crd())?);
            Ok(())
        }
        Commands::Run => {
            let config: OperatorConfig = compose_config(&args.config, "WFO")
                .context("Error loading configuration")?;
            run(config).await
        }
    }
}
