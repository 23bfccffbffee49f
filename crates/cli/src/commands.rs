//! Subcommand implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde_json::{Value, json};

use cardkit_auth::{AccessContext, AccessEvaluator, AccessWatcher, Role};
use cardkit_core::{EntityId, USER_MAP_ENDPOINT_KEY};
use cardkit_datefmt as datefmt;
use cardkit_http::{GetResource, QueryParams, ResourceSnapshot};
use cardkit_lookup::{FieldSink, LookupConfig, LookupController};

use crate::settings::CliSettings;

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve `query` the way the lookup widget would and print the outcome.
pub async fn lookup(settings: &CliSettings, query: &str, entity: Option<String>) -> Result<()> {
    settings.config.require_endpoint(USER_MAP_ENDPOINT_KEY)?;

    let sink = FieldSink::new(
        |entity, value| tracing::info!(entity = ?entity.map(EntityId::as_str), value, "set user id"),
        |entity, value| tracing::info!(entity = ?entity.map(EntityId::as_str), value, "set first name"),
        |entity, value| tracing::info!(entity = ?entity.map(EntityId::as_str), value, "set last name"),
    );
    let config = LookupConfig::new(settings.card.clone(), &settings.config);
    let controller = LookupController::new(config, settings.transport(), Arc::new(sink));

    controller.set_entity(entity.map(EntityId::new));
    controller.update_query(query);
    controller.wait_idle().await;

    print_json(&json!({
        "query": controller.query(),
        "view": controller.view(),
        "matches": controller.result().len(),
        "identity": controller.identity(),
    }))
}

/// Check page access for the configured (or overridden) roles.
pub async fn access(settings: &CliSettings, page: &str, roles: Option<String>) -> Result<()> {
    let roles = match roles {
        Some(list) => Role::parse_list(&list),
        None => settings.roles.clone(),
    };

    let watcher = AccessWatcher::new(AccessEvaluator::new(settings.transport(), &settings.config));
    watcher.set_context(AccessContext::new(settings.card.clone(), page, roles));
    let decision = watcher.settled().await;

    print_json(&json!({
        "page": page,
        "state": decision.state(),
        "denial": decision.denial(),
        "error": decision.access_error().map(ToString::to_string),
    }))?;

    if decision.access_is_invalid() {
        bail!("access to page {page} denied");
    }
    Ok(())
}

fn snapshot_json(snapshot: &ResourceSnapshot<Value>) -> Value {
    json!({
        "data": snapshot.data,
        "error": snapshot.data_error,
        "isLoading": snapshot.is_loading,
        "isRefreshing": snapshot.is_refreshing,
    })
}

/// GET an endpoint, optionally re-polling it.
pub async fn get(
    settings: &CliSettings,
    endpoint: &str,
    params: Vec<(String, String)>,
    interval: Option<Duration>,
    polls: u32,
) -> Result<()> {
    let endpoint = settings.resolve_endpoint(endpoint)?;
    let query = params
        .into_iter()
        .fold(QueryParams::new(), |q, (k, v)| q.with(k, v))
        .encode();

    let resource: GetResource<Value> =
        GetResource::new(Some(settings.transport()), Some(endpoint), query, true);
    resource.load().await;
    print_json(&snapshot_json(&resource.snapshot()))?;

    let Some(interval) = interval else {
        return Ok(());
    };

    let poller = resource.spawn_polling(interval);
    for _ in 0..polls {
        tokio::time::sleep(interval).await;
        print_json(&snapshot_json(&resource.snapshot()))?;
    }
    resource.unmount();
    poller.await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DateStyle {
    #[default]
    Mmddyyyy,
    MonthYyyy,
    MonthDdyyyy,
    MonthDyyyy,
    MmddyyyyHhmiam,
    MonthDdyyyyHhmiam,
    MonthDyyyyHmiam,
    /// Input is epoch seconds, rendered in Pacific time.
    EpochLa,
    Api,
}

pub fn format_date(input: &str, style: DateStyle) -> Result<String> {
    let out = match style {
        DateStyle::Mmddyyyy => datefmt::format_date_mmddyyyy(input),
        DateStyle::MonthYyyy => datefmt::format_date_month_yyyy(input),
        DateStyle::MonthDdyyyy => datefmt::format_date_month_ddyyyy(input),
        DateStyle::MonthDyyyy => datefmt::format_date_month_dyyyy(input),
        DateStyle::MmddyyyyHhmiam => datefmt::format_datetime_mmddyyyy_hhmiam(input),
        DateStyle::MonthDdyyyyHhmiam => datefmt::format_datetime_month_ddyyyy_hhmiam(input),
        DateStyle::MonthDyyyyHmiam => datefmt::format_datetime_month_dyyyy_hmiam(input),
        DateStyle::EpochLa => {
            let secs: i64 = input.trim().parse()?;
            datefmt::format_epoch_seconds_to_la_mmddyyyy_hhmiam(secs)
        }
        DateStyle::Api => datefmt::to_api_date_format(input),
    };
    if out.is_empty() {
        bail!("unable to format {input:?}");
    }
    Ok(out)
}

/// `key=value` query parameter.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_owned(), v.to_owned())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}
