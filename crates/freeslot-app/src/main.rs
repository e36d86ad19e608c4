use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use freeslot_core::config::load_config;
use freeslot_ical::EventMap;
use freeslot_sched::day::resolve_selected_day;
use freeslot_sched::{Block, DayEntry, MaterializeOptions, Topic, compute_schedule};
use freeslot_source::{CalendarFeed, GateState, fetch_calendar, gate};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// What the booking UI consumes, serialized to stdout as JSON.
#[derive(Debug, Serialize)]
struct ScheduleOutput {
    display_name: String,
    selected_day: Option<NaiveDate>,
    blocks: Vec<Block>,
    days: Vec<DayEntry>,
    enabled_days: Vec<DayEntry>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting freeslot availability computation");

    let settings = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(settings.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %settings.logging.level, "Invalid log level in config, keeping info");
    }

    let tz = settings.schedule.tz()?;

    // Topic names on the command line narrow the displayed blocks.
    let mut topics = BTreeSet::new();
    for arg in std::env::args().skip(1) {
        topics.insert(arg.parse::<Topic>()?);
    }

    let client = reqwest::Client::new();
    let primary_result = fetch_calendar(&client, &settings.calendar.primary_url);
    let plan_results = futures::future::join_all(
        settings
            .calendar
            .plan_urls
            .iter()
            .map(|url| fetch_calendar(&client, url)),
    );
    let (primary_result, plan_results) = tokio::join!(primary_result, plan_results);

    let primary = CalendarFeed::from_result(primary_result);
    let plans: Vec<CalendarFeed> = plan_results
        .into_iter()
        .map(CalendarFeed::from_result)
        .collect();

    match gate(&primary, &plans) {
        GateState::Ready { primary, plans } => {
            let plan_maps: Vec<EventMap> = plans.into_iter().cloned().collect();
            let schedule = compute_schedule(
                primary,
                &plan_maps,
                &topics,
                Utc::now(),
                tz,
                settings.schedule.weeks,
                &MaterializeOptions::default(),
            );
            let output = ScheduleOutput {
                display_name: settings.calendar.display_name,
                selected_day: resolve_selected_day(None, &schedule.enabled_days),
                blocks: schedule.blocks,
                days: schedule.days,
                enabled_days: schedule.enabled_days,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        GateState::PrimaryFailed(message) => {
            anyhow::bail!("primary calendar unavailable: {message}")
        }
        GateState::Waiting => {
            tracing::warn!("Plan calendar unavailable, schedule withheld");
            Ok(())
        }
    }
}
