//! Demo data seed tool.
//!
//! Fetches the public demo CRM data set and writes it as the fixture file
//! the server loads at startup. Collections that cannot be fetched are
//! generated instead, so the tool always produces a usable fixture.
//!
//! # Sequence
//!
//! 1. Fetch users (no auth required)
//! 2. Sign in as `CRM_SEED_EMAIL`
//! 3. Fetch the remaining collections, pausing between requests
//! 4. Generate calendar events
//! 5. Write the fixture

mod config;
mod error;
mod generate;
mod remote;
mod transform;

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use crm_store::Fixture;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::SeedConfig;
use crate::remote::{Collection, RemoteClient};
use crate::transform::{
    RemoteCompany, RemoteContact, RemoteDeal, RemoteStage, RemoteTask, RemoteUser,
};

/// Pause between remote requests.
const REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Fetch one collection, falling back to `generate` on error or an empty
/// result.
async fn fetch_or_generate<R, T>(
    client: &RemoteClient,
    collection: Collection,
    convert: impl Fn(R) -> T,
    generate: impl FnOnce() -> Vec<T>,
) -> Vec<T>
where
    R: DeserializeOwned,
{
    let fetched = match client.fetch::<R>(collection).await {
        Ok(records) => records,
        Err(e) => {
            warn!(collection = collection.key(), error = %e, "fetch failed");
            Vec::new()
        }
    };
    tokio::time::sleep(REQUEST_DELAY).await;

    if fetched.is_empty() {
        info!(collection = collection.key(), "using generated data");
        return generate();
    }
    info!(collection = collection.key(), count = fetched.len(), "fetched");
    fetched.into_iter().map(convert).collect()
}

async fn build_fixture(config: &SeedConfig, now: DateTime<Utc>) -> Fixture {
    let mut client = RemoteClient::new(&config.remote_api);

    let users = fetch_or_generate(
        &client,
        Collection::Users,
        |u: RemoteUser| u.into_user(now),
        || generate::mock_users(now),
    )
    .await;

    match client.authenticate(&config.email).await {
        Ok(()) => info!(email = %config.email, "signed in to remote API"),
        Err(e) => warn!(
            email = %config.email,
            error = %e,
            "sign-in failed, continuing without auth"
        ),
    }

    let companies = fetch_or_generate(
        &client,
        Collection::Companies,
        |c: RemoteCompany| c.into_company(now),
        || generate::mock_companies(&users, now),
    )
    .await;
    let contacts = fetch_or_generate(
        &client,
        Collection::Contacts,
        |c: RemoteContact| c.into_contact(now),
        || generate::mock_contacts(&companies, &users, now),
    )
    .await;
    let deal_stages = fetch_or_generate(
        &client,
        Collection::DealStages,
        |s: RemoteStage| s.into_deal_stage(now),
        || generate::mock_deal_stages(now),
    )
    .await;
    let deals = fetch_or_generate(
        &client,
        Collection::Deals,
        |d: RemoteDeal| d.into_deal(now),
        || generate::mock_deals(&companies, &contacts, &users, &deal_stages, now),
    )
    .await;
    let task_stages = fetch_or_generate(
        &client,
        Collection::TaskStages,
        |s: RemoteStage| s.into_task_stage(now),
        || generate::mock_task_stages(now),
    )
    .await;
    let tasks = fetch_or_generate(
        &client,
        Collection::Tasks,
        |t: RemoteTask| t.into_task(now),
        || generate::mock_tasks(&users, &task_stages, now),
    )
    .await;

    let events = generate::generate_events(&companies, &users, now, &mut rand::rng());

    Fixture {
        users,
        companies,
        contacts,
        deal_stages,
        deals,
        task_stages,
        tasks,
        events,
        audits: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = SeedConfig::from_env();
    info!(
        remote_api = %config.remote_api,
        fixture_path = %config.fixture_path.display(),
        "crm-seed starting"
    );

    let fixture = build_fixture(&config, Utc::now()).await;
    fixture
        .save(&config.fixture_path)
        .with_context(|| format!("writing {}", config.fixture_path.display()))?;

    info!(
        users = fixture.users.len(),
        companies = fixture.companies.len(),
        contacts = fixture.contacts.len(),
        deal_stages = fixture.deal_stages.len(),
        deals = fixture.deals.len(),
        task_stages = fixture.task_stages.len(),
        tasks = fixture.tasks.len(),
        events = fixture.events.len(),
        path = %config.fixture_path.display(),
        "fixture written"
    );
    Ok(())
}
