//! Collection pipeline
//!
//! Runs listing then the three enrichment passes, strictly in that order.
//! A failure at any stage stops collection but never loses what was already
//! collected: the caller always gets a [`Collection`] back and decides how
//! to report the interruption.

use std::fmt;

use log::{debug, info};

use super::aggregate::AppAggregator;
use super::anonymize::AnonymizationPolicy;
use super::model::Application;
use crate::client::models::AppResource;
use crate::client::{Paginator, ResourceFetcher};
use crate::error::{Error, Result};
use crate::output::progress::{Progress, page_message};

/// Listing endpoint for apps
pub const APPS_PATH: &str = "/v3/apps";

/// Stages of a collection run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Listing,
    BuildLineage,
    Environment,
    Runtime,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Listing => "listing apps",
            Stage::BuildLineage => "fetching droplets",
            Stage::Environment => "fetching environment variables",
            Stage::Runtime => "fetching processes",
        };
        f.write_str(name)
    }
}

/// How a collection run ended.
#[derive(Debug)]
pub enum CollectionOutcome {
    /// Every stage ran to completion
    Complete,
    /// Collection stopped at `stage`; records hold whatever was gathered
    Interrupted { stage: Stage, error: Error },
}

/// Records gathered by a run, complete or not.
#[derive(Debug)]
pub struct Collection {
    /// Started apps in discovery order
    pub apps: Vec<Application>,
    /// Whether the run finished
    pub outcome: CollectionOutcome,
}

impl Collection {
    /// Whether every stage ran to completion.
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, CollectionOutcome::Complete)
    }

    /// Number of apps with every section filled.
    pub fn fully_enriched(&self) -> usize {
        self.apps.iter().filter(|a| a.is_fully_enriched()).count()
    }
}

/// Settings that stay fixed for a whole run.
#[derive(Debug, Clone, Copy)]
pub struct CollectSettings {
    /// Apps requested per listing page
    pub page_size: usize,
    /// Concurrent per-app fetches in each enrichment pass
    pub concurrency: usize,
    /// Anonymization policy
    pub policy: AnonymizationPolicy,
}

/// Drives a collection run against one fetcher.
pub struct Pipeline<'a> {
    fetcher: &'a dyn ResourceFetcher,
    settings: CollectSettings,
    progress: Progress,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        fetcher: &'a dyn ResourceFetcher,
        settings: CollectSettings,
        progress: Progress,
    ) -> Self {
        Self {
            fetcher,
            settings,
            progress,
        }
    }

    /// Collect every started app and enrich it.
    ///
    /// Never fails: collection errors end up in [`Collection::outcome`].
    pub async fn run(&self) -> Collection {
        let aggregator = AppAggregator::new(
            self.fetcher,
            self.settings.policy,
            self.settings.concurrency,
            &self.progress,
        );
        let mut apps = Vec::new();

        self.progress.step(1, 4, "Fetching started apps...");
        if let Err(error) = self.list_apps(&aggregator, &mut apps).await {
            return interrupted(apps, Stage::Listing, error);
        }
        self.progress.note(&format!("Fetched {} apps.", apps.len()));
        info!("Discovered {} started apps", apps.len());

        if apps.is_empty() {
            return Collection {
                apps,
                outcome: CollectionOutcome::Complete,
            };
        }

        self.progress.step(2, 4, "Fetching droplets...");
        if let Err(error) = aggregator.enrich_build_lineage(&mut apps).await {
            return interrupted(apps, Stage::BuildLineage, error);
        }

        self.progress.step(3, 4, "Fetching environment variables...");
        if let Err(error) = aggregator.enrich_environment(&mut apps).await {
            return interrupted(apps, Stage::Environment, error);
        }

        self.progress.step(4, 4, "Fetching processes...");
        if let Err(error) = aggregator.enrich_runtime(&mut apps).await {
            return interrupted(apps, Stage::Runtime, error);
        }

        Collection {
            apps,
            outcome: CollectionOutcome::Complete,
        }
    }

    /// Walk every listing page, appending started apps as each page lands.
    async fn list_apps(
        &self,
        aggregator: &AppAggregator<'_>,
        apps: &mut Vec<Application>,
    ) -> Result<()> {
        let mut paginator: Paginator<AppResource> =
            Paginator::new(self.fetcher, APPS_PATH, self.settings.page_size);
        let bar = self.progress.pages("apps");

        loop {
            if let Some(number) = paginator.upcoming_page() {
                bar.set_message(page_message(number, paginator.total_pages()));
            }

            let page = match paginator.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(err) => {
                    bar.abandon();
                    return Err(err);
                }
            };

            debug!(
                "Apps page {} returned {} entries",
                page_message(page.number, page.total_pages),
                page.resources.len()
            );
            apps.extend(aggregator.discover(page.resources));
            bar.tick();
        }

        bar.finish_and_clear();
        Ok(())
    }
}

fn interrupted(apps: Vec<Application>, stage: Stage, error: Error) -> Collection {
    debug!("Collection interrupted while {}: {}", stage, error);
    Collection {
        apps,
        outcome: CollectionOutcome::Interrupted { stage, error },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockFetcher;
    use crate::client::fixtures::{AppBuilder, apps_page, droplet, env, process};
    use crate::collector::anonymize::digest;
    use serde_json::json;

    fn settings(page_size: usize, concurrency: usize) -> CollectSettings {
        CollectSettings {
            page_size,
            concurrency,
            policy: AnonymizationPolicy::default(),
        }
    }

    /// Mock serving one page of started apps plus every per-app resource.
    fn healthy_platform(guids: &[&str]) -> MockFetcher {
        let entries: Vec<(&str, &str)> = guids.iter().map(|g| (*g, "STARTED")).collect();
        let mut mock = MockFetcher::new().with_response(
            "/v3/apps?per_page=50&page=1",
            apps_page(&entries, Some(1), false),
        );

        for guid in guids {
            mock = mock
                .with_response(
                    format!("/v3/apps/{}/droplets/current", guid),
                    droplet(&["java_buildpack"]),
                )
                .with_response(
                    format!("/v3/apps/{}/env", guid),
                    env(json!({}), json!({}), json!({ "SECRET": "x" })),
                )
                .with_response(
                    format!("/v3/apps/{}/processes/web", guid),
                    process("tomcat/bin/catalina.sh run"),
                );
        }
        mock
    }

    #[tokio::test]
    async fn test_complete_run_enriches_every_app() {
        let mock = healthy_platform(&["a", "b"]);
        let collection = Pipeline::new(&mock, settings(50, 1), Progress::hidden())
            .run()
            .await;

        assert!(collection.is_complete());
        assert_eq!(collection.apps.len(), 2);
        assert_eq!(collection.fully_enriched(), 2);

        let app = &collection.apps[0];
        assert_eq!(app.guid, digest("a"));
        assert_eq!(
            app.env.as_ref().unwrap().running_env,
            vec![digest("SECRET")]
        );
        assert_eq!(
            app.process.as_ref().unwrap().command_fragments,
            vec!["tomcat/bin/catalina.sh run"]
        );
    }

    #[tokio::test]
    async fn test_stopped_apps_are_never_enriched() {
        let mock = healthy_platform(&["a"]).with_response(
            "/v3/apps?per_page=50&page=1",
            apps_page(&[("a", "STARTED"), ("stopped", "STOPPED")], Some(1), false),
        );

        let collection = Pipeline::new(&mock, settings(50, 1), Progress::hidden())
            .run()
            .await;

        assert_eq!(collection.apps.len(), 1);
        assert!(mock.calls().iter().all(|p| !p.contains("stopped")));
    }

    #[tokio::test]
    async fn test_no_apps_skips_enrichment() {
        let mock = MockFetcher::new().with_response(
            "/v3/apps?per_page=50&page=1",
            apps_page(&[], Some(1), false),
        );

        let collection = Pipeline::new(&mock, settings(50, 1), Progress::hidden())
            .run()
            .await;

        assert!(collection.is_complete());
        assert!(collection.apps.is_empty());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_failure_keeps_earlier_pages() {
        let mock = MockFetcher::new()
            .with_response(
                "/v3/apps?per_page=2&page=1",
                apps_page(&[("a", "STARTED"), ("b", "STARTED")], Some(3), true),
            )
            .with_failure("/v3/apps?per_page=2&page=2");

        let collection = Pipeline::new(&mock, settings(2, 1), Progress::hidden())
            .run()
            .await;

        assert!(matches!(
            collection.outcome,
            CollectionOutcome::Interrupted {
                stage: Stage::Listing,
                ..
            }
        ));
        assert_eq!(collection.apps.len(), 2);
        assert!(collection.apps.iter().all(|a| a.current_droplet.is_none()));
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_environment_failure_on_third_app() {
        let guids = ["app-1", "app-2", "app-3", "app-4", "app-5"];
        let mock = healthy_platform(&guids).with_failure("/v3/apps/app-3/env");

        let collection = Pipeline::new(&mock, settings(50, 1), Progress::hidden())
            .run()
            .await;

        assert!(matches!(
            collection.outcome,
            CollectionOutcome::Interrupted {
                stage: Stage::Environment,
                ..
            }
        ));
        assert_eq!(collection.apps.len(), 5);

        let apps = &collection.apps;
        assert!(apps.iter().all(|a| a.current_droplet.is_some()));
        assert!(apps[0].env.is_some() && apps[1].env.is_some());
        assert!(apps[2..].iter().all(|a| a.env.is_none()));
        assert!(apps.iter().all(|a| a.process.is_none()));
        assert_eq!(collection.fully_enriched(), 0);

        assert_eq!(mock.call_count("/v3/apps/app-4/env"), 0);
        assert!(mock.calls().iter().all(|p| !p.ends_with("/processes/web")));
    }

    #[tokio::test]
    async fn test_concurrent_run_preserves_discovery_order() {
        let guids = ["a", "b", "c", "d", "e", "f"];
        let mock = healthy_platform(&guids);

        let collection = Pipeline::new(&mock, settings(50, 4), Progress::hidden())
            .run()
            .await;

        assert!(collection.is_complete());
        let order: Vec<&str> = collection.apps.iter().map(|a| a.source_guid.as_str()).collect();
        assert_eq!(order, guids);
        assert_eq!(collection.fully_enriched(), 6);
    }

    #[tokio::test]
    async fn test_multi_page_listing_preserves_order() {
        let mock = MockFetcher::new()
            .with_response(
                "/v3/apps?per_page=2&page=1",
                apps_page(&[("a", "STARTED"), ("b", "STOPPED")], Some(2), true),
            )
            .with_response(
                "/v3/apps?per_page=2&page=2",
                json!({
                    "pagination": { "total_pages": 2, "next": null },
                    "resources": [ AppBuilder::new("c").docker().build() ]
                }),
            )
            .with_failure("/v3/apps/a/droplets/current");

        let collection = Pipeline::new(&mock, settings(2, 1), Progress::hidden())
            .run()
            .await;

        let order: Vec<&str> = collection.apps.iter().map(|a| a.source_guid.as_str()).collect();
        assert_eq!(order, vec!["a", "c"]);
        assert!(matches!(
            collection.outcome,
            CollectionOutcome::Interrupted {
                stage: Stage::BuildLineage,
                ..
            }
        ));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Listing.to_string(), "listing apps");
        assert_eq!(
            Stage::Environment.to_string(),
            "fetching environment variables"
        );
    }
}
