//! App aggregation
//!
//! Turns listing entries into [`Application`] records and enriches them in
//! three passes, one resource type at a time: build lineage, environment,
//! and runtime command. Each pass walks the whole set in discovery order
//! before the next pass starts.

use log::{debug, warn};

use super::anonymize::AnonymizationPolicy;
use super::model::{Application, Droplet, Environment, Lifecycle, Process, ServiceBinding};
use crate::client::models::{
    AppEnvResource, AppResource, DropletResource, ProcessResource, ServiceOfferings, VariableMap,
};
use crate::client::parallel::fetch_ordered;
use crate::client::{ResourceFetcher, fetch_resource};
use crate::error::Result;
use crate::output::progress::Progress;

/// Start command fragments worth reporting, in report order.
pub const COMMAND_FRAGMENTS: [&str; 5] = [
    "open_jdk_jre/bin/java ",
    "springframework.boot.loader.JarLauncher",
    "groovy/bin/groovy ",
    "spring_boot_cli/bin/spring run",
    "tomcat/bin/catalina.sh run",
];

/// Per-app resource fetched by an enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    BuildLineage,
    Environment,
    Runtime,
}

impl Resource {
    /// Cloud Controller path of this resource for an app.
    pub fn path(&self, guid: &str) -> String {
        match self {
            Resource::BuildLineage => format!("/v3/apps/{}/droplets/current", guid),
            Resource::Environment => format!("/v3/apps/{}/env", guid),
            Resource::Runtime => format!("/v3/apps/{}/processes/web", guid),
        }
    }

    /// Short label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::BuildLineage => "droplet",
            Resource::Environment => "env",
            Resource::Runtime => "process",
        }
    }
}

/// Builds and enriches application records.
pub struct AppAggregator<'a> {
    fetcher: &'a dyn ResourceFetcher,
    policy: AnonymizationPolicy,
    concurrency: usize,
    progress: &'a Progress,
}

impl<'a> AppAggregator<'a> {
    pub fn new(
        fetcher: &'a dyn ResourceFetcher,
        policy: AnonymizationPolicy,
        concurrency: usize,
        progress: &'a Progress,
    ) -> Self {
        Self {
            fetcher,
            policy,
            concurrency: concurrency.max(1),
            progress,
        }
    }

    /// Records for the started apps among `entries`, in listing order.
    ///
    /// Apps in any other state are dropped here and never fetched again, as
    /// are entries without a guid since no per-app path can be built for them.
    pub fn discover<I>(&self, entries: I) -> Vec<Application>
    where
        I: IntoIterator<Item = AppResource>,
    {
        entries
            .into_iter()
            .filter(AppResource::is_started)
            .filter(|app| {
                if app.guid.is_empty() {
                    warn!("Skipping started app without a guid: {:?}", app);
                    return false;
                }
                true
            })
            .map(|app| {
                Application::new(
                    app.guid.clone(),
                    self.policy.anonymize(&app.guid),
                    Lifecycle::from(&app),
                )
            })
            .collect()
    }

    /// Fill `current_droplet` for every app.
    ///
    /// An app that has never staged has no current droplet; it gets an empty
    /// lineage instead of failing the pass.
    pub async fn enrich_build_lineage(&self, apps: &mut [Application]) -> Result<()> {
        let fetcher = self.fetcher;
        self.run_pass(
            apps,
            Resource::BuildLineage,
            move |guid| async move {
                let path = Resource::BuildLineage.path(&guid);
                match fetch_resource::<DropletResource>(fetcher, &path).await {
                    Ok(droplet) => Ok(Droplet {
                        buildpacks: droplet.buildpacks,
                    }),
                    Err(err) if err.is_not_found() => {
                        debug!("No current droplet for {}", guid);
                        Ok(Droplet::default())
                    }
                    Err(err) => Err(err),
                }
            },
            |app, droplet| app.current_droplet = Some(droplet),
        )
        .await
    }

    /// Fill `env` for every app.
    pub async fn enrich_environment(&self, apps: &mut [Application]) -> Result<()> {
        let fetcher = self.fetcher;
        let policy = self.policy;
        self.run_pass(
            apps,
            Resource::Environment,
            move |guid| async move {
                let env: AppEnvResource =
                    fetch_resource(fetcher, &Resource::Environment.path(&guid)).await?;
                Ok(build_environment(&env, &policy))
            },
            |app, env| app.env = Some(env),
        )
        .await
    }

    /// Fill `process` for every app.
    pub async fn enrich_runtime(&self, apps: &mut [Application]) -> Result<()> {
        let fetcher = self.fetcher;
        self.run_pass(
            apps,
            Resource::Runtime,
            move |guid| async move {
                let process: ProcessResource =
                    fetch_resource(fetcher, &Resource::Runtime.path(&guid)).await?;
                Ok(Process {
                    command_fragments: match_command_fragments(process.command()),
                })
            },
            |app, process| app.process = Some(process),
        )
        .await
    }

    /// Fetch one resource per app and apply each result to its record.
    ///
    /// Results that completed before a failure are applied; the failure is
    /// returned afterwards.
    async fn run_pass<T, F, Fut>(
        &self,
        apps: &mut [Application],
        resource: Resource,
        fetch: F,
        apply: impl Fn(&mut Application, T),
    ) -> Result<()>
    where
        T: Send + 'a,
        F: Fn(String) -> Fut,
        Fut: std::future::Future<Output = Result<T>> + Send + 'a,
    {
        let guids: Vec<String> = apps.iter().map(|a| a.source_guid.clone()).collect();
        let bar = self.progress.items(resource.label(), guids.len());

        let fan_out = fetch_ordered(guids, fetch, self.concurrency, || bar.inc(1)).await;
        bar.finish();

        let completed = fan_out.completed();
        for (app, result) in apps.iter_mut().zip(fan_out.results) {
            if let Some(value) = result {
                apply(app, value);
            }
        }

        debug!(
            "Enriched {} of {} apps with {}",
            completed,
            apps.len(),
            resource.label()
        );

        match fan_out.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Summarize an app's environment bundle.
///
/// The staging and running variable groups are each merged over the app's
/// own variables; on a key collision the group's value wins.
pub fn build_environment(env: &AppEnvResource, policy: &AnonymizationPolicy) -> Environment {
    let staging = merge_scopes(&env.environment_variables, &env.staging_env_json);
    let running = merge_scopes(&env.environment_variables, &env.running_env_json);

    Environment {
        vcap_services: build_services(&env.system_env_json.vcap_services, policy),
        staging_env: render_variables(&staging, policy),
        running_env: render_variables(&running, policy),
    }
}

/// Union of two variable maps, `overrides` taking precedence.
pub fn merge_scopes(base: &VariableMap, overrides: &VariableMap) -> VariableMap {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

fn render_variables(variables: &VariableMap, policy: &AnonymizationPolicy) -> Vec<String> {
    variables
        .iter()
        .map(|(key, value)| policy.render_variable(key, value))
        .collect()
}

fn build_services(
    vcap_services: &ServiceOfferings,
    policy: &AnonymizationPolicy,
) -> Vec<ServiceBinding> {
    vcap_services
        .bindings()
        .map(|binding| ServiceBinding {
            name: policy.anonymize(&binding.name),
            label: policy.anonymize(&binding.label),
            tags: policy.anonymize_all(&binding.tags),
        })
        .collect()
}

/// Fragments of [`COMMAND_FRAGMENTS`] contained in `command`.
///
/// Case-sensitive substring containment; results follow allow-list order.
pub fn match_command_fragments(command: &str) -> Vec<String> {
    COMMAND_FRAGMENTS
        .iter()
        .filter(|fragment| command.contains(*fragment))
        .map(|fragment| fragment.to_string())
        .collect()
}

/// Count of apps missing each section, for diagnostics.
pub fn missing_sections(apps: &[Application]) -> (usize, usize, usize) {
    apps.iter().fold((0, 0, 0), |(d, e, p), app| {
        (
            d + app.current_droplet.is_none() as usize,
            e + app.env.is_none() as usize,
            p + app.process.is_none() as usize,
        )
    })
}
