//! The packaging-time entry point.

use std::sync::Arc;

use remote_json_envs_types::ProviderKind;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::RemoteJsonEnvsError;
use crate::config::parse_remote_json_envs_config;
use crate::dispatch::{RemoteSources, resolve_descriptor};
use crate::extract::{TracingWarningSink, WarningSink, extract_secrets};
use crate::inject::inject_environment;
use crate::merge::merge_secrets;

/// Lifecycle point at which the host runs the pipeline.
pub const HOOK: &str = "package:compileEvents";

/// Summary of one packaging run. Holds names and counts only, never values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    pub provider: ProviderKind,
    pub requested: usize,
    pub resolved: usize,
    pub merged_keys: Vec<String>,
    pub functions_updated: usize,
}

/// Host-facing plugin object.
#[derive(Clone)]
pub struct RemoteJsonEnvs {
    sources: RemoteSources,
    warnings: Arc<dyn WarningSink>,
}

impl RemoteJsonEnvs {
    pub fn new(sources: RemoteSources) -> Self {
        Self {
            sources,
            warnings: Arc::new(TracingWarningSink),
        }
    }

    pub fn with_warning_sink(mut self, warnings: Arc<dyn WarningSink>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Lifecycle points this plugin handles.
    pub fn hooks(&self) -> &'static [&'static str] {
        &[HOOK]
    }

    /// Run the handler registered for `hook`. Unknown hooks are a no-op.
    pub async fn run_hook(
        &self,
        hook: &str,
        configuration_input: &Value,
        template: &mut Value,
    ) -> Result<Option<PackageOutcome>, RemoteJsonEnvsError> {
        if hook != HOOK {
            debug!(hook, "no handler registered for hook");
            return Ok(None);
        }
        self.package_compile(configuration_input, template).await
    }

    /// Resolve the configured remote values and inject them into every
    /// function resource of `template`.
    ///
    /// Returns `Ok(None)` without touching anything when the feature section is
    /// absent. On error the template is left as it was.
    pub async fn package_compile(
        &self,
        configuration_input: &Value,
        template: &mut Value,
    ) -> Result<Option<PackageOutcome>, RemoteJsonEnvsError> {
        let Some(mut descriptor) = parse_remote_json_envs_config(configuration_input)? else {
            debug!("RemoteJSONEnvs is not configured; skipping");
            return Ok(None);
        };

        let results = resolve_descriptor(&descriptor, &self.sources).await?;
        let resolved = extract_secrets(&mut descriptor, &results, self.warnings.as_ref());
        let merged = merge_secrets(&descriptor);
        let functions_updated = inject_environment(template, &merged)?;

        let outcome = PackageOutcome {
            provider: descriptor.kind(),
            requested: descriptor.len(),
            resolved,
            merged_keys: merged.keys().cloned().collect(),
            functions_updated,
        };
        info!(
            provider = %outcome.provider,
            requested = outcome.requested,
            resolved = outcome.resolved,
            merged = outcome.merged_keys.len(),
            functions = outcome.functions_updated,
            "RemoteJSONEnvs injected environment variables"
        );
        Ok(Some(outcome))
    }
}

impl std::fmt::Debug for RemoteJsonEnvs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteJsonEnvs").field("sources", &self.sources).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CollectingWarnings, MemoryStore, spawn_json_server};
    use crate::{ConfigError, ProcessingError};
    use remote_json_envs_api::{HttpClientConfig, JsonHttpClient};
    use serde_json::json;

    struct Harness {
        parameters: Arc<MemoryStore>,
        warnings: Arc<CollectingWarnings>,
        plugin: RemoteJsonEnvs,
    }

    fn harness(parameters: MemoryStore, objects: MemoryStore) -> Harness {
        let parameters = Arc::new(parameters);
        let warnings = Arc::new(CollectingWarnings::default());
        let http = JsonHttpClient::new(&HttpClientConfig::default()).expect("client");
        let sources = RemoteSources::new(parameters.clone(), Arc::new(objects), http);
        let plugin = RemoteJsonEnvs::new(sources).with_warning_sink(warnings.clone());
        Harness {
            parameters,
            warnings,
            plugin,
        }
    }

    fn ssm_config(keys: Value) -> Value {
        json!({"custom": {"RemoteJSONEnvs": {"provider": {"aws": {"SSMParameterStore": keys}}}}})
    }

    fn template() -> Value {
        json!({
            "Resources": {
                "HelloLambdaFunction": {
                    "Type": "AWS::Lambda::Function",
                    "Properties": {"Environment": {"Variables": {"local": "localenv"}}}
                },
                "WorldLambdaFunction": {"Type": "AWS::Lambda::Function", "Properties": {}},
                "ServerlessDeploymentBucket": {"Type": "AWS::S3::Bucket"}
            }
        })
    }

    fn variables<'a>(template: &'a Value, resource: &str) -> &'a Value {
        &template["Resources"][resource]["Properties"]["Environment"]["Variables"]
    }

    #[test]
    fn registers_the_compile_events_hook() {
        let h = harness(MemoryStore::new(), MemoryStore::new());
        assert_eq!(h.plugin.hooks(), &["package:compileEvents"]);
    }

    #[tokio::test]
    async fn single_key_is_injected_next_to_existing_variables() {
        let h = harness(MemoryStore::new().with_value("/a", json!({"x": "v1"})), MemoryStore::new());
        let mut template = template();

        let outcome = h
            .plugin
            .package_compile(&ssm_config(json!([{"key": "/a", "secretJSONKey": "x"}])), &mut template)
            .await
            .expect("package")
            .expect("configured");

        assert_eq!(variables(&template, "HelloLambdaFunction"), &json!({"local": "localenv", "x": "v1"}));
        assert_eq!(variables(&template, "WorldLambdaFunction"), &json!({"x": "v1"}));
        assert!(template["Resources"]["ServerlessDeploymentBucket"].get("Properties").is_none());
        assert_eq!(
            outcome,
            PackageOutcome {
                provider: ProviderKind::SsmParameterStore,
                requested: 1,
                resolved: 1,
                merged_keys: vec!["x".into()],
                functions_updated: 2,
            }
        );
        assert!(h.warnings.messages().is_empty());
    }

    #[tokio::test]
    async fn missing_value_warns_and_leaves_variables_unchanged() {
        let h = harness(MemoryStore::new(), MemoryStore::new());
        let mut template = template();

        h.plugin
            .package_compile(&ssm_config(json!([{"key": "/a", "secretJSONKey": "x"}])), &mut template)
            .await
            .expect("package");

        assert_eq!(variables(&template, "HelloLambdaFunction"), &json!({"local": "localenv"}));
        assert_eq!(h.warnings.messages(), vec!["RemoteJSONEnvs warning: \"/a\" key not found".to_string()]);
    }

    #[tokio::test]
    async fn partial_failures_keep_the_usable_contribution() {
        let store = MemoryStore::new()
            .with_value("/wrong", json!({"secrets": {"B": "2"}}))
            .with_value("/good", json!({"secretos": {"hello1": "mundo1", "f2oo1": "bar1"}}));
        let h = harness(store, MemoryStore::new());
        let config = ssm_config(json!([
            {"key": "/missing", "secretJSONKey": "secretos"},
            {"key": "/wrong", "secretJSONKey": "secretoas"},
            {"key": "/good", "secretJSONKey": "secretos"}
        ]));
        let mut template = template();

        let outcome = h
            .plugin
            .package_compile(&config, &mut template)
            .await
            .expect("package")
            .expect("configured");

        assert_eq!(h.warnings.messages().len(), 2);
        assert_eq!(outcome.resolved, 1);
        assert_eq!(
            variables(&template, "HelloLambdaFunction"),
            &json!({"local": "localenv", "hello1": "mundo1", "f2oo1": "bar1"})
        );
    }

    #[tokio::test]
    async fn later_items_win_and_secrets_override_existing_variables() {
        let store = MemoryStore::new()
            .with_value("/base", json!({"env": {"local": "remote", "A": "1"}}))
            .with_value("/override", json!({"env": {"A": "2"}}));
        let h = harness(store, MemoryStore::new());
        let config = ssm_config(json!([
            {"key": "/base", "secretJSONKey": "env"},
            {"key": "/override", "secretJSONKey": "env"}
        ]));
        let mut template = template();

        h.plugin.package_compile(&config, &mut template).await.expect("package");

        assert_eq!(variables(&template, "HelloLambdaFunction"), &json!({"local": "remote", "A": "2"}));
    }

    #[tokio::test]
    async fn absent_section_is_a_no_op() {
        let h = harness(MemoryStore::new(), MemoryStore::new());
        let mut template = template();
        let before = template.clone();

        let outcome = h
            .plugin
            .package_compile(&json!({"service": "demo", "custom": {}}), &mut template)
            .await
            .expect("package");

        assert!(outcome.is_none());
        assert_eq!(template, before);
    }

    #[tokio::test]
    async fn config_error_happens_before_any_fetch() {
        let h = harness(MemoryStore::new().with_value("/a", json!({"x": "1"})), MemoryStore::new());
        let mut template = template();
        let config = json!({"custom": {"RemoteJSONEnvs": {"provider": {"aws": {"SecretsManager": []}}}}});

        let err = h.plugin.package_compile(&config, &mut template).await.expect_err("config error");

        assert!(matches!(err, RemoteJsonEnvsError::Config(ConfigError::UnsupportedProvider { .. })));
        assert_eq!(h.parameters.calls(), 0);
        assert_eq!(template, self::template());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_the_template_untouched() {
        let store = MemoryStore::new().with_value("/ok", json!({"x": "1"})).with_failure("/denied");
        let h = harness(store, MemoryStore::new());
        let config = ssm_config(json!([
            {"key": "/ok", "secretJSONKey": "x"},
            {"key": "/denied", "secretJSONKey": "x"}
        ]));
        let mut template = template();

        let err = h.plugin.package_compile(&config, &mut template).await.expect_err("fetch error");

        assert!(matches!(err, RemoteJsonEnvsError::Processing(ProcessingError::Resolve { .. })));
        assert_eq!(template, self::template());
        assert!(h.warnings.messages().is_empty());
    }

    #[tokio::test]
    async fn object_store_values_are_decoded_and_injected() {
        let objects = MemoryStore::new().with_value("deploy-bucket/env.json", json!(r#"{"env":{"STAGE":"dev"}}"#));
        let h = harness(MemoryStore::new(), objects);
        let config = json!({"custom": {"RemoteJSONEnvs": {"provider": {"aws": {"S3": [
            {"key": "deploy-bucket/env.json", "secretJSONKey": "env"}
        ]}}}}});
        let mut template = template();

        let outcome = h
            .plugin
            .package_compile(&config, &mut template)
            .await
            .expect("package")
            .expect("configured");

        assert_eq!(outcome.provider, ProviderKind::S3);
        assert_eq!(variables(&template, "WorldLambdaFunction"), &json!({"STAGE": "dev"}));
    }

    #[tokio::test]
    async fn http_endpoints_feed_the_same_pipeline() {
        let base = spawn_json_server().await;
        let h = harness(MemoryStore::new(), MemoryStore::new());
        let config = json!({"custom": {"RemoteJSONEnvs": {"provider": {"api": {"HTTPRequest": [
            {"URL": format!("{base}/env"), "secretJSONKey": "app"},
            {"URL": format!("{base}/status/404"), "secretJSONKey": "app"}
        ]}}}}});
        let mut template = template();

        let outcome = h
            .plugin
            .run_hook(HOOK, &config, &mut template)
            .await
            .expect("package")
            .expect("configured");

        assert_eq!(outcome.resolved, 1);
        assert_eq!(
            variables(&template, "HelloLambdaFunction"),
            &json!({"local": "localenv", "API_URL": "https://api.example.com"})
        );
        assert_eq!(
            h.warnings.messages(),
            vec![format!("RemoteJSONEnvs warning: \"{base}/status/404\" key not found")]
        );
    }

    #[tokio::test]
    async fn other_hooks_do_nothing() {
        let h = harness(MemoryStore::new().with_value("/a", json!({"x": "v1"})), MemoryStore::new());
        let mut template = template();

        let outcome = h
            .plugin
            .run_hook("deploy:deploy", &ssm_config(json!([{"key": "/a", "secretJSONKey": "x"}])), &mut template)
            .await
            .expect("hook");

        assert!(outcome.is_none());
        assert_eq!(h.parameters.calls(), 0);
    }
}
