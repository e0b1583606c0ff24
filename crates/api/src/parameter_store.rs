use async_trait::async_trait;
use remote_json_envs_types::RawResult;
use serde::Deserialize;
use serde_json::Value;

use crate::{AwsCliConfig, StoreError, StoreResolver};

const PARAMETER_NOT_FOUND_MARKERS: &[&str] = &["ParameterNotFound"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetParameterOutput {
    parameter: Parameter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Parameter {
    value: String,
}

/// SSM Parameter Store resolver backed by `aws ssm get-parameter`.
///
/// SecureString parameters are decrypted. Values that parse as JSON are
/// returned decoded; anything else is returned as a JSON string.
#[derive(Debug, Clone, Default)]
pub struct AwsCliParameterStore {
    config: AwsCliConfig,
}

impl AwsCliParameterStore {
    pub fn new(config: AwsCliConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreResolver for AwsCliParameterStore {
    async fn resolve(&self, address: &str) -> Result<RawResult, StoreError> {
        let args = ["ssm", "get-parameter", "--name", address, "--with-decryption", "--output", "json"];
        match self.config.run(&args, PARAMETER_NOT_FOUND_MARKERS).await? {
            Some(stdout) => parse_get_parameter_output(&self.config.program, &stdout).map(RawResult::found),
            None => Ok(RawResult::missing()),
        }
    }

    fn name(&self) -> &'static str {
        "ssm-parameter-store"
    }
}

fn parse_get_parameter_output(program: &str, stdout: &[u8]) -> Result<Value, StoreError> {
    let output: GetParameterOutput =
        serde_json::from_slice(stdout).map_err(|error| StoreError::malformed_output(program, format!("get-parameter response: {error}")))?;
    Ok(decode_parameter_value(output.parameter.value))
}

fn decode_parameter_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}
