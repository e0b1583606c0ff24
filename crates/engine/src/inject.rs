//! Injection of merged secrets into the compiled deployment template.

use remote_json_envs_types::MergedSecrets;
use serde_json::{Map, Value};

use crate::TemplateError;

/// Resource type of a compute function in the compiled template.
pub const FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";

const ENVIRONMENT_PATH: [&str; 3] = ["Properties", "Environment", "Variables"];

/// Merge `secrets` into the environment variables of every function resource.
///
/// Missing `Properties`, `Environment` or `Variables` objects are created and
/// entries from `secrets` overwrite existing variables of the same name. The
/// whole template is validated first, so an error leaves it untouched.
/// Returns the number of function resources updated.
pub fn inject_environment(template: &mut Value, secrets: &MergedSecrets) -> Result<usize, TemplateError> {
    let Some(resources) = template.get_mut("Resources") else {
        return Ok(0);
    };
    let resources = resources.as_object_mut().ok_or(TemplateError::ResourcesNotAnObject)?;

    for (name, resource) in resources.iter() {
        if is_function(resource) {
            check_environment_path(name, resource)?;
        }
    }

    let mut updated = 0;
    for (name, resource) in resources.iter_mut() {
        if !is_function(resource) {
            continue;
        }
        let Some(mut node) = resource.as_object_mut() else {
            continue;
        };
        for field in ENVIRONMENT_PATH {
            node = child_object(node, field).ok_or_else(|| TemplateError::FieldNotAnObject {
                resource: name.clone(),
                field,
            })?;
        }
        for (key, value) in secrets {
            node.insert(key.clone(), value.clone());
        }
        updated += 1;
    }
    Ok(updated)
}

fn is_function(resource: &Value) -> bool {
    resource.get("Type").and_then(Value::as_str) == Some(FUNCTION_RESOURCE_TYPE)
}

fn check_environment_path(name: &str, resource: &Value) -> Result<(), TemplateError> {
    let mut node = resource;
    for field in ENVIRONMENT_PATH {
        match node.get(field) {
            None => return Ok(()),
            Some(child) if child.is_object() => node = child,
            Some(_) => {
                return Err(TemplateError::FieldNotAnObject {
                    resource: name.to_string(),
                    field,
                });
            }
        }
    }
    Ok(())
}

fn child_object<'a>(parent: &'a mut Map<String, Value>, field: &str) -> Option<&'a mut Map<String, Value>> {
    parent
        .entry(field.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}
