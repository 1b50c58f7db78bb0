use oprc_converge::{Condition, ResourceHandle, ResourceId};
use serde_json::{Value, json};

pub use crate::types::OutputFormat;

/// Output formatting interface
pub trait Formatter {
    fn format(&self, data: &Value) -> anyhow::Result<String>;
}

pub struct TextFormatter;
pub struct JsonFormatter;
pub struct YamlFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

impl Formatter for YamlFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(data)?)
    }
}

/// Plain text: a condition prints as its message, anything else as
/// `key=value` pairs, one item per line.
impl Formatter for TextFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(match data {
            Value::Array(items) => items
                .iter()
                .map(|item| self.format(item))
                .collect::<anyhow::Result<Vec<_>>>()?
                .join("\n"),
            Value::Object(obj) => {
                if let Some(Value::String(msg)) = obj.get("message") {
                    return Ok(msg.clone());
                }
                let mut keys: Vec<_> = obj.keys().collect();
                keys.sort();
                keys.into_iter()
                    .map(|k| format!("{k}={}", format_value(&obj[k])))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            other => format_value(other),
        })
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        _ => value.to_string(),
    }
}

pub fn get_formatter(format: &OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
    }
}

pub fn print_output(data: &Value, format: &OutputFormat) -> anyhow::Result<()> {
    let output = get_formatter(format).format(data)?;
    println!("{output}");
    Ok(())
}

pub fn condition_report(id: &ResourceId, cond: &Condition) -> Value {
    json!({
        "resource": id.to_string(),
        "type": cond.type_,
        "status": cond.status.to_string(),
        "reason": cond.reason,
        "message": cond.message,
        "lastTransitionTime": cond.last_transition_time,
    })
}

pub fn submission_report(handle: &ResourceHandle, created: bool) -> Value {
    json!({
        "resource": handle.id.to_string(),
        "uid": handle.uid,
        "created": created,
    })
}
