//! Command list data model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Host command codes this crate reads or intercepts
pub mod codes {
    pub const END: u16 = 0;
    pub const CONDITIONAL_BRANCH: u16 = 111;
    pub const ELSE: u16 = 411;
    pub const BRANCH_END: u16 = 412;
    pub const LOOP: u16 = 112;
    pub const REPEAT_ABOVE: u16 = 413;
    pub const BREAK_LOOP: u16 = 113;
    pub const EXIT_EVENT: u16 = 115;
    pub const COMMON_EVENT: u16 = 117;
    pub const CONTROL_SWITCHES: u16 = 121;
    pub const CONTROL_VARIABLES: u16 = 122;
    pub const CONTROL_SELF_SWITCH: u16 = 123;
    pub const ERASE_EVENT: u16 = 214;
    pub const SCRIPT: u16 = 355;
    pub const PLUGIN_COMMAND: u16 = 357;
    pub const PLUGIN_COMMAND_TEXT: u16 = 657;

    /// Move route command running a script line
    pub const ROUTE_SCRIPT: u16 = 45;

    /// Conditional branch sub-types
    pub const BRANCH_ON_SWITCH: i32 = 0;
    pub const BRANCH_ON_VARIABLE: i32 = 1;
    pub const BRANCH_ON_SELF_SWITCH: i32 = 2;
}

/// One entry of an event page, common event or move route list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub code: u16,
    /// Move route entries carry `null` here
    #[serde(default, deserialize_with = "indent_or_zero")]
    pub indent: u32,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

fn indent_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

impl Command {
    pub fn new(code: u16, indent: u32, parameters: Vec<Value>) -> Self {
        Self {
            code,
            indent,
            parameters,
        }
    }

    /// Build a plugin command entry the way the editor serializes it
    pub fn plugin(plugin: &str, name: &str, indent: u32, args: &[(&str, &str)]) -> Self {
        let args: Map<String, Value> = args
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Self::new(
            codes::PLUGIN_COMMAND,
            indent,
            vec![
                Value::String(plugin.to_string()),
                Value::String(name.to_string()),
                Value::String(String::new()),
                Value::Object(args),
            ],
        )
    }

    /// Integer parameter, accepting numeric strings
    pub fn int_param(&self, index: usize) -> Option<i32> {
        match self.parameters.get(index)? {
            Value::Number(n) => n.as_i64().map(|v| v as i32),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(*b as i32),
            _ => None,
        }
    }

    pub fn str_param(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).and_then(Value::as_str)
    }

    pub fn is_plugin_command(&self) -> bool {
        self.code == codes::PLUGIN_COMMAND
    }

    /// View this entry as a plugin command, if it is one
    pub fn as_plugin_command(&self) -> Option<PluginCommand<'_>> {
        if !self.is_plugin_command() {
            return None;
        }
        let plugin = extract_file_name(self.str_param(0)?);
        let name = self.str_param(1)?;
        let args = self.parameters.get(3).and_then(Value::as_object);
        Some(PluginCommand { plugin, name, args })
    }
}

/// Strip directories and extension from a plugin path
fn extract_file_name(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// Borrowed view of a plugin command's owner, name and arguments
#[derive(Debug, Clone, Copy)]
pub struct PluginCommand<'a> {
    pub plugin: &'a str,
    pub name: &'a str,
    args: Option<&'a Map<String, Value>>,
}

impl<'a> PluginCommand<'a> {
    /// Argument text; blank arguments read as absent
    pub fn arg(&self, name: &str) -> Option<&'a str> {
        let value = self.args?.get(name)?;
        let text = match value {
            Value::String(s) => s.as_str(),
            _ => return None,
        };
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Numeric argument; `Ok(None)` when absent, `Err` text when unparsable
    pub fn number_arg<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, String> {
        match self.arg(name) {
            None => Ok(None),
            Some(text) => text
                .parse::<T>()
                .map(Some)
                .map_err(|_| format!("argument {} is not a number: {}", name, text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_shape() {
        let json = r#"{"code":357,"indent":1,"parameters":["js/plugins/Tyruswoo_EventAI.js","weight","Weight",{"weight":"3"}]}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command.indent, 1);
        let plugin = command.as_plugin_command().unwrap();
        assert_eq!(plugin.plugin, "Tyruswoo_EventAI");
        assert_eq!(plugin.name, "weight");
        assert_eq!(plugin.number_arg::<f64>("weight"), Ok(Some(3.0)));
    }

    #[test]
    fn test_missing_indent_and_parameters_default() {
        let command: Command = serde_json::from_str(r#"{"code":0}"#).unwrap();
        assert_eq!(command.indent, 0);
        assert!(command.parameters.is_empty());
        assert!(command.as_plugin_command().is_none());
    }

    #[test]
    fn test_route_entry_with_null_indent() {
        let json = r#"{"code":45,"indent":null,"parameters":["this.rbEnd()"]}"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(command.indent, 0);
        assert_eq!(command.str_param(0), Some("this.rbEnd()"));
    }

    #[test]
    fn test_blank_argument_is_absent() {
        let command = Command::plugin("EventAI", "link_event", 0, &[("note", "  ")]);
        let plugin = command.as_plugin_command().unwrap();
        assert_eq!(plugin.arg("note"), None);
        assert_eq!(plugin.arg("missing"), None);
    }

    #[test]
    fn test_int_param_accepts_strings() {
        let command = Command::new(
            codes::COMMON_EVENT,
            0,
            vec![Value::String("12".to_string())],
        );
        assert_eq!(command.int_param(0), Some(12));
        assert_eq!(command.int_param(1), None);
    }
}
