//! LLM tool capability.
//!
//! Tools an assistant backend may call during a conversation. The host
//! carries tool identity, a JSON-schema parameter description, and the
//! asynchronous invocation; how a tool does its work (subprocess, HTTP,
//! embedded library) is the plugin's business.

use serde_json::{json, Value};

use crate::promise::Promise;
use crate::provider::Provider;

pub trait LlmTool: Provider {
    /// Tool name as presented to the model, e.g. `list-diagnostics`.
    fn name(&self) -> String;

    /// One-line description of what the tool does.
    fn description(&self) -> String;

    /// JSON schema of the tool's arguments. Defaults to "no arguments".
    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    /// Invoke the tool with model-supplied arguments. Backend failures
    /// surface as promise rejections with opaque payloads.
    fn invoke(&self, arguments: Value) -> Promise<Value>;
}
