use serde_json::{Map, Value};
use tracing::debug;

/// Parsed content of a kind-0 metadata event.
#[derive(Debug, Clone, Default)]
pub struct ProfileState(Value);

impl ProfileState {
    pub fn new(value: Map<String, Value>) -> Self {
        Self(Value::Object(value))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_str())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    #[inline]
    pub fn display_name(&self) -> Option<&str> {
        self.get_str("display_name")
    }

    #[inline]
    pub fn picture(&self) -> Option<&str> {
        self.get_str("picture")
    }

    /// Non-object or unparsable contents yield an empty profile.
    pub fn from_note_contents(contents: &str) -> Self {
        let data = match serde_json::from_str(contents) {
            Ok(Value::Object(data)) => data,
            Ok(_) => {
                debug!("profile contents are not a json object");
                Map::new()
            }
            Err(err) => {
                debug!("unparsable profile contents: {err}");
                Map::new()
            }
        };

        Self::new(data)
    }
}
