use serde::{Deserialize, Serialize};

use crate::model::Id;

pub const SHORT_NAME_MAX_CHARS: usize = 100;

/// Body of the knowledge base, rule and pattern rename endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequest {
    pub id: Id,
    pub new_shortname: String,
}

impl RenameRequest {
    pub fn new(id: impl Into<Id>, new_shortname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            new_shortname: new_shortname.into(),
        }
    }

    /// The new short name must be 1 to 100 characters long.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.new_shortname.chars().count();
        if len == 0 {
            return Err("new_shortname must not be empty".to_string());
        }
        if len > SHORT_NAME_MAX_CHARS {
            return Err(format!(
                "new_shortname is {} characters, at most {} allowed",
                len, SHORT_NAME_MAX_CHARS
            ));
        }
        Ok(())
    }
}

/// One element of a bulk parameter update. Not length-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterEdit {
    pub id: Id,
    pub new_shortname: String,
    pub new_type: String,
}

impl ParameterEdit {
    pub fn new(
        id: impl Into<Id>,
        new_shortname: impl Into<String>,
        new_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            new_shortname: new_shortname.into(),
            new_type: new_type.into(),
        }
    }
}
