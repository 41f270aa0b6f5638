//! Named collection of control parameters.
//!
//! One `ControlState` holds the parameters the user *requested* (owned by the
//! main window), and each dataset carries one describing what was *performed*
//! on its data. Comparing the two tells a view how stale its output is.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::ops::Index;

use crate::error::ControlError;

/// Value of a control parameter.
pub type ParamValue = serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    owner: String,
    parameters: BTreeMap<String, ParamValue>,
}

impl ControlState {
    /// `owner` only labels log output.
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Insert or overwrite `name`.
    pub fn add_param(&mut self, name: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        log::debug!("[{}] set parameter '{name}' = {value}", self.owner);
        self.parameters.insert(name.to_owned(), value);
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Fails for parameters that were never added. Use [`Self::has_param`]
    /// first when absence is expected.
    pub fn get_param(&self, name: &str) -> Result<&ParamValue, ControlError> {
        self.parameters
            .get(name)
            .ok_or_else(|| ControlError::MissingParameter {
                owner: self.owner.clone(),
                name: name.to_owned(),
            })
    }

    /// Overwrite an existing parameter. Absent parameters are only created
    /// when `create_if_missing` is set.
    ///
    /// Returns whether the state was written.
    pub fn update_param(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
        create_if_missing: bool,
    ) -> bool {
        if !create_if_missing && !self.has_param(name) {
            log::debug!(
                "[{}] ignoring update of unknown parameter '{name}'",
                self.owner
            );
            return false;
        }
        self.add_param(name, value);
        true
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, ControlError> {
        self.get_param(name)?
            .as_f64()
            .ok_or_else(|| wrong_type(name, "number"))
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, ControlError> {
        self.get_param(name)?
            .as_i64()
            .ok_or_else(|| wrong_type(name, "integer"))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ControlError> {
        self.get_param(name)?
            .as_bool()
            .ok_or_else(|| wrong_type(name, "bool"))
    }

    pub fn get_str(&self, name: &str) -> Result<&str, ControlError> {
        self.get_param(name)?
            .as_str()
            .ok_or_else(|| wrong_type(name, "string"))
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Human readable dump of all parameters, for debugging.
    pub fn summarize(&self) -> String {
        let mut out = format!("ControlState '{}':", self.owner);
        for (name, value) in self.parameters.iter() {
            let _ = write!(out, "\n  {name} = {value}");
        }
        out
    }
}

impl Index<&str> for ControlState {
    type Output = ParamValue;

    /// Panics if the parameter does not exist.
    fn index(&self, name: &str) -> &Self::Output {
        match self.parameters.get(name) {
            Some(value) => value,
            None => panic!("control state '{}' has no parameter '{name}'", self.owner),
        }
    }
}

fn wrong_type(name: &str, expected: &'static str) -> ControlError {
    ControlError::WrongType {
        name: name.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_add_then_get() {
        let mut control = ControlState::new("requested");
        control.add_param("amplitude", 2.5);
        control.add_param("label", "chirp");
        assert!(control.has_param("amplitude"));
        assert_eq!(control.get_param("amplitude"), Ok(&json!(2.5)));
        assert_eq!(control.get_str("label"), Ok("chirp"));

        // overwrite unconditionally
        control.add_param("amplitude", 4);
        assert_eq!(control.get_i64("amplitude"), Ok(4));
        assert_eq!(control.len(), 2);
    }

    #[test]
    fn test_get_missing_fails() {
        let control = ControlState::new("requested");
        assert!(!control.has_param("amplitude"));
        assert_eq!(
            control.get_param("amplitude"),
            Err(ControlError::MissingParameter {
                owner: "requested".into(),
                name: "amplitude".into()
            })
        );
    }

    #[test]
    #[should_panic(expected = "has no parameter 'amplitude'")]
    fn test_index_missing_panics() {
        let control = ControlState::new("requested");
        let _ = &control["amplitude"];
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut control = ControlState::new("requested");
        let before = control.clone();
        assert!(!control.update_param("amplitude", 3.0, false));
        assert_eq!(control, before);
        assert!(control.is_empty());
    }

    #[test]
    fn test_update_existing_and_create() {
        let mut control = ControlState::new("requested");
        assert!(control.update_param("amplitude", 3.0, true));
        assert_eq!(control.get_f64("amplitude"), Ok(3.0));
        assert!(control.update_param("amplitude", 5.0, false));
        assert_eq!(control["amplitude"], json!(5.0));
    }

    #[test]
    fn test_typed_getter_wrong_type() {
        let mut control = ControlState::new("requested");
        control.add_param("enabled", true);
        assert_eq!(control.get_bool("enabled"), Ok(true));
        assert_eq!(
            control.get_f64("enabled"),
            Err(ControlError::WrongType {
                name: "enabled".into(),
                expected: "number"
            })
        );
    }

    #[test]
    fn test_summarize_lists_parameters() {
        let mut control = ControlState::new("performed");
        control.add_param("b", 1);
        control.add_param("a", "x");
        let summary = control.summarize();
        assert!(summary.starts_with("ControlState 'performed':"));
        let a = summary.find("a = \"x\"").unwrap();
        let b = summary.find("b = 1").unwrap();
        assert!(a < b);
    }
}
