//! Perspective switching

use super::require_name;
use crate::error::{ConnectorError, Result};
use crate::model::{Perspective, same_name};
use crate::script::{ObjectRef, ResultExpr, Statement, Value, WriteScript};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchPerspective {
    pub name: String,
}

impl SwitchPerspective {
    /// Build the switch after checking the name against the known perspectives
    pub fn build(&self, known: &[Perspective]) -> Result<WriteScript> {
        let name = require_name("name", self.name.trim())?;
        let Some(found) = known.iter().find(|p| same_name(&p.name, &name)) else {
            let names: Vec<&str> = known.iter().map(|p| p.name.as_str()).collect();
            return Err(ConnectorError::validation(format!(
                "Unknown perspective '{}'. Available: {}",
                name,
                names.join(", ")
            )));
        };
        let mut script = WriteScript::new(ResultExpr::Literal(found.name.clone()));
        script.push(Statement::set(
            ObjectRef::FrontWindow,
            "perspective name",
            Value::text(found.name.clone()),
        ));
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<Perspective> {
        vec![
            Perspective {
                name: "Inbox".into(),
                current: true,
            },
            Perspective {
                name: "Forecast".into(),
                current: false,
            },
        ]
    }

    #[test]
    fn test_switch_uses_canonical_name() {
        let switch = SwitchPerspective {
            name: "forecast".into(),
        };
        let text = switch.build(&known()).unwrap().render("OmniFocus");
        assert!(text.contains("set perspective name of document window 1 to \"Forecast\""));
        assert!(text.contains("set resultId to \"Forecast\""));
    }

    #[test]
    fn test_unknown_perspective_is_validation_error() {
        let switch = SwitchPerspective {
            name: "Nope".into(),
        };
        let err = switch.build(&known()).unwrap_err();
        assert!(matches!(err, ConnectorError::Validation(_)));
        assert!(err.to_string().contains("Forecast"));
    }
}
