//! Structured write statements and their single serialization point
//!
//! Assemblers describe a write as a list of [`Statement`]s ("set property P
//! of object O to value V", "move O to L", ...). [`WriteScript::render`]
//! turns the list into AppleScript. The generated body has no control flow;
//! the only branching lives in the fixed prelude handlers.

use super::prelude::prelude;
use super::value::{Value, quote};

/// A reference to an object in the OmniFocus scripting model
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectRef {
    /// A variable bound earlier in the same script
    Var(&'static str),
    TaskById(String),
    ProjectById(String),
    FolderById(String),
    /// Folder addressed by names from the top level down
    FolderByPath(Vec<String>),
    /// Existing tag looked up by name
    TagByName(String),
    /// Tag looked up by name and created when missing
    EnsureTag(String),
    /// The default document itself
    Document,
    /// Front window of the default document
    FrontWindow,
}

impl ObjectRef {
    pub fn render(&self) -> String {
        match self {
            ObjectRef::Var(name) => (*name).to_string(),
            ObjectRef::TaskById(id) => format!("(first flattened task whose id is {})", quote(id)),
            ObjectRef::ProjectById(id) => {
                format!("(first flattened project whose id is {})", quote(id))
            }
            ObjectRef::FolderById(id) => {
                format!("(first flattened folder whose id is {})", quote(id))
            }
            ObjectRef::FolderByPath(path) => {
                let parts: Vec<String> = path
                    .iter()
                    .rev()
                    .map(|name| format!("folder {}", quote(name)))
                    .collect();
                format!("({})", parts.join(" of "))
            }
            ObjectRef::TagByName(name) => {
                format!("(first flattened tag whose name is {})", quote(name))
            }
            ObjectRef::EnsureTag(name) => format!("(my ensureTag({}))", quote(name)),
            ObjectRef::Document => "it".to_string(),
            ObjectRef::FrontWindow => "document window 1".to_string(),
        }
    }
}

/// Where a new or moved object goes
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// End of an element list, e.g. `end of tasks of <project>`
    EndOf(ObjectRef, &'static str),
    Before(ObjectRef),
    After(ObjectRef),
}

impl Location {
    pub fn render(&self) -> String {
        match self {
            Location::EndOf(ObjectRef::Document, elements) => format!("end of {}", elements),
            Location::EndOf(container, elements) => {
                format!("end of {} of {}", elements, container.render())
            }
            Location::Before(target) => format!("before {}", target.render()),
            Location::After(target) => format!("after {}", target.render()),
        }
    }
}

/// Commands that act on an object without setting a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Completes the task; repeating tasks spawn their next occurrence
    MarkComplete,
    MarkIncomplete,
    MarkDropped,
    Delete,
}

impl Verb {
    fn as_str(&self) -> &'static str {
        match self {
            Verb::MarkComplete => "mark complete",
            Verb::MarkIncomplete => "mark incomplete",
            Verb::MarkDropped => "mark dropped",
            Verb::Delete => "delete",
        }
    }
}

/// What a write script reports back as the affected identifier
#[derive(Debug, Clone, PartialEq)]
pub enum ResultExpr {
    IdOf(ObjectRef),
    NameOf(ObjectRef),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Bind {
        var: &'static str,
        target: ObjectRef,
    },
    Make {
        var: &'static str,
        class: &'static str,
        at: Option<Location>,
        properties: Vec<(&'static str, Value)>,
    },
    Set {
        target: ObjectRef,
        property: &'static str,
        value: Value,
    },
    AddTag {
        target: ObjectRef,
        tag: ObjectRef,
    },
    RemoveTag {
        target: ObjectRef,
        tag: ObjectRef,
    },
    ClearTags {
        target: ObjectRef,
    },
    Move {
        target: ObjectRef,
        to: Location,
    },
    Command {
        verb: Verb,
        target: ObjectRef,
    },
    CaptureResult(ResultExpr),
}

impl Statement {
    pub fn set(target: ObjectRef, property: &'static str, value: Value) -> Self {
        Statement::Set {
            target,
            property,
            value,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Statement::Bind { var, target } => format!("set {} to {}", var, target.render()),
            Statement::Make {
                var,
                class,
                at,
                properties,
            } => {
                let mut line = format!("set {} to make new {}", var, class);
                if let Some(location) = at {
                    line.push_str(" at ");
                    line.push_str(&location.render());
                }
                if !properties.is_empty() {
                    line.push_str(" with properties ");
                    line.push_str(&Value::Record(properties.clone()).render());
                }
                line
            }
            Statement::Set {
                target,
                property,
                value,
            } => format!(
                "set {} of {} to {}",
                property,
                target.render(),
                value.render()
            ),
            Statement::AddTag { target, tag } => {
                format!("add {} to tags of {}", tag.render(), target.render())
            }
            Statement::RemoveTag { target, tag } => {
                format!("remove {} from tags of {}", tag.render(), target.render())
            }
            Statement::ClearTags { target } => {
                let target = target.render();
                format!("remove (tags of {}) from tags of {}", target, target)
            }
            Statement::Move { target, to } => {
                format!("move {} to {}", target.render(), to.render())
            }
            Statement::Command { verb, target } => {
                format!("{} {}", verb.as_str(), target.render())
            }
            Statement::CaptureResult(expr) => match expr {
                ResultExpr::IdOf(target) => format!("set resultId to id of {}", target.render()),
                ResultExpr::NameOf(target) => {
                    format!("set resultId to name of {}", target.render())
                }
                ResultExpr::Literal(text) => format!("set resultId to {}", quote(text)),
            },
        }
    }
}

/// A complete write operation against one object
#[derive(Debug, Clone, PartialEq)]
pub struct WriteScript {
    statements: Vec<Statement>,
    result: ResultExpr,
}

impl WriteScript {
    /// Start a script that reports `result` as the affected identifier
    ///
    /// The result is captured right after the statements pushed before the
    /// first call to [`WriteScript::capture_now`], or at the end otherwise.
    pub fn new(result: ResultExpr) -> Self {
        Self {
            statements: Vec::new(),
            result,
        }
    }

    pub fn push(&mut self, statement: Statement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    /// Capture the result at this point (needed before `delete`)
    pub fn capture_now(&mut self) -> &mut Self {
        self.statements
            .push(Statement::CaptureResult(self.result.clone()));
        self
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of statements that change OmniFocus state
    pub fn mutation_count(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| !matches!(s, Statement::Bind { .. } | Statement::CaptureResult(_)))
            .count()
    }

    pub fn render(&self, app: &str) -> String {
        let mut body: Vec<String> = self.statements.iter().map(Statement::render).collect();
        if !self
            .statements
            .iter()
            .any(|s| matches!(s, Statement::CaptureResult(_)))
        {
            body.push(Statement::CaptureResult(self.result.clone()).render());
        }

        let mut script = prelude(app);
        script.push('\n');
        script.push_str(&format!("tell application {}\n", quote(app)));
        script.push_str("\ttell default document\n");
        for line in body {
            script.push_str("\t\t");
            script.push_str(&line);
            script.push('\n');
        }
        script.push_str("\tend tell\n");
        script.push_str("end tell\n");
        script.push_str("return resultId & EOT\n");
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_path_reference() {
        let r = ObjectRef::FolderByPath(vec!["Work".into(), "Clients".into()]);
        assert_eq!(r.render(), "(folder \"Clients\" of folder \"Work\")");
    }

    #[test]
    fn test_locations() {
        assert_eq!(
            Location::EndOf(ObjectRef::Document, "inbox tasks").render(),
            "end of inbox tasks"
        );
        assert_eq!(
            Location::EndOf(ObjectRef::ProjectById("p1".into()), "tasks").render(),
            "end of tasks of (first flattened project whose id is \"p1\")"
        );
        assert_eq!(
            Location::Before(ObjectRef::TaskById("t2".into())).render(),
            "before (first flattened task whose id is \"t2\")"
        );
    }

    #[test]
    fn test_make_statement() {
        let s = Statement::Make {
            var: "theTask",
            class: "inbox task",
            at: None,
            properties: vec![("name", Value::text("Call \"Bob\"")), ("flagged", Value::Bool(true))],
        };
        assert_eq!(
            s.render(),
            "set theTask to make new inbox task with properties {name:\"Call \\\"Bob\\\"\", flagged:true}"
        );
    }

    #[test]
    fn test_render_captures_result_at_end_by_default() {
        let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var("theTask")));
        script.push(Statement::Bind {
            var: "theTask",
            target: ObjectRef::TaskById("t1".into()),
        });
        script.push(Statement::set(
            ObjectRef::Var("theTask"),
            "flagged",
            Value::Bool(true),
        ));
        let text = script.render("OmniFocus");
        let set_pos = text.find("set flagged of theTask to true").unwrap();
        let capture_pos = text.find("set resultId to id of theTask").unwrap();
        assert!(set_pos < capture_pos);
        assert!(text.trim_end().ends_with("return resultId & EOT"));
        assert_eq!(script.mutation_count(), 1);
    }

    #[test]
    fn test_capture_before_delete() {
        let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var("theTask")));
        script
            .push(Statement::Bind {
                var: "theTask",
                target: ObjectRef::TaskById("t1".into()),
            })
            .capture_now()
            .push(Statement::Command {
                verb: Verb::Delete,
                target: ObjectRef::Var("theTask"),
            });
        let text = script.render("OmniFocus");
        assert!(text.find("set resultId").unwrap() < text.find("delete theTask").unwrap());
        assert_eq!(text.matches("set resultId").count(), 1);
    }
}
