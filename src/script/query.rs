//! Read scripts: a source collection filtered by a `whose` clause and
//! projected through one of the prelude's record handlers.

use super::prelude::prelude;
use super::statement::ObjectRef;
use super::value::{Value, quote};

/// Record handler used to print each matched object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Task,
    Project,
    Folder,
    Tag,
}

impl Projection {
    fn handler(&self) -> &'static str {
        match self {
            Projection::Task => "taskRecord",
            Projection::Project => "projectRecord",
            Projection::Folder => "folderRecord",
            Projection::Tag => "tagRecord",
        }
    }

    fn default_elements(&self) -> &'static str {
        match self {
            Projection::Task => "flattened tasks",
            Projection::Project => "flattened projects",
            Projection::Folder => "flattened folders",
            Projection::Tag => "flattened tags",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Is,
    IsNot,
    LessThan,
    GreaterThan,
    Contains,
}

impl Comparison {
    fn as_str(&self) -> &'static str {
        match self {
            Comparison::Is => "is",
            Comparison::IsNot => "is not",
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
            Comparison::Contains => "contains",
        }
    }
}

/// One term of a `whose` clause
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub property: &'static str,
    pub comparison: Comparison,
    pub value: Value,
}

impl Condition {
    pub fn new(property: &'static str, comparison: Comparison, value: Value) -> Self {
        Self {
            property,
            comparison,
            value,
        }
    }

    pub fn is(property: &'static str, value: Value) -> Self {
        Self::new(property, Comparison::Is, value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    projection: Projection,
    /// Element list to read, e.g. `flattened tasks` or `inbox tasks`
    elements: &'static str,
    container: Option<ObjectRef>,
    conditions: Vec<Condition>,
}

impl Query {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            elements: projection.default_elements(),
            container: None,
            conditions: Vec::new(),
        }
    }

    /// Read `elements` of `container` instead of the document-wide list
    pub fn within(mut self, container: ObjectRef, elements: &'static str) -> Self {
        self.container = Some(container);
        self.elements = elements;
        self
    }

    /// Read a different document-level element list
    pub fn elements(mut self, elements: &'static str) -> Self {
        self.elements = elements;
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn render(&self, app: &str) -> String {
        let mut lines = Vec::new();

        // Filter values are bound to variables first; handler calls are not
        // allowed inside a whose clause.
        let mut terms = Vec::new();
        for (i, condition) in self.conditions.iter().enumerate() {
            let var = format!("q{}", i + 1);
            lines.push(format!("set {} to {}", var, condition.value.render()));
            terms.push(format!(
                "({} {} {})",
                condition.property,
                condition.comparison.as_str(),
                var
            ));
        }

        let mut source = format!("every {}", self.elements.trim_end_matches('s'));
        if let Some(container) = &self.container {
            source.push_str(" of ");
            source.push_str(&container.render());
        }
        let select = if terms.is_empty() {
            format!("set found to {}", source)
        } else {
            format!("set found to {} whose {}", source, terms.join(" and "))
        };
        if self.container.is_some() {
            // A missing container reads as an empty result (-1728: no such object)
            lines.push("set found to {}".to_string());
            lines.push("try".to_string());
            lines.push(format!("\t{}", select));
            lines.push("on error number -1728".to_string());
            lines.push("end try".to_string());
        } else {
            lines.push(select);
        }
        lines.push("repeat with x in found".to_string());
        lines.push(format!(
            "\tset end of out to my {}(contents of x)",
            self.projection.handler()
        ));
        lines.push("end repeat".to_string());

        let mut script = prelude(app);
        script.push('\n');
        script.push_str("set out to {}\n");
        script.push_str(&format!("tell application {}\n", quote(app)));
        script.push_str("\ttell default document\n");
        for line in lines {
            script.push_str("\t\t");
            script.push_str(&line);
            script.push('\n');
        }
        script.push_str("\tend tell\n");
        script.push_str("end tell\n");
        script.push_str("return my joinList(out, RS) & EOT\n");
        script
    }
}

/// List every perspective and mark the one in the front window
pub fn perspectives_script(app: &str) -> String {
    let mut script = prelude(app);
    script.push('\n');
    script.push_str(&format!(
        r#"set currentName to ""
tell application {app}
	set names to perspective names
	try
		set currentName to perspective name of document window 1 of default document
	end try
end tell
set out to {{}}
repeat with n in names
	set n to contents of n
	if n is not missing value then
		set end of out to my joinList({{my clean(n), ((n as text) is currentName) as text}}, US)
	end if
end repeat
return my joinList(out, RS) & EOT
"#,
        app = quote(app)
    ));
    script
}

/// Identify the open database for the safety check
pub fn database_info_script(app: &str) -> String {
    let mut script = prelude(app);
    script.push('\n');
    script.push_str(&format!(
        r#"tell application {app}
	set fields to {{my clean(name of default document), (version as text), ((count of flattened tasks of default document) as text), ((count of flattened projects of default document) as text)}}
end tell
return my joinList(fields, US) & EOT
"#,
        app = quote(app)
    ));
    script
}
