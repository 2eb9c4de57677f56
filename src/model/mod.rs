//! OmniFocus entity models
//!
//! These are transient records: OmniFocus owns the data and nothing here is
//! cached between calls. Submodules:
//! - `status`: enums with tolerant string parsing
//! - `task`, `project`, `folder`, `tag`, `perspective`: one record per kind
//! - `dates`: parsing of caller-supplied dates

mod dates;
mod folder;
mod perspective;
mod project;
mod status;
mod tag;
mod task;

pub use dates::{format_datetime, parse_datetime};
pub use folder::Folder;
pub use perspective::{DatabaseInfo, Perspective};
pub use project::{Project, ReviewInterval, ReviewUnit};
pub use status::{ProjectStatus, TaskStatus};
pub use tag::{Tag, same_name};
pub use task::Task;
