//! AppleScript generation
//!
//! - `value`: literal rendering and escaping (the only place quoting happens)
//! - `statement`: write statements and [`WriteScript`]
//! - `query`: read scripts with `whose` filters
//! - `prelude`: handlers shared by every script

mod prelude;
mod query;
mod statement;
mod value;

pub use query::{Comparison, Condition, Projection, Query, database_info_script, perspectives_script};
pub use statement::{Location, ObjectRef, ResultExpr, Statement, Verb, WriteScript};
pub use value::{Constant, Value, check_text, quote};
