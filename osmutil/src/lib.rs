//! Small pieces shared by every crate in the converter: a deterministic tag map, a hierarchical
//! timer for long-running phases, logging setup, and JSON helpers.

#[macro_use]
extern crate log;

mod io;
pub mod logger;
mod tags;
mod time;

pub use crate::io::{read_json, to_json, write_json};
pub use crate::tags::Tags;
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
