/// Input loading.
///
/// Submodules:
/// - `delimited`: reads the `date`/`value` CSV export into a `Dataset`.

pub mod delimited;

pub use delimited::{load_dataset, parse_dataset, parse_timestamp};
