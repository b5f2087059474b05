//! ledgerlens-ingest: statement source abstractions, schema detection over
//! unlabeled headers, and value normalization (amounts, dates).

pub mod normalize;
pub mod readers;
pub mod schema;
pub mod types;

pub use normalize::{normalize_date, parse_amount};
pub use readers::load_tabular;
pub use schema::{ColumnRoles, clean_column_name, detect_header_row, find_column};
pub use types::{DocumentSource, RawRecord, RawTable, TabularSource};
