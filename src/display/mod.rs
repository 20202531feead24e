//! Display formatting for terminal output

pub mod archive;

pub use archive::{
    format_age, format_archive_list, format_archive_report, format_prune_plan,
    format_prune_report, format_size,
};
