//! JSON report export

use std::io::Write;

use serde::Serialize;

use crate::error::{SnapError, SnapResult};

/// Write a report as pretty-printed JSON followed by a newline
pub fn write_json_report<T, W>(report: &T, writer: &mut W) -> SnapResult<()>
where
    T: Serialize,
    W: Write,
{
    serde_json::to_writer_pretty(&mut *writer, report)
        .map_err(|e| SnapError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| SnapError::Export(e.to_string()))?;
    Ok(())
}
