//! YAML report export

use std::io::Write;

use serde::Serialize;

use crate::error::{SnapError, SnapResult};

/// Write a report as YAML with a generated-at header
pub fn write_yaml_report<T, W>(report: &T, writer: &mut W) -> SnapResult<()>
where
    T: Serialize,
    W: Write,
{
    writeln!(writer, "# snapkeep report")
        .map_err(|e| SnapError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().to_rfc3339())
        .map_err(|e| SnapError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, report).map_err(|e| SnapError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::PruneReport;

    #[test]
    fn test_prune_report_yaml() {
        let report = PruneReport {
            keep: 7,
            ..Default::default()
        };

        let mut buf = Vec::new();
        write_yaml_report(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# snapkeep report"));
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["keep"].as_u64(), Some(7));
    }
}
