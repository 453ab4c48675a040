//! CLI command for showing the effective configuration.

use crate::config::ExportConfig;
use std::io::Write;

/// Writes where the configuration came from, the effective settings as TOML
/// and the resulting permission table.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or written.
pub fn cmd_config<W: Write>(
    writer: &mut W,
    config: &ExportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match &config.source_path {
        Some(path) => writeln!(writer, "# Loaded from {}", path.display())?,
        None => writeln!(writer, "# No config file found, using defaults")?,
    }
    writeln!(writer, "{}", config.to_toml()?)?;

    writeln!(writer, "# Effective permissions")?;
    for (role, tags) in config.role_permissions()?.to_tag_map() {
        let tags: Vec<&str> = tags.into_iter().collect();
        writeln!(writer, "# {role:<12} {}", tags.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_output() {
        let mut out = Vec::new();
        cmd_config(&mut out, &ExportConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# No config file found"));
        assert!(text.contains("[format]"));
        assert!(text.contains("group_separator = \" \""));
        assert!(text.contains("# warehouse    inventory, issued_items"));
    }
}
