//! Configuration commands.

use std::io::Write;
use std::path::Path;

use crate::config::CliConfig;
use crate::error::CliResult;

/// Dump the effective configuration as TOML.
pub fn dump(config: &CliConfig, path: &Path, out: &mut impl Write) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)?;
    writeln!(out, "# config.toml ({})", path.display())?;
    writeln!(out, "{}", toml_str)?;
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path, out: &mut impl Write) -> CliResult<()> {
    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    writeln!(out, "config: {}{}", path.display(), status)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_default() {
        let mut out = Vec::new();
        dump(&CliConfig::default(), Path::new("/etc/hearthcal.toml"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# config.toml (/etc/hearthcal.toml)\n"));
        assert!(text.contains("[expansion]\nmax_occurrences = 100\nhorizon_months = 12\n"));
        assert!(text.contains("week_starts_on = \"sunday\""));

        let body = text.split_once('\n').unwrap().1;
        assert_eq!(CliConfig::from_toml_str(body).unwrap(), CliConfig::default());
    }

    #[test]
    fn path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        let mut out = Vec::new();
        path(&missing, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("(not found, using defaults)\n"));

        std::fs::write(&missing, "").unwrap();
        let mut out = Vec::new();
        path(&missing, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("config: {}\n", missing.display())
        );
    }
}
