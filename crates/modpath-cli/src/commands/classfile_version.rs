use miette::{IntoDiagnostic, Result};
use modpath_core::{ClassfileVersion, Config};
use std::path::Path;

pub fn run(config: &Config, file: &Path, json: bool) -> Result<()> {
    let file = config.resolve_path(file);
    let version = ClassfileVersion::from_path(&file).into_diagnostic()?;

    if json {
        let value = serde_json::json!({
            "path": file.display().to_string(),
            "major": version.major(),
            "minor": version.minor(),
            "java_version": version.java_version().as_str(),
            "preview": version.is_preview(),
        });
        let json = serde_json::to_string_pretty(&value).into_diagnostic()?;
        println!("{json}");
    } else {
        println!("{version}");
    }
    Ok(())
}
