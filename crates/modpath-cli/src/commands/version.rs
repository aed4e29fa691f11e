use miette::{IntoDiagnostic, Result};
use modpath_core::version::{version_string, RESOLVE_SCHEMA_VERSION, VERSION};

pub fn run(json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "version": VERSION,
            "resolve_schema_version": RESOLVE_SCHEMA_VERSION,
        });
        println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
