use miette::{IntoDiagnostic, Result};

pub fn run(segments: &[String], json: bool) -> Result<()> {
    let expanded = modpath_core::expand(segments).into_diagnostic()?;

    if json {
        let json = serde_json::to_string_pretty(&expanded).into_diagnostic()?;
        println!("{json}");
    } else {
        for path in expanded {
            println!("{path}");
        }
    }
    Ok(())
}
