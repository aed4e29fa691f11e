use miette::{IntoDiagnostic, Result};
use modpath_core::{
    Config, LocationManager, Modifier, ModuleDescriptor, ModuleNameSource, ResolvePathRequest,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct DescribeReport<'a> {
    path: String,
    source: Option<ModuleNameSource>,
    module: Option<&'a ModuleDescriptor>,
}

/// Show how a single artifact would be named.
///
/// `module-info.java` and `module-info.class` are read as main descriptors;
/// anything else goes through the same lookup as a path element.
pub fn run(config: &Config, path: &Path, release: Option<u16>, json: bool) -> Result<()> {
    let path = config.resolve_path(path);
    let manager = LocationManager::from_config(config);

    let is_descriptor_file = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("java") || e.eq_ignore_ascii_case("class"));
    let found = if is_descriptor_file {
        manager.parse_module_descriptor(&path)
    } else {
        let release = release.or_else(|| config.effective_release());
        manager.resolve_path(&ResolvePathRequest::of(&path).with_release(release))
    }
    .into_diagnostic()?;

    if json {
        let report = DescribeReport {
            path: path.display().to_string(),
            source: found.module_name_source,
            module: found.descriptor.as_ref(),
        };
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{json}");
        return Ok(());
    }

    match (&found.descriptor, found.module_name_source) {
        (Some(descriptor), Some(source)) => print_human(descriptor, source).into_diagnostic(),
        _ => {
            println!("{}: no module name, class path only", path.display());
            Ok(())
        }
    }
}

fn print_human(descriptor: &ModuleDescriptor, source: ModuleNameSource) -> io::Result<()> {
    let mut out = io::stdout().lock();

    let kind = if descriptor.is_automatic() {
        "automatic module"
    } else {
        "module"
    };
    writeln!(out, "{kind} {} (from {source})", descriptor.name())?;

    for requires in descriptor.requires() {
        let mut line = String::from("  requires ");
        for modifier in requires.modifiers() {
            line.push_str(match modifier {
                Modifier::Static => "static ",
                Modifier::Transitive => "transitive ",
            });
        }
        line.push_str(requires.name());
        writeln!(out, "{line}")?;
    }

    for exports in descriptor.exports() {
        match exports.targets() {
            Some(targets) => {
                let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
                writeln!(out, "  exports {} to {}", exports.source(), targets.join(", "))?;
            }
            None => writeln!(out, "  exports {}", exports.source())?,
        }
    }

    for service in descriptor.uses() {
        writeln!(out, "  uses {service}")?;
    }

    for provides in descriptor.provides() {
        writeln!(
            out,
            "  provides {} with {}",
            provides.service(),
            provides.providers().join(", ")
        )?;
    }
    Ok(())
}
