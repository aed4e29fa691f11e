use miette::{IntoDiagnostic, Result};
use modpath_core::{
    Config, ErrorInfo, LocationManager, ModuleNameSource, ResolvePathsRequest, ResolvePathsResult,
    RESOLVE_SCHEMA_VERSION,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Flags of `modpath resolve`, merged over the config file.
#[derive(Debug)]
pub struct ResolveArgs {
    pub main: Option<PathBuf>,
    pub candidates: Vec<PathBuf>,
    pub include_static: bool,
    pub include_all_providers: bool,
    pub add_modules: Vec<String>,
    pub release: Option<u16>,
    pub threads: Option<usize>,
}

/// Machine-readable output of `modpath resolve --json`.
#[derive(Debug, Serialize)]
struct ResolveReport {
    schema_version: u32,
    main_module: Option<String>,
    module_path: Vec<ModulePathEntry>,
    class_path: Vec<String>,
    errors: Vec<ErrorInfo>,
}

#[derive(Debug, Serialize)]
struct ModulePathEntry {
    path: String,
    module: String,
    source: ModuleNameSource,
}

impl ResolveReport {
    fn new(result: &ResolvePathsResult<PathBuf>) -> Self {
        let module_path = result
            .modulepath_elements
            .iter()
            .map(|(path, source)| ModulePathEntry {
                path: path.display().to_string(),
                module: result
                    .path_elements
                    .get(path)
                    .and_then(Option::as_ref)
                    .map(|d| d.name().to_string())
                    .unwrap_or_default(),
                source: *source,
            })
            .collect();

        Self {
            schema_version: RESOLVE_SCHEMA_VERSION,
            main_module: result
                .main_module_descriptor
                .as_ref()
                .map(|d| d.name().to_string()),
            module_path,
            class_path: result
                .classpath_elements
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            errors: result
                .path_errors
                .iter()
                .map(|(path, error)| error.info(path))
                .collect(),
        }
    }
}

pub fn run(config: &Config, args: ResolveArgs, json: bool) -> Result<()> {
    let release = args.release.or_else(|| config.effective_release());
    let manager = LocationManager::from_config(config)
        .with_scan_threads(args.threads.or(config.scan_threads));

    let elements: Vec<PathBuf> = args
        .candidates
        .iter()
        .map(|p| config.resolve_path(p))
        .collect();
    let request = match &args.main {
        Some(main) => ResolvePathsRequest::of_main_path(config.resolve_path(main), elements),
        None => ResolvePathsRequest::of_elements(elements),
    }
    .with_additional_modules(config.add_modules.iter().cloned().chain(args.add_modules))
    .with_include_static(args.include_static || config.include_static)
    .with_include_all_providers(args.include_all_providers || config.include_all_providers)
    .with_release(release);

    let result = manager.resolve_paths(&request).into_diagnostic()?;
    let report = ResolveReport::new(&result);

    if json {
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{json}");
        return Ok(());
    }

    print_human(&report).into_diagnostic()
}

fn print_human(report: &ResolveReport) -> io::Result<()> {
    let mut out = io::stdout().lock();

    if let Some(main) = &report.main_module {
        writeln!(out, "main module: {main}")?;
    }

    writeln!(out, "module path:")?;
    for entry in &report.module_path {
        writeln!(out, "  {}  {} ({})", entry.path, entry.module, entry.source)?;
    }

    writeln!(out, "class path:")?;
    for path in &report.class_path {
        writeln!(out, "  {path}")?;
    }

    if !report.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &report.errors {
            writeln!(out, "  [{}] {}", error.code, error.message)?;
        }
    }
    Ok(())
}
