use anyhow::{Context, Result, anyhow, bail};
use fixture_guard::{
    Backend, CommandExecutor, DeclaredCase, ExclusionSet, NamePattern, ScanConfig, Suite,
    read_manifest, render_cases, scan, setup_logging, write_manifest,
};
use std::{env, fs::File, process::ExitCode};

const USAGE: &str = "\
Usage:
  fixture-guard manifest <root> <pattern> [backend|- [excluded-id ...]]
  fixture-guard cases <root> <pattern> [excluded-id ...]
  fixture-guard check <root> <pattern> <manifest.csv> [excluded-id ...]
  fixture-guard run <root> <pattern> <manifest.csv> <program> [args ...]";

/// Placeholder for the manifest backend column when only excluded identifiers follow.
const NO_BACKEND: &str = "-";

fn main() -> Result<ExitCode> {
    setup_logging()?;

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    match command.as_str() {
        "manifest" => manifest(rest),
        "cases" => cases(rest),
        "check" => check(rest),
        "run" => run(rest),
        other => Err(anyhow!("unknown command `{other}`\n{USAGE}")),
    }
}

fn manifest(args: &[String]) -> Result<ExitCode> {
    let [root, pattern, rest @ ..] = args else {
        bail!(USAGE);
    };
    let (backend, excluded) = match rest.split_first() {
        Some((backend, excluded)) => {
            let backend = (backend.as_str() != NO_BACKEND).then(|| Backend::new(backend));
            (backend, excluded)
        }
        None => (None, rest),
    };
    let fixtures = scan(root.as_ref(), &scan_config(pattern, excluded)?)?;

    write_manifest(&fixtures, backend.as_ref(), std::io::stdout())?;
    Ok(ExitCode::SUCCESS)
}

fn cases(args: &[String]) -> Result<ExitCode> {
    let [root, pattern, excluded @ ..] = args else {
        bail!(USAGE);
    };
    let fixtures = scan(root.as_ref(), &scan_config(pattern, excluded)?)?;

    print!("{}", render_cases(&fixtures));
    Ok(ExitCode::SUCCESS)
}

fn scan_config(pattern: &str, excluded: &[String]) -> Result<ScanConfig> {
    let excluded: ExclusionSet = excluded.iter().map(String::as_str).collect();
    Ok(ScanConfig::new(NamePattern::new(pattern)?).excluded(excluded))
}

fn check(args: &[String]) -> Result<ExitCode> {
    let [root, pattern, manifest_path, excluded @ ..] = args else {
        bail!(USAGE);
    };
    let suite = excluded
        .iter()
        .fold(load_suite(root, pattern, manifest_path)?, |suite, id| {
            suite.exclude(id.as_str())
        });

    match suite.check_complete() {
        Ok(()) => {
            println!("all fixtures present");
            Ok(ExitCode::SUCCESS)
        }
        Err(fixture_guard::Error::Completeness(drift)) => {
            println!("{drift}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn run(args: &[String]) -> Result<ExitCode> {
    let [root, pattern, manifest_path, program, program_args @ ..] = args else {
        bail!(USAGE);
    };
    let suite = load_suite(root, pattern, manifest_path)?;
    let executor = CommandExecutor::new(program).args(program_args);

    let report = suite.run(&executor)?;
    println!("{report}");

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_suite(root: &str, pattern: &str, manifest_path: &str) -> Result<Suite> {
    let file =
        File::open(manifest_path).with_context(|| format!("cannot open `{manifest_path}`"))?;
    let declared: Vec<DeclaredCase> = read_manifest(file)?;
    Ok(Suite::new(root, pattern)?.declare_all(declared))
}
