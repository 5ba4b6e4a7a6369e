//! codetran command-line interface.
//!
//! A thin client over the [`codetran_core::TranslationFacade`]: parses
//! flags, reads input from a file or stdin, dispatches to the requested
//! operation, and writes the result to stdout or `-o`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use codetran_analysis::{CellKind, TestFramework, CANDIDATE_LANGUAGES};
use codetran_core::{TranslationFacade, DEFAULT_CACHE_CAPACITY};
use codetran_providers::{
    AnthropicProvider, GoogleProvider, OfflineProvider, OpenAiProvider, ProviderChain, ProviderConfig,
    TranslationOptions, TranslationProvider,
};

/// Translate, explain, and analyze source code across languages.
#[derive(Parser)]
#[command(name = "codetran")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file path, or "-" for stdin. Required unless `--list-languages`.
    input: Option<String>,

    /// Source language; omitted means auto-detect.
    #[arg(short = 'f', long = "from", env = "CODETRAN_FROM")]
    from: Option<String>,

    /// Target language. Required for translation.
    #[arg(short = 't', long = "to", env = "CODETRAN_TO")]
    to: Option<String>,

    /// Output file; omitted means stdout.
    #[arg(short = 'o', long = "output", env = "CODETRAN_OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Force a specific provider.
    #[arg(long, value_parser = ["openai", "anthropic", "google", "offline"], env = "CODETRAN_PROVIDER")]
    provider: Option<String>,

    /// Force the offline provider regardless of configured credentials.
    #[arg(long)]
    offline: bool,

    /// Print the supported-language set and exit.
    #[arg(long)]
    list_languages: bool,

    /// Print the detected language of the input and exit.
    #[arg(long)]
    detect: bool,

    /// Run the explanation operation.
    #[arg(long)]
    explain: bool,

    /// Run the explanation operation in line-by-line mode.
    #[arg(long)]
    explain_lines: bool,

    /// Run static analysis and print the module report.
    #[arg(long)]
    analyze: bool,

    /// Run the test-skeleton generator.
    #[arg(long)]
    generate_tests: bool,

    /// Target framework for `--generate-tests`; omitted uses the language default.
    #[arg(long)]
    test_framework: Option<String>,

    /// Treat input as notebook JSON; translate and emit notebook JSON.
    #[arg(long)]
    notebook: bool,

    /// Diagnostic output on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Process a glob of files instead of a single input (automation entrypoint).
    #[arg(long, env = "CODETRAN_GLOB")]
    batch: Option<String>,

    /// Abort the batch run on the first per-file failure.
    #[arg(long, env = "CODETRAN_FAIL_ON_ERROR")]
    fail_on_error: bool,

    /// Emit a JSON summary report after a batch run.
    #[arg(long, env = "CODETRAN_GENERATE_REPORT")]
    generate_report: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("codetran=debug").init();
    }

    if cli.list_languages {
        println!("{}", CANDIDATE_LANGUAGES.join("\n"));
        return Ok(());
    }

    let facade = build_facade(&cli)?;

    if let Some(glob) = &cli.batch {
        return run_batch(&cli, &facade, glob).await;
    }

    let input_path = cli.input.as_deref().context("missing required input file (or \"-\" for stdin)")?;
    let code = read_input(input_path)?;

    if cli.detect {
        match facade.detect(&code) {
            Some(language) => println!("{language}"),
            None => println!("undetected"),
        }
        return Ok(());
    }

    let output = if cli.notebook {
        run_notebook(&cli, &facade, &code).await?
    } else if cli.explain || cli.explain_lines {
        facade.explain(&code, cli.from.as_deref(), cli.explain_lines).await?
    } else if cli.analyze {
        format_analysis(&facade.analyze(&code, cli.from.as_deref())?)
    } else if cli.generate_tests {
        let framework = parse_framework(cli.test_framework.as_deref())?;
        facade.generate_tests(&code, cli.from.as_deref(), framework)?
    } else {
        let target = cli.to.as_deref().context("--to is required for translation")?;
        let (text, _confidence) =
            facade.translate(&code, cli.from.as_deref(), target, &TranslationOptions::default()).await?;
        text
    };

    write_output(cli.output.as_deref(), &output)
}

fn build_facade(cli: &Cli) -> Result<TranslationFacade> {
    let offline: Arc<dyn TranslationProvider> = Arc::new(OfflineProvider);

    if cli.offline || cli.provider.as_deref() == Some("offline") {
        return Ok(TranslationFacade::new(ProviderChain::new(Vec::new()), offline, DEFAULT_CACHE_CAPACITY));
    }

    let mut providers: Vec<Arc<dyn TranslationProvider>> = Vec::new();
    let forced = cli.provider.as_deref();

    if forced.is_none_or(|p| p == "anthropic") {
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            providers.push(Arc::new(AnthropicProvider::new(ProviderConfig::new(key, "claude-3-5-sonnet-20241022"))));
        }
    }
    if forced.is_none_or(|p| p == "openai") {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            providers.push(Arc::new(OpenAiProvider::openai(ProviderConfig::new(key, "gpt-4o"))));
        }
    }
    if forced.is_none_or(|p| p == "google") {
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            providers.push(Arc::new(GoogleProvider::new(ProviderConfig::new(key, "gemini-1.5-pro"))));
        }
    }

    Ok(TranslationFacade::new(ProviderChain::new(providers), offline, DEFAULT_CACHE_CAPACITY))
}

fn parse_framework(name: Option<&str>) -> Result<Option<TestFramework>> {
    match name {
        None => Ok(None),
        Some("pytest") => Ok(Some(TestFramework::Pytest)),
        Some("jest") => Ok(Some(TestFramework::Jest)),
        Some("junit") => Ok(Some(TestFramework::Junit)),
        Some(other) => bail!("unknown test framework: {other}"),
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading input file {path}"))
    }
}

fn write_output(path: Option<&std::path::Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text).with_context(|| format!("writing output file {}", path.display())),
        None => {
            io::stdout().write_all(text.as_bytes()).context("writing to stdout")?;
            if !text.ends_with('\n') {
                println!();
            }
            Ok(())
        },
    }
}

fn format_analysis(analysis: &codetran_analysis::CodeAnalysis) -> String {
    let mut out = format!(
        "language: {}\nlines: {} ({} code, {} comment, {} blank)\nfunctions: {}\naverage complexity: {:.2}\nmax complexity: {}\noverall Big-O: {}\n",
        analysis.language,
        analysis.total_lines,
        analysis.code_lines,
        analysis.comment_lines,
        analysis.blank_lines,
        analysis.functions.len(),
        analysis.average_complexity,
        analysis.max_complexity,
        analysis.overall_big_o.notation(),
    );
    for function in &analysis.functions {
        out.push_str(&format!(
            "  {} [lines {}-{}]: complexity={} nesting={} big_o={}\n",
            function.name,
            function.start_line,
            function.end_line,
            function.cyclomatic_complexity,
            function.nesting_depth,
            function.estimated_big_o.notation(),
        ));
    }
    for suggestion in &analysis.suggestions {
        out.push_str(&format!("suggestion: {suggestion}\n"));
    }
    out
}

async fn run_notebook(cli: &Cli, facade: &TranslationFacade, raw: &str) -> Result<String> {
    let target = cli.to.as_deref().context("--to is required for --notebook")?;
    let mut doc = codetran_analysis::parse_notebook(raw)?;

    // codetran_analysis::transform's per-cell callback is synchronous, so the
    // async facade calls are resolved up front, in cell order, and replayed
    // into it below.
    let mut translations = Vec::new();
    for cell in &doc.cells {
        if cell.kind == CellKind::Code {
            let source_language =
                cli.from.clone().or_else(|| facade.detect(&cell.source).map(str::to_string)).unwrap_or_else(|| "unknown".to_string());
            let result = facade
                .translate(&cell.source, cli.from.as_deref(), target, &TranslationOptions::default())
                .await
                .map(|(text, confidence)| (text, source_language, confidence))
                .map_err(|error| error.to_string());
            translations.push(result);
        }
    }

    let mut translations = translations.into_iter();
    let stats = codetran_analysis::transform_notebook(&mut doc, target, |_source| {
        translations.next().unwrap_or_else(|| Err("no translation result available".to_string()))
    });

    if cli.verbose {
        eprintln!(
            "notebook: {} cells ({} code, {} markdown), {} translated, {} failed",
            stats.total_cells, stats.code_cells, stats.markdown_cells, stats.translated_cells, stats.failed_cells
        );
    }

    codetran_analysis::serialize_notebook(&doc).map_err(Into::into)
}

async fn run_batch(cli: &Cli, facade: &TranslationFacade, glob_pattern: &str) -> Result<()> {
    let target = cli.to.as_deref().context("--to is required for --batch")?;
    let output_dir = cli.output.as_deref().context("-o/--output is required for --batch")?;
    fs::create_dir_all(output_dir).with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let mut report = Vec::new();
    let mut any_failed = false;

    for entry in glob::glob(glob_pattern).with_context(|| format!("invalid glob pattern {glob_pattern}"))? {
        let path = entry.context("reading glob entry")?;
        let code = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;

        let result = facade.translate(&code, cli.from.as_deref(), target, &TranslationOptions::default()).await;
        match result {
            Ok((text, _confidence)) => {
                if let Some(file_name) = path.file_name() {
                    fs::write(output_dir.join(file_name), text)?;
                }
                report.push(serde_json::json!({"file": path.display().to_string(), "status": "ok"}));
            },
            Err(error) => {
                any_failed = true;
                report.push(serde_json::json!({"file": path.display().to_string(), "status": "error", "error": error.to_string()}));
                if cli.fail_on_error {
                    bail!("translation failed for {}: {error}", path.display());
                }
            },
        }
    }

    if cli.generate_report {
        let report_path = output_dir.join("codetran_report.json");
        fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    }

    if any_failed && cli.fail_on_error {
        bail!("one or more files failed translation");
    }
    Ok(())
}
