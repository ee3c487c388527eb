use crate::config::{validate_source_url, Config};
use crate::engine::Aggregator;
use crate::extract::extract_site;
use crate::services::{init_tracing, read_report, run_and_publish, BlobStore, ReqwestFetcher};
use crate::types::{SiteId, SourceSite};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "dsp-numbers",
    version,
    about = "Scrape GOV.UK Pay, Notify and Forms performance numbers into one JSON blob"
)]
pub struct Cli {
    /// Root directory of the blob store
    #[arg(long, global = true, env = "DSP_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Tracing directives (defaults to RUST_LOG, then "info,dsp_numbers=debug")
    #[arg(long = "log", global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape all sites and overwrite the published report
    Run(SourceArgs),
    /// Scrape all sites and print the report without publishing
    Scrape(SourceArgs),
    /// Run one site's extractor over a local HTML file ("-" for stdin)
    Extract(ExtractArgs),
    /// Print the currently published report
    Show,
    /// Serve the published report over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Override a page URL, e.g. --source pay=http://localhost:9000/ (repeatable)
    #[arg(long = "source", value_parser = parse_source)]
    sources: Vec<(SiteId, String)>,
}

#[derive(Args)]
struct ExtractArgs {
    /// pay | notify | forms
    #[arg(long, value_parser = parse_site)]
    site: SiteId,
    input: String,
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address
    #[arg(long, env = "DSP_BIND_ADDR")]
    bind: Option<String>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let bind = match &cli.cmd {
        Command::Serve(args) => args.bind.clone(),
        _ => None,
    };
    let cfg = match Config::resolve(cli.store_dir, bind.as_deref(), cli.log_filter) {
        Ok(cfg) => cfg,
        Err(e) => return fail(e),
    };
    init_tracing(cfg.log_filter.as_deref());

    match cli.cmd {
        Command::Run(args) => cmd_run(&cfg, args),
        Command::Scrape(args) => cmd_scrape(args),
        Command::Extract(args) => cmd_extract(args),
        Command::Show => cmd_show(&cfg),
        Command::Serve(_) => cmd_serve(&cfg),
    }
}

fn cmd_run(cfg: &Config, args: SourceArgs) -> ExitCode {
    let result = (|| -> crate::Result<()> {
        let store = cfg.open_store()?;
        let fetcher = ReqwestFetcher::new()?;
        run_and_publish(&fetcher, sites_from(args)?, &store)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn cmd_scrape(args: SourceArgs) -> ExitCode {
    let result = (|| -> crate::Result<()> {
        let fetcher = ReqwestFetcher::new()?;
        let report = Aggregator::new(&fetcher, sites_from(args)?).run();
        print_json(&report)
    })();
    finish(result)
}

fn cmd_extract(args: ExtractArgs) -> ExitCode {
    let result = read_input(&args.input)
        .and_then(|html| extract_site(args.site, &html))
        .and_then(|metrics| print_json(&metrics));
    finish(result)
}

fn cmd_show(cfg: &Config) -> ExitCode {
    let result = cfg.open_store().and_then(|store| match read_report(&store)? {
        Some(value) => print_json(&value),
        None => Err(crate::DspError::storage_error(
            "read",
            format!("{} has not been published yet", crate::types::BlobKey::report()),
        )),
    });
    finish(result)
}

fn cmd_serve(cfg: &Config) -> ExitCode {
    let result = (|| -> anyhow::Result<()> {
        let store: Arc<dyn BlobStore> = Arc::new(cfg.open_store()?);
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(crate::server::serve(cfg.bind_addr, store))?;
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Default sites with any `--source` overrides applied.
fn sites_from(args: SourceArgs) -> crate::Result<Vec<SourceSite>> {
    let mut sites = SourceSite::defaults();
    for (id, url) in args.sources {
        validate_source_url(&url)?;
        if let Some(site) = sites.iter_mut().find(|s| s.id == id) {
            site.url = url;
        }
    }
    Ok(sites)
}

fn parse_site(raw: &str) -> Result<SiteId, String> {
    SiteId::from_raw(raw).ok_or_else(|| format!("unknown site {raw:?} (expected pay, notify or forms)"))
}

fn parse_source(raw: &str) -> Result<(SiteId, String), String> {
    let (site, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <site>=<url>, got {raw:?}"))?;
    Ok((parse_site(site)?, url.to_string()))
}

fn read_input(input: &str) -> crate::Result<String> {
    use std::io::Read;
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn finish(res: crate::Result<()>) -> ExitCode {
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(e: crate::DspError) -> ExitCode {
    eprintln!("Error: {e}");
    ExitCode::FAILURE
}

fn print_json<T: serde::Serialize>(val: &T) -> crate::Result<()> {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
