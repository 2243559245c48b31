use clap::{Parser, Subcommand};
use docnav::search::group_by_category;
use docnav::site::Site;
use docnav::types::parse_slug;
use docnav::verification::resolve_verification_status;
use docnav::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("DOCNAV_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("DOCNAV_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docnav")]
#[command(about = "Navigation and search engine for Markdown documentation sites")]
#[command(long_about = "\
Navigation and search engine for Markdown documentation sites

The sidebar tree drives everything: display order, previous/next reading
order, breadcrumbs and the verified/non-functional badges.

Site structure:

  site/
  ├── config.toml                  # Site config (optional, merged over defaults)
  ├── sidebar.toml                 # Sidebar tree and redirects
  ├── messages/
  │   ├── en.json                  # Sidebar titles: {\"sidebar\": {\"key\": \"Title\"}}
  │   └── fr.json
  └── content/
      ├── en/
      │   ├── intro.md             # /docs/intro
      │   └── plugins/
      │       ├── index.md         # /docs/plugins
      │       └── getting-started.md
      └── fr/
          └── intro.md             # /fr/docs/intro

Titles resolve: front matter title → first heading → file name.
Missing translations fall back to the default locale.

Set DOCNAV_LOG (e.g. DOCNAV_LOG=docnav=debug) for detailed logs.
Run 'docnav gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory for `build`
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the sidebar against the content directory
    Check,
    /// Show previous/next links of a page
    Nav {
        /// Slug, e.g. `plugins/getting-started`
        slug: String,
        #[arg(long)]
        locale: Option<String>,
    },
    /// Show the breadcrumb trail of an href
    Breadcrumb {
        /// Href, e.g. `/docs/plugins/events`
        href: String,
        #[arg(long)]
        locale: Option<String>,
    },
    /// Show verification flags and redirect of an href
    Status {
        href: String,
    },
    /// Search the documentation
    Search {
        query: String,
        #[arg(long)]
        locale: Option<String>,
        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print the JSON response instead of grouped text
        #[arg(long)]
        json: bool,
    },
    /// Show the full page context of a document
    Page {
        slug: String,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Write search indexes, reading order, llms.txt and sitemap.xml
    Build,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site = Site::open(&cli.source)?;
    let default_locale = site.config().i18n.default_locale.clone();
    let locale_or_default =
        |locale: Option<String>| locale.unwrap_or_else(|| default_locale.clone());

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = site.check()?;
            output::print_check_output(site.sidebar(), &report);
            if !report.is_ok() {
                return Err("sidebar check failed".into());
            }
            println!("==> Sidebar is consistent");
        }
        Command::Nav { slug, locale } => {
            let slug = parse_slug(&slug);
            let nav = site.navigation(&slug, &locale_or_default(locale));
            output::print_navigation(&site.href_for(&slug), &nav);
        }
        Command::Breadcrumb { href, locale } => {
            let crumbs = site.breadcrumbs_for_href(&href, &locale_or_default(locale));
            output::print_breadcrumbs(&href, &crumbs);
        }
        Command::Status { href } => {
            let status = resolve_verification_status(site.sidebar(), &href);
            output::print_status(&href, &status, site.sidebar().redirect_for(&href));
        }
        Command::Search {
            query,
            locale,
            limit,
            json,
        } => {
            let response = site.search(&query, &locale_or_default(locale), limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let groups = group_by_category(response.results);
                output::print_search_results(&query, &groups, site.config());
            }
        }
        Command::Page { slug, locale, json } => {
            let slug = parse_slug(&slug);
            let Some(page) = site.page(&slug, &locale_or_default(locale))? else {
                return Err(format!("no document at {}", site.href_for(&slug)).into());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                output::print_page(&page);
            }
        }
        Command::Build => {
            println!("==> Generating {}", cli.output.display());
            let report = generate::generate(&site, &cli.output)?;
            output::print_generate_output(&report, &cli.output);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `DOCNAV_LOG` takes precedence over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCNAV_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
