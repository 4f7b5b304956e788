/*
 * mirrorselect - Fastest archive mirror selection for Ubuntu.
 * Copyright (C) 2025  mirrorselect contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

mod config;
mod discovery;
mod error;
mod logging;
mod mirror;
mod report;
mod selector;
mod system;

use config::Config;
use discovery::LaunchpadSource;
use mirror::Protocol;
use selector::{Prober, SelectOptions, Selection, SelectionStatus, Selector, DOWNLOAD_TIMEOUT};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Copyright (C) 2025  mirrorselect contributors\n",
    "License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>\n\n",
    "This is free software; you are free to change and redistribute it.\n",
    "There is NO WARRANTY, to the extent permitted by law."
);

#[derive(Parser)]
#[command(name = "mirrorselect")]
#[command(version = VERSION)]
#[command(long_version = LONG_VERSION)]
#[command(about = "Select the fastest Ubuntu archive mirrors.")]
struct Cli {
    #[arg(short = 'a', long, help = "Architecture to select mirrors for (amd64, i386, arm64, armhf, ppc64el, riscv64, s390x) [default: host]")]
    arch: Option<String>,
    #[arg(short = 'c', long, help = "Country to select mirrors from (ISO 3166-1 alpha-2) [default: detected from public IP]")]
    country: Option<String>,
    #[arg(short = 'm', long, help = "Maximum number of mirrors to test for throughput [default: 5]")]
    max: Option<usize>,
    #[arg(short = 'p', long, value_enum, help = "Protocol to select mirrors for [default: any]")]
    protocol: Option<Protocol>,
    #[arg(short = 'r', long, help = "Release codename to select mirrors for [default: current system release]")]
    release: Option<String>,
    #[arg(short = 't', long, help = "Timeout for latency tests in milliseconds [default: 500]")]
    timeout: Option<u64>,
    #[arg(short = 'v', long, help = "Log verbosity (DEBUG, INFO, WARN, ERROR) [default: INFO]")]
    verbosity: Option<String>,
    #[arg(long, value_name = "FILE", help = "Read configuration from FILE")]
    config: Option<PathBuf>,
    #[arg(long, help = "Print one 'N. speed url' line per mirror instead of a table")]
    plain: bool,
}

impl Cli {
    /// Flags win over every configuration source
    fn apply(&self, config: &mut Config) {
        if let Some(arch) = &self.arch {
            config.arch = Some(arch.clone());
        }
        if let Some(country) = &self.country {
            config.country = Some(country.clone());
        }
        if let Some(max) = self.max {
            config.max_mirrors = max;
        }
        if let Some(protocol) = self.protocol {
            config.protocol = protocol;
        }
        if let Some(release) = &self.release {
            config.release = Some(release.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = timeout;
        }
        if let Some(verbosity) = &self.verbosity {
            config.logging.level = verbosity.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref())?;
    let mut config = loaded.config;
    cli.apply(&mut config);
    config.validate()?;

    let level = logging::parse_level(&config.logging.level)?;
    logging::init_with_file(level, config.logging.file.as_deref());
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    let arch = system::validate_arch(config.arch.as_deref().unwrap_or(system::host_arch()))?;
    if !system::ARCHIVE_ARCHITECTURES.contains(&arch.as_str()) {
        warn!(
            "{} is served from ports.ubuntu.com, not the archive mirrors listed here",
            arch
        );
    }

    let release = match &config.release {
        Some(release) => release.clone(),
        None => {
            let release = system::detect_release(
                &config.lsb_release_path,
                Path::new(system::OS_RELEASE_PATH),
            )?;
            info!("Detected distribution codename {}", release);
            release
        }
    };

    let country = match &config.country {
        Some(country) => system::normalize_country(country)?,
        None => {
            let geo = system::lookup_country(&config.geoip_url)
                .await
                .inspect_err(|_| {
                    error!("Unable to auto-detect country code, please specify one manually using --country")
                })?;
            info!("Using public IP address {}", geo.ip);
            info!("Detected country {} ({})", geo.country_name, geo.country_code);
            geo.country_code
        }
    };

    debug!(
        "latency timeout {} ms, download timeout {:?}",
        config.timeout_ms, DOWNLOAD_TIMEOUT
    );
    let prober = Prober::new(Duration::from_millis(config.timeout_ms), &release)?;
    let options = SelectOptions {
        country,
        protocol: config.protocol,
        max_mirrors: config.max_mirrors,
        latency_concurrency: config.latency_concurrency,
        download_concurrency: config.download_concurrency,
        show_progress: console::Term::stderr().is_term(),
    };

    eprintln!(
        "{}",
        style(format!(
            ":: selecting {} mirrors for {} ({}) in {}...",
            options.protocol, release, arch, options.country
        ))
        .bold()
    );

    let source = LaunchpadSource::new(&config.mirror_list_url)?;
    let selection = Selector::new(prober, options)
        .run(&source)
        .await
        .context("could not obtain the mirror list")?;

    print_selection(&selection, cli.plain);
    Ok(())
}

fn print_selection(selection: &Selection, plain: bool) {
    match selection.status {
        SelectionStatus::NoCandidates => {
            info!("No mirrors to test for the given country and protocol");
        }
        SelectionStatus::NoneResponded => {
            info!("No mirror answered within the timeout");
        }
        SelectionStatus::Selected => {}
    }

    if selection.mirrors.is_empty() {
        info!("Flag options resulted in no mirrors being selected");
        return;
    }

    if plain {
        print!("{}", report::render_plain(&selection.mirrors));
    } else {
        eprintln!("{}", style(":: fastest mirrors:").bold().green());
        println!("{}", report::render_table(&selection.mirrors));
    }
}
