use std::path::{Path, PathBuf};

use councilvote_core::{MonthRange, RosterRegistry, RosterYear, SiteConfig};
use councilvote_scrape::ExtractorConfig;
use tracing::info;

use crate::RunError;

/// Everything one run needs. Built by the binary from its arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub year: i32,
    pub months: MonthRange,
    pub output: PathBuf,
    pub headless: bool,
    /// 1 runs sequentially; more runs that many isolated workers.
    pub workers: usize,
    pub scrape_summaries: bool,
    pub api_roll_calls: bool,
    pub site: SiteConfig,
    pub roster_file: Option<PathBuf>,
    pub extractor: ExtractorConfig,
}

impl RunConfig {
    pub fn new(year: i32, months: MonthRange) -> Self {
        let site = SiteConfig::default();
        Self {
            year,
            months,
            output: default_output(year, months),
            headless: true,
            workers: 1,
            scrape_summaries: false,
            api_roll_calls: false,
            extractor: ExtractorConfig::default().with_site_base(site.site_base.clone()),
            site,
            roster_file: None,
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }

    /// Roster for the configured year: the built-in table, overlaid with the
    /// roster file when one is given.
    pub fn roster(&self) -> Result<RosterYear, RunError> {
        let builtin = RosterRegistry::builtin()?;
        let Some(path) = &self.roster_file else {
            return Ok(builtin.resolve(self.year)?.clone());
        };
        let custom = load_roster_file(path)?;
        info!(path = %path.display(), years = ?custom.years(), "loaded roster file");
        let merged = builtin.clone().merged_with(custom);
        Ok(merged.resolve(self.year)?.clone())
    }
}

fn load_roster_file(path: &Path) -> Result<RosterRegistry, RunError> {
    let json = std::fs::read_to_string(path).map_err(|source| RunError::RosterFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RosterRegistry::from_json(&json)?)
}

/// `council_votes_<year>_Q<quarter>.csv`.
pub fn default_output(year: i32, months: MonthRange) -> PathBuf {
    PathBuf::from(format!("council_votes_{year}_Q{}.csv", months.quarter()))
}
