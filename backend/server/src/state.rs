use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use records::batch::RangeSpec;
use sheets::{GoogleSheets, SheetStore, auth::ServiceAccount};

use super::config::Config;

pub struct AppState<S> {
    pub config: Config,
    pub store: S,
}

impl<S: SheetStore> AppState<S> {
    pub fn new(config: Config, store: S) -> Arc<Self> {
        Arc::new(Self { config, store })
    }

    pub fn student_range(&self) -> RangeSpec {
        RangeSpec::sheet(&self.config.student_sheet)
    }

    pub fn login_range(&self) -> RangeSpec {
        RangeSpec::sheet(&self.config.login_sheet)
    }
}

impl AppState<GoogleSheets> {
    pub fn connect(config: Config) -> Result<Arc<Self>> {
        let account = ServiceAccount::from_json(&config.google_credentials)
            .context("GOOGLE_CREDENTIALS is not a service account key")?;

        let store = GoogleSheets::new(
            &config.spreadsheet_id,
            account,
            Duration::from_secs(config.upstream_timeout_secs),
        )
        .context("Failed to build spreadsheet client")?;

        Ok(Self::new(config, store))
    }
}
