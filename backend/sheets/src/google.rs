use std::time::Duration;

use records::{
    batch::{CellWrite, RangeSpec},
    codec::Grid,
};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    SheetStore, StoreError,
    auth::{ServiceAccount, TokenSource},
};

pub const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const VALUE_INPUT_OPTION: &str = "USER_ENTERED";
const BATCH_UPDATE: &str = "values:batchUpdate";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdate<'a> {
    value_input_option: &'a str,
    data: Vec<CellData<'a>>,
}

#[derive(Serialize)]
struct CellData<'a> {
    range: String,
    values: [[&'a str; 1]; 1],
}

pub struct GoogleSheets {
    client: Client,
    spreadsheet_id: String,
    tokens: TokenSource,
}

impl GoogleSheets {
    pub fn new(
        spreadsheet_id: &str,
        account: ServiceAccount,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        let tokens = TokenSource::new(account, client.clone())?;

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.to_string(),
            tokens,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url =
            Url::parse(SHEETS_ENDPOINT).map_err(|e| StoreError::Range(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| StoreError::Range(SHEETS_ENDPOINT.to_string()))?
            .push(&self.spreadsheet_id)
            .extend(segments);

        Ok(url)
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Spreadsheet API error {status}: {body}");

    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetStore for GoogleSheets {
    async fn read_grid(&self, range: &RangeSpec) -> Result<Grid, StoreError> {
        let range = range.to_string();
        let url = self.url(&["values", range.as_str()])?;
        let token = self.tokens.access_token().await?;

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let body: ValueRange = check(response).await?.json().await?;

        Ok(Grid::new(
            body.values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        ))
    }

    async fn batch_write(&self, writes: &[CellWrite]) -> Result<(), StoreError> {
        let url = self.url(&[BATCH_UPDATE])?;
        let token = self.tokens.access_token().await?;

        let payload = BatchUpdate {
            value_input_option: VALUE_INPUT_OPTION,
            data: writes
                .iter()
                .map(|write| CellData {
                    range: write.range.to_string(),
                    values: [[write.value.as_str()]],
                })
                .collect(),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        check(response).await?;

        info!("Wrote {} cells", writes.len());

        Ok(())
    }
}
