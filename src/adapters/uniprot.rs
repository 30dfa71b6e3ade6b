use crate::domain::ports::SequenceSource;
use crate::utils::error::{FoldError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_UNIPROT_URL: &str = "https://rest.uniprot.org/uniprotkb";

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// UniProt REST client returning the canonical sequence of an accession.
pub struct UniProtClient {
    client: Client,
    base_url: String,
    retry_attempts: u32,
}

impl UniProtClient {
    pub fn new(base_url: &str, timeout: Duration, retry_attempts: u32) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_attempts,
        })
    }

    pub fn fasta_url(&self, accession: &str) -> String {
        format!("{}/{}.fasta", self.base_url, accession)
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

/// 從 UniProt 回傳的 FASTA 內容取出序列 (略過標頭行)
pub fn sequence_from_fasta_body(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('>'))
        .collect()
}

fn is_retryable(err: &reqwest::Error) -> bool {
    match err.status() {
        Some(status) => status.is_server_error(),
        None => err.is_timeout() || err.is_connect() || err.is_request(),
    }
}

#[async_trait]
impl SequenceSource for UniProtClient {
    async fn fetch_sequence(&self, accession: &str) -> Result<String> {
        let url = self.fasta_url(accession);
        let mut attempt = 0;

        let body = loop {
            tracing::debug!("Fetching {} (attempt {})", url, attempt + 1);
            match self.fetch_once(&url).await {
                Ok(body) => break body,
                Err(e) if attempt < self.retry_attempts && is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!("Request for {} failed ({}), retrying", accession, e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => {
                    return Err(FoldError::SequenceFetchError {
                        accession: accession.to_string(),
                        message: e.to_string(),
                    })
                }
            }
        };

        let sequence = sequence_from_fasta_body(&body);
        if sequence.is_empty() {
            return Err(FoldError::SequenceFetchError {
                accession: accession.to_string(),
                message: "No sequence found in UniProt response".to_string(),
            });
        }

        tracing::info!("Fetched {} ({} residues)", accession, sequence.len());
        Ok(sequence)
    }
}
