use crate::domain::model::TaskReport;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Remote protein sequence lookup by accession (UniProt in production).
#[async_trait]
pub trait SequenceSource: Send + Sync {
    async fn fetch_sequence(&self, accession: &str) -> Result<String>;
}

#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self) -> Result<TaskReport>;
}
