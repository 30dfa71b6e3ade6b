use crate::adapters::storage::LocalStorage;
use crate::adapters::uniprot::UniProtClient;
use crate::config::campaign::CampaignConfig;
use crate::core::fasta::render_fasta;
use crate::domain::model::{FastaRecord, TaskReport};
use crate::domain::ports::{SequenceSource, Storage, Task};
use crate::utils::error::{FoldError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Mature ligand sequence with the mutation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatureLigand {
    pub sequence: String,
    pub start: usize,
    pub length: usize,
}

impl MatureLigand {
    /// 移除訊號胜肽並檢查突變區段是否在序列範圍內
    pub fn from_precursor(
        precursor: &str,
        signal_peptide_length: usize,
        start: usize,
        length: usize,
    ) -> Result<Self> {
        if !precursor.is_ascii() {
            return Err(FoldError::processing("Ligand sequence contains non-ASCII residues"));
        }
        let sequence = precursor.get(signal_peptide_length..).ok_or_else(|| {
            FoldError::processing(format!(
                "Ligand sequence ({} residues) is shorter than its signal peptide ({})",
                precursor.len(),
                signal_peptide_length
            ))
        })?;

        if start + length > sequence.len() {
            return Err(FoldError::processing(format!(
                "Mutation window {}..{} exceeds mature ligand length {}",
                start,
                start + length,
                sequence.len()
            )));
        }

        Ok(Self {
            sequence: sequence.to_string(),
            start,
            length,
        })
    }

    pub fn wild_type_segment(&self) -> &str {
        &self.sequence[self.start..self.start + self.length]
    }

    pub fn with_motif(&self, motif: &str) -> String {
        format!(
            "{}{}{}",
            &self.sequence[..self.start],
            motif,
            &self.sequence[self.start + self.length..]
        )
    }
}

/// Pair file plus its colon-joined `complex_` twin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFiles {
    pub directory: String,
    pub file_name: String,
    pub pair: Vec<FastaRecord>,
    pub complex: FastaRecord,
}

impl PairFiles {
    pub fn new(directory: &str, file_name: String, pair: Vec<FastaRecord>) -> Self {
        let header = pair
            .iter()
            .map(|r| r.header.as_str())
            .collect::<Vec<_>>()
            .join("+");
        let sequence = pair
            .iter()
            .map(|r| r.sequence.as_str())
            .collect::<Vec<_>>()
            .join(":");

        Self {
            directory: directory.to_string(),
            file_name,
            pair,
            complex: FastaRecord::new(header, sequence),
        }
    }

    pub fn pair_path(&self) -> String {
        format!("{}/{}", self.directory, self.file_name)
    }

    pub fn complex_path(&self) -> String {
        format!("{}/complex_{}", self.directory, self.file_name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignManifest {
    pub campaign: String,
    pub generated_at: DateTime<Utc>,
    pub ligand: String,
    pub wild_type_segment: String,
    pub variants: usize,
    pub targets: Vec<String>,
    pub files: Vec<String>,
}

/// Builds every ligand-variant × target pair from fetched sequences.
pub fn build_pairs(
    config: &CampaignConfig,
    sequences: &HashMap<String, String>,
    mature: &MatureLigand,
) -> Result<Vec<PairFiles>> {
    let info = &config.campaign;
    let ligand = config.ligand().ok_or_else(|| FoldError::MissingConfigError {
        field: "campaign.ligand".to_string(),
    })?;

    let mut pairs = Vec::new();
    for variant in &config.mutation.variants {
        let motif = variant.trim().to_ascii_uppercase();
        let label = config.variant_label(&motif);
        let ligand_record = FastaRecord::new(
            format!(
                "{}_VARIANT_{}_{}|{}",
                info.ligand, label, info.organism, ligand.accession
            ),
            mature.with_motif(&motif),
        );

        for target in config.targets() {
            let target_sequence = sequences.get(&target.name).ok_or_else(|| {
                FoldError::processing(format!("No sequence fetched for {}", target.name))
            })?;
            let target_record = FastaRecord::new(
                format!("{}_{}|{}", target.name, info.organism, target.accession),
                target_sequence.clone(),
            );

            pairs.push(PairFiles::new(
                &target.name,
                format!("{}_v_{}_C_{}.fasta", info.ligand, target.name, label),
                vec![ligand_record.clone(), target_record],
            ));
        }
    }

    Ok(pairs)
}

pub struct CampaignTask<S: SequenceSource> {
    config: CampaignConfig,
    source: S,
    storage: LocalStorage,
}

impl<S: SequenceSource> CampaignTask<S> {
    pub fn new(config: CampaignConfig, source: S) -> Result<Self> {
        config.validate()?;
        let storage = LocalStorage::new(&config.output.directory);
        Ok(Self {
            config,
            source,
            storage,
        })
    }

    async fn fetch_all(&self) -> Result<HashMap<String, String>> {
        tracing::info!("Fetching protein sequences from UniProt...");
        let mut sequences = HashMap::new();

        for protein in &self.config.proteins {
            match self.source.fetch_sequence(&protein.accession).await {
                Ok(sequence) => {
                    sequences.insert(protein.name.clone(), sequence);
                }
                Err(e) => {
                    tracing::error!("Aborting file generation due to sequence fetch failure.");
                    return Err(e);
                }
            }
        }

        Ok(sequences)
    }
}

impl CampaignTask<UniProtClient> {
    /// Builds the UniProt client from `[source]` and validates the campaign.
    pub fn from_config(config: CampaignConfig) -> Result<Self> {
        let source = UniProtClient::new(
            &config.source.base_url,
            config.timeout(),
            config.source.retry_attempts,
        )?;
        Self::new(config, source)
    }
}

#[async_trait]
impl<S: SequenceSource> Task for CampaignTask<S> {
    fn name(&self) -> &str {
        "campaign"
    }

    async fn run(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new(self.name());
        let info = &self.config.campaign;
        let sequences = self.fetch_all().await?;

        let precursor = sequences.get(&info.ligand).ok_or_else(|| {
            FoldError::processing(format!("No sequence fetched for ligand {}", info.ligand))
        })?;
        if let Some(expected) = info.expected_length {
            if precursor.len() != expected {
                tracing::warn!(
                    "{} sequence length is {}, expected {}. Proceeding anyway.",
                    info.ligand,
                    precursor.len(),
                    expected
                );
            }
        }

        let mature = MatureLigand::from_precursor(
            precursor,
            info.signal_peptide_length,
            self.config.mutation.start,
            self.config.mutation.length,
        )?;
        let segment = mature.wild_type_segment().to_string();
        tracing::info!("Wild-type segment being replaced: {}", segment);
        if let Some(wt) = &info.wild_type_motif {
            if !wt.eq_ignore_ascii_case(&segment) {
                tracing::warn!(
                    "Configured wild-type motif {} differs from the fetched segment {}",
                    wt,
                    segment
                );
            }
        }

        let pairs = build_pairs(&self.config, &sequences, &mature)?;
        let targets: Vec<String> = self.config.targets().map(|t| t.name.clone()).collect();
        tracing::info!(
            "Generating {} pair files ({} variants * {} targets)",
            pairs.len(),
            self.config.mutation.variants.len(),
            targets.len()
        );

        let mut files = Vec::new();
        for pair in &pairs {
            self.storage
                .write_file(&pair.pair_path(), render_fasta(&pair.pair, None).as_bytes())
                .await?;
            self.storage
                .write_file(
                    &pair.complex_path(),
                    render_fasta(std::slice::from_ref(&pair.complex), None).as_bytes(),
                )
                .await?;
            tracing::debug!("Successfully created file: {}", pair.file_name);

            report.record_output(self.storage.resolve(&pair.pair_path()));
            report.outputs.push(self.storage.resolve(&pair.complex_path()));
            files.push(pair.pair_path());
            files.push(pair.complex_path());
        }

        let manifest = CampaignManifest {
            campaign: info.name.clone(),
            generated_at: Utc::now(),
            ligand: info.ligand.clone(),
            wild_type_segment: segment,
            variants: self.config.mutation.variants.len(),
            targets,
            files,
        };
        self.storage
            .write_file(MANIFEST_FILE, serde_json::to_string_pretty(&manifest)?.as_bytes())
            .await?;

        tracing::info!(
            "Batch generation complete. {} FASTA pairs are ready for AlphaFold-Multimer.",
            report.processed
        );
        Ok(report)
    }
}
