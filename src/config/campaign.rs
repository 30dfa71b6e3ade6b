use crate::adapters::uniprot::DEFAULT_UNIPROT_URL;
use crate::utils::error::{FoldError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_residues,
    validate_unique, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub campaign: CampaignInfo,
    pub mutation: MutationConfig,
    pub proteins: Vec<ProteinEntry>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignInfo {
    pub name: String,
    pub ligand: String,
    #[serde(default = "default_organism")]
    pub organism: String,
    #[serde(default)]
    pub signal_peptide_length: usize,
    pub expected_length: Option<usize>,
    pub wild_type_motif: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    pub start: usize, // 成熟序列中的 0-based 起點
    pub length: usize,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinEntry {
    pub name: String,
    pub accession: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

fn default_organism() -> String {
    "HUMAN".to_string()
}

fn default_base_url() -> String {
    DEFAULT_UNIPROT_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_retry_attempts() -> u32 {
    1
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

const TIMP3_VARIANTS: [&str; 21] = [
    "AGESNA", "AGESNC", "AGESTA", "AGESTC", "ASESNA", "ASESNC", "ASESTA", "ASESTC", "YSEDIC",
    "YSEDID", "YSEDMC", "YSEDMD", "YSEDPC", "YSEDPD", "YKEDIC", "YKEDID", "YKEDMC", "YKEDMD",
    "YKEDPC", "YKEDPD", "ASESLC",
];

const TIMP3_PANEL: [(&str, &str); 6] = [
    ("TIMP3", "P35625"),
    ("MMP9", "P14780"),
    ("MMP2", "P08253"),
    ("MMP10", "P09238"),
    ("ADAM10", "O14672"),
    ("ADAM17", "P78536"),
];

impl CampaignConfig {
    /// TIMP3 N-domain motif scan against the MMP/ADAM panel.
    pub fn timp3_default() -> Self {
        Self {
            campaign: CampaignInfo {
                name: "timp3-mmp".to_string(),
                ligand: "TIMP3".to_string(),
                organism: default_organism(),
                signal_peptide_length: 23,
                expected_length: Some(211),
                wild_type_motif: Some("ASESLC".to_string()),
            },
            mutation: MutationConfig {
                start: 62,
                length: 6,
                variants: TIMP3_VARIANTS.iter().map(|v| v.to_string()).collect(),
            },
            proteins: TIMP3_PANEL
                .iter()
                .map(|(name, accession)| ProteinEntry {
                    name: name.to_string(),
                    accession: accession.to_string(),
                })
                .collect(),
            source: SourceConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FoldError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UNIPROT_URL})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn ligand(&self) -> Option<&ProteinEntry> {
        self.proteins
            .iter()
            .find(|p| p.name == self.campaign.ligand)
    }

    pub fn targets(&self) -> impl Iterator<Item = &ProteinEntry> {
        self.proteins
            .iter()
            .filter(move |p| p.name != self.campaign.ligand)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    /// Variant label used in headers and file names; the wild-type motif is `WT`.
    pub fn variant_label<'a>(&self, variant: &'a str) -> &'a str {
        match &self.campaign.wild_type_motif {
            Some(wt) if wt.eq_ignore_ascii_case(variant) => "WT",
            _ => variant,
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("campaign.name", &self.campaign.name)?;
        validate_url("source.base_url", &self.source.base_url)?;
        validate_path("output.directory", &self.output.directory)?;
        validate_positive_number(
            "source.timeout_seconds",
            self.source.timeout_seconds as usize,
            1,
        )?;
        validate_positive_number("mutation.length", self.mutation.length, 1)?;

        validate_unique("proteins", self.proteins.iter().map(|p| p.name.as_str()))?;
        for protein in &self.proteins {
            validate_non_empty_string("proteins.accession", &protein.accession)?;
        }

        if self.ligand().is_none() {
            return Err(FoldError::InvalidConfigValueError {
                field: "campaign.ligand".to_string(),
                value: self.campaign.ligand.clone(),
                reason: "Ligand must be listed in [[proteins]]".to_string(),
            });
        }
        if self.targets().next().is_none() {
            return Err(FoldError::MissingConfigError {
                field: "proteins (at least one target besides the ligand)".to_string(),
            });
        }

        if self.mutation.variants.is_empty() {
            return Err(FoldError::MissingConfigError {
                field: "mutation.variants".to_string(),
            });
        }
        for variant in &self.mutation.variants {
            let residues = validate_residues("mutation.variants", variant)?;
            if residues.len() != self.mutation.length {
                return Err(FoldError::InvalidConfigValueError {
                    field: "mutation.variants".to_string(),
                    value: variant.clone(),
                    reason: format!(
                        "Variant length {} does not match mutation.length {}",
                        residues.len(),
                        self.mutation.length
                    ),
                });
            }
        }

        if let Some(wt) = &self.campaign.wild_type_motif {
            validate_residues("campaign.wild_type_motif", wt)?;
        }

        Ok(())
    }
}

impl Validate for CampaignConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
