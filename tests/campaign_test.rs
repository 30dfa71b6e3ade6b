use anyhow::Result;
use foldprep::core::campaign::{CampaignTask, MANIFEST_FILE};
use foldprep::core::fasta::read_fasta;
use foldprep::{CampaignConfig, Task, TaskRunner, UniProtClient};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

/// 23-residue signal peptide + mature chain with ASESLC at mature index 62.
fn timp3_precursor() -> String {
    let signal = "M".repeat(23);
    let mature = format!("{}ASESLC{}", "C".repeat(62), "K".repeat(120));
    format!("{}{}", signal, mature)
}

fn uniprot_body(accession: &str, sequence: &str) -> String {
    let wrapped: Vec<String> = sequence
        .as_bytes()
        .chunks(60)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect();
    format!(">sp|{}|TEST_HUMAN Test protein\n{}\n", accession, wrapped.join("\n"))
}

#[tokio::test]
async fn test_default_campaign_generates_all_pairs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let panel = [
        ("P35625", timp3_precursor()),
        ("P14780", "MSLWQPLVLV".to_string()),
        ("P08253", "MEALMARGAL".to_string()),
        ("P09238", "MMHLAFLVLL".to_string()),
        ("O14672", "MVLLRVLILL".to_string()),
        ("P78536", "MRQSLLFLTS".to_string()),
    ];
    let mocks: Vec<_> = panel
        .iter()
        .map(|(accession, sequence)| {
            let body = uniprot_body(accession, sequence);
            server.mock(move |when, then| {
                when.method(GET).path(format!("/uniprotkb/{}.fasta", accession));
                then.status(200).body(body);
            })
        })
        .collect();

    let mut config = CampaignConfig::timp3_default();
    config.source.base_url = server.url("/uniprotkb");
    config.output.directory = temp_dir.path().to_string_lossy().into_owned();

    let client = UniProtClient::new(&config.source.base_url, Duration::from_secs(5), 0)?;
    let task = CampaignTask::new(config, client)?;
    let report = TaskRunner::new(task).run().await?;

    for mock in &mocks {
        mock.assert();
    }
    assert_eq!(report.processed, 21 * 5);
    assert_eq!(report.outputs.len(), 21 * 5 * 2);

    let wt_pair = read_fasta(&temp_dir.path().join("MMP2/TIMP3_v_MMP2_C_WT.fasta"))?;
    assert_eq!(wt_pair.records[0].header, "TIMP3_VARIANT_WT_HUMAN|P35625");
    assert_eq!(wt_pair.records[1].header, "MMP2_HUMAN|P08253");
    assert_eq!(wt_pair.records[1].sequence, "MEALMARGAL");
    let mature_wt = &timp3_precursor()[23..];
    assert_eq!(wt_pair.records[0].sequence, mature_wt);

    let mutant = read_fasta(&temp_dir.path().join("ADAM17/TIMP3_v_ADAM17_C_YKEDPD.fasta"))?;
    assert_eq!(mutant.records[0].header, "TIMP3_VARIANT_YKEDPD_HUMAN|P35625");
    assert_eq!(&mutant.records[0].sequence[62..68], "YKEDPD");
    assert_eq!(mutant.records[0].sequence.len(), mature_wt.len());

    let complex_text = std::fs::read_to_string(
        temp_dir
            .path()
            .join("MMP9/complex_TIMP3_v_MMP9_C_AGESNA.fasta"),
    )?;
    let mut lines = complex_text.lines();
    assert_eq!(
        lines.next(),
        Some(">TIMP3_VARIANT_AGESNA_HUMAN|P35625+MMP9_HUMAN|P14780")
    );
    assert!(lines.next().unwrap_or_default().ends_with(":MSLWQPLVLV"));

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join(MANIFEST_FILE))?)?;
    assert_eq!(manifest["wild_type_segment"], "ASESLC");
    assert_eq!(manifest["files"].as_array().map(Vec::len), Some(210));
    assert!(manifest["generated_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_campaign_aborts_on_fetch_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/LIG1.fasta");
        then.status(200).body(">sp|LIG1\nMMACDEFGH\n");
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path("/TGT1.fasta");
        then.status(404);
    });

    let config = CampaignConfig::from_toml_str(&format!(
        r#"
[campaign]
name = "abort"
ligand = "LIG"
signal_peptide_length = 2

[mutation]
start = 1
length = 2
variants = ["WY"]

[[proteins]]
name = "LIG"
accession = "LIG1"

[[proteins]]
name = "TGT"
accession = "TGT1"

[source]
base_url = "{}"

[output]
directory = "{}"
"#,
        server.base_url(),
        temp_dir.path().to_string_lossy().replace('\\', "/")
    ))?;

    let client = UniProtClient::new(&config.source.base_url, config.timeout(), 0)?;
    let task = CampaignTask::new(config, client)?;
    let result = task.run().await;

    missing.assert();
    assert!(result.is_err());
    assert!(!temp_dir.path().join("TGT").exists());
    assert!(!temp_dir.path().join(MANIFEST_FILE).exists());
    Ok(())
}

#[tokio::test]
async fn test_campaign_rejects_window_past_mature_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/LIG1.fasta");
        then.status(200).body(">sp|LIG1\nMMACD\n");
    });
    server.mock(|when, then| {
        when.method(GET).path("/TGT1.fasta");
        then.status(200).body(">sp|TGT1\nKKKK\n");
    });

    let mut config = CampaignConfig::from_toml_str(
        r#"
[campaign]
name = "window"
ligand = "LIG"
signal_peptide_length = 2

[mutation]
start = 2
length = 2
variants = ["WY"]

[[proteins]]
name = "LIG"
accession = "LIG1"

[[proteins]]
name = "TGT"
accession = "TGT1"
"#,
    )?;
    config.source.base_url = server.base_url();
    config.output.directory = temp_dir.path().to_string_lossy().into_owned();

    let client = UniProtClient::new(&config.source.base_url, config.timeout(), 0)?;
    let err = CampaignTask::new(config, client)?.run().await.unwrap_err();
    assert!(err.to_string().contains("exceeds mature ligand length"));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let mut config = CampaignConfig::timp3_default();
    config.mutation.variants.push("TOO_LONG".to_string());
    let client = UniProtClient::new("http://127.0.0.1:1", Duration::from_secs(1), 0).unwrap();
    assert!(CampaignTask::new(config, client).is_err());
}
