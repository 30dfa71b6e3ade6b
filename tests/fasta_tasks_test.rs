use anyhow::Result;
use foldprep::core::fasta::{parse_fasta, read_fasta};
use foldprep::core::jobs::{FoldJob, JobEntity, JobsTask};
use foldprep::core::replace::ReplaceTask;
use foldprep::core::separate::SeparateTask;
use foldprep::{Task, TaskRunner};
use tempfile::TempDir;

const PAIR: &str = concat!(
    ">TIMP3_VARIANT_WT_HUMAN|P35625\nCTCSPSHPQDAFCNSDIVIR\n",
    ">MMP2_HUMAN|P08253\nMEALMARGALTGPLRALCLL\n",
);
const COMPLEX: &str = ">TIMP3_VARIANT_WT_HUMAN|P35625+MMP2_HUMAN|P08253\nCTCSPSHPQD:MEALMARGAL\n";

#[tokio::test]
async fn test_replace_directory_end_to_end() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    let out_dir = output.path().join("output_fastas");

    std::fs::write(input.path().join("TIMP3_v_MMP2_C_WT.fasta"), PAIR)?;
    std::fs::write(input.path().join("complex_TIMP3_v_MMP2_C_WT.FA"), COMPLEX)?;
    std::fs::write(input.path().join("single.fasta"), ">only\nMK\n")?;
    std::fs::write(input.path().join("notes.txt"), "ignored")?;

    let replacement = "y".repeat(70);
    let task = ReplaceTask::new(input.path(), &out_dir, &replacement)?;
    let report = TaskRunner::new(task).run().await?;

    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    // 60-column wrapping with upper-cased replacement
    let pair_text = std::fs::read_to_string(out_dir.join("TIMP3_v_MMP2_C_WT.fasta"))?;
    let lines: Vec<&str> = pair_text.lines().collect();
    assert_eq!(lines[0], ">TIMP3_VARIANT_WT_HUMAN|P35625");
    assert_eq!(lines[2], ">MMP2_HUMAN|P08253");
    assert_eq!(lines[3], "Y".repeat(60));
    assert_eq!(lines[4], "Y".repeat(10));

    let complex = read_fasta(&out_dir.join("complex_TIMP3_v_MMP2_C_WT.FA"))?;
    assert_eq!(complex.records.len(), 1);
    assert_eq!(
        complex.records[0].sequence,
        format!("CTCSPSHPQD:{}", "Y".repeat(70))
    );

    assert!(!out_dir.join("single.fasta").exists());
    Ok(())
}

#[tokio::test]
async fn test_replace_with_no_fasta_files_is_not_an_error() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;

    let task = ReplaceTask::new(input.path(), output.path(), "MK")?;
    let report = task.run().await?;

    assert_eq!(report.processed, 0);
    assert!(report.outputs.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_replace_missing_input_dir_fails() -> Result<()> {
    let output = TempDir::new()?;
    let task = ReplaceTask::new(output.path().join("missing"), output.path(), "MK")?;
    assert!(task.run().await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_separate_directory_end_to_end() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    let out_dir = output.path().join("separated");

    std::fs::write(input.path().join("complex_TIMP3_v_MMP2_C_WT.fasta"), COMPLEX)?;
    std::fs::write(input.path().join("plain.fasta"), ">mono\nCTCSPSHPQD\n")?;
    std::fs::write(input.path().join("readme.md"), "# not fasta")?;

    let report = SeparateTask::new(input.path(), &out_dir).run().await?;

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 2);

    let text = std::fs::read_to_string(out_dir.join("complex_TIMP3_v_MMP2_C_WT_separated.fasta"))?;
    assert_eq!(
        text,
        ">TIMP3_VARIANT_WT_HUMAN|P35625+MMP2_HUMAN|P08253_seq1\nCTCSPSHPQD\n\
         >TIMP3_VARIANT_WT_HUMAN|P35625+MMP2_HUMAN|P08253_seq2\nMEALMARGAL\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_jobs_end_to_end() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    let jobs_path = output.path().join("alphafold_jobs.json");

    std::fs::write(input.path().join("b_pair.fasta"), PAIR)?;
    std::fs::write(input.path().join("a_mono.fasta"), ">mono\nCTCS\nPSHP\n")?;
    std::fs::write(input.path().join("empty.fasta"), "")?;

    let task = JobsTask::new(input.path(), &jobs_path).with_model_seeds(vec!["42".to_string()]);
    let report = task.run().await?;

    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.outputs, vec![jobs_path.clone()]);

    let jobs: Vec<FoldJob> = serde_json::from_str(&std::fs::read_to_string(&jobs_path)?)?;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name, "a_mono");
    assert_eq!(jobs[0].model_seeds, vec!["42"]);
    let JobEntity::ProteinChain(chain) = &jobs[0].sequences[0];
    assert_eq!(chain.sequence, "CTCSPSHP");
    assert_eq!(jobs[1].name, "b_pair");
    assert_eq!(jobs[1].sequences.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_jobs_split_into_numbered_files() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;

    for i in 0..5 {
        std::fs::write(input.path().join(format!("job{}.fasta", i)), PAIR)?;
    }

    let task = JobsTask::new(input.path(), output.path().join("batch.json"))
        .with_max_jobs_per_file(Some(2));
    let report = task.run().await?;

    assert_eq!(report.outputs.len(), 3);
    let last: Vec<FoldJob> =
        serde_json::from_str(&std::fs::read_to_string(output.path().join("batch_3.json"))?)?;
    assert_eq!(last.len(), 1);
    assert!(!output.path().join("batch.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_jobs_with_no_fasta_files_writes_nothing() -> Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    let jobs_path = output.path().join("alphafold_jobs.json");

    std::fs::write(input.path().join("notes.txt"), ">not\nFASTA\n")?;

    let report = JobsTask::new(input.path(), &jobs_path).run().await?;

    assert_eq!(report.processed, 0);
    assert!(report.outputs.is_empty());
    assert!(!jobs_path.exists());
    Ok(())
}

#[test]
fn test_pair_fixture_parses() {
    assert_eq!(parse_fasta(PAIR).len(), 2);
}
