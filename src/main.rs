use anyhow::Context;
use clap::Parser;
use foldprep::config::{CampaignConfig, Cli, Command};
use foldprep::core::campaign::CampaignTask;
use foldprep::core::jobs::JobsTask;
use foldprep::core::rename::RenameTask;
use foldprep::core::replace::ReplaceTask;
use foldprep::core::scores::ScoresTask;
use foldprep::core::separate::SeparateTask;
use foldprep::utils::error::ErrorSeverity;
use foldprep::utils::logger;
use foldprep::utils::validation::Validate;
use foldprep::{FoldError, Task, TaskReport, TaskRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.global.log_json {
        logger::init_json_logger(cli.global.verbose);
    } else {
        logger::init_cli_logger(cli.global.verbose);
    }
    tracing::debug!("CLI args: {:?}", cli);

    let monitor = cli.global.monitor;
    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match cli.command {
        Command::Campaign {
            config,
            output,
            base_url,
            dry_run,
        } => {
            let mut campaign = match &config {
                Some(path) => CampaignConfig::from_file(path).with_context(|| {
                    format!("Failed to load campaign config '{}'", path.display())
                })?,
                None => CampaignConfig::timp3_default(),
            };
            if let Some(output) = output {
                campaign.output.directory = output;
            }
            if let Some(base_url) = base_url {
                campaign.source.base_url = base_url;
            }

            if dry_run {
                return print_campaign_plan(&campaign);
            }

            match CampaignTask::from_config(campaign) {
                Ok(task) => run_task(task, monitor).await,
                Err(e) => Err(e),
            }
        }
        Command::Replace {
            input_dir,
            output_dir,
            replacement_sequence,
            line_width,
        } => match ReplaceTask::new(input_dir, output_dir, &replacement_sequence) {
            Ok(task) => {
                let wrap = (line_width > 0).then_some(line_width);
                run_task(task.with_wrap(wrap), monitor).await
            }
            Err(e) => Err(e),
        },
        Command::Separate {
            input_folder,
            output_folder,
        } => run_task(SeparateTask::new(input_folder, output_folder), monitor).await,
        Command::Jobs {
            input_dir,
            output,
            seeds,
            collapse_identical,
            max_jobs_per_file,
        } => {
            let task = JobsTask::new(input_dir, output)
                .with_model_seeds(seeds)
                .with_collapse_identical(collapse_identical)
                .with_max_jobs_per_file(max_jobs_per_file);
            run_task(task, monitor).await
        }
        Command::Rename { directory, dry_run } => {
            run_task(RenameTask::new(directory, dry_run), monitor).await
        }
        Command::Scores { directory, output } => {
            run_task(ScoresTask::new(directory, output), monitor).await
        }
    };

    match result {
        Ok(report) => {
            println!("✅ {}", report.summary());
            for path in &report.outputs {
                tracing::debug!("📁 {}", path.display());
            }
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

async fn run_task<T: Task>(task: T, monitor: bool) -> foldprep::Result<TaskReport> {
    TaskRunner::new_with_monitoring(task, monitor).run().await
}

fn print_campaign_plan(config: &CampaignConfig) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let targets: Vec<&str> = config.targets().map(|t| t.name.as_str()).collect();
    println!("📋 Campaign: {}", config.campaign.name);
    println!("  Ligand: {}", config.campaign.ligand);
    println!("  Source: {}", config.source.base_url);
    println!("  Output: {}", config.output.directory);
    println!(
        "  Mutation window: {}..{}",
        config.mutation.start,
        config.mutation.start + config.mutation.length
    );
    println!("  Variants: {}", config.mutation.variants.len());
    println!("  Targets: {}", targets.join(", "));
    println!(
        "  Pair files: {}",
        config.mutation.variants.len() * targets.len()
    );
    println!("🔍 Dry run, nothing fetched or written");
    Ok(())
}

fn exit_with(e: FoldError) -> ! {
    tracing::error!(
        "❌ Task failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
