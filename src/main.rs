use domain::{Pipeline, ScheduleOutcome};
use log::{error, info};
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    let audio_file = match config.audio_file.clone() {
        Some(path) => path,
        None => {
            error!("No audio file given; pass a path or set MEETING_AUDIO_FILE");
            std::process::exit(2);
        }
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to initialize pipeline: {e}");
            std::process::exit(1);
        }
    };

    let report = match pipeline.run(&audio_file).await {
        Ok(report) => report,
        Err(e) => {
            error!("Pipeline failed: {e}");
            std::process::exit(1);
        }
    };

    info!(
        "Meeting '{}' at {}",
        report.meeting_info.subject,
        report.meeting_info.composite_date_time()
    );

    match report.outcome {
        ScheduleOutcome::Scheduled { html_link } => {
            match html_link {
                Some(link) => info!("Event created: {link}"),
                None => info!("Event created"),
            }
        }
        ScheduleOutcome::Skipped { reason } => {
            info!("No event created: {reason}");
        }
    }
}
