use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::PathBuf;

/// Default Groq API base URL used when `GROQ_BASE_URL` is not set.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default Google Calendar API base URL.
/// Override in tests to point at a mock server.
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default Google OAuth token endpoint used to refresh cached credentials.
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Path to the recorded meeting audio file (WAV) to process.
    #[arg(env = "MEETING_AUDIO_FILE")]
    pub audio_file: Option<PathBuf>,

    /// Sources at or above this size (in bytes) are split into chunks
    /// before transcription; smaller sources are sent whole.
    #[arg(long, env, default_value_t = 10 * 1024 * 1024)]
    pub audio_split_threshold_bytes: u64,

    /// Maximum duration of a single audio chunk, in seconds.
    #[arg(long, env, default_value_t = 300)]
    pub max_chunk_secs: u64,

    /// Directory for temporary segment files. Defaults to the OS temp dir.
    #[arg(long, env)]
    segment_scratch_dir: Option<PathBuf>,

    /// The API key to use when calling the Groq API.
    #[arg(long, env = "GROQ_CLOUD_API_KEY")]
    groq_api_key: Option<String>,

    /// The base URL of the Groq OpenAI-compatible API.
    #[arg(long, env, default_value = DEFAULT_GROQ_BASE_URL)]
    groq_base_url: String,

    /// Speech-to-text model used for transcription.
    #[arg(long, env, default_value = "whisper-large-v3-turbo")]
    pub transcription_model: String,

    /// Number of transcription attempts per segment before degrading to
    /// the failure sentinel.
    #[arg(long, env, default_value_t = 3)]
    pub transcription_retries: u32,

    /// Fixed delay in seconds between transcription attempts.
    #[arg(long, env, default_value_t = 5)]
    pub transcription_retry_delay_secs: u64,

    /// Chat completion model used for meeting-info extraction.
    #[arg(long, env, default_value = "deepseek-r1-distill-llama-70b")]
    pub extraction_model: String,

    /// Number of extraction attempts before falling back to the default
    /// meeting record.
    #[arg(long, env, default_value_t = 3)]
    pub extraction_retries: u32,

    /// Fixed delay in seconds between extraction attempts.
    #[arg(long, env, default_value_t = 2)]
    pub extraction_retry_delay_secs: u64,

    /// The Google OAuth token endpoint used to refresh expired credentials.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_TOKEN_URL)]
    google_token_url: String,

    /// The base URL of the Google Calendar API.
    #[arg(long, env, default_value = DEFAULT_CALENDAR_BASE_URL)]
    calendar_base_url: String,

    /// The calendar to query and insert events into.
    #[arg(long, env, default_value = "primary")]
    pub calendar_id: String,

    /// IANA time zone that meeting times are interpreted in.
    #[arg(long, env, default_value = "Asia/Kolkata")]
    calendar_timezone: String,

    /// Path of the persisted Google authorized-user credential cache.
    #[arg(long, env, default_value = "token.json")]
    pub token_cache_path: PathBuf,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the Groq API key, if configured.
    pub fn groq_api_key(&self) -> Option<String> {
        self.groq_api_key.clone()
    }

    /// Returns the Groq API base URL.
    pub fn groq_base_url(&self) -> &str {
        &self.groq_base_url
    }

    /// Returns the Google OAuth token endpoint URL.
    pub fn google_token_url(&self) -> &str {
        &self.google_token_url
    }

    /// Returns the Google Calendar API base URL.
    pub fn calendar_base_url(&self) -> &str {
        &self.calendar_base_url
    }

    /// Parses the configured calendar time zone into a [`chrono_tz::Tz`].
    ///
    /// Returns `None` when the configured name is not a valid IANA zone.
    pub fn calendar_timezone(&self) -> Option<chrono_tz::Tz> {
        self.calendar_timezone.parse().ok()
    }

    /// Returns the scratch directory for segment files, falling back to the
    /// OS temporary directory.
    pub fn segment_scratch_dir(&self) -> PathBuf {
        self.segment_scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
