use std::env::var;
use std::path::PathBuf;

use dotenvy::dotenv;

use crate::application::handlers::message_dispatcher::ReplyMode;
use crate::infrastructure::messaging::{jetstream::JetstreamConfig, line::DEFAULT_API_BASE_URL};

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub channel_secret: String,
    pub channel_token: String,
    pub qr_code_url: String,
    pub reply_mode: ReplyMode,
    pub dictionary_path: PathBuf,
    pub dictionary_preload: bool,
    pub line_api_base_url: String,
    pub task_base_url: String,
    pub task_max_attempts: u32,
    pub jetstream: Option<JetstreamConfig>,
}

impl Config {
    /// Credentials are read as-is; an empty secret only fails once a
    /// request needs a client.
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        let port = var("PORT")
            .map_err(|_| "An error occured while getting PORT env param")?
            .parse::<u16>()
            .map_err(|_| "An error occured while parsing PORT env param")?;

        let reply_mode = match var("REPLY_MODE") {
            Ok(value) => value.parse::<ReplyMode>()?,
            Err(_) => ReplyMode::default(),
        };

        let dictionary_preload = match var("DICTIONARY_PRELOAD") {
            Ok(value) => value
                .parse::<bool>()
                .map_err(|_| "An error occured while parsing DICTIONARY_PRELOAD env param")?,
            Err(_) => false,
        };

        let task_max_attempts = match var("TASK_MAX_ATTEMPTS") {
            Ok(value) => value
                .parse::<u32>()
                .map_err(|_| "An error occured while parsing TASK_MAX_ATTEMPTS env param")?,
            Err(_) => 5,
        };

        let jetstream = var("NATS_URL").ok().map(|url| JetstreamConfig {
            url,
            stream: "LINEBOT_TASKS".to_string(),
            subject: "linebot.tasks".to_string(),
            durable: "linebot-task-worker".to_string(),
            pull_batch: 16,
            ack_wait_seconds: 30,
            max_deliver: i64::from(task_max_attempts) + 1,
            max_attempts: task_max_attempts,
        });

        Ok(Config {
            port,
            scheme: var("SCHEME").unwrap_or_else(|_| "http".to_string()),
            host: var("HOST").unwrap_or_else(|_| "localhost".to_string()),
            channel_secret: var("CHANNEL_SECRET").unwrap_or_default(),
            channel_token: var("CHANNEL_TOKEN").unwrap_or_default(),
            qr_code_url: var("QR_CODE_URL").unwrap_or_default(),
            reply_mode,
            dictionary_path: var("DICTIONARY_PATH")
                .unwrap_or_else(|_| "system.dic.zst".to_string())
                .into(),
            dictionary_preload,
            line_api_base_url: var("LINE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            task_base_url: var("TASK_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            task_max_attempts,
            jetstream,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}
