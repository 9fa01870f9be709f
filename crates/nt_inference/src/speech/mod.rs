use async_trait::async_trait;
use nt_core::{Error, Result, SpeechSynthesizer, VoiceSettings};
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::models::endpoint;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

#[derive(Clone)]
pub struct ElevenLabsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string() }
    }
}

impl fmt::Debug for ElevenLabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabsConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

/// Text-to-speech through the ElevenLabs HTTP API.
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for ElevenLabsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("ELEVENLABS_API_KEY is not set".to_string()))?;
        endpoint(&config.base_url, "v1/text-to-speech")?;
        Ok(Self { client: Client::new(), api_key, base_url: config.base_url })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: &str, settings: VoiceSettings) -> Result<Vec<u8>> {
        if voice_id.is_empty() || voice_id.contains('/') {
            return Err(Error::Config(format!("Invalid voice id: {:?}", voice_id)));
        }
        let url = endpoint(&self.base_url, &format!("v1/text-to-speech/{}", voice_id))?;
        let request = SpeechRequest { text, voice_settings: settings };
        debug!("Requesting speech for {} characters with voice {}", text.len(), voice_id);

        let response = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api { status: status.as_u16(), message });
        }

        let audio = response.bytes().await?;
        info!("🔊 Received {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}

/// Write encoded audio to `path`, replacing any existing file.
pub async fn save_audio(audio: &[u8], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, audio).await?;
    info!("💾 Audio saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serve;
    use axum::{
        extract::Path as UrlPath,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;

    fn client(base_url: String) -> ElevenLabsClient {
        ElevenLabsClient::new(ElevenLabsConfig { api_key: Some("xi-test".to_string()), base_url })
            .unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            ElevenLabsClient::new(ElevenLabsConfig::default()),
            Err(Error::Config(_))
        ));
        let config = ElevenLabsConfig { api_key: Some("secret".to_string()), ..Default::default() };
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[tokio::test]
    async fn test_synthesize_posts_text_and_settings() {
        let app = Router::new().route(
            "/v1/text-to-speech/:voice_id",
            post(|UrlPath(voice_id): UrlPath<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(voice_id, "voice-1");
                assert_eq!(headers["xi-api-key"], "xi-test");
                assert_eq!(headers["accept"], "audio/mpeg");
                assert_eq!(body["text"], "Hello");
                assert_eq!(body["voice_settings"]["stability"], 0.25);
                assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);
                vec![1u8, 2, 3]
            }),
        );
        let client = client(serve(app).await);
        let settings = VoiceSettings { stability: 0.25, similarity_boost: 0.75 };
        let audio = client.synthesize("Hello", "voice-1", settings).await.unwrap();
        assert_eq!(audio, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_non_200_is_api_error() {
        let app = Router::new().route(
            "/v1/text-to-speech/:voice_id",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let client = client(serve(app).await);
        match client.synthesize("Hello", "voice-1", VoiceSettings::default()).await {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_voice_id() {
        let client = client("http://127.0.0.1:1".to_string());
        let result = client.synthesize("Hello", "../x", VoiceSettings::default()).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_save_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.mp3");
        save_audio(&[9, 8, 7], &path).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![9, 8, 7]);
    }
}
