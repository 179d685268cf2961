//! Caption discovery and download for online videos.
//!
//! The pipeline runs strictly forward: a raw URL or id is resolved to a
//! [`VideoId`], its watch page is fetched and the embedded captions payload is
//! cut out ([`captions`]), the tracks are sorted into a [`TranscriptList`],
//! one [`Transcript`] is picked by language and its timed-text document is
//! decoded into [`TranscriptEntry`] values ([`timedtext`]).

pub mod captions;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod render;
pub mod timedtext;
pub mod video_id;

pub use catalog::{Transcript, TranscriptList};
pub use config::FetchConfig;
pub use error::{Result, TranscriptError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use timedtext::TranscriptEntry;
pub use video_id::VideoId;

use tracing::{info, trace};

/// Entry point tying the pipeline stages to one [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct TranscriptApi<F> {
    fetcher: F,
    watch_url: String,
}

impl TranscriptApi<HttpFetcher> {
    /// Build an API backed by reqwest using `config`.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(fetcher).with_watch_url(&config.watch_url))
    }
}

impl<F: PageFetcher> TranscriptApi<F> {
    /// Use `fetcher` against the default watch page.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            watch_url: config::DEFAULT_WATCH_URL.to_string(),
        }
    }

    pub fn with_watch_url(mut self, watch_url: &str) -> Self {
        self.watch_url = watch_url.to_string();
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Watch page URL for `video_id`.
    pub fn watch_url(&self, video_id: &VideoId) -> String {
        format!("{}?v={}", self.watch_url, video_id)
    }

    /// Discover every caption track of `video_id`.
    pub async fn list_transcripts(&self, video_id: &VideoId) -> Result<TranscriptList> {
        trace!("list_transcripts(video_id={video_id})");
        info!("fetching watch page for {video_id}");
        let html = self.fetcher.fetch(&self.watch_url(video_id)).await?;
        let renderer = captions::extract_captions_json(&html, video_id)?;
        TranscriptList::build(video_id.clone(), &renderer)
    }

    /// List, select by `language_codes` and download in one go.
    pub async fn fetch_transcript<S: AsRef<str>>(
        &self,
        video_id: &VideoId,
        language_codes: &[S],
    ) -> Result<(Transcript, Vec<TranscriptEntry>)> {
        let list = self.list_transcripts(video_id).await?;
        let transcript = list.find_transcript(language_codes)?.clone();
        let entries = self.fetch_entries(&transcript).await?;
        Ok((transcript, entries))
    }

    /// Download a track previously obtained from [`list_transcripts`](Self::list_transcripts).
    pub async fn fetch_entries(&self, transcript: &Transcript) -> Result<Vec<TranscriptEntry>> {
        transcript.fetch(&self.fetcher).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const ID: &str = "dQw4w9WgXcQ";

    /// Serves canned bodies and records every requested URL.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| TranscriptError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn watch_page(tracks: &str) -> String {
        format!(
            "<html><script>var ytInitialPlayerResponse = {{\"captions\":{{\"playerCaptionsTracklistRenderer\":{{\"captionTracks\":{tracks}}}}},\"videoDetails\":{{\"videoId\":\"{ID}\"}}}};</script></html>"
        )
    }

    const TRACKS: &str = r#"[
        {"baseUrl":"https://tt.example/en","name":{"simpleText":"English"},"languageCode":"en"},
        {"baseUrl":"https://tt.example/de-asr","name":{"simpleText":"German (auto-generated)"},"languageCode":"de","kind":"asr"}
    ]"#;

    const XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="1.5">Guten &amp;amp; Tag</text><text start="2" dur="3">zwei</text></transcript>"#;

    fn api() -> TranscriptApi<StubFetcher> {
        let fetcher = StubFetcher::default()
            .with("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &watch_page(TRACKS))
            .with("https://tt.example/de-asr", XML);
        TranscriptApi::new(fetcher)
    }

    #[tokio::test]
    async fn lists_tracks_from_watch_page() {
        let id = VideoId::parse(ID).unwrap();
        let list = api().list_transcripts(&id).await.unwrap();
        assert_eq!(list.manually_created["en"].language, "English");
        assert!(list.generated["de"].is_generated);
    }

    #[tokio::test]
    async fn fetches_selected_track_with_two_requests() {
        let api = api();
        let id = VideoId::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let (transcript, entries) = api.fetch_transcript(&id, &["fr", "de"]).await.unwrap();
        assert_eq!(transcript.language_code, "de");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Guten &amp;amp; Tag");
        assert_eq!(entries[1].start, 2.0);
        let requests = api.fetcher().requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            [
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "https://tt.example/de-asr"
            ]
        );
    }

    #[tokio::test]
    async fn no_matching_language_stops_before_second_request() {
        let api = api();
        let id = VideoId::parse(ID).unwrap();
        let err = api.fetch_transcript(&id, &["ja"]).await.unwrap_err();
        assert!(matches!(err, TranscriptError::NoTranscriptFound { .. }));
        assert_eq!(api.fetcher().requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fetch_failures_pass_through_unchanged() {
        let api = api();
        let id = VideoId::parse(ID).unwrap();
        let err = api.fetch_transcript(&id, &["en"]).await.unwrap_err();
        match err {
            TranscriptError::HttpStatus { url, status } => {
                assert_eq!(url, "https://tt.example/en");
                assert_eq!(status, 404);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn page_without_captions_is_unavailable() {
        let fetcher = StubFetcher::default().with(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "<html>private video</html>",
        );
        let id = VideoId::parse(ID).unwrap();
        let err = TranscriptApi::new(fetcher)
            .list_transcripts(&id)
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptError::TranscriptsUnavailable(_)));
    }

    #[tokio::test]
    async fn runs_over_http() {
        let server = MockServer::start_async().await;
        let track_url = server.url("/api/timedtext?lang=en");
        let tracks = format!(
            r#"[{{"baseUrl":"{track_url}","name":{{"simpleText":"English"}},"languageCode":"en","kind":"asr"}}]"#
        );
        let page = server
            .mock_async(|when, then| {
                when.method(GET).path("/watch").query_param("v", ID);
                then.status(200).body(watch_page(&tracks));
            })
            .await;
        let track = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/timedtext")
                    .query_param("lang", "en");
                then.status(200)
                    .body(r#"<transcript><text start="1.0" dur="2.5">Hello &amp;<b>World</b></text></transcript>"#);
            })
            .await;

        let config = FetchConfig {
            watch_url: server.url("/watch"),
            ..FetchConfig::default()
        };
        let api = TranscriptApi::from_config(&config).unwrap();
        let id = VideoId::parse(ID).unwrap();
        let (transcript, entries) = api.fetch_transcript(&id, &["en"]).await.unwrap();

        page.assert_async().await;
        track.assert_async().await;
        assert!(transcript.is_generated);
        assert_eq!(
            entries,
            vec![TranscriptEntry {
                text: "Hello &amp;World".into(),
                start: 1.0,
                duration: 2.5,
            }]
        );
    }
}
