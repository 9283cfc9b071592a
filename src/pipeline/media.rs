//! Media lookups: image and video search keyed by slide body text.
//!
//! Every external search sits behind a capability trait with one
//! request/response method, so the renderer can be exercised with stubs
//! and no network. The production [`WebMedia`] finder chains a primary
//! image source (Pixabay) and a fallback (Pexels), taking the first
//! non-empty hit, and resolves videos through a single YouTube search.
//!
//! "No result" is a valid outcome everywhere in this module — an empty
//! hit list is `Ok(None)`, never an error. Errors are reserved for failed
//! calls and undecodable payloads, and even those are downgraded to
//! "no media for this slide" by the renderer.
//!
//! Fetched image bytes are decoded with the `image` crate before they are
//! accepted: this validates the payload, yields the pixel dimensions the
//! package writer needs for aspect-correct placement, and transcodes any
//! exotic format to PNG. Everything stays in memory — no temporary file
//! exists at any point between fetch and embed.

use crate::config::ApiCredentials;
use crate::error::MediaError;
use crate::output::SlideImage;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, warn};

/// Image search: free-text query → at most one image URL.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str) -> Result<Option<String>, MediaError>;
}

/// Video search: free-text query → at most one watch URL.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str) -> Result<Option<String>, MediaError>;
}

/// What the renderer consumes: one image lookup and one video lookup per
/// slide, each independently optional.
#[async_trait]
pub trait MediaFinder: Send + Sync {
    async fn find_image(&self, query: &str) -> Result<Option<SlideImage>, MediaError>;
    async fn find_video(&self, query: &str) -> Result<Option<String>, MediaError>;
}

/// Finder that never returns media. Used when media is disabled and as the
/// deterministic baseline in tests.
pub struct NoMedia;

#[async_trait]
impl MediaFinder for NoMedia {
    async fn find_image(&self, _query: &str) -> Result<Option<SlideImage>, MediaError> {
        Ok(None)
    }

    async fn find_video(&self, _query: &str) -> Result<Option<String>, MediaError> {
        Ok(None)
    }
}

// ── Production finder ────────────────────────────────────────────────────

/// Production media finder: ordered image sources with fallback, plus an
/// optional video source. Lookups run strictly one at a time.
pub struct WebMedia {
    client: reqwest::Client,
    image_sources: Vec<Box<dyn ImageSearch>>,
    video_source: Option<Box<dyn VideoSearch>>,
}

impl WebMedia {
    /// Build a finder from whichever credentials are present: Pixabay
    /// first, Pexels as fallback, YouTube for video. Per-call timeout
    /// applies to every request the finder makes.
    pub fn from_credentials(
        creds: &ApiCredentials,
        timeout_secs: u64,
    ) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MediaError::SearchFailed {
                source_name: "media",
                query: String::new(),
                detail: format!("HTTP client: {e}"),
            })?;

        let mut image_sources: Vec<Box<dyn ImageSearch>> = Vec::new();
        if let Some(key) = &creds.pixabay_api_key {
            image_sources.push(Box::new(PixabayImages {
                client: client.clone(),
                api_key: key.clone(),
                timeout_secs,
            }));
        }
        if let Some(key) = &creds.pexels_api_key {
            image_sources.push(Box::new(PexelsImages {
                client: client.clone(),
                api_key: key.clone(),
                timeout_secs,
            }));
        }

        let video_source: Option<Box<dyn VideoSearch>> =
            creds.youtube_api_key.as_ref().map(|key| {
                Box::new(YoutubeVideos {
                    client: client.clone(),
                    api_key: key.clone(),
                    timeout_secs,
                }) as Box<dyn VideoSearch>
            });

        Ok(Self {
            client,
            image_sources,
            video_source,
        })
    }

    /// Finder over explicit sources; lets tests drive the fallback order
    /// without credentials.
    pub fn from_sources(
        client: reqwest::Client,
        image_sources: Vec<Box<dyn ImageSearch>>,
        video_source: Option<Box<dyn VideoSearch>>,
    ) -> Self {
        Self {
            client,
            image_sources,
            video_source,
        }
    }

    /// First non-empty URL across the ordered sources.
    ///
    /// A source that errors is logged and skipped so the fallback still
    /// gets its chance; the last error is surfaced only when every source
    /// failed and none produced a URL.
    async fn first_image_url(&self, query: &str) -> Result<Option<String>, MediaError> {
        let mut last_err: Option<MediaError> = None;

        for source in &self.image_sources {
            match source.search(query).await {
                Ok(Some(url)) => {
                    debug!("{} hit for '{}': {}", source.name(), query, url);
                    return Ok(Some(url));
                }
                Ok(None) => {
                    debug!("{} returned no hits for '{}'", source.name(), query);
                }
                Err(e) => {
                    warn!("{} failed for '{}': {}", source.name(), query, e);
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MediaFinder for WebMedia {
    async fn find_image(&self, query: &str) -> Result<Option<SlideImage>, MediaError> {
        match self.first_image_url(query).await? {
            Some(url) => fetch_image(&self.client, &url).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_video(&self, query: &str) -> Result<Option<String>, MediaError> {
        match &self.video_source {
            Some(source) => source.search(query).await,
            None => Ok(None),
        }
    }
}

/// Download an image URL and validate it into a [`SlideImage`].
///
/// PNG and JPEG bytes are kept as-is (the package declares both content
/// types); anything else is transcoded to PNG so the part extension always
/// matches the payload.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<SlideImage, MediaError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MediaError::FetchFailed {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(MediaError::FetchFailed {
            url: url.to_string(),
            detail: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| MediaError::FetchFailed {
            url: url.to_string(),
            detail: e.to_string(),
        })?
        .to_vec();

    image_from_bytes(bytes, url)
}

/// Decode, measure, and normalise raw image bytes.
pub fn image_from_bytes(bytes: Vec<u8>, url: &str) -> Result<SlideImage, MediaError> {
    let format = image::guess_format(&bytes).map_err(|e| MediaError::InvalidImage {
        url: url.to_string(),
        detail: e.to_string(),
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|e| MediaError::InvalidImage {
        url: url.to_string(),
        detail: e.to_string(),
    })?;
    let (width_px, height_px) = (decoded.width(), decoded.height());

    let (bytes, ext, content_type) = match format {
        image::ImageFormat::Png => (bytes, "png", "image/png"),
        image::ImageFormat::Jpeg => (bytes, "jpeg", "image/jpeg"),
        _ => {
            let mut buf = Vec::new();
            decoded
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| MediaError::InvalidImage {
                    url: url.to_string(),
                    detail: format!("PNG transcode: {e}"),
                })?;
            (buf, "png", "image/png")
        }
    };

    Ok(SlideImage {
        bytes,
        ext,
        content_type,
        width_px,
        height_px,
    })
}

// ── Pixabay (primary image source) ───────────────────────────────────────

struct PixabayImages {
    client: reqwest::Client,
    api_key: String,
    timeout_secs: u64,
}

#[derive(Deserialize)]
struct PixabayResponse {
    hits: Vec<PixabayHit>,
}

#[derive(Deserialize)]
struct PixabayHit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

#[async_trait]
impl ImageSearch for PixabayImages {
    fn name(&self) -> &'static str {
        "pixabay"
    }

    async fn search(&self, query: &str) -> Result<Option<String>, MediaError> {
        let response = self
            .client
            .get("https://pixabay.com/api/")
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("image_type", "photo"),
                ("safesearch", "true"),
                ("per_page", "3"),
            ])
            .send()
            .await
            .map_err(|e| request_error(self.name(), query, self.timeout_secs, e))?;

        if !response.status().is_success() {
            return Err(MediaError::SearchFailed {
                source_name: self.name(),
                query: query.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let parsed: PixabayResponse =
            response
                .json()
                .await
                .map_err(|e| MediaError::SearchFailed {
                    source_name: self.name(),
                    query: query.to_string(),
                    detail: format!("response body: {e}"),
                })?;

        Ok(parsed.hits.into_iter().next().map(|h| h.webformat_url))
    }
}

// ── Pexels (fallback image source) ───────────────────────────────────────

struct PexelsImages {
    client: reqwest::Client,
    api_key: String,
    timeout_secs: u64,
}

#[derive(Deserialize)]
struct PexelsResponse {
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsSrc,
}

#[derive(Deserialize)]
struct PexelsSrc {
    large: String,
}

#[async_trait]
impl ImageSearch for PexelsImages {
    fn name(&self) -> &'static str {
        "pexels"
    }

    async fn search(&self, query: &str) -> Result<Option<String>, MediaError> {
        let response = self
            .client
            .get("https://api.pexels.com/v1/search")
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", "1")])
            .send()
            .await
            .map_err(|e| request_error(self.name(), query, self.timeout_secs, e))?;

        if !response.status().is_success() {
            return Err(MediaError::SearchFailed {
                source_name: self.name(),
                query: query.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let parsed: PexelsResponse =
            response
                .json()
                .await
                .map_err(|e| MediaError::SearchFailed {
                    source_name: self.name(),
                    query: query.to_string(),
                    detail: format!("response body: {e}"),
                })?;

        Ok(parsed.photos.into_iter().next().map(|p| p.src.large))
    }
}

// ── YouTube (video source) ───────────────────────────────────────────────

struct YoutubeVideos {
    client: reqwest::Client,
    api_key: String,
    timeout_secs: u64,
}

#[derive(Deserialize)]
struct YoutubeResponse {
    items: Vec<YoutubeItem>,
}

#[derive(Deserialize)]
struct YoutubeItem {
    id: YoutubeId,
}

#[derive(Deserialize)]
struct YoutubeId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[async_trait]
impl VideoSearch for YoutubeVideos {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn search(&self, query: &str) -> Result<Option<String>, MediaError> {
        let response = self
            .client
            .get("https://www.googleapis.com/youtube/v3/search")
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| request_error(self.name(), query, self.timeout_secs, e))?;

        if !response.status().is_success() {
            return Err(MediaError::SearchFailed {
                source_name: self.name(),
                query: query.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let parsed: YoutubeResponse =
            response
                .json()
                .await
                .map_err(|e| MediaError::SearchFailed {
                    source_name: self.name(),
                    query: query.to_string(),
                    detail: format!("response body: {e}"),
                })?;

        Ok(parsed
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id)
            .map(|id| format!("https://www.youtube.com/watch?v={id}")))
    }
}

fn request_error(
    source_name: &'static str,
    query: &str,
    timeout_secs: u64,
    e: reqwest::Error,
) -> MediaError {
    if e.is_timeout() {
        MediaError::Timeout {
            source_name,
            secs: timeout_secs,
        }
    } else {
        MediaError::SearchFailed {
            source_name,
            query: query.to_string(),
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSearch {
        name: &'static str,
        result: Result<Option<String>, MediaError>,
    }

    #[async_trait]
    impl ImageSearch for FixedSearch {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn search(&self, _query: &str) -> Result<Option<String>, MediaError> {
            self.result.clone()
        }
    }

    fn finder(sources: Vec<Box<dyn ImageSearch>>) -> WebMedia {
        WebMedia::from_sources(reqwest::Client::new(), sources, None)
    }

    #[tokio::test]
    async fn primary_hit_wins() {
        let media = finder(vec![
            Box::new(FixedSearch {
                name: "primary",
                result: Ok(Some("https://img/primary.png".into())),
            }),
            Box::new(FixedSearch {
                name: "fallback",
                result: Ok(Some("https://img/fallback.png".into())),
            }),
        ]);
        let url = media.first_image_url("q").await.unwrap();
        assert_eq!(url.as_deref(), Some("https://img/primary.png"));
    }

    #[tokio::test]
    async fn empty_primary_falls_back() {
        let media = finder(vec![
            Box::new(FixedSearch {
                name: "primary",
                result: Ok(None),
            }),
            Box::new(FixedSearch {
                name: "fallback",
                result: Ok(Some("https://img/fallback.png".into())),
            }),
        ]);
        let url = media.first_image_url("q").await.unwrap();
        assert_eq!(url.as_deref(), Some("https://img/fallback.png"));
    }

    #[tokio::test]
    async fn erroring_primary_still_falls_back() {
        let media = finder(vec![
            Box::new(FixedSearch {
                name: "primary",
                result: Err(MediaError::SearchFailed {
                    source_name: "primary",
                    query: "q".into(),
                    detail: "HTTP 500".into(),
                }),
            }),
            Box::new(FixedSearch {
                name: "fallback",
                result: Ok(Some("https://img/fallback.png".into())),
            }),
        ]);
        let url = media.first_image_url("q").await.unwrap();
        assert_eq!(url.as_deref(), Some("https://img/fallback.png"));
    }

    #[tokio::test]
    async fn all_empty_is_ok_none() {
        let media = finder(vec![
            Box::new(FixedSearch {
                name: "primary",
                result: Ok(None),
            }),
            Box::new(FixedSearch {
                name: "fallback",
                result: Ok(None),
            }),
        ]);
        assert!(media.first_image_url("q").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn no_media_finder_returns_nothing() {
        assert!(NoMedia.find_image("q").await.unwrap().is_none());
        assert!(NoMedia.find_video("q").await.unwrap().is_none());
    }

    #[test]
    fn png_bytes_are_kept_and_measured() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            8,
            4,
            image::Rgba([0, 128, 255, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let slide_img = image_from_bytes(buf.clone(), "test://png").unwrap();
        assert_eq!(slide_img.ext, "png");
        assert_eq!(slide_img.content_type, "image/png");
        assert_eq!(slide_img.width_px, 8);
        assert_eq!(slide_img.height_px, 4);
        assert_eq!(slide_img.bytes, buf);
    }

    #[test]
    fn garbage_bytes_are_invalid_image() {
        let err = image_from_bytes(b"not an image at all".to_vec(), "test://junk").unwrap_err();
        assert!(matches!(err, MediaError::InvalidImage { .. }));
    }
}
