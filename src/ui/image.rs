//! Image display with a placeholder fallback
//!
//! Local files (plain paths or `file://` URLs) are rendered directly. Remote
//! `http(s)://` URLs are fetched in the background and kept in an
//! `ImageCache`; until the bytes arrive, or when the fetch fails, the
//! "Image Not Found" placeholder is shown. Stored URLs are never modified.

use iced::widget::{center, column, container, image, text};
use iced::{ContentFit, Element, Length};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::MUTED_COLOR;
use crate::Message;

/// Give up on a remote image after this long
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where an image URL can be displayed from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A readable file on disk
    File(PathBuf),
    /// An `http://` or `https://` URL to fetch
    Remote(String),
    /// Nothing displayable, show the placeholder
    Unavailable,
}

impl ImageSource {
    pub fn resolve(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            return ImageSource::Remote(url.to_string());
        }

        let path = match url.strip_prefix("file://") {
            Some(path) => PathBuf::from(path),
            None if !url.is_empty() && !url.contains("://") => PathBuf::from(url),
            None => return ImageSource::Unavailable,
        };

        if path.is_file() {
            ImageSource::File(path)
        } else {
            ImageSource::Unavailable
        }
    }
}

/// Fetch state of one remote image
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Loaded(image::Handle),
    Failed,
}

/// Remote images keyed by their trimmed URL
#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<String, ImageState>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as loading if it is remote and not seen before.
    ///
    /// Returns the URL to fetch, or `None` when there is nothing to do.
    pub fn request(&mut self, url: &str) -> Option<String> {
        let ImageSource::Remote(remote) = ImageSource::resolve(url) else {
            return None;
        };
        if self.images.contains_key(&remote) {
            return None;
        }

        self.images.insert(remote.clone(), ImageState::Loading);
        Some(remote)
    }

    /// Record the outcome of a fetch started by [`ImageCache::request`]
    pub fn finish(&mut self, url: String, result: Result<Vec<u8>, String>) {
        let state = match result {
            Ok(bytes) if !bytes.is_empty() => ImageState::Loaded(image::Handle::from_bytes(bytes)),
            Ok(_) => {
                tracing::debug!(%url, "image response was empty");
                ImageState::Failed
            }
            Err(err) => {
                tracing::debug!(%url, error = %err, "image fetch failed");
                ImageState::Failed
            }
        };
        self.images.insert(url, state);
    }

    pub fn get(&self, url: &str) -> Option<&ImageState> {
        self.images.get(url.trim())
    }

    /// Display handle for a remote URL, once it has loaded
    pub fn handle(&self, url: &str) -> Option<&image::Handle> {
        match self.get(url) {
            Some(ImageState::Loaded(handle)) => Some(handle),
            _ => None,
        }
    }
}

/// Download the bytes behind `url`.
///
/// The URL is handed back alongside the result so the cache can be keyed on it.
pub async fn fetch_image(url: String) -> (String, Result<Vec<u8>, String>) {
    let result = fetch_bytes(&url).await.map_err(|err| err.to_string());
    (url, result)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

/// Render `url` at the given size, or the placeholder if it can't be shown
pub fn view<'a>(
    url: &'a str,
    cache: &'a ImageCache,
    width: Length,
    height: Length,
    fit: ContentFit,
) -> Element<'a, Message> {
    let handle = match ImageSource::resolve(url) {
        ImageSource::File(path) => image::Handle::from_path(path),
        ImageSource::Remote(_) => match cache.handle(url) {
            Some(handle) => handle.clone(),
            None => return placeholder(url, cache.get(url), width, height),
        },
        ImageSource::Unavailable => return placeholder(url, None, width, height),
    };

    image(handle)
        .width(width)
        .height(height)
        .content_fit(fit)
        .into()
}

fn placeholder<'a>(
    url: &'a str,
    state: Option<&ImageState>,
    width: Length,
    height: Length,
) -> Element<'a, Message> {
    let label = match state {
        Some(ImageState::Loading) => "Loading…",
        _ => "Image Not Found",
    };

    container(center(
        column![
            text(label).size(14).color(MUTED_COLOR),
            text(url).size(11).color(MUTED_COLOR),
        ]
        .spacing(4)
        .padding(8),
    ))
    .width(width)
    .height(height)
    .style(container::rounded_box)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/cover.jpg")
    }

    #[test]
    fn test_remote_url_resolves_remote() {
        assert_eq!(
            ImageSource::resolve(" https://example.com/cover.jpg "),
            ImageSource::Remote("https://example.com/cover.jpg".to_string())
        );
        assert_eq!(
            ImageSource::resolve("http://example.com/a.png"),
            ImageSource::Remote("http://example.com/a.png".to_string())
        );
    }

    #[test]
    fn test_other_schemes_are_unavailable() {
        assert_eq!(ImageSource::resolve("ftp://example.com/a.png"), ImageSource::Unavailable);
    }

    #[test]
    fn test_blank_url_is_unavailable() {
        assert_eq!(ImageSource::resolve("   "), ImageSource::Unavailable);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert_eq!(
            ImageSource::resolve(&missing.to_string_lossy()),
            ImageSource::Unavailable
        );
    }

    #[test]
    fn test_local_file_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let plain = path.to_string_lossy().to_string();
        assert_eq!(ImageSource::resolve(&plain), ImageSource::File(path.clone()));

        let url = format!("file://{plain}");
        assert_eq!(ImageSource::resolve(&url), ImageSource::File(path));
    }

    #[test]
    fn test_cache_requests_each_remote_url_once() {
        let mut cache = ImageCache::new();
        let url = "https://example.com/cover.jpg";

        assert_eq!(cache.request(url), Some(url.to_string()));
        assert!(matches!(cache.get(url), Some(ImageState::Loading)));
        assert_eq!(cache.request(url), None);
        assert_eq!(cache.request(" https://example.com/cover.jpg\n"), None);

        assert_eq!(cache.request("relative/missing.png"), None);
        assert!(cache.get("relative/missing.png").is_none());
    }

    #[test]
    fn test_cache_loaded_bytes_give_handle() {
        let mut cache = ImageCache::new();
        let url = "https://example.com/cover.jpg";
        cache.request(url);
        cache.finish(url.to_string(), Ok(vec![1, 2, 3]));

        assert!(cache.handle(url).is_some());
        assert_eq!(cache.request(url), None);
    }

    #[test]
    fn test_cache_failed_fetch_falls_back() {
        let mut cache = ImageCache::new();
        let url = "https://example.com/broken.jpg";
        cache.request(url);
        cache.finish(url.to_string(), Err("404 Not Found".to_string()));

        assert!(matches!(cache.get(url), Some(ImageState::Failed)));
        assert!(cache.handle(url).is_none());
        // Failures are not retried within the session
        assert_eq!(cache.request(url), None);
    }

    #[test]
    fn test_cache_empty_body_is_failure() {
        let mut cache = ImageCache::new();
        let url = "https://example.com/empty.jpg";
        cache.request(url);
        cache.finish(url.to_string(), Ok(Vec::new()));
        assert!(matches!(cache.get(url), Some(ImageState::Failed)));
    }

    #[tokio::test]
    async fn test_fetch_image_returns_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\nConnection: close\r\n\r\njpeg",
        );

        let (fetched_url, result) = fetch_image(url.clone()).await;
        assert_eq!(fetched_url, url);
        assert_eq!(result.unwrap(), b"jpeg".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_image_http_error_is_err() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");

        let (_, result) = fetch_image(url).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_image_unreachable_host_is_err() {
        // Bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

        let (_, result) = fetch_image(format!("http://127.0.0.1:{port}/a.jpg")).await;
        assert!(result.is_err());
    }
}
