use crate::error::LoadError;

/// Bytes received so far and, when the source reports it, the total size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Percentage in `[0, 100]`, if the total size is known and non-zero.
    pub fn percent(&self) -> Option<f64> {
        self.total
            .filter(|total| *total > 0)
            .map(|total| (self.loaded as f64 / total as f64 * 100.0).min(100.0))
    }
}

#[cfg(not(target_arch = "wasm32"))]
const CHUNK_SIZE: usize = 64 * 1024;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> Result<reqwest::Url, LoadError> {
    let fetch_error = |reason: String| LoadError::Fetch {
        file: file_name.to_string(),
        reason,
    };
    let window = web_sys::window().ok_or_else(|| fetch_error("no window".to_string()))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| fetch_error("page origin is unavailable".to_string()))?;
    let base =
        reqwest::Url::parse(&format!("{}/", origin)).map_err(|e| fetch_error(e.to_string()))?;
    base.join(file_name).map_err(|e| fetch_error(e.to_string()))
}

/// Fetch `file_name` relative to the page origin, reporting progress per chunk.
#[cfg(target_arch = "wasm32")]
pub async fn load_binary(
    file_name: &str,
    on_progress: &mut dyn FnMut(LoadProgress),
) -> Result<Vec<u8>, LoadError> {
    use futures::StreamExt;

    let fetch_error = |e: reqwest::Error| LoadError::Fetch {
        file: file_name.to_string(),
        reason: e.to_string(),
    };
    let url = format_url(file_name)?;
    let response = reqwest::get(url).await.map_err(fetch_error)?;
    if !response.status().is_success() {
        return Err(LoadError::Status {
            file: file_name.to_string(),
            status: response.status().as_u16(),
        });
    }
    let total = response.content_length();
    let mut data = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(fetch_error)?;
        data.extend_from_slice(&chunk);
        on_progress(LoadProgress {
            loaded: data.len() as u64,
            total,
        });
    }
    Ok(data)
}

/// Read `file_name` from `./assets`, reporting progress per chunk.
#[cfg(not(target_arch = "wasm32"))]
pub async fn load_binary(
    file_name: &str,
    on_progress: &mut dyn FnMut(LoadProgress),
) -> Result<Vec<u8>, LoadError> {
    use tokio::io::AsyncReadExt;

    let io_error = |source: std::io::Error| LoadError::Io {
        file: file_name.to_string(),
        source,
    };
    let path = std::path::Path::new("./").join("assets").join(file_name);
    let mut file = tokio::fs::File::open(&path).await.map_err(io_error)?;
    let total = file.metadata().await.ok().map(|meta| meta.len());
    let mut data = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk).await.map_err(io_error)?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);
        on_progress(LoadProgress {
            loaded: data.len() as u64,
            total,
        });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_needs_a_known_total() {
        let progress = LoadProgress {
            loaded: 50,
            total: None,
        };
        assert_eq!(progress.percent(), None);
        let progress = LoadProgress {
            loaded: 50,
            total: Some(200),
        };
        assert_eq!(progress.percent(), Some(25.0));
    }
}
