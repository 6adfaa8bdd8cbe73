use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};

const HUB_BASE_URL: &str = "https://huggingface.co";

/// HTTP client for pulling pretrained weights from the model hub.
pub struct HubClient {
    http: Client,
    token: Option<String>,
}

impl HubClient {
    /// Create a client. `token` authenticates against gated repositories.
    pub fn new(token: Option<String>) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(600))
                .build()
                .context("Failed to build hub HTTP client")?,
            token,
        })
    }

    /// Resolve a model file, downloading it into `models_dir` if not cached.
    pub async fn resolve(&self, repo: &str, name: &str, models_dir: &Path) -> Result<PathBuf> {
        let dest = models_dir.join(name);
        if dest.exists() {
            tracing::debug!("Using cached model {}", dest.display());
            return Ok(dest);
        }

        std::fs::create_dir_all(models_dir).with_context(|| {
            format!("Failed to create models directory: {}", models_dir.display())
        })?;

        let url = format!("{HUB_BASE_URL}/{repo}/resolve/main/{name}");
        tracing::info!("Downloading {} from {}", name, url);
        self.download(&url, &dest).await?;
        Ok(dest)
    }

    /// Like [`resolve`](Self::resolve), but for gated repositories: refuses
    /// to attempt a download without a bearer token instead of surfacing the
    /// hub's 401 later.
    pub async fn resolve_gated(&self, repo: &str, name: &str, models_dir: &Path) -> Result<PathBuf> {
        if !models_dir.join(name).exists() && self.token.is_none() {
            anyhow::bail!(
                "{name} is not cached and no hub token is configured. \
                 Set HF_AUTH_TOKEN (or diarization.auth_token in the config) \
                 to download it from {repo}."
            );
        }
        self.resolve(repo, name, models_dir).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let mut request = self.http.get(url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Download request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("Hub returned an error status for {url}"))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body: {url}"))?;

        // Write to a temp file first, then rename for atomicity
        let temp_path = dest.with_extension("part");
        std::fs::write(&temp_path, &bytes)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, dest)
            .with_context(|| format!("Failed to move model into place: {}", dest.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_returns_cached_file_without_download() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("model.onnx"), b"cached").unwrap();

        let client = HubClient::new(None).unwrap();
        let path = client
            .resolve("nonexistent/repo", "model.onnx", tmp.path())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"cached");
    }

    #[tokio::test]
    async fn gated_resolve_without_token_fails_on_cold_cache() {
        let tmp = tempfile::tempdir().unwrap();

        let client = HubClient::new(None).unwrap();
        let err = client
            .resolve_gated("gated/repo", "segmentation.onnx", tmp.path())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("HF_AUTH_TOKEN"));
    }

    #[tokio::test]
    async fn gated_resolve_uses_cache_without_token() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("segmentation.onnx"), b"weights").unwrap();

        let client = HubClient::new(None).unwrap();
        let path = client
            .resolve_gated("gated/repo", "segmentation.onnx", tmp.path())
            .await
            .unwrap();

        assert!(path.ends_with("segmentation.onnx"));
    }

    #[tokio::test]
    async fn failed_download_leaves_no_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("model.onnx");

        let client = HubClient::new(Some("token".to_string())).unwrap();
        let result = client
            .download("http://invalid.nonexistent.example.com/model", &dest)
            .await;

        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
