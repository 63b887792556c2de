//! Uploaded media attached to file-upload, camera and signature questions
//!
//! The engine never touches file contents. It hands bytes to a
//! [`MediaStore`] and keeps the returned source string.

use crate::error::SchemaError;
use crate::schema::Question;
use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Response of an upload; either field may carry the stored source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl UploadedMedia {
    /// `url` if present, otherwise `path`
    pub fn src(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.path.as_deref().filter(|p| !p.is_empty()))
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> anyhow::Result<UploadedMedia>;
    async fn delete(&self, src: &str) -> anyhow::Result<()>;
}

/// Record an upload on the question; `None` if the response had no source
pub fn attach_upload(
    question: &mut Question,
    uploaded: &UploadedMedia,
) -> Result<Option<String>, SchemaError> {
    let attachments = question.attachments_mut()?;
    let Some(src) = uploaded.src() else {
        warn!("Upload response carried neither url nor path");
        return Ok(None);
    };
    attachments.push(src.to_string());
    Ok(Some(src.to_string()))
}

/// Upload through `store` and attach the result
pub async fn upload_into(
    question: &mut Question,
    store: &dyn MediaStore,
    bytes: Vec<u8>,
    file_name: &str,
) -> anyhow::Result<Option<String>> {
    question.attachments_mut()?;
    let uploaded = store
        .upload(bytes, file_name)
        .await
        .with_context(|| format!("Failed to upload {}", file_name))?;
    Ok(attach_upload(question, &uploaded)?)
}

/// Remove `src` from the question and delete it from the store
///
/// The attachment is dropped locally even when the store fails; the
/// store error is still returned for the host to report.
pub async fn detach(question: &mut Question, src: &str, store: &dyn MediaStore) -> anyhow::Result<()> {
    let attachments = question.attachments_mut()?;
    if let Some(index) = attachments.iter().position(|a| a == src) {
        attachments.remove(index);
        debug!("Detached {}", src);
    }
    store
        .delete(src)
        .await
        .with_context(|| format!("Failed to delete {}", src))
}

/// Absolute URL for a stored source
pub fn resolve_src(host: &str, src: &str) -> String {
    if src.is_empty() {
        return String::new();
    }
    if src.starts_with("https://") || src.starts_with("http://") {
        return src.to_string();
    }
    format!("{}/{}", host, src)
}

/// Stable id of a stored file: its name without folders or extension
pub fn media_uid(src: &str) -> &str {
    let name = src.rsplit('/').next().unwrap_or(src);
    name.split('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QuestionType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        deleted: Mutex<Vec<String>>,
        fail_delete: bool,
    }

    #[async_trait]
    impl MediaStore for FakeStore {
        async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> anyhow::Result<UploadedMedia> {
            Ok(UploadedMedia {
                url: None,
                path: Some(format!("uploads/{}-{}", bytes.len(), file_name)),
            })
        }

        async fn delete(&self, src: &str) -> anyhow::Result<()> {
            if self.fail_delete {
                anyhow::bail!("storage offline");
            }
            self.deleted.lock().unwrap().push(src.to_string());
            Ok(())
        }
    }

    fn upload_question() -> Question {
        let mut question = Question::new(1);
        question.set_type(QuestionType::FileUpload);
        question
    }

    #[test]
    fn test_src_prefers_url() {
        let both = UploadedMedia {
            url: Some("https://cdn/x.png".into()),
            path: Some("x.png".into()),
        };
        assert_eq!(both.src(), Some("https://cdn/x.png"));

        let path_only = UploadedMedia {
            url: Some(String::new()),
            path: Some("x.png".into()),
        };
        assert_eq!(path_only.src(), Some("x.png"));
        assert_eq!(UploadedMedia::default().src(), None);
    }

    #[test]
    fn test_attach_requires_media_question() {
        let mut question = Question::new(1);
        let uploaded = UploadedMedia {
            url: Some("a.png".into()),
            path: None,
        };
        assert!(matches!(
            attach_upload(&mut question, &uploaded),
            Err(SchemaError::WrongKind(_))
        ));

        let mut question = upload_question();
        assert_eq!(attach_upload(&mut question, &uploaded).unwrap(), Some("a.png".into()));
        assert_eq!(attach_upload(&mut question, &UploadedMedia::default()).unwrap(), None);
        assert_eq!(question.attachments().unwrap(), &["a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_upload_and_detach() {
        let store = FakeStore::default();
        let mut question = upload_question();

        let src = upload_into(&mut question, &store, vec![1, 2, 3], "cv.pdf")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(src, "uploads/3-cv.pdf");

        detach(&mut question, &src, &store).await.unwrap();
        assert!(question.attachments().unwrap().is_empty());
        assert_eq!(store.deleted.lock().unwrap().as_slice(), &[src]);
    }

    #[tokio::test]
    async fn test_detach_drops_locally_when_store_fails() {
        let store = FakeStore {
            fail_delete: true,
            ..FakeStore::default()
        };
        let mut question = upload_question();
        question.attachments_mut().unwrap().push("a.png".into());

        assert!(detach(&mut question, "a.png", &store).await.is_err());
        assert!(question.attachments().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_src_and_uid() {
        assert_eq!(resolve_src("https://api.example.com", "media/a.png"), "https://api.example.com/media/a.png");
        assert_eq!(resolve_src("https://api.example.com", "http://cdn/a.png"), "http://cdn/a.png");
        assert_eq!(resolve_src("https://api.example.com", ""), "");
        assert_eq!(media_uid("media/2024/abc123.png"), "abc123");
        assert_eq!(media_uid("plain"), "plain");
    }
}
