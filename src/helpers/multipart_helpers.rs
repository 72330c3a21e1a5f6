use std::collections::HashMap;

use axum::extract::Multipart;

use crate::{
    error::{Error, Result},
    services::media_service::UploadedFile,
};

/// A multipart body read fully into memory: text fields and file parts.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input.
                    if !bytes.is_empty() {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name,
                                bytes: bytes.to_vec(),
                            },
                        );
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn required_text(&self, name: &str) -> Result<String> {
        self.text(name).ok_or_else(|| Error::InvalidInput {
            reason: format!("Missing field '{name}'"),
        })
    }

    /// Untrimmed field, for values such as passwords.
    pub fn required_raw(&self, name: &str) -> Result<String> {
        self.fields
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or_else(|| Error::InvalidInput {
                reason: format!("Missing field '{name}'"),
            })
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn required_file(&mut self, name: &str) -> Result<UploadedFile> {
        self.take_file(name).ok_or_else(|| Error::InvalidInput {
            reason: format!("Missing file '{name}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MultipartBody;
    use axum::{body::Body, extract::FromRequest, http::Request};

    async fn parse(body: MultipartBody) -> MultipartForm {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", body.content_type())
            .body(Body::from(body.finish()))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        MultipartForm::from_multipart(multipart).await.unwrap()
    }

    #[tokio::test]
    async fn test_fields_and_files() {
        let mut form = parse(
            MultipartBody::new()
                .text("title", "  Intro  ")
                .text("caption", "   ")
                .text("password", " pass word ")
                .file("audio", "intro.wav", b"RIFF")
                .file("picture", "empty.png", b""),
        )
        .await;

        assert_eq!(form.text("title").as_deref(), Some("Intro"));
        assert_eq!(form.text("caption"), None);
        assert!(matches!(
            form.required_text("caption"),
            Err(Error::InvalidInput { .. })
        ));

        assert_eq!(form.required_raw("password").unwrap(), " pass word ");

        let audio = form.required_file("audio").unwrap();
        assert_eq!(audio.file_name, "intro.wav");
        assert_eq!(audio.bytes, b"RIFF");

        assert!(form.take_file("picture").is_none());
        assert!(form.required_file("audio").is_err());
    }
}
