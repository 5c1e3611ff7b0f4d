use axum::extract::Multipart;
use serde::Deserialize;

use crate::utils::errors::{bad_request_error, AppError};

#[derive(Debug, Deserialize)]
pub struct UpdateFileRequest {
    pub file_description: Option<String>,
}

/// Archivo recibido en el campo `file` del formulario
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Formulario multipart de `POST /api/files/upload`
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub section_id: Option<i32>,
    pub foreign_id: Option<i32>,
    pub file_description: Option<String>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let original_name = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid file upload: {}", e)))?;
                    form.file = Some(UploadedFile {
                        original_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                "section_id" | "foreign_id" | "file_description" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                    form.set_text(&name, value.trim())?;
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn set_text(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        match name {
            "section_id" => self.section_id = parse_id(name, value)?,
            "foreign_id" => self.foreign_id = parse_id(name, value)?,
            _ => self.file_description = Some(value.to_string()).filter(|v| !v.is_empty()),
        }
        Ok(())
    }
}

fn parse_id(name: &str, value: &str) -> Result<Option<i32>, AppError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| bad_request_error(&format!("{} must be a number", name)))
}

/// Extensión del nombre original, conservada en el nombre generado
pub fn file_extension(original_name: &str) -> Option<&str> {
    std::path::Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_parses_ids() {
        let mut form = UploadForm::default();
        form.set_text("section_id", "3").unwrap();
        form.set_text("foreign_id", "").unwrap();
        form.set_text("file_description", "").unwrap();
        assert_eq!(form.section_id, Some(3));
        assert_eq!(form.foreign_id, None);
        assert_eq!(form.file_description, None);
        assert!(form.set_text("foreign_id", "abc").is_err());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("factura.pdf"), Some("pdf"));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("evil.p/hp"), None);
    }
}
