use std::path::PathBuf;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::file_dto::{file_extension, UpdateFileRequest, UploadForm};
use crate::models::file::{FileDetail, FileRecord};
use crate::repositories::file_repository::{FileRepository, NewFile};
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};

/// Contenido de un archivo listo para descargar
pub struct FileDownload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct FileController {
    repository: FileRepository,
    upload_dir: PathBuf,
}

impl FileController {
    pub fn new(pool: PgPool, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository: FileRepository::new(pool),
            upload_dir: upload_dir.into(),
        }
    }

    /// Escribe el archivo con un nombre generado y registra sus metadatos
    pub async fn upload(&self, form: UploadForm, user_id: i32) -> Result<FileRecord, AppError> {
        let upload = form.file.ok_or_else(|| bad_request_error("No file uploaded"))?;
        let (section_id, foreign_id) = match (form.section_id, form.foreign_id) {
            (Some(section_id), Some(foreign_id)) => (section_id, foreign_id),
            _ => return Err(bad_request_error("section_id and foreign_id are required")),
        };

        let stored_name = match file_extension(&upload.original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.upload_dir.join(&stored_name);
        tokio::fs::write(&path, &upload.bytes).await?;
        let file_path = path.to_string_lossy().into_owned();

        let new_file = NewFile {
            section_id,
            foreign_id,
            file_name: &upload.original_name,
            file_path: &file_path,
            file_size: upload.bytes.len() as i64,
            file_type: upload.content_type.as_deref(),
            file_description: form.file_description.as_deref(),
        };

        match self.repository.create(&new_file, user_id).await {
            Ok(record) => {
                info!("📎 Archivo {} guardado en {}", record.file_name, record.file_path);
                Ok(record)
            }
            Err(e) => {
                if let Err(io) = tokio::fs::remove_file(&path).await {
                    warn!("⚠️ No se pudo eliminar {}: {}", file_path, io);
                }
                Err(e)
            }
        }
    }

    pub async fn by_entity(&self, section_id: i32, foreign_id: i32) -> Result<Vec<FileDetail>, AppError> {
        self.repository.by_entity(section_id, foreign_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<FileDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("File"))
    }

    pub async fn download(&self, id: i32) -> Result<FileDownload, AppError> {
        let detail = self.get_by_id(id).await?;
        let record = detail.file;

        let bytes = match tokio::fs::read(&record.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound("File not found on disk".to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(FileDownload {
            file_name: record.file_name,
            content_type: record
                .file_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes,
        })
    }

    pub async fn update(&self, id: i32, request: UpdateFileRequest, user_id: i32) -> Result<(), AppError> {
        let updated = self
            .repository
            .update_description(id, request.file_description.as_deref(), user_id)
            .await?;
        if !updated {
            return Err(not_found_or_deleted("File"));
        }
        Ok(())
    }

    /// Baja lógica; el archivo permanece en disco
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("File"));
        }
        Ok(())
    }
}

/// Valor de `Content-Disposition` para forzar la descarga
pub fn attachment_header(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_header_escapes_quotes() {
        assert_eq!(attachment_header("plano.pdf"), "attachment; filename=\"plano.pdf\"");
        assert_eq!(attachment_header("a\"b\n.txt"), "attachment; filename=\"a_b_.txt\"");
    }
}
