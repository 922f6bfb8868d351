use actix_multipart::Multipart;
use futures_util::StreamExt;
use log::debug;

use super::{FormFields, FormLimits};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data in field '{0}'")]
    Utf8Error(String),
    #[error("Field '{0}' exceeds the maximum size of {1} bytes")]
    FieldTooLarge(String, usize),
    #[error("Form body exceeds the maximum size of {0} bytes")]
    FormTooLarge(usize),
    #[error("Invalid form body: {0}")]
    Body(String),
}

pub struct MultipartParser;

impl MultipartParser {
    /// Collect every text part of a multipart form into [`FormFields`].
    ///
    /// Parts that carry a filename are file uploads and are drained without
    /// being kept. A text part larger than `limits.max_field_bytes` is
    /// rejected, as is a body whose parts (names, values and skipped uploads)
    /// add up to more than `limits.max_form_bytes`.
    pub async fn parse_form_fields(
        mut multipart: Multipart,
        limits: FormLimits,
    ) -> Result<FormFields, FormError> {
        let mut fields = FormFields::new();
        let mut total = 0usize;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| FormError::FieldError(e.to_string()))?;
            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| FormError::FieldError("Content disposition not found".to_string()))?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| FormError::FieldError("Field name not found".to_string()))?
                .to_string();

            total += name.len();
            if total > limits.max_form_bytes {
                return Err(FormError::FormTooLarge(limits.max_form_bytes));
            }

            if content_disposition.get_filename().is_some() {
                debug!("Skipping file part '{}'", name);
                while let Some(chunk) = field.next().await {
                    let data_chunk = chunk.map_err(|e| FormError::IoError(e.to_string()))?;
                    total += data_chunk.len();
                    if total > limits.max_form_bytes {
                        return Err(FormError::FormTooLarge(limits.max_form_bytes));
                    }
                }
                continue;
            }

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| FormError::IoError(e.to_string()))?;
                if buffer.len() + data_chunk.len() > limits.max_field_bytes {
                    return Err(FormError::FieldTooLarge(name, limits.max_field_bytes));
                }
                total += data_chunk.len();
                if total > limits.max_form_bytes {
                    return Err(FormError::FormTooLarge(limits.max_form_bytes));
                }
                buffer.extend_from_slice(&data_chunk);
            }

            let value = String::from_utf8(buffer).map_err(|_| FormError::Utf8Error(name.clone()))?;
            fields.push(name, value);
        }

        Ok(fields)
    }
}
