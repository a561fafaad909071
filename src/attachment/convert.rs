//! Conversion of accepted files into draft attachments.
//!
//! Each file is read, hashed, and pinned in the local resource registry.
//! Files are converted concurrently and may finish in any order; the batch
//! succeeds only if every file converts, and results keep input order.

use std::sync::Arc;

use futures::future::try_join_all;
use sha2::{Digest, Sha256};

use crate::error::{OutreachError, Result};
use crate::model::attachment::{AttachmentCandidate, AttachmentSource};
use crate::model::file::RawFile;

use super::handle::LocalResourceRegistry;

/// Convert one file. The size checks ran on the declared size, so content
/// larger than declared fails the conversion; smaller content is recorded
/// at its actual size.
pub async fn convert_file(
    file: RawFile,
    registry: &LocalResourceRegistry,
) -> Result<AttachmentCandidate> {
    let bytes = file
        .read()
        .await
        .map_err(|e| OutreachError::BatchConversion {
            file_name: file.name.clone(),
            reason: e.to_string(),
        })?;

    let actual = bytes.len() as u64;
    if actual > file.size_bytes {
        tracing::warn!(
            file = %file.name,
            declared = file.size_bytes,
            actual,
            "Attachment grew since it was checked"
        );
        return Err(OutreachError::BatchConversion {
            file_name: file.name,
            reason: format!(
                "content is {actual} bytes but {} were declared",
                file.size_bytes
            ),
        });
    }
    if actual < file.size_bytes {
        tracing::debug!(
            file = %file.name,
            declared = file.size_bytes,
            actual,
            "Attachment shrank since it was checked"
        );
    }

    let sha256 = hex::encode(Sha256::digest(&bytes));
    let content: Arc<[u8]> = bytes.into();
    let handle = registry.register(Arc::clone(&content));

    Ok(AttachmentCandidate {
        file_name: file.name,
        mime_type: file.mime_type,
        size_bytes: content.len() as u64,
        source: AttachmentSource::Local {
            handle,
            content,
            sha256,
        },
    })
}

/// Convert a whole batch. On the first failure the already converted
/// attachments are dropped, which releases their handles.
pub async fn convert_batch(
    files: Vec<RawFile>,
    registry: &LocalResourceRegistry,
) -> Result<Vec<AttachmentCandidate>> {
    let count = files.len();
    let converted = try_join_all(files.into_iter().map(|f| convert_file(f, registry))).await;

    match converted {
        Ok(attachments) => {
            tracing::debug!(count, "Converted attachment batch");
            Ok(attachments)
        }
        Err(e) => {
            tracing::warn!(count, error = %e, "Attachment batch conversion failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[tokio::test]
    async fn test_convert_file_hashes_and_registers() {
        let registry = LocalResourceRegistry::new();
        let file = RawFile::from_bytes("abc.txt", "text/plain", b"abc".to_vec());

        let att = convert_file(file, &registry).await.unwrap();
        assert_eq!(att.size_bytes, 3);
        assert!(!att.is_persisted());
        assert_eq!(registry.live_handles(), 1);
        match &att.source {
            AttachmentSource::Local { sha256, .. } => assert_eq!(
                sha256,
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            ),
            AttachmentSource::Persisted { .. } => panic!("expected local attachment"),
        }

        drop(att);
        assert_eq!(registry.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_content_larger_than_declared_is_refused() {
        let registry = LocalResourceRegistry::new();
        let file = RawFile::new(
            "big.png",
            "image/png",
            10,
            Arc::new(crate::model::file::MemorySource::new(vec![0u8; 2 * 1024 * 1024])),
        );

        let err = convert_file(file, &registry).await.unwrap_err();
        assert!(matches!(
            err,
            OutreachError::BatchConversion { ref file_name, .. } if file_name == "big.png"
        ));
        assert_eq!(registry.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_content_smaller_than_declared_records_actual_size() {
        let registry = LocalResourceRegistry::new();
        let file = RawFile::new(
            "small.png",
            "image/png",
            100,
            Arc::new(crate::model::file::MemorySource::new(vec![0u8; 40])),
        );

        let att = convert_file(file, &registry).await.unwrap();
        assert_eq!(att.size_bytes, 40);
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let registry = LocalResourceRegistry::new();
        let files = vec![
            RawFile::from_bytes("1.txt", "text/plain", b"one".to_vec()),
            RawFile::from_bytes("2.txt", "text/plain", b"two".to_vec()),
            RawFile::from_bytes("3.txt", "text/plain", b"three".to_vec()),
        ];

        let batch = convert_batch(files, &registry).await.unwrap();
        let names: Vec<&str> = batch.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, ["1.txt", "2.txt", "3.txt"]);
        assert_eq!(registry.live_handles(), 3);
    }

    #[tokio::test]
    async fn test_batch_failure_releases_everything() {
        let registry = LocalResourceRegistry::new();
        let missing = RawFile::new(
            "gone.pdf",
            "application/pdf",
            10,
            Arc::new(crate::model::file::PathSource::new(Path::new(
                "/definitely/not/here.pdf",
            ))),
        );
        let files = vec![
            RawFile::from_bytes("ok.txt", "text/plain", b"fine".to_vec()),
            missing,
        ];

        let err = convert_batch(files, &registry).await.unwrap_err();
        assert!(matches!(
            err,
            OutreachError::BatchConversion { ref file_name, .. } if file_name == "gone.pdf"
        ));
        assert_eq!(registry.live_handles(), 0);
    }
}
