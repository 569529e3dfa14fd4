use crate::client::S3Request;
use crate::xml::complete_multipart_upload_body;
use crate::{ChunkedReader, Client, Error, PartSource, Result};
use awslite_core::Error as CoreError;
use bytes::Bytes;
use http::Method;
use log::{debug, warn};
use serde::Deserialize;
use tokio::io::AsyncRead;

/// Parts other than the final one must be at least this large, or the
/// service rejects the completion with EntityTooSmall.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// A single upload can carry at most this many parts.
pub const MAX_PART_COUNT: u16 = 10000;

/// A part the service has acknowledged.
#[derive(Debug, Clone)]
pub struct CompletedPart {
    /// 1-based position of the part within the upload.
    pub part_number: u16,
    /// Integrity token returned by the service for the part.
    pub etag: String,
}

/// Response of `CreateMultipartUpload`.
///
/// ```xml
/// <InitiateMultipartUploadResult>
///   <Bucket>string</Bucket><Key>string</Key><UploadId>string</UploadId>
/// </InitiateMultipartUploadResult>
/// ```
#[derive(Debug, Deserialize)]
struct InitiateMultipartUploadResult {
    #[serde(rename = "UploadId")]
    upload_id: String,
}

impl Client {
    /// Start a multipart upload session and return its upload id.
    ///
    /// Prefer [`multipart_upload`](Client::multipart_upload) unless you need
    /// to drive the session yourself.
    pub async fn create_multipart_upload(&self, bucket: &str, key: &str) -> Result<String> {
        let req = S3Request::new(Method::POST, bucket, Some(key))?.query_push("uploads", "");
        let response = self.execute(req).await?;

        let body = String::from_utf8_lossy(response.body());
        let decoded: InitiateMultipartUploadResult =
            quick_xml::de::from_str(&body).map_err(|e| {
                CoreError::response_invalid("UploadId not found in CreateMultipartUpload response")
                    .with_source(e)
            })?;
        // An empty element decodes cleanly, but an upload id must be a
        // usable session handle.
        if decoded.upload_id.is_empty() {
            return Err(Error::Core(CoreError::response_invalid(
                "CreateMultipartUpload response carries an empty UploadId",
            )));
        }
        Ok(decoded.upload_id)
    }

    /// Upload one part of a session and return its ETag.
    pub async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u16,
        body: Bytes,
    ) -> Result<String> {
        let req = S3Request::new(Method::PUT, bucket, Some(key))?
            .query_push("partNumber", &part_number.to_string())
            .query_push("uploadId", upload_id)
            .body(body);
        let response = self.execute(crate::object::unsigned_payload(req)).await?;

        let etag = response
            .headers()
            .get(http::header::ETAG)
            .ok_or_else(|| CoreError::response_invalid("no etag returned for uploaded part"))?;
        Ok(etag.to_str().map_err(CoreError::from)?.to_string())
    }

    /// Complete a multipart upload from its acknowledged parts, which must
    /// be in ascending part-number order.
    pub async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> Result<()> {
        let body = complete_multipart_upload_body(parts);
        let req = S3Request::new(Method::POST, bucket, Some(key))?
            .query_push("uploadId", upload_id)
            .body(Bytes::from(body));
        self.execute(req).await?;
        Ok(())
    }

    /// Abort a multipart upload, discarding any parts uploaded so far.
    pub async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<()> {
        let req = S3Request::new(Method::DELETE, bucket, Some(key))?
            .query_push("uploadId", upload_id);
        self.execute(req).await?;
        Ok(())
    }

    /// Upload a payload of unknown size as a multipart session.
    ///
    /// Creates the session, uploads every part the source produces under
    /// its own signed request, then completes the session. On any failure
    /// after creation the session is aborted (best-effort; an abort failure
    /// is logged and never masks the original error) and the original
    /// failure is rethrown wrapped in [`Error::Aborted`].
    ///
    /// Parts are uploaded strictly sequentially: the source is a stateful
    /// iterator, so "read the next part" and "upload the current part"
    /// never overlap.
    pub async fn multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        source: &mut dyn PartSource,
    ) -> Result<()> {
        // Failing here is fatal but clean: no session exists yet, so there
        // is nothing to abort.
        let upload_id = self.create_multipart_upload(bucket, key).await?;
        debug!("created multipart upload {upload_id} for {bucket}/{key}");

        match self.upload_parts(bucket, key, &upload_id, source).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Err(abort_err) = self.abort_multipart_upload(bucket, key, &upload_id).await {
                    warn!("failed to abort multipart upload {upload_id}: {abort_err}");
                }
                Err(Error::Aborted {
                    source: Box::new(err),
                })
            }
        }
    }

    /// Upload a byte stream as a multipart session, cutting it into
    /// 10 MiB parts. See [`multipart_upload`](Client::multipart_upload).
    pub async fn multipart_upload_stream<R>(
        &self,
        bucket: &str,
        key: &str,
        reader: R,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut source = ChunkedReader::new(reader);
        self.multipart_upload(bucket, key, &mut source).await
    }

    async fn upload_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        source: &mut dyn PartSource,
    ) -> Result<()> {
        let mut parts: Vec<CompletedPart> = Vec::new();

        // The completion body must list parts in ascending order, so the
        // loop allocates part numbers as it pulls.
        let mut part_number: u16 = 1;
        loop {
            let part = source.next_part().await?;

            if !part.is_final && (part.body.len() as u64) < MIN_PART_SIZE {
                return Err(Error::PartTooSmall {
                    part_number,
                    size: part.body.len() as u64,
                });
            }

            let etag = self
                .upload_part(bucket, key, upload_id, part_number, part.body)
                .await?;
            parts.push(CompletedPart { part_number, etag });

            if part.is_final {
                break;
            }
            if part_number >= MAX_PART_COUNT {
                return Err(Error::TooManyParts);
            }
            part_number += 1;
        }

        self.complete_multipart_upload(bucket, key, upload_id, &parts)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_client, MockHttp};
    use crate::Part;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    const MIB: usize = 1024 * 1024;

    /// Yields a scripted list of (size, is_final) parts.
    struct ScriptedSource {
        parts: std::vec::IntoIter<(usize, bool)>,
        filler: Bytes,
    }

    impl ScriptedSource {
        fn new(parts: &[(usize, bool)]) -> Self {
            Self {
                parts: parts.to_vec().into_iter(),
                // One shared buffer; slicing Bytes is cheap.
                filler: Bytes::from(vec![7u8; 5 * MIB]),
            }
        }
    }

    #[async_trait]
    impl PartSource for ScriptedSource {
        async fn next_part(&mut self) -> Result<Part> {
            let (size, is_final) = self.parts.next().expect("source exhausted");
            Ok(Part {
                body: self.filler.slice(..size),
                is_final,
            })
        }
    }

    /// Never finishes; every part is a legal 5 MiB.
    struct EndlessSource {
        filler: Bytes,
    }

    impl EndlessSource {
        fn new() -> Self {
            Self {
                filler: Bytes::from(vec![7u8; 5 * MIB]),
            }
        }
    }

    #[async_trait]
    impl PartSource for EndlessSource {
        async fn next_part(&mut self) -> Result<Part> {
            Ok(Part {
                body: self.filler.clone(),
                is_final: false,
            })
        }
    }

    #[tokio::test]
    async fn test_happy_path_three_parts() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock = MockHttp::new();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(5 * MIB, false), (5 * MIB, false), (MIB, true)]);

        client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await?;

        let recorded = mock.requests();
        assert_eq!(recorded.len(), 5);

        assert_eq!(recorded[0].method, Method::POST);
        assert!(recorded[0].uri.ends_with("/my-key?uploads"));

        for (i, part_number) in (1..=3).enumerate() {
            let req = &recorded[i + 1];
            assert_eq!(req.method, Method::PUT);
            assert!(req
                .uri
                .contains(&format!("partNumber={part_number}&uploadId=test-upload-id")));
        }
        assert_eq!(recorded[1].body.len(), 5 * MIB);
        assert_eq!(recorded[3].body.len(), MIB);

        let complete = &recorded[4];
        assert_eq!(complete.method, Method::POST);
        assert!(complete.uri.contains("uploadId=test-upload-id"));
        assert_eq!(
            String::from_utf8_lossy(&complete.body),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <CompleteMultipartUpload xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <Part><ETag>&quot;etag-1&quot;</ETag><PartNumber>1</PartNumber></Part>\
             <Part><ETag>&quot;etag-2&quot;</ETag><PartNumber>2</PartNumber></Part>\
             <Part><ETag>&quot;etag-3&quot;</ETag><PartNumber>3</PartNumber></Part>\
             </CompleteMultipartUpload>"
        );

        assert!(
            !recorded.iter().any(|r| r.method == Method::DELETE),
            "a successful upload must never abort"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_undersized_part_aborts() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(5 * MIB, false), (MIB, false)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        let Error::Aborted { source } = err else {
            panic!("expected the aborted wrapper, got {err:?}");
        };
        assert!(matches!(
            *source,
            Error::PartTooSmall { part_number: 2, .. }
        ));

        let recorded = mock.requests();
        let aborts: Vec<_> = recorded
            .iter()
            .filter(|r| r.method == Method::DELETE)
            .collect();
        assert_eq!(aborts.len(), 1);
        assert!(aborts[0].uri.contains("uploadId=test-upload-id"));

        // The undersized part was never uploaded and the session never
        // completed.
        assert!(!recorded.iter().any(|r| r.uri.contains("partNumber=2")));
        assert!(!recorded
            .iter()
            .any(|r| r.method == Method::POST && r.uri.contains("uploadId")));
        Ok(())
    }

    #[tokio::test]
    async fn test_part_count_limit_aborts() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        let client = test_client(&mock, |c| c);
        let mut source = EndlessSource::new();

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        let Error::Aborted { source } = err else {
            panic!("expected the aborted wrapper, got {err:?}");
        };
        assert!(matches!(*source, Error::TooManyParts));

        let recorded = mock.requests();
        let uploads = recorded
            .iter()
            .filter(|r| r.uri.contains("partNumber="))
            .count();
        assert_eq!(uploads, MAX_PART_COUNT as usize);
        assert_eq!(
            recorded
                .iter()
                .filter(|r| r.method == Method::DELETE)
                .count(),
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_etag_aborts() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        mock.omit_etag();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(MIB, true)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        let Error::Aborted { source } = err else {
            panic!("expected the aborted wrapper, got {err:?}");
        };
        let Error::Core(core) = *source else {
            panic!("expected a protocol error");
        };
        assert_eq!(core.kind(), awslite_core::ErrorKind::ResponseInvalid);

        assert_eq!(
            mock.requests()
                .iter()
                .filter(|r| r.method == Method::DELETE)
                .count(),
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_upload_id_is_a_protocol_error() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        mock.empty_upload_id();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(MIB, true)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        // A degenerate create response leaves no session to drive or to
        // abort; the failure surfaces directly.
        let Error::Core(core) = err else {
            panic!("expected a protocol error, got {err:?}");
        };
        assert_eq!(core.kind(), awslite_core::ErrorKind::ResponseInvalid);
        assert_eq!(mock.requests().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_failure_surfaces_directly() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        mock.fail_create();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(MIB, true)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        // No session was created, so there is nothing to abort and no
        // wrapper to apply.
        assert!(matches!(err, Error::Service { .. }));
        assert_eq!(mock.requests().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_part_aborts_with_original_error() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        mock.fail_part(2);
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(5 * MIB, false), (5 * MIB, false), (MIB, true)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        let Error::Aborted { source } = err else {
            panic!("expected the aborted wrapper, got {err:?}");
        };
        assert!(matches!(*source, Error::Service { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_abort_failure_never_masks_original_error() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock = MockHttp::new();
        mock.fail_part(1);
        mock.fail_abort();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(5 * MIB, false), (MIB, true)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        // The abort failed too, but the part failure is what surfaces.
        let Error::Aborted { source } = err else {
            panic!("expected the aborted wrapper, got {err:?}");
        };
        let Error::Service { code, .. } = *source else {
            panic!("expected the part upload failure");
        };
        assert_eq!(code, "InternalError");
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_failure_aborts() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        mock.fail_complete();
        let client = test_client(&mock, |c| c);
        let mut source = ScriptedSource::new(&[(MIB, true)]);

        let err = client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Aborted { .. }));
        assert_eq!(
            mock.requests()
                .iter()
                .filter(|r| r.method == Method::DELETE)
                .count(),
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_single_final_part_upload() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        let client = test_client(&mock, |c| c);

        // A final part may be arbitrarily small.
        let mut source = ScriptedSource::new(&[(3, true)]);
        client
            .multipart_upload("my-bucket", "my-key", &mut source)
            .await?;

        let recorded = mock.requests();
        assert_eq!(recorded.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_multipart_upload_stream_chunks_reader() -> anyhow::Result<()> {
        let mock = MockHttp::new();
        let client = test_client(&mock, |c| c);

        let data = vec![7u8; 12 * MIB];
        client
            .multipart_upload_stream("my-bucket", "my-key", data.as_slice())
            .await?;

        let recorded = mock.requests();
        // create, two parts (10 MiB + 2 MiB), complete.
        assert_eq!(recorded.len(), 4);
        assert_eq!(recorded[1].body.len(), 10 * MIB);
        assert_eq!(recorded[2].body.len(), 2 * MIB);
        Ok(())
    }
}
