use crate::client::S3Request;
use crate::{Client, Error, Result};
use awslite_core::hash::hex_sha256;
use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Method};

const X_AMZ_CONTENT_SHA_256: HeaderName = HeaderName::from_static("x-amz-content-sha256");
const X_AMZ_COPY_SOURCE: HeaderName = HeaderName::from_static("x-amz-copy-source");

/// Precondition header fields for read operations.
///
/// See <https://datatracker.ietf.org/doc/html/rfc7232#section-3>.
#[derive(Debug, Clone, Default)]
pub struct Preconditions {
    /// Succeed only when the stored ETag matches.
    pub if_match: Option<String>,
    /// Succeed only when the stored ETag does not match.
    pub if_none_match: Option<String>,
    /// Succeed only when modified since the given HTTP-date.
    pub if_modified_since: Option<String>,
    /// Succeed only when unmodified since the given HTTP-date.
    pub if_unmodified_since: Option<String>,
}

impl Preconditions {
    fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        // The ETag pair and the date pair are each mutually exclusive.
        if self.if_match.is_some() && self.if_none_match.is_some() {
            return Err(Error::InvalidRequest(
                "if_match and if_none_match cannot be used together".into(),
            ));
        }
        if self.if_modified_since.is_some() && self.if_unmodified_since.is_some() {
            return Err(Error::InvalidRequest(
                "if_modified_since and if_unmodified_since cannot be used together".into(),
            ));
        }

        let fields = [
            ("if-match", &self.if_match),
            ("if-none-match", &self.if_none_match),
            ("if-modified-since", &self.if_modified_since),
            ("if-unmodified-since", &self.if_unmodified_since),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                headers.insert(
                    HeaderName::from_static(name),
                    HeaderValue::from_str(value).map_err(awslite_core::Error::from)?,
                );
            }
        }
        Ok(())
    }
}

/// How the payload of a write is represented in `x-amz-content-sha256`.
#[derive(Debug, Clone, Default)]
pub enum PayloadHash {
    /// Send the `UNSIGNED-PAYLOAD` sentinel; the payload is not bound into
    /// the signature.
    #[default]
    Unsigned,
    /// Send a digest the caller already computed.
    Literal(String),
    /// Hash the payload here before signing.
    Computed,
}

/// Options for [`Client::put_object`].
#[derive(Debug, Clone, Default)]
pub struct PutObjectOptions {
    /// Payload hashing policy. Defaults to [`PayloadHash::Unsigned`].
    pub payload_hash: PayloadHash,
}

pub(crate) fn unsigned_payload(mut req: S3Request) -> S3Request {
    req.headers.insert(
        X_AMZ_CONTENT_SHA_256,
        HeaderValue::from_static("UNSIGNED-PAYLOAD"),
    );
    req
}

impl Client {
    /// Fetch an object.
    ///
    /// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html>
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        preconditions: &Preconditions,
    ) -> Result<Bytes> {
        let mut req = S3Request::new(Method::GET, bucket, Some(key))?;
        preconditions.apply(&mut req.headers)?;
        let response = self.execute(req).await?;
        Ok(response.into_body())
    }

    /// Fetch an object's metadata.
    ///
    /// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html>
    pub async fn head_object(
        &self,
        bucket: &str,
        key: &str,
        preconditions: &Preconditions,
    ) -> Result<HeaderMap> {
        let mut req = S3Request::new(Method::HEAD, bucket, Some(key))?;
        preconditions.apply(&mut req.headers)?;
        let response = self.execute(req).await?;
        Ok(response.into_parts().0.headers)
    }

    /// Store an object.
    ///
    /// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html>
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        options: &PutObjectOptions,
    ) -> Result<()> {
        let mut req = S3Request::new(Method::PUT, bucket, Some(key))?;
        match &options.payload_hash {
            PayloadHash::Unsigned => req = unsigned_payload(req),
            PayloadHash::Literal(digest) => {
                req.headers.insert(
                    X_AMZ_CONTENT_SHA_256,
                    HeaderValue::from_str(digest).map_err(awslite_core::Error::from)?,
                );
            }
            PayloadHash::Computed => {
                let digest = hex_sha256(&body);
                req.headers.insert(
                    X_AMZ_CONTENT_SHA_256,
                    HeaderValue::from_str(&digest).map_err(awslite_core::Error::from)?,
                );
            }
        }
        self.execute(req.body(body)).await?;
        Ok(())
    }

    /// Delete an object.
    ///
    /// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObject.html>
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let req = S3Request::new(Method::DELETE, bucket, Some(key))?;
        self.execute(req).await?;
        Ok(())
    }

    /// Copy an object server-side.
    ///
    /// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_CopyObject.html>
    pub async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        bucket: &str,
        key: &str,
    ) -> Result<()> {
        if source_bucket.is_empty() || source_key.is_empty() {
            return Err(Error::InvalidRequest(
                "copy source bucket and key must not be empty".into(),
            ));
        }
        let mut req = S3Request::new(Method::PUT, bucket, Some(key))?;
        req.headers.insert(
            X_AMZ_COPY_SOURCE,
            HeaderValue::from_str(&format!("{source_bucket}/{source_key}"))
                .map_err(awslite_core::Error::from)?,
        );
        self.execute(req).await?;
        Ok(())
    }
}
