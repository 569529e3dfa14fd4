use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};
use crate::{Credential, SigningKeyCache};
use async_trait::async_trait;
use awslite_core::hash::{hex_hmac_sha256, hex_sha256, EMPTY_STRING_SHA256};
use awslite_core::time::{format_iso8601, now, DateTime};
use awslite_core::{Context, Error, Result, SignRequest, SigningRequest};
use bytes::Bytes;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Write;

/// RequestSigner that implements AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Signing is deterministic: for a fixed request, credential and timestamp
/// the produced authorization header is byte-identical, and it does not
/// depend on the insertion order of query parameters or headers.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    key_cache: SigningKeyCache,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new AWS V4 signer for the given service and region.
    ///
    /// Each signer owns its signing-key cache; signers configured with
    /// different credentials or regions never share derived keys.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            key_cache: SigningKeyCache::default(),

            time: None,
        }
    }

    /// Access the signing-key cache, e.g. to observe derivation counts.
    pub fn key_cache(&self) -> &SigningKeyCache {
        &self.key_cache
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub(crate) fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: Option<&Bytes>,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        // Fail before touching the request: nothing here may reach the
        // network with an unsignable configuration.
        if self.region.is_empty() {
            return Err(Error::config_invalid("region is not set"));
        }
        let cred = credential
            .ok_or_else(|| Error::credential_invalid("no credential loaded for signing"))?;
        if cred.secret_access_key.is_empty() {
            return Err(Error::credential_invalid("secret access key is not set"));
        }

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        canonicalize_header(&mut signed_req, cred, body, now)?;
        canonicalize_query(&mut signed_req);

        // The timestamp the request was signed with; its first 8 chars are
        // the scope date.
        let amz_date = signed_req
            .header_get_or_default(&header::HeaderName::from_static(X_AMZ_DATE))?
            .to_string();
        if amz_date.len() < 8 || !amz_date.is_char_boundary(8) {
            return Err(Error::request_invalid(format!(
                "x-amz-date {amz_date} is not in YYYYMMDDTHHMMSSZ form"
            )));
        }
        let date = &amz_date[..8];

        let creq = canonical_request_string(&signed_req)?;
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "AWS4-HMAC-SHA256")?;
            writeln!(f, "{amz_date}")?;
            writeln!(f, "{scope}")?;
            write!(f, "{encoded_req}")?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            self.key_cache
                .signing_key(&cred.secret_access_key, date, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            signed_req.header_name_to_vec_sorted().join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn canonical_request_string(ctx: &SigningRequest) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", ctx.method)?;
    // The path is decoded and re-encoded so the canonical form is stable
    // no matter how the caller escaped it.
    let path = percent_decode_str(&ctx.path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid("request path is not valid utf-8").with_source(e))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| { format!("{k}={v}") })
            .collect::<Vec<_>>()
            .join("&")
    )?;
    let signed_headers = ctx.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        writeln!(f, "{}:{}", name, ctx.headers[*name].to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;

    // canonicalize_header resolved the body hash up front, so the slot is
    // always populated by now.
    write!(
        f,
        "{}",
        ctx.headers[X_AMZ_CONTENT_SHA_256]
            .to_str()
            .map_err(|e| Error::request_invalid("invalid content sha256 header").with_source(e))?
    )?;

    Ok(f)
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    cred: &Credential,
    body: Option<&Bytes>,
    now: DateTime,
) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of
    // https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // The signature must match the host actually dialed, so the authority
    // always wins over a caller-supplied host header.
    ctx.headers
        .insert(header::HOST, ctx.authority.as_str().parse()?);

    // Insert DATE header if not present.
    if ctx.headers.get(X_AMZ_DATE).is_none() {
        ctx.headers
            .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);
    }

    // Resolve the body hash once per request. A caller-supplied value (a
    // literal digest or UNSIGNED-PAYLOAD) is kept untouched; that policy
    // belongs to the service layer, not to this signer.
    if ctx.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
        let content_sha256 = match body {
            Some(b) if !b.is_empty() => hex_sha256(b),
            _ => EMPTY_STRING_SHA256.to_string(),
        };
        ctx.headers
            .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::try_from(content_sha256)?);
    }

    if let Some(b) = body {
        if !b.is_empty() && ctx.headers.get(header::CONTENT_LENGTH).is_none() {
            ctx.headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(b.len()));
        }
    }

    // The session token is sent as a header, and is part of the signed
    // header set.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Sort by param name, byte-wise.
    ctx.query.sort();

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}
