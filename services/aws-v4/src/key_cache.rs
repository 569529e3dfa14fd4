use awslite_core::hash::hmac_sha256;
use std::collections::{HashMap, VecDeque};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// How many derived keys a cache retains before evicting the least
/// recently used scope. The scope date rolls daily, so old entries stop
/// being addressable on their own; the bound keeps long-lived processes
/// from accumulating one key per day per region/service.
const DEFAULT_CAPACITY: usize = 64;

/// The scope a derived signing key is valid for.
///
/// A key is addressed only by these four values; changing any of them
/// requires deriving a fresh key.
#[derive(Clone, Hash, PartialEq, Eq)]
struct Scope {
    secret: String,
    date: String,
    region: String,
    service: String,
}

/// A bounded cache of derived SigV4 signing keys.
///
/// Deriving a signing key costs four chained HMAC-SHA256 rounds; every
/// request signed within the same (secret, date, region, service) scope can
/// reuse the result. The cache is owned by its [`RequestSigner`], not
/// process-global, so independently configured signers never share derived
/// keys.
///
/// Entries are immutable once computed and the map is only ever extended or
/// evicted whole-entry, so concurrent signers never observe a partially
/// written key.
///
/// [`RequestSigner`]: crate::RequestSigner
pub struct SigningKeyCache {
    inner: Mutex<Inner>,
    capacity: usize,
    misses: AtomicUsize,
}

struct Inner {
    keys: HashMap<Scope, Vec<u8>>,
    // Recency order, least recently used at the front.
    order: VecDeque<Scope>,
}

impl Default for SigningKeyCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Debug for SigningKeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Scopes embed the secret access key, so expose only counters.
        f.debug_struct("SigningKeyCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl SigningKeyCache {
    /// Create a cache retaining at most `capacity` scopes.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            inner: Mutex::new(Inner {
                keys: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the signing key for the given scope, deriving it on first use.
    ///
    /// The derivation is the fixed 4-round HMAC-SHA256 chain; each round's
    /// output keys the next round:
    ///
    /// ```text
    /// kDate    = HMAC("AWS4" + secret, date)
    /// kRegion  = HMAC(kDate,           region)
    /// kService = HMAC(kRegion,         service)
    /// kSigning = HMAC(kService,        "aws4_request")
    /// ```
    pub fn signing_key(&self, secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
        let scope = Scope {
            secret: secret.to_string(),
            date: date.to_string(),
            region: region.to_string(),
            service: service.to_string(),
        };

        let mut inner = self.inner.lock().expect("lock poisoned");
        if let Some(key) = inner.keys.get(&scope) {
            let key = key.clone();
            inner.touch(&scope);
            return key;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let key = derive_signing_key(secret, date, region, service);

        if inner.keys.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.keys.remove(&oldest);
            }
        }
        inner.keys.insert(scope.clone(), key.clone());
        inner.order.push_back(scope);

        key
    }

    /// Number of scopes currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("lock poisoned").keys.len()
    }

    /// Whether the cache holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times a key had to be derived rather than served from the
    /// cache. Stable across hits, so tests can assert the HMAC chain ran
    /// exactly once per scope.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Inner {
    fn touch(&mut self, scope: &Scope) {
        if let Some(pos) = self.order.iter().position(|s| s == scope) {
            let s = self.order.remove(pos).expect("position is in bounds");
            self.order.push_back(s);
        }
    }
}

fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let secret = format!("AWS4{secret}");
    let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(k_date.as_slice(), region.as_bytes());
    let k_service = hmac_sha256(k_region.as_slice(), service.as_bytes());

    hmac_sha256(k_service.as_slice(), "aws4_request".as_bytes())
}
