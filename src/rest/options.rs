//! Option resolution for resource calls.
//!
//! A resource call takes positional arguments: one value per URL
//! placeholder, an optional data object, and an optional trailing options
//! object or bearer token string. [`CallArgs::split`] separates them and
//! [`resolve_options`] turns the trailing argument into [`CallOptions`].
//!
//! Recognized option keys are `apiKey`, `idempotencyKey`, `accountId`,
//! `apiVersion`, `maxNetworkRetries`, `timeout` and `host`. The legacy names
//! `api_key`, `idempotency_key`, `stateset_account` and `stateset_version`
//! are still accepted with a one-time deprecation warning.
//!
//! # Example
//!
//! ```rust
//! use stateset::rest::resolve_options;
//! use serde_json::json;
//!
//! let mut args = vec![json!({"status": "open"}), json!({"idempotencyKey": "k1"})];
//! let options = resolve_options(&mut args).unwrap();
//!
//! assert_eq!(options.headers["Idempotency-Key"], "k1");
//! assert_eq!(args, vec![json!({"status": "open"})]);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, OnceLock};

use serde_json::{Map, Value};

use crate::rest::ResourceError;

/// Header carrying the idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Header carrying the connected account ID.
pub const ACCOUNT_HEADER: &str = "Stateset-Account";

/// Header carrying the API version.
pub const VERSION_HEADER: &str = "Stateset-Version";

/// Option keys recognized in a trailing options object.
pub const RECOGNIZED_OPTIONS: [&str; 7] = [
    "apiKey",
    "idempotencyKey",
    "accountId",
    "apiVersion",
    "maxNetworkRetries",
    "timeout",
    "host",
];

/// Deprecated option keys and their canonical replacements.
pub const DEPRECATED_OPTIONS: [(&str, &str); 4] = [
    ("api_key", "apiKey"),
    ("idempotency_key", "idempotencyKey"),
    ("stateset_account", "accountId"),
    ("stateset_version", "apiVersion"),
];

/// Transport settings for a single call.
///
/// Zero means "not overridden": the dispatcher falls back to the client
/// configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestSettings {
    /// Additional attempts after the first on retryable failures.
    pub max_network_retries: u32,
    /// Request timeout in milliseconds.
    pub timeout: u64,
}

/// Options resolved from a call's trailing arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOptions {
    /// Bearer token overriding the configured API key.
    pub auth: Option<String>,
    /// Option headers. The idempotency, account and version headers are
    /// always present and default to an empty string.
    pub headers: BTreeMap<String, String>,
    /// Retry and timeout settings.
    pub settings: RequestSettings,
    /// Host overriding the configured API host.
    pub host: Option<String>,
}

impl Default for CallOptions {
    fn default() -> Self {
        let headers = [IDEMPOTENCY_KEY_HEADER, ACCOUNT_HEADER, VERSION_HEADER]
            .into_iter()
            .map(|name| (name.to_string(), String::new()))
            .collect();

        Self {
            auth: None,
            headers,
            settings: RequestSettings::default(),
            host: None,
        }
    }
}

impl CallOptions {
    /// Returns the header value, treating an empty string as unset.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    RECOGNIZED_OPTIONS
        .iter()
        .copied()
        .find(|k| *k == key)
        .or_else(|| {
            DEPRECATED_OPTIONS
                .iter()
                .find(|(deprecated, _)| *deprecated == key)
                .map(|(_, canonical)| *canonical)
        })
}

fn is_options_object(map: &Map<String, Value>) -> bool {
    map.keys().any(|key| canonical_key(key).is_some())
}

fn warn_deprecated(deprecated: &'static str, canonical: &'static str) {
    static WARNED: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

    let first_use = WARNED
        .get_or_init(Mutex::default)
        .lock()
        .map_or(true, |mut warned| warned.insert(deprecated));

    if first_use {
        tracing::warn!(
            "Option '{}' is deprecated and will be removed in a future release; use '{}' instead",
            deprecated,
            canonical
        );
    }
}

fn string_option(key: &str, value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        other => {
            tracing::warn!("Ignoring option '{}': expected a string, got {}", key, other);
            None
        }
    }
}

fn apply_options(
    options: &mut CallOptions,
    map: Map<String, Value>,
) -> Result<(), ResourceError> {
    for (deprecated, canonical) in DEPRECATED_OPTIONS {
        if map.contains_key(deprecated) && map.contains_key(canonical) {
            return Err(ResourceError::OptionConflict {
                deprecated,
                canonical,
            });
        }
    }

    let mut unknown = Vec::new();

    for (key, value) in map {
        let Some(canonical) = canonical_key(&key) else {
            unknown.push(key);
            continue;
        };

        if let Some((deprecated, _)) = DEPRECATED_OPTIONS.iter().find(|(d, _)| *d == key) {
            warn_deprecated(*deprecated, canonical);
        }

        match canonical {
            "apiKey" => options.auth = string_option(canonical, value),
            "idempotencyKey" | "accountId" | "apiVersion" => {
                let header = match canonical {
                    "idempotencyKey" => IDEMPOTENCY_KEY_HEADER,
                    "accountId" => ACCOUNT_HEADER,
                    _ => VERSION_HEADER,
                };
                if let Some(v) = string_option(canonical, value) {
                    options.headers.insert(header.to_string(), v);
                }
            }
            "maxNetworkRetries" => {
                match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
                    Some(retries) => options.settings.max_network_retries = retries,
                    None => tracing::warn!(
                        "Ignoring maxNetworkRetries: expected a non-negative integer, got {}",
                        value
                    ),
                }
            }
            "timeout" => match value.as_u64() {
                Some(ms) => options.settings.timeout = ms,
                None => tracing::warn!(
                    "Ignoring timeout: expected a non-negative integer of milliseconds, got {}",
                    value
                ),
            },
            _ => options.host = string_option(canonical, value),
        }
    }

    if !unknown.is_empty() {
        tracing::warn!(
            "Ignoring unrecognized options: {} (valid options are: {})",
            unknown.join(", "),
            RECOGNIZED_OPTIONS.join(", ")
        );
    }

    Ok(())
}

/// Resolves call options from the trailing argument, popping it if consumed.
///
/// - A trailing string is a bearer token override.
/// - A trailing object with at least one recognized (or deprecated) option
///   key is an options object.
/// - Anything else is left in `args` as request data, and defaults are returned.
///
/// # Errors
///
/// Returns [`ResourceError::OptionConflict`] if the options object contains
/// both a deprecated key and its canonical replacement.
pub fn resolve_options(args: &mut Vec<Value>) -> Result<CallOptions, ResourceError> {
    let mut options = CallOptions::default();

    let consume = match args.last() {
        Some(Value::String(_)) => true,
        Some(Value::Object(map)) => is_options_object(map),
        _ => false,
    };
    if !consume {
        return Ok(options);
    }

    match args.pop() {
        Some(Value::String(token)) => options.auth = Some(token),
        Some(Value::Object(map)) => apply_options(&mut options, map)?,
        _ => {}
    }

    Ok(options)
}

/// A call's positional arguments, separated by role.
#[derive(Clone, Debug, PartialEq)]
pub struct CallArgs {
    /// URL parameter values by placeholder name, in order of first appearance.
    pub url_params: Vec<(String, String)>,
    /// Request data: query parameters for GET/DELETE, the body otherwise.
    pub data: Option<Map<String, Value>>,
    /// Resolved call options.
    pub options: CallOptions,
}

impl CallArgs {
    /// Splits positional arguments for a template whose unique placeholder
    /// names are `params`.
    ///
    /// One leading argument is consumed per placeholder, then the trailing
    /// options, then an optional data object.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MissingUrlParam`] if there are fewer arguments than
    ///   placeholders
    /// - [`ResourceError::InvalidUrlParam`] if a placeholder argument is not a
    ///   string or number
    /// - [`ResourceError::OptionConflict`] from [`resolve_options`]
    pub fn split(args: Vec<Value>, params: &[&str]) -> Result<Self, ResourceError> {
        let mut args = args.into_iter();
        let mut url_params = Vec::with_capacity(params.len());

        for param in params {
            let value = match args.next() {
                Some(Value::String(s)) => s,
                Some(Value::Number(n)) => n.to_string(),
                Some(other) => {
                    return Err(ResourceError::InvalidUrlParam {
                        param: (*param).to_string(),
                        value: other,
                    })
                }
                None => {
                    return Err(ResourceError::MissingUrlParam {
                        param: (*param).to_string(),
                    })
                }
            };
            url_params.push(((*param).to_string(), value));
        }

        let mut rest: Vec<Value> = args.collect();
        let options = resolve_options(&mut rest)?;

        let mut rest = rest.into_iter();
        let data = match rest.next() {
            Some(Value::Object(map)) => Some(map),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::warn!("Ignoring non-object request data: {}", other);
                None
            }
        };

        let extra = rest.len();
        if extra > 0 {
            tracing::warn!("Ignoring {} unexpected trailing argument(s)", extra);
        }

        Ok(Self {
            url_params,
            data,
            options,
        })
    }
}
