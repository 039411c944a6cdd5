//! arw-config
//!
//! Layered YAML configuration:
//! - documents merged in order, later ones override earlier ones (deep merge
//!   of mappings, replacement of everything else)
//! - merged tree canonicalized to JSON with sorted keys and hashed (SHA-256)
//! - literal values that look like credentials are refused
//! - [`AppConfig`] is the typed view; unknown keys are rejected there

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use arw_registry::RegistryEndpoints;

mod app;

pub use app::{AppConfig, BatchConfig, SessionConfig};

/// Prefixes of well-known secret formats. A leaf string starting with one of
/// these, or carrying a `<cookie_name>=` pair of the registry session cookie,
/// aborts loading with CONFIG_SECRET_DETECTED.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // OpenAI / Stripe style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
    "Bearer ",    // pasted Authorization header
    "Cookie: ",   // pasted Cookie header
    "eyJ",        // JWT
];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// SHA-256 hex of `canonical_json`.
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Typed, validated view of the merged configuration.
    pub fn app(&self) -> Result<AppConfig> {
        AppConfig::from_json(&self.config_json)
    }
}

pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml (layer {i})"))?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        match v_json {
            // Empty document.
            Value::Null => continue,
            Value::Object(_) => merged = deep_merge(merged, v_json),
            _ => bail!("CONFIG_NOT_A_MAPPING layer={i}: top level must be a mapping"),
        }
    }

    enforce_no_secret_literals(&merged)?;

    let merged = canonicalize(&merged);
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// Rebuild every mapping with keys in sorted order, whatever the map backing.
fn canonicalize(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for k in keys {
                out.insert(k.clone(), canonicalize(&map[k.as_str()]));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let cookie = session_cookie_pair(v);
    let mut leaves = Vec::new();
    collect_string_leaves(v, "", &mut leaves);
    for (ptr, s) in leaves {
        if looks_like_secret(s) || cookie.as_deref().is_some_and(|c| s.contains(c)) {
            bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
        }
    }
    Ok(())
}

fn collect_string_leaves<'a>(v: &'a Value, prefix: &str, out: &mut Vec<(String, &'a str)>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                let next = format!("{}/{}", prefix, k.replace('~', "~0").replace('/', "~1"));
                collect_string_leaves(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_string_leaves(vv, &format!("{prefix}/{i}"), out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.as_str())),
        _ => {}
    }
}

/// `GN-TOKEN-CSP=` unless the config names another cookie.
fn session_cookie_pair(v: &Value) -> Option<String> {
    let name = match v.pointer("/registry/cookie_name").and_then(Value::as_str) {
        Some(n) => n.trim().to_string(),
        None => RegistryEndpoints::default().cookie_name,
    };
    (!name.is_empty()).then(|| format!("{name}="))
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
