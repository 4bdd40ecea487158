//! Example-line parsing.
//!
//! ```text
//! shared |User usr=tom time=mon
//! |Action id=politics
//! 0:-1.000000:0.200000 |Action id=sports
//! ```

use bandit_core::{BanditError, BanditResult};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub hash: u64,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// First character of the namespace name; what `-q` pairs refer to.
    pub index: char,
    pub features: Vec<Feature>,
}

/// Cost-sensitive label `action:cost:probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CbLabel {
    pub action: u32,
    pub cost: f32,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdfExample {
    pub shared: bool,
    pub label: Option<CbLabel>,
    pub namespaces: Vec<Namespace>,
}

pub fn parse_line(line: &str) -> BanditResult<AdfExample> {
    let bar = line
        .find('|')
        .ok_or_else(|| malformed(line, "no namespace marker '|'"))?;
    let head = line[..bar].trim();

    let (shared, label) = match head {
        "" => (false, None),
        "shared" => (true, None),
        _ if head.contains(char::is_whitespace) => {
            return Err(malformed(line, "unexpected tokens before namespace"))
        }
        _ => (false, Some(parse_label(line, head)?)),
    };

    let namespaces = line[bar + 1..]
        .split('|')
        .map(|segment| parse_namespace(line, segment))
        .collect::<BanditResult<Vec<_>>>()?;

    Ok(AdfExample {
        shared,
        label,
        namespaces,
    })
}

fn parse_label(line: &str, raw: &str) -> BanditResult<CbLabel> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [action, cost, probability] = parts.as_slice() else {
        return Err(malformed(line, "label must be action:cost:probability"));
    };

    let action = action
        .parse()
        .map_err(|_| malformed(line, "label action is not an integer"))?;
    let cost = finite(line, cost, "label cost")?;
    let probability = finite(line, probability, "label probability")?;

    Ok(CbLabel {
        action,
        cost,
        probability,
    })
}

fn parse_namespace(line: &str, segment: &str) -> BanditResult<Namespace> {
    if segment.is_empty() || segment.starts_with(char::is_whitespace) {
        return Err(malformed(line, "namespace without a name"));
    }

    let mut tokens = segment.split_whitespace();
    // Non-empty and not starting with whitespace, so a name token exists.
    let name = tokens.next().unwrap_or_default();
    let index = name.chars().next().unwrap_or(' ');

    let features = tokens
        .map(|token| {
            let (feature, value) = match token.rsplit_once(':') {
                Some((feature, raw)) => (feature, finite(line, raw, "feature value")?),
                None => (token, 1.0),
            };
            Ok(Feature {
                hash: hash_feature(name, feature),
                value,
            })
        })
        .collect::<BanditResult<Vec<_>>>()?;

    Ok(Namespace { index, features })
}

/// Stable 64-bit hash of a feature within its namespace.
pub fn hash_feature(namespace: &str, feature: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update([0u8]);
    hasher.update(feature.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn finite(line: &str, raw: &str, what: &str) -> BanditResult<f32> {
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(malformed(line, &format!("{what} '{raw}' is not a finite number"))),
    }
}

fn malformed(line: &str, reason: &str) -> BanditError {
    BanditError::ExampleParse(format!("{reason}: '{line}'"))
}
