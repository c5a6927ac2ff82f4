//! Route annotation resolution.
//!
//! Turns the raw key/value annotations of a route group into an
//! [`EffectiveGroupPolicy`], validating every value on the way.

use std::time::Duration;

use gozer_ir::{AuthPolicy, EffectiveGroupPolicy};
use gozer_spec::{Route, RouteGroup, annotation};

use crate::{Error, Result};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Resolve the annotations of `group`.
///
/// `label` names the group in error messages.
pub fn resolve_group(group: &RouteGroup, label: &str) -> Result<EffectiveGroupPolicy> {
    let timeout = group
        .annotation(annotation::TIMEOUT)
        .map(|value| parse_timeout(label, value))
        .transpose()?;

    let max_bytes = group
        .annotation(annotation::MAX_BYTES)
        .map(|value| {
            value.trim().parse::<i64>().map_err(|_| {
                Box::new(Error::MaxBytesInvalid {
                    group: label.to_string(),
                    value: value.to_string(),
                })
            })
        })
        .transpose()?;

    let secret = non_empty(group.annotation(annotation::JWT));
    let transition = non_empty(group.annotation(annotation::JWT_TRANSITION));
    let auth = (secret.is_some() || transition.is_some())
        .then_some(AuthPolicy { secret, transition });

    let middleware = group
        .annotation(annotation::MIDDLEWARE)
        .map(split_middleware)
        .unwrap_or_default();

    Ok(EffectiveGroupPolicy {
        auth,
        signature: group.annotation(annotation::SIGNATURE) == Some("true"),
        timeout,
        max_bytes,
        middleware,
        prefix: group.annotation(annotation::PREFIX).and_then(normalize_prefix),
        folder: group.annotation(annotation::GROUP).and_then(normalize_folder),
    })
}

/// Folder of a route: its own `group` annotation, else the group's.
pub fn route_folder(route: &Route, policy: &EffectiveGroupPolicy) -> Option<String> {
    route
        .annotation(annotation::GROUP)
        .and_then(normalize_folder)
        .or_else(|| policy.folder.clone())
}

/// Parse a timeout annotation, rejecting anything under one millisecond.
pub fn parse_timeout(label: &str, value: &str) -> Result<Duration> {
    let nanos = parse_duration_nanos(value).ok_or_else(|| {
        Box::new(Error::TimeoutInvalid {
            group: label.to_string(),
            value: value.to_string(),
        })
    })?;
    if nanos < NANOS_PER_MILLI {
        return Err(Box::new(Error::TimeoutTooSmall {
            group: label.to_string(),
            value: value.to_string(),
        }));
    }
    let nanos = u64::try_from(nanos).map_err(|_| {
        Box::new(Error::TimeoutInvalid {
            group: label.to_string(),
            value: value.to_string(),
        })
    })?;
    Ok(Duration::from_nanos(nanos))
}

/// Parse a Go-style duration (`1h30m`, `1.5s`, `500ms`) into nanoseconds.
///
/// A bare integer is a count of nanoseconds.
pub fn parse_duration_nanos(value: &str) -> Option<i128> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }
    let (negative, mut rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if rest.is_empty() {
        return None;
    }
    if rest.bytes().all(|b| b.is_ascii_digit()) {
        let nanos: i128 = rest.parse().ok()?;
        return Some(if negative { -nanos } else { nanos });
    }

    let mut total = 0f64;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_end];
        if number.is_empty() || number == "." {
            return None;
        }
        let number: f64 = number.parse().ok()?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_end..];
        total += number * unit_nanos;
    }

    let nanos = total.round() as i128;
    Some(if negative { -nanos } else { nanos })
}

/// Strip quotes and slashes, then re-root as an absolute path.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        None
    } else {
        Some(format!("/{}", segments.join("/")))
    }
}

fn normalize_folder(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .trim_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn split_middleware(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
