//! Simple TOML parser for the timer configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! timer.toml. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - The `[timer]` section header
//! - Comments (# ...)
//!
//! Keys missing from the file keep their defaults. Validation of the
//! resulting values is left to [`TimerConfig::validate`].

use core::fmt;

use super::types::{ExpiryPolicy, TimerConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header other than `[timer]`, or a key outside it
    InvalidSection,
    /// Key not part of the timer configuration
    UnknownKey,
    /// Value missing, malformed or out of range for its key
    InvalidValue,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSection => f.write_str("only a [timer] section is allowed"),
            ParseError::UnknownKey => f.write_str("unknown key in [timer]"),
            ParseError::InvalidValue => f.write_str("invalid value"),
        }
    }
}

/// Parse TOML configuration into TimerConfig
pub fn parse_config(input: &str) -> Result<TimerConfig, ParseError> {
    let mut config = TimerConfig::default();
    let mut in_timer = false;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            parse_section_header(line)?;
            in_timer = true;
            continue;
        }

        if !in_timer {
            return Err(ParseError::InvalidSection);
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_key(&mut config, key, value)?;
    }

    Ok(config)
}

/// Check a section header; only `[timer]` is accepted
fn parse_section_header(line: &str) -> Result<(), ParseError> {
    let end = line.find(']').ok_or(ParseError::InvalidSection)?;
    let rest = line[end + 1..].trim();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err(ParseError::InvalidSection);
    }

    match line[1..end].trim() {
        "timer" => Ok(()),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Apply a single `[timer]` key
fn apply_key(config: &mut TimerConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "turn_seconds" => config.turn_seconds = parse_int(value)?,
        "warning_seconds" => config.warning_seconds = parse_int(value)?,
        "critical_seconds" => config.critical_seconds = parse_int(value)?,
        "players" => config.players = parse_int(value)?,
        "debounce_ms" => config.debounce_ms = parse_int(value)?,
        "tick_interval_ms" => config.tick_interval_ms = parse_int(value)?,
        "hold_to_stop_ms" => config.hold_to_stop_ms = parse_int(value)?,
        "expiry" => config.expiry = parse_expiry(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse a key = value line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse an integer value (`_` separators allowed)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits = heapless::String::<16>::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse the expiry policy name
fn parse_expiry(value: &str) -> Result<ExpiryPolicy, ParseError> {
    match parse_string(value)? {
        "await_press" => Ok(ExpiryPolicy::AwaitPress),
        "auto_advance" => Ok(ExpiryPolicy::AutoAdvance),
        _ => Err(ParseError::InvalidValue),
    }
}
