//! Time and timedelta command implementations.

use taskmark_core::{format_rfc3339, now_utc, offset, parse_rfc3339};

pub fn run_now() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_rfc3339(now_utc()));
    Ok(())
}

pub fn run_delta(
    from: Option<String>,
    now: bool,
    days: i64,
    hours: i64,
    minutes: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = match from {
        Some(ts) => parse_rfc3339(&ts).ok_or_else(|| format!("Invalid RFC3339 timestamp: {}", ts))?,
        None if now => now_utc(),
        None => return Err("Must specify --from or --now".into()),
    };

    let shifted = offset(base, days, hours, minutes).ok_or("Offset out of range")?;
    println!("{}", format_rfc3339(shifted));
    Ok(())
}
