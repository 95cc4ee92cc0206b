//! Parse and format Kubernetes resource quantities.
//!
//! CPU is tracked in cores and memory in megabytes (mebibytes, to match the `Mi` suffix).
use anyhow::Result;

use crate::errors::QuantityInvalid;

const MEBIBYTE: f64 = 1024.0 * 1024.0;

/// Parse a CPU quantity such as `500m`, `1` or `0.25` into cores.
pub fn parse_cpu(quantity: &str) -> Result<f64> {
    let quantity = quantity.trim();
    let (number, scale) = match quantity.strip_suffix('m') {
        Some(millis) => (millis, 0.001),
        None => (quantity, 1.0),
    };
    let cores: f64 = number.parse().map_err(|_| invalid(quantity))?;
    if cores < 0.0 || !cores.is_finite() {
        anyhow::bail!(invalid(quantity));
    }
    Ok(cores * scale)
}

/// Ensure a number of CPU cores can be formatted as a Kubernetes quantity.
pub fn check_cores(cores: f64) -> Result<f64> {
    if cores < 0.0 || !cores.is_finite() {
        anyhow::bail!(invalid(&cores.to_string()));
    }
    Ok(cores)
}

/// Parse a memory quantity such as `100Mi`, `1G` or `512M` into megabytes.
pub fn parse_memory(quantity: &str) -> Result<u64> {
    let quantity = quantity.trim();
    let split = quantity
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(quantity.len());
    let (number, suffix) = quantity.split_at(split);
    let multiplier = match suffix {
        "" => 1.0,
        "k" | "K" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        "T" => 1e12,
        "Ki" => 1024.0,
        "Mi" => MEBIBYTE,
        "Gi" => MEBIBYTE * 1024.0,
        "Ti" => MEBIBYTE * 1024.0 * 1024.0,
        _ => anyhow::bail!(invalid(quantity)),
    };
    let number: f64 = number.parse().map_err(|_| invalid(quantity))?;
    if number < 0.0 || !number.is_finite() {
        anyhow::bail!(invalid(quantity));
    }
    let megabytes = (number * multiplier / MEBIBYTE).round();
    Ok(megabytes as u64)
}

/// Format CPU cores as a Kubernetes quantity.
pub fn format_cpu(cores: f64) -> String {
    let millis = (cores * 1000.0).round() as u64;
    if millis % 1000 == 0 {
        return (millis / 1000).to_string();
    }
    format!("{}m", millis)
}

/// Format megabytes as a Kubernetes quantity.
pub fn format_memory(megabytes: u64) -> String {
    format!("{}Mi", megabytes)
}

fn invalid(quantity: &str) -> QuantityInvalid {
    QuantityInvalid {
        quantity: quantity.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_quantities() {
        assert_eq!(parse_cpu("500m").unwrap(), 0.5);
        assert_eq!(parse_cpu("1").unwrap(), 1.0);
        assert_eq!(parse_cpu("0.25").unwrap(), 0.25);
        let error = parse_cpu("lots").unwrap_err();
        assert!(error.is::<QuantityInvalid>());
    }

    #[test]
    fn cores_must_be_finite_and_positive() {
        assert_eq!(check_cores(0.0).unwrap(), 0.0);
        assert_eq!(check_cores(1.5).unwrap(), 1.5);
        for cores in [-2.0, f64::NAN, f64::INFINITY] {
            let error = check_cores(cores).unwrap_err();
            assert!(error.is::<QuantityInvalid>());
        }
    }

    #[test]
    fn memory_quantities() {
        assert_eq!(parse_memory("100Mi").unwrap(), 100);
        assert_eq!(parse_memory("1Gi").unwrap(), 1024);
        assert_eq!(parse_memory("1G").unwrap(), 954);
        assert_eq!(parse_memory("512M").unwrap(), 488);
        assert_eq!(parse_memory("1048576").unwrap(), 1);
        let error = parse_memory("12Xb").unwrap_err();
        assert!(error.is::<QuantityInvalid>());
    }

    #[test]
    fn format_quantities() {
        assert_eq!(format_cpu(0.5), "500m");
        assert_eq!(format_cpu(2.0), "2");
        assert_eq!(format_memory(50), "50Mi");
    }
}
