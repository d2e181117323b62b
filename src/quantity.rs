//! Kubernetes resource quantity suffixes.
//!
//! Resource amounts are written as a number followed by an optional suffix, either a
//! decimal SI prefix (`500m` CPU) or a binary prefix (`128Mi` memory). The multipliers
//! follow the Kubernetes suffix table, see
//! <https://github.com/kubernetes/kubernetes/blob/8fd414537b5143ab039cb910590237cabf4af783/pkg/api/resource/suffix.go#L108>.
//!
//! # Example
//!
//! ```rust
//! use kubelet_common::quantity;
//!
//! assert_eq!(quantity::multiplier("Mi"), Some(1_048_576.0));
//! assert_eq!(quantity::multiplier("mi"), None);
//! assert_eq!(quantity::parse_quantity("500m").unwrap(), 0.5);
//! ```
use std::collections::HashMap;
use std::num::ParseFloatError;
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty quantity")]
    Empty,
    #[error("unknown suffix '{suffix}' in quantity '{quantity}'")]
    UnknownSuffix { quantity: String, suffix: String },
    #[error("invalid number in quantity '{quantity}': {source}")]
    InvalidNumber {
        quantity: String,
        #[source]
        source: ParseFloatError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

static FACTORS: OnceLock<HashMap<&'static str, f64>> = OnceLock::new();

fn factors() -> &'static HashMap<&'static str, f64> {
    FACTORS.get_or_init(|| {
        HashMap::from([
            ("n", 1e-9),
            ("u", 1e-6),
            ("m", 1e-3),
            ("k", 1e3),
            ("M", 1e6),
            ("G", 1e9),
            ("T", 1e12),
            ("P", 1e15),
            ("E", 1e18),
            ("Ki", (1u64 << 10) as f64),
            ("Mi", (1u64 << 20) as f64),
            ("Gi", (1u64 << 30) as f64),
            ("Ti", (1u64 << 40) as f64),
            ("Pi", (1u64 << 50) as f64),
            ("Ei", (1u64 << 60) as f64),
        ])
    })
}

/// Returns the multiplier of a quantity suffix.
///
/// The lookup is case-sensitive: `m` is milli, `M` is mega.
///
/// # Returns
///
/// `None` if the suffix is not a Kubernetes quantity suffix.
pub fn multiplier(suffix: &str) -> Option<f64> {
    factors().get(suffix).copied()
}

/// Parses a quantity string such as `128Mi`, `500m` or `2` into a plain number.
///
/// The suffix is the trailing run of ASCII letters. A quantity without suffix is taken
/// as is. Exponent notation (`1e3`) is accepted as part of the number.
///
/// # Errors
///
/// * [`Error::Empty`] if the input is empty or only whitespace.
/// * [`Error::UnknownSuffix`] if the trailing letters are not a known suffix.
/// * [`Error::InvalidNumber`] if the numeric part is not a valid number.
pub fn parse_quantity(raw: &str) -> Result<f64> {
    let quantity = raw.trim();
    if quantity.is_empty() {
        return Err(Error::Empty);
    }

    let split = quantity
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .len();
    let (number, suffix) = quantity.split_at(split);

    let factor = if suffix.is_empty() {
        1.0
    } else {
        multiplier(suffix).ok_or_else(|| Error::UnknownSuffix {
            quantity: quantity.to_owned(),
            suffix: suffix.to_owned(),
        })?
    };

    let value = number
        .parse::<f64>()
        .map_err(|source| Error::InvalidNumber {
            quantity: quantity.to_owned(),
            source,
        })?;

    Ok(value * factor)
}
