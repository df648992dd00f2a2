//! Technical specification string carried in the summary `Technical Specs` column
//!
//! The exported form is `Type: X | N.Size: Y | Seam: Z | Stitch: S | Throw: T`.
//! Parsing is label-driven: each segment is located by its label, so a
//! missing or reordered segment only empties that one field.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

struct TechPatterns {
    needle_type: Regex,
    needle_size: Regex,
    seam: Regex,
    stitch: Regex,
    throw: Regex,
}

static PATTERNS: LazyLock<TechPatterns> = LazyLock::new(|| TechPatterns {
    needle_type: Regex::new(r"Type:\s*([^|]+)").expect("static regex must compile"),
    needle_size: Regex::new(r"N\.Size:\s*([^|]+)").expect("static regex must compile"),
    seam: Regex::new(r"Seam:\s*([^|]+)").expect("static regex must compile"),
    stitch: Regex::new(r"Stitch:\s*([^|]+)").expect("static regex must compile"),
    throw: Regex::new(r"Throw:\s*([^|]+)").expect("static regex must compile"),
});

/// The five technical fields of a configuration that travel together in exports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSpecs {
    pub needle_type: String,
    pub needle_size: String,
    pub seam: String,
    pub stitch_cm: String,
    pub needle_throw: String,
}

impl TechSpecs {
    /// Parse a `Type: … | N.Size: … | …` string. Never fails; absent labels yield "".
    pub fn parse(text: &str) -> Self {
        let p = &*PATTERNS;
        Self {
            needle_type: capture(&p.needle_type, text),
            needle_size: capture(&p.needle_size, text),
            seam: capture(&p.seam, text),
            stitch_cm: capture(&p.stitch, text),
            needle_throw: capture(&p.throw, text),
        }
    }
}

fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

impl fmt::Display for TechSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {} | N.Size: {} | Seam: {} | Stitch: {} | Throw: {}",
            self.needle_type, self.needle_size, self.seam, self.stitch_cm, self.needle_throw
        )
    }
}
