/*! Oracle answers.

One answer per classified line, in the fastText `predict-prob` format:
`__label__<lang> <prob>`.
!*/
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

lazy_static! {
    static ref LABEL: Regex =
        Regex::new(r"^__label__([a-z]+)\s+([0-9]*\.?[0-9]+)").expect("invalid label pattern");
}

/// Language and confidence of a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    lang: String,
    prob: f32,
}

impl Identification {
    pub fn new(lang: String, prob: f32) -> Self {
        Self { lang, prob }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn prob(&self) -> f32 {
        self.prob
    }

    /// `true` if the confidence is *strictly* above `threshold`.
    pub fn is_reliable(&self, threshold: f32) -> bool {
        self.prob > threshold
    }
}

impl FromStr for Identification {
    type Err = Error;

    /// # Errors
    /// [Error::Alignment] if the line does not follow the label format,
    /// since trusting it would shift every following label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LABEL
            .captures(s)
            .ok_or_else(|| Error::Alignment(format!("unparsable prediction '{}'", s.trim_end())))?;

        let prob = caps[2]
            .parse()
            .map_err(|e| Error::Alignment(format!("invalid confidence '{}': {}", &caps[2], e)))?;

        Ok(Self::new(caps[1].to_string(), prob))
    }
}
