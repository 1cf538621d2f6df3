//! Upload arguments supplied by the automation driver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-run upload switches.
///
/// These are consumed verbatim by the materializer's string special cases
/// (anonymity, internal-upload flags, draft mode, signature) and by the
/// tracker-scoped attribute copy (`forced`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadArgs {
    /// Upload anonymously.
    #[serde(default)]
    pub anon: bool,
    /// Mark the upload as an internal release.
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub freeleech: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub doubleup: bool,
    #[serde(default)]
    pub sticky: bool,
    /// Upload as a draft instead of publishing live.
    #[serde(default)]
    pub draft: bool,
    /// Self-promotion signature appended by trackers that support it.
    #[serde(default)]
    pub signature: Option<String>,
    /// Attributes forced by the user, overriding extracted values.
    #[serde(default)]
    pub forced: BTreeMap<String, String>,
}

/// Canonical attributes that are answered from [`UploadArgs`] rather than the
/// attribute store when the target field is a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFlag {
    Anon,
    Internal,
    Freeleech,
    Featured,
    Doubleup,
    Sticky,
    Live,
    Signature,
}

impl UploadFlag {
    /// Map a canonical attribute name to the flag it represents, if any.
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "anon" => Some(Self::Anon),
            "internal" => Some(Self::Internal),
            "freeleech" => Some(Self::Freeleech),
            "featured" => Some(Self::Featured),
            "doubleup" => Some(Self::Doubleup),
            "sticky" => Some(Self::Sticky),
            "live" => Some(Self::Live),
            "sig" | "signature" => Some(Self::Signature),
            _ => None,
        }
    }
}

impl UploadArgs {
    /// Field value for an upload flag.
    pub fn flag_value(&self, flag: UploadFlag) -> String {
        let on = match flag {
            UploadFlag::Anon => self.anon,
            UploadFlag::Internal => self.internal,
            UploadFlag::Freeleech => self.freeleech,
            UploadFlag::Featured => self.featured,
            UploadFlag::Doubleup => self.doubleup,
            UploadFlag::Sticky => self.sticky,
            UploadFlag::Live => !self.draft,
            UploadFlag::Signature => return self.signature.clone().unwrap_or_default(),
        };
        if on { "1" } else { "0" }.to_string()
    }
}
