use std::fmt;
use std::str::FromStr;

use crate::packet::hex;

use super::FindError;

const DIR_HANDLE_PREFIX: &str = "DH:";

/// Path to search for: an optional starting directory handle and the
/// components below it.
///
/// `DH:0xaaaa/dir/file` starts at the directory whose handle is `aaaa`;
/// `/dir/file` matches the first component in any directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub dir_handle: Option<Vec<u8>>,
    pub components: Vec<String>,
}

impl PathSpec {
    /// Components resolved as directories before the file itself.
    pub fn directories(&self) -> &[String] {
        let len = self.components.len().saturating_sub(1);
        &self.components[..len]
    }

    pub fn file_name(&self) -> &str {
        self.components.last().map_or("", String::as_str)
    }
}

impl FromStr for PathSpec {
    type Err = FindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| FindError::InvalidPath(format!("`{s}`: {reason}"));
        let (dir_handle, rest) = match s.strip_prefix(DIR_HANDLE_PREFIX) {
            Some(spec) => {
                let (handle, rest) = spec.split_once('/').unwrap_or((spec, ""));
                let digits = handle
                    .strip_prefix("0x")
                    .or_else(|| handle.strip_prefix("0X"))
                    .unwrap_or(handle);
                let bytes = parse_hex(digits).ok_or_else(|| invalid("invalid directory handle"))?;
                (Some(bytes), rest)
            }
            None => (None, s),
        };
        let components: Vec<String> = rest
            .split('/')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if components.is_empty() {
            return Err(invalid("no file name"));
        }
        Ok(Self {
            dir_handle,
            components,
        })
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(handle) = &self.dir_handle {
            write!(f, "{DIR_HANDLE_PREFIX}{}", hex(handle))?;
        }
        for component in &self.components {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

fn parse_hex(digits: &str) -> Option<Vec<u8>> {
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok())
        .collect()
}
