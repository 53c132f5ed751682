use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Personal data (passport numbers, contact details) that must not leak into logs.
///
/// `Debug` and `Display` only reveal the last two characters. Serialization
/// writes the real value, since API clients need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> Masked<T> {
    fn redacted(&self) -> String {
        let raw = self.0.to_string();
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("****{}", tail)
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let passport = Masked::from("AB123456".to_string());
        assert_eq!(format!("{:?}", passport), "****56");
        assert_eq!(format!("{}", Masked::from("abc".to_string())), "****");
    }

    #[test]
    fn test_serialize_exposes_value() {
        let passport = Masked::from("AB123456".to_string());
        assert_eq!(serde_json::to_string(&passport).unwrap(), "\"AB123456\"");
        let back: Masked<String> = serde_json::from_str("\"CD789012\"").unwrap();
        assert_eq!(back.expose(), "CD789012");
    }
}
