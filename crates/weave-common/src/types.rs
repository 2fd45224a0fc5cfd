use serde::{Deserialize, Serialize};
use std::fmt;

/// Window position and size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same position, new size.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0, 0, 800, 600)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// How a size passed to `set_bounds` / `set_size` is interpreted.
///
/// The numeric values are the `flags` accepted by the C ABI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeHint {
    /// Width and height are the window size.
    #[default]
    None,
    /// Width and height are the minimum size.
    Min,
    /// Width and height are the maximum size.
    Max,
    /// Window size cannot be changed by the user.
    Fixed,
}

impl SizeHint {
    pub fn from_flags(flags: i32) -> Option<Self> {
        match flags {
            0 => Some(Self::None),
            1 => Some(Self::Min),
            2 => Some(Self::Max),
            3 => Some(Self::Fixed),
            _ => None,
        }
    }

    pub fn as_flags(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Min => 1,
            Self::Max => 2,
            Self::Fixed => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_with_size_keeps_position() {
        let b = Bounds::new(10, 20, 300, 200).with_size(640, 480);
        assert_eq!(b, Bounds::new(10, 20, 640, 480));
    }

    #[test]
    fn bounds_display() {
        assert_eq!(Bounds::new(5, -3, 800, 600).to_string(), "800x600+5+-3");
    }

    #[test]
    fn size_hint_flags() {
        for hint in [SizeHint::None, SizeHint::Min, SizeHint::Max, SizeHint::Fixed] {
            assert_eq!(SizeHint::from_flags(hint.as_flags()), Some(hint));
        }
        assert_eq!(SizeHint::from_flags(4), None);
        assert_eq!(SizeHint::from_flags(-1), None);
    }

    #[test]
    fn size_hint_serialization() {
        let json = serde_json::to_string(&SizeHint::Fixed).unwrap();
        assert_eq!(json, "\"fixed\"");
        let hint: SizeHint = serde_json::from_str("\"min\"").unwrap();
        assert_eq!(hint, SizeHint::Min);
    }
}
