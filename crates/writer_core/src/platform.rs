use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Wechat,
    Zhihu,
    Juejin,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported platform: {0} (expected one of wechat, zhihu, juejin)")]
pub struct PlatformError(pub String);

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Wechat, Platform::Zhihu, Platform::Juejin];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Wechat => "wechat",
            Platform::Zhihu => "zhihu",
            Platform::Juejin => "juejin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| PlatformError(s.to_string()))
    }
}
