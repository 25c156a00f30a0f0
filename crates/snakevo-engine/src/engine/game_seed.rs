use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for the food placement generator of a [`SnakeGame`](crate::SnakeGame).
///
/// Two games created with the same seed and fed the same action sequence go
/// through identical state trajectories.
///
/// Serialized as a 32 character hex string.
///
/// ```
/// use snakevo_engine::{GameConfig, GameSeed, SnakeGame};
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let a = SnakeGame::with_seed(GameConfig::default(), seed);
/// let b = SnakeGame::with_seed(GameConfig::default(), seed);
/// assert_eq!(a.food(), b.food());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed(pub(crate) [u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds a seed from a small integer, convenient for CLI flags and tests.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("{:032x}", u128::from_be_bytes(self.0)))
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex_str.len()
            )));
        }
        if !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: {hex_str} is not hexadecimal"
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16).map_err(serde::de::Error::custom)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_format() {
        let seed = GameSeed::from_u64(0xdead_beef);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"000000000000000000000000deadbeef\"");
        let back: GameSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let result: Result<GameSeed, _> = serde_json::from_str("\"abc\"");
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("expected 32 hex characters"), "{msg}");
    }

    #[test]
    fn test_rejects_sign_and_non_hex() {
        for input in [
            "\"+0000000000000000000000000000000\"",
            "\"000000000000000000000000deadbeeg\"",
        ] {
            let result: Result<GameSeed, _> = serde_json::from_str(input);
            let msg = result.unwrap_err().to_string();
            assert!(msg.contains("is not hexadecimal"), "{msg}");
        }
    }
}
