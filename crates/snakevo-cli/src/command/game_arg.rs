use anyhow::Context as _;
use snakevo_engine::GameConfig;

/// Grid dimensions, in pixels.
#[derive(Debug, Clone, Copy, clap::Args)]
pub(crate) struct GameArg {
    /// Arena width
    #[arg(long, default_value_t = GameConfig::DEFAULT.width())]
    width: i32,
    /// Arena height
    #[arg(long, default_value_t = GameConfig::DEFAULT.height())]
    height: i32,
    /// Size of one grid cell
    #[arg(long, default_value_t = GameConfig::DEFAULT.block_size())]
    block_size: i32,
}

impl Default for GameArg {
    fn default() -> Self {
        let config = GameConfig::DEFAULT;
        Self {
            width: config.width(),
            height: config.height(),
            block_size: config.block_size(),
        }
    }
}

impl GameArg {
    pub(crate) fn to_config(self) -> anyhow::Result<GameConfig> {
        let Self {
            width,
            height,
            block_size,
        } = self;
        GameConfig::new(width, height, block_size)
            .with_context(|| format!("Invalid arena {width}x{height} with block size {block_size}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameArg::default().to_config().unwrap(), GameConfig::DEFAULT);
    }

    #[test]
    fn test_invalid_arena() {
        let arg = GameArg {
            block_size: 0,
            ..GameArg::default()
        };
        let err = arg.to_config().unwrap_err();
        assert!(err.to_string().contains("Invalid arena 640x480"));
    }
}
