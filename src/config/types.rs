use serde::{Deserialize, Serialize};
use tf_core::{DecodeOptions, Itag};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Wire keys read from info payloads
    #[serde(default)]
    pub decode: DecodeOptions,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Print JSON instead of the text report, as if `--json` were passed
    #[serde(default)]
    pub json: bool,

    /// Include thumbnails in the text report
    #[serde(default = "default_show_thumbnails")]
    pub show_thumbnails: bool,

    /// Itags to try, in order, when reporting the preferred stream
    #[serde(default)]
    pub preferred_itags: Vec<Itag>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            show_thumbnails: default_show_thumbnails(),
            preferred_itags: Vec::new(),
        }
    }
}

fn default_show_thumbnails() -> bool {
    true
}
