use std::str::FromStr;

/// The closed set of visual templates a caller can pick from. Unknown
/// identifiers fall back to [`Template::Custom`], so parsing never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Template {
    Minimal,
    Gaming,
    Tech,
    Cinematic,
    Custom,
}

impl Template {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Template::Minimal => "minimal",
            Template::Gaming => "gaming",
            Template::Tech => "tech",
            Template::Cinematic => "cinematic",
            Template::Custom => "custom",
        }
    }

    /// The descriptive fragment injected into the image prompt.
    pub(crate) fn style_fragment(&self) -> &'static str {
        match self {
            Template::Minimal => {
                "clean minimalist composition, subtle gradients, modern aesthetic, soft lighting, \
                 professional, white space, geometric shapes, muted colors"
            }
            Template::Gaming => {
                "bold neon colors, RGB lighting effects, dynamic action poses, electric energy, \
                 glowing elements, cyberpunk vibes, high contrast, dramatic explosions, \
                 futuristic gaming setup"
            }
            Template::Tech => {
                "futuristic technology, holographic displays, circuit board patterns, blue and \
                 cyan glow, data visualization, sleek devices, digital matrix, clean lines, \
                 innovation"
            }
            Template::Cinematic => {
                "dramatic cinematic lighting, movie poster quality, golden hour atmosphere, epic \
                 scale, depth of field, lens flare, anamorphic look, theatrical composition"
            }
            Template::Custom => {
                "ultra high quality, photorealistic, stunning visual composition, professional \
                 photography, perfect lighting, magazine cover quality"
            }
        }
    }
}

impl FromStr for Template {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "minimal" => Template::Minimal,
            "gaming" => Template::Gaming,
            "tech" => Template::Tech,
            "cinematic" => Template::Cinematic,
            _ => Template::Custom,
        })
    }
}

/// Fixed suffix demanding photorealism, an empty canvas (no embedded
/// text) and 16:9 framing.
const PROMPT_SUFFIX: &str = "ultra high resolution, 4K quality, photorealistic, cinematic \
                             composition, dramatic lighting, vibrant colors, professional \
                             YouTube thumbnail background, no text, no words, no letters, \
                             16:9 aspect ratio";

/// Combines the caller's topic, the template's style fragment and the
/// fixed quality suffix into the final image prompt.
pub(crate) fn compose_prompt(topic: &str, template: Template) -> String {
    format!("{}, {}, {}", topic, template.style_fragment(), PROMPT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_topic_fragment_and_suffix() {
        let topic = "10 AI Tools That Will Change Your Life";
        let prompt = compose_prompt(topic, Template::Cinematic);

        assert!(prompt.starts_with(topic));
        assert!(prompt.contains(Template::Cinematic.style_fragment()));
        assert!(prompt.contains("no text, no words, no letters"));
        assert!(prompt.contains("16:9 aspect ratio"));
    }

    #[test]
    fn unknown_template_falls_back_to_custom() {
        let template: Template = "vaporwave".parse().unwrap();
        assert_eq!(template, Template::Custom);
    }

    #[test]
    fn known_templates_parse_to_themselves() {
        for name in ["minimal", "gaming", "tech", "cinematic", "custom"] {
            let template: Template = name.parse().unwrap();
            assert_eq!(template.as_str(), name);
        }
    }
}
