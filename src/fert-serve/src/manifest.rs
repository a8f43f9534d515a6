use serde::Serialize;

pub const MANIFEST_PATH: &str = "/manifest.webmanifest";
pub const MANIFEST_CONTENT_TYPE: &str = "application/manifest+json";

#[derive(Debug, Clone, Serialize)]
pub struct ManifestIcon {
    pub src: &'static str,
    pub sizes: &'static str,
    #[serde(rename = "type")]
    pub mime: &'static str,
}

/// Installable web app metadata
#[derive(Debug, Clone, Serialize)]
pub struct WebManifest {
    pub name: &'static str,
    pub short_name: &'static str,
    pub description: &'static str,
    pub start_url: &'static str,
    pub display: &'static str,
    pub background_color: &'static str,
    pub theme_color: &'static str,
    pub icons: Vec<ManifestIcon>,
}

impl Default for WebManifest {
    fn default() -> Self {
        WebManifest {
            name: "Fertilization Smart",
            short_name: "Fertilization",
            description: "Application that helps to identify potential disease associated \
                          with the plant and optimize fertilization.",
            start_url: "/",
            display: "standalone",
            background_color: "#ffffff",
            theme_color: "#000000",
            icons: vec![
                ManifestIcon {
                    src: "/web-app-manifest-192x192.png",
                    sizes: "192x192",
                    mime: "image/png",
                },
                ManifestIcon {
                    src: "/web-app-manifest-512x512.png",
                    sizes: "512x512",
                    mime: "image/png",
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_json_shape() {
        let json = serde_json::to_value(WebManifest::default()).unwrap();

        assert_eq!(json["short_name"], "Fertilization");
        assert_eq!(json["display"], "standalone");
        assert_eq!(json["icons"][1]["sizes"], "512x512");
        assert_eq!(json["icons"][0]["type"], "image/png");
    }
}
