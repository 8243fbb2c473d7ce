//! Build-time API configuration with an optional runtime override. The runtime
//! config is read from `window.VORTIX_CONFIG` (if present) so static
//! deployments can point at another backend without rebuilding.
//! Configuration values are public; do not store secrets here.

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Backend base URL including the `/api` prefix.
    pub api_base_url: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let api_base_url = option_env!("VORTIX_API_URL").unwrap_or("");

        let mut config = Self {
            api_base_url: api_base_url.to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// The API base URL is mandatory; an empty value is a deployment error.
    pub fn api_base_url(&self) -> Option<&str> {
        normalize_runtime_value(&self.api_base_url).map(|_| self.api_base_url.trim())
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("VORTIX_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_url"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_runtime_overrides, normalize_runtime_value, AppConfig, RuntimeConfig};

    fn config(url: &str) -> AppConfig {
        AppConfig {
            api_base_url: url.to_string(),
        }
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://api.vortixpr.com/api "),
            Some("https://api.vortixpr.com/api".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = config("https://api.default/api");
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("  "),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.default/api");
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = config("https://api.default/api");
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://api.override/api"),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override/api");
    }

    #[test]
    fn missing_api_base_url_is_reported() {
        assert_eq!(config("").api_base_url(), None);
        assert_eq!(config("  ").api_base_url(), None);
        assert_eq!(
            config(" http://localhost:8000/api ").api_base_url(),
            Some("http://localhost:8000/api")
        );
    }

    #[test]
    fn load_without_window_uses_build_value() {
        let loaded = AppConfig::load();
        assert_eq!(
            loaded.api_base_url,
            option_env!("VORTIX_API_URL").unwrap_or("")
        );
    }
}
