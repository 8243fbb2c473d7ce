use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub store_path: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, store_path: Option<PathBuf>) -> Self {
        Self {
            api_url,
            store_path: store_path.unwrap_or_else(crate::storage::FileStorage::default_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("http://localhost:8000/api".to_string(), None);
        assert_eq!(args.api_url, "http://localhost:8000/api");
        assert!(args.store_path.ends_with("session.json"));
    }

    #[test]
    fn test_explicit_store_path() {
        let args = GlobalArgs::new(
            "http://localhost:8000/api".to_string(),
            Some(PathBuf::from("/tmp/s.json")),
        );
        assert_eq!(args.store_path, PathBuf::from("/tmp/s.json"));
    }
}
