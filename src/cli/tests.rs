#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_request_is_required_unless_listing_sources() {
        assert!(Args::try_parse_from(["skrive"]).is_err());

        let args = Args::try_parse_from(["skrive", "--list-sources"]).unwrap();
        assert!(args.list_sources);
        assert!(args.request.is_none());
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from([
            "skrive",
            "-r",
            "/tmp/request.json",
            "-c",
            "/tmp/skrive.toml",
            "-o",
            "/tmp/response.json",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.request, Some(PathBuf::from("/tmp/request.json")));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/skrive.toml")));
        assert_eq!(args.output, Some(PathBuf::from("/tmp/response.json")));
        assert!(args.verbose);
        assert!(!args.no_cache);
    }

    #[test]
    fn test_overrides_are_applied_to_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("skrive.toml");
        std::fs::write(
            &config_path,
            "[quality]\nmax_refinement_iterations = 2\n\n[cache]\nenabled = true\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "skrive",
            "--request",
            "req.json",
            "--config",
            config_path.to_str().unwrap(),
            "--no-cache",
            "--max-refinements",
            "1",
            "--cache-dir",
            "/tmp/skrive-cache",
            "--search-api-key",
            "tvly-test",
        ])
        .unwrap();
        let config = args.build_config().unwrap();

        assert!(!config.cache.enabled);
        assert_eq!(config.cache.cache_dir, PathBuf::from("/tmp/skrive-cache"));
        assert_eq!(config.quality.max_refinement_iterations, 1);
        assert_eq!(config.research.api_key, "tvly-test");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let args = Args::try_parse_from([
            "skrive",
            "--request",
            "req.json",
            "--config",
            "/nonexistent/skrive.toml",
        ])
        .unwrap();
        assert!(args.build_config().is_err());
    }

    #[test]
    fn test_load_request_applies_no_research() {
        let temp_dir = TempDir::new().unwrap();
        let request_path = temp_dir.path().join("request.json");
        std::fs::write(
            &request_path,
            r#"{"caller_id": "acme", "topic": "Havvind i Nordsjøen", "content_type": "social_post"}"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "skrive",
            "--request",
            request_path.to_str().unwrap(),
            "--no-research",
        ])
        .unwrap();
        let request = args.load_request().unwrap();

        assert_eq!(request.caller_id, "acme");
        assert!(!request.enable_research);
    }

    #[test]
    fn test_load_request_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let request_path = temp_dir.path().join("request.json");
        std::fs::write(&request_path, "{ not json").unwrap();

        let args =
            Args::try_parse_from(["skrive", "--request", request_path.to_str().unwrap()]).unwrap();
        let err = args.load_request().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse request file"));
    }
}
