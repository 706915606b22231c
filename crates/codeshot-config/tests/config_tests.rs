#[cfg(test)]
mod tests {
    use codeshot_config::ConfigLoader;
    use codeshot_config::schema::*;
    use std::io::Write;

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_codeshot_config_defaults() {
        let config = CodeShotConfig::default();
        assert!(config.agent.agent_id.is_none());
        assert!(config.agent.base_prompt.is_empty());
        assert!(config.agent.few_shots.is_none());
        assert!(!config.agent.conversational);
        assert_eq!(config.server.listen, "0.0.0.0:8181");
        assert!(config.server.refresh_on_start);
        assert_eq!(config.storage.timeout_secs, 30);
    }

    #[test]
    fn test_platform_derived_urls() {
        let platform = PlatformConfig::default();
        assert_eq!(
            platform.user_storage_url(),
            "https://app.fixie.ai/api/userstorage"
        );
        assert_eq!(platform.refresh_url(), "https://app.fixie.ai/api/refresh");

        let platform = PlatformConfig {
            api_url: "http://localhost:8000/".into(),
        };
        assert_eq!(
            platform.user_storage_url(),
            "http://localhost:8000/api/userstorage"
        );
    }

    #[test]
    fn test_storage_url_override() {
        let mut config = CodeShotConfig::default();
        assert_eq!(config.storage_url(), "https://app.fixie.ai/api/userstorage");
        config.storage.url = Some("http://127.0.0.1:9000/store/".into());
        assert_eq!(config.storage_url(), "http://127.0.0.1:9000/store");
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    // ── TOML parsing tests ─────────────────────────────────────

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = CodeShotConfig::default();
        config.agent.base_prompt = "I toss coins.".into();
        config.agent.few_shots = Some(FewShotsValue::List(vec!["Q: a\nA: b".into()]));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: CodeShotConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.agent.base_prompt, "I toss coins.");
        assert_eq!(restored.agent.few_shots, config.agent.few_shots);
        assert_eq!(restored.server.listen, config.server.listen);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let toml_str = r#"
[agent]
agent_id = "alice/coin"
base_prompt = "I am a simple agent that tosses a coin."

[storage]
timeout_secs = 5
"#;
        let config: CodeShotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.agent_id.as_deref(), Some("alice/coin"));
        assert_eq!(config.storage.timeout_secs, 5);
        // Defaults should fill in
        assert_eq!(config.server.listen, "0.0.0.0:8181");
        assert_eq!(config.platform.api_url, "https://app.fixie.ai");
    }

    #[test]
    fn test_few_shots_as_block_or_list() {
        let block: CodeShotConfig = toml::from_str(
            r#"
[agent]
few_shots = """
Q: Toss a coin.
Func[coin] says: heads
A: It's heads!
"""
"#,
        )
        .unwrap();
        assert!(matches!(block.agent.few_shots, Some(FewShotsValue::Text(_))));

        let list: CodeShotConfig = toml::from_str(
            r#"
[agent]
few_shots = ["Q: a\nA: b", "Q: c\nA: d"]
"#,
        )
        .unwrap();
        assert_eq!(
            list.agent.few_shots,
            Some(FewShotsValue::List(vec![
                "Q: a\nA: b".into(),
                "Q: c\nA: d".into()
            ]))
        );
    }

    // ── Validation tests ───────────────────────────────────────

    fn valid_config() -> CodeShotConfig {
        let mut config = CodeShotConfig::default();
        config.agent.agent_id = Some("alice/coin".into());
        config.agent.base_prompt = "I toss coins.".into();
        config
    }

    #[test]
    fn test_valid_config_has_no_errors() {
        let warnings = valid_config().validate().unwrap();
        assert!(warnings.iter().all(|w| w.severity != WarningSeverity::Error));
    }

    #[test]
    fn test_empty_base_prompt_is_only_a_warning() {
        let warnings = CodeShotConfig::default().validate().unwrap();
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "agent.base_prompt" && w.severity == WarningSeverity::Warning)
        );
    }

    #[test]
    fn test_both_few_shot_sources_is_an_error() {
        let mut config = valid_config();
        config.agent.few_shots = Some(FewShotsValue::Text("Q: a\nA: b".into()));
        config.agent.few_shots_file = Some("shots.txt".into());
        let err = config.validate().unwrap_err();
        assert!(err.contains("agent.few_shots"));
    }

    #[test]
    fn test_bad_listen_address_is_an_error() {
        let mut config = valid_config();
        config.server.listen = "not an address".into();
        let err = config.validate().unwrap_err();
        assert!(err.contains("server.listen"));
    }

    #[test]
    fn test_zero_timeout_is_an_error() {
        let mut config = valid_config();
        config.storage.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("storage.timeout_secs"));
    }

    #[test]
    fn test_bad_urls_are_errors() {
        let mut config = valid_config();
        config.platform.api_url = "no scheme here".into();
        assert!(config.validate().unwrap_err().contains("platform.api_url"));

        let mut config = valid_config();
        config.storage.url = Some("::::".into());
        assert!(config.validate().unwrap_err().contains("storage.url"));
    }

    #[test]
    fn test_agent_id_with_whitespace_is_an_error() {
        let mut config = valid_config();
        config.agent.agent_id = Some("alice coin".into());
        assert!(config.validate().unwrap_err().contains("agent.agent_id"));
    }

    #[test]
    fn test_unknown_log_format_warns() {
        let mut config = valid_config();
        config.logging.format = "xml".into();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "logging.format"));
    }

    #[test]
    fn test_warning_display_includes_hint() {
        let w = ConfigWarning {
            field: "storage.timeout_secs".into(),
            message: "timeout must be greater than zero".into(),
            severity: WarningSeverity::Error,
            hint: Some("The default is 30 seconds".into()),
        };
        let s = w.to_string();
        assert!(s.starts_with("error: storage.timeout_secs"));
        assert!(s.contains("hint: The default is 30 seconds"));
    }

    // ── Loader tests ───────────────────────────────────────────

    #[test]
    fn test_loader_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[agent]\nagent_id = \"bob/dice\"\nbase_prompt = \"I roll dice.\"\n\n[server]\nlisten = \"127.0.0.1:9999\""
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(file.path())).unwrap();
        let config = loader.get();
        assert_eq!(config.agent.base_prompt, "I roll dice.");
        assert_eq!(config.server.listen, "127.0.0.1:9999");
        assert_eq!(loader.path(), file.path());
    }

    #[test]
    fn test_loader_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loader.get().agent.base_prompt.is_empty());
    }

    #[test]
    fn test_loader_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent\nbase_prompt = ").unwrap();
        let err = ConfigLoader::load(Some(file.path())).err().unwrap();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_loader_inlines_few_shots_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shots.txt"), "Q: a\nA: b\n\nQ: c\nA: d\n").unwrap();
        let config_path = dir.path().join("codeshot.toml");
        std::fs::write(
            &config_path,
            "[agent]\nbase_prompt = \"p\"\nfew_shots_file = \"shots.txt\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&config_path)).unwrap().get();
        assert_eq!(
            config.agent.few_shots,
            Some(FewShotsValue::Text("Q: a\nA: b\n\nQ: c\nA: d\n".into()))
        );
    }

    #[test]
    fn test_loader_missing_few_shots_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("codeshot.toml");
        std::fs::write(
            &config_path,
            "[agent]\nbase_prompt = \"p\"\nfew_shots_file = \"nope.txt\"\n",
        )
        .unwrap();

        let err = ConfigLoader::load(Some(&config_path)).err().unwrap();
        assert!(err.to_string().contains("agent.few_shots_file"));
    }
}
