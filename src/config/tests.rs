use super::*;
use std::fs;
use tempfile::TempDir;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn config_file_persistence() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config {
            ollama: OllamaConfig {
                protocol: "https".to_string(),
                host: "test-host".to_string(),
                port: 8080,
                embedding_model: "test-embed".to_string(),
                translation_model: "test-mt".to_string(),
                batch_size: 32,
                timeout_seconds: 45,
            },
            ..Config::default()
        };

        let toml_content = toml::to_string_pretty(&original_config)
            .expect("config should convert to toml string successfully");
        fs::write(&config_path, toml_content).expect("should write to config_path successfully");

        let content =
            fs::read_to_string(&config_path).expect("should read from config_path successfully");
        let loaded_config: Config = toml::from_str(&content).expect("should parse toml correctly");

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn invalid_toml_handling() {
        let invalid_toml = r#"
            [ollama
            host = "localhost"
            port = "invalid_port"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn missing_ollama_section_is_rejected() {
        let toml_without_ollama = r#"
            [chat]
            mode = "keyword"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(toml_without_ollama);
        assert!(result.is_err());
    }

    #[test]
    fn complete_valid_config() {
        let valid_toml = r#"
            [ollama]
            protocol = "http"
            host = "localhost"
            port = 11434
            embedding_model = "all-minilm:latest"
            translation_model = "qwen2.5:7b"
            batch_size = 64
            timeout_seconds = 30

            [translation]
            default_language = "en"
            languages = ["hi", "ta"]

            [translation.models]
            "hi-en" = "opus-mt-hi-en"

            [data]
            faq_path = "faq_data.json"

            [chat]
            mode = "semantic"
            fallback_message = "Please rephrase."
        "#;

        let config: Config = toml::from_str(valid_toml).expect("should parse toml successfully");
        assert!(config.validate().is_ok());
        assert_eq!(config.ollama.batch_size, 64);
        assert_eq!(config.translation.languages, vec!["hi", "ta"]);
        assert_eq!(
            config.translation.models.get("hi-en").map(String::as_str),
            Some("opus-mt-hi-en")
        );
        assert_eq!(
            config.data.faq_path.as_deref(),
            Some(std::path::Path::new("faq_data.json"))
        );
        assert_eq!(config.data.intents_path, None);
        assert_eq!(config.chat.fallback_message, "Please rephrase.");
    }

    #[test]
    fn config_validation_edge_cases() {
        let config = Config {
            ollama: OllamaConfig {
                host: String::new(),
                ..OllamaConfig::default()
            },
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn port_boundary_validation() {
        let mut config = OllamaConfig::default();

        assert!(config.set_port(1).is_ok());
        assert!(config.set_port(65535).is_ok());
        assert!(config.set_port(0).is_err());
    }

    #[test]
    fn batch_size_boundary_validation() {
        let mut config = OllamaConfig::default();

        assert!(config.set_batch_size(1).is_ok());
        assert!(config.set_batch_size(1000).is_ok());
        assert!(config.set_batch_size(0).is_err());
        assert!(config.set_batch_size(1001).is_err());
    }

    #[test]
    fn ollama_url_generation_with_different_hosts() {
        let configs = vec![
            ("http", "localhost", 11434, "http://localhost:11434/"),
            ("http", "127.0.0.1", 8080, "http://127.0.0.1:8080/"),
            ("https", "secure.example.com", 8443, "https://secure.example.com:8443/"),
        ];

        for (protocol, host, port, expected) in configs {
            let config = OllamaConfig {
                protocol: protocol.to_string(),
                host: host.to_string(),
                port,
                ..OllamaConfig::default()
            };
            let url = config.ollama_url().expect("should build url");
            assert_eq!(url.as_str(), expected);
        }
    }

    #[test]
    fn pipeline_mode_display() {
        assert_eq!(PipelineMode::Semantic.to_string(), "semantic");
        assert_eq!(PipelineMode::Keyword.to_string(), "keyword");
    }
}
