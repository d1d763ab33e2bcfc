use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use vayama::config::AppConfig;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for name in [
            "VAYAMA_SERVER__PORT",
            "VAYAMA_LLM__MODEL",
            "VAYAMA_LLM__API_KEY",
            "VAYAMA_TIMING__PAYMENT_DELAY_MS",
            "GEMINI_API_KEY",
            "API_KEY",
            "CONFIG_FILE",
            "PORT",
            "HOST",
        ] {
            env::remove_var(name);
        }
    }
}

fn load(args: &[&str]) -> AppConfig {
    let argv = std::iter::once("vayama").chain(args.iter().copied());
    AppConfig::load_from_args(argv).expect("Failed to load config")
}

fn yaml_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(content.as_bytes()).expect("Failed to write temp config");
    file
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]);
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.client_idle().as_secs(), 1800);
    assert_eq!(config.server.client_sweep().as_secs(), 60);
    assert_eq!(config.llm.model, "gemini-2.5-flash");
    assert_eq!(config.timing.payment_delay_ms, 1500);
    assert!(config.llm.api_key.is_none());
    assert!(!config.logging.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("VAYAMA_SERVER__PORT", "9090");
        env::set_var("VAYAMA_TIMING__PAYMENT_DELAY_MS", "0");
        env::set_var("VAYAMA_LLM__MODEL", "gemini-2.5-pro");
    }

    let config = load(&[]);
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.timing.payment_delay_ms, 0);
    assert_eq!(config.llm.model, "gemini-2.5-pro");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_then_cli_override() {
    clear_env_vars();

    let file = yaml_file(
        r#"
server:
  port: 7070
  host: 127.0.0.1
  client_idle_secs: 120
timing:
  story_ms: 2500
"#,
    );
    let path = file.path().to_str().expect("utf-8 temp path");

    let config = load(&["--config", path]);
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.timing.story_ms, 2500);
    assert_eq!(config.server.client_idle_secs, 120);
    assert_eq!(config.timing.notification_ms, 4000);

    let config = load(&["--config", path, "--port", "8181", "--log-json"]);
    assert_eq!(config.server.port, 8181);
    assert!(config.logging.json);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();
    let result = AppConfig::load_from_args(["vayama", "--config", "/nonexistent/vayama.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_api_key_fallbacks() {
    clear_env_vars();
    unsafe {
        env::set_var("API_KEY", "from-api-key");
    }
    assert_eq!(load(&[]).llm.api_key.as_deref(), Some("from-api-key"));

    unsafe {
        env::set_var("GEMINI_API_KEY", "from-gemini");
    }
    assert_eq!(load(&[]).llm.api_key.as_deref(), Some("from-gemini"));

    unsafe {
        env::set_var("VAYAMA_LLM__API_KEY", "from-config");
    }
    assert_eq!(load(&[]).llm.api_key.as_deref(), Some("from-config"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    // Create ./config.yaml
    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = load(&[]);

    let result = std::panic::catch_unwind(|| {
        assert_eq!(config.server.port, 6060);
    });

    fs::remove_file(cwd_path).unwrap();

    if let Err(e) = result {
        std::panic::resume_unwind(e);
    }
}
