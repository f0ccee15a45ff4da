use super::load_config;
use super::settings::Settings;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const ENV_KEYS: [&str; 4] = [
    "PORT",
    "CHATRELAY_SERVER__PORT",
    "CHATRELAY_RELAY__DEFAULT_TOPIC",
    "CHATRELAY_STORAGE__PATH",
];

fn without_relay_env<F: FnOnce()>(f: F) {
    temp_env::with_vars_unset(ENV_KEYS, f);
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.route_prefix, "/chatapp");
    assert_eq!(settings.relay.channel, "messages");
    assert_eq!(settings.relay.default_topic, "chat");
    assert_eq!(settings.relay.broadcast_capacity, 1024);
    assert_eq!(settings.relay.max_viewers, 1000);
    assert_eq!(settings.log.level, "info");
}

#[test]
#[serial]
fn load_config_without_sources_uses_defaults() {
    without_relay_env(|| {
        let cfg = load_config().expect("load_config failed");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.path, "chatrelay_db");
    });
}

#[test]
#[serial]
fn prefixed_env_overrides_nested_keys() {
    without_relay_env(|| {
        temp_env::with_vars(
            [
                ("CHATRELAY_SERVER__PORT", Some("9100")),
                ("CHATRELAY_RELAY__DEFAULT_TOPIC", Some("general")),
            ],
            || {
                let cfg = load_config().expect("load_config failed");
                assert_eq!(cfg.server.port, 9100);
                assert_eq!(cfg.relay.default_topic, "general");
                assert_eq!(cfg.relay.channel, "messages");
            },
        );
    });
}

#[test]
#[serial]
fn bare_port_wins_over_everything() {
    without_relay_env(|| {
        temp_env::with_vars(
            [
                ("CHATRELAY_SERVER__PORT", Some("9100")),
                ("PORT", Some("3000")),
            ],
            || {
                let cfg = load_config().expect("load_config failed");
                assert_eq!(cfg.server.port, 3000);
            },
        );
    });
}

#[test]
#[serial]
fn invalid_port_is_a_config_error() {
    without_relay_env(|| {
        temp_env::with_var("PORT", Some("eighty"), || {
            assert!(load_config().is_err());
        });
    });
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    without_relay_env(|| {
        // load_config reads config/default.toml relative to the working directory
        let tmp = TempDir::new().expect("create tempdir");
        let orig = env::current_dir().expect("current_dir");
        env::set_current_dir(tmp.path()).expect("set current dir");

        fs::create_dir_all("config").expect("create config dir");
        let toml = r#"
            [server]
            host = "127.0.0.1"
            route_prefix = "/relay"

            [storage]
            path = "/var/lib/chatrelay"

            [log]
            level = "debug"
        "#;
        fs::write("config/default.toml", toml).expect("write config file");

        let cfg = load_config();
        env::set_current_dir(orig).expect("restore cwd");

        let cfg = cfg.expect("load_config failed");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.route_prefix, "/relay");
        assert_eq!(cfg.storage.path, "/var/lib/chatrelay");
        assert_eq!(cfg.storage.flush_every_ms, 500);
        assert_eq!(cfg.log.level, "debug");
    });
}
