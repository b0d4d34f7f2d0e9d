// Integration tests for config types in cacti::thread::config

use cacti::thread::config::*;
use cacti::SystemError;

#[test]
fn test_system_config_defaults() {
    let config = ThreadActorSystemConfig::default();

    assert_eq!(config.pool_size, num_cpus::get());
    assert_eq!(config.mailbox_limit, 1024);
    assert_eq!(config.max_actors, 1_048_576);
    assert!(config.handle_interrupts);
    assert_eq!(config.thread_name_prefix, "cacti-worker-");
}

#[test]
fn test_builder_methods_override_defaults() {
    let config = ThreadActorSystemConfig::default()
        .with_pool_size(3)
        .with_mailbox_limit(16)
        .with_max_actors(100)
        .with_interrupt_handling(false);

    assert_eq!(config.pool_size, 3);
    assert_eq!(config.mailbox_limit, 16);
    assert_eq!(config.max_actors, 100);
    assert!(!config.handle_interrupts);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_reports_offending_field() {
    let err = ThreadActorSystemConfig::default()
        .with_mailbox_limit(0)
        .validate()
        .unwrap_err();
    match err {
        SystemError::ConfigError(reason) => assert!(reason.contains("mailbox_limit")),
        other => panic!("unexpected error: {:?}", other),
    }
}
