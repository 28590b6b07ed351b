use super::*;
use figment::Jail;

#[test]
fn test_config_loads_defaults() {
    let config = BatchConfig::from_figment(Figment::new().merge(Toml::string(DEFAULT_CONFIG)))
        .expect("Should load default config");

    // Embedded defaults and the Default impl must agree
    assert_eq!(config, BatchConfig::default());
    assert_eq!(
        Duration::from_millis(config.poll_interval_ms),
        crate::parallel::DEFAULT_POLL_INTERVAL
    );
    // No simulated work unless asked for with --delay-ms / record_delay_ms
    assert_eq!(config.record_delay_ms, 0);
}

#[test]
fn test_project_file_and_env_priority() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "filebatch.toml",
            r#"
                workers = 3
                format = "lines"
                delimiter = ";"
            "#,
        )?;
        jail.set_env("FILEBATCH_WORKERS", "8");

        let config = BatchConfig::load().expect("Should load layered config");

        assert_eq!(config.workers, 8); // env beats file
        assert_eq!(config.format, RecordFormat::Lines);
        assert_eq!(config.delimiter, ';');
        assert!(config.has_headers); // untouched default
        Ok(())
    });
}

#[test]
fn test_custom_config_replaces_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file("filebatch.toml", "workers = 3")?;
        jail.create_file("custom.json", r#"{ "record_delay_ms": 2 }"#)?;

        let config = BatchConfig::load_with_custom_config(Some(Path::new("custom.json")))
            .expect("Should load custom config");

        assert_eq!(config.workers, 0);
        assert_eq!(config.record_delay_ms, 2);
        Ok(())
    });
}

#[test]
fn test_custom_config_missing_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        let config = BatchConfig::load_with_custom_config(Some(Path::new("non_existent.toml")));
        assert!(config.is_ok(), "Should handle missing custom config gracefully");

        let warning = missing_config_warning(Path::new("non_existent.toml"));
        assert!(warning.is_some_and(|w| w.contains("non_existent.toml")));

        jail.create_file("present.toml", "workers = 2")?;
        assert_eq!(missing_config_warning(Path::new("present.toml")), None);
        Ok(())
    });
}

#[test]
fn test_validation_rejects_bad_values() {
    let config = BatchConfig {
        delimiter: '→',
        ..BatchConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BatchConfig {
        poll_interval_ms: 0,
        ..BatchConfig::default()
    };
    assert!(config.validate().is_err());

    let parsed = BatchConfig::from_figment(Figment::new().merge(Toml::string("format = \"xml\"")));
    assert!(parsed.is_err());
}

#[test]
fn test_processor_config_from_settings() {
    let config = BatchConfig {
        workers: 5,
        record_delay_ms: 1,
        ..BatchConfig::default()
    };

    let processor = config.processor_config(100).unwrap();
    assert_eq!(processor.worker_count(), 5);
    assert_eq!(processor.record_delay(), Duration::from_millis(1));
    assert_eq!(processor.poll_interval(), Duration::from_millis(25));

    let auto = BatchConfig::default().processor_config(1).unwrap();
    assert_eq!(auto.worker_count(), 1);
}

#[test]
fn test_record_source_follows_format() {
    let config = BatchConfig {
        format: RecordFormat::Lines,
        ..BatchConfig::default()
    };
    assert!(matches!(config.record_source(), AnySource::Lines(_)));
    assert!(matches!(BatchConfig::default().record_source(), AnySource::Csv(_)));
}
