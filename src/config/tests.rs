use super::*;

#[test]
fn defaults_are_valid() {
    let config = QaConfigBuilder::new().build().expect("defaults validate");
    assert_eq!(config, QaConfig::default());
    assert_eq!(config.nominal_gap, 32_000);
    assert_eq!(config.unanchorable_gap, 330_000);
    assert_eq!(config.ramp_up_s, 15.0);
}

#[test]
fn orbits_convert_to_seconds() {
    let config = QaConfig::default();
    let seconds = config.orbits_to_seconds(11_245);
    assert!((seconds - 0.99996).abs() < 1e-4);
    assert_eq!(config.orbits_to_seconds(0), 0.0);
}

#[test]
fn invalid_fields_are_rejected() {
    let err = QaConfigBuilder::new().gaps(0, 10).build().expect_err("zero nominal");
    assert_eq!(err, ConfigError::NominalGapZero);

    let err = QaConfigBuilder::new()
        .gaps(500, 100)
        .build()
        .expect_err("unanchorable below nominal");
    assert_eq!(
        err,
        ConfigError::UnanchorableBelowNominal {
            nominal: 500,
            unanchorable: 100
        }
    );

    let err = QaConfigBuilder::new()
        .ramp_up_s(-1.0)
        .build()
        .expect_err("negative ramp");
    assert!(matches!(err, ConfigError::InvalidRampUp { .. }));

    let err = QaConfigBuilder::new()
        .smoothing(10.0, 0)
        .build()
        .expect_err("zero decimation");
    assert_eq!(err, ConfigError::ZeroDecimation);

    let mut builder = QaConfigBuilder::new();
    builder.thresholds.dead_time_ib = crate::qa::Bands::new(0.2, 0.1);
    let err = builder.build().expect_err("unordered bands");
    assert_eq!(
        err,
        ConfigError::InvalidThreshold {
            table: "dead_time_ib"
        }
    );
}

#[test]
fn json_round_trip_validates() {
    let config = QaConfigBuilder::new()
        .ramp_up_s(20.0)
        .build()
        .expect("valid");
    let json = serde_json::to_string(&config).expect("serialize");
    let parsed = QaConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);

    let broken = json.replace("\"every\":5", "\"every\":0");
    assert_eq!(
        QaConfig::from_json_str(&broken),
        Err(ConfigError::ZeroDecimation)
    );
    assert!(matches!(
        QaConfig::from_json_str("{"),
        Err(ConfigError::Json(_))
    ));
}
