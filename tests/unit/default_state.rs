//! Unit tests for the documented power-on state
//!
//! Immediately after construction (which only clears software shutdown)
//! every parameter must decode to its datasheet default.

use crate::common::{assert_float_eq, create_mock_driver};
use tpa2016::{CompressionRatio, NoiseGateThreshold};

#[test]
fn channels_enabled_by_default() {
    let (mut driver, _interface) = create_mock_driver();

    assert!(driver.right_enabled().unwrap());
    assert!(driver.left_enabled().unwrap());
}

#[test]
fn amplifier_ready_after_construction() {
    let (mut driver, _interface) = create_mock_driver();

    assert!(driver.ready().unwrap());
}

#[test]
fn no_faults_by_default() {
    let (mut driver, _interface) = create_mock_driver();

    assert!(!driver.right_shorted().unwrap());
    assert!(!driver.left_shorted().unwrap());
    assert!(!driver.too_hot().unwrap());
}

#[test]
fn noise_gate_enabled_by_default() {
    let (mut driver, _interface) = create_mock_driver();

    assert!(driver.noise_gate_enabled().unwrap());
}

#[test]
fn default_agc_timing() {
    let (mut driver, _interface) = create_mock_driver();

    assert_float_eq(driver.attack_time().unwrap(), 6.4, 1e-4);
    assert_float_eq(driver.release_time().unwrap(), 1.8084, 1e-4);
    assert_float_eq(driver.hold_time().unwrap(), 0.0, 1e-6);
    assert!(!driver.hold_control_enabled().unwrap());
}

#[test]
fn default_gain_is_6_db() {
    let (mut driver, _interface) = create_mock_driver();

    assert_eq!(driver.gain().unwrap(), 6);
}

#[test]
fn default_limiter_configuration() {
    let (mut driver, _interface) = create_mock_driver();

    assert!(driver.limiter_enabled().unwrap());
    assert_float_eq(driver.limiter_level().unwrap(), 6.5, 1e-4);
    assert_eq!(
        driver.noise_gate_threshold().unwrap(),
        NoiseGateThreshold::Mv4
    );
}

#[test]
fn default_compression_and_max_gain() {
    let (mut driver, _interface) = create_mock_driver();

    assert_eq!(
        driver.compression_ratio().unwrap(),
        CompressionRatio::Ratio1To4
    );
    assert_eq!(driver.max_gain().unwrap(), 30);
}
