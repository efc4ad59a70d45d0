//! High-level driver API for the TPA2016D2
//!
//! This module provides a user-friendly interface to the TPA2016D2
//! amplifier: per-parameter getters and setters in physical units, the
//! read-modify-write sequencing for registers whose bit-fields share a
//! byte, and the cross-parameter rules that make some requests illegal
//! under the current compression ratio.
//!
//! The driver holds no cached register state. Every getter decodes from a
//! fresh bus read and every guarded setter re-reads the compression ratio
//! at call time, so the decision always reflects what the chip is actually
//! configured to, not what was last written through this instance.

use crate::Error;
use crate::agc::{self, AgcConfig, CompressionRatio, NoiseGateThreshold};
use crate::registers::Tpa2016 as RegisterDevice;

use device_driver::RegisterInterface;

/// Main driver for the TPA2016D2
///
/// The driver is synchronous and expects a single logical caller: the
/// read-modify-write sequences are not safe under interleaving, so wrap
/// the whole driver in a mutex if several threads share one amplifier.
pub struct Tpa2016Driver<I> {
    device: RegisterDevice<I>,
}

impl<I> Tpa2016Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new TPA2016D2 driver instance
    ///
    /// This wakes the amplifier by clearing the software-shutdown flag;
    /// every other register keeps its power-on (or prior) value.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            device: RegisterDevice::new(interface),
        };

        // Leave low-power mode; the chip ignores most control traffic
        // while SWS is set.
        driver.software_shutdown(false)?;

        Ok(driver)
    }

    /// Put the amplifier into software shutdown and return the bus interface
    ///
    /// The shutdown write happens before the interface is handed back, and
    /// the interface is returned even if that write fails; the write result
    /// is reported alongside so the caller can still observe the failure.
    pub fn release(mut self) -> (I, Result<(), Error<I::Error>>) {
        let result = self.software_shutdown(true);
        (self.device.interface, result)
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    // ==================== Setup register ====================

    /// Enable or disable the right and left amplifier channels
    ///
    /// The channels live in the same register but are independent bits;
    /// each write goes through a read-modify-write so that toggling one
    /// channel never disturbs the other.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn enable_channels(&mut self, right: bool, left: bool) -> Result<(), Error<I::Error>> {
        self.device.setup().modify(|w| {
            w.set_right_en(right);
            w.set_left_en(left);
        })?;
        Ok(())
    }

    /// Whether the right amplifier channel is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn right_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.setup().read()?.right_en())
    }

    /// Whether the left amplifier channel is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn left_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.setup().read()?.left_en())
    }

    /// Enter or leave software shutdown
    ///
    /// Shutdown stops control, bias and oscillator for minimal power draw.
    /// [`new`](Self::new) clears the flag and [`release`](Self::release)
    /// sets it, so most callers never need this directly.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn software_shutdown(&mut self, shutdown: bool) -> Result<(), Error<I::Error>> {
        self.device.setup().modify(|w| {
            w.set_sws(shutdown);
        })?;
        Ok(())
    }

    /// Whether the amplifier is operating (software shutdown clear)
    ///
    /// Derived from a fresh read of the shutdown flag, never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn ready(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(!self.device.setup().read()?.sws())
    }

    /// Write the short-circuit fault latches
    ///
    /// The latches are write-to-clear: the chip sets them when it detects a
    /// short and they hold until `false` is written. Writing `true` forces
    /// a latch set, which is only useful when exercising fault handling.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_short(&mut self, right: bool, left: bool) -> Result<(), Error<I::Error>> {
        self.device.setup().modify(|w| {
            w.set_right_fault(right);
            w.set_left_fault(left);
        })?;
        Ok(())
    }

    /// Whether a short circuit occurred on the right speaker
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn right_shorted(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.setup().read()?.right_fault())
    }

    /// Whether a short circuit occurred on the left speaker
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn left_shorted(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.setup().read()?.left_fault())
    }

    /// Whether the die is above 150 °C (hardware thermal shutdown)
    ///
    /// Read-only status; the chip clears it on its own once it cools down.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn too_hot(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.setup().read()?.thermal_fault())
    }

    /// Enable or disable the noise gate
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateConflict`] when enabling while the compression
    /// ratio is 1:1 (the noise gate needs active compression), or a bus
    /// error if communication with the device fails. On conflict nothing is
    /// written.
    pub fn enable_noise_gate(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        if enable && !self.compression_active()? {
            return Err(Error::StateConflict);
        }
        self.device.setup().modify(|w| {
            w.set_noise_gate_en(enable);
        })?;
        Ok(())
    }

    /// Whether the noise gate is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn noise_gate_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.setup().read()?.noise_gate_en())
    }

    // ==================== AGC timing registers ====================

    /// Set the attack time in ms (minimum time between gain decreases)
    ///
    /// The value is quantized down to the nearest 1.28 ms step; reading
    /// back reports the quantized value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] outside [1.28, 80.66] ms (nothing is
    /// written), or a bus error if communication with the device fails.
    pub fn set_attack_time(&mut self, time_ms: f32) -> Result<(), Error<I::Error>> {
        let raw = agc::encode_attack_time(time_ms).ok_or(Error::OutOfRange)?;
        self.device.attack().modify(|w| {
            w.set_time(raw);
        })?;
        Ok(())
    }

    /// Get the attack time in ms
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn attack_time(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(agc::decode_attack_time(self.device.attack().read()?.time()))
    }

    /// Set the release time in seconds (minimum time between gain increases)
    ///
    /// The value is quantized down to the nearest 0.1644 s step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] outside [0.1644, 10.36] s (nothing is
    /// written), or a bus error if communication with the device fails.
    pub fn set_release_time(&mut self, time_s: f32) -> Result<(), Error<I::Error>> {
        let raw = agc::encode_release_time(time_s).ok_or(Error::OutOfRange)?;
        self.device.release().modify(|w| {
            w.set_time(raw);
        })?;
        Ok(())
    }

    /// Get the release time in seconds
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn release_time(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(agc::decode_release_time(
            self.device.release().read()?.time(),
        ))
    }

    /// Set the hold time in seconds (minimum time between an attack and a release)
    ///
    /// The value is quantized down to the nearest 0.0137 s step; 0 disables
    /// the hold function entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] outside [0, 0.8631] s (nothing is
    /// written), or a bus error if communication with the device fails.
    pub fn set_hold_time(&mut self, time_s: f32) -> Result<(), Error<I::Error>> {
        let raw = agc::encode_hold_time(time_s).ok_or(Error::OutOfRange)?;
        self.device.hold().modify(|w| {
            w.set_time(raw);
        })?;
        Ok(())
    }

    /// Get the hold time in seconds (0 when the hold function is disabled)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn hold_time(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(agc::decode_hold_time(self.device.hold().read()?.time()))
    }

    /// Disable the hold function (sets the hold time to 0)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn disable_hold_control(&mut self) -> Result<(), Error<I::Error>> {
        self.device.hold().modify(|w| {
            w.set_time(0);
        })?;
        Ok(())
    }

    /// Whether the hold function is active (hold time nonzero)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn hold_control_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.hold().read()?.time() != 0)
    }

    // ==================== Fixed gain register ====================

    /// Set the fixed gain in dB
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] outside [-28, 30] dB, or
    /// [`Error::StateConflict`] for a negative gain while the compression
    /// ratio is 1:1 (without compression the gain floor is 0 dB). Neither
    /// case writes to the bus. Bus errors are propagated unchanged.
    pub fn set_gain(&mut self, gain_db: i8) -> Result<(), Error<I::Error>> {
        let raw = agc::encode_fixed_gain(gain_db).ok_or(Error::OutOfRange)?;
        if gain_db < 0 && !self.compression_active()? {
            return Err(Error::StateConflict);
        }
        self.device.fixed_gain().modify(|w| {
            w.set_gain(raw);
        })?;
        Ok(())
    }

    /// Get the fixed gain in dB
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn gain(&mut self) -> Result<i8, Error<I::Error>> {
        Ok(agc::decode_fixed_gain(
            self.device.fixed_gain().read()?.gain(),
        ))
    }

    // ==================== AGC control 1 register ====================

    /// Enable or disable the output limiter
    ///
    /// The register bit is inverted (it is a *disable* flag); this method
    /// takes the non-inverted meaning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateConflict`] when disabling while the
    /// compression ratio is not 1:1 (the limiter is mandatory under active
    /// compression; nothing is written), or a bus error if communication
    /// with the device fails.
    pub fn enable_limiter(&mut self, limiter: bool) -> Result<(), Error<I::Error>> {
        if !limiter && self.compression_active()? {
            return Err(Error::StateConflict);
        }
        self.device.agc_control_1().modify(|w| {
            w.set_output_limiter_disable(!limiter);
        })?;
        Ok(())
    }

    /// Whether the output limiter is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn limiter_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(!self.device.agc_control_1().read()?.output_limiter_disable())
    }

    /// Set the output limiter level in dBV
    ///
    /// The value is quantized down to the nearest 0.5 dBV step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] outside [-6.5, 9.0] dBV (nothing is
    /// written), or a bus error if communication with the device fails.
    pub fn set_limiter_level(&mut self, level_dbv: f32) -> Result<(), Error<I::Error>> {
        let raw = agc::encode_limiter_level(level_dbv).ok_or(Error::OutOfRange)?;
        self.device.agc_control_1().modify(|w| {
            w.set_output_limiter_level(raw);
        })?;
        Ok(())
    }

    /// Get the output limiter level in dBV
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn limiter_level(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(agc::decode_limiter_level(
            self.device.agc_control_1().read()?.output_limiter_level(),
        ))
    }

    /// Set the noise gate activation threshold
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateConflict`] while the compression ratio is 1:1
    /// (the threshold is only meaningful under active compression; nothing
    /// is written), or a bus error if communication with the device fails.
    pub fn set_noise_gate_threshold(
        &mut self,
        threshold: NoiseGateThreshold,
    ) -> Result<(), Error<I::Error>> {
        if !self.compression_active()? {
            return Err(Error::StateConflict);
        }
        self.device.agc_control_1().modify(|w| {
            w.set_noise_gate_threshold(threshold.raw_value());
        })?;
        Ok(())
    }

    /// Get the noise gate activation threshold
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCode`] if the field holds a code outside the
    /// documented table, or a bus error if communication with the device
    /// fails.
    pub fn noise_gate_threshold(&mut self) -> Result<NoiseGateThreshold, Error<I::Error>> {
        let raw = self.device.agc_control_1().read()?.noise_gate_threshold();
        NoiseGateThreshold::from_raw(raw).ok_or(Error::UnknownCode(raw))
    }

    // ==================== AGC control 2 register ====================

    /// Set the compression ratio
    ///
    /// Switching to 1:1 is always accepted: the hardware ignores the noise
    /// gate and limiter settings in that mode rather than faulting. The
    /// dependent setters enforce their own rules against the ratio that is
    /// current when they run.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_compression_ratio(&mut self, ratio: CompressionRatio) -> Result<(), Error<I::Error>> {
        self.device.agc_control_2().modify(|w| {
            w.set_compression_ratio(ratio.raw_value());
        })?;
        Ok(())
    }

    /// Get the compression ratio
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCode`] if the field holds a code outside the
    /// documented table, or a bus error if communication with the device
    /// fails.
    pub fn compression_ratio(&mut self) -> Result<CompressionRatio, Error<I::Error>> {
        let raw = self.device.agc_control_2().read()?.compression_ratio();
        CompressionRatio::from_raw(raw).ok_or(Error::UnknownCode(raw))
    }

    /// Set the maximum gain the AGC may reach, in dB
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] outside [18, 30] dB (nothing is
    /// written), or a bus error if communication with the device fails.
    pub fn set_max_gain(&mut self, gain_db: u8) -> Result<(), Error<I::Error>> {
        let raw = agc::encode_max_gain(gain_db).ok_or(Error::OutOfRange)?;
        self.device.agc_control_2().modify(|w| {
            w.set_max_gain(raw);
        })?;
        Ok(())
    }

    /// Get the maximum gain the AGC may reach, in dB
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn max_gain(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(agc::decode_max_gain(
            self.device.agc_control_2().read()?.max_gain(),
        ))
    }

    // ==================== Bulk configuration ====================

    /// Apply a complete AGC configuration
    ///
    /// The compression ratio is written first so the timing and gain-
    /// ceiling writes that follow see the ratio they were configured for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if any timing or gain value is outside
    /// its domain, or a bus error if communication with the device fails.
    /// A failing value aborts the sequence; registers already written keep
    /// their new values.
    pub fn configure_agc(&mut self, config: AgcConfig) -> Result<(), Error<I::Error>> {
        self.set_compression_ratio(config.compression_ratio)?;
        self.set_attack_time(config.attack_time_ms)?;
        self.set_release_time(config.release_time_s)?;
        self.set_hold_time(config.hold_time_s)?;
        self.set_max_gain(config.max_gain_db)?;
        Ok(())
    }

    // ==================== Invariant guards ====================

    /// Whether compression is currently active (ratio other than 1:1)
    ///
    /// Always reads the ratio fresh from the device: the legality of a
    /// dependent change hinges on the ratio at the moment of the call, not
    /// on anything this instance wrote earlier.
    fn compression_active(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(!self.compression_ratio()?.is_unity())
    }
}
