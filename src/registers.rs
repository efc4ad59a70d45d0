//! Register definitions for the TPA2016D2
//!
//! The TPA2016D2 exposes its configuration through seven 8-bit registers at
//! addresses 0x01-0x07. Register 1 carries the function-control flags,
//! registers 2-4 the AGC timing, register 5 the fixed gain, and registers
//! 6-7 the limiter, noise-gate threshold, compression ratio and maximum
//! gain. Fields that share a register are declared here so that the
//! generated `.modify()` accessors mask them individually; reserved bits
//! are listed explicitly to keep the map exhaustive.

device_driver::create_device!(
    device_name: Tpa2016,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// IC function control (0x01)
        ///
        /// The two fault latches are write-to-clear: the chip sets them on a
        /// short circuit and they stay set until 0 is written. The thermal
        /// flag is read-only status.
        register Setup {
            const ADDRESS = 0x01;
            const SIZE_BITS = 8;

            /// Noise gate function enable
            noise_gate_en: bool = 0,
            reserved_1: uint = 1..2,
            /// Die temperature above 150 °C (read-only status)
            thermal_fault: bool = 2,
            /// Short-circuit latch for the left channel (write 0 to clear)
            left_fault: bool = 3,
            /// Short-circuit latch for the right channel (write 0 to clear)
            right_fault: bool = 4,
            /// Software shutdown of control, bias and oscillator
            sws: bool = 5,
            /// Left amplifier enable
            left_en: bool = 6,
            /// Right amplifier enable
            right_en: bool = 7,
        },

        /// AGC attack control (0x02)
        register Attack {
            const ADDRESS = 0x02;
            const SIZE_BITS = 8;

            /// Attack time as a step count, 1.28 ms per step
            time: uint = 0..6,
            reserved_7_6: uint = 6..8,
        },

        /// AGC release control (0x03)
        register Release {
            const ADDRESS = 0x03;
            const SIZE_BITS = 8;

            /// Release time as a step count, 0.1644 s per step
            time: uint = 0..6,
            reserved_7_6: uint = 6..8,
        },

        /// AGC hold control (0x04)
        ///
        /// A step count of 0 disables the hold function.
        register Hold {
            const ADDRESS = 0x04;
            const SIZE_BITS = 8;

            /// Hold time as a step count, 0.0137 s per step
            time: uint = 0..6,
            reserved_7_6: uint = 6..8,
        },

        /// AGC fixed gain control (0x05)
        register FixedGain {
            const ADDRESS = 0x05;
            const SIZE_BITS = 8;

            /// Fixed gain in dB as a 6-bit two's-complement value
            gain: uint = 0..6,
            reserved_7_6: uint = 6..8,
        },

        /// AGC control 1 (0x06): output limiter and noise-gate threshold
        register AgcControl1 {
            const ADDRESS = 0x06;
            const SIZE_BITS = 8;

            /// Output limiter level, 0.5 dBV per step starting at -6.5 dBV
            output_limiter_level: uint = 0..5,
            /// Noise gate activation threshold code (1/4/10/20 mV RMS)
            noise_gate_threshold: uint = 5..7,
            /// Disables the output limiter; only legal at a 1:1 compression ratio
            output_limiter_disable: bool = 7,
        },

        /// AGC control 2 (0x07): compression ratio and maximum gain
        register AgcControl2 {
            const ADDRESS = 0x07;
            const SIZE_BITS = 8;

            /// Compression ratio code (1:1, 1:2, 1:4, 1:8)
            compression_ratio: uint = 0..2,
            reserved_3_2: uint = 2..4,
            /// Maximum gain, 1 dB per step starting at 18 dB
            max_gain: uint = 4..8,
        },
    }
);
