/// Delays, in seconds, of the primitives a multiplier is built from.
pub trait TimingModel {
    /// The target clock period; infinite for a combinatorial multiplier.
    fn clock_period(&self) -> f64;

    fn adder_delay(&self, bits: u32) -> f64;

    fn negate_delay(&self, bits: u32) -> f64 {
        self.adder_delay(bits)
    }

    fn ff_delay(&self) -> f64;

    fn wire_delay(&self) -> f64;

    /// Splits an adder too slow for a single cycle into registered chunks.
    ///
    /// Each chunk is as wide as fits in a period after a register and a wire.
    fn pipelined_adder(&self, bits: u32) -> PipelinedAdder {
        let budget = self.clock_period() - self.ff_delay() - self.wire_delay();
        let chunk = (1..=bits).rev().find(|&chunk| self.adder_delay(chunk) <= budget).unwrap_or(1);
        let chunks = bits.div_ceil(chunk);
        let last_chunk = bits - (chunks - 1) * chunk;
        PipelinedAdder {
            width: bits,
            chunk,
            latency: chunks - 1,
            output_delay: self.adder_delay(last_chunk),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelinedAdder {
    pub width: u32,
    pub chunk: u32,
    /// Number of register stages inside the adder.
    pub latency: u32,
    pub output_delay: f64,
}

/// A target whose adders use a LUT followed by a linear carry chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearTiming {
    /// Target frequency in hertz; zero or less means no pipelining.
    pub frequency: f64,
    pub lut_delay: f64,
    pub carry_delay: f64,
    pub ff_delay: f64,
    pub wire_delay: f64,
}

impl LinearTiming {
    pub const DEFAULT_FREQUENCY: f64 = 400e6;

    pub fn new(frequency: f64) -> LinearTiming {
        LinearTiming { frequency, lut_delay: 1.5e-9, carry_delay: 3.4e-11, ff_delay: 3.0e-10, wire_delay: 5.0e-10 }
    }

    pub fn combinatorial() -> LinearTiming {
        LinearTiming::new(0.0)
    }

    pub fn is_pipelined(&self) -> bool {
        self.frequency > 0.0
    }
}

impl Default for LinearTiming {
    fn default() -> Self {
        LinearTiming::new(Self::DEFAULT_FREQUENCY)
    }
}

impl TimingModel for LinearTiming {
    fn clock_period(&self) -> f64 {
        if self.is_pipelined() { 1.0 / self.frequency } else { f64::INFINITY }
    }

    fn adder_delay(&self, bits: u32) -> f64 {
        self.lut_delay + f64::from(bits) * self.carry_delay
    }

    fn ff_delay(&self) -> f64 {
        self.ff_delay
    }

    fn wire_delay(&self) -> f64 {
        self.wire_delay
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pipelined_adder_chunks() {
        // budget of 10 - 1 - 1 = 8 fits 6 bits per chunk
        let timing = LinearTiming {
            frequency: 1e8,
            lut_delay: 1.5e-9,
            carry_delay: 1e-9,
            ff_delay: 1e-9,
            wire_delay: 1e-9,
        };
        let adder = timing.pipelined_adder(20);
        assert_eq!(adder.chunk, 6);
        assert_eq!(adder.latency, 3);
        assert!((adder.output_delay - 3.5e-9).abs() < 1e-15);
    }

    #[test]
    fn test_combinatorial() {
        let timing = LinearTiming::combinatorial();
        assert!(!timing.is_pipelined());
        assert_eq!(timing.clock_period(), f64::INFINITY);
    }
}
