//! Module: pattern
//!
//! Purpose: Beacon waveform definitions. A pattern is a fixed sequence of
//! (mark, space) pulse pairs, expressed in microseconds.
//!
//! Architecture:
//! - Patterns are `const` data, compiled into flash
//! - Marks are carrier bursts, spaces are silence with the line forced off
//! - Helpers are `const fn` so invariants can be checked at compile time
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// One code element: carrier on for `on_us`, then silence for `off_us`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulsePair {
    /// Carrier burst length in microseconds.
    pub on_us: u16,
    /// Silence length in microseconds.
    pub off_us: u16,
}

impl PulsePair {
    pub const fn new(on_us: u16, off_us: u16) -> Self {
        Self { on_us, off_us }
    }

    /// Total length of the pair in microseconds.
    #[inline]
    pub const fn duration_us(&self) -> u32 {
        self.on_us as u32 + self.off_us as u32
    }

    /// Both halves must be non-zero to produce a visible edge.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.on_us > 0 && self.off_us > 0
    }
}

/// Number of pulse pairs per beacon cycle.
pub const PATTERN_LEN: usize = 3;

/// A full beacon cycle.
pub type Pattern = [PulsePair; PATTERN_LEN];

/// Measured beacon, as seen after the receiver module inverts it:
/// high 6 ms / low 624 us / high 1.2 ms / low 624 us / high 1.2 ms / low 624 us.
///
/// The on times are trimmed to 622 us to absorb loop overhead; with the
/// IR LED on 1.866 ms out of 10.25 ms the duty is about 18 %.
pub const MEASURED_BEACON: Pattern = [
    PulsePair::new(622, 1195),
    PulsePair::new(622, 1195),
    PulsePair::new(622, 5994),
];

/// Low-duty alternative: 300 us marks, 900 us on per 9.3 ms cycle.
pub const PRIVATE_BEACON: Pattern = [
    PulsePair::new(300, 1200),
    PulsePair::new(300, 1200),
    PulsePair::new(300, 6000),
];

/// Total cycle length in microseconds.
pub const fn pattern_duration_us(pattern: &Pattern) -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < PATTERN_LEN {
        total += pattern[i].duration_us();
        i += 1;
    }
    total
}

/// Time the carrier is enabled per cycle, in microseconds.
pub const fn pattern_on_time_us(pattern: &Pattern) -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < PATTERN_LEN {
        total += pattern[i].on_us as u32;
        i += 1;
    }
    total
}

/// Carrier duty over one cycle, in per-mille (truncated).
pub const fn pattern_duty_permille(pattern: &Pattern) -> u32 {
    let total = pattern_duration_us(pattern);
    if total == 0 {
        return 0;
    }
    pattern_on_time_us(pattern) * 1000 / total
}

/// True if every element has non-zero on and off times.
pub const fn pattern_is_valid(pattern: &Pattern) -> bool {
    let mut i = 0;
    while i < PATTERN_LEN {
        if !pattern[i].is_valid() {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_beacon_cycle_length() {
        assert_eq!(pattern_duration_us(&MEASURED_BEACON), 10_250);
        assert_eq!(pattern_on_time_us(&MEASURED_BEACON), 1_866);
    }

    #[test]
    fn test_measured_beacon_duty() {
        // 1866 / 10250 = 18.2 %
        assert_eq!(pattern_duty_permille(&MEASURED_BEACON), 182);
    }

    #[test]
    fn test_private_beacon_duty() {
        assert_eq!(pattern_duration_us(&PRIVATE_BEACON), 9_300);
        assert_eq!(pattern_on_time_us(&PRIVATE_BEACON), 900);
        assert_eq!(pattern_duty_permille(&PRIVATE_BEACON), 96);
    }

    #[test]
    fn test_zero_element_is_invalid() {
        let bad = [
            PulsePair::new(622, 1195),
            PulsePair::new(0, 1195),
            PulsePair::new(622, 5994),
        ];
        assert!(!pattern_is_valid(&bad));
        assert!(pattern_is_valid(&MEASURED_BEACON));
        assert!(pattern_is_valid(&PRIVATE_BEACON));
    }
}
