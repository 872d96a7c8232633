//! Decorative animation timeline for the weather card.
//!
//! Nothing here draws. The timeline records when the card appeared and can
//! be sampled at any instant for the four animated values: card opacity,
//! entrance scale, card pulse scale and temperature pulse scale.

use std::time::Duration;

use tokio::time::Instant;

/// Entrance fade length.
pub const FADE_DURATION: Duration = Duration::from_millis(500);

pub const ENTRANCE_SCALE_FROM: f64 = 0.95;
pub const SPRING_FRICTION: f64 = 5.0;
pub const SPRING_TENSION: f64 = 60.0;

/// Card breathing: 1 ↔ 1.02, 800 ms each way.
pub const CARD_PULSE: Pulse = Pulse { peak: 1.02, half_period: Duration::from_millis(800) };

/// Temperature label breathing: 1 ↔ 1.10, 600 ms each way.
pub const TEMP_PULSE: Pulse = Pulse { peak: 1.10, half_period: Duration::from_millis(600) };

/// Snapshot of everything the card's transform depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValues {
    pub opacity: f64,
    pub scale: f64,
    pub card_pulse: f64,
    pub temp_pulse: f64,
}

impl AnimatedValues {
    pub const REST: Self =
        Self { opacity: 0.0, scale: ENTRANCE_SCALE_FROM, card_pulse: 1.0, temp_pulse: 1.0 };
}

impl Default for AnimatedValues {
    fn default() -> Self {
        Self::REST
    }
}

/// Emitted once when the card content goes from absent to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    Started,
}

/// Compares the previous and current card content. Only an absent → present
/// transition starts the animation; replacing present content does not.
pub fn detect_entrance<T>(previous: Option<&T>, current: Option<&T>) -> Option<AnimationEvent> {
    match (previous, current) {
        (None, Some(_)) => Some(AnimationEvent::Started),
        _ => None,
    }
}

/// Entrance + pulse timeline. At rest until started; once started the pulse
/// loops run until [`WeatherAnimation::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherAnimation {
    started_at: Option<Instant>,
    runs: u64,
}

impl WeatherAnimation {
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.runs += 1;
    }

    /// Stop the loops and return every value to rest.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// How many times the entrance has been started since creation.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn sample(&self, now: Instant) -> AnimatedValues {
        let Some(started_at) = self.started_at else {
            return AnimatedValues::REST;
        };
        let elapsed = now.saturating_duration_since(started_at);

        AnimatedValues {
            opacity: fade_in(elapsed),
            scale: Spring::origami(SPRING_TENSION, SPRING_FRICTION).position(
                ENTRANCE_SCALE_FROM,
                1.0,
                elapsed,
            ),
            card_pulse: CARD_PULSE.value_at(elapsed),
            temp_pulse: TEMP_PULSE.value_at(elapsed),
        }
    }
}

fn fade_in(elapsed: Duration) -> f64 {
    if elapsed >= FADE_DURATION {
        return 1.0;
    }
    ease_out(elapsed.as_secs_f64() / FADE_DURATION.as_secs_f64())
}

/// A loop rising from 1 to `peak` and falling back, each leg taking `half_period`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub peak: f64,
    pub half_period: Duration,
}

impl Pulse {
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let half = self.half_period.as_secs_f64();
        if half <= 0.0 {
            return 1.0;
        }

        let phase = elapsed.as_secs_f64() % (2.0 * half);
        let amplitude = self.peak - 1.0;

        if phase < half {
            1.0 + amplitude * ease_in_out(phase / half)
        } else {
            self.peak - amplitude * ease_in_out((phase - half) / half)
        }
    }
}

/// Damped harmonic oscillator, unit mass, starting at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spring {
    stiffness: f64,
    damping: f64,
}

const REST_DISPLACEMENT: f64 = 0.001;

impl Spring {
    /// Map Origami-style tension/friction onto stiffness/damping.
    fn origami(tension: f64, friction: f64) -> Self {
        Self { stiffness: (tension - 30.0) * 3.62 + 194.0, damping: (friction - 8.0) * 3.0 + 25.0 }
    }

    fn position(&self, from: f64, to: f64, elapsed: Duration) -> f64 {
        let t = elapsed.as_secs_f64();
        let x0 = to - from;
        let omega0 = self.stiffness.sqrt();
        let zeta = self.damping / (2.0 * omega0);

        let displacement = if zeta < 1.0 {
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega0 * t).exp();
            envelope * ((zeta * omega0 * x0 / omega_d) * (omega_d * t).sin() + x0 * (omega_d * t).cos())
        } else {
            (-omega0 * t).exp() * (x0 + omega0 * x0 * t)
        };

        if displacement.abs() < REST_DISPLACEMENT * x0.abs().max(f64::EPSILON) {
            to
        } else {
            to - displacement
        }
    }
}

/// React Native `Easing.ease`: cubic-bezier(0.42, 0, 1, 1), the same curve as CSS `ease-in`.
fn ease(t: f64) -> f64 {
    cubic_bezier(0.42, 0.0, 1.0, 1.0, t)
}

fn ease_out(t: f64) -> f64 {
    1.0 - ease(1.0 - t)
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 { ease(t * 2.0) / 2.0 } else { 1.0 - ease((1.0 - t) * 2.0) / 2.0 }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x == 0.0 || x == 1.0 {
        return x;
    }

    let coord = |t: f64, p1: f64, p2: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    };
    let slope = |t: f64, p1: f64, p2: f64| {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    };

    // Newton first, bisection when the slope flattens out.
    let mut t = x;
    for _ in 0..8 {
        let err = coord(t, x1, x2) - x;
        if err.abs() < 1e-7 {
            return coord(t, y1, y2);
        }
        let d = slope(t, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        t -= err / d;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..40 {
        let value = coord(t, x1, x2);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    coord(t, y1, y2)
}
