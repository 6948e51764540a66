use std::time::{Duration, Instant};

use rand::Rng;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::Frame;

const CONFETTI_PIECES: usize = 80;
const STAR_COUNT: usize = 10;
const CONFETTI_COLORS: [Color; 6] = [
    Color::Rgb(0xe7, 0x4c, 0x3c),
    Color::Rgb(0xf1, 0xc4, 0x0f),
    Color::Rgb(0x1a, 0xbc, 0x9c),
    Color::Rgb(0x9b, 0x59, 0xb6),
    Color::Rgb(0x34, 0x98, 0xdb),
    Color::Rgb(0xe6, 0x7e, 0x22),
];

/// A confetti piece falling from the top edge.
#[derive(Debug, Clone)]
struct Confetti {
    left: f32,
    color: Color,
    fall_secs: f32,
}

/// A star burst that twinkles in place, then fades.
#[derive(Debug, Clone)]
struct Star {
    left: f32,
    top: f32,
    lifetime_secs: f32,
}

/// A glyph to draw at an absolute terminal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub x: u16,
    pub y: u16,
    pub glyph: char,
    pub color: Color,
}

/// Time-limited win overlay of confetti and stars.
#[derive(Debug, Clone)]
pub struct Celebration {
    started: Instant,
    duration: Duration,
    confetti: Vec<Confetti>,
    stars: Vec<Star>,
}

impl Celebration {
    pub fn new<R: Rng>(rng: &mut R, started: Instant, duration: Duration) -> Self {
        let confetti = (0..CONFETTI_PIECES)
            .map(|_| Confetti {
                left: rng.random_range(0.0..1.0),
                color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
                fall_secs: rng.random_range(3.0..5.0),
            })
            .collect();
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                left: rng.random_range(0.05..0.95),
                top: rng.random_range(0.2..0.8),
                lifetime_secs: rng.random_range(2.0..3.0),
            })
            .collect();
        Celebration {
            started,
            duration,
            confetti,
            stars,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) < self.duration
    }

    /// Everything visible at `now`, placed inside `area`.
    pub fn sparkles(&self, now: Instant, area: Rect) -> Vec<Sparkle> {
        if !self.is_active(now) || area.width == 0 || area.height == 0 {
            return Vec::new();
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let place = |fraction: f32, offset: u16, extent: u16| {
            let cell = (fraction * f32::from(extent)) as u16;
            offset + cell.min(extent - 1)
        };

        let falling = self.confetti.iter().filter_map(|piece| {
            let progress = elapsed / piece.fall_secs;
            (progress < 1.0).then(|| Sparkle {
                x: place(piece.left, area.x, area.width),
                y: place(progress, area.y, area.height),
                glyph: if (elapsed * 4.0) as u32 % 2 == 0 { '▪' } else { '▫' },
                color: piece.color,
            })
        });
        let twinkling = self.stars.iter().filter_map(|star| {
            (elapsed < star.lifetime_secs).then(|| Sparkle {
                x: place(star.left, area.x, area.width),
                y: place(star.top, area.y, area.height),
                glyph: if elapsed < star.lifetime_secs / 2.0 { '✶' } else { '✧' },
                color: Color::Yellow,
            })
        });
        falling.chain(twinkling).collect()
    }

    pub fn render(&self, frame: &mut Frame, now: Instant) {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        for sparkle in self.sparkles(now, area) {
            buffer.set_string(
                sparkle.x,
                sparkle.y,
                sparkle.glyph.to_string(),
                Style::default().fg(sparkle.color),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn celebration(started: Instant) -> Celebration {
        let mut rng = StdRng::seed_from_u64(42);
        Celebration::new(&mut rng, started, Duration::from_secs(4))
    }

    #[test]
    fn test_expires_after_duration() {
        let start = Instant::now();
        let party = celebration(start);
        assert!(party.is_active(start));
        assert!(party.is_active(start + Duration::from_millis(3999)));
        assert!(!party.is_active(start + Duration::from_secs(4)));
        assert!(party
            .sparkles(start + Duration::from_secs(5), Rect::new(0, 0, 80, 24))
            .is_empty());
    }

    #[test]
    fn test_sparkles_stay_inside_area() {
        let start = Instant::now();
        let party = celebration(start);
        let area = Rect::new(3, 2, 40, 12);
        for millis in [0, 500, 1500, 2900] {
            let sparkles = party.sparkles(start + Duration::from_millis(millis), area);
            assert!(!sparkles.is_empty());
            for sparkle in sparkles {
                assert!(sparkle.x >= area.x && sparkle.x < area.x + area.width);
                assert!(sparkle.y >= area.y && sparkle.y < area.y + area.height);
            }
        }
    }

    #[test]
    fn test_starts_with_all_pieces_visible() {
        let start = Instant::now();
        let party = celebration(start);
        let sparkles = party.sparkles(start, Rect::new(0, 0, 80, 24));
        assert_eq!(sparkles.len(), CONFETTI_PIECES + STAR_COUNT);
    }

    #[test]
    fn test_empty_area_draws_nothing() {
        let start = Instant::now();
        assert!(celebration(start)
            .sparkles(start, Rect::new(0, 0, 0, 0))
            .is_empty());
    }
}
