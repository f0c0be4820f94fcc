use rand::seq::SliceRandom;
use rand::Rng;

const PIECE_COUNT: usize = 80;
const GRAVITY: f64 = 12.0;
const SYMBOLS: [char; 6] = ['*', '+', 'o', 'x', '.', '#'];

/// One falling confetti piece.
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiPiece {
    fn spawn(width: f64) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: -rng.gen_range(0.0..3.0),
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(1.0..4.0),
            symbol: *SYMBOLS.choose(&mut rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    /// Advance physics; false once the piece has aged out or fallen past
    /// the bottom edge.
    fn update(&mut self, dt: f64, height: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age && self.y < height + 1.0
    }
}

/// Confetti burst shown when a run enters the top 3.
#[derive(Debug, Default)]
pub struct Celebration {
    pub pieces: Vec<ConfettiPiece>,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, width: u16, height: u16) {
        self.width = width as f64;
        self.height = height as f64;
        self.pieces = (0..PIECE_COUNT)
            .map(|_| ConfettiPiece::spawn(self.width))
            .collect();
        self.is_active = true;
    }

    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }
        let height = self.height;
        self.pieces.retain_mut(|p| p.update(dt, height));
        if self.pieces.is_empty() {
            self.is_active = false;
        }
    }

    pub fn stop(&mut self) {
        self.pieces.clear();
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_spawns_pieces() {
        let mut c = Celebration::new();
        assert!(!c.is_active);
        c.start(80, 24);
        assert!(c.is_active);
        assert_eq!(c.pieces.len(), PIECE_COUNT);
    }

    #[test]
    fn test_pieces_fall_downwards() {
        let mut c = Celebration::new();
        c.start(80, 24);
        let before: Vec<f64> = c.pieces.iter().map(|p| p.y).collect();
        c.update(0.1);
        for (piece, old_y) in c.pieces.iter().zip(before) {
            assert!(piece.y > old_y);
        }
    }

    #[test]
    fn test_animation_eventually_ends() {
        let mut c = Celebration::new();
        c.start(80, 24);
        for _ in 0..200 {
            c.update(0.1);
        }
        assert!(!c.is_active);
        assert!(c.pieces.is_empty());
    }

    #[test]
    fn test_stop_clears_immediately() {
        let mut c = Celebration::new();
        c.start(80, 24);
        c.stop();
        assert!(!c.is_active);
        assert!(c.pieces.is_empty());
    }

    #[test]
    fn test_update_when_inactive_is_noop() {
        let mut c = Celebration::new();
        c.update(0.1);
        assert!(!c.is_active);
    }
}
